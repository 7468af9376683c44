pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod navigator;
pub mod notifier;
pub mod state;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Config;
pub use navigator::Navigator;
pub use state::AppState;
