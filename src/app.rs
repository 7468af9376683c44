use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/events/click", post(handlers::click))
        .route("/events/submit", post(handlers::submit))
        .route("/api/view", get(handlers::get_view))
        .route("/api/events", post(handlers::post_event))
        .with_state(state)
}
