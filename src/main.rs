use daily_nutrition::{router, AppState, Config, Navigator};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    info!(api_base = %config.api_base, "using nutrition backend");

    let state = AppState::new(Navigator::new(&config.api_base));
    let navigator = state.navigator.clone();
    tokio::spawn(async move {
        navigator.start().await;
    });

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
