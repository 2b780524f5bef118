//! merch-cloud HTTP service

use std::time::Duration;

use merch_cloud::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merch_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    shared::error::set_debug_details(config.is_development());

    tracing::info!(
        "Starting merch-cloud (env: {}, storage: {:?})",
        config.environment,
        config.storage
    );

    let state = AppState::new(&config).await?;
    let app = api::create_router(state, Duration::from_secs(config.request_timeout_secs));

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("merch-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
