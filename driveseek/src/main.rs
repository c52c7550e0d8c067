use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use driveseek::api::{create_router, AppState};
use driveseek::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driveseek=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing Graph settings are fatal; exit before binding anything.
    let config = Config::from_env()?;

    if config.server.api_key.is_none() {
        tracing::warn!(
            "DRIVESEEK_API_KEY is not set — request gating is disabled. Intended for local testing only."
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;
    let app = create_router(state);

    tracing::info!("driveseek starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/", addr);
    tracing::info!("  Retrieval:    POST http://{}/retrieve", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
