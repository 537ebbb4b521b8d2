use std::time::Duration;

use anyhow::Result;
use tracing::info;

use affiliate_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);

    info!(
        "Starting Affiliate Platform API v{}",
        env!("CARGO_PKG_VERSION")
    );

    middleware::init_metrics();

    let pool = persistence::db::create_pool(&config.database_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Sample pool occupancy for the /metrics endpoint.
    let metrics_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            persistence::metrics::record_pool_metrics(&metrics_pool);
        }
    });

    // Refresh sessions are deleted when presented; expired rows that were
    // never presented again are swept here.
    let session_pool = pool.clone();
    tokio::spawn(async move {
        let sessions = persistence::repositories::SessionRepository::new(session_pool);
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match sessions.delete_expired().await {
                Ok(removed) if removed > 0 => {
                    info!(removed, "Swept expired sessions");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    });

    let app = app::create_app(config.clone(), pool)?;

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
