use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{errors::StartupError, routes, state::ServerState};
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")).into())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Build app state from the resolved configuration.
pub async fn build_state(cfg: &configs::AppConfig) -> anyhow::Result<ServerState> {
    runtime::ensure_env(&cfg.media.root)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&(&cfg.database).into()).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    Ok(ServerState::new(db, &cfg.media.root, cfg.listing.total_on_page))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let cfg = configs::AppConfig::resolve().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = build_state(&cfg).await?;

    let app: Router = routes::build_router_with_limit(state, build_cors(), cfg.media.max_upload_bytes);

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, page_size = cfg.listing.total_on_page, media_root = %cfg.media.root, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
