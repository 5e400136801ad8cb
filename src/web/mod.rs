mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use state::AppState;

use crate::services::auth;
use crate::{Config, Database};
use anyhow::Result;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let max_upload_mb = config.media.max_upload_mb;
    let state = Arc::new(AppState::new(config, db.clone())?);

    // Hourly sweep of expired sessions and stale login-attempt records.
    let sweep_db = db.clone();
    let sweep_limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            if let Err(e) = auth::cleanup_expired_sessions(&sweep_db) {
                tracing::warn!("session cleanup failed: {e}");
            }
            sweep_limiter.cleanup();
        }
    });

    let app = Router::new()
        .merge(routes::public_routes())
        .merge(routes::admin_routes(max_upload_mb))
        .fallback(handlers::public::not_found)
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("listening on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
