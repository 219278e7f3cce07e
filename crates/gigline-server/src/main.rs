mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use gigline_api::state::{AppState, AppStateInner};
use gigline_chat::InMemoryDirectory;
use gigline_types::models::ActorRecord;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigline=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if config.uses_dev_secret() {
        warn!("GIGLINE_JWT_SECRET not set, using the development secret");
    }

    let directory = match &config.actors_path {
        Some(path) => load_directory(path)?,
        None => {
            warn!("GIGLINE_ACTORS_PATH not set, starting with an empty actor directory");
            InMemoryDirectory::new()
        }
    };
    info!(actors = directory.len(), "Actor directory ready");

    let state: AppState = Arc::new(AppStateInner::new(
        directory,
        config.jwt_secret.clone(),
        config.default_language,
    ));

    let app = gigline_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Gigline server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the directory from a JSON array of account records.
fn load_directory(path: &Path) -> anyhow::Result<InMemoryDirectory> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading actors from {}", path.display()))?;
    let records: Vec<ActorRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing actors from {}", path.display()))?;
    Ok(InMemoryDirectory::from_records(records))
}
