use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use prompter_core::file_store::JsonFileStore;
use prompter_core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiGateway};
use prompter_core::repository::PromptRepository;

mod models;
mod routes;

pub type AppRepository = PromptRepository<JsonFileStore, OpenAiGateway>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<AppRepository>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // The completion credential is required up front: a missing key is a
    // startup failure, not a per-call error.
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY must be set to reach the completion provider")?;
    let base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let model = std::env::var("PROMPTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let db_path = std::env::var("PROMPTER_DB").unwrap_or_else(|_| "prompts_db.json".to_string());

    let store = JsonFileStore::new(&db_path);
    let gateway = OpenAiGateway::new(api_key, base_url);
    let repo = PromptRepository::new(store, gateway, model)
        .with_context(|| format!("failed to open prompt store at {db_path}"))?;

    let state = AppState {
        repo: Arc::new(repo),
    };

    let router = Router::new()
        .route("/health", get(health_check))
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = std::env::var("PROMPTER_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()
        .context("invalid PROMPTER_ADDR")?;

    tracing::info!("prompter API listening on {addr}, store at {db_path}");

    let listener = TcpListener::bind(&addr).await?;
    Ok(axum::serve(listener, router).await?)
}
