mod config;
mod errors;
mod gemini_client;
mod generation;
mod interview;
mod live;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gemini_client::GeminiClient;
use crate::live::GeminiLiveClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Currículo API v{}", env!("CARGO_PKG_VERSION"));

    // A missing key is not fatal here: requests that need it fail with a 500
    // until the secret is provisioned.
    let api_key = config.gemini_api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        warn!("GEMINI_API_KEY / API_KEY not set; generation and interview requests will fail");
    }

    let live = Arc::new(GeminiLiveClient::new(api_key.clone()));
    let gemini = GeminiClient::new(api_key);
    info!(
        "Gemini clients initialized (generation: {}, live: {})",
        gemini_client::GENERATION_MODEL,
        live::session::LIVE_MODEL
    );

    let state = AppState {
        live,
        gemini,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
