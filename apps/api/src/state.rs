use std::sync::Arc;

use crate::config::Config;
use crate::gemini_client::GeminiClient;
use crate::live::LiveClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Opens one live session per interview turn. Trait object so tests can
    /// swap in a scripted fake.
    pub live: Arc<dyn LiveClient>,
    /// HTTP Gemini client for resume generation.
    pub gemini: GeminiClient,
    pub config: Config,
}
