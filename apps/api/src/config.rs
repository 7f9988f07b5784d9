use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The Gemini key is deliberately optional at startup: a missing key fails
/// each request with a 500 instead of killing the process, so the rest of the
/// API stays up while the secret is being provisioned.
#[derive(Debug, Clone)]
pub struct Config {
    /// Read from `GEMINI_API_KEY`, falling back to `API_KEY`; first non-empty
    /// value wins.
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: first_non_empty(&["GEMINI_API_KEY", "API_KEY"]),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}
