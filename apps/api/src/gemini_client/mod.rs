/// Gemini HTTP client — the single point of entry for all non-live Gemini
/// calls in the API.
///
/// ARCHITECTURAL RULE: no other module may call the generateContent endpoint
/// directly. All request-response LLM interactions MUST go through this module
/// (the live interview stream has its own WebSocket client in `live`).
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for resume generation.
/// This is intentionally hardcoded to prevent accidental drift.
pub const GENERATION_MODEL: &str = "gemini-2.5-flash";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model returned empty content")]
    EmptyContent,
}

impl From<GeminiError> for AppError {
    fn from(e: GeminiError) -> Self {
        AppError::Llm(e.to_string())
    }
}

/// The single HTTP Gemini client used by all services in the API.
/// Wraps generateContent with retry logic and structured output helpers.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw generateContent call, returning the first candidate's text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    ///
    /// `response_schema` switches the model into structured-output mode
    /// (`responseMimeType: application/json` plus the given schema).
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        response_schema: Option<&Value>,
    ) -> Result<String, GeminiError> {
        let mut generation_config = json!({});
        if let Some(schema) = response_schema {
            generation_config = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "systemInstruction": {
                "parts": [{ "text": system }]
            },
            "generationConfig": generation_config,
        });

        let url = format!("{API_BASE}/{GENERATION_MODEL}:generateContent");
        let mut last_error: Option<GeminiError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GeminiError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(GeminiError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = extract_api_error(&body).unwrap_or(body);
                return Err(GeminiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let payload: Value = response.json().await?;
            let text = first_candidate_text(&payload).ok_or(GeminiError::EmptyContent)?;

            debug!("Gemini call succeeded ({} chars)", text.len());
            return Ok(text.to_string());
        }

        Err(last_error.unwrap_or(GeminiError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Convenience method that calls the model in structured-output mode and
    /// deserializes the JSON reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        response_schema: &Value,
    ) -> Result<T, GeminiError> {
        let text = self.call(prompt, system, Some(response_schema)).await?;
        serde_json::from_str(&text).map_err(GeminiError::Parse)
    }
}

/// Pulls the text of the first candidate's first text part, if any.
fn first_candidate_text(payload: &Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
}

fn extract_api_error(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_text_extracts_first_text_part() {
        let payload = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"data": "AAAA"}},
                        {"text": "hola"},
                        {"text": "ignored"}
                    ]
                }
            }]
        });
        assert_eq!(first_candidate_text(&payload), Some("hola"));
    }

    #[test]
    fn test_first_candidate_text_handles_empty_payload() {
        assert_eq!(first_candidate_text(&json!({})), None);
        assert_eq!(first_candidate_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_extract_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(
            extract_api_error(body).as_deref(),
            Some("API key not valid")
        );
        assert_eq!(extract_api_error("not json"), None);
    }
}
