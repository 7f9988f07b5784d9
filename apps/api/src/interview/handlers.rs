//! Axum route handlers for the live interview API.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::prompts::{build_turn_prompt, InterviewMessage};
use crate::live::{self, VOICE_NAME};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub history: Vec<InterviewMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub voice: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interview/respond
///
/// Runs one live interview turn: builds the contextual prompt from the
/// candidate's entry plus flattened history, drives a streaming session to
/// completion, and returns the text reply with the spoken WAV rendition.
pub async fn handle_respond(
    State(state): State<AppState>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, AppError> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation(
            "Comparte tu pregunta para continuar la entrevista.".to_string(),
        ));
    }

    if state.config.gemini_api_key.is_none() {
        return Err(AppError::Configuration(
            "GEMINI_API_KEY / API_KEY is not set".to_string(),
        ));
    }

    let turn_prompt = build_turn_prompt(prompt, &request.history);
    let result = live::run_turn(state.live.as_ref(), &turn_prompt).await?;

    if result.reply_text.is_empty() && result.audio.is_none() {
        return Err(AppError::EmptyResult);
    }

    Ok(Json(RespondResponse {
        reply: result.reply_text,
        audio_base64: result.audio.map(|bytes| BASE64.encode(bytes)),
        mime_type: result.audio_mime_type.map(str::to_string),
        voice: VOICE_NAME.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::Config;
    use crate::gemini_client::GeminiClient;
    use crate::live::messages::{ContentFragment, MessageQueue, Part, ServerMessage};
    use crate::live::session::{LiveClient, LiveSession};

    /// Client that records whether a session was ever opened.
    struct CountingClient {
        connects: Arc<AtomicUsize>,
        script: Vec<ServerMessage>,
    }

    struct ScriptedSession {
        queue: MessageQueue,
    }

    #[async_trait]
    impl LiveSession for ScriptedSession {
        fn queue(&self) -> MessageQueue {
            self.queue.clone()
        }

        async fn send_turn(&mut self, _text: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn close(&mut self) {}
    }

    #[async_trait]
    impl LiveClient for CountingClient {
        async fn connect(&self) -> Result<Box<dyn LiveSession>, AppError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            let queue = MessageQueue::new();
            for message in self.script.clone() {
                queue.push(message);
            }
            Ok(Box::new(ScriptedSession { queue }))
        }
    }

    fn test_state(script: Vec<ServerMessage>, api_key: Option<&str>) -> (AppState, Arc<AtomicUsize>) {
        let connects = Arc::new(AtomicUsize::new(0));
        let config = Config {
            gemini_api_key: api_key.map(str::to_string),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let state = AppState {
            live: Arc::new(CountingClient {
                connects: connects.clone(),
                script,
            }),
            gemini: GeminiClient::new(String::new()),
            config,
        };
        (state, connects)
    }

    fn final_text(text: &str) -> ServerMessage {
        ServerMessage {
            content: Some(ContentFragment {
                is_final: true,
                parts: vec![Part::Text {
                    text: text.to_string(),
                }],
            }),
        }
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_before_any_session() {
        let (state, connects) = test_state(vec![], Some("key"));

        let err = handle_respond(
            State(state),
            Json(RespondRequest {
                prompt: "   ".to_string(),
                history: vec![],
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_per_request_configuration_error() {
        let (state, connects) = test_state(vec![], None);

        let err = handle_respond(
            State(state),
            Json(RespondRequest {
                prompt: "Hola".to_string(),
                history: vec![],
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_turn_returns_reply_and_voice() {
        let (state, connects) = test_state(vec![final_text("Claro, cuéntame más.")], Some("key"));

        let response = handle_respond(
            State(state),
            Json(RespondRequest {
                prompt: "Cuéntame sobre tu experiencia".to_string(),
                history: vec![],
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.reply, "Claro, cuéntame más.");
        assert_eq!(response.voice, VOICE_NAME);
        assert!(response.audio_base64.is_none());
        assert!(response.mime_type.is_none());
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_turn_is_a_soft_failure() {
        let (state, _) = test_state(
            vec![ServerMessage {
                content: Some(ContentFragment {
                    is_final: true,
                    parts: vec![],
                }),
            }],
            Some("key"),
        );

        let err = handle_respond(
            State(state),
            Json(RespondRequest {
                prompt: "Hola".to_string(),
                history: vec![],
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::EmptyResult));
    }
}
