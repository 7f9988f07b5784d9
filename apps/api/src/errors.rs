use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Everything crossing the HTTP boundary is collapsed to a generic user-facing
/// message; internal detail is logged, never echoed back to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Live session error: {0}")]
    Session(String),

    #[error("Live turn timed out after {0} seconds")]
    TurnTimeout(u64),

    #[error("Audio encoding error: {0}")]
    Encoding(String),

    #[error("Turn produced neither text nor audio")]
    EmptyResult,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "El servicio no está configurado correctamente.".to_string(),
                )
            }
            AppError::Session(msg) => {
                tracing::error!("Live session error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No se pudo completar la interacción. Intenta nuevamente en unos segundos."
                        .to_string(),
                )
            }
            AppError::TurnTimeout(secs) => {
                tracing::error!("Live turn timed out after {secs}s");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "La respuesta tardó demasiado. Intenta nuevamente.".to_string(),
                )
            }
            AppError::Encoding(msg) => {
                tracing::error!("Audio encoding error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No se pudo procesar el audio de la respuesta.".to_string(),
                )
            }
            AppError::EmptyResult => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No se pudo generar una respuesta. Intenta nuevamente en unos segundos."
                    .to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No se pudo generar el currículum. Inténtalo nuevamente más tarde.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error interno del servidor.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
