//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::models::ResumeData;
use crate::generation::prompts::{
    build_resume_prompt, resume_response_schema, RESUME_SYSTEM_INSTRUCTION,
};
use crate::generation::sanitize::sanitize_resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    pub job_description: Option<String>,
    pub job_link: Option<String>,
}

/// POST /api/generate
///
/// Turns unstructured career text into a structured, sanitized resume.
/// Content quality is the model's business; this handler is transport,
/// validation, and sanitization only.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ResumeData>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Se requiere un texto válido para generar el currículum.".to_string(),
        ));
    }

    if state.config.gemini_api_key.is_none() {
        return Err(AppError::Configuration(
            "GEMINI_API_KEY / API_KEY is not set".to_string(),
        ));
    }

    let prompt = build_resume_prompt(
        &request.text,
        request.job_description.as_deref(),
        request.job_link.as_deref(),
    );

    let resume: ResumeData = state
        .gemini
        .call_json(&prompt, RESUME_SYSTEM_INSTRUCTION, &resume_response_schema())
        .await?;

    Ok(Json(sanitize_resume(resume)))
}
