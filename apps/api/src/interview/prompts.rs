//! Prompt construction for the live interview turn.
//!
//! History is flattened into the prompt text rather than sent as structured
//! turns: the live session receives exactly one user turn per request, so the
//! whole conversation context must travel inside it.

use serde::Deserialize;

/// One prior exchange in the interview, as the client stores it.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewMessage {
    pub role: InterviewRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewRole {
    User,
    Ai,
}

const INTERVIEWER_PERSONA: &str = "Actúa como un entrevistador técnico bilingüe (Español neutro) que realiza entrevistas simuladas en vivo. \
Mantén un tono cálido y directo, ofrece seguimiento breve y una pregunta a la vez. \
Prioriza temas de experiencia laboral, proyectos y logros medibles.";

/// Flattens prior exchanges into a labeled transcript block, or an empty
/// string when there is no history yet.
pub fn build_history_context(history: &[InterviewMessage]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let condensed = history
        .iter()
        .map(|entry| {
            let speaker = match entry.role {
                InterviewRole::User => "Candidate",
                InterviewRole::Ai => "Gemini",
            };
            format!("{speaker}: {}", entry.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n\nConversation so far (keep style consistent):\n{condensed}")
}

/// Assembles the single-turn prompt: persona, flattened history, and the
/// candidate's latest entry.
pub fn build_turn_prompt(prompt: &str, history: &[InterviewMessage]) -> String {
    let history_context = build_history_context(history);
    format!("{INTERVIEWER_PERSONA} {history_context}\n\nÚltima entrada del candidato: {prompt}")
}
