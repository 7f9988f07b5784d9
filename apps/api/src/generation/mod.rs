// Resume Generation: turns unstructured career text into a structured resume.
// All LLM calls go through gemini_client — no direct API calls here.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod sanitize;
