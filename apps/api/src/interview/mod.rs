//! Live interview HTTP surface: request validation, prompt construction, and
//! the `POST /api/interview/respond` handler.

pub mod handlers;
pub mod prompts;
