//! Live turn orchestrator — owns the lifetime of one streaming session.
//!
//! One call, one session: connect, send the user turn, wait for the
//! aggregated response under a wall-clock deadline, convert collected PCM to
//! WAV, and close the session on every exit path. A leaked live session keeps
//! billing the backend, so the close-exactly-once guarantee is the invariant
//! this module exists to uphold.

use std::time::Duration;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::live::aggregator::{aggregate_turn, summarize_turn};
use crate::live::mime::parse_audio_descriptor;
use crate::live::session::{LiveClient, LiveSession};
use crate::live::wav::encode_wav;

/// Hard deadline for a single turn, from send to turn-complete signal.
pub const TURN_TIMEOUT: Duration = Duration::from_secs(20);

/// Unified result of one interview turn.
#[derive(Debug)]
pub struct TurnResult {
    /// Text fragments joined by a single space, trimmed. May be empty.
    pub reply_text: String,
    /// WAV-containerized audio, present iff the turn produced inline audio
    /// with an inferable descriptor.
    pub audio: Option<Vec<u8>>,
    /// Always `"audio/wav"` when audio is present: raw fragments are
    /// re-containerized regardless of their original descriptor.
    pub audio_mime_type: Option<&'static str>,
}

/// Runs one complete interview turn against a fresh live session.
///
/// The prompt must already embed any conversation history as flattened text;
/// exactly one user turn is sent. Fails with [`AppError::Session`] when the
/// connection cannot be established and [`AppError::TurnTimeout`] when no
/// completion signal arrives within [`TURN_TIMEOUT`]. No retries on any path.
pub async fn run_turn(client: &dyn LiveClient, prompt: &str) -> Result<TurnResult, AppError> {
    let mut session = client.connect().await?;

    // From here on the session must be closed on every exit path, so the
    // fallible part runs to a result first and close happens unconditionally
    // before that result is surfaced.
    let outcome = drive_turn(session.as_mut(), prompt).await;
    session.close().await;

    outcome
}

/// The fallible body of a turn, separated out so `run_turn` can guarantee
/// session teardown around it.
async fn drive_turn(session: &mut dyn LiveSession, prompt: &str) -> Result<TurnResult, AppError> {
    let queue = session.queue();
    session.send_turn(prompt).await?;

    let turn_messages = tokio::time::timeout(TURN_TIMEOUT, aggregate_turn(&queue))
        .await
        .map_err(|_| AppError::TurnTimeout(TURN_TIMEOUT.as_secs()))?;

    debug!("live turn complete: {} messages", turn_messages.len());

    let summary = summarize_turn(&turn_messages);

    let audio = match &summary.mime_type {
        Some(mime_type) => {
            let descriptor = parse_audio_descriptor(mime_type);
            encode_wav(&summary.audio_parts, &descriptor)?
        }
        None => None,
    };

    let reply_text = summary.text_parts.join(" ").trim().to_string();
    let audio_mime_type = audio.is_some().then_some("audio/wav");

    info!(
        "live turn finished: {} text fragment(s), {} audio fragment(s), wav: {}",
        summary.text_parts.len(),
        summary.audio_parts.len(),
        audio.is_some()
    );

    Ok(TurnResult {
        reply_text,
        audio,
        audio_mime_type,
    })
}
