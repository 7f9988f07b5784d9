//! Turn message aggregator — drains the session queue until the backend
//! signals turn completion, then partitions the collected parts.
//!
//! Messages are delivered by the socket reader task into a [`MessageQueue`];
//! this module consumes them with a sleep-and-retry poll. The poll imposes no
//! bound of its own: a stream that never completes is cut off by the
//! orchestrator's wall-clock timeout, not here.

use std::time::Duration;

use crate::live::messages::{MessageQueue, Part, ServerMessage};

/// How long the drain loop sleeps when the queue is empty.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything collected from one model turn, partitioned by part kind.
#[derive(Debug, Default)]
pub struct TurnSummary {
    /// Text fragments in encounter order.
    pub text_parts: Vec<String>,
    /// Base64 PCM fragments in encounter order. Order matters: these are
    /// sequential samples of one utterance.
    pub audio_parts: Vec<String>,
    /// Descriptor of the audio fragments. First inline label wins; falls back
    /// to inference from a file reference's extension.
    pub mime_type: Option<String>,
}

/// Pops messages off the queue until one carries the turn-completion signal.
/// That final message is included as the last element of the returned vec.
pub async fn aggregate_turn(queue: &MessageQueue) -> Vec<ServerMessage> {
    let mut turn_messages = Vec::new();

    loop {
        let Some(message) = queue.pop() else {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        };

        let done = message.is_turn_complete();
        turn_messages.push(message);
        if done {
            return turn_messages;
        }
    }
}

/// Partitions the recorded turn into text and audio streams plus the inferred
/// MIME type.
///
/// An inline label always describes the actual PCM fragments, so it takes
/// precedence over extension inference no matter where each appears in the
/// turn; the file-reference guess only fills in when no inline part was
/// labeled at all.
pub fn summarize_turn(messages: &[ServerMessage]) -> TurnSummary {
    let mut summary = TurnSummary::default();
    let mut inline_mime: Option<String> = None;
    let mut fallback_mime: Option<String> = None;

    for message in messages {
        let Some(content) = &message.content else {
            continue;
        };

        for part in &content.parts {
            match part {
                Part::Text { text } => summary.text_parts.push(text.clone()),
                Part::InlineAudio { data, mime_type } => {
                    summary.audio_parts.push(data.clone());
                    if inline_mime.is_none() {
                        inline_mime = mime_type.clone();
                    }
                }
                Part::FileRef { uri } => {
                    if fallback_mime.is_none() {
                        fallback_mime = infer_mime_type(uri);
                    }
                }
            }
        }
    }

    summary.mime_type = inline_mime.or(fallback_mime);
    summary
}

/// Guesses a MIME type from a hosted audio file's extension.
fn infer_mime_type(uri: &str) -> Option<String> {
    let mime = if uri.ends_with(".wav") {
        "audio/wav"
    } else if uri.ends_with(".mp3") {
        "audio/mpeg"
    } else if uri.ends_with(".aac") {
        "audio/aac"
    } else {
        return None;
    };
    Some(mime.to_string())
}
