//! Server message model for the live interview stream.
//!
//! The wire frames arrive as loosely-typed JSON (`serverContent.modelTurn.parts`
//! with optional `text` / `inlineData` / `fileData` fields). They are normalized
//! here into a closed [`Part`] enum so downstream code can match exhaustively
//! instead of probing optional fields.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

// ────────────────────────────────────────────────────────────────────────────
// Normalized model
// ────────────────────────────────────────────────────────────────────────────

/// One unit of model output within a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A text fragment of the spoken reply.
    Text { text: String },
    /// A base64-encoded raw PCM chunk, optionally labeled with its descriptor.
    InlineAudio {
        data: String,
        mime_type: Option<String>,
    },
    /// A reference to audio hosted by the backend instead of inlined.
    FileRef { uri: String },
}

/// Model content carried by one server message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentFragment {
    /// Set on the message that completes the turn. No later message belongs
    /// to the same turn.
    pub is_final: bool,
    pub parts: Vec<Part>,
}

/// A single message received from the live session, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerMessage {
    pub content: Option<ContentFragment>,
}

impl ServerMessage {
    /// True when this message carries the turn-completion signal.
    pub fn is_turn_complete(&self) -> bool {
        self.content.as_ref().is_some_and(|c| c.is_final)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Message queue
// ────────────────────────────────────────────────────────────────────────────

/// Ordered buffer between the socket reader task (producer) and the turn
/// aggregator (consumer). Created fresh per session, discarded on close.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<ServerMessage>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the tail (called from the reader task).
    pub fn push(&self, message: ServerMessage) {
        self.inner
            .lock()
            .expect("message queue lock poisoned")
            .push_back(message);
    }

    /// Removes and returns the head message, if any.
    pub fn pop(&self) -> Option<ServerMessage> {
        self.inner
            .lock()
            .expect("message queue lock poisoned")
            .pop_front()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire deserialization
// ────────────────────────────────────────────────────────────────────────────

/// Top-level server frame of the bidirectional stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<WireServerContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireServerContent {
    #[serde(default)]
    pub turn_complete: bool,
    pub model_turn: Option<WireModelTurn>,
}

#[derive(Debug, Deserialize)]
pub struct WireModelTurn {
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    pub text: Option<String>,
    pub inline_data: Option<WireBlob>,
    pub file_data: Option<WireFileData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBlob {
    pub data: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFileData {
    pub file_uri: Option<String>,
}

impl From<WireServerMessage> for ServerMessage {
    fn from(wire: WireServerMessage) -> Self {
        let content = wire.server_content.map(|sc| ContentFragment {
            is_final: sc.turn_complete,
            parts: sc
                .model_turn
                .map(|turn| turn.parts.into_iter().filter_map(normalize_part).collect())
                .unwrap_or_default(),
        });

        ServerMessage { content }
    }
}

/// Maps one wire part into the closed model. A wire part carrying several
/// fields at once (not observed in practice) keeps its most specific one:
/// inline audio, then text, then file reference. Empty parts are dropped.
fn normalize_part(part: WirePart) -> Option<Part> {
    if let Some(blob) = part.inline_data {
        return Some(Part::InlineAudio {
            data: blob.data.unwrap_or_default(),
            mime_type: blob.mime_type,
        });
    }
    if let Some(text) = part.text {
        return Some(Part::Text { text });
    }
    if let Some(uri) = part.file_data.and_then(|f| f.file_uri) {
        return Some(Part::FileRef { uri });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_fifo_order() {
        let queue = MessageQueue::new();
        queue.push(ServerMessage::default());
        queue.push(ServerMessage {
            content: Some(ContentFragment {
                is_final: true,
                parts: vec![],
            }),
        });

        assert!(!queue.pop().unwrap().is_turn_complete());
        assert!(queue.pop().unwrap().is_turn_complete());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_wire_text_and_audio_parts_normalize() {
        let json = r#"{
            "serverContent": {
                "turnComplete": false,
                "modelTurn": {
                    "parts": [
                        {"text": "Hola"},
                        {"inlineData": {"data": "AAAA", "mimeType": "audio/L16;rate=24000"}},
                        {"fileData": {"fileUri": "files/reply.wav"}}
                    ]
                }
            }
        }"#;

        let wire: WireServerMessage = serde_json::from_str(json).unwrap();
        let message = ServerMessage::from(wire);
        let content = message.content.unwrap();

        assert!(!content.is_final);
        assert_eq!(
            content.parts,
            vec![
                Part::Text {
                    text: "Hola".to_string()
                },
                Part::InlineAudio {
                    data: "AAAA".to_string(),
                    mime_type: Some("audio/L16;rate=24000".to_string()),
                },
                Part::FileRef {
                    uri: "files/reply.wav".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_wire_turn_complete_maps_to_final() {
        let json = r#"{"serverContent": {"turnComplete": true}}"#;
        let wire: WireServerMessage = serde_json::from_str(json).unwrap();
        let message = ServerMessage::from(wire);
        assert!(message.is_turn_complete());
        assert!(message.content.unwrap().parts.is_empty());
    }

    #[test]
    fn test_setup_complete_frame_has_no_content() {
        let json = r#"{"setupComplete": {}}"#;
        let wire: WireServerMessage = serde_json::from_str(json).unwrap();
        assert!(wire.setup_complete.is_some());
        let message = ServerMessage::from(wire);
        assert!(message.content.is_none());
    }

    #[test]
    fn test_empty_wire_part_is_dropped() {
        let part = WirePart {
            text: None,
            inline_data: None,
            file_data: None,
        };
        assert!(normalize_part(part).is_none());
    }
}
