//! Live session transport.
//!
//! [`LiveClient`] and [`LiveSession`] are the seams between the turn
//! orchestrator and the network: the orchestrator only ever sees these traits,
//! so tests can substitute a scripted fake and the real Gemini Live WebSocket
//! client stays swappable.
//!
//! The real client speaks the `BidiGenerateContent` bidirectional protocol:
//! one setup frame, then client/server content frames as JSON over the socket.
//! A spawned reader task normalizes incoming frames and pushes them onto the
//! session's [`MessageQueue`]; consumption happens elsewhere (the aggregator).

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::live::messages::{MessageQueue, ServerMessage, WireServerMessage};

/// Live model used for interview turns. Intentionally hardcoded to prevent
/// accidental drift.
pub const LIVE_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-12-2025";
/// Prebuilt voice for the interviewer persona.
pub const VOICE_NAME: &str = "Zephyr";

const LIVE_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
/// Context window compression bounds backend memory on long conversations.
const COMPRESSION_TRIGGER_TOKENS: &str = "25600";
const COMPRESSION_TARGET_TOKENS: &str = "12800";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens live sessions. One session per turn; sessions are never pooled.
#[async_trait]
pub trait LiveClient: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LiveSession>, AppError>;
}

/// One bidirectional streaming session. Owned exclusively by the orchestrator
/// for the duration of a single turn and closed exactly once.
#[async_trait]
pub trait LiveSession: Send {
    /// The queue the session's reader fills. Shared with the aggregator.
    fn queue(&self) -> MessageQueue;

    /// Sends one complete user turn.
    async fn send_turn(&mut self, text: &str) -> Result<(), AppError>;

    /// Tears the session down. Idempotent; never fails the caller.
    async fn close(&mut self);
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini Live implementation
// ────────────────────────────────────────────────────────────────────────────

/// WebSocket client for the Gemini Live API. Cheap to construct; each
/// `connect` opens a fresh socket.
#[derive(Clone)]
pub struct GeminiLiveClient {
    api_key: String,
}

impl GeminiLiveClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    fn setup_frame(&self) -> serde_json::Value {
        json!({
            "setup": {
                "model": LIVE_MODEL,
                "generationConfig": {
                    "responseModalities": ["AUDIO", "TEXT"],
                    "mediaResolution": "MEDIA_RESOLUTION_MEDIUM",
                    "speechConfig": {
                        "voiceConfig": {
                            "prebuiltVoiceConfig": { "voiceName": VOICE_NAME }
                        }
                    }
                },
                "contextWindowCompression": {
                    "triggerTokens": COMPRESSION_TRIGGER_TOKENS,
                    "slidingWindow": { "targetTokens": COMPRESSION_TARGET_TOKENS }
                }
            }
        })
    }
}

#[async_trait]
impl LiveClient for GeminiLiveClient {
    async fn connect(&self) -> Result<Box<dyn LiveSession>, AppError> {
        let url = format!("{LIVE_ENDPOINT}?key={}", self.api_key);

        let (socket, _response) = connect_async(url)
            .await
            .map_err(|e| AppError::Session(format!("websocket connect failed: {e}")))?;
        let (mut sink, mut stream) = socket.split();

        sink.send(WsMessage::Text(self.setup_frame().to_string()))
            .await
            .map_err(|e| AppError::Session(format!("setup frame send failed: {e}")))?;

        wait_for_setup_complete(&mut stream).await?;
        debug!("live session established (model: {LIVE_MODEL})");

        let queue = MessageQueue::new();
        let reader = spawn_reader(stream, queue.clone());

        Ok(Box::new(GeminiLiveSession {
            queue,
            sink,
            reader: Some(reader),
        }))
    }
}

/// Consumes frames until the backend acknowledges the setup, so the session is
/// ready to accept a turn before `connect` returns.
async fn wait_for_setup_complete(stream: &mut SplitStream<WsStream>) -> Result<(), AppError> {
    while let Some(frame) = stream.next().await {
        let frame = frame.map_err(|e| AppError::Session(format!("websocket error: {e}")))?;
        match decode_frame(&frame) {
            FrameContent::SetupComplete => return Ok(()),
            FrameContent::Closed => {
                return Err(AppError::Session(
                    "connection closed during setup".to_string(),
                ))
            }
            _ => {}
        }
    }
    Err(AppError::Session(
        "stream ended before setup completed".to_string(),
    ))
}

/// Moves the read half into a background task that feeds the message queue.
/// Socket errors end the task; the consumer side is bounded by its own timeout.
fn spawn_reader(mut stream: SplitStream<WsStream>, queue: MessageQueue) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(frame) => match decode_frame(&frame) {
                    FrameContent::Message(message) => queue.push(message),
                    FrameContent::Closed => {
                        debug!("live session closed by server");
                        break;
                    }
                    FrameContent::Ignored | FrameContent::SetupComplete => {}
                },
                Err(e) => {
                    warn!("live session read error: {e}");
                    break;
                }
            }
        }
    })
}

enum FrameContent {
    Message(ServerMessage),
    SetupComplete,
    Closed,
    Ignored,
}

/// Server frames arrive as text or binary, both carrying JSON.
fn decode_frame(frame: &WsMessage) -> FrameContent {
    let payload: &[u8] = match frame {
        WsMessage::Text(text) => text.as_bytes(),
        WsMessage::Binary(bytes) => bytes,
        WsMessage::Close(_) => return FrameContent::Closed,
        _ => return FrameContent::Ignored,
    };

    match serde_json::from_slice::<WireServerMessage>(payload) {
        Ok(wire) if wire.setup_complete.is_some() => FrameContent::SetupComplete,
        Ok(wire) => FrameContent::Message(ServerMessage::from(wire)),
        Err(e) => {
            warn!("unrecognized live frame ({e}); dropping");
            FrameContent::Ignored
        }
    }
}

struct GeminiLiveSession {
    queue: MessageQueue,
    sink: SplitSink<WsStream, WsMessage>,
    reader: Option<JoinHandle<()>>,
}

#[async_trait]
impl LiveSession for GeminiLiveSession {
    fn queue(&self) -> MessageQueue {
        self.queue.clone()
    }

    async fn send_turn(&mut self, text: &str) -> Result<(), AppError> {
        let frame = json!({
            "clientContent": {
                "turns": [{
                    "role": "user",
                    "parts": [{ "text": text }]
                }],
                "turnComplete": true
            }
        });

        self.sink
            .send(WsMessage::Text(frame.to_string()))
            .await
            .map_err(|e| AppError::Session(format!("turn send failed: {e}")))
    }

    async fn close(&mut self) {
        let Some(reader) = self.reader.take() else {
            return; // already closed
        };

        if let Err(e) = self.sink.send(WsMessage::Close(None)).await {
            debug!("close frame send failed (socket likely gone): {e}");
        }
        let _ = self.sink.close().await;
        reader.abort();
    }
}

impl Drop for GeminiLiveSession {
    fn drop(&mut self) {
        // Last-resort cleanup if close was never awaited.
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
