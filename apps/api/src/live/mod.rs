//! Live interview subsystem.
//!
//! Everything needed to run one conversational turn against the generative
//! audio backend:
//!
//! - [`mime`] — parses `audio/L16;rate=24000` style descriptors.
//! - [`wav`] — wraps raw PCM fragments in a playable WAV container.
//! - [`messages`] — normalized server message model plus the per-session queue.
//! - [`aggregator`] — drains a turn off the queue and partitions its parts.
//! - [`session`] — the client/session traits and the Gemini WebSocket impl.
//! - [`orchestrator`] — ties it together with the timeout and the
//!   close-exactly-once guarantee.

pub mod aggregator;
pub mod messages;
pub mod mime;
pub mod orchestrator;
pub mod session;
pub mod wav;

pub use orchestrator::{run_turn, TurnResult};
pub use session::{GeminiLiveClient, LiveClient, VOICE_NAME};
