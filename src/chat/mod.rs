//! Annotation Chat
//!
//! Conversation model for the image annotation widget.
//!
//! ## Architecture
//!
//! - **Mirror**: best-effort reader of session and ROI state owned elsewhere
//! - **Transcript**: append-only list of rendered messages
//! - **Pipeline**: builds the request, talks to the backend, falls back offline
//! - **Effects**: thinking dots and typing reveal as explicit tasks
//!
//! The browser and the CLI share everything here; only the transport and the
//! timer implementation differ.

mod effects;
mod mirror;
mod pipeline;
mod transcript;

#[cfg(feature = "native")]
mod client;
#[cfg(feature = "native")]
mod ticker;

pub use effects::{ThinkingDots, TypingReveal, THINKING_START};
pub use mirror::{
    parse_roi_paths, parse_session_id, MirrorReader, MirrorSource, SessionContext, StaticMirror,
    DEFAULT_SESSION_ID, MIRROR_ATTRIBUTE, ROI_MIRROR_ID, SESSION_MIRROR_ID,
};
pub use pipeline::{
    fallback_reply, preview_url, ChatOutcome, ChatPipeline, ChatReply, ChatRequest, ChatResponse,
    ChatTransport, ThinkingIndicator, NO_RESPONSE,
};
pub use transcript::{MessageId, Transcript, TranscriptEntry};

#[cfg(feature = "native")]
pub use client::HttpChatClient;
#[cfg(feature = "native")]
pub use ticker::{play_typing, spawn_ticker, TickerHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text every AI bubble starts with
pub const AI_PREFIX: &str = "AI: ";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// CSS class used by the transcript
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

/// A single message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub attached_image_paths: Vec<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            attached_image_paths: Vec::new(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            attached_image_paths: Vec::new(),
        }
    }

    pub fn with_images(mut self, paths: Vec<String>) -> Self {
        self.attached_image_paths = paths;
        self
    }

    /// Thumbnail URLs for the attached ROI images
    pub fn preview_urls(&self) -> Vec<String> {
        self.attached_image_paths
            .iter()
            .map(|p| preview_url(p))
            .collect()
    }
}

/// Errors talking to the chat backend
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Chat API returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    Decode(String),
}
