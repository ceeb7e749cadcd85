//! Chat Request Pipeline
//!
//! One prompt in, one reply out. Transport failures never reach the
//! caller: they turn into a local echo reply.

use super::{ChatError, ChatMessage, MirrorReader, MirrorSource, AI_PREFIX};
use crate::config::ChatConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reply text used when the backend returns an empty `response`
pub const NO_RESPONSE: &str = "(no response)";

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub images: Vec<String>,
    pub session_id: String,
}

/// Body returned by `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// Something that can deliver a [`ChatRequest`].
///
/// Futures are not required to be `Send` so the browser fetch can
/// implement this as well as the native HTTP client.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// The "thinking" animation shown while a request is outstanding.
///
/// `stop` takes `self`, so an indicator can only be stopped once.
pub trait ThinkingIndicator {
    fn stop(self);
}

impl<I: ThinkingIndicator> ThinkingIndicator for Option<I> {
    fn stop(self) {
        if let Some(indicator) = self {
            indicator.stop();
        }
    }
}

/// How a reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    Delivered,
    Fallback,
}

/// Final reply for one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Text as it should appear in the bubble
    pub text: String,
    /// ROI images the reply is about (empty for fallbacks)
    pub images: Vec<String>,
    pub outcome: ChatOutcome,
}

impl ChatReply {
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::ai(self.text).with_images(self.images)
    }

    /// Characters already on screen before the typing reveal starts
    pub fn revealed_prefix_len(&self) -> usize {
        match self.outcome {
            ChatOutcome::Delivered => AI_PREFIX.chars().count(),
            ChatOutcome::Fallback => self.text.chars().count(),
        }
    }
}

/// Offline reply echoing the user's input
pub fn fallback_reply(prompt: &str) -> String {
    format!("AI (Mock): Offline. Echo → \"{}\"", prompt)
}

/// Thumbnail URL for an ROI image path
pub fn preview_url(path: &str) -> String {
    format!("/preview?path={}", urlencoding::encode(path))
}

/// Builds requests and turns transport results into replies
#[derive(Debug, Clone)]
pub struct ChatPipeline {
    model: String,
}

impl ChatPipeline {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble the payload from the prompt and the current mirror state
    pub fn build_request<S: MirrorSource>(
        &self,
        prompt: &str,
        mirror: &MirrorReader<S>,
    ) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            images: mirror.roi_paths(),
            session_id: mirror.session().session_id,
        }
    }

    /// Send one prompt and produce its reply.
    ///
    /// The indicator is stopped exactly once, after the response (or the
    /// failure) is in hand and before the reply is returned.
    pub async fn respond<T, S, I>(
        &self,
        transport: &T,
        prompt: &str,
        mirror: &MirrorReader<S>,
        indicator: I,
    ) -> ChatReply
    where
        T: ChatTransport + ?Sized,
        S: MirrorSource,
        I: ThinkingIndicator,
    {
        let request = self.build_request(prompt, mirror);
        tracing::debug!(
            session = %request.session_id,
            images = request.images.len(),
            "Sending chat request"
        );

        let result = transport.send(&request).await;
        indicator.stop();

        match result {
            Ok(response) => {
                let body = response
                    .response
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| NO_RESPONSE.to_string());
                ChatReply {
                    text: format!("{}{}", AI_PREFIX, body),
                    images: request.images,
                    outcome: ChatOutcome::Delivered,
                }
            }
            Err(e) => {
                tracing::warn!("AI fetch failed: {}", e);
                ChatReply {
                    text: fallback_reply(prompt),
                    images: Vec::new(),
                    outcome: ChatOutcome::Fallback,
                }
            }
        }
    }
}
