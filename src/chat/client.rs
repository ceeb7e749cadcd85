//! Chat Backend Client
//!
//! reqwest transport for the backend-proxied chat endpoint.

use super::{ChatError, ChatRequest, ChatResponse, ChatTransport};
use crate::config::ChatConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for `/api/chat` and its companion routes
pub struct HttpChatClient {
    client: Client,
    chat_url: String,
    reset_url: String,
}

#[derive(Debug, Serialize)]
struct ResetRequest<'a> {
    session_id: &'a str,
}

impl HttpChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::Network(e.to_string()))?;

        Ok(Self {
            client,
            chat_url: config.chat_url(),
            reset_url: config.route_url("/api/reset_chat"),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Ask the backend to forget a session's history
    pub async fn reset_session(&self, session_id: &str) -> Result<(), ChatError> {
        let response = self
            .client
            .post(&self.reset_url)
            .json(&ResetRequest { session_id })
            .send()
            .await
            .map_err(map_request_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChatError::Status(response.status().as_u16()))
        }
    }
}

fn map_request_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Network("request timed out".to_string())
    } else {
        ChatError::Network(e.to_string())
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        tracing::debug!("Sending payload to {}", self.chat_url);

        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatOutcome, ChatPipeline, MirrorReader, StaticMirror, ThinkingIndicator};

    struct Noop;

    impl ThinkingIndicator for Noop {
        fn stop(self) {}
    }

    fn unreachable_config() -> ChatConfig {
        ChatConfig {
            // Discard port; nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..ChatConfig::default()
        }
    }

    #[test]
    fn test_urls_from_config() {
        let client = HttpChatClient::new(&ChatConfig::default()).unwrap();
        assert_eq!(client.chat_url(), "http://localhost:8050/api/chat");
        assert_eq!(client.reset_url, "http://localhost:8050/api/reset_chat");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = HttpChatClient::new(&unreachable_config()).unwrap();
        let request = ChatRequest {
            model: "m".to_string(),
            prompt: "p".to_string(),
            images: Vec::new(),
            session_id: "default".to_string(),
        };
        assert!(matches!(
            client.send(&request).await,
            Err(ChatError::Network(_))
        ));
        assert!(client.reset_session("default").await.is_err());
    }

    #[tokio::test]
    async fn test_pipeline_over_unreachable_backend() {
        let client = HttpChatClient::new(&unreachable_config()).unwrap();
        let reply = ChatPipeline::new("m")
            .respond(
                &client,
                "is anyone there?",
                &MirrorReader::new(StaticMirror::new()),
                Noop,
            )
            .await;
        assert_eq!(reply.outcome, ChatOutcome::Fallback);
        assert_eq!(
            reply.text,
            "AI (Mock): Offline. Echo → \"is anyone there?\""
        );
    }
}
