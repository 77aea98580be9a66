//! HttpChatService -- concrete [`ChatService`] over the dashboard backend.
//!
//! Talks to `POST /api/v1/chatbot/start-chat` and
//! `POST /api/v1/chatbot/send-message` with JSON bodies. Every request
//! carries the client-wide timeout from [`ChatbotConfig`].

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use finchat_core::chat::ChatService;
use finchat_types::config::ChatbotConfig;
use finchat_types::error::ChatServiceError;
use finchat_types::wire::{
    SendMessageRequest, SendMessageResponse, StartChatRequest, SEND_MESSAGE_PATH, START_CHAT_PATH,
};

/// Chat service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatService {
    /// Create a client for the service at `base_url`.
    ///
    /// A trailing `/` on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatServiceError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ChatServiceError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and return the response if its status is 2xx.
    async fn post_json<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, ChatServiceError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn transport_error(err: reqwest::Error) -> ChatServiceError {
    if err.is_timeout() {
        ChatServiceError::Timeout
    } else {
        ChatServiceError::Transport(err.to_string())
    }
}

impl ChatService for HttpChatService {
    async fn start_chat(&self, ids: &[i64]) -> Result<(), ChatServiceError> {
        let body = StartChatRequest { ids: ids.to_vec() };
        // The response body carries nothing the session needs.
        self.post_json(START_CHAT_PATH, &body).await?;
        debug!(base_url = %self.base_url, ids = body.ids.len(), "start-chat accepted");
        Ok(())
    }

    async fn send_message(&self, message: &str) -> Result<String, ChatServiceError> {
        let body = SendMessageRequest {
            message: message.to_string(),
        };
        let response = self.post_json(SEND_MESSAGE_PATH, &body).await?;

        let reply: SendMessageResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ChatServiceError::Timeout
            } else {
                ChatServiceError::Deserialization(format!("failed to parse reply: {e}"))
            }
        })?;
        Ok(reply.response)
    }
}
