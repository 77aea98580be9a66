//! JSON bodies exchanged with the remote chat service.

use serde::{Deserialize, Serialize};

/// Path of the session start endpoint, relative to the service base URL.
pub const START_CHAT_PATH: &str = "/api/v1/chatbot/start-chat";

/// Path of the message endpoint, relative to the service base URL.
pub const SEND_MESSAGE_PATH: &str = "/api/v1/chatbot/send-message";

/// Body of `POST /api/v1/chatbot/start-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatRequest {
    pub ids: Vec<i64>,
}

/// Body of `POST /api/v1/chatbot/send-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Response of `POST /api/v1/chatbot/send-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub response: String,
}
