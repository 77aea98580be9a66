//! Remote chat service adapters.
//!
//! This module provides [`HttpChatService`], which implements the
//! [`ChatService`](finchat_core::chat::ChatService) port over the dashboard
//! backend's REST endpoints.

pub mod http;

pub use http::HttpChatService;
