//! ChatService trait definition.
//!
//! The remote assistant is reached through this port. Uses RPITIT so
//! implementations can be plain `async fn`s.

use std::future::Future;

use finchat_types::error::ChatServiceError;

/// The two operations the remote chat service exposes.
///
/// Implementations live in finchat-infra (e.g., `HttpChatService`). Transport
/// concerns (headers, timeouts, pooling) belong to the implementation.
pub trait ChatService: Send + Sync {
    /// Open a chat scoped to the given context identifiers.
    fn start_chat(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<(), ChatServiceError>> + Send;

    /// Send one user message and receive the assistant's reply text.
    fn send_message(
        &self,
        message: &str,
    ) -> impl Future<Output = Result<String, ChatServiceError>> + Send;
}
