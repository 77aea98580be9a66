use thiserror::Error;

/// Errors from calls to the remote chat service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("chat service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// The two ways a chat session can fail against the remote service.
///
/// Neither is surfaced to the end user as an error state; both are logged
/// where the remote call is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionFailure {
    #[error("start-chat failed: {0}")]
    Start(ChatServiceError),

    #[error("send-message failed: {0}")]
    Send(ChatServiceError),
}

impl SessionFailure {
    /// The underlying service error.
    pub fn cause(&self) -> &ChatServiceError {
        match self {
            SessionFailure::Start(err) | SessionFailure::Send(err) => err,
        }
    }
}

/// Violations of the message log's shape rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("an assistant reply is already pending")]
    PendingOutstanding,

    #[error("no pending turn to resolve")]
    NothingPending,

    #[error("a pending turn cannot be resolved to another pending marker")]
    PendingResolution,
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ChatServiceError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "chat service returned HTTP 503: unavailable");
    }

    #[test]
    fn test_session_failure_wraps_cause() {
        let failure = SessionFailure::Send(ChatServiceError::Timeout);
        assert_eq!(failure.to_string(), "send-message failed: request timed out");
        assert_eq!(failure.cause(), &ChatServiceError::Timeout);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Parse {
            path: "/tmp/config.toml".to_string(),
            message: "expected `=`".to_string(),
        };
        assert!(err.to_string().contains("/tmp/config.toml"));
        assert!(err.to_string().contains("expected `=`"));
    }
}
