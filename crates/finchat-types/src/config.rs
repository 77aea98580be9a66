//! Configuration types for finchat.
//!
//! `ChatbotConfig` represents the `config.toml` that points the assistant at
//! its remote chat service and controls session defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Greeting the dashboard assistant opens with.
pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";

/// Top-level configuration for the finchat assistant.
///
/// Loaded from `~/.finchat/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Base URL of the remote chat service (scheme + host + port).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request to the chat service.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Assistant turn seeded into a new session's log. An empty string
    /// starts the session with an empty log.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,

    /// Capacity of the session event channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_greeting() -> Option<String> {
    Some(DEFAULT_GREETING.to_string())
}

fn default_event_capacity() -> usize {
    64
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            greeting: default_greeting(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl ChatbotConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The greeting to seed, if any.
    pub fn greeting_text(&self) -> Option<&str> {
        self.greeting
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Check the values a running session depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ChatbotConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.event_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: ChatbotConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "https://bank.example.com"
request_timeout_secs = 5
greeting = "Welcome back"
event_capacity = 8
"#;
        let config: ChatbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://bank.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.greeting.as_deref(), Some("Welcome back"));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_blank_greeting_means_none() {
        let config: ChatbotConfig = toml::from_str("greeting = \"  \"").unwrap();
        assert_eq!(config.greeting_text(), None);
        assert_eq!(
            ChatbotConfig::default().greeting_text(),
            Some(DEFAULT_GREETING)
        );
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let config = ChatbotConfig {
            base_url: "localhost:8080".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("localhost:8080"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ChatbotConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_event_capacity() {
        let config = ChatbotConfig {
            event_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
