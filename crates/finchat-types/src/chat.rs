//! Chat turn and session status types for finchat.
//!
//! These types model the conversation shown in the dashboard assistant:
//! who said something, what they said (or that a reply is still on its way),
//! and where the session is in its start-up lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnAuthor {
    User,
    Assistant,
}

impl fmt::Display for TurnAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnAuthor::User => write!(f, "user"),
            TurnAuthor::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnAuthor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnAuthor::User),
            "assistant" => Ok(TurnAuthor::Assistant),
            other => Err(format!("invalid turn author: '{other}'")),
        }
    }
}

/// What a chat turn holds.
///
/// `Pending` is the placeholder for an assistant reply that has been
/// requested but not received yet. It is replaced in place by either
/// `Text` (the reply arrived) or `Failed` (the request did not succeed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnContent {
    Text { text: String },
    Pending,
    Failed { reason: String },
}

impl TurnContent {
    /// Build a text content value.
    pub fn text(text: impl Into<String>) -> Self {
        TurnContent::Text { text: text.into() }
    }

    /// Build an error-marker content value.
    pub fn failed(reason: impl Into<String>) -> Self {
        TurnContent::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TurnContent::Pending)
    }

    /// The text of a resolved text turn, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TurnContent::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A single entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub author: TurnAuthor,
    pub content: TurnContent,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// A user turn carrying the text exactly as entered.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: TurnAuthor::User,
            content: TurnContent::text(text),
            created_at: Utc::now(),
        }
    }

    /// A resolved assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            author: TurnAuthor::Assistant,
            content: TurnContent::text(text),
            created_at: Utc::now(),
        }
    }

    /// The placeholder for an assistant reply still in flight.
    pub fn pending() -> Self {
        Self {
            author: TurnAuthor::Assistant,
            content: TurnContent::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.content.is_pending()
    }
}

/// Start-up status of a chat session.
///
/// `Inactive` is the initial state and the state a failed start returns to.
/// `Active` lasts for the rest of the session's life; there is no "ended"
/// status because a session simply goes away when its view is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Inactive,
    Starting,
    Active,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Inactive => write!(f, "inactive"),
            SessionStatus::Starting => write!(f, "starting"),
            SessionStatus::Active => write!(f, "active"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inactive" => Ok(SessionStatus::Inactive),
            "starting" => Ok(SessionStatus::Starting),
            "active" => Ok(SessionStatus::Active),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Inactive
    }
}
