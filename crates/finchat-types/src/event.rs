//! Events published by a chat session.
//!
//! `SessionEvent` is what a presentation layer observes to keep its view of
//! a session current. All variants are Clone + Send + Sync for use with
//! tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatTurn, SessionStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved to a new start-up status.
    StatusChanged { status: SessionStatus },

    /// A turn was appended at `index`.
    TurnAppended { index: usize, turn: ChatTurn },

    /// The pending turn at `index` was resolved to `turn`.
    TurnResolved { index: usize, turn: ChatTurn },

    /// The reply gate opened or closed.
    WaitingChanged { waiting: bool },
}
