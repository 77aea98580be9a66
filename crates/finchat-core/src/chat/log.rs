//! Ordered transcript of a chat session.
//!
//! `MessageLog` only ever grows: turns are appended in chronological order
//! and the one permitted mutation is resolving the pending assistant turn
//! in place. Turns live behind an `Arc` so a `LogSnapshot` costs a reference
//! count bump; the log copies its turns only when it is mutated while a
//! snapshot is still alive.

use std::sync::Arc;

use finchat_types::chat::{ChatTurn, TurnContent};
use finchat_types::error::LogError;

/// Append-only sequence of chat turns with at most one pending turn.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Arc<Vec<ChatTurn>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that opens with an assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: Arc::new(vec![ChatTurn::assistant(greeting)]),
        }
    }

    /// Append a turn and return its index.
    ///
    /// Refuses a pending turn while another one is outstanding.
    pub fn append(&mut self, turn: ChatTurn) -> Result<usize, LogError> {
        if turn.is_pending() && self.has_pending() {
            return Err(LogError::PendingOutstanding);
        }
        let turns = Arc::make_mut(&mut self.turns);
        turns.push(turn);
        Ok(turns.len() - 1)
    }

    /// Replace the most recent pending turn's content and return its index.
    ///
    /// The turn keeps its author and creation time.
    pub fn resolve_last(&mut self, content: TurnContent) -> Result<usize, LogError> {
        if content.is_pending() {
            return Err(LogError::PendingResolution);
        }
        let index = self
            .turns
            .iter()
            .rposition(ChatTurn::is_pending)
            .ok_or(LogError::NothingPending)?;
        Arc::make_mut(&mut self.turns)[index].content = content;
        Ok(index)
    }

    pub fn has_pending(&self) -> bool {
        self.turns.iter().any(ChatTurn::is_pending)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Read-only view of the log as it is now.
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            turns: Arc::clone(&self.turns),
        }
    }
}

/// Frozen, read-only view of a `MessageLog`.
///
/// Later changes to the log are not visible through an existing snapshot.
/// `iter()` can be called any number of times; each call starts over from
/// the first turn.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    turns: Arc<Vec<ChatTurn>>,
}

impl LogSnapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Number of pending turns visible in this snapshot.
    pub fn pending_count(&self) -> usize {
        self.turns.iter().filter(|turn| turn.is_pending()).count()
    }
}

impl<'a> IntoIterator for &'a LogSnapshot {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finchat_types::chat::TurnAuthor;

    #[test]
    fn test_append_preserves_order() {
        let mut log = MessageLog::new();
        assert_eq!(log.append(ChatTurn::user("first")).unwrap(), 0);
        assert_eq!(log.append(ChatTurn::assistant("second")).unwrap(), 1);
        assert_eq!(log.append(ChatTurn::user("third")).unwrap(), 2);

        let texts: Vec<_> = log
            .snapshot()
            .iter()
            .filter_map(|turn| turn.content.as_text().map(str::to_string))
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_second_pending_turn_is_refused() {
        let mut log = MessageLog::new();
        log.append(ChatTurn::user("a")).unwrap();
        log.append(ChatTurn::pending()).unwrap();

        let err = log.append(ChatTurn::pending()).unwrap_err();
        assert_eq!(err, LogError::PendingOutstanding);
        assert_eq!(log.len(), 2);
        assert_eq!(log.snapshot().pending_count(), 1);
    }

    #[test]
    fn test_resolve_last_replaces_pending_in_place() {
        let mut log = MessageLog::new();
        log.append(ChatTurn::user("price?")).unwrap();
        log.append(ChatTurn::pending()).unwrap();
        let created_at = log.last().unwrap().created_at;

        let index = log.resolve_last(TurnContent::text("Ask support")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(log.len(), 2);

        let last = log.last().unwrap();
        assert_eq!(last.author, TurnAuthor::Assistant);
        assert_eq!(last.content.as_text(), Some("Ask support"));
        assert_eq!(last.created_at, created_at);
        assert!(!log.has_pending());
    }

    #[test]
    fn test_resolve_without_pending_fails() {
        let mut log = MessageLog::with_greeting("Hello");
        let err = log.resolve_last(TurnContent::text("late")).unwrap_err();
        assert_eq!(err, LogError::NothingPending);
        assert_eq!(log.last().unwrap().content.as_text(), Some("Hello"));
    }

    #[test]
    fn test_resolve_to_pending_fails() {
        let mut log = MessageLog::new();
        log.append(ChatTurn::pending()).unwrap();
        let err = log.resolve_last(TurnContent::Pending).unwrap_err();
        assert_eq!(err, LogError::PendingResolution);
    }

    #[test]
    fn test_snapshot_is_frozen_and_restartable() {
        let mut log = MessageLog::new();
        log.append(ChatTurn::user("one")).unwrap();
        let snapshot = log.snapshot();

        log.append(ChatTurn::user("two")).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(snapshot.len(), 1);

        let first_pass: Vec<_> = snapshot.iter().collect();
        let second_pass: Vec<_> = (&snapshot).into_iter().collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_greeting_log_starts_with_assistant_turn() {
        let log = MessageLog::with_greeting("Hello! How can I assist you today?");
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(0).unwrap().author, TurnAuthor::Assistant);
        assert!(!log.has_pending());
    }
}
