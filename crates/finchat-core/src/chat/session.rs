//! Chat session state machine.
//!
//! `ChatSession` coordinates a `MessageLog` against a `ChatService`. It walks
//! `Inactive -> Starting -> Active` through `initialize`, and runs one
//! user/assistant exchange at a time through `submit`.
//!
//! Session state sits in a `std::sync::Mutex` that is never held across an
//! `.await`: every transition happens between suspension points, so there is
//! a single writer whenever state changes. Rejected input is a no-op that
//! reports why through the returned outcome rather than an error.
//!
//! Teardown cancels the session's lifetime token. Remote calls that resolve
//! afterwards leave the session untouched.

use std::sync::{Mutex, MutexGuard, PoisonError};

use finchat_types::chat::{ChatTurn, SessionStatus, TurnContent};
use finchat_types::error::{LogError, SessionFailure};
use finchat_types::event::SessionEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::chat::log::{LogSnapshot, MessageLog};
use crate::chat::service::ChatService;
use crate::event::EventBus;

/// Default capacity of the session event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Reason recorded on a pending turn whose `submit` future was dropped.
const ABANDONED_REPLY: &str = "reply abandoned before it arrived";

/// What an `initialize` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// start-chat succeeded; the session is now active.
    Started,
    /// Another `initialize` call is still waiting on start-chat.
    AlreadyStarting,
    /// The session was already active; nothing was sent.
    AlreadyActive,
    /// start-chat failed; the session is inactive again.
    Failed(SessionFailure),
    /// The session was torn down.
    TornDown,
}

/// Why `submit` ignored its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotActive,
    AwaitingReply,
    EmptyInput,
    TornDown,
}

/// What a `submit` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply arrived and resolved the pending turn.
    Replied(String),
    /// send-message failed; the pending turn became an error marker.
    Failed(SessionFailure),
    /// Preconditions did not hold; the log is unchanged.
    Rejected(RejectReason),
    /// The session was torn down while the reply was in flight.
    Abandoned,
}

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    log: MessageLog,
    pending_input: String,
    waiting_for_reply: bool,
    context_ids: Vec<i64>,
}

impl SessionState {
    /// Append the user turn and its pending reply as one step.
    fn push_exchange(&mut self, text: &str) -> Result<(usize, usize), LogError> {
        if self.log.has_pending() {
            return Err(LogError::PendingOutstanding);
        }
        let user = self.log.append(ChatTurn::user(text))?;
        let pending = self.log.append(ChatTurn::pending())?;
        Ok((user, pending))
    }
}

/// A single chat between the dashboard user and the remote assistant.
///
/// Share it behind an `Arc` when the hosting view needs to drive it from
/// more than one task.
pub struct ChatSession<S> {
    id: Uuid,
    service: S,
    state: Mutex<SessionState>,
    events: EventBus,
    lifetime: CancellationToken,
}

impl<S: ChatService> ChatSession<S> {
    /// Create an inactive session with an empty log.
    pub fn new(service: S) -> Self {
        Self {
            id: Uuid::now_v7(),
            service,
            state: Mutex::new(SessionState::default()),
            events: EventBus::new(DEFAULT_EVENT_CAPACITY),
            lifetime: CancellationToken::new(),
        }
    }

    /// Seed the log with an assistant greeting. Replaces any existing turns.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.state_mut().log = MessageLog::with_greeting(greeting);
        self
    }

    /// Replace the event channel. Existing subscribers stop receiving events.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.events = EventBus::new(capacity);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        self.lock().waiting_for_reply
    }

    /// Whether the input box and send button should be enabled.
    pub fn accepts_input(&self) -> bool {
        let state = self.lock();
        !self.lifetime.is_cancelled()
            && state.status == SessionStatus::Active
            && !state.waiting_for_reply
    }

    /// Context identifiers the session was started with.
    pub fn context_ids(&self) -> Vec<i64> {
        self.lock().context_ids.clone()
    }

    pub fn snapshot(&self) -> LogSnapshot {
        self.lock().log.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn pending_input(&self) -> String {
        self.lock().pending_input.clone()
    }

    /// Record what the user has typed but not sent yet.
    pub fn set_pending_input(&self, text: impl Into<String>) {
        self.lock().pending_input = text.into();
    }

    /// A token cancelled when this session is torn down or dropped.
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.child_token()
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// End the session. Later resolutions of in-flight calls are ignored.
    pub fn teardown(&self) {
        if !self.lifetime.is_cancelled() {
            info!(session_id = %self.id, "tearing down chat session");
        }
        self.lifetime.cancel();
    }

    /// Start the chat with the remote service.
    ///
    /// Only an `Inactive` session dispatches start-chat. Calls made while a
    /// start is in flight, or once the session is active, return without
    /// contacting the service, even if `context_ids` differ.
    pub async fn initialize(&self, context_ids: &[i64]) -> InitOutcome {
        {
            let mut state = self.lock();
            if self.lifetime.is_cancelled() {
                return InitOutcome::TornDown;
            }
            match state.status {
                SessionStatus::Starting => {
                    debug!(session_id = %self.id, "start-chat already in flight");
                    return InitOutcome::AlreadyStarting;
                }
                SessionStatus::Active => {
                    if state.context_ids != context_ids {
                        debug!(
                            session_id = %self.id,
                            ?context_ids,
                            "context ids changed after start; session keeps its original scope"
                        );
                    }
                    return InitOutcome::AlreadyActive;
                }
                SessionStatus::Inactive => {}
            }
            state.context_ids = context_ids.to_vec();
            self.set_status(&mut state, SessionStatus::Starting);
        }

        info!(session_id = %self.id, ids = ?context_ids, "starting chat");
        let flight = InFlight::new(self, Flight::Start);
        let result = self.service.start_chat(context_ids).await;
        flight.settle();

        let mut state = self.lock();
        if self.lifetime.is_cancelled() {
            debug!(session_id = %self.id, "start-chat resolved after teardown; ignoring");
            return InitOutcome::TornDown;
        }
        match result {
            Ok(()) => {
                self.set_status(&mut state, SessionStatus::Active);
                info!(session_id = %self.id, "chat session active");
                InitOutcome::Started
            }
            Err(err) => {
                self.set_status(&mut state, SessionStatus::Inactive);
                let failure = SessionFailure::Start(err);
                error!(session_id = %self.id, error = %failure, "chat session failed to start");
                InitOutcome::Failed(failure)
            }
        }
    }

    /// Send `text` as the next user turn and wait for the assistant's reply.
    ///
    /// The text is sent as entered; only the emptiness check trims it.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        {
            let mut state = self.lock();
            if let Err(reason) = self.check_submit(&state, text) {
                debug!(session_id = %self.id, ?reason, "input rejected");
                return SubmitOutcome::Rejected(reason);
            }
            let (user_index, pending_index) = match state.push_exchange(text) {
                Ok(indices) => indices,
                Err(err) => {
                    warn!(session_id = %self.id, error = %err, "message log refused new exchange");
                    return SubmitOutcome::Rejected(RejectReason::AwaitingReply);
                }
            };
            for index in [user_index, pending_index] {
                if let Some(turn) = state.log.get(index) {
                    self.events.publish(SessionEvent::TurnAppended {
                        index,
                        turn: turn.clone(),
                    });
                }
            }
            state.pending_input.clear();
            state.waiting_for_reply = true;
            self.events
                .publish(SessionEvent::WaitingChanged { waiting: true });
        }

        debug!(session_id = %self.id, chars = text.chars().count(), "sending message");
        let flight = InFlight::new(self, Flight::Reply);
        let result = self.service.send_message(text).await;
        flight.settle();

        let (content, outcome) = match result {
            Ok(reply) => (TurnContent::text(reply.clone()), SubmitOutcome::Replied(reply)),
            Err(err) => {
                let failure = SessionFailure::Send(err);
                error!(session_id = %self.id, error = %failure, "message send failed");
                (
                    TurnContent::failed(failure.cause().to_string()),
                    SubmitOutcome::Failed(failure),
                )
            }
        };

        if self.finish_reply(content) {
            outcome
        } else {
            debug!(session_id = %self.id, "reply arrived after teardown; dropping it");
            SubmitOutcome::Abandoned
        }
    }

    /// Submit whatever is currently in the pending input.
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let text = self.pending_input();
        self.submit(&text).await
    }

    fn check_submit(&self, state: &SessionState, text: &str) -> Result<(), RejectReason> {
        if self.lifetime.is_cancelled() {
            return Err(RejectReason::TornDown);
        }
        if state.status != SessionStatus::Active {
            return Err(RejectReason::NotActive);
        }
        if state.waiting_for_reply {
            return Err(RejectReason::AwaitingReply);
        }
        if text.trim().is_empty() {
            return Err(RejectReason::EmptyInput);
        }
        Ok(())
    }

    /// Resolve the pending turn and reopen the reply gate.
    ///
    /// Returns false, changing nothing, once the session is torn down.
    fn finish_reply(&self, content: TurnContent) -> bool {
        let mut state = self.lock();
        if self.lifetime.is_cancelled() {
            return false;
        }
        match state.log.resolve_last(content) {
            Ok(index) => {
                if let Some(turn) = state.log.get(index) {
                    self.events.publish(SessionEvent::TurnResolved {
                        index,
                        turn: turn.clone(),
                    });
                }
            }
            Err(err) => warn!(session_id = %self.id, error = %err, "could not resolve reply"),
        }
        state.waiting_for_reply = false;
        self.events
            .publish(SessionEvent::WaitingChanged { waiting: false });
        true
    }

    fn abandon_start(&self) {
        let mut state = self.lock();
        if self.lifetime.is_cancelled() || state.status != SessionStatus::Starting {
            return;
        }
        warn!(session_id = %self.id, "start-chat abandoned before it resolved");
        self.set_status(&mut state, SessionStatus::Inactive);
    }

    fn set_status(&self, state: &mut SessionState, status: SessionStatus) {
        state.status = status;
        self.events.publish(SessionEvent::StatusChanged { status });
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut SessionState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Drop for ChatSession<S> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

impl<S: ChatService> std::fmt::Debug for ChatSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("status", &state.status)
            .field("waiting_for_reply", &state.waiting_for_reply)
            .field("turns", &state.log.len())
            .field("torn_down", &self.lifetime.is_cancelled())
            .finish()
    }
}

enum Flight {
    Start,
    Reply,
}

/// Releases session state if the future awaiting a remote call is dropped.
struct InFlight<'a, S: ChatService> {
    session: &'a ChatSession<S>,
    flight: Flight,
    settled: bool,
}

impl<'a, S: ChatService> InFlight<'a, S> {
    fn new(session: &'a ChatSession<S>, flight: Flight) -> Self {
        Self {
            session,
            flight,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl<S: ChatService> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        match self.flight {
            Flight::Start => self.session.abandon_start(),
            Flight::Reply => {
                self.session
                    .finish_reply(TurnContent::failed(ABANDONED_REPLY));
            }
        }
    }
}
