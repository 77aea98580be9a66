//! Chat session abstractions for finchat.
//!
//! - `MessageLog`: ordered transcript with at most one pending reply
//! - `ChatService`: port to the remote assistant
//! - `ChatSession`: start-up and message lifecycle state machine

pub mod log;
pub mod service;
pub mod session;

pub use log::{LogSnapshot, MessageLog};
pub use service::ChatService;
pub use session::{ChatSession, InitOutcome, RejectReason, SubmitOutcome};
