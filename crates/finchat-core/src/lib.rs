//! Chat session logic and service port for finchat.
//!
//! This crate defines the `ChatService` port that the infrastructure layer
//! implements, and the session state machine that drives it. It depends
//! only on `finchat-types` -- never on `finchat-infra` or any HTTP crate.

pub mod chat;
pub mod event;
