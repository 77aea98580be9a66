//! Shared domain types for finchat.
//!
//! This crate contains the types used across the finchat workspace: chat
//! turns and session status, session events, the remote service wire
//! bodies, recommended products, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod product;
pub mod wire;
