//! Infrastructure layer for finchat.
//!
//! Contains the HTTP implementation of the `ChatService` port defined in
//! `finchat-core` and the `config.toml` loader.

pub mod chatbot;
pub mod config;
