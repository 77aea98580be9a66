//! Interactive CLI chat for finchat.
//!
//! Implements the chat loop: welcome banner, greeting, slash commands,
//! spinners while the assistant is working, and markdown-rendered replies.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod view;
