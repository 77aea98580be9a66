//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the session.

use std::io::{self, Write};

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Print the conversation so far.
    History,
    /// Show session status.
    Status,
    /// Retry start-chat after it failed.
    Retry,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/history" => Some(ChatCommand::History),
        "/status" => Some(ChatCommand::Status),
        "/retry" => Some(ChatCommand::Retry),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Write the help text listing all available commands.
pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    writeln!(out, "  {}    Show this help message", style("/help").cyan())?;
    writeln!(out, "  {} Show the conversation so far", style("/history").cyan())?;
    writeln!(out, "  {}  Show session status", style("/status").cyan())?;
    writeln!(out, "  {}   Reconnect if the chat failed to start", style("/retry").cyan())?;
    writeln!(out, "  {}   Clear the screen", style("/clear").cyan())?;
    writeln!(out, "  {}    End the chat session", style("/exit").cyan())?;
    writeln!(out)?;
    writeln!(out, "  {}", style("Ctrl+D to exit").dim())?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("  /STATUS  "), Some(ChatCommand::Status));
        assert_eq!(parse("/retry now"), Some(ChatCommand::Retry));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("what about /help?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut out = Vec::new();
        print_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for cmd in ["/help", "/history", "/status", "/retry", "/clear", "/exit"] {
            assert!(text.contains(cmd), "help is missing {cmd}");
        }
    }
}
