//! Rendering of session events.
//!
//! `ChatView` turns the session's event stream into terminal output: a
//! spinner while start-chat or a reply is outstanding, the rendered reply
//! when it arrives, and a notice when it fails. In JSON mode every event is
//! written as one line instead.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use finchat_types::chat::{ChatTurn, SessionStatus, TurnAuthor, TurnContent};
use finchat_types::event::SessionEvent;

use super::renderer::ChatRenderer;

/// How the chat loop presents output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Styled,
    Quiet,
    Json,
}

pub struct ChatView<W: Write> {
    out: W,
    mode: ViewMode,
    renderer: ChatRenderer,
    spinner: Option<ProgressBar>,
}

impl<W: Write> ChatView<W> {
    pub fn new(out: W, mode: ViewMode) -> Self {
        let renderer = match mode {
            ViewMode::Styled => ChatRenderer::new(),
            ViewMode::Quiet | ViewMode::Json => ChatRenderer::plain(),
        };
        Self {
            out,
            mode,
            renderer,
            spinner: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// React to one session event.
    pub fn handle(&mut self, event: &SessionEvent) -> io::Result<()> {
        if self.mode == ViewMode::Json {
            let line = serde_json::to_string(event).map_err(io::Error::other)?;
            return writeln!(self.out, "{line}");
        }

        match event {
            SessionEvent::StatusChanged { status } => match status {
                SessionStatus::Starting => self.start_spinner("connecting..."),
                SessionStatus::Active | SessionStatus::Inactive => self.stop_spinner(),
            },
            SessionEvent::TurnAppended { turn, .. } if turn.is_pending() => {
                self.start_spinner("thinking...");
            }
            SessionEvent::TurnAppended { .. } => {}
            SessionEvent::TurnResolved { turn, .. } => {
                self.stop_spinner();
                self.write_turn(turn)?;
            }
            SessionEvent::WaitingChanged { .. } => {}
        }
        Ok(())
    }

    /// Write an assistant turn the way it appears in the conversation.
    pub fn write_turn(&mut self, turn: &ChatTurn) -> io::Result<()> {
        match &turn.content {
            TurnContent::Text { text } => match turn.author {
                TurnAuthor::Assistant => {
                    let rendered = self.renderer.render_final(text);
                    writeln!(self.out, "\n  {}\n", rendered.trim())
                }
                TurnAuthor::User => writeln!(self.out, "  {} {text}", style("You >").green().bold()),
            },
            TurnContent::Pending => writeln!(self.out, "  {}", style("...").dim()),
            TurnContent::Failed { reason } => writeln!(
                self.out,
                "\n  {} Could not get a reply: {}\n",
                style("!").red().bold(),
                style(reason).dim()
            ),
        }
    }

    /// Write a one-line notice.
    pub fn notice(&mut self, marker: &str, message: &str) -> io::Result<()> {
        if self.mode == ViewMode::Json {
            return Ok(());
        }
        writeln!(
            self.out,
            "\n  {} {message}\n",
            style(marker).yellow().bold()
        )
    }

    fn start_spinner(&mut self, message: &'static str) {
        if self.mode != ViewMode::Styled {
            return;
        }
        self.stop_spinner();
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl<W: Write> Drop for ChatView<W> {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: ChatView<Vec<u8>>) -> String {
        let mut view = view;
        String::from_utf8(std::mem::take(view.out())).unwrap()
    }

    #[test]
    fn test_resolved_reply_is_written() {
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);
        view.handle(&SessionEvent::TurnAppended {
            index: 1,
            turn: ChatTurn::pending(),
        })
        .unwrap();
        view.handle(&SessionEvent::TurnResolved {
            index: 1,
            turn: ChatTurn::assistant("Ask support"),
        })
        .unwrap();

        let text = output(view);
        assert!(text.contains("Ask support"));
        assert!(!text.contains("..."));
    }

    #[test]
    fn test_failed_reply_is_reported() {
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);
        view.handle(&SessionEvent::TurnResolved {
            index: 1,
            turn: ChatTurn {
                content: TurnContent::failed("request timed out"),
                ..ChatTurn::pending()
            },
        })
        .unwrap();

        let text = output(view);
        assert!(text.contains("Could not get a reply"));
        assert!(text.contains("request timed out"));
    }

    #[test]
    fn test_json_mode_writes_one_line_per_event() {
        let mut view = ChatView::new(Vec::new(), ViewMode::Json);
        view.handle(&SessionEvent::StatusChanged {
            status: SessionStatus::Active,
        })
        .unwrap();
        view.handle(&SessionEvent::WaitingChanged { waiting: true })
            .unwrap();
        view.notice("!", "ignored in json mode").unwrap();

        let text = output(view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "status_changed");
    }

    #[test]
    fn test_user_turns_are_not_echoed_on_append() {
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);
        view.handle(&SessionEvent::TurnAppended {
            index: 0,
            turn: ChatTurn::user("hello"),
        })
        .unwrap();
        assert!(output(view).is_empty());
    }
}
