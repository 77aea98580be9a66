//! Main chat loop orchestration.
//!
//! Builds a session against the configured chat service, starts the chat for
//! the requested products, then reads lines until the user exits. While a
//! session call is outstanding the loop renders the session's events as they
//! arrive. The session is torn down on every exit path.

use std::future::Future;
use std::io::{self, Write};

use console::style;
use tokio::sync::broadcast;
use tracing::{info, warn};

use finchat_core::chat::{ChatService, ChatSession, InitOutcome, RejectReason, SubmitOutcome};
use finchat_infra::chatbot::HttpChatService;
use finchat_types::chat::{TurnAuthor, TurnContent};
use finchat_types::config::ChatbotConfig;
use finchat_types::event::SessionEvent;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::view::{ChatView, ViewMode};

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    config: &ChatbotConfig,
    context_ids: Vec<i64>,
    mode: ViewMode,
) -> anyhow::Result<()> {
    let service = HttpChatService::from_config(config)?;
    let mut session = ChatSession::new(service).with_event_capacity(config.event_capacity);
    if let Some(greeting) = config.greeting_text() {
        session = session.with_greeting(greeting);
    }
    let mut events = session.subscribe();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut view = ChatView::new(writer, mode);

    if mode == ViewMode::Styled {
        print_welcome_banner(
            view.out(),
            &config.base_url,
            &context_ids,
            &session.id().to_string(),
        )?;
    }

    let result = chat(&session, &context_ids, &mut events, &mut view, &mut chat_input).await;

    session.teardown();
    chat_input.flush();
    info!(session_id = %session.id(), turns = session.snapshot().len(), "chat ended");
    result
}

async fn chat<S, W>(
    session: &ChatSession<S>,
    context_ids: &[i64],
    events: &mut broadcast::Receiver<SessionEvent>,
    view: &mut ChatView<W>,
    chat_input: &mut ChatInput,
) -> anyhow::Result<()>
where
    S: ChatService,
    W: Write,
{
    // The greeting is seeded before anyone subscribes.
    if let Some(greeting) = session.snapshot().last().cloned() {
        if view.mode() != ViewMode::Json {
            view.write_turn(&greeting)?;
        }
    }

    start(session, context_ids, events, view).await?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                view.notice("-", "Press Ctrl+D to exit, or keep chatting.")?;
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(view.out())?,
                ChatCommand::History => write_history(session, view)?,
                ChatCommand::Status => write_status(session, view)?,
                ChatCommand::Retry => start(session, context_ids, events, view).await?,
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => view.notice(
                    "?",
                    &format!("Unknown command: {name}. Type /help for available commands."),
                )?,
            }
            continue;
        }

        if text.trim().is_empty() {
            continue;
        }

        match drive(session.submit(&text), events, view).await? {
            SubmitOutcome::Replied(_) | SubmitOutcome::Failed(_) => {}
            SubmitOutcome::Rejected(RejectReason::NotActive) => {
                view.notice("!", "Not connected to the assistant. Type /retry to reconnect.")?;
            }
            SubmitOutcome::Rejected(RejectReason::AwaitingReply) => {
                view.notice("!", "Still waiting for the previous reply.")?;
            }
            SubmitOutcome::Rejected(RejectReason::EmptyInput) => {}
            SubmitOutcome::Rejected(RejectReason::TornDown) | SubmitOutcome::Abandoned => break,
        }
    }

    if view.mode() == ViewMode::Styled {
        writeln!(view.out(), "\n  {}", style("Session ended.").dim())?;
    }
    Ok(())
}

/// Run `initialize` and report anything other than a fresh start.
async fn start<S, W>(
    session: &ChatSession<S>,
    context_ids: &[i64],
    events: &mut broadcast::Receiver<SessionEvent>,
    view: &mut ChatView<W>,
) -> io::Result<()>
where
    S: ChatService,
    W: Write,
{
    match drive(session.initialize(context_ids), events, view).await? {
        InitOutcome::Started => Ok(()),
        InitOutcome::AlreadyActive => view.notice("-", "Already connected."),
        InitOutcome::AlreadyStarting => view.notice("-", "Still connecting."),
        InitOutcome::Failed(failure) => {
            warn!(session_id = %session.id(), "chat did not start: {failure}");
            view.notice(
                "!",
                &format!("Could not start the chat ({}). Type /retry to try again.", failure.cause()),
            )
        }
        InitOutcome::TornDown => Ok(()),
    }
}

/// Await a session call, rendering the events it publishes meanwhile.
async fn drive<F, W>(
    call: F,
    events: &mut broadcast::Receiver<SessionEvent>,
    view: &mut ChatView<W>,
) -> io::Result<F::Output>
where
    F: Future,
    W: Write,
{
    tokio::pin!(call);
    let mut open = true;
    let output = loop {
        tokio::select! {
            output = &mut call => break output,
            received = events.recv(), if open => match received {
                Ok(event) => view.handle(&event)?,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "chat view fell behind the session");
                }
                Err(broadcast::error::RecvError::Closed) => open = false,
            },
        }
    };

    while let Ok(event) = events.try_recv() {
        view.handle(&event)?;
    }
    Ok(output)
}

fn write_history<S, W>(session: &ChatSession<S>, view: &mut ChatView<W>) -> io::Result<()>
where
    S: ChatService,
    W: Write,
{
    let snapshot = session.snapshot();
    let out = view.out();
    writeln!(out)?;
    if snapshot.is_empty() {
        writeln!(out, "  {}", style("No messages yet.").dim())?;
    }
    for turn in &snapshot {
        let label = match turn.author {
            TurnAuthor::User => style("You").green().bold(),
            TurnAuthor::Assistant => style("Assistant").cyan().bold(),
        };
        let body = match &turn.content {
            TurnContent::Text { text } => preview(text),
            TurnContent::Pending => style("(waiting for reply)").dim().to_string(),
            TurnContent::Failed { reason } => style(format!("(failed: {reason})")).red().to_string(),
        };
        writeln!(out, "  {label} {body}")?;
    }
    writeln!(out)
}

fn write_status<S, W>(session: &ChatSession<S>, view: &mut ChatView<W>) -> io::Result<()>
where
    S: ChatService,
    W: Write,
{
    let snapshot = session.snapshot();
    let out = view.out();
    writeln!(out)?;
    writeln!(out, "  {}   {}", style("Session:").bold(), session.id())?;
    writeln!(out, "  {}    {}", style("Status:").bold(), session.status())?;
    writeln!(out, "  {}   {}", style("Waiting:").bold(), session.is_waiting_for_reply())?;
    writeln!(out, "  {}  {:?}", style("Products:").bold(), session.context_ids())?;
    writeln!(out, "  {}  {}", style("Messages:").bold(), snapshot.len())?;
    writeln!(out)
}

/// Shorten long turns for `/history`.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 100;
    if text.chars().count() > MAX_CHARS {
        let cut: String = text.chars().take(MAX_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finchat_types::error::ChatServiceError;

    struct FixedService {
        start_ok: bool,
    }

    impl ChatService for FixedService {
        async fn start_chat(&self, _ids: &[i64]) -> Result<(), ChatServiceError> {
            if self.start_ok {
                Ok(())
            } else {
                Err(ChatServiceError::Transport("connection refused".to_string()))
            }
        }

        async fn send_message(&self, message: &str) -> Result<String, ChatServiceError> {
            Ok(format!("re: {message}"))
        }
    }

    fn text(view: &mut ChatView<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(view.out())).unwrap()
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        let long = "ą".repeat(150);
        let shortened = preview(&long);
        assert!(shortened.ends_with("..."));
        assert_eq!(shortened.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_drive_renders_reply_events() {
        let session = ChatSession::new(FixedService { start_ok: true });
        let mut events = session.subscribe();
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);

        start(&session, &[1], &mut events, &mut view).await.unwrap();
        let outcome = drive(session.submit("rates?"), &mut events, &mut view)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Replied("re: rates?".to_string()));
        assert!(text(&mut view).contains("re: rates?"));
    }

    #[tokio::test]
    async fn test_failed_start_suggests_retry() {
        let session = ChatSession::new(FixedService { start_ok: false });
        let mut events = session.subscribe();
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);

        start(&session, &[], &mut events, &mut view).await.unwrap();

        let output = text(&mut view);
        assert!(output.contains("connection refused"));
        assert!(output.contains("/retry"));
    }

    #[tokio::test]
    async fn test_history_and_status_describe_the_session() {
        let session = ChatSession::new(FixedService { start_ok: true }).with_greeting("Hi!");
        let mut events = session.subscribe();
        let mut view = ChatView::new(Vec::new(), ViewMode::Quiet);
        start(&session, &[42], &mut events, &mut view).await.unwrap();
        drive(session.submit("hello"), &mut events, &mut view)
            .await
            .unwrap();
        text(&mut view);

        write_history(&session, &mut view).unwrap();
        let history = text(&mut view);
        assert!(history.contains("Hi!"));
        assert!(history.contains("hello"));
        assert!(history.contains("re: hello"));

        write_status(&session, &mut view).unwrap();
        let status = text(&mut view);
        assert!(status.contains("active"));
        assert!(status.contains("[42]"));
        assert!(
            status
                .lines()
                .any(|line| line.contains("Messages:") && line.trim_end().ends_with('3'))
        );
    }
}
