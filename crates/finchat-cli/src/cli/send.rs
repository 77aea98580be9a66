//! One-shot `finchat send`: start a chat, send one message, print the reply.

use std::io::Write;

use anyhow::bail;
use serde::Serialize;

use finchat_core::chat::{ChatService, ChatSession, InitOutcome, SubmitOutcome};
use finchat_infra::chatbot::HttpChatService;
use finchat_types::config::ChatbotConfig;

use super::chat::renderer::ChatRenderer;

/// JSON shape printed by `finchat send --json`.
#[derive(Debug, Serialize)]
pub struct SendReport {
    pub session_id: String,
    pub context_ids: Vec<i64>,
    pub message: String,
    pub reply: String,
}

/// Send `message` through a fresh session and print the reply.
pub async fn send_message(
    config: &ChatbotConfig,
    context_ids: Vec<i64>,
    message: &str,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let service = HttpChatService::from_config(config)?;
    let session = ChatSession::new(service).with_event_capacity(config.event_capacity);

    let spinner = if json || quiet {
        indicatif::ProgressBar::hidden()
    } else {
        let spinner = indicatif::ProgressBar::new_spinner();
        if let Ok(template) =
            indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(template);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    };

    let result = exchange(&session, &context_ids, message).await;
    spinner.finish_and_clear();
    session.teardown();
    let reply = result?;

    let mut stdout = std::io::stdout().lock();
    if json {
        let report = SendReport {
            session_id: session.id().to_string(),
            context_ids,
            message: message.to_string(),
            reply,
        };
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let rendered = ChatRenderer::new().render_final(&reply);
        writeln!(stdout, "{}", rendered.trim_end())?;
    }
    Ok(())
}

/// Initialize, then submit once. Anything short of a reply is an error.
async fn exchange<S: ChatService>(
    session: &ChatSession<S>,
    context_ids: &[i64],
    message: &str,
) -> anyhow::Result<String> {
    match session.initialize(context_ids).await {
        InitOutcome::Started | InitOutcome::AlreadyActive => {}
        InitOutcome::Failed(failure) => bail!("{failure}"),
        other => bail!("chat did not start: {other:?}"),
    }

    match session.submit(message).await {
        SubmitOutcome::Replied(reply) => Ok(reply),
        SubmitOutcome::Failed(failure) => bail!("{failure}"),
        SubmitOutcome::Rejected(reason) => bail!("message not sent: {reason:?}"),
        SubmitOutcome::Abandoned => bail!("reply abandoned before it arrived"),
    }
}
