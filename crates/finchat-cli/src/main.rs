//! finchat CLI entry point.
//!
//! Binary name: `finchat`
//!
//! Parses CLI arguments, sets up tracing, resolves configuration, then
//! dispatches to the interactive chat loop or the one-shot send.

mod cli;

use clap::Parser;
use clap_complete::generate;

use finchat_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::chat::loop_runner::run_chat_loop;
use cli::chat::view::ViewMode;
use cli::products::collect_context_ids;
use cli::{resolve_config, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "finchat", &mut std::io::stdout());
        return Ok(());
    }

    // Set up tracing based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,finchat=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.base_url.clone()).await?;
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.request_timeout_secs, "configuration resolved");

    match cli.command {
        Commands::Chat { context } => {
            let context_ids = collect_context_ids(&context).await?;
            let mode = if cli.json {
                ViewMode::Json
            } else if cli.quiet {
                ViewMode::Quiet
            } else {
                ViewMode::Styled
            };
            run_chat_loop(&config, context_ids, mode).await?;
        }

        Commands::Send { message, context } => {
            let context_ids = collect_context_ids(&context).await?;
            cli::send::send_message(&config, context_ids, &message, cli.json, cli.quiet)
                .await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
