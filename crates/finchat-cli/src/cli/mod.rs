//! CLI command definitions for the `finchat` binary.
//!
//! Uses clap derive macros for argument parsing. Global flags control output
//! format, verbosity, and where the chat service lives.

pub mod chat;
pub mod products;
pub mod send;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use finchat_infra::config::{
    apply_base_url_override, base_url_from_env, load_config, load_config_file, resolve_data_dir,
};
use finchat_types::config::ChatbotConfig;

/// Talk to the dashboard's product assistant from the terminal.
#[derive(Parser)]
#[command(name = "finchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and replies.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of ~/.finchat/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chat service base URL (overrides config and FINCHAT_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat with the assistant.
    Chat {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Send a single message and print the reply.
    Send {
        /// Message text, sent as typed.
        message: String,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Products the chat is scoped to.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Recommended product id to scope the chat to (repeatable).
    #[arg(long = "product-id", value_name = "ID")]
    pub product_ids: Vec<i64>,

    /// JSON file holding an array of recommended products.
    #[arg(long, value_name = "FILE")]
    pub products: Option<PathBuf>,
}

/// Load the configuration and apply command-line and environment overrides.
pub async fn resolve_config(
    config_path: Option<&Path>,
    base_url: Option<String>,
) -> anyhow::Result<ChatbotConfig> {
    let mut config = match config_path {
        Some(path) => load_config_file(path).await?,
        None => load_config(&resolve_data_dir()).await,
    };
    apply_base_url_override(&mut config, base_url_from_env(), base_url);
    config.validate()?;
    Ok(config)
}
