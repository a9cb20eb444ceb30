//! CLI for the linkscrub bot.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use linkscrub_core::{config, logging};

use commands::{run_clean, run_scrub, run_serve, run_set_webhook};

/// Top-level CLI for the linkscrub bot.
#[derive(Debug, Parser)]
#[command(name = "linkscrub")]
#[command(about = "linkscrub: URL tracking-parameter scrubber for Telegram", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Start the Telegram webhook server.
    Run,

    /// Resolve and clean a single URL, printing the result.
    Clean {
        /// HTTP/HTTPS URL to process.
        url: String,
        /// Skip redirect resolution and only strip parameters.
        #[arg(long)]
        no_resolve: bool,
    },

    /// Run a whole message text through the pipeline and print it.
    Scrub {
        /// Message text possibly containing URLs.
        text: String,
    },

    /// Register the webhook URL with the Telegram Bot API.
    SetWebhook {
        /// Publicly reachable HTTPS URL of the /webhook route.
        url: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run => {
                // File log under the XDG state dir, stderr when unavailable.
                if logging::init_logging().is_err() {
                    logging::init_logging_stderr();
                }
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_serve(cfg).await
            }
            CliCommand::Clean { url, no_resolve } => {
                logging::init_logging_stderr();
                let cfg = config::load_or_init()?;
                run_clean(&cfg, &url, no_resolve).await
            }
            CliCommand::Scrub { text } => {
                logging::init_logging_stderr();
                let cfg = config::load_or_init()?;
                run_scrub(&cfg, &text).await
            }
            CliCommand::SetWebhook { url } => {
                logging::init_logging_stderr();
                run_set_webhook(&url).await
            }
        }
    }
}
