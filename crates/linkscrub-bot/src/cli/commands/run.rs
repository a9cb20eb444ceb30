//! `linkscrub run` – start the webhook server.

use anyhow::{Context, Result};
use linkscrub_core::config::ScrubConfig;

use crate::server;
use crate::telegram::TelegramClient;

pub async fn run_serve(cfg: ScrubConfig) -> Result<()> {
    let client = TelegramClient::from_env()?;
    let bot_name = client
        .get_me()
        .await
        .context("bot token rejected by Telegram")?;
    tracing::info!("authorized as @{bot_name}");

    server::serve(cfg, client).await
}
