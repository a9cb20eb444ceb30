//! `linkscrub set-webhook <url>` – point the Bot API at this deployment.

use anyhow::Result;

use crate::telegram::TelegramClient;

pub async fn run_set_webhook(url: &str) -> Result<()> {
    let client = TelegramClient::from_env()?;
    client.set_webhook(url).await?;
    println!("Webhook set to {url}");
    Ok(())
}
