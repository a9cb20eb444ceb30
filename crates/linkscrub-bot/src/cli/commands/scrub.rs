//! `linkscrub scrub <text>` – run message text through the full pipeline.

use anyhow::Result;
use linkscrub_core::config::ScrubConfig;
use linkscrub_core::pipeline;

pub async fn run_scrub(cfg: &ScrubConfig, text: &str) -> Result<()> {
    let rules = cfg.rule_store();
    let probe = cfg.probe();
    let max_hops = cfg.max_hops;
    let owned = text.to_string();

    let scrubbed = tokio::task::spawn_blocking(move || {
        pipeline::scrub_text(&owned, &rules, &probe, max_hops)
    })
    .await?;

    // Unchanged text prints as-is so the command is pipe-friendly.
    match scrubbed {
        Some(cleaned) => println!("{cleaned}"),
        None => println!("{text}"),
    }
    Ok(())
}
