//! `linkscrub clean <url>` – one-shot resolve + filter for a single URL.

use anyhow::Result;
use linkscrub_core::config::ScrubConfig;
use linkscrub_core::{filter, pipeline};

pub async fn run_clean(cfg: &ScrubConfig, url: &str, no_resolve: bool) -> Result<()> {
    let rules = cfg.rule_store();

    let cleaned = if no_resolve {
        filter::filter_url(url, &rules)
    } else {
        let probe = cfg.probe();
        let max_hops = cfg.max_hops;
        let url = url.to_string();
        tokio::task::spawn_blocking(move || pipeline::scrub_url(&url, &rules, &probe, max_hops))
            .await?
    };

    println!("{cleaned}");
    Ok(())
}
