//! Per-message orchestration: extract, resolve, filter, rewrite.
//!
//! Blocking by design (the probe is libcurl); async callers wrap a call in
//! `tokio::task::spawn_blocking`.

use crate::extract;
use crate::filter;
use crate::probe::RedirectProbe;
use crate::resolve::{self, ResolutionOutcome};
use crate::rewrite;
use crate::rules::RuleStore;

/// Resolve-then-filter for one URL: the per-URL pipeline without the
/// rewrite step.
pub fn scrub_url(url: &str, rules: &RuleStore, probe: &dyn RedirectProbe, max_hops: usize) -> String {
    let resolution = resolve::resolve(url, max_hops, probe);
    match resolution.outcome {
        ResolutionOutcome::Final => {}
        ResolutionOutcome::HopLimit => {
            tracing::debug!("hop budget exhausted for {url}, using {}", resolution.url);
        }
        ResolutionOutcome::Degraded => {
            tracing::debug!("resolution degraded for {url}, using {}", resolution.url);
        }
    }
    filter_url_logged(&resolution.url, rules)
}

fn filter_url_logged(url: &str, rules: &RuleStore) -> String {
    let cleaned = filter::filter_url(url, rules);
    if cleaned != url {
        tracing::debug!("filtered {url} -> {cleaned}");
    }
    cleaned
}

/// Scrubs every URL found in `text`.
///
/// URLs are deduplicated and processed sequentially; each one resolves and
/// filters independently, so a dead shortener in one URL cannot affect the
/// others. Returns the rewritten text, or `None` when nothing changed;
/// callers must not redeliver on `None`.
pub fn scrub_text(
    text: &str,
    rules: &RuleStore,
    probe: &dyn RedirectProbe,
    max_hops: usize,
) -> Option<String> {
    let found = extract::extract(text);
    if found.is_empty() {
        return None;
    }

    // Dedupe, then longest first: the rewrite step depends on that order
    // when one URL is a prefix of another.
    let mut unique = found;
    unique.sort();
    unique.dedup();
    unique.sort_by(|a, b| b.len().cmp(&a.len()));

    let replacements: Vec<(String, String)> = unique
        .into_iter()
        .map(|original| {
            let cleaned = scrub_url(&original, rules, probe, max_hops);
            (original, cleaned)
        })
        .collect();

    rewrite::rewrite(text, &replacements)
}
