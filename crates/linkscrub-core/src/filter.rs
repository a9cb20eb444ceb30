//! Tracking-parameter removal.
//!
//! Applies the first matching domain rule (or the global deny list when no
//! rule matches) to a URL's query string. Parse failures return the input
//! unchanged; this function never fails.

use url::Url;

use crate::rules::{CleanMode, RuleStore};

/// Returns `url` with tracking parameters removed per `rules`.
///
/// Surviving parameters keep their original relative order; path and
/// fragment are untouched. A URL whose every parameter is removed loses
/// the `?` as well. Parameter names match exactly and case-sensitively.
pub fn filter_url(url: &str, rules: &RuleStore) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    let host = parsed.host_str().unwrap_or_default().to_string();
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let listed = |name: &str, list: &[String]| list.iter().any(|p| p == name);

    let survivors: Vec<(String, String)> = match rules.rule_for_host(&host) {
        Some(rule) => match rule.mode {
            CleanMode::Allow => pairs
                .into_iter()
                .filter(|(name, _)| listed(name, &rule.params))
                .collect(),
            // Global deny first, then the domain's own list; the net
            // effect is the union of both.
            CleanMode::Deny => pairs
                .into_iter()
                .filter(|(name, _)| {
                    !listed(name, rules.global_deny()) && !listed(name, &rule.params)
                })
                .collect(),
        },
        None => pairs
            .into_iter()
            .filter(|(name, _)| !listed(name, rules.global_deny()))
            .collect(),
    };

    if survivors.is_empty() {
        parsed.set_query(None);
    } else {
        let mut serializer = parsed.query_pairs_mut();
        serializer.clear();
        serializer.extend_pairs(survivors.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    parsed.to_string()
}
