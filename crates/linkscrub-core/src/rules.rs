//! Per-domain cleaning rules.
//!
//! A `RuleStore` holds one global deny list plus an ordered table of
//! domain rules. Domain keys are matched by substring containment against
//! the URL host (`www.bilibili.com` matches the key `bilibili.com`), in
//! declaration order, first match wins.

use serde::{Deserialize, Serialize};

/// How a matched rule treats query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanMode {
    /// Keep only the named parameters, drop everything else.
    Allow,
    /// Drop the global deny list, then the named parameters.
    Deny,
}

/// One domain's cleaning rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningRule {
    pub mode: CleanMode,
    /// Parameter names, matched exactly and case-sensitively. Empty under
    /// `Allow` means "strip every parameter".
    pub params: Vec<String>,
}

/// Immutable rule table, constructed once at startup and passed by
/// reference into every filter call.
#[derive(Debug, Clone)]
pub struct RuleStore {
    global_deny: Vec<String>,
    domain_rules: Vec<(String, CleaningRule)>,
}

impl RuleStore {
    /// `domain_rules` keeps its order: it is the match order.
    pub fn new(global_deny: Vec<String>, domain_rules: Vec<(String, CleaningRule)>) -> Self {
        Self {
            global_deny,
            domain_rules,
        }
    }

    /// Parameters removed everywhere a matched rule does not override them.
    pub fn global_deny(&self) -> &[String] {
        &self.global_deny
    }

    /// First rule whose key is contained in `host`, scanning in
    /// declaration order.
    pub fn rule_for_host(&self, host: &str) -> Option<&CleaningRule> {
        self.domain_rules
            .iter()
            .find(|(key, _)| host.contains(key.as_str()))
            .map(|(_, rule)| rule)
    }
}

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleStore {
    /// Built-in table used when the config file carries no `[rules]`
    /// override.
    fn default() -> Self {
        let global_deny = params(&[
            // utm family
            "utm_source",
            "utm_medium",
            "utm_campaign",
            "utm_term",
            "utm_content",
            "utm_cid",
            "utm_reader",
            "utm_referrer",
            "utm_name",
            "utm_social",
            "utm_social-type",
            // ad click ids
            "fbclid",
            "gclid",
            "msclkid",
            "dclid",
            "twclid",
            "igshid",
            // share tokens
            "share_token",
            "share_id",
            "share_link_id",
            "sharer_shareid",
            "share_app_id",
            // platform catch-alls
            "si",
            "feature",
            "pp",
            "wt_z",
            "spm",
            "scm",
            "ref",
            "ref_src",
            "source",
            // mail/marketing
            "_hsenc",
            "_hsmi",
            "mc_cid",
            "mc_eid",
        ]);

        let domain_rules = vec![
            (
                "bilibili.com".to_string(),
                CleaningRule {
                    mode: CleanMode::Allow,
                    // video id, page, timestamp
                    params: params(&["p", "t", "bvid", "aid", "cid"]),
                },
            ),
            (
                "xiaohongshu.com".to_string(),
                CleaningRule {
                    mode: CleanMode::Deny,
                    // xsec_token / xsec_source stay: links 404 without them
                    params: params(&["xhsshare", "appuid", "apptime", "share_id", "source"]),
                },
            ),
            (
                "douyin.com".to_string(),
                CleaningRule {
                    mode: CleanMode::Deny,
                    params: params(&["share_token", "smid", "_d", "tt_from", "u_code", "iid", "did"]),
                },
            ),
            (
                "tiktok.com".to_string(),
                CleaningRule {
                    mode: CleanMode::Deny,
                    params: params(&["share_token", "smid", "_d", "tt_from", "u_code", "iid", "did"]),
                },
            ),
        ];

        Self::new(global_deny, domain_rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(entries: Vec<(&str, CleanMode, &[&str])>) -> RuleStore {
        RuleStore::new(
            params(&["tracker"]),
            entries
                .into_iter()
                .map(|(key, mode, names)| {
                    (
                        key.to_string(),
                        CleaningRule {
                            mode,
                            params: params(names),
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn substring_containment_matches_subdomains() {
        let rules = RuleStore::default();
        assert!(rules.rule_for_host("www.bilibili.com").is_some());
        assert!(rules.rule_for_host("bilibili.com").is_some());
        assert!(rules.rule_for_host("m.bilibili.com").is_some());
        assert!(rules.rule_for_host("example.com").is_none());
    }

    #[test]
    fn first_match_wins_in_declaration_order() {
        let rules = store(vec![
            ("video.example.com", CleanMode::Allow, &["a"]),
            ("example.com", CleanMode::Deny, &["b"]),
        ]);

        let rule = rules.rule_for_host("video.example.com").unwrap();
        assert_eq!(rule.mode, CleanMode::Allow);

        // A host matching only the broader key falls through to it.
        let rule = rules.rule_for_host("www.example.com").unwrap();
        assert_eq!(rule.mode, CleanMode::Deny);
    }

    #[test]
    fn no_match_returns_none() {
        let rules = store(vec![("example.com", CleanMode::Deny, &["b"])]);
        assert!(rules.rule_for_host("other.net").is_none());
        assert!(rules.rule_for_host("").is_none());
    }

    #[test]
    fn default_table_covers_known_platforms() {
        let rules = RuleStore::default();
        assert!(rules.global_deny().iter().any(|p| p == "utm_source"));
        assert!(rules.global_deny().iter().any(|p| p == "fbclid"));

        let bilibili = rules.rule_for_host("www.bilibili.com").unwrap();
        assert_eq!(bilibili.mode, CleanMode::Allow);
        assert!(bilibili.params.iter().any(|p| p == "bvid"));

        let tiktok = rules.rule_for_host("www.tiktok.com").unwrap();
        assert_eq!(tiktok.mode, CleanMode::Deny);
        assert!(tiktok.params.iter().any(|p| p == "share_token"));
    }
}
