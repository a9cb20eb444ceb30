use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::probe::CurlProbe;
use crate::resolve::DEFAULT_MAX_HOPS;
use crate::rules::{CleanMode, CleaningRule, RuleStore};

/// One `[[rules.domain]]` entry. Array order in the file is match order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRuleConfig {
    /// Substring matched against the URL host (e.g. "bilibili.com").
    pub key: String,
    /// "allow" keeps only `params`; "deny" drops them (after the global
    /// deny list).
    pub mode: CleanMode,
    #[serde(default)]
    pub params: Vec<String>,
}

/// Optional `[rules]` section replacing the built-in rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Parameters removed wherever no matching rule overrides them.
    #[serde(default)]
    pub global_deny: Vec<String>,
    /// Ordered domain rules.
    #[serde(default)]
    pub domain: Vec<DomainRuleConfig>,
}

/// Global configuration loaded from `~/.config/linkscrub/config.toml`.
///
/// The bot token is deliberately NOT part of the file; it is read from the
/// `LINKSCRUB_BOT_TOKEN` environment variable by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Address the webhook server binds to.
    pub listen_addr: String,
    /// Maximum redirect hops followed per URL.
    pub max_hops: usize,
    /// Per-hop connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-hop total timeout in seconds.
    pub hop_timeout_secs: u64,
    /// Telegram user ids allowed in private chats (empty = allow all).
    #[serde(default)]
    pub allowed_users: Vec<i64>,
    /// Telegram group ids the bot acts in (empty = allow all).
    #[serde(default)]
    pub allowed_groups: Vec<i64>,
    /// Group that receives links cleaned in private chats. When unset,
    /// cleaned text is sent back to the sender instead.
    #[serde(default)]
    pub target_group_id: Option<i64>,
    /// Replaces the built-in rule table when present.
    #[serde(default)]
    pub rules: Option<RulesConfig>,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8008".to_string(),
            max_hops: DEFAULT_MAX_HOPS,
            connect_timeout_secs: 10,
            hop_timeout_secs: 20,
            allowed_users: Vec::new(),
            allowed_groups: Vec::new(),
            target_group_id: None,
            rules: None,
        }
    }
}

impl ScrubConfig {
    /// The rule store this process runs with: the `[rules]` override when
    /// present, the built-in table otherwise.
    pub fn rule_store(&self) -> RuleStore {
        match &self.rules {
            Some(rules) => RuleStore::new(
                rules.global_deny.clone(),
                rules
                    .domain
                    .iter()
                    .map(|entry| {
                        (
                            entry.key.clone(),
                            CleaningRule {
                                mode: entry.mode,
                                params: entry.params.clone(),
                            },
                        )
                    })
                    .collect(),
            ),
            None => RuleStore::default(),
        }
    }

    /// Probe configured with this process's per-hop timeouts.
    pub fn probe(&self) -> CurlProbe {
        CurlProbe {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.hop_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkscrub")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScrubConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScrubConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ScrubConfig = toml::from_str(&data)?;
    Ok(cfg)
}
