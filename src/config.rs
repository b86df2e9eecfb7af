//! Configuration loading for openclaw-snitch
//!
//! Two sources feed the guard: the plugin section of the host's
//! `openclaw.json`, and an optional TOML file for the CLI. Both are resolved
//! through [`GuardConfig::resolve`], which never fails.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Built-in blocklist used when none is configured
pub const DEFAULT_BLOCKLIST: &[&str] = &["clawhub", "clawdhub"];

/// Plugin id, also the key under `plugins.config` in the host config
pub const PLUGIN_ID: &str = "openclaw-snitch";

/// Environment variable holding a comma-separated blocklist override
pub const BLOCKLIST_ENV: &str = "SNITCH_BLOCKLIST";

/// Environment variable pointing at the host's config directory
pub const CONFIG_DIR_ENV: &str = "OPENCLAW_CONFIG_DIR";

fn default_blocklist() -> Vec<String> {
    DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect()
}

/// Resolved guard settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Terms whose appearance blocks a tool call
    pub blocklist: Vec<String>,

    /// Broadcast an alert after each block
    pub alert_telegram: bool,

    /// Inject the policy directive at agent bootstrap
    pub bootstrap_directive: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            blocklist: default_blocklist(),
            alert_telegram: true,
            bootstrap_directive: true,
        }
    }
}

impl GuardConfig {
    /// Resolve a raw, untrusted config object.
    ///
    /// A non-array `blocklist` falls back to the default list. Toggles are on
    /// unless explicitly `false`.
    pub fn resolve(raw: Option<&Value>) -> Self {
        let obj = raw.and_then(Value::as_object);
        let get = |camel: &str, snake: &str| obj.and_then(|o| o.get(camel).or_else(|| o.get(snake)));

        let blocklist = match obj.and_then(|o| o.get("blocklist")) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(other) => {
                tracing::warn!(value = %other, "blocklist is not an array, using defaults");
                default_blocklist()
            }
            None => default_blocklist(),
        };

        Self {
            blocklist,
            alert_telegram: !matches!(get("alertTelegram", "alert_telegram"), Some(Value::Bool(false))),
            bootstrap_directive: !matches!(
                get("bootstrapDirective", "bootstrap_directive"),
                Some(Value::Bool(false))
            ),
        }
    }

    /// Replace the blocklist with `SNITCH_BLOCKLIST` if it is set
    pub fn with_env_override(mut self) -> Self {
        if let Some(terms) = blocklist_from_env() {
            self.blocklist = terms;
        }
        self
    }
}

/// Split a comma-separated term list, trimming and dropping empty entries
pub fn parse_term_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Blocklist from `SNITCH_BLOCKLIST`, if set and non-blank
pub fn blocklist_from_env() -> Option<Vec<String>> {
    let raw = std::env::var(BLOCKLIST_ENV).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(parse_term_list(&raw))
}

/// The guard's section of a host config: `plugins.config.openclaw-snitch`
pub fn host_plugin_config(host: &Value) -> Option<&Value> {
    host.get("plugins")?.get("config")?.get(PLUGIN_ID)
}

/// General section of the TOML config
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some("~/.openclaw/snitch/audit.jsonl".to_string()),
        }
    }
}

/// CLI configuration file
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    /// Raw guard table, resolved leniently via [`GuardConfig::resolve`]
    pub guard: toml::Table,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            std::env::var_os(CONFIG_DIR_ENV).map(|d| PathBuf::from(d).join("snitch.toml")),
            dirs::home_dir().map(|p| p.join(".openclaw/snitch.toml")),
            Some(PathBuf::from("/etc/openclaw-snitch/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(error = %e, "ignoring config file"),
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Guard settings from the `[guard]` table
    pub fn guard(&self) -> GuardConfig {
        if self.guard.is_empty() {
            return GuardConfig::default();
        }
        let raw = serde_json::to_value(&self.guard).unwrap_or(Value::Null);
        GuardConfig::resolve(Some(&raw))
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded), if audit logging is on
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.openclaw/snitch/audit.jsonl"

[guard]
blocklist = ["clawhub", "clawdhub"]
alert_telegram = true
bootstrap_directive = true
"#;
