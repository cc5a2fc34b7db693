//! Centralized configuration loading from config.toml.
//!
//! Values come from config.toml (first match in the search path), fall back to
//! built-in defaults, and are finally overridden by environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::policy::PolicyKind;

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session registry limits.
#[derive(Debug, Deserialize)]
pub struct SessionsConfig {
    /// Maximum live sessions, 0 for no limit
    #[serde(default)]
    pub max_sessions: usize,
    /// Evict sessions idle for this many seconds, 0 disables eviction
    #[serde(default)]
    pub idle_ttl_secs: u64,
    /// Upper bound on one policy call
    #[serde(default = "default_policy_timeout_ms")]
    pub policy_timeout_ms: u64,
}

impl SessionsConfig {
    pub fn policy_timeout(&self) -> Duration {
        Duration::from_millis(self.policy_timeout_ms)
    }

    /// Idle TTL, or `None` when eviction is disabled
    pub fn idle_ttl(&self) -> Option<Duration> {
        (self.idle_ttl_secs > 0).then(|| Duration::from_secs(self.idle_ttl_secs))
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: 0,
            idle_ttl_secs: 0,
            policy_timeout_ms: default_policy_timeout_ms(),
        }
    }
}

/// Which policy answers AI move requests.
#[derive(Debug, Deserialize, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub kind: PolicyKind,
    /// Fixed seed for reproducible random play
    #[serde(default)]
    pub seed: Option<u64>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_policy_timeout_ms() -> u64 {
    2000
}

/// Environment variable naming an explicit config file
const CONFIG_ENV_VAR: &str = "TABLETOP_CONFIG";

/// Standard locations to search for config.toml
const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from web/)
    "/app/config.toml", // Docker container
];

/// Load configuration from config.toml, then apply environment overrides.
pub fn load_config() -> CentralConfig {
    let mut config = load_file();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

fn load_file() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    CentralConfig::default()
}

fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!("Failed to parse {}: {}, using defaults", path.display(), e);
            CentralConfig::default()
        }),
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            CentralConfig::default()
        }
    }
}

fn parse_config(content: &str) -> Result<CentralConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Values that fail to parse are logged and ignored.
pub fn apply_env_overrides(config: &mut CentralConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("WEB_HOST") {
        config.web.host = host;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.common.log_level = level;
    }
    override_parsed(&lookup, "WEB_PORT", &mut config.web.port);
    override_parsed(&lookup, "MAX_SESSIONS", &mut config.sessions.max_sessions);
    override_parsed(
        &lookup,
        "SESSION_IDLE_TTL_SECS",
        &mut config.sessions.idle_ttl_secs,
    );
    override_parsed(
        &lookup,
        "POLICY_TIMEOUT_MS",
        &mut config.sessions.policy_timeout_ms,
    );
    override_parsed(&lookup, "POLICY_KIND", &mut config.policy.kind);

    if let Some(raw) = lookup("POLICY_SEED") {
        match raw.parse() {
            Ok(seed) => config.policy.seed = Some(seed),
            Err(_) => warn!("Ignoring POLICY_SEED={}: not an unsigned integer", raw),
        }
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!("Ignoring {}={}: invalid value", key, raw),
        }
    }
}
