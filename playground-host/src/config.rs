//! Host configuration.
//!
//! All configuration is read from environment variables; there is no config file.
//! Keys are centralized in [`env_keys`].

use playground_sandbox::RuntimeAssets;
use std::path::PathBuf;
use std::time::Duration;

pub mod env_keys {
    pub const PLAYGROUND_LOG_LEVEL: &str = "PLAYGROUND_LOG_LEVEL";
    pub const PLAYGROUND_LOG_JSON: &str = "PLAYGROUND_LOG_JSON";
    pub const PLAYGROUND_QUIET: &str = "PLAYGROUND_QUIET";
    pub const PLAYGROUND_REACT_URL: &str = "PLAYGROUND_REACT_URL";
    pub const PLAYGROUND_REACT_DOM_URL: &str = "PLAYGROUND_REACT_DOM_URL";
    pub const PLAYGROUND_BABEL_URL: &str = "PLAYGROUND_BABEL_URL";
    pub const PLAYGROUND_AUTO_RUN: &str = "PLAYGROUND_AUTO_RUN";
    pub const PLAYGROUND_RUN_SETTLE_MS: &str = "PLAYGROUND_RUN_SETTLE_MS";
    pub const PLAYGROUND_DATA_DIR: &str = "PLAYGROUND_DATA_DIR";
}

const DEFAULT_LOG_LEVEL: &str = "playground=info";
const DEFAULT_RUN_SETTLE_MS: u64 = 500;
const DEFAULT_DATA_DIR: &str = ".playground";

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub log_level: String,
    pub log_json: bool,
    pub quiet: bool,
    pub assets: RuntimeAssets,
    /// Run as soon as a session opens or its exercise changes.
    pub auto_run: bool,
    /// How long a run reports busy after it starts.
    pub run_settle: Duration,
    pub data_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
            quiet: false,
            assets: RuntimeAssets::default(),
            auto_run: true,
            run_settle: Duration::from_millis(DEFAULT_RUN_SETTLE_MS),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use env_keys::*;

        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let assets = RuntimeAssets {
            react_url: non_empty(PLAYGROUND_REACT_URL).unwrap_or(defaults.assets.react_url),
            react_dom_url: non_empty(PLAYGROUND_REACT_DOM_URL)
                .unwrap_or(defaults.assets.react_dom_url),
            babel_url: non_empty(PLAYGROUND_BABEL_URL).unwrap_or(defaults.assets.babel_url),
        };

        Self {
            log_level: non_empty(PLAYGROUND_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_json: non_empty(PLAYGROUND_LOG_JSON)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.log_json),
            quiet: non_empty(PLAYGROUND_QUIET)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.quiet),
            assets,
            auto_run: non_empty(PLAYGROUND_AUTO_RUN)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.auto_run),
            run_settle: non_empty(PLAYGROUND_RUN_SETTLE_MS)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.run_settle),
            data_dir: non_empty(PLAYGROUND_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    /// The level filter actually applied: quiet wins over the configured level.
    pub fn effective_log_level(&self) -> String {
        if self.quiet {
            "playground=warn".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
