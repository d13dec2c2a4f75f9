//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub dictionary: DictionaryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which matching strategy search sessions use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Full reading normalization, falling back to character folding on failure
    #[default]
    Normalized,
    /// Character folding only, resolved without suspending
    Sync,
}

/// Search-as-you-type behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Matching strategy
    #[serde(default)]
    pub mode: MatchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            mode: MatchMode::default(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

/// Script dictionary sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Load the bundled food vocabulary
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Extra TOML dictionary merged over the bundled one
    #[serde(default)]
    pub user_dictionary: Option<PathBuf>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            user_dictionary: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Include module targets in log lines
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_target: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
