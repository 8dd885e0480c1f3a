//! Environment configuration

use std::env;

/// Default log filter when `MATRICA_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default limit on a single input line, in bytes
pub const DEFAULT_MAX_LINE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Longer lines are rejected as invalid input
    pub max_line: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            max_line: DEFAULT_MAX_LINE,
        }
    }
}

impl Config {
    /// Read `MATRICA_LOG` and `MATRICA_MAX_LINE`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_filter: lookup("MATRICA_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            max_line: lookup("MATRICA_MAX_LINE")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_line),
        }
    }
}
