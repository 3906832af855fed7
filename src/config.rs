//! Analysis configuration.
//!
//! Defaults come from this module; an optional `phaudit.toml` at the
//! analysis root overrides them, and CLI flags override both.

use std::error::Error;
use std::path::Path;

use serde::Deserialize;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "phaudit.toml";

/// Directories excluded from analysis unless overridden.
pub const DEFAULT_EXCLUDES: &[&str] = &["vendor", "node_modules", "storage", "bootstrap/cache"];

/// Minimum body line span for a method to enter duplication analysis.
pub const DEFAULT_MIN_LINES: usize = 5;

/// Jaccard score at or above which a pair is reported as duplication.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Maximum method length before a `method_size` finding.
pub const DEFAULT_MAX_METHOD_LINES: usize = 15;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory names or glob patterns to skip.
    pub exclude: Vec<String>,
    pub min_lines: usize,
    pub similarity_threshold: f64,
    pub max_method_lines: usize,
    /// Run the external phpcs/phpmd bridge.
    pub lint: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            min_lines: DEFAULT_MIN_LINES,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_method_lines: DEFAULT_MAX_METHOD_LINES,
            lint: true,
        }
    }
}

impl Config {
    /// Load `phaudit.toml` from the analysis root, falling back to
    /// defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Config, Box<dyn Error>> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&text)
            .map_err(|err| format!("{}: {err}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
