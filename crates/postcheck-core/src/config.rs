//! Project configuration for the posts API checks

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base URL of the public sandbox the scenarios target.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Content-Type sent by the read scenarios.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the API; scenario paths are appended verbatim
    pub base_url: String,

    /// Request timeout in seconds (`None` or `0` waits indefinitely)
    pub timeout_secs: Option<f64>,

    /// Directory receiving one log file per scenario
    pub log_dir: PathBuf,

    /// Content-Type header value for scenarios that send one
    pub json_content_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(30.0),
            log_dir: PathBuf::from("."),
            json_content_type: JSON_CONTENT_TYPE.to_string(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.postcheck.toml)
    ///
    /// Falls back to [`Config::default`] when no candidate file exists.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate file exists but cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".postcheck.toml", ".postcheck.json", "postcheck.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Full URL for a path relative to `base_url`.
    ///
    /// Plain concatenation: `base_url` is expected to end with `/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request timeout as a `Duration`, if one is configured.
    ///
    /// Non-finite or non-positive values disable the timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(std::time::Duration::from_secs_f64)
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# postcheck configuration

# API under test (scenario paths are appended to this)
base_url = "https://jsonplaceholder.typicode.com/"

# Request timeout in seconds (0 waits indefinitely)
timeout_secs = 30.0

# One log file per scenario is written here, named after the scenario
log_dir = "."

# Content-Type sent by the GET scenarios
# json_content_type = "application/json; charset=utf-8"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
