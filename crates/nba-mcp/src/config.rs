//! Server configuration
//!
//! Resolution order, lowest to highest precedence: built-in defaults, an
//! optional TOML file, command-line overrides. Configuration only wires the
//! process together; it never alters tool contracts.
//!
//! ```toml
//! base_url = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba"
//! timeout_secs = 30
//! user_agent = "nba-mcp/0.1.0"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::endpoint::DEFAULT_BASE_URL;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Root of the upstream API, without a trailing resource path
    pub base_url: String,
    /// Request timeout; `None` leaves the HTTP client default in place
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("nba-mcp/{}", env!("CARGO_PKG_VERSION"))
}

impl ServerConfig {
    /// Load configuration from a TOML file. Absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Parsed and checked base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base_url '{}': {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!(
                "base_url must use http or https, got '{}'",
                other
            ))),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check every field that can be malformed
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }
}
