use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::ShelfError;
use crate::types::GroupingVariant;

const DEFAULT_ARTICLES_URL: &str =
    "https://gist.githubusercontent.com/ayushsrawat/2892ac3ae430b11eb4a0336ceff15e5a/raw/articles.json";
const DEFAULT_ADMIN_URL: &str = "http://localhost:8888/.netlify/functions/update-gist";
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Read path
    pub articles_url: String,
    pub grouping: GroupingVariant,
    pub search_debounce: Duration,

    // Admin write path. Sent in plaintext as `X-Admin-Key`.
    pub admin_url: String,
    pub admin_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ShelfError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset keys fall back
    /// to defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShelfError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grouping = match lookup("SHELF_GROUPING") {
            Some(raw) => raw.parse()?,
            None => GroupingVariant::Website,
        };

        let debounce_ms = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ShelfError::Config(format!("SEARCH_DEBOUNCE_MS must be a number, got '{raw}'"))
            })?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        let web_port = match lookup("WEB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ShelfError::Config(format!("WEB_PORT must be a port number, got '{raw}'")))?,
            None => 3000,
        };

        Ok(Self {
            articles_url: lookup("ARTICLES_URL").unwrap_or_else(|| DEFAULT_ARTICLES_URL.to_string()),
            grouping,
            search_debounce: Duration::from_millis(debounce_ms),
            admin_url: lookup("ADMIN_URL").unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string()),
            admin_key: lookup("ADMIN_KEY").filter(|k| !k.is_empty()),
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }

    /// Log the effective configuration without the admin key.
    pub fn log_redacted(&self) {
        info!(
            articles_url = self.articles_url.as_str(),
            admin_url = self.admin_url.as_str(),
            admin_key = if self.admin_key.is_some() { "[set]" } else { "[unset]" },
            grouping = %self.grouping,
            search_debounce_ms = self.search_debounce.as_millis() as u64,
            web_host = self.web_host.as_str(),
            web_port = self.web_port,
            "Loaded config"
        );
    }
}
