//! Configuration for the API client.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default API location for a locally running server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Set the base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from `QB_API_URL` and `QB_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("QB_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(secs) = lookup("QB_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("QB_TIMEOUT_SECS: \"{secs}\"")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:3000");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_methods() {
        let cfg = ClientConfig::default()
            .with_base_url("https://game.example/api/")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(cfg.base_url, "https://game.example/api");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn lookup_overrides() {
        let cfg = ClientConfig::from_lookup(|key| match key {
            "QB_API_URL" => Some("http://10.0.0.2:3000".to_string()),
            "QB_TIMEOUT_SECS" => Some("30".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.base_url, "http://10.0.0.2:3000");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn lookup_bad_timeout() {
        let err = ClientConfig::from_lookup(|key| {
            (key == "QB_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
