//! Client configuration

use crate::{ClientResult, HttpClient};

/// Default backend API root
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the delivery backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | MILKRUN_API_URL | http://localhost:5001/api | API root |
/// | MILKRUN_API_TOKEN | (unset) | Bearer token |
/// | MILKRUN_TIMEOUT_SECS | 30 | Request timeout |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root (e.g., "http://localhost:5001/api")
    pub base_url: String,

    /// JWT token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config =
            Self::new(lookup("MILKRUN_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()));
        if let Some(token) = lookup("MILKRUN_API_TOKEN").filter(|t| !t.is_empty()) {
            config.token = Some(token);
        }
        config.timeout = lookup("MILKRUN_TIMEOUT_SECS")
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        config
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, 30);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("MILKRUN_API_URL", "https://milk.example.com/api"),
            ("MILKRUN_API_TOKEN", "abc"),
            ("MILKRUN_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.base_url, "https://milk.example.com/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_bad_timeout_and_empty_token_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("MILKRUN_API_TOKEN", ""),
            ("MILKRUN_TIMEOUT_SECS", "soon"),
        ]));
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://h/api")
            .with_token("t")
            .with_timeout(3);
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.timeout, 3);
    }
}
