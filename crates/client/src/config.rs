//! Client configuration

use std::time::Duration;

/// API host used when no override is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides the API host
pub const BASE_URL_ENV: &str = "MEDPORTAL_API_URL";

const DEFAULT_USER_AGENT: &str = concat!("medportal-client/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`PortalClient`](crate::PortalClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including any path prefix, without a trailing slash
    pub base_url: String,
    /// Overall per-request timeout; `None` leaves reqwest's default
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Default configuration with the base URL taken from `MEDPORTAL_API_URL`
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Absolute URL for an API path such as `/auth/login`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ClientConfig::new("http://api.example.com/api/");
        assert_eq!(config.base_url, "http://api.example.com/api");
        assert_eq!(
            config.url("/auth/login"),
            "http://api.example.com/api/auth/login"
        );
        assert_eq!(config.url("patients/"), "http://api.example.com/api/patients/");
    }

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("medportal-client/"));
    }
}
