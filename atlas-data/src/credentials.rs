//! Per-request tenant credentials

use std::fmt;

use crate::error::{AtlasError, Result};

/// Host used to derive the base URL when no override is supplied
pub const DEFAULT_DATA_API_HOST: &str = "https://data.mongodb-api.com/app";

/// Environment variables read by [`TenantCredentials::from_env`]
pub const ENV_API_KEY: &str = "MONGODB_API_KEY";
pub const ENV_APP_ID: &str = "MONGODB_APP_ID";
pub const ENV_DATA_SOURCE: &str = "MONGODB_DATA_SOURCE";
pub const ENV_BASE_URL: &str = "MONGODB_BASE_URL";

/// Credentials identifying which Atlas App, cluster and key a call targets
///
/// Supplied with every request and dropped at its end.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TenantCredentials {
    /// Data API key, sent as the `api-key` header
    pub api_key: String,
    /// Atlas App Services application ID
    pub app_id: String,
    /// Cluster name within the app
    pub data_source: String,
    /// Full base URL override (regional or self-hosted gateway)
    pub base_url: Option<String>,
}

impl TenantCredentials {
    pub fn new(
        api_key: impl Into<String>,
        app_id: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            app_id: app_id.into(),
            data_source: data_source.into(),
            base_url: None,
        }
    }

    /// Use the given base URL verbatim instead of deriving it from the App ID
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = if base_url.trim().is_empty() {
            None
        } else {
            Some(base_url)
        };
        self
    }

    /// Read credentials from `MONGODB_API_KEY`, `MONGODB_APP_ID`,
    /// `MONGODB_DATA_SOURCE` and `MONGODB_BASE_URL`
    ///
    /// Absent variables become empty strings; [`validate`](Self::validate)
    /// reports them.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let credentials = Self::new(var(ENV_API_KEY), var(ENV_APP_ID), var(ENV_DATA_SOURCE));
        match std::env::var(ENV_BASE_URL) {
            Ok(url) => credentials.with_base_url(url),
            Err(_) => credentials,
        }
    }

    /// Reject credentials with an empty API key, App ID or data source
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("apiKey", &self.api_key),
            ("appId", &self.app_id),
            ("dataSource", &self.data_source),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AtlasError::MissingCredential { name });
            }
        }
        Ok(())
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/{}/endpoint/data/v1", DEFAULT_DATA_API_HOST, self.app_id),
        }
    }
}

impl fmt::Debug for TenantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantCredentials")
            .field("api_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .field("data_source", &self.data_source)
            .field("base_url", &self.base_url)
            .finish()
    }
}
