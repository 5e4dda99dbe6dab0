//! Client configuration.

use std::env;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://www.reinfolib.mlit.go.jp/ex-api/external/XIT001";
pub const DEFAULT_AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Responses for a whole prefecture-year can run to tens of megabytes.
pub const DEFAULT_BODY_LIMIT: u64 = 256 * 1024 * 1024;

pub const API_KEY_VAR: &str = "REINFOLIB_API_KEY";
pub const BASE_URL_VAR: &str = "REINFOLIB_BASE_URL";

#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub auth_header: String,
    pub body_limit: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Read `REINFOLIB_API_KEY` (required) and `REINFOLIB_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Configuration(format!("{API_KEY_VAR} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(&base_url);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

// The API key never appears in debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("auth_header", &self.auth_header)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}
