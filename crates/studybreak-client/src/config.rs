use serde::{Deserialize, Serialize};

/// Connection settings for [`crate::HttpBackend`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL without the `/api` suffix
    pub base_url: String,

    /// Request timeout. `None` keeps the transport default.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}
