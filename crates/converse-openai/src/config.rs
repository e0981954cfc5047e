//! Transport configuration.

use std::fmt;
use std::time::Duration;

/// Configuration for [`OpenAiTransport`](crate::OpenAiTransport).
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key, sent as a bearer token.
    pub api_key: String,
    /// Fallback model for requests that leave the model empty.
    pub model: String,
    /// Base URL of the API. Change it for proxies or compatible servers.
    pub base_url: String,
    /// Value for the `OpenAI-Organization` header, when set.
    pub organization: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// HTTP client to reuse. A dedicated one is built when `None`.
    pub client: Option<reqwest::Client>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            organization: None,
            timeout: Duration::from_secs(120),
            client: None,
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
