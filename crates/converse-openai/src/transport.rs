//! The HTTP transport.

use converse::{ChatCompletionError, ChatRequest, CompletionTransport, CompletionTurn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::instrument;

use crate::config::OpenAiConfig;
use crate::convert;
use crate::types;

/// A [`CompletionTransport`] backed by the OpenAI chat-completions
/// endpoint.
///
/// One turn per [`send`](CompletionTransport::send): the request snapshot
/// maps onto a single chat-completions call and the first choice of the
/// reply maps back onto a [`CompletionTurn`]. Looping, tool invocation, and
/// output validation all stay in the core crate.
#[derive(Debug)]
pub struct OpenAiTransport {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiTransport {
    /// Builds a transport from `config`, reusing `config.client` when one
    /// is supplied.
    pub fn new(config: OpenAiConfig) -> Result<Self, ChatCompletionError> {
        let client = match &config.client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| {
                    ChatCompletionError::InvalidRequest(format!("failed to build HTTP client: {e}"))
                })?,
        };
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn default_headers(&self) -> Result<HeaderMap, ChatCompletionError> {
        let mut headers = HeaderMap::new();
        let auth =
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)).map_err(|_| {
                ChatCompletionError::Auth("API key contains invalid header characters".to_string())
            })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(organization) = &self.config.organization {
            let value = HeaderValue::from_str(organization).map_err(|_| {
                ChatCompletionError::InvalidRequest(
                    "organization contains invalid header characters".to_string(),
                )
            })?;
            headers.insert("OpenAI-Organization", value);
        }
        Ok(headers)
    }

    fn effective_model<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        if request.model.is_empty() {
            &self.config.model
        } else {
            &request.model
        }
    }

    async fn send_request(
        &self,
        body: &types::Request,
    ) -> Result<types::Response, ChatCompletionError> {
        let response = self
            .client
            .post(self.completions_url())
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatCompletionError::Timeout {
                        elapsed_ms: self.config.timeout.as_millis() as u64,
                    }
                } else {
                    ChatCompletionError::Transport {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: e.to_string(),
                        retryable: e.is_connect(),
                    }
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatCompletionError::Transport {
                status: status.as_u16(),
                message: format!("failed to read response body: {e}"),
                retryable: false,
            })?;
        if !status.is_success() {
            return Err(convert::convert_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ChatCompletionError::MalformedJson {
            message: e.to_string(),
            raw: body,
        })
    }
}

impl CompletionTransport for OpenAiTransport {
    #[instrument(skip_all, fields(model = %self.effective_model(request)))]
    async fn send(&self, request: &ChatRequest) -> Result<CompletionTurn, ChatCompletionError> {
        let body = convert::build_request(request, self.effective_model(request));
        let response = self.send_request(&body).await?;
        convert::convert_turn(response)
    }
}
