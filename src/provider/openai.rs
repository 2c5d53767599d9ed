//! Client for OpenAI-compatible `/chat/completions` endpoints.
//!
//! OpenAI itself, Gemini's compatibility layer, Ollama and most self-hosted
//! servers accept the same request shape, so one client covers all of them.

use async_trait::async_trait;
use tracing::debug;

use super::constants::{CHAT_COMPLETIONS_ENDPOINT, openai};
use crate::completions::{ChatCompletionResponse, build_request, decode_fragments};
use crate::core::{
    ChatProvider, Completion, FragmentStream, HttpClient, HttpClientConfig, LlmError, Message,
};

/// Endpoint and credential a [`ChatClient`] is bound to.
#[derive(Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub http_config: HttpClientConfig,
}

impl ChatConfig {
    /// Configuration for the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: openai::API_BASE.to_string(),
            http_config: HttpClientConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .finish()
    }
}

/// Reusable handle bound to one endpoint and credential.
///
/// Constructing it performs no I/O; requests are only sent by the
/// [`ChatProvider`] methods.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ChatConfig,
    http: HttpClient,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, LlmError> {
        let http = HttpClient::new(config.http_config.clone(), None)?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!("{}{}", self.config.base_url, CHAT_COMPLETIONS_ENDPOINT)
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![self.config.auth_header()]
    }
}

#[async_trait]
impl ChatProvider for ChatClient {
    #[tracing::instrument(
        name = "chat_complete",
        skip(self, messages),
        fields(base_url = %self.config.base_url, messages = messages.len()),
        err
    )]
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<Completion, LlmError> {
        let request = build_request(model, messages, false)?;

        let response: ChatCompletionResponse = self
            .http
            .post_json(&self.url(), &self.headers(), &request)
            .await?;

        let completion = Completion::try_from(response)?;
        debug!(
            id = %completion.id,
            finish_reason = ?completion.finish_reason,
            "Completion received"
        );
        Ok(completion)
    }

    #[tracing::instrument(
        name = "chat_stream",
        skip(self, messages),
        fields(base_url = %self.config.base_url, messages = messages.len()),
        err
    )]
    async fn stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<FragmentStream, LlmError> {
        let request = build_request(model, messages, true)?;

        let events = self
            .http
            .post_stream(&self.url(), &self.headers(), &request)
            .await?;

        Ok(decode_fragments(events))
    }
}
