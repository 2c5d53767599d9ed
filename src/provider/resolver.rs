//! Turning a service name into a ready-to-use client.

use reqwest::Url;
use tracing::debug;

use super::config::Registry;
use super::openai::{ChatClient, ChatConfig};
use crate::core::{
    CompletionResponse, ConfigurationError, LlmError, Message, llm::request_completion,
};

/// A resolved client together with the model identifier to send.
#[derive(Debug, Clone)]
pub struct ResolvedService {
    pub client: ChatClient,
    pub model: String,
}

/// Build a client for the service registered under `name`.
///
/// Lookup happens before any other check, so a known name never reports
/// [`ConfigurationError::UnknownService`]. Every call builds a fresh client.
pub fn resolve_client(registry: &Registry, name: &str) -> Result<ChatClient, LlmError> {
    let service = registry
        .get(name)
        .ok_or_else(|| ConfigurationError::UnknownService {
            name: name.to_string(),
        })?;

    let api_key = service
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigurationError::MissingCredential {
            name: name.to_string(),
        })?;

    let mut config = ChatConfig::new(api_key).with_http_config(registry.http_config().clone());

    if let Some(base_url) = &service.base_url {
        config = config.with_base_url(validate_endpoint(name, base_url)?);
    }

    debug!(service = name, base_url = %config.base_url, "Resolved client");

    ChatClient::new(config)
}

fn validate_endpoint(name: &str, base_url: &str) -> Result<String, ConfigurationError> {
    let malformed = |reason: String| ConfigurationError::MalformedEndpoint {
        name: name.to_string(),
        reason,
    };

    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(malformed("endpoint is empty".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| malformed(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(malformed(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(trimmed.to_string())
}

impl Registry {
    /// See [`resolve_client`].
    pub fn resolve_client(&self, name: &str) -> Result<ChatClient, LlmError> {
        resolve_client(self, name)
    }

    /// Resolve the client and the model identifier it should be asked for.
    pub fn resolve(&self, name: &str) -> Result<ResolvedService, LlmError> {
        let client = resolve_client(self, name)?;
        // resolve_client succeeded, so the entry exists
        let model = self
            .get(name)
            .map(|service| service.model_id().to_string())
            .unwrap_or_else(|| name.to_string());

        Ok(ResolvedService { client, model })
    }
}

/// Resolve `name` and send `messages` to it in one step.
pub async fn ask_model(
    registry: &Registry,
    name: &str,
    messages: &[Message],
    streaming: bool,
) -> Result<CompletionResponse, LlmError> {
    let ResolvedService { client, model } = registry.resolve(name)?;
    request_completion(&client, &model, messages, streaming).await
}
