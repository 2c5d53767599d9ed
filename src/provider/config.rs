//! Named service configurations and the immutable registry holding them.

use indexmap::IndexMap;

use super::constants::{gemini, ollama, openai};
use super::env::StartupCredentials;
use crate::core::HttpClientConfig;

/// Connection parameters for one named backend.
///
/// Nothing is validated here; [`resolve_client`](super::resolve_client)
/// checks the credential and endpoint when a client is requested, so an
/// unused entry with a missing key never blocks the others.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: String,
    pub api_key: Option<String>,
    /// `None` selects the public OpenAI endpoint.
    pub base_url: Option<String>,
    /// Model identifier sent to the backend, when it differs from `name`.
    pub model_id: Option<String>,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: None,
            base_url: None,
            model_id: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// The model identifier to put on the wire, falling back to the registry key.
    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or(&self.name)
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Ordered, read-only mapping from service name to [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    services: IndexMap<String, ServiceConfig>,
    http_config: HttpClientConfig,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The built-in services: hosted OpenAI and Gemini plus a local Ollama.
    pub fn default_services(credentials: &StartupCredentials) -> Self {
        Registry::builder()
            .service(
                ServiceConfig::new(openai::DEFAULT_MODEL)
                    .with_api_key(credentials.openai_api_key.clone()),
            )
            .service(
                ServiceConfig::new(gemini::SERVICE_NAME)
                    .with_api_key(credentials.gemini_api_key.clone())
                    .with_base_url(gemini::API_BASE)
                    .with_model_id(gemini::DEFAULT_MODEL),
            )
            .service(
                ServiceConfig::new(ollama::DEFAULT_MODEL)
                    .with_api_key(ollama::API_KEY)
                    .with_base_url(ollama::API_BASE),
            )
            .build()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.get(name)
    }

    /// Service names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceConfig> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn http_config(&self) -> &HttpClientConfig {
        &self.http_config
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    services: IndexMap<String, ServiceConfig>,
    http_config: Option<HttpClientConfig>,
}

impl RegistryBuilder {
    /// Add a service. Re-registering a name replaces the entry in place.
    pub fn service(mut self, service: ServiceConfig) -> Self {
        self.services.insert(service.name.clone(), service);
        self
    }

    /// HTTP behavior shared by every client resolved from the registry.
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = Some(config);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            services: self.services,
            http_config: self.http_config.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> StartupCredentials {
        StartupCredentials {
            openai_api_key: "sk-openai".to_string(),
            gemini_api_key: "gm-key".to_string(),
        }
    }

    #[test]
    fn model_id_defaults_to_the_registry_key() {
        let plain = ServiceConfig::new("gpt-4o-mini");
        assert_eq!(plain.model_id(), "gpt-4o-mini");

        let aliased = ServiceConfig::new("gemini").with_model_id("gemini-2.0-flash");
        assert_eq!(aliased.model_id(), "gemini-2.0-flash");
    }

    #[test]
    fn registry_keeps_registration_order() {
        let registry = Registry::builder()
            .service(ServiceConfig::new("b"))
            .service(ServiceConfig::new("a"))
            .service(ServiceConfig::new("c"))
            .build();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let registry = Registry::builder()
            .service(ServiceConfig::new("a").with_api_key("old"))
            .service(ServiceConfig::new("b"))
            .service(ServiceConfig::new("a").with_api_key("new"))
            .build();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().api_key.as_deref(), Some("new"));
    }

    #[test]
    fn default_services_cover_hosted_and_local_backends() {
        let registry = Registry::default_services(&credentials());

        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["gpt-4o-mini", "gemini", "qwen3"]
        );

        let openai = registry.get("gpt-4o-mini").unwrap();
        assert_eq!(openai.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(openai.base_url, None);

        let gemini = registry.get("gemini").unwrap();
        assert_eq!(gemini.model_id(), "gemini-2.0-flash");

        let qwen = registry.get("qwen3").unwrap();
        assert_eq!(qwen.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(qwen.api_key.as_deref(), Some("ollama"));
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let service = ServiceConfig::new("a").with_api_key("sk-secret");
        let rendered = format!("{service:?}");

        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
