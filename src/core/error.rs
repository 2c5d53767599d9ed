use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Caller-fixable faults detected while resolving a service name to a client.
///
/// None of these are transient; retrying without changing the registry
/// produces the same fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown model: {name}")]
    UnknownService { name: String },

    #[error("API key not configured for model: {name}")]
    MissingCredential { name: String },

    #[error("Invalid URL format for model: {name} ({reason})")]
    MalformedEndpoint { name: String, reason: String },
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{var} not found in environment variables")]
    Environment { var: String },

    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxedSource,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxedSource,
    },
}

impl LlmError {
    /// A transport fault whose message ends with every cause in the chain.
    pub(crate) fn network<E>(context: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut message = format!("{context}: {source}");
        let mut cause = source.source();
        while let Some(inner) = cause {
            message.push_str(&format!(": {inner}"));
            cause = inner.source();
        }

        LlmError::Network {
            message,
            source: Box::new(source),
        }
    }

    /// Whether issuing the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Network { .. } => true,
            LlmError::Api {
                status_code: Some(code),
                ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}
