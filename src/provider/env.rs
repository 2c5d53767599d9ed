//! Credentials that must be present in the process environment at startup.

use tracing::debug;

use super::constants::{gemini, openai};
use crate::core::LlmError;

#[derive(Clone, PartialEq, Eq)]
pub struct StartupCredentials {
    pub openai_api_key: String,
    pub gemini_api_key: String,
}

impl StartupCredentials {
    /// Load `.env` if one exists, then read the required variables.
    pub fn from_env() -> Result<Self, LlmError> {
        match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => debug!(error = %e, "No .env file loaded"),
        }

        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the required variables through `lookup`.
    ///
    /// Unset and empty values are both treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| LlmError::Environment {
                    var: var.to_string(),
                })
        };

        Ok(Self {
            openai_api_key: require(openai::API_KEY_ENV_VAR)?,
            gemini_api_key: require(gemini::API_KEY_ENV_VAR)?,
        })
    }
}

impl std::fmt::Debug for StartupCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupCredentials").finish_non_exhaustive()
    }
}
