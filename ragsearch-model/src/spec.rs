//! `provider:model` strings and the factory that turns them into clients.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::llm::LanguageModel;

/// Provider assumed when a spec has no `provider:` prefix.
pub const DEFAULT_PROVIDER: &str = "openai";

/// A parsed model reference such as `openai:gpt-4o`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Provider name, lowercase.
    pub provider: String,
    /// Provider-specific model identifier.
    pub model: String,
}

impl ModelSpec {
    /// Parse `provider:model`; a bare `model` uses [`DEFAULT_PROVIDER`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the provider or model part is empty.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (provider, model) = match spec.split_once(':') {
            Some((provider, model)) => (provider.trim(), model.trim()),
            None => (DEFAULT_PROVIDER, spec),
        };
        if provider.is_empty() || model.is_empty() {
            return Err(ModelError::Config(format!(
                "invalid model spec '{spec}': expected 'provider:model'"
            )));
        }
        Ok(Self { provider: provider.to_ascii_lowercase(), model: model.to_string() })
    }
}

impl FromStr for ModelSpec {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// Credentials and endpoint overrides for [`create_model`].
#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    /// API key; falls back to the provider's environment variable.
    pub api_key: Option<String>,
    /// Override for the provider's API base URL.
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

/// Build a client for `spec`.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedProvider`] for providers this build does
/// not include, or [`ModelError::Config`] when credentials are missing.
pub fn create_model(spec: &ModelSpec, settings: &ModelSettings) -> Result<Arc<dyn LanguageModel>> {
    match spec.provider.as_str() {
        #[cfg(feature = "openai")]
        "openai" => {
            use crate::openai::{OpenAIChatModel, OpenAIConfig};

            let api_key = match &settings.api_key {
                Some(key) => key.clone(),
                None => std::env::var("OPENAI_API_KEY").map_err(|_| {
                    ModelError::Config("OPENAI_API_KEY environment variable not set".into())
                })?,
            };
            let mut config = OpenAIConfig::new(api_key, &spec.model);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url);
            }
            if let Some(temperature) = settings.temperature {
                config = config.with_temperature(temperature);
            }
            Ok(Arc::new(OpenAIChatModel::new(config)?))
        }
        other => Err(ModelError::UnsupportedProvider(other.to_string())),
    }
}
