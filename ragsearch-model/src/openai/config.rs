/// Default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for [`OpenAIChatModel`](super::OpenAIChatModel).
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier, e.g. `gpt-4o`.
    pub model: String,
    /// API base URL; `None` means [`OPENAI_API_BASE`].
    pub base_url: Option<String>,
    /// Optional `OpenAI-Organization` header.
    pub organization_id: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
}

impl OpenAIConfig {
    /// Configuration for the hosted OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            organization_id: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Configuration for an OpenAI-compatible server.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(api_key, model).with_base_url(base_url)
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the organization header.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(OPENAI_API_BASE);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint() {
        let config = OpenAIConfig::new("key", "gpt-4o");
        assert_eq!(config.chat_completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn compatible_endpoint_trims_trailing_slash() {
        let config = OpenAIConfig::compatible("ollama", "http://localhost:11434/v1/", "llama3.2");
        assert_eq!(config.chat_completions_url(), "http://localhost:11434/v1/chat/completions");
    }
}
