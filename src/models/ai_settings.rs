use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// AI provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    OpenAi,
    #[default]
    Ollama,
    Anthropic,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Ollama => "llama3.2",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        match self {
            Self::OpenAi | Self::Anthropic => true,
            Self::Ollama => false,
        }
    }
}

impl FromStr for AiProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(()),
        }
    }
}

/// Connection settings for a directly-addressed LLM provider.
#[derive(Debug, Clone, Default)]
pub struct AiSettings {
    pub provider: AiProvider,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    /// Blank or missing values fall back to the provider defaults.
    pub fn new(
        provider: AiProvider,
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Self {
        let base_url = base_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let model = model
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        Self {
            provider,
            base_url,
            api_key: api_key.unwrap_or_default(),
            model,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
            && !self.model.is_empty()
            && (!self.provider.requires_api_key() || !self.api_key.is_empty())
    }
}
