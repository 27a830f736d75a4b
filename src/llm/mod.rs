pub mod client;
pub mod prompts;

pub use client::LlmClient;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Text generation gateway. Implementations return the model's answer text
/// verbatim; callers own any post-processing.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAI,
    Ollama,
}

impl Provider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Ollama => "http://localhost:11434/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAI => "gpt-4o",
            Provider::Ollama => "gemma3:4b",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAI => write!(f, "openai"),
            Provider::Ollama => write!(f, "ollama"),
        }
    }
}

/// A fully resolved provider configuration — no further lookups needed.
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Resolve the generation provider from the environment. Gemini is
/// preferred, then OpenAI, with local Ollama as the no-key fallback.
/// `ORANGE_LLM_ENDPOINT` and `ORANGE_LLM_MODEL` override the defaults.
pub fn resolve_from_env() -> ResolvedProvider {
    let (provider, api_key) = if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        (Provider::Gemini, Some(key))
    } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        (Provider::OpenAI, Some(key))
    } else {
        (Provider::Ollama, None)
    };

    let endpoint = std::env::var("ORANGE_LLM_ENDPOINT")
        .unwrap_or_else(|_| provider.default_endpoint().to_string());
    let model = std::env::var("ORANGE_LLM_MODEL")
        .unwrap_or_else(|_| provider.default_model().to_string());

    ResolvedProvider {
        provider,
        endpoint,
        model,
        api_key,
    }
}
