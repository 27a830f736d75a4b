use async_trait::async_trait;

use super::{ChatModel, Provider, ResolvedProvider};
use crate::error::{OrangeError, Result};

/// Multi-provider LLM client
pub struct LlmClient {
    provider: Provider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(resolved: &ResolvedProvider) -> Self {
        Self {
            provider: resolved.provider,
            endpoint: resolved.endpoint.clone(),
            model: resolved.model.clone(),
            api_key: resolved.api_key.clone(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Gemini generateContent API
    async fn chat_gemini(&self, system: &str, user: &str) -> Result<String> {
        let key = self.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, key
        );

        let body = serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": system }],
            },
            "contents": [
                { "role": "user", "parts": [{ "text": user }] },
            ],
            "generationConfig": {
                "temperature": 0.3,
                "maxOutputTokens": 2048,
            },
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrangeError::Config(format!(
                "LLM returned {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await?;

        json.get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or(OrangeError::LlmEmptyResponse)
    }

    /// OpenAI-compatible API (OpenAI, Ollama, etc.)
    async fn chat_openai_compat(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": 0.3,
            "max_tokens": 2048,
        });

        let mut req = self.client.post(&url).json(&body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrangeError::Config(format!(
                "LLM returned {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await?;

        json.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or(OrangeError::LlmEmptyResponse)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    /// Send a chat completion request and return the response text
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        match self.provider {
            Provider::Gemini => self.chat_gemini(system, user).await,
            Provider::OpenAI | Provider::Ollama => self.chat_openai_compat(system, user).await,
        }
    }
}
