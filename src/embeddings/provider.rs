use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{OrangeError, Result};

/// Text-to-vector gateway. Single attempt per call, no caching; retry
/// policy belongs to callers.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text into a fixed-dimension vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts. The default issues one request per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

pub enum EmbeddingProvider {
    Gemini { api_key: String },
    OpenAI { api_key: String },
    OllamaLocal,
}

impl EmbeddingProvider {
    /// Create provider from environment. Gemini is preferred, then OpenAI,
    /// with local Ollama as the no-key fallback.
    pub fn from_env() -> Result<Self> {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            return Ok(Self::Gemini { api_key: key });
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            return Ok(Self::OpenAI { api_key: key });
        }

        Ok(Self::OllamaLocal)
    }

    async fn embed_gemini(&self, text: &str, api_key: &str) -> Result<Vec<f32>> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1/models/text-embedding-004:embedContent?key={}",
                api_key
            ))
            .json(&serde_json::json!({
                "content": {
                    "parts": [{
                        "text": text
                    }]
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrangeError::Embedding(format!("Gemini API error: {}", text)));
        }

        let result: serde_json::Value = response.json().await?;
        let embedding: Vec<f32> = result
            .get("embedding")
            .and_then(|e| e.get("values"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| OrangeError::Embedding("Invalid Gemini embedding response".into()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        Ok(embedding)
    }

    async fn embed_openai(&self, text: &str, api_key: &str) -> Result<Vec<f32>> {
        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let client = reqwest::Client::new();
        let response = client
            .post("https://api.openai.com/v1/embeddings")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": "text-embedding-3-small",
                "input": [text],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrangeError::Embedding(format!("OpenAI API error: {}", text)));
        }

        let result: EmbeddingResponse = response.json().await?;
        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| OrangeError::Embedding("No embedding returned".into()))
    }

    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>> {
        let client = reqwest::Client::new();
        let response = client
            .post("http://localhost:11434/api/embeddings")
            .json(&serde_json::json!({
                "model": "nomic-embed-text",
                "prompt": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrangeError::Embedding(format!("Ollama API error: {}", text)));
        }

        let result: serde_json::Value = response.json().await?;
        let embedding: Vec<f32> = result
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| OrangeError::Embedding("Invalid Ollama embedding response".into()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Self::Gemini { api_key } => self.embed_gemini(text, api_key).await,
            Self::OpenAI { api_key } => self.embed_openai(text, api_key).await,
            Self::OllamaLocal => self.embed_ollama(text).await,
        }
    }
}
