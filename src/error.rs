use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrangeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Vector dimensions do not match: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("No embeddings stored yet. Archive reports with embeddings first.")]
    NoEmbeddingData,

    #[error("No live reports to archive")]
    NoReports,

    #[error("Not found: {collection}/{key}")]
    NotFound { collection: String, key: String },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("LLM returned empty response")]
    LlmEmptyResponse,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, OrangeError>;
