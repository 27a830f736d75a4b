pub mod provider;

pub use provider::{Embedder, EmbeddingProvider};

use crate::error::{OrangeError, Result};

/// A candidate text with its similarity score against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSnippet {
    pub text: String,
    pub score: f32,
}

/// Cosine similarity between two vectors.
///
/// Comparing vectors of different lengths (different embedding models) is an
/// error. A zero vector on either side scores 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(OrangeError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// Score every candidate against the query and keep the best `top_k`,
/// highest first. Equal scores keep their input order (the sort is stable),
/// and a `top_k` beyond the candidate count returns everything.
pub fn rank_by_similarity(
    query: &[f32],
    candidates: &[(String, Vec<f32>)],
    top_k: usize,
) -> Result<Vec<ScoredSnippet>> {
    let mut results = Vec::with_capacity(candidates.len());
    for (text, embedding) in candidates {
        let score = cosine_similarity(query, embedding)?;
        results.push(ScoredSnippet {
            text: text.clone(),
            score,
        });
    }

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    Ok(results)
}
