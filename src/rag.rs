//! Question answering over archived reports: gather every stored embedding,
//! rank against the question, and ask the model to answer from the winners.

use crate::embeddings::{rank_by_similarity, Embedder, ScoredSnippet};
use crate::error::{OrangeError, Result};
use crate::history::history_list;
use crate::llm::prompts::{rag_answer_prompt, SYSTEM_RAG_ANSWERER};
use crate::llm::ChatModel;
use crate::store::DocumentStore;

pub const DEFAULT_TOP_K: usize = 5;

/// Every embedding across every archived week, each text prefixed with its
/// week label so the answer can cite the week it came from.
pub async fn gather_embeddings(store: &dyn DocumentStore) -> Result<Vec<(String, Vec<f32>)>> {
    let records = history_list(store).await?;
    let mut candidates = Vec::new();

    for record in records {
        for entry in record.embeddings.iter().flatten() {
            candidates.push((
                format!("[{}] {}", record.week_id, entry.text),
                entry.embedding.clone(),
            ));
        }
    }

    Ok(candidates)
}

/// Answer a free-text question from the archived report history.
///
/// The whole archive is re-read and the question re-embedded on every call;
/// nothing is cached. The model is instructed to say so when the retrieved
/// context does not cover the question.
pub async fn answer_question(
    store: &dyn DocumentStore,
    embedder: &dyn Embedder,
    model: &dyn ChatModel,
    question: &str,
    top_k: usize,
) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(OrangeError::EmptyQuestion);
    }

    let candidates = gather_embeddings(store).await?;
    if candidates.is_empty() {
        return Err(OrangeError::NoEmbeddingData);
    }

    let query = embedder.embed(question).await?;
    let ranked: Vec<ScoredSnippet> = rank_by_similarity(&query, &candidates, top_k)?;

    model
        .chat(SYSTEM_RAG_ANSWERER, &rag_answer_prompt(question, &ranked))
        .await
}
