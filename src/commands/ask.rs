use colored::Colorize;

use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::error::{OrangeError, Result};
use crate::llm::LlmClient;
use crate::rag;

pub fn cmd_ask(config: &Config, question: &str, top_k: usize, verbose: bool) -> Result<()> {
    let rt = super::runtime()?;
    rt.block_on(async {
        let store = super::open_store(config);
        let embedder = EmbeddingProvider::from_env()?;
        let client = LlmClient::new(&config.llm);

        if verbose {
            eprintln!(
                "{} provider: {} model: {} top_k: {}",
                "Ask:".cyan(),
                config.llm.provider,
                config.llm.model,
                top_k
            );
        }

        match rag::answer_question(&store, &embedder, &client, question, top_k).await {
            Ok(answer) => {
                println!("{}", answer);
                Ok(())
            }
            // Missing data is a usage hint, not a failure
            Err(OrangeError::NoEmbeddingData) => {
                println!(
                    "{} No archived embeddings to search. Run 'orange archive' first.",
                    "Not found:".yellow()
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    })
}
