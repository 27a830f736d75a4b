use std::path::PathBuf;

use crate::error::{OrangeError, Result};
use crate::llm::{self, ResolvedProvider};

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the document store and blob storage
    pub data_dir: PathBuf,
    /// Resolved LLM provider configuration
    pub llm: ResolvedProvider,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = match std::env::var("ORANGE_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = dirs::home_dir().ok_or_else(|| {
                    OrangeError::Config("Could not determine home directory".into())
                })?;
                home.join(".orange")
            }
        };

        Ok(Config {
            data_dir,
            llm: llm::resolve_from_env(),
        })
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}
