pub mod ask;
pub mod history;
pub mod idea;
pub mod member;
pub mod report;

use crate::config::Config;
use crate::error::{OrangeError, Result};
use crate::store::JsonDocumentStore;

pub(crate) fn open_store(config: &Config) -> JsonDocumentStore {
    JsonDocumentStore::new(config.data_dir.clone())
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| OrangeError::Config(format!("tokio runtime: {}", e)))
}
