pub mod blob;
pub mod json;

pub use json::JsonDocumentStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Collection names, part of the on-disk contract.
pub const MEMBERS: &str = "members";
pub const REPORTS: &str = "reports";
pub const IDEAS: &str = "ideas";
pub const REPORTS_HISTORY: &str = "reports_history";

/// Key-addressed document storage.
///
/// Each document is independently addressable by `(collection, key)`. There
/// are no transactions: multi-document operations are issued as independent
/// calls and a crash mid-batch leaves the store partially updated.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` when absent.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// List all documents in a collection as `(key, doc)` pairs.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>>;

    /// Insert or replace a document. With `merge`, top-level keys of an
    /// existing object are kept unless the new document overrides them.
    async fn put(&self, collection: &str, key: &str, doc: Value, merge: bool) -> Result<()>;

    /// Delete a document. Deleting an absent key is not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;
}
