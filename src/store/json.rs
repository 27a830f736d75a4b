//! File-backed document store: one pretty-printed JSON file per document,
//! `<root>/<collection>/<key>.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::DocumentStore;
use crate::error::Result;

pub struct JsonDocumentStore {
    root: PathBuf,
}

impl JsonDocumentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn doc_path(&self, collection: &str, key: &str) -> PathBuf {
        self.root.join(collection).join(format!("{}.json", key))
    }

    fn read_doc(path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let path = self.doc_path(collection, key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_doc(&path)?))
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            docs.push((key.to_string(), Self::read_doc(&path)?));
        }

        // Directory order is filesystem-dependent; keep listings stable.
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    async fn put(&self, collection: &str, key: &str, doc: Value, merge: bool) -> Result<()> {
        let path = self.doc_path(collection, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let doc = if merge && path.exists() {
            match (Self::read_doc(&path)?, doc) {
                (Value::Object(mut existing), Value::Object(next)) => {
                    for (k, v) in next {
                        existing.insert(k, v);
                    }
                    Value::Object(existing)
                }
                (_, next) => next,
            }
        } else {
            doc
        };

        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let path = self.doc_path(collection, key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonDocumentStore) {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());
        (tmp, store)
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let (_tmp, store) = store();
        store
            .put("members", "m1", json!({"id": "m1", "name": "Ai"}), false)
            .await
            .unwrap();

        let doc = store.get("members", "m1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Ai");
    }

    #[tokio::test]
    async fn get_absent_returns_none() {
        let (_tmp, store) = store();
        assert!(store.get("members", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_all_docs_sorted_by_key() {
        let (_tmp, store) = store();
        store.put("ideas", "b", json!({"id": "b"}), false).await.unwrap();
        store.put("ideas", "a", json!({"id": "a"}), false).await.unwrap();

        let docs = store.list("ideas").await.unwrap();
        let keys: Vec<&str> = docs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn list_missing_collection_is_empty() {
        let (_tmp, store) = store();
        assert!(store.list("reports").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merge_keeps_unmentioned_keys() {
        let (_tmp, store) = store();
        store
            .put("reports", "r1", json!({"id": "r1", "progress": "X", "result": "Y"}), false)
            .await
            .unwrap();
        store
            .put("reports", "r1", json!({"progress": "Z"}), true)
            .await
            .unwrap();

        let doc = store.get("reports", "r1").await.unwrap().unwrap();
        assert_eq!(doc["progress"], "Z");
        assert_eq!(doc["result"], "Y");
    }

    #[tokio::test]
    async fn put_without_merge_replaces_whole_doc() {
        let (_tmp, store) = store();
        store
            .put("reports", "r1", json!({"id": "r1", "result": "Y"}), false)
            .await
            .unwrap();
        store.put("reports", "r1", json!({"id": "r1"}), false).await.unwrap();

        let doc = store.get("reports", "r1").await.unwrap().unwrap();
        assert!(doc.get("result").is_none());
    }

    #[tokio::test]
    async fn delete_removes_doc_and_tolerates_absence() {
        let (_tmp, store) = store();
        store.put("ideas", "i1", json!({"id": "i1"}), false).await.unwrap();
        store.delete("ideas", "i1").await.unwrap();
        assert!(store.get("ideas", "i1").await.unwrap().is_none());

        // Deleting again is a no-op, not an error.
        store.delete("ideas", "i1").await.unwrap();
    }
}
