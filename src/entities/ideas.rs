use crate::error::{OrangeError, Result};
use crate::model::{new_id, Idea};
use crate::store::{self, DocumentStore};

pub async fn list_ideas(store: &dyn DocumentStore) -> Result<Vec<Idea>> {
    let docs = store.list(store::IDEAS).await?;
    let mut ideas = Vec::with_capacity(docs.len());
    for (_, doc) in docs {
        ideas.push(serde_json::from_value::<Idea>(doc)?);
    }
    // Newest first for display
    ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(ideas)
}

pub async fn get_idea(store: &dyn DocumentStore, id: &str) -> Result<Option<Idea>> {
    match store.get(store::IDEAS, id).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

pub async fn save_idea(store: &dyn DocumentStore, idea: &Idea) -> Result<()> {
    let doc = serde_json::to_value(idea)?;
    store.put(store::IDEAS, &idea.id, doc, true).await
}

pub async fn delete_idea(store: &dyn DocumentStore, id: &str) -> Result<()> {
    store.delete(store::IDEAS, id).await
}

/// Create a new idea owned by `member_id`. The title starts as whatever the
/// caller passes (usually the pending placeholder, resolved asynchronously
/// by the enrichment flow).
pub async fn add_idea(
    store: &dyn DocumentStore,
    member_id: &str,
    member_name: &str,
    idea_name: &str,
    content: &str,
) -> Result<Idea> {
    let now = chrono::Utc::now().to_rfc3339();
    let idea = Idea {
        id: new_id(),
        member_id: member_id.to_string(),
        member_name: member_name.to_string(),
        idea_name: idea_name.to_string(),
        content: content.to_string(),
        rejection_reason: None,
        created_at: now.clone(),
        updated_at: now,
    };
    save_idea(store, &idea).await?;
    Ok(idea)
}

/// Record why an idea was turned down.
pub async fn reject_idea(store: &dyn DocumentStore, id: &str, reason: &str) -> Result<Idea> {
    let mut idea = get_idea(store, id).await?.ok_or_else(|| OrangeError::NotFound {
        collection: store::IDEAS.into(),
        key: id.into(),
    })?;

    idea.rejection_reason = Some(reason.to_string());
    idea.updated_at = chrono::Utc::now().to_rfc3339();
    save_idea(store, &idea).await?;
    Ok(idea)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonDocumentStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn add_sets_identity_and_timestamps() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        let idea = add_idea(&store, "m1", "Ai", "generating...", "a robot that waters plants")
            .await
            .unwrap();
        assert!(!idea.id.is_empty());
        assert_eq!(idea.created_at, idea.updated_at);

        let stored = get_idea(&store, &idea.id).await.unwrap().unwrap();
        assert_eq!(stored, idea);
    }

    #[tokio::test]
    async fn reject_records_reason_and_touches_updated_at() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        let idea = add_idea(&store, "m1", "Ai", "title", "content").await.unwrap();
        let rejected = reject_idea(&store, &idea.id, "out of budget").await.unwrap();

        assert_eq!(rejected.rejection_reason.as_deref(), Some("out of budget"));
        assert!(rejected.updated_at >= idea.updated_at);
    }

    #[tokio::test]
    async fn reject_unknown_idea_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        let err = reject_idea(&store, "nope", "reason").await.unwrap_err();
        assert!(matches!(err, OrangeError::NotFound { .. }));
    }
}
