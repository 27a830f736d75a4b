use std::collections::HashSet;

use futures::future::join_all;

use crate::error::Result;
use crate::model::Member;
use crate::store::{self, DocumentStore};

pub async fn list_members(store: &dyn DocumentStore) -> Result<Vec<Member>> {
    let docs = store.list(store::MEMBERS).await?;
    let mut members = Vec::with_capacity(docs.len());
    for (_, doc) in docs {
        let member: Member = serde_json::from_value(doc)?;
        members.push(member.normalize());
    }
    Ok(members)
}

pub async fn get_member(store: &dyn DocumentStore, id: &str) -> Result<Option<Member>> {
    match store.get(store::MEMBERS, id).await? {
        Some(doc) => {
            let member: Member = serde_json::from_value(doc)?;
            Ok(Some(member.normalize()))
        }
        None => Ok(None),
    }
}

pub async fn save_member(store: &dyn DocumentStore, member: &Member) -> Result<()> {
    let member = member.clone().normalize();
    let doc = serde_json::to_value(&member)?;
    store.put(store::MEMBERS, &member.id, doc, true).await
}

pub async fn delete_member(store: &dyn DocumentStore, id: &str) -> Result<()> {
    store.delete(store::MEMBERS, id).await
}

/// Replace the whole collection with `members`: documents absent from the
/// passed set are deleted, everything passed is upserted. Callers must pass
/// the complete desired state, not a delta. Last write wins; two
/// concurrent editors can drop each other's additions.
///
/// Returns the number of deleted documents.
pub async fn sync_members(store: &dyn DocumentStore, members: &[Member]) -> Result<usize> {
    let existing = store.list(store::MEMBERS).await?;
    let next_ids: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();

    let stale: Vec<&str> = existing
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| !next_ids.contains(key))
        .collect();

    // Independent writes, fanned out optimistically; no atomicity across
    // the batch.
    let deletes = join_all(stale.iter().map(|id| store.delete(store::MEMBERS, id)));
    let saves = join_all(members.iter().map(|m| save_member(store, m)));
    let (delete_results, save_results) = futures::join!(deletes, saves);

    for result in delete_results.into_iter().chain(save_results) {
        result?;
    }
    Ok(stale.len())
}
