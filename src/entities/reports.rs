use std::collections::HashSet;

use futures::future::join_all;

use crate::error::Result;
use crate::model::Report;
use crate::store::{self, DocumentStore};

pub async fn list_reports(store: &dyn DocumentStore) -> Result<Vec<Report>> {
    let docs = store.list(store::REPORTS).await?;
    let mut reports = Vec::with_capacity(docs.len());
    for (_, doc) in docs {
        reports.push(serde_json::from_value(doc)?);
    }
    Ok(reports)
}

pub async fn get_report(store: &dyn DocumentStore, id: &str) -> Result<Option<Report>> {
    match store.get(store::REPORTS, id).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

/// Upsert one report. The merge write leaves a previously stored teaser in
/// place; the teaser field is owned by the enrichment flow.
pub async fn save_report(store: &dyn DocumentStore, report: &Report) -> Result<()> {
    let doc = serde_json::to_value(report)?;
    store.put(store::REPORTS, &report.id, doc, true).await
}

pub async fn delete_report(store: &dyn DocumentStore, id: &str) -> Result<()> {
    store.delete(store::REPORTS, id).await
}

/// Replace the whole collection with `reports`: documents absent from the
/// passed set are deleted, everything passed is upserted. Same full-state,
/// last-write-wins contract as [`sync_members`](crate::entities::members::sync_members).
///
/// Returns the number of deleted documents.
pub async fn sync_reports(store: &dyn DocumentStore, reports: &[Report]) -> Result<usize> {
    let existing = store.list(store::REPORTS).await?;
    let next_ids: HashSet<&str> = reports.iter().map(|r| r.id.as_str()).collect();

    let stale: Vec<&str> = existing
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| !next_ids.contains(key))
        .collect();

    let deletes = join_all(stale.iter().map(|id| store.delete(store::REPORTS, id)));
    let saves = join_all(reports.iter().map(|r| save_report(store, r)));
    let (delete_results, save_results) = futures::join!(deletes, saves);

    for result in delete_results.into_iter().chain(save_results) {
        result?;
    }
    Ok(stale.len())
}

/// Start a new reporting cycle: every live report keeps its identity but
/// loses its narrative fields and teaser. Full-document writes, so stored
/// teasers are actually removed.
pub async fn clear_reports(store: &dyn DocumentStore) -> Result<()> {
    let reports = list_reports(store).await?;
    for report in reports {
        let cleared = report.cleared();
        let doc = serde_json::to_value(&cleared)?;
        store.put(store::REPORTS, &cleared.id, doc, false).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonDocumentStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn report(id: &str, progress: &str) -> Report {
        Report {
            id: id.into(),
            nickname: "Ai".into(),
            current_trial: "trial".into(),
            progress: progress.into(),
            result: "result".into(),
            teaser: None,
        }
    }

    #[tokio::test]
    async fn sync_applies_delete_difference() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        for id in ["a", "b", "c"] {
            save_report(&store, &report(id, "x")).await.unwrap();
        }

        let next = vec![report("a", "updated"), report("c", "x")];
        let deleted = sync_reports(&store, &next).await.unwrap();
        assert_eq!(deleted, 1);

        let reports = list_reports(&store).await.unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(reports[0].progress, "updated");
    }

    #[tokio::test]
    async fn save_keeps_stored_teaser() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        store
            .put(
                crate::store::REPORTS,
                "r1",
                json!({"id": "r1", "teaser": "hook..."}),
                false,
            )
            .await
            .unwrap();

        save_report(&store, &report("r1", "new progress")).await.unwrap();

        let stored = get_report(&store, "r1").await.unwrap().unwrap();
        assert_eq!(stored.teaser.as_deref(), Some("hook..."));
        assert_eq!(stored.progress, "new progress");
    }

    #[tokio::test]
    async fn clear_resets_fields_and_drops_teaser() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDocumentStore::new(tmp.path().to_path_buf());

        let mut r = report("r1", "did things");
        r.teaser = Some("hook...".into());
        let doc = serde_json::to_value(&r).unwrap();
        store.put(crate::store::REPORTS, "r1", doc, false).await.unwrap();

        clear_reports(&store).await.unwrap();

        let cleared = get_report(&store, "r1").await.unwrap().unwrap();
        assert_eq!(cleared.nickname, "Ai");
        assert_eq!(cleared.progress, "");
        assert!(cleared.teaser.is_none());
    }
}
