//! Weekly report archival: immutable snapshots of the live report set,
//! keyed by ISO week label, with best-effort embeddings for retrieval.

use colored::Colorize;

use crate::embeddings::Embedder;
use crate::entities::reports::list_reports;
use crate::error::{OrangeError, Result};
use crate::model::{Report, ReportEmbedding, ReportHistory};
use crate::store::{self, DocumentStore};

/// ISO-8601 week label for a date, e.g. `2026-W02`.
///
/// Zero-padded and fixed-width so history keys sort lexicographically in
/// chronological order. This label is the storage key; the ISO rule
/// (Monday-start weeks, week 1 holds the year's first Thursday) decides
/// which snapshot a year-boundary archive lands in.
pub fn week_id_for(date: chrono::NaiveDate) -> String {
    use chrono::Datelike;
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

pub fn current_week_id() -> String {
    week_id_for(chrono::Utc::now().date_naive())
}

/// The text that gets embedded for one report: member name first, then the
/// three narrative fields, each labeled, one per line.
pub fn embedding_text(report: &Report) -> String {
    format!(
        "Member: {}\nCurrently trying: {}\nProgress: {}\nResult: {}",
        report.nickname, report.current_trial, report.progress, report.result
    )
}

/// Embed each report in turn, one request at a time. Failed reports are
/// skipped; the failure count comes back with whatever succeeded.
pub async fn build_embeddings(
    reports: &[Report],
    embedder: &dyn Embedder,
) -> (Vec<ReportEmbedding>, usize) {
    let mut embedded = Vec::with_capacity(reports.len());
    let mut failed = 0;

    for report in reports {
        let text = embedding_text(report);
        match embedder.embed(&text).await {
            Ok(embedding) => embedded.push(ReportEmbedding {
                report_id: report.id.clone(),
                nickname: report.nickname.clone(),
                text,
                embedding,
            }),
            Err(_) => failed += 1,
        }
    }

    (embedded, failed)
}

/// Snapshot the current live reports into `reports_history/{week_id}`.
///
/// The snapshot is a value copy; later edits to live reports never change
/// it. Archiving an already-archived week overwrites that week's record.
/// Embedding generation is best-effort: failures are warned about and the
/// archive proceeds, without embeddings if none succeeded.
///
/// Returns the week id the snapshot was stored under. Clearing the live
/// reports afterwards is the caller's decision, not part of archiving.
pub async fn archive_reports(
    store: &dyn DocumentStore,
    embedder: &dyn Embedder,
    week_id: Option<String>,
    with_embeddings: bool,
) -> Result<String> {
    let reports = list_reports(store).await?;
    if reports.is_empty() {
        return Err(OrangeError::NoReports);
    }

    let week_id = week_id.unwrap_or_else(current_week_id);

    let embeddings = if with_embeddings {
        let (embedded, failed) = build_embeddings(&reports, embedder).await;
        if failed > 0 {
            eprintln!(
                "{} embedding failed for {} of {} reports; archiving what succeeded",
                "Warning:".yellow(),
                failed,
                reports.len()
            );
        }
        if embedded.is_empty() {
            None
        } else {
            Some(embedded)
        }
    } else {
        None
    };

    let history = ReportHistory {
        week_id: week_id.clone(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        reports,
        embeddings,
    };

    let doc = serde_json::to_value(&history)?;
    store.put(store::REPORTS_HISTORY, &week_id, doc, false).await?;

    Ok(week_id)
}

/// All archived weeks, newest first.
pub async fn history_list(store: &dyn DocumentStore) -> Result<Vec<ReportHistory>> {
    let docs = store.list(store::REPORTS_HISTORY).await?;
    let mut records = Vec::with_capacity(docs.len());
    for (_, doc) in docs {
        records.push(serde_json::from_value::<ReportHistory>(doc)?);
    }
    records.sort_by(|a, b| b.week_id.cmp(&a.week_id));
    Ok(records)
}

pub async fn history_get(
    store: &dyn DocumentStore,
    week_id: &str,
) -> Result<Option<ReportHistory>> {
    match store.get(store::REPORTS_HISTORY, week_id).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reports::save_report;
    use crate::store::JsonDocumentStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(OrangeError::Embedding("service unavailable".into()))
        }
    }

    struct PanickingEmbedder;

    #[async_trait]
    impl Embedder for PanickingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            panic!("embedder must not be called");
        }
    }

    fn report(id: &str, progress: &str) -> Report {
        Report {
            id: id.into(),
            nickname: "Ai".into(),
            current_trial: "parser rewrite".into(),
            progress: progress.into(),
            result: "it parses".into(),
            teaser: None,
        }
    }

    fn store(tmp: &TempDir) -> JsonDocumentStore {
        JsonDocumentStore::new(tmp.path().to_path_buf())
    }

    #[test]
    fn week_id_has_fixed_width_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let id = week_id_for(date);
        assert_eq!(id, "2026-W02");

        let re = regex::Regex::new(r"^\d{4}-W\d{2}$").unwrap();
        assert!(re.is_match(&id));
    }

    #[test]
    fn week_id_follows_iso_year_boundaries() {
        // Mon 2025-12-29 opens the week holding Thu 2026-01-01.
        let date = chrono::NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
        assert_eq!(week_id_for(date), "2026-W01");

        // Fri 2027-01-01 still belongs to 2026's final week.
        let date = chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(week_id_for(date), "2026-W53");
    }

    #[test]
    fn embedding_text_labels_all_fields() {
        let text = embedding_text(&report("r1", "halfway"));
        assert_eq!(
            text,
            "Member: Ai\nCurrently trying: parser rewrite\nProgress: halfway\nResult: it parses"
        );
    }

    #[tokio::test]
    async fn archive_snapshots_reports_with_embeddings() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "X")).await.unwrap();

        let week_id = archive_reports(&store, &StubEmbedder, Some("2026-W02".into()), true)
            .await
            .unwrap();
        assert_eq!(week_id, "2026-W02");

        let record = history_get(&store, "2026-W02").await.unwrap().unwrap();
        assert_eq!(record.reports.len(), 1);
        let embeddings = record.embeddings.unwrap();
        assert_eq!(embeddings.len(), 1);
        assert_eq!(embeddings[0].report_id, "r1");
        assert_eq!(embeddings[0].embedding, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn archive_of_empty_report_set_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let err = archive_reports(&store, &StubEmbedder, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, OrangeError::NoReports));
    }

    #[tokio::test]
    async fn archive_survives_total_embedding_failure() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "X")).await.unwrap();

        let week_id = archive_reports(&store, &FailingEmbedder, Some("2026-W05".into()), true)
            .await
            .unwrap();

        let record = history_get(&store, &week_id).await.unwrap().unwrap();
        assert!(record.embeddings.is_none());
        assert_eq!(record.reports.len(), 1);
    }

    #[tokio::test]
    async fn archive_without_embeddings_never_calls_embedder() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "X")).await.unwrap();

        archive_reports(&store, &PanickingEmbedder, Some("2026-W06".into()), false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn snapshot_is_immune_to_later_live_edits() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "X")).await.unwrap();

        archive_reports(&store, &StubEmbedder, Some("2026-W02".into()), false)
            .await
            .unwrap();

        save_report(&store, &report("r1", "Y")).await.unwrap();

        let record = history_get(&store, "2026-W02").await.unwrap().unwrap();
        assert_eq!(record.reports[0].progress, "X");
    }

    #[tokio::test]
    async fn re_archiving_a_week_overwrites_it() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "first")).await.unwrap();
        archive_reports(&store, &StubEmbedder, Some("2026-W02".into()), false)
            .await
            .unwrap();

        save_report(&store, &report("r1", "second")).await.unwrap();
        archive_reports(&store, &StubEmbedder, Some("2026-W02".into()), false)
            .await
            .unwrap();

        let records = history_list(&store).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reports[0].progress, "second");
    }

    #[tokio::test]
    async fn history_list_is_newest_first() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        save_report(&store, &report("r1", "X")).await.unwrap();

        for week in ["2026-W02", "2025-W50", "2026-W10"] {
            archive_reports(&store, &StubEmbedder, Some(week.into()), false)
                .await
                .unwrap();
        }

        let weeks: Vec<String> = history_list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.week_id)
            .collect();
        assert_eq!(weeks, vec!["2026-W10", "2026-W02", "2025-W50"]);
    }
}
