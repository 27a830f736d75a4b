//! AI enrichment flows: report teasers, idea titles, and spoken-update
//! summarization.
//!
//! Teasers and titles follow a two-phase write. Phase 1 persists the entity
//! with the [`PENDING`] placeholder and returns control immediately. Phase 2
//! is a detached task that generates the real value and performs a second,
//! resolving write, falling back to a truncation of the source text when
//! generation fails. Every written placeholder is resolved once the task
//! settles; the primary write never depends on the model being up.

use std::sync::Arc;

use colored::Colorize;
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::error::{OrangeError, Result};
use crate::llm::prompts::{
    idea_title_prompt, summarize_prompt, teaser_prompt, SYSTEM_REPORT_SUMMARIZER,
    SYSTEM_TEASER_WRITER, SYSTEM_TITLE_WRITER,
};
use crate::llm::ChatModel;
use crate::model::{Idea, Report};
use crate::store::{self, DocumentStore};

/// Placeholder written in phase 1, visible until the backfill resolves it.
pub const PENDING: &str = "generating...";

const TEASER_MAX_CHARS: usize = 20;
const TITLE_MAX_CHARS: usize = 30;
const FALLBACK_MAX_CHARS: usize = 30;

/// Deterministic stand-in when generation fails: the first 30 characters of
/// the source text, with an ellipsis when truncated.
pub fn fallback_line(source: &str) -> String {
    let truncated: String = source.chars().take(FALLBACK_MAX_CHARS).collect();
    if source.chars().count() > FALLBACK_MAX_CHARS {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Clean up a generated teaser: one line, no wrapping quotes, at most 20
/// characters, always ending in the trailing ellipsis that marks it as a
/// hook rather than a summary.
pub fn polish_teaser(raw: &str) -> String {
    let mut teaser = raw.replace('\n', " ").trim().to_string();
    teaser = teaser
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '「' | '」' | '『' | '』'))
        .trim()
        .to_string();
    teaser = teaser.chars().take(TEASER_MAX_CHARS).collect();

    if teaser.is_empty() {
        "New update...".to_string()
    } else {
        format!("{}...", teaser)
    }
}

/// Clean up a generated idea title: first line only, at most 30 characters.
pub fn polish_title(raw: &str) -> String {
    let title = raw.lines().next().unwrap_or_default().trim();
    let title = title
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '「' | '」' | '『' | '』'))
        .trim();
    title.chars().take(TITLE_MAX_CHARS).collect()
}

/// Save a report with a pending teaser, then resolve the teaser in a
/// detached task. The returned handle settles when the resolving write has
/// happened; callers that must not outrun it (the CLI) await the handle.
pub async fn save_report_with_teaser(
    store: Arc<dyn DocumentStore>,
    model: Arc<dyn ChatModel>,
    report: Report,
) -> Result<JoinHandle<()>> {
    let mut pending = report.clone();
    pending.teaser = Some(PENDING.to_string());
    crate::entities::reports::save_report(store.as_ref(), &pending).await?;

    let handle = tokio::spawn(async move {
        let teaser = match model.chat(SYSTEM_TEASER_WRITER, &teaser_prompt(&report)).await {
            Ok(raw) => polish_teaser(&raw),
            Err(_) => fallback_line(&report.progress),
        };

        let patch = serde_json::json!({ "teaser": teaser });
        if let Err(err) = store.put(store::REPORTS, &report.id, patch, true).await {
            eprintln!(
                "{} could not resolve pending teaser for report {}: {}",
                "Warning:".yellow(),
                report.id,
                err
            );
        }
    });

    Ok(handle)
}

/// Create an idea titled with the pending placeholder, then resolve the
/// title in a detached task. Same two-phase contract as
/// [`save_report_with_teaser`].
pub async fn add_idea_with_title(
    store: Arc<dyn DocumentStore>,
    model: Arc<dyn ChatModel>,
    member_id: &str,
    member_name: &str,
    content: &str,
) -> Result<(Idea, JoinHandle<()>)> {
    let idea =
        crate::entities::ideas::add_idea(store.as_ref(), member_id, member_name, PENDING, content)
            .await?;

    let idea_id = idea.id.clone();
    let content = content.to_string();
    let handle = tokio::spawn(async move {
        let title = match model.chat(SYSTEM_TITLE_WRITER, &idea_title_prompt(&content)).await {
            Ok(raw) => {
                let polished = polish_title(&raw);
                if polished.is_empty() {
                    fallback_line(&content)
                } else {
                    polished
                }
            }
            Err(_) => fallback_line(&content),
        };

        let patch = serde_json::json!({
            "ideaName": title,
            "updatedAt": chrono::Utc::now().to_rfc3339(),
        });
        if let Err(err) = store.put(store::IDEAS, &idea_id, patch, true).await {
            eprintln!(
                "{} could not resolve pending title for idea {}: {}",
                "Warning:".yellow(),
                idea_id,
                err
            );
        }
    });

    Ok((idea, handle))
}

/// The three report fields distilled from a spoken update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(default)]
    pub current_trial: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub result: String,
}

const NO_UPDATE: &str = "No update this week";

/// Turn a free-form spoken update into the three report fields. The model
/// answers in JSON, possibly wrapped in a markdown fence; the object is
/// extracted with a regex before parsing. Missing fields fill with a
/// "no update" marker.
pub async fn summarize_transcript(
    model: &dyn ChatModel,
    transcript: &str,
) -> Result<ReportSummary> {
    let response = model
        .chat(SYSTEM_REPORT_SUMMARIZER, &summarize_prompt(transcript))
        .await?;

    let summary = parse_summary(&response)?;
    Ok(summary)
}

fn parse_summary(response: &str) -> Result<ReportSummary> {
    let json_re = regex::Regex::new(r"(?s)\{.*\}").expect("static regex");
    let json = json_re
        .find(response)
        .ok_or_else(|| OrangeError::MalformedResponse("no JSON object in summary".into()))?;

    let mut summary: ReportSummary = serde_json::from_str(json.as_str())?;
    for field in [
        &mut summary.current_trial,
        &mut summary.progress,
        &mut summary.result,
    ] {
        if field.trim().is_empty() {
            *field = NO_UPDATE.to_string();
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ideas, reports};
    use crate::store::JsonDocumentStore;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::sync::Semaphore;

    struct StubChat(String);

    #[async_trait]
    impl ChatModel for StubChat {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatModel for FailingChat {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String> {
            Err(OrangeError::LlmEmptyResponse)
        }
    }

    /// Chat that blocks until the test opens the gate, so the pending phase
    /// can be observed deterministically.
    struct GatedChat {
        gate: Semaphore,
        answer: String,
    }

    #[async_trait]
    impl ChatModel for GatedChat {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String> {
            let _permit = self.gate.acquire().await.unwrap();
            Ok(self.answer.clone())
        }
    }

    fn report(id: &str) -> Report {
        Report {
            id: id.into(),
            nickname: "Ai".into(),
            current_trial: "trial".into(),
            progress: "rewrote the whole ingest pipeline this week".into(),
            result: "result".into(),
            teaser: None,
        }
    }

    // ── fallbacks and polish ────────────────────────────────────────────────

    #[test]
    fn fallback_truncates_and_marks_truncation() {
        assert_eq!(fallback_line("short"), "short");
        let long = "x".repeat(40);
        let fallback = fallback_line(&long);
        assert_eq!(fallback, format!("{}...", "x".repeat(30)));
    }

    #[test]
    fn fallback_respects_char_boundaries() {
        let long = "週".repeat(40);
        let fallback = fallback_line(&long);
        assert_eq!(fallback.chars().count(), 33);
    }

    #[test]
    fn polish_teaser_strips_wrapping_and_caps_length() {
        assert_eq!(polish_teaser("\"The day CI went green\"\n"), "The day CI went gree...");
        assert_eq!(polish_teaser("tiny"), "tiny...");
        assert_eq!(polish_teaser(""), "New update...");
    }

    #[test]
    fn polish_title_takes_first_line_only() {
        assert_eq!(polish_title("Plant-watering robot\nextra notes"), "Plant-watering robot");
        assert_eq!(polish_title("「自動水やり」"), "自動水やり");
    }

    // ── two-phase teaser ────────────────────────────────────────────────────

    #[tokio::test]
    async fn teaser_pending_is_visible_then_resolved() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn DocumentStore> =
            Arc::new(JsonDocumentStore::new(tmp.path().to_path_buf()));
        let chat = Arc::new(GatedChat {
            gate: Semaphore::new(0),
            answer: "CI finally went green".into(),
        });

        let handle = save_report_with_teaser(store.clone(), chat.clone(), report("r1"))
            .await
            .unwrap();

        // Phase 1 is already durable while the model call is still pending.
        let stored = reports::get_report(store.as_ref(), "r1").await.unwrap().unwrap();
        assert_eq!(stored.teaser.as_deref(), Some(PENDING));

        chat.gate.add_permits(1);
        handle.await.unwrap();

        let stored = reports::get_report(store.as_ref(), "r1").await.unwrap().unwrap();
        assert_eq!(stored.teaser.as_deref(), Some("CI finally went gree..."));
    }

    #[tokio::test]
    async fn teaser_failure_resolves_to_fallback() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn DocumentStore> =
            Arc::new(JsonDocumentStore::new(tmp.path().to_path_buf()));

        let handle = save_report_with_teaser(store.clone(), Arc::new(FailingChat), report("r1"))
            .await
            .unwrap();
        handle.await.unwrap();

        let stored = reports::get_report(store.as_ref(), "r1").await.unwrap().unwrap();
        let teaser = stored.teaser.unwrap();
        assert_ne!(teaser, PENDING);
        assert!(teaser.starts_with("rewrote the whole ingest"));
    }

    // ── two-phase idea title ────────────────────────────────────────────────

    #[tokio::test]
    async fn idea_title_resolves_after_backfill() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn DocumentStore> =
            Arc::new(JsonDocumentStore::new(tmp.path().to_path_buf()));
        let chat = Arc::new(StubChat("Plant-watering robot".into()));

        let (idea, handle) =
            add_idea_with_title(store.clone(), chat, "m1", "Ai", "a robot that waters plants")
                .await
                .unwrap();
        assert_eq!(idea.idea_name, PENDING);

        handle.await.unwrap();

        let stored = ideas::get_idea(store.as_ref(), &idea.id).await.unwrap().unwrap();
        assert_eq!(stored.idea_name, "Plant-watering robot");
        assert!(stored.updated_at >= idea.updated_at);
    }

    #[tokio::test]
    async fn idea_title_failure_resolves_to_fallback() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn DocumentStore> =
            Arc::new(JsonDocumentStore::new(tmp.path().to_path_buf()));

        let (idea, handle) = add_idea_with_title(
            store.clone(),
            Arc::new(FailingChat),
            "m1",
            "Ai",
            "a robot that waters plants",
        )
        .await
        .unwrap();
        handle.await.unwrap();

        let stored = ideas::get_idea(store.as_ref(), &idea.id).await.unwrap().unwrap();
        assert_eq!(stored.idea_name, "a robot that waters plants");
    }

    // ── transcript summarization ────────────────────────────────────────────

    #[tokio::test]
    async fn summary_parses_fenced_json() {
        let chat = StubChat(
            "```json\n{\"currentTrial\": \"testing embeddings\", \"progress\": \"halfway\", \"result\": \"promising\"}\n```"
                .into(),
        );
        let summary = summarize_transcript(&chat, "this week I ...").await.unwrap();
        assert_eq!(summary.current_trial, "testing embeddings");
        assert_eq!(summary.progress, "halfway");
        assert_eq!(summary.result, "promising");
    }

    #[tokio::test]
    async fn summary_fills_missing_fields() {
        let chat = StubChat("{\"progress\": \"halfway\"}".into());
        let summary = summarize_transcript(&chat, "this week I ...").await.unwrap();
        assert_eq!(summary.current_trial, NO_UPDATE);
        assert_eq!(summary.result, NO_UPDATE);
    }

    #[tokio::test]
    async fn summary_without_json_is_malformed() {
        let chat = StubChat("I could not produce a summary".into());
        let err = summarize_transcript(&chat, "this week I ...").await.unwrap_err();
        assert!(matches!(err, OrangeError::MalformedResponse(_)));
    }
}
