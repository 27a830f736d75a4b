//! Entity types shared across the store, services, and CLI.
//!
//! Field names on the wire are the original deployment's camelCase keys;
//! existing documents must keep round-tripping unchanged.

use serde::{Deserialize, Serialize};

/// A member's weekly status. Mutable while live; archived copies are frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub current_trial: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub result: String,
    /// One-line AI-generated hook. Best-effort enrichment, may be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaser: Option<String>,
}

impl Report {
    /// Reset the narrative fields for a new reporting cycle.
    pub fn cleared(&self) -> Report {
        Report {
            id: self.id.clone(),
            nickname: self.nickname.clone(),
            current_trial: String::new(),
            progress: String::new(),
            result: String::new(),
            teaser: None,
        }
    }
}

/// Immutable snapshot of all live reports for one ISO week.
///
/// `week_id` is the natural key (`YYYY-Wxx`); re-archiving the same week
/// overwrites. The `reports` list is a value copy taken at save time;
/// later edits to live reports never reach a stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHistory {
    pub week_id: String,
    pub saved_at: String,
    pub reports: Vec<Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<ReportEmbedding>>,
}

/// Embedding derived from one archived report.
///
/// All vectors stored by one deployment must come from the same embedding
/// model version; comparing vectors of different dimensions is rejected at
/// similarity time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEmbedding {
    pub report_id: String,
    pub nickname: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A free-form idea note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub member_name: String,
    #[serde(default)]
    pub idea_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A member profile. `Report.nickname` matches `name` by convention only;
/// mismatches are tolerated and displayed as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_no1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_no2: Option<String>,
    // Legacy documents carry either spelling; canonical key is "birthdate".
    #[serde(rename = "birthdate", alias = "birthDate", default)]
    pub birth_date: String,
    #[serde(default)]
    pub hometown: String,
    #[serde(default)]
    pub hobbies: String,
    #[serde(default)]
    pub thoughts: String,
    #[serde(default)]
    pub career: String,
}

impl Member {
    /// Drop session-scoped `blob:` image URLs left behind by old clients.
    /// Applied on every read and before every write so they never persist.
    pub fn normalize(mut self) -> Member {
        self.image_no1 = sanitize_url(self.image_no1);
        self.image_no2 = sanitize_url(self.image_no2);
        self
    }
}

fn sanitize_url(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.starts_with("blob:"))
}

/// Millisecond-timestamp id, matching the ids already in the store.
pub fn new_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
