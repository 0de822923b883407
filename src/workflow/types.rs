use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::{self, DraftStage, SubmissionStatus};
use super::timestamps;

/// Identity of a content item: one deliverable in a client's package
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentKey {
    pub client_email: String,
    pub content_id: String,
}

impl ContentKey {
    pub fn new(client_email: impl AsRef<str>, content_id: impl AsRef<str>) -> Self {
        Self {
            client_email: normalize_email(client_email.as_ref()),
            content_id: content_id.as_ref().trim().to_string(),
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_email, self.content_id)
    }
}

/// Emails are compared case-insensitively everywhere in the portal
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Client brief for one content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Direction {
    pub content_id: String,
    pub client_email: String,
    pub direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, with = "timestamps::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Direction {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(&self.client_email, &self.content_id)
    }
}

/// Agency deliverable for one content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub content_id: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default)]
    pub caption: String,
    #[serde(default, with = "stage::lenient")]
    pub draft_number: DraftStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    #[serde(default, with = "timestamps::lenient")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamps::lenient")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(&self.client_email, &self.content_id)
    }

    /// A submission only counts once a deliverable file is attached
    pub fn has_file(&self) -> bool {
        self.file_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionStatus {
    #[default]
    Submitted,
    Resolved,
    #[serde(other)]
    Unrecognized,
}

/// One client feedback cycle on a submission. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub content_id: String,
    pub client_email: String,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, with = "timestamps::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: RevisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "stage::lenient_next")]
    pub next_draft_stage: Option<DraftStage>,
}

impl Revision {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(&self.client_email, &self.content_id)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, RevisionStatus::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_key_normalizes_email() {
        let key = ContentKey::new("  Client@Example.COM ", " content-1 ");
        assert_eq!(key.client_email, "client@example.com");
        assert_eq!(key.content_id, "content-1");
        assert_eq!(key.to_string(), "client@example.com/content-1");
    }

    #[test]
    fn test_submission_decodes_store_document() {
        let submission: Submission = serde_json::from_value(json!({
            "contentId": "content-2",
            "clientEmail": "client@example.com",
            "fileUrl": "https://files.example.com/draft.png",
            "caption": "Spring launch",
            "draftNumber": "Draft 2",
            "status": "AWAITING_APPROVAL",
            "submittedAt": {"seconds": 1746057600, "nanoseconds": 0},
            "lastUpdatedAt": "not a date"
        }))
        .unwrap();

        assert!(submission.has_file());
        assert_eq!(submission.draft_number, DraftStage::Draft2);
        assert_eq!(submission.status, Some(SubmissionStatus::AwaitingApproval));
        assert!(submission.submitted_at.is_some());
        assert!(submission.last_updated_at.is_none());
    }

    #[test]
    fn test_submission_without_file_has_no_file() {
        let submission: Submission = serde_json::from_value(json!({
            "contentId": "content-1",
            "clientEmail": "client@example.com",
            "fileUrl": "   "
        }))
        .unwrap();

        assert!(!submission.has_file());
        assert_eq!(submission.draft_number, DraftStage::Draft1);
        assert_eq!(submission.status, None);
    }

    #[test]
    fn test_revision_status_defaults_to_submitted() {
        let revision: Revision = serde_json::from_value(json!({
            "contentId": "content-1",
            "clientEmail": "client@example.com",
            "feedback": "Warmer colours please",
            "nextDraftStage": "Draft 2"
        }))
        .unwrap();

        assert!(revision.is_open());
        assert_eq!(revision.next_draft_stage, Some(DraftStage::Draft2));
    }
}
