//! In-memory portal store.
//!
//! Holds the three content collections (directions, submissions, revisions)
//! and per-client package settings. Every write runs through
//! [`ContentWorkflow`], so the feedback cap and the forward-only draft
//! sequence are enforced here rather than left to callers.

pub mod errors;
pub mod persistence;
pub mod snapshot;

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::workflow::{
    Classification, ContentKey, ContentWorkflow, DeadlinePolicy, Direction, DraftStage, Revision,
    RevisionStatus, StatusClassifier, Submission,
};

pub use errors::{PersistenceError, StoreError};
pub use persistence::{JsonFileStore, SnapshotStore};
pub use snapshot::{ClientSettings, PortalSnapshot};

use crate::workflow::types::normalize_email;

const CONTENT_ID_PREFIX: &str = "content-";

/// Compiled once; `None` only if the pattern itself fails to compile
fn email_pattern() -> Option<&'static Regex> {
    static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|pattern| pattern.is_match(email))
}

/// Content ids sort by their trailing number so `content-10` follows `content-9`
fn content_sort_key(content_id: &str) -> (u64, String) {
    let digits = content_id.len() - content_id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let number = content_id
        .get(content_id.len() - digits..)
        .and_then(|suffix| suffix.parse().ok())
        .unwrap_or(u64::MAX);
    (number, content_id.to_string())
}

/// Borrowed view of the records for one content item
#[derive(Debug, Clone, Copy)]
pub struct ContentRecords<'a> {
    pub direction: Option<&'a Direction>,
    pub submission: Option<&'a Submission>,
    pub revisions: &'a [Revision],
}

#[derive(Debug, Clone, Default)]
pub struct PortalStore {
    policy: DeadlinePolicy,
    clients: BTreeMap<String, ClientSettings>,
    directions: BTreeMap<ContentKey, Direction>,
    submissions: BTreeMap<ContentKey, Submission>,
    revisions: BTreeMap<ContentKey, Vec<Revision>>,
}

impl PortalStore {
    pub fn new(policy: DeadlinePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Index a snapshot. Later duplicates of a direction or submission replace
    /// earlier ones; revisions keep their stored order.
    pub fn from_snapshot(snapshot: PortalSnapshot, policy: DeadlinePolicy) -> Self {
        let mut store = Self::new(policy);

        for mut client in snapshot.clients {
            client.client_email = normalize_email(&client.client_email);
            store.clients.insert(client.client_email.clone(), client);
        }
        for direction in snapshot.directions {
            store.directions.insert(direction.key(), direction);
        }
        for submission in snapshot.submissions {
            store.submissions.insert(submission.key(), submission);
        }
        for revision in snapshot.revisions {
            store.revisions.entry(revision.key()).or_default().push(revision);
        }

        store
    }

    pub fn to_snapshot(&self) -> PortalSnapshot {
        PortalSnapshot {
            clients: self.clients.values().cloned().collect(),
            directions: self.directions.values().cloned().collect(),
            submissions: self.submissions.values().cloned().collect(),
            revisions: self.revisions.values().flatten().cloned().collect(),
        }
    }

    pub fn policy(&self) -> &DeadlinePolicy {
        &self.policy
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientSettings> {
        self.clients.values()
    }

    pub fn client(&self, email: &str) -> Result<&ClientSettings, StoreError> {
        let email = normalize_email(email);
        self.clients
            .get(&email)
            .ok_or(StoreError::UnknownClient(email))
    }

    /// Create or update a client's package settings
    pub fn register_client(&mut self, mut settings: ClientSettings) -> Result<&ClientSettings, StoreError> {
        settings.client_email = normalize_email(&settings.client_email);
        if !is_valid_email(&settings.client_email) {
            return Err(StoreError::InvalidEmail(settings.client_email));
        }

        info!(
            client = %settings.client_email,
            content_count = settings.content_count,
            "Client registered"
        );
        let email = settings.client_email.clone();
        self.clients.insert(email.clone(), settings);
        self.client(&email)
    }

    /// Package slots plus any content ids that already have records, in content order
    pub fn content_ids_for(&self, email: &str) -> Result<Vec<String>, StoreError> {
        let client = self.client(email)?;
        let mut ids: BTreeSet<String> = (1..=client.content_count)
            .map(|number| format!("{}{}", CONTENT_ID_PREFIX, number))
            .collect();

        let recorded = self
            .directions
            .keys()
            .chain(self.submissions.keys())
            .chain(self.revisions.keys())
            .filter(|key| key.client_email == client.client_email)
            .map(|key| key.content_id.clone());
        ids.extend(recorded);

        let mut ids: Vec<String> = ids.into_iter().collect();
        ids.sort_by_key(|id| content_sort_key(id));
        Ok(ids)
    }

    pub fn content_item(&self, key: &ContentKey) -> ContentRecords<'_> {
        ContentRecords {
            direction: self.directions.get(key),
            submission: self.submissions.get(key),
            revisions: self.revisions.get(key).map(Vec::as_slice).unwrap_or_default(),
        }
    }

    pub fn classify(&self, key: &ContentKey, now: DateTime<Utc>) -> Result<Classification, StoreError> {
        let client = self.client(&key.client_email)?;
        let records = self.content_item(key);
        Ok(StatusClassifier::new(self.policy).classify(
            records.direction,
            records.submission,
            records.revisions,
            client.direction_deadline,
            client.content_deadline,
            now,
        ))
    }

    pub fn submit_direction(
        &mut self,
        key: &ContentKey,
        text: &str,
        file_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Direction, StoreError> {
        self.ensure_in_package(key)?;
        if text.trim().is_empty() {
            return Err(StoreError::EmptyDirection);
        }
        if self.directions.contains_key(key) {
            return Err(StoreError::DirectionAlreadySubmitted(key.clone()));
        }

        let direction = Direction {
            content_id: key.content_id.clone(),
            client_email: key.client_email.clone(),
            direction: text.trim().to_string(),
            file_url: non_empty(file_url),
            created_at: Some(now),
        };
        info!(client = %key.client_email, content = %key.content_id, "Direction submitted");
        Ok(self.directions.entry(key.clone()).or_insert(direction))
    }

    /// Agency draft upload: creates the submission or advances it one stage
    pub fn upload_draft(
        &mut self,
        key: &ContentKey,
        file_url: &str,
        caption: &str,
        now: DateTime<Utc>,
    ) -> Result<&Submission, StoreError> {
        self.ensure_in_package(key)?;
        if file_url.trim().is_empty() {
            return Err(StoreError::MissingFile);
        }
        if !self.directions.contains_key(key) {
            return Err(StoreError::MissingDirection(key.clone()));
        }

        let mut workflow = self.workflow_for(key);
        let stage = workflow.upload_draft().map_err(|source| StoreError::Workflow {
            key: key.clone(),
            source,
        })?;

        // A new draft answers every outstanding feedback round
        if let Some(revisions) = self.revisions.get_mut(key) {
            for revision in revisions.iter_mut().filter(|revision| revision.is_open()) {
                revision.status = RevisionStatus::Resolved;
            }
        }

        let submission = self
            .submissions
            .entry(key.clone())
            .or_insert_with(|| Submission {
                content_id: key.content_id.clone(),
                client_email: key.client_email.clone(),
                file_url: None,
                caption: String::new(),
                draft_number: DraftStage::Draft1,
                status: None,
                submitted_at: Some(now),
                last_updated_at: None,
            });
        submission.file_url = Some(file_url.trim().to_string());
        submission.caption = caption.trim().to_string();
        submission.draft_number = stage;
        submission.status = workflow.submission_status();
        submission.last_updated_at = Some(now);

        info!(
            client = %key.client_email,
            content = %key.content_id,
            stage = %stage,
            "Draft uploaded"
        );
        Ok(submission)
    }

    /// Client feedback round; rejected once the cap is reached
    pub fn submit_feedback(
        &mut self,
        key: &ContentKey,
        feedback: &str,
        file_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Revision, StoreError> {
        self.ensure_in_package(key)?;
        if feedback.trim().is_empty() {
            return Err(StoreError::EmptyFeedback);
        }
        if !self.submissions.contains_key(key) {
            return Err(StoreError::NoSubmission(key.clone()));
        }

        let mut workflow = self.workflow_for(key);
        let next_stage = workflow.submit_feedback().map_err(|source| {
            warn!(
                client = %key.client_email,
                content = %key.content_id,
                error = %source,
                "Feedback rejected"
            );
            StoreError::Workflow {
                key: key.clone(),
                source,
            }
        })?;

        if let Some(submission) = self.submissions.get_mut(key) {
            submission.status = workflow.submission_status();
            submission.last_updated_at = Some(now);
        }

        let revisions = self.revisions.entry(key.clone()).or_default();
        revisions.push(Revision {
            content_id: key.content_id.clone(),
            client_email: key.client_email.clone(),
            feedback: feedback.trim().to_string(),
            file_url: non_empty(file_url),
            created_at: Some(now),
            status: RevisionStatus::Submitted,
            next_draft_stage: Some(next_stage),
        });

        info!(
            client = %key.client_email,
            content = %key.content_id,
            round = revisions.len(),
            next_stage = %next_stage,
            "Feedback submitted"
        );
        revisions
            .last()
            .ok_or_else(|| StoreError::NoSubmission(key.clone()))
    }

    pub fn approve(&mut self, key: &ContentKey, now: DateTime<Utc>) -> Result<&Submission, StoreError> {
        self.apply(key, now, |workflow| workflow.approve().map(|_| ()))
    }

    pub fn complete(&mut self, key: &ContentKey, now: DateTime<Utc>) -> Result<&Submission, StoreError> {
        self.apply(key, now, ContentWorkflow::complete)
    }

    fn apply<F>(&mut self, key: &ContentKey, now: DateTime<Utc>, step: F) -> Result<&Submission, StoreError>
    where
        F: FnOnce(&mut ContentWorkflow) -> Result<(), crate::workflow::WorkflowError>,
    {
        self.ensure_in_package(key)?;
        let mut workflow = self.workflow_for(key);
        step(&mut workflow).map_err(|source| StoreError::Workflow {
            key: key.clone(),
            source,
        })?;

        let submission = self
            .submissions
            .get_mut(key)
            .ok_or_else(|| StoreError::NoSubmission(key.clone()))?;
        submission.status = workflow.submission_status();
        submission.last_updated_at = Some(now);

        info!(
            client = %key.client_email,
            content = %key.content_id,
            status = ?submission.status,
            "Submission status updated"
        );
        Ok(submission)
    }

    fn workflow_for(&self, key: &ContentKey) -> ContentWorkflow {
        let records = self.content_item(key);
        ContentWorkflow::resume(records.submission, records.revisions.len(), &self.policy)
    }

    fn ensure_in_package(&self, key: &ContentKey) -> Result<(), StoreError> {
        if self.content_ids_for(&key.client_email)?.contains(&key.content_id) {
            Ok(())
        } else {
            Err(StoreError::UnknownContent(key.clone()))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{ContentStatus, SubmissionStatus, WorkflowError};
    use chrono::{NaiveDate, TimeZone};

    const CLIENT: &str = "client@example.com";

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).unwrap()
    }

    fn store_with_client() -> PortalStore {
        let mut store = PortalStore::new(DeadlinePolicy::default());
        store
            .register_client(ClientSettings {
                client_email: "Client@Example.com".to_string(),
                display_name: None,
                content_count: 2,
                direction_deadline: NaiveDate::from_ymd_opt(2025, 5, 5),
                content_deadline: NaiveDate::from_ymd_opt(2025, 5, 31),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_register_client_validates_email() {
        let mut store = PortalStore::default();
        let result = store.register_client(ClientSettings {
            client_email: "not-an-email".to_string(),
            display_name: None,
            content_count: 1,
            direction_deadline: None,
            content_deadline: None,
        });
        assert!(matches!(result, Err(StoreError::InvalidEmail(_))));
    }

    #[test]
    fn test_content_ids_follow_numeric_order() {
        let mut store = store_with_client();
        store.clients.get_mut(CLIENT).unwrap().content_count = 11;
        let ids = store.content_ids_for(CLIENT).unwrap();
        assert_eq!(ids.len(), 11);
        assert_eq!(ids[1], "content-2");
        assert_eq!(ids[10], "content-11");
    }

    #[test]
    fn test_direction_is_written_once() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-1");

        store.submit_direction(&key, "Show the terrace at sunset", None, at(1)).unwrap();
        let second = store.submit_direction(&key, "Actually, mornings", None, at(2));
        assert!(matches!(second, Err(StoreError::DirectionAlreadySubmitted(_))));

        let empty = store.submit_direction(&ContentKey::new(CLIENT, "content-2"), "   ", None, at(2));
        assert!(matches!(empty, Err(StoreError::EmptyDirection)));

        let outside = store.submit_direction(&ContentKey::new(CLIENT, "content-9"), "Brief", None, at(2));
        assert!(matches!(outside, Err(StoreError::UnknownContent(_))));
    }

    #[test]
    fn test_upload_requires_direction_and_file() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-1");

        let result = store.upload_draft(&key, "https://files.example.com/d1.png", "", at(2));
        assert!(matches!(result, Err(StoreError::MissingDirection(_))));

        store.submit_direction(&key, "Brief", None, at(1)).unwrap();
        let result = store.upload_draft(&key, "  ", "", at(2));
        assert!(matches!(result, Err(StoreError::MissingFile)));
    }

    #[test]
    fn test_feedback_cycle_is_capped() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-1");
        store.submit_direction(&key, "Brief", None, at(1)).unwrap();

        for round in 0..3 {
            store
                .upload_draft(&key, &format!("https://files.example.com/d{}.png", round), "", at(2))
                .unwrap();
            let revision = store.submit_feedback(&key, "More contrast", None, at(3)).unwrap();
            assert_eq!(revision.next_draft_stage, DraftStage::ALL.get(round + 1).copied());
        }

        let submission = store
            .upload_draft(&key, "https://files.example.com/final.png", "Final", at(4))
            .unwrap();
        assert_eq!(submission.draft_number, DraftStage::FinalDraft);
        assert_eq!(submission.status, Some(SubmissionStatus::AwaitingApproval));

        let rejected = store.submit_feedback(&key, "One more thing", None, at(5));
        assert!(matches!(
            rejected,
            Err(StoreError::Workflow {
                source: WorkflowError::FeedbackLimitReached { limit: 3 },
                ..
            })
        ));
        assert_eq!(store.content_item(&key).revisions.len(), 3);
        assert!(store.content_item(&key).revisions.iter().all(|revision| !revision.is_open()));

        let classification = store.classify(&key, at(5)).unwrap();
        assert_eq!(classification.status, ContentStatus::AwaitingApproval);
        assert!(!classification.can_submit_feedback);
    }

    #[test]
    fn test_approve_then_complete() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-2");
        store.submit_direction(&key, "Brief", None, at(1)).unwrap();
        store.upload_draft(&key, "https://files.example.com/d1.png", "", at(2)).unwrap();

        let early = store.complete(&key, at(3));
        assert!(matches!(
            early,
            Err(StoreError::Workflow { source: WorkflowError::NotApproved, .. })
        ));

        let approved = store.approve(&key, at(3)).unwrap();
        assert_eq!(approved.status, Some(SubmissionStatus::Approved));
        let completed = store.complete(&key, at(4)).unwrap();
        assert_eq!(completed.status, Some(SubmissionStatus::Completed));

        let rejected = store.submit_feedback(&key, "Late note", None, at(5));
        assert!(matches!(
            rejected,
            Err(StoreError::Workflow { source: WorkflowError::AlreadyCompleted, .. })
        ));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_records() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-1");
        store.submit_direction(&key, "Brief", Some("https://files.example.com/ref.pdf".to_string()), at(1)).unwrap();
        store.upload_draft(&key, "https://files.example.com/d1.png", "Caption", at(2)).unwrap();
        store.submit_feedback(&key, "Crop tighter", None, at(3)).unwrap();

        let restored = PortalStore::from_snapshot(store.to_snapshot(), DeadlinePolicy::default());
        let records = restored.content_item(&key);
        assert_eq!(records.direction, store.content_item(&key).direction);
        assert_eq!(records.submission.map(|s| s.status), Some(Some(SubmissionStatus::InProgress)));
        assert_eq!(records.revisions.len(), 1);
        assert_eq!(
            restored.classify(&key, at(3)).unwrap().status,
            ContentStatus::InProgress
        );
    }

    #[test]
    fn test_writes_outside_package_are_rejected() {
        let mut store = store_with_client();
        let key = ContentKey::new(CLIENT, "content-9");
        // Leftover record from an import whose package has since shrunk
        store.submissions.insert(
            key.clone(),
            Submission {
                content_id: key.content_id.clone(),
                client_email: key.client_email.clone(),
                file_url: Some("https://files.example.com/old.png".to_string()),
                caption: String::new(),
                draft_number: DraftStage::Draft1,
                status: Some(SubmissionStatus::AwaitingApproval),
                submitted_at: Some(at(1)),
                last_updated_at: None,
            },
        );

        let feedback = store.submit_feedback(&key, "Brighter", None, at(2));
        assert!(matches!(feedback, Err(StoreError::UnknownContent(_))));
        assert!(store.content_item(&key).revisions.is_empty());

        let approved = store.approve(&key, at(2));
        assert!(matches!(approved, Err(StoreError::UnknownContent(_))));
    }

    #[test]
    fn test_unknown_client_lookup_fails() {
        let store = store_with_client();
        let key = ContentKey::new("other@example.com", "content-1");
        assert!(matches!(store.classify(&key, at(1)), Err(StoreError::UnknownClient(_))));
    }
}
