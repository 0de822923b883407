//! Content workflow status derivation.
//!
//! Maps the direction, submission and feedback records of one content item to
//! a [`ContentStatus`], a display label, a hint for the next action and the
//! feedback gate. Pure and infallible: absent or malformed timestamps fall
//! through to the most conservative branch instead of erroring.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::deadlines::{days_until, urgency, DeadlinePolicy, DeadlineState, Urgency};
use super::display::{format_calendar_date, format_countdown, format_date, format_relative, pluralize};
use super::stage::DraftStage;
use super::status::ContentStatus;
use super::timestamps::start_of_day;
use super::types::{Direction, Revision, Submission};

/// Derived UI state for one content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: ContentStatus,
    pub label: String,
    pub next_action_hint: String,
    /// Whether the client may send another round of feedback right now
    pub can_submit_feedback: bool,
    pub feedback_remaining: usize,
    pub draft_stage: Option<DraftStage>,
    /// `None` once the item is approved or completed, or when no deadline is set
    pub content_deadline: Option<DeadlineState>,
}

/// Status classifier bound to a deadline policy
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier {
    policy: DeadlinePolicy,
}

impl StatusClassifier {
    pub fn new(policy: DeadlinePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DeadlinePolicy {
        &self.policy
    }

    pub fn classify(
        &self,
        direction: Option<&Direction>,
        submission: Option<&Submission>,
        feedback_history: &[Revision],
        direction_deadline: Option<NaiveDate>,
        content_deadline: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Classification {
        let submission = submission.filter(|submission| submission.has_file());

        let (status, next_action_hint) = match (direction, submission) {
            (_, Some(submission)) => self.submission_phase(submission, feedback_history),
            (Some(direction), None) => self.draft_phase(direction, now),
            (None, None) => self.direction_phase(direction_deadline, now),
        };

        let draft_stage = submission.map(|submission| submission.draft_number);
        let feedback_remaining = self
            .policy
            .max_feedback_cycles
            .saturating_sub(feedback_history.len());
        let can_submit_feedback = status == ContentStatus::AwaitingApproval
            && feedback_remaining > 0
            && !draft_stage.is_some_and(DraftStage::is_final);

        let label = match draft_stage {
            Some(stage) if !status.is_finished() => format!("{} · {}", status.label(), stage),
            _ => status.label().to_string(),
        };

        let content_deadline = if status.is_finished() {
            None
        } else {
            content_deadline.map(|date| {
                DeadlineState::evaluate(start_of_day(date), now, self.policy.direction_due_soon_days)
            })
        };

        tracing::debug!(
            status = ?status,
            feedback_count = feedback_history.len(),
            can_submit_feedback,
            "Classified content item"
        );

        Classification {
            status,
            label,
            next_action_hint: self.feedback_hint(status, next_action_hint, feedback_remaining, can_submit_feedback),
            can_submit_feedback,
            feedback_remaining,
            draft_stage,
            content_deadline,
        }
    }

    fn direction_phase(&self, deadline: Option<NaiveDate>, now: DateTime<Utc>) -> (ContentStatus, String) {
        // No deadline on record counts as already passed
        let Some(date) = deadline else {
            return (
                ContentStatus::DirectionOverdue,
                "No direction deadline on record; submit direction as soon as possible".to_string(),
            );
        };

        let deadline = start_of_day(date);
        let due = format_calendar_date(date);
        match urgency(deadline, now, self.policy.direction_due_soon_days) {
            Urgency::Overdue => (
                ContentStatus::DirectionOverdue,
                format!(
                    "Direction was due {} ({}); submit it as soon as possible",
                    due,
                    format_countdown(days_until(deadline, now))
                ),
            ),
            Urgency::DueSoon => (
                ContentStatus::DirectionDueSoon,
                format!(
                    "Direction due {} ({})",
                    format_countdown(days_until(deadline, now)),
                    due
                ),
            ),
            Urgency::Pending => (
                ContentStatus::AwaitingDirection,
                format!(
                    "Submit direction by {} ({} left)",
                    due,
                    pluralize(days_until(deadline, now), "day")
                ),
            ),
        }
    }

    fn draft_phase(&self, direction: &Direction, now: DateTime<Utc>) -> (ContentStatus, String) {
        let received = format_relative(direction.created_at, now);

        // Missing createdAt: the draft window is treated as already elapsed
        let Some(created_at) = direction.created_at else {
            return (
                ContentStatus::DraftOverdue,
                format!("Direction received {}; first draft is overdue", received),
            );
        };

        let deadline = self.policy.first_draft_deadline(created_at);
        let due = format_date(deadline);
        match urgency(deadline, now, self.policy.draft_due_soon_days) {
            Urgency::Overdue => (
                ContentStatus::DraftOverdue,
                format!(
                    "First draft was due {} ({}); agency upload outstanding",
                    due,
                    format_countdown(days_until(deadline, now))
                ),
            ),
            Urgency::DueSoon => (
                ContentStatus::DraftDueSoon,
                format!(
                    "First draft due {} ({})",
                    format_countdown(days_until(deadline, now)),
                    due
                ),
            ),
            Urgency::Pending => (
                ContentStatus::DirectionSubmitted,
                format!("Direction received {}; first draft due {}", received, due),
            ),
        }
    }

    fn submission_phase(&self, submission: &Submission, feedback_history: &[Revision]) -> (ContentStatus, String) {
        let status = submission
            .status
            .map(ContentStatus::from)
            .unwrap_or(ContentStatus::InProgress);
        let stage = submission.draft_number;

        let hint = match status {
            ContentStatus::AwaitingApproval => format!("Review {}", stage),
            ContentStatus::Approved => format!("{} approved; awaiting delivery", stage),
            ContentStatus::Completed => "Delivered".to_string(),
            _ => {
                let preparing = feedback_history
                    .iter()
                    .rev()
                    .find_map(|revision| revision.next_draft_stage)
                    .filter(|next| *next > stage)
                    .unwrap_or(stage);
                format!("Agency is preparing {}", preparing)
            }
        };
        (status, hint)
    }

    fn feedback_hint(&self, status: ContentStatus, hint: String, remaining: usize, open: bool) -> String {
        if status != ContentStatus::AwaitingApproval {
            return hint;
        }
        if open {
            format!(
                "{}: approve it or request changes ({} left)",
                hint,
                pluralize(remaining, "feedback round")
            )
        } else {
            format!("{}: approve it (no feedback rounds left)", hint)
        }
    }
}

/// Classify with the default deadline policy
pub fn classify(
    direction: Option<&Direction>,
    submission: Option<&Submission>,
    feedback_history: &[Revision],
    direction_deadline: Option<NaiveDate>,
    content_deadline: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Classification {
    StatusClassifier::default().classify(
        direction,
        submission,
        feedback_history,
        direction_deadline,
        content_deadline,
        now,
    )
}

/// Classify with a custom deadline policy
pub fn classify_with_policy(
    policy: DeadlinePolicy,
    direction: Option<&Direction>,
    submission: Option<&Submission>,
    feedback_history: &[Revision],
    direction_deadline: Option<NaiveDate>,
    content_deadline: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Classification {
    StatusClassifier::new(policy).classify(
        direction,
        submission,
        feedback_history,
        direction_deadline,
        content_deadline,
        now,
    )
}
