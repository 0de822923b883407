//! Submission lifecycle: forward-only draft progression and the feedback gate.
//!
//! The state machine itself only moves between phases. [`ContentWorkflow`]
//! checks every precondition first and reports a typed error, so an event that
//! reaches the machine is always a legal one.

use serde::{Deserialize, Serialize};
use statig::prelude::*;
use thiserror::Error;

use super::deadlines::DeadlinePolicy;
use super::stage::{DraftStage, SubmissionStatus};
use super::types::Submission;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    UploadDraft,
    SubmitFeedback,
    Approve,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("No draft has been uploaded yet")]
    NoDraftUploaded,
    #[error("{stage} is awaiting client review; wait for feedback or approval before uploading")]
    DraftAwaitingReview { stage: DraftStage },
    #[error("All draft stages have been used")]
    StagesExhausted,
    #[error("No draft is awaiting review")]
    NothingToReview,
    #[error("Feedback limit of {limit} rounds reached")]
    FeedbackLimitReached { limit: usize },
    #[error("The final draft cannot receive further feedback")]
    FinalDraftReached,
    #[error("Content has already been approved")]
    AlreadyApproved,
    #[error("Content has not been approved yet")]
    NotApproved,
    #[error("Content has already been completed")]
    AlreadyCompleted,
}

/// Coarse phase of a submission, mirrored from the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    AwaitingDraft,
    AwaitingApproval,
    Revising,
    Approved,
    Completed,
}

impl LifecyclePhase {
    /// Status written to the submission document; `None` before the first upload
    pub fn submission_status(self) -> Option<SubmissionStatus> {
        match self {
            LifecyclePhase::AwaitingDraft => None,
            LifecyclePhase::AwaitingApproval => Some(SubmissionStatus::AwaitingApproval),
            LifecyclePhase::Revising => Some(SubmissionStatus::InProgress),
            LifecyclePhase::Approved => Some(SubmissionStatus::Approved),
            LifecyclePhase::Completed => Some(SubmissionStatus::Completed),
        }
    }
}

#[derive(Debug, Default)]
pub struct SubmissionLifecycle {
    current_draft: Option<DraftStage>,
}

#[state_machine(initial = "State::awaiting_draft()")]
impl SubmissionLifecycle {
    #[state]
    fn awaiting_draft(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::UploadDraft => {
                self.current_draft = Some(DraftStage::Draft1);
                tracing::debug!(stage = %DraftStage::Draft1, "First draft uploaded");
                Transition(State::awaiting_approval())
            }
            _ => Handled,
        }
    }

    #[state]
    fn awaiting_approval(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::SubmitFeedback => {
                tracing::debug!(stage = ?self.current_draft, "Feedback submitted");
                Transition(State::revising())
            }
            SubmissionEvent::Approve => {
                tracing::debug!(stage = ?self.current_draft, "Draft approved");
                Transition(State::approved())
            }
            _ => Handled,
        }
    }

    #[state]
    fn revising(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::UploadDraft => {
                self.current_draft = self.current_draft.and_then(DraftStage::next);
                tracing::debug!(stage = ?self.current_draft, "Revised draft uploaded");
                Transition(State::awaiting_approval())
            }
            _ => Handled,
        }
    }

    #[state]
    fn approved(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Complete => Transition(State::completed()),
            _ => Handled,
        }
    }

    #[state]
    fn completed(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        tracing::debug!(ignored = ?event, "Content already completed");
        Handled
    }
}

/// Fallible wrapper around the submission state machine
pub struct ContentWorkflow {
    machine: StateMachine<SubmissionLifecycle>,
    max_feedback_cycles: usize,
    /// Feedback rounds on record; the machine itself only tracks phase and stage
    feedback_count: usize,
}

impl ContentWorkflow {
    pub fn new(policy: &DeadlinePolicy) -> Self {
        Self {
            machine: SubmissionLifecycle::default().state_machine(),
            max_feedback_cycles: policy.max_feedback_cycles,
            feedback_count: 0,
        }
    }

    /// Rebuild the workflow from stored records.
    ///
    /// The stored status decides the phase and the draft number decides the
    /// stage; the feedback count comes only from the stored history.
    pub fn resume(submission: Option<&Submission>, feedback_count: usize, policy: &DeadlinePolicy) -> Self {
        let mut workflow = Self::new(policy);
        workflow.feedback_count = feedback_count;
        let Some(submission) = submission.filter(|submission| submission.has_file()) else {
            return workflow;
        };

        // Walk the machine up to the stored stage
        workflow.machine.handle(&SubmissionEvent::UploadDraft);
        for _ in 1..submission.draft_number.ordinal() {
            workflow.machine.handle(&SubmissionEvent::SubmitFeedback);
            workflow.machine.handle(&SubmissionEvent::UploadDraft);
        }

        match submission.status {
            Some(SubmissionStatus::AwaitingApproval) => {}
            Some(SubmissionStatus::Approved) => {
                workflow.machine.handle(&SubmissionEvent::Approve);
            }
            Some(SubmissionStatus::Completed) => {
                workflow.machine.handle(&SubmissionEvent::Approve);
                workflow.machine.handle(&SubmissionEvent::Complete);
            }
            // A draft on file that is not under review: the next one is being prepared
            Some(SubmissionStatus::InProgress) | Some(SubmissionStatus::Unrecognized) | None => {
                workflow.machine.handle(&SubmissionEvent::SubmitFeedback);
            }
        }

        workflow
    }

    pub fn phase(&self) -> LifecyclePhase {
        match self.machine.state() {
            State::AwaitingDraft { .. } => LifecyclePhase::AwaitingDraft,
            State::AwaitingApproval { .. } => LifecyclePhase::AwaitingApproval,
            State::Revising { .. } => LifecyclePhase::Revising,
            State::Approved { .. } => LifecyclePhase::Approved,
            State::Completed { .. } => LifecyclePhase::Completed,
        }
    }

    pub fn current_draft(&self) -> Option<DraftStage> {
        self.machine.inner().current_draft
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback_count
    }

    pub fn feedback_remaining(&self) -> usize {
        self.max_feedback_cycles.saturating_sub(self.feedback_count())
    }

    pub fn submission_status(&self) -> Option<SubmissionStatus> {
        self.phase().submission_status()
    }

    /// Upload the next draft. Returns the stage the upload carries.
    pub fn upload_draft(&mut self) -> Result<DraftStage, WorkflowError> {
        let stage = match self.phase() {
            LifecyclePhase::AwaitingDraft => DraftStage::Draft1,
            LifecyclePhase::Revising => self
                .current_draft()
                .and_then(DraftStage::next)
                .ok_or(WorkflowError::StagesExhausted)?,
            LifecyclePhase::AwaitingApproval => {
                return Err(WorkflowError::DraftAwaitingReview {
                    stage: self.current_draft().unwrap_or_default(),
                })
            }
            LifecyclePhase::Approved => return Err(WorkflowError::AlreadyApproved),
            LifecyclePhase::Completed => return Err(WorkflowError::AlreadyCompleted),
        };

        self.machine.handle(&SubmissionEvent::UploadDraft);
        Ok(stage)
    }

    /// Record a feedback round. Returns the stage the next draft will carry.
    pub fn submit_feedback(&mut self) -> Result<DraftStage, WorkflowError> {
        match self.phase() {
            LifecyclePhase::AwaitingApproval => {}
            LifecyclePhase::Approved => return Err(WorkflowError::AlreadyApproved),
            LifecyclePhase::Completed => return Err(WorkflowError::AlreadyCompleted),
            LifecyclePhase::AwaitingDraft | LifecyclePhase::Revising => {
                return Err(WorkflowError::NothingToReview)
            }
        }

        if self.feedback_remaining() == 0 {
            return Err(WorkflowError::FeedbackLimitReached {
                limit: self.max_feedback_cycles,
            });
        }

        let next = self
            .current_draft()
            .and_then(DraftStage::next)
            .ok_or(WorkflowError::FinalDraftReached)?;

        self.machine.handle(&SubmissionEvent::SubmitFeedback);
        self.feedback_count += 1;
        Ok(next)
    }

    /// Approve the draft under review. Returns the approved stage.
    pub fn approve(&mut self) -> Result<DraftStage, WorkflowError> {
        match self.phase() {
            LifecyclePhase::AwaitingApproval => {}
            LifecyclePhase::Approved => return Err(WorkflowError::AlreadyApproved),
            LifecyclePhase::Completed => return Err(WorkflowError::AlreadyCompleted),
            LifecyclePhase::AwaitingDraft => return Err(WorkflowError::NoDraftUploaded),
            LifecyclePhase::Revising => return Err(WorkflowError::NothingToReview),
        }

        self.machine.handle(&SubmissionEvent::Approve);
        Ok(self.current_draft().unwrap_or_default())
    }

    pub fn complete(&mut self) -> Result<(), WorkflowError> {
        match self.phase() {
            LifecyclePhase::Approved => {
                self.machine.handle(&SubmissionEvent::Complete);
                Ok(())
            }
            LifecyclePhase::Completed => Err(WorkflowError::AlreadyCompleted),
            _ => Err(WorkflowError::NotApproved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(stage: DraftStage, status: SubmissionStatus) -> Submission {
        Submission {
            content_id: "content-1".to_string(),
            client_email: "client@example.com".to_string(),
            file_url: Some("https://files.example.com/draft.png".to_string()),
            caption: String::new(),
            draft_number: stage,
            status: Some(status),
            submitted_at: None,
            last_updated_at: None,
        }
    }

    #[test]
    fn test_full_revision_cycle() {
        let mut workflow = ContentWorkflow::new(&DeadlinePolicy::default());
        assert_eq!(workflow.phase(), LifecyclePhase::AwaitingDraft);
        assert_eq!(workflow.submission_status(), None);

        assert_eq!(workflow.upload_draft(), Ok(DraftStage::Draft1));
        assert_eq!(workflow.phase(), LifecyclePhase::AwaitingApproval);

        assert_eq!(workflow.submit_feedback(), Ok(DraftStage::Draft2));
        assert_eq!(workflow.submission_status(), Some(SubmissionStatus::InProgress));
        assert_eq!(workflow.upload_draft(), Ok(DraftStage::Draft2));

        assert_eq!(workflow.submit_feedback(), Ok(DraftStage::Draft3));
        assert_eq!(workflow.upload_draft(), Ok(DraftStage::Draft3));

        assert_eq!(workflow.submit_feedback(), Ok(DraftStage::FinalDraft));
        assert_eq!(workflow.upload_draft(), Ok(DraftStage::FinalDraft));
        assert_eq!(workflow.feedback_count(), 3);

        assert_eq!(
            workflow.submit_feedback(),
            Err(WorkflowError::FeedbackLimitReached { limit: 3 })
        );

        assert_eq!(workflow.approve(), Ok(DraftStage::FinalDraft));
        assert_eq!(workflow.complete(), Ok(()));
        assert_eq!(workflow.phase(), LifecyclePhase::Completed);
    }

    #[test]
    fn test_out_of_order_events_are_rejected() {
        let mut workflow = ContentWorkflow::new(&DeadlinePolicy::default());
        assert_eq!(workflow.submit_feedback(), Err(WorkflowError::NothingToReview));
        assert_eq!(workflow.approve(), Err(WorkflowError::NoDraftUploaded));
        assert_eq!(workflow.complete(), Err(WorkflowError::NotApproved));

        workflow.upload_draft().unwrap();
        assert_eq!(
            workflow.upload_draft(),
            Err(WorkflowError::DraftAwaitingReview { stage: DraftStage::Draft1 })
        );

        workflow.approve().unwrap();
        assert_eq!(workflow.submit_feedback(), Err(WorkflowError::AlreadyApproved));
        assert_eq!(workflow.upload_draft(), Err(WorkflowError::AlreadyApproved));
    }

    #[test]
    fn test_final_draft_refuses_feedback_under_a_larger_cap() {
        let policy = DeadlinePolicy {
            max_feedback_cycles: 5,
            ..DeadlinePolicy::default()
        };
        let submission = stored(DraftStage::FinalDraft, SubmissionStatus::AwaitingApproval);
        let mut workflow = ContentWorkflow::resume(Some(&submission), 3, &policy);

        assert_eq!(workflow.feedback_remaining(), 2);
        assert_eq!(workflow.submit_feedback(), Err(WorkflowError::FinalDraftReached));
    }

    #[test]
    fn test_resume_rebuilds_phase_and_stage() {
        let policy = DeadlinePolicy::default();

        let submission = stored(DraftStage::Draft2, SubmissionStatus::AwaitingApproval);
        let workflow = ContentWorkflow::resume(Some(&submission), 1, &policy);
        assert_eq!(workflow.phase(), LifecyclePhase::AwaitingApproval);
        assert_eq!(workflow.current_draft(), Some(DraftStage::Draft2));
        assert_eq!(workflow.feedback_count(), 1);

        let submission = stored(DraftStage::Draft2, SubmissionStatus::InProgress);
        let mut workflow = ContentWorkflow::resume(Some(&submission), 2, &policy);
        assert_eq!(workflow.phase(), LifecyclePhase::Revising);
        assert_eq!(workflow.upload_draft(), Ok(DraftStage::Draft3));

        let submission = stored(DraftStage::Draft1, SubmissionStatus::Completed);
        let workflow = ContentWorkflow::resume(Some(&submission), 0, &policy);
        assert_eq!(workflow.phase(), LifecyclePhase::Completed);
    }

    #[test]
    fn test_resume_honours_stored_feedback_count() {
        let submission = stored(DraftStage::Draft1, SubmissionStatus::AwaitingApproval);
        let mut workflow = ContentWorkflow::resume(Some(&submission), 3, &DeadlinePolicy::default());
        assert_eq!(
            workflow.submit_feedback(),
            Err(WorkflowError::FeedbackLimitReached { limit: 3 })
        );
    }

    #[test]
    fn test_resume_counts_only_stored_feedback() {
        let policy = DeadlinePolicy::default();
        let submission = stored(DraftStage::Draft3, SubmissionStatus::AwaitingApproval);
        let mut workflow = ContentWorkflow::resume(Some(&submission), 0, &policy);
        assert_eq!(workflow.feedback_count(), 0);
        assert_eq!(workflow.feedback_remaining(), 3);

        assert_eq!(workflow.submit_feedback(), Ok(DraftStage::FinalDraft));
        assert_eq!(workflow.feedback_count(), 1);
        assert_eq!(workflow.phase(), LifecyclePhase::Revising);
    }

    #[test]
    fn test_resume_in_progress_is_revising_regardless_of_history() {
        let policy = DeadlinePolicy::default();
        for status in [SubmissionStatus::InProgress, SubmissionStatus::Unrecognized] {
            let submission = stored(DraftStage::Draft3, status);
            let mut workflow = ContentWorkflow::resume(Some(&submission), 1, &policy);
            assert_eq!(workflow.phase(), LifecyclePhase::Revising);
            assert_eq!(workflow.approve(), Err(WorkflowError::NothingToReview));
            assert_eq!(workflow.upload_draft(), Ok(DraftStage::FinalDraft));
        }
    }

    #[test]
    fn test_resume_without_file_starts_fresh() {
        let mut submission = stored(DraftStage::Draft3, SubmissionStatus::AwaitingApproval);
        submission.file_url = None;
        let workflow = ContentWorkflow::resume(Some(&submission), 0, &DeadlinePolicy::default());
        assert_eq!(workflow.phase(), LifecyclePhase::AwaitingDraft);
        assert_eq!(workflow.current_draft(), None);
    }

    #[test]
    fn test_completed_machine_ignores_further_events() {
        let mut machine = SubmissionLifecycle::default().state_machine();
        for event in [SubmissionEvent::UploadDraft, SubmissionEvent::Approve, SubmissionEvent::Complete] {
            machine.handle(&event);
        }
        assert!(matches!(machine.state(), State::Completed { .. }));

        for event in [
            SubmissionEvent::UploadDraft,
            SubmissionEvent::SubmitFeedback,
            SubmissionEvent::Approve,
            SubmissionEvent::Complete,
        ] {
            machine.handle(&event);
            assert!(matches!(machine.state(), State::Completed { .. }));
        }
        assert_eq!(machine.inner().current_draft, Some(DraftStage::Draft1));
    }
}
