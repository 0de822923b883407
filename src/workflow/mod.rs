// Content workflow: records, status derivation and the submission lifecycle

pub mod classifier;
pub mod deadlines;
pub mod display;
pub mod lifecycle;
pub mod stage;
pub mod status;
pub mod timestamps;
pub mod types;

pub use classifier::{classify, classify_with_policy, Classification, StatusClassifier};
pub use deadlines::{DeadlinePolicy, DeadlineState};
pub use lifecycle::{ContentWorkflow, LifecyclePhase, WorkflowError};
pub use stage::{DraftStage, SubmissionStatus};
pub use status::ContentStatus;
pub use types::{ContentKey, Direction, Revision, RevisionStatus, Submission};
