// Content Portal Library - client/agency content workflow
// Exposes the status classifier, submission lifecycle and portal store

pub mod config;
pub mod dashboard;
pub mod store;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::PortalConfig;
pub use dashboard::{ClientDashboard, DashboardItem};
pub use store::{ClientSettings, JsonFileStore, PortalSnapshot, PortalStore, SnapshotStore, StoreError};
pub use telemetry::{create_portal_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    classify, classify_with_policy, Classification, ContentKey, ContentStatus, ContentWorkflow, DeadlinePolicy,
    DeadlineState, Direction, DraftStage, Revision, StatusClassifier, Submission, SubmissionStatus,
    WorkflowError,
};
