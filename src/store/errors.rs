use thiserror::Error;

use crate::workflow::{ContentKey, WorkflowError};

/// Errors raised by portal store writes and lookups
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid client email: {0}")]
    InvalidEmail(String),

    #[error("Unknown client: {0}")]
    UnknownClient(String),

    #[error("Content {0} is not part of the client's package")]
    UnknownContent(ContentKey),

    #[error("Direction text is empty")]
    EmptyDirection,

    #[error("Direction for {0} has already been submitted")]
    DirectionAlreadySubmitted(ContentKey),

    #[error("No direction has been submitted for {0}")]
    MissingDirection(ContentKey),

    #[error("A draft upload needs a file URL")]
    MissingFile,

    #[error("Feedback text is empty")]
    EmptyFeedback,

    #[error("No submission exists for {0}")]
    NoSubmission(ContentKey),

    #[error("Workflow rejected change to {key}: {source}")]
    Workflow {
        key: ContentKey,
        #[source]
        source: WorkflowError,
    },
}

/// Errors raised while reading or writing snapshots
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
