use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::SubmissionStatus;

/// Lifecycle status of a content item, as shown on badges and used to gate actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentStatus {
    AwaitingDirection,
    DirectionDueSoon,
    DirectionOverdue,
    DirectionSubmitted,
    DraftDueSoon,
    DraftOverdue,
    InProgress,
    AwaitingApproval,
    Approved,
    Completed,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 10] = [
        ContentStatus::AwaitingDirection,
        ContentStatus::DirectionDueSoon,
        ContentStatus::DirectionOverdue,
        ContentStatus::DirectionSubmitted,
        ContentStatus::DraftDueSoon,
        ContentStatus::DraftOverdue,
        ContentStatus::InProgress,
        ContentStatus::AwaitingApproval,
        ContentStatus::Approved,
        ContentStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContentStatus::AwaitingDirection => "Awaiting Direction",
            ContentStatus::DirectionDueSoon => "Direction Due Soon",
            ContentStatus::DirectionOverdue => "Direction Overdue",
            ContentStatus::DirectionSubmitted => "Direction Submitted",
            ContentStatus::DraftDueSoon => "Draft Due Soon",
            ContentStatus::DraftOverdue => "Draft Overdue",
            ContentStatus::InProgress => "In Progress",
            ContentStatus::AwaitingApproval => "Awaiting Approval",
            ContentStatus::Approved => "Approved",
            ContentStatus::Completed => "Completed",
        }
    }

    /// Badge glyph used in terminal output
    pub fn badge(self) -> &'static str {
        match self {
            ContentStatus::DirectionOverdue | ContentStatus::DraftOverdue => "🔴",
            ContentStatus::DirectionDueSoon | ContentStatus::DraftDueSoon => "🟡",
            ContentStatus::AwaitingApproval => "🟠",
            ContentStatus::Approved | ContentStatus::Completed => "🟢",
            _ => "🔵",
        }
    }

    pub fn is_overdue(self) -> bool {
        matches!(self, ContentStatus::DirectionOverdue | ContentStatus::DraftOverdue)
    }

    pub fn is_due_soon(self) -> bool {
        matches!(self, ContentStatus::DirectionDueSoon | ContentStatus::DraftDueSoon)
    }

    /// Overdue or due soon
    pub fn needs_attention(self) -> bool {
        self.is_overdue() || self.is_due_soon()
    }

    pub fn is_finished(self) -> bool {
        matches!(self, ContentStatus::Approved | ContentStatus::Completed)
    }
}

impl From<SubmissionStatus> for ContentStatus {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::AwaitingApproval => ContentStatus::AwaitingApproval,
            SubmissionStatus::Approved => ContentStatus::Approved,
            SubmissionStatus::Completed => ContentStatus::Completed,
            SubmissionStatus::InProgress | SubmissionStatus::Unrecognized => {
                ContentStatus::InProgress
            }
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
