use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Draft stages a deliverable moves through, in order.
/// The sequence is forward-only: a stage never moves back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DraftStage {
    #[default]
    #[serde(rename = "Draft 1")]
    Draft1,
    #[serde(rename = "Draft 2")]
    Draft2,
    #[serde(rename = "Draft 3")]
    Draft3,
    #[serde(rename = "Final Draft")]
    FinalDraft,
}

impl DraftStage {
    pub const ALL: [DraftStage; 4] = [
        DraftStage::Draft1,
        DraftStage::Draft2,
        DraftStage::Draft3,
        DraftStage::FinalDraft,
    ];

    /// The stage that follows this one, or `None` after the final draft
    pub fn next(self) -> Option<Self> {
        match self {
            DraftStage::Draft1 => Some(DraftStage::Draft2),
            DraftStage::Draft2 => Some(DraftStage::Draft3),
            DraftStage::Draft3 => Some(DraftStage::FinalDraft),
            DraftStage::FinalDraft => None,
        }
    }

    /// 1-based position in the sequence
    pub fn ordinal(self) -> usize {
        match self {
            DraftStage::Draft1 => 1,
            DraftStage::Draft2 => 2,
            DraftStage::Draft3 => 3,
            DraftStage::FinalDraft => 4,
        }
    }

    pub fn is_final(self) -> bool {
        matches!(self, DraftStage::FinalDraft)
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftStage::Draft1 => "Draft 1",
            DraftStage::Draft2 => "Draft 2",
            DraftStage::Draft3 => "Draft 3",
            DraftStage::FinalDraft => "Final Draft",
        }
    }

    /// Match a stored stage label, ignoring case and surrounding whitespace
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(raw))
    }
}

/// `#[serde(with = "...")]` adapter for a submission's draft stage.
///
/// Labels outside the known sequence, `null` and non-string values decode
/// to Draft 1 instead of rejecting the document.
pub mod lenient {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DraftStage, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .and_then(DraftStage::from_label)
            .unwrap_or_default())
    }

    pub fn serialize<S>(stage: &DraftStage, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(stage.label())
    }
}

/// Optional variant for a revision's next stage. Unknown labels decode to `None`.
pub mod lenient_next {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DraftStage>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(Value::as_str).and_then(DraftStage::from_label))
    }

    pub fn serialize<S>(stage: &Option<DraftStage>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match stage {
            Some(stage) => serializer.serialize_str(stage.label()),
            None => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for DraftStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Submission status as stored on the submission document.
///
/// Strings the portal does not know decode to `Unrecognized`, which the
/// classifier treats like `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    InProgress,
    AwaitingApproval,
    Approved,
    Completed,
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::InProgress => "IN_PROGRESS",
            SubmissionStatus::AwaitingApproval => "AWAITING_APPROVAL",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Completed => "COMPLETED",
            SubmissionStatus::Unrecognized => "UNRECOGNIZED",
        };
        write!(f, "{}", label)
    }
}
