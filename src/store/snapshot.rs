use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflow::timestamps;
use crate::workflow::{Direction, Revision, Submission};

/// Per-client package settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    pub client_email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Number of content slots in the package (`content-1` … `content-N`)
    #[serde(default)]
    pub content_count: u32,
    #[serde(default, with = "timestamps::lenient_date")]
    pub direction_deadline: Option<NaiveDate>,
    #[serde(default, with = "timestamps::lenient_date")]
    pub content_deadline: Option<NaiveDate>,
}

/// Serialized form of the portal: one array per collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSnapshot {
    #[serde(default)]
    pub clients: Vec<ClientSettings>,
    #[serde(default)]
    pub directions: Vec<Direction>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

impl PortalSnapshot {
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
            && self.directions.is_empty()
            && self.submissions.is_empty()
            && self.revisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_decodes_partial_documents() {
        let snapshot: PortalSnapshot = serde_json::from_value(json!({
            "clients": [{
                "clientEmail": "client@example.com",
                "contentCount": 4,
                "directionDeadline": "2025-05-03",
                "contentDeadline": "soon"
            }]
        }))
        .unwrap();

        assert_eq!(snapshot.clients.len(), 1);
        let client = &snapshot.clients[0];
        assert_eq!(client.direction_deadline, NaiveDate::from_ymd_opt(2025, 5, 3));
        assert_eq!(client.content_deadline, None);
        assert!(snapshot.directions.is_empty());
        assert!(!snapshot.is_empty());
        assert!(PortalSnapshot::default().is_empty());
    }
}
