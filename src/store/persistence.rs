use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::errors::PersistenceError;
use super::snapshot::PortalSnapshot;

/// Storage backend for portal snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the latest snapshot; a store with nothing saved yields an empty one
    async fn load(&self) -> Result<PortalSnapshot, PersistenceError>;

    async fn save(&self, snapshot: &PortalSnapshot) -> Result<(), PersistenceError>;
}

/// Snapshot kept as a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<PortalSnapshot, PersistenceError> {
        if !fs::try_exists(&self.path).await? {
            info!(file = ?self.path, "No snapshot found, starting empty");
            return Ok(PortalSnapshot::default());
        }

        let contents = fs::read_to_string(&self.path).await?;
        let snapshot: PortalSnapshot = serde_json::from_str(&contents)?;
        debug!(
            file = ?self.path,
            clients = snapshot.clients.len(),
            directions = snapshot.directions.len(),
            submissions = snapshot.submissions.len(),
            revisions = snapshot.revisions.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &PortalSnapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_string_pretty(snapshot)?;

        // Write to temporary file first, then rename
        let temp_file = self.temp_path();
        fs::write(&temp_file, serialized).await?;
        fs::rename(&temp_file, &self.path).await?;

        info!(file = ?self.path, "Snapshot saved");
        Ok(())
    }
}
