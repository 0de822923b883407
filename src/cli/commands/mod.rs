use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use content_portal::config::PortalConfig;
use content_portal::store::{JsonFileStore, PortalStore, SnapshotStore};
use content_portal::workflow::timestamps::parse_timestamp_str;
use content_portal::workflow::ContentKey;

pub mod feedback;
pub mod init;
pub mod peek;
pub mod register;
pub mod review;
pub mod status;
pub mod submit;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, context: &PortalContext) -> Result<()>;
}

/// Everything a command needs: resolved configuration, the snapshot file and
/// the instant statuses are evaluated against.
#[derive(Debug, Clone)]
pub struct PortalContext {
    pub config: PortalConfig,
    pub now: DateTime<Utc>,
    snapshots: JsonFileStore,
}

impl PortalContext {
    pub fn new(config: PortalConfig, snapshot: Option<PathBuf>, now: Option<&str>) -> Result<Self> {
        let snapshot_path = snapshot.unwrap_or_else(|| config.storage.snapshot_path.clone());
        Ok(Self {
            now: resolve_now(now)?,
            snapshots: JsonFileStore::new(snapshot_path),
            config,
        })
    }

    pub fn snapshot_path(&self) -> &std::path::Path {
        self.snapshots.path()
    }

    pub async fn load_store(&self) -> Result<PortalStore> {
        let snapshot = self
            .snapshots
            .load()
            .await
            .with_context(|| format!("Failed to read snapshot {}", self.snapshot_path().display()))?;
        Ok(PortalStore::from_snapshot(snapshot, self.config.deadlines))
    }

    pub async fn save_store(&self, store: &PortalStore) -> Result<()> {
        self.snapshots
            .save(&store.to_snapshot())
            .await
            .with_context(|| format!("Failed to write snapshot {}", self.snapshot_path().display()))
    }
}

/// Parse `--now`, falling back to the wall clock
pub fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_timestamp_str(raw).ok_or_else(|| anyhow!("Invalid --now value '{}'", raw)),
        None => Ok(Utc::now()),
    }
}

pub fn content_key(client: &str, content: &str) -> ContentKey {
    ContentKey::new(client, content)
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("📋 Content Portal - client/agency content workflow");
    println!();
    println!("Client commands:");
    println!("  📊 content-portal status --client EMAIL        # See where every item stands");
    println!("  ✍️  content-portal direction --client EMAIL ... # Brief the agency");
    println!("  💬 content-portal feedback --client EMAIL ...  # Request changes on a draft");
    println!("  ✅ content-portal approve --client EMAIL ...   # Approve a draft");
    println!();
    println!("Agency commands:");
    println!("  🧾 content-portal register --client EMAIL      # Set up a client package");
    println!("  📤 content-portal upload --client EMAIL ...    # Upload the next draft");
    println!("  🏁 content-portal complete --client EMAIL ...  # Mark approved content delivered");
    println!("  ⚙️  content-portal init                         # Write content-portal.toml");
    println!();
    println!("💡 Start with 'content-portal status' to list registered clients");
    Ok(())
}
