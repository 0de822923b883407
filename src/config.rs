use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::workflow::DeadlinePolicy;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "content-portal.toml";

/// Main configuration structure for the content portal
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortalConfig {
    /// Deadline windows and the feedback cap
    pub deadlines: DeadlinePolicy,
    /// Snapshot storage settings
    pub storage: StorageConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot holding clients, directions, submissions and revisions
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            deadlines: DeadlinePolicy::default(),
            storage: StorageConfig {
                snapshot_path: PathBuf::from(".content-portal/portal.json"),
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
            },
        }
    }
}

impl PortalConfig {
    /// Load configuration from the default file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (`content-portal.toml`, or the given path)
    /// 3. Environment variables (prefixed with CONTENT_PORTAL_, nested keys split by `__`)
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&PortalConfig::default())?);

        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file not found: {}", path.display());
                }
                builder = builder.add_source(File::from(path));
            }
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
                }
            }
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("CONTENT_PORTAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let portal_config: PortalConfig = builder.build()?.try_deserialize()?;
        portal_config.validate()?;
        Ok(portal_config)
    }

    pub fn validate(&self) -> Result<()> {
        let deadlines = &self.deadlines;
        if deadlines.direction_due_soon_days < 0
            || deadlines.first_draft_window_days < 0
            || deadlines.draft_due_soon_days < 0
        {
            bail!("Deadline windows must not be negative");
        }
        if deadlines.draft_due_soon_days > deadlines.first_draft_window_days {
            bail!(
                "draft_due_soon_days ({}) cannot exceed first_draft_window_days ({})",
                deadlines.draft_due_soon_days,
                deadlines.first_draft_window_days
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
