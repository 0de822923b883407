//! Init command: writes a default `content-portal.toml`.
//!
//! An existing configuration file is never overwritten without `--force`.
//! The snapshot directory is created alongside so the first write command
//! has somewhere to save.

use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::commands::{Command, PortalContext};
use content_portal::config::{PortalConfig, DEFAULT_CONFIG_FILE};

pub struct InitCommand {
    pub force: bool,
    pub dry_run: bool,
    pub config_path: PathBuf,
}

impl InitCommand {
    pub fn new(force: bool, dry_run: bool) -> Self {
        Self {
            force,
            dry_run,
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        if let Some(path) = config_path {
            self.config_path = path;
        }
        self
    }
}

impl Command for InitCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        if self.config_path.exists() && !self.force {
            return Err(anyhow!(
                "Configuration file {} already exists. Use --force to overwrite.",
                self.config_path.display()
            ));
        }

        let mut config = PortalConfig::default();
        config.storage.snapshot_path = context.snapshot_path().to_path_buf();

        if self.dry_run {
            println!("Would create configuration file: {}", self.config_path.display());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }

        if let Some(parent) = config
            .storage
            .snapshot_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            print!("📁 Creating {}... ", parent.display());
            std::io::stdout().flush()?;
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow!("Failed to create {}: {}", parent.display(), e))?;
            println!("✅");
        }

        print!("⚙️  Writing {}... ", self.config_path.display());
        std::io::stdout().flush()?;
        config.save_to_file(&self.config_path)?;
        println!("✅");

        println!();
        println!("🎉 Content portal initialized");
        println!("   💡 Next: content-portal register --client EMAIL --contents 3");
        Ok(())
    }
}
