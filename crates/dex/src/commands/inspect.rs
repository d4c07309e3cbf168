//! `dex inspect` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dex_config::{CliSettings, Config};
use dex_site::SiteBuilder;
use dex_storage_fs::FsStorage;

use super::site_config;
use crate::error::CliError;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Path to configuration file (default: auto-discover dex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vault directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Id of the manifest to inspect, for vaults with several sites.
    #[arg(long)]
    site: Option<String>,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or assembly fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            site_id: self.site,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store = Arc::new(FsStorage::new(config.vault_resolved.source_dir.clone()));
        let site = SiteBuilder::new(store).build(&site_config(&config)?).await?;

        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &site)?;
        writeln!(stdout)?;
        Ok(())
    }
}
