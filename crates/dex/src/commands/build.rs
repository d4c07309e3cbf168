//! `dex build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dex_config::{CliSettings, Config};
use dex_site::{SiteBuilder, SiteWriter, enrich_content};
use dex_storage::ContentStore;
use dex_storage_fs::FsStorage;

use super::site_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover dex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vault directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Export directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Id of the manifest to export, for vaults with several sites.
    #[arg(long)]
    site: Option<String>,

    /// Fail on links to documents missing from the vault.
    #[arg(long)]
    strict_links: bool,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, assembly or export fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            site_id: self.site,
            strict_links: self.strict_links.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site_config = site_config(&config)?;
        tracing::debug!(?site_config, "Resolved build settings");

        output.detail("Vault", &config.vault_resolved.source_dir.display().to_string());
        output.detail("Output", &site_config.path.display().to_string());

        let store: Arc<dyn ContentStore> =
            Arc::new(FsStorage::new(config.vault_resolved.source_dir.clone()));

        let mut site = SiteBuilder::new(Arc::clone(&store))
            .build(&site_config)
            .await?;
        output.info(&format!(
            "Assembled {} posts, {} docs",
            site.blog.posts.len(),
            site.pages.docs.len()
        ));

        enrich_content(store.as_ref(), &mut site).await?;
        let summary = SiteWriter::new(store).write(&site).await?;

        output.success(&format!(
            "Exported site to {} ({} written, {} copied)",
            site.path.display(),
            summary.files_written,
            summary.files_copied
        ));
        Ok(())
    }
}
