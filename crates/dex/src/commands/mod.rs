//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod inspect;

pub(crate) use build::BuildArgs;
pub(crate) use inspect::InspectArgs;

use dex_config::Config;
use dex_site::SiteConfig;

use crate::error::CliError;

/// Build settings for the core from the resolved configuration.
///
/// The export directory is made absolute so it doesn't resolve against the
/// vault root.
pub(crate) fn site_config(config: &Config) -> Result<SiteConfig, CliError> {
    let site = &config.site_resolved;
    Ok(SiteConfig {
        id: site.id.clone(),
        tag: config.vault_resolved.tag.clone(),
        title: site.title.clone(),
        url: site.url.clone(),
        repo: site.repo.clone(),
        path: std::path::absolute(&site.path)?,
        logo: site.logo.clone(),
        strict_links: config.build.strict_links,
    })
}
