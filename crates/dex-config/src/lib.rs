//! Configuration management for dex.
//!
//! Parses `dex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `vault.source_dir`
//! - `site.title`
//! - `site.url`
//! - `site.repo`
//! - `site.path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override vault source directory.
    pub source_dir: Option<PathBuf>,
    /// Override export directory.
    pub output_dir: Option<PathBuf>,
    /// Override manifest id selection.
    pub site_id: Option<String>,
    /// Override strict link resolution.
    pub strict_links: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dex.toml";

/// Default manifest marker tag.
const DEFAULT_TAG: &str = "docusaurus";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault configuration (paths are relative strings from TOML).
    vault: VaultConfigRaw,
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Build behavior.
    pub build: BuildConfig,

    /// Resolved vault configuration (set after loading).
    #[serde(skip)]
    pub vault_resolved: VaultConfig,
    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteSettings,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw vault configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VaultConfigRaw {
    source_dir: Option<String>,
    tag: Option<String>,
}

/// Resolved vault configuration with absolute paths.
#[derive(Debug, Default)]
pub struct VaultConfig {
    /// Vault root directory.
    pub source_dir: PathBuf,
    /// Manifest marker tag (`#<tag>/<id>/_`).
    pub tag: String,
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    repo: Option<String>,
    path: Option<String>,
    logo: Option<String>,
}

/// Resolved site settings.
#[derive(Debug, Default)]
pub struct SiteSettings {
    /// Manifest id to export; `None` accepts any single manifest.
    pub id: Option<String>,
    /// Site title; `None` falls back to the manifest's frontmatter title.
    pub title: Option<String>,
    /// Public site URL.
    pub url: String,
    /// Repository URL of the generated site.
    pub repo: String,
    /// Export directory.
    pub path: PathBuf,
    /// Vault path of the logo image.
    pub logo: Option<String>,
}

/// Build behavior configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Abort the build on links whose target is not in the vault.
    pub strict_links: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.vault_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.path.clone_from(output_dir);
        }
        if let Some(site_id) = &settings.site_id {
            self.site_resolved.id = Some(site_id.clone());
        }
        if let Some(strict_links) = settings.strict_links {
            self.build.strict_links = strict_links;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(current)
    }

    fn discover_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            vault: VaultConfigRaw::default(),
            site: SiteConfigRaw::default(),
            build: BuildConfig::default(),
            vault_resolved: VaultConfig {
                source_dir: base.to_path_buf(),
                tag: DEFAULT_TAG.to_owned(),
            },
            site_resolved: SiteSettings {
                path: base.join("site"),
                ..SiteSettings::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag = &self.vault_resolved.tag;
        if tag.is_empty() {
            return Err(ConfigError::Validation(
                "vault.tag cannot be empty".to_owned(),
            ));
        }
        if tag.contains('/') || tag.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "vault.tag cannot contain '/' or whitespace".to_owned(),
            ));
        }

        if !self.site_resolved.url.is_empty() {
            require_http_url(&self.site_resolved.url, "site.url")?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let expand_opt = |value: &mut Option<String>, field: &str| -> Result<(), ConfigError> {
            if let Some(v) = value.as_deref() {
                *value = Some(expand::expand_env(v, field)?);
            }
            Ok(())
        };

        expand_opt(&mut self.vault.source_dir, "vault.source_dir")?;
        expand_opt(&mut self.site.title, "site.title")?;
        expand_opt(&mut self.site.url, "site.url")?;
        expand_opt(&mut self.site.repo, "site.repo")?;
        expand_opt(&mut self.site.path, "site.path")?;

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve(&mut self, config_dir: &Path) {
        self.vault_resolved = VaultConfig {
            source_dir: config_dir.join(self.vault.source_dir.as_deref().unwrap_or(".")),
            tag: self
                .vault
                .tag
                .clone()
                .unwrap_or_else(|| DEFAULT_TAG.to_owned()),
        };

        self.site_resolved = SiteSettings {
            id: self.site.id.clone(),
            title: self.site.title.clone().filter(|t| !t.is_empty()),
            url: self.site.url.clone().unwrap_or_default(),
            repo: self.site.repo.clone().unwrap_or_default(),
            path: config_dir.join(self.site.path.as_deref().unwrap_or("site")),
            logo: self.site.logo.clone().filter(|l| !l.is_empty()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/test"));
        assert_eq!(config.vault_resolved.tag, "docusaurus");
        assert_eq!(config.site_resolved.path, PathBuf::from("/test/site"));
        assert!(config.site_resolved.id.is_none());
        assert!(!config.build.strict_links);
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/project/."));
        assert_eq!(config.vault_resolved.tag, "docusaurus");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[vault]
source_dir = "vault"
tag = "publish"

[site]
id = "docs"
title = "My Site"
url = "https://example.com"
repo = "https://github.com/org/site"
path = "out/site"
logo = "assets/logo.png"

[build]
strict_links = true
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(
            config.vault_resolved.source_dir,
            PathBuf::from("/project/vault")
        );
        assert_eq!(config.vault_resolved.tag, "publish");
        assert_eq!(config.site_resolved.id.as_deref(), Some("docs"));
        assert_eq!(config.site_resolved.title.as_deref(), Some("My Site"));
        assert_eq!(config.site_resolved.url, "https://example.com");
        assert_eq!(config.site_resolved.repo, "https://github.com/org/site");
        assert_eq!(config.site_resolved.path, PathBuf::from("/project/out/site"));
        assert_eq!(config.site_resolved.logo.as_deref(), Some("assets/logo.png"));
        assert!(config.build.strict_links);
    }

    #[test]
    fn test_empty_title_treated_as_unset() {
        let mut config: Config = toml::from_str("[site]\ntitle = \"\"\n").unwrap();
        config.resolve(Path::new("/project"));

        assert!(config.site_resolved.title.is_none());
    }

    #[test]
    fn test_validate_rejects_tag_with_slash() {
        let mut config: Config = toml::from_str("[vault]\ntag = \"a/b\"\n").unwrap();
        config.resolve(Path::new("/project"));

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("vault.tag"));
    }

    #[test]
    fn test_validate_rejects_empty_tag() {
        let mut config: Config = toml::from_str("[vault]\ntag = \"\"\n").unwrap();
        config.resolve(Path::new("/project"));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config: Config = toml::from_str("[site]\nurl = \"example.com\"\n").unwrap();
        config.resolve(Path::new("/project"));

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("site.url"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/vault")),
            output_dir: Some(PathBuf::from("/out")),
            site_id: Some("docs".to_owned()),
            strict_links: Some(true),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/vault"));
        assert_eq!(config.site_resolved.path, PathBuf::from("/out"));
        assert_eq!(config.site_resolved.id.as_deref(), Some("docs"));
        assert!(config.build.strict_links);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/test"));
        assert_eq!(config.site_resolved.path, PathBuf::from("/test/site"));
        assert!(!config.build.strict_links);
    }

    #[test]
    fn test_expand_env_vars_site() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DEX_TEST_REPO", "https://github.com/org/site");
        }

        let toml = r#"
[site]
repo = "${DEX_TEST_REPO}"
url = "${DEX_TEST_URL_UNSET:-https://example.com}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.site_resolved.repo, "https://github.com/org/site");
        assert_eq!(config.site_resolved.url, "https://example.com");

        unsafe {
            std::env::remove_var("DEX_TEST_REPO");
        }
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/dex.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dex.toml");
        std::fs::write(&path, "[vault]\nsource_dir = \"vault\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.vault_resolved.source_dir, dir.path().join("vault"));
        assert_eq!(config.site_resolved.path, dir.path().join("site"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_applies_cli_settings_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dex.toml");
        std::fs::write(&path, "[site]\nid = \"docs\"\n").unwrap();
        let overrides = CliSettings {
            site_id: Some("blog".to_owned()),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(config.site_resolved.id.as_deref(), Some("blog"));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("dex.toml"), "").unwrap();

        let found = Config::discover_from(nested);

        assert_eq!(found, Some(dir.path().join("dex.toml")));
    }
}
