//! Run configuration, loaded from `config.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration pointed at the public repositories:
//!
//! ```toml
//! jobs = 8
//!
//! [repositories]
//! primary = "https://repo1.maven.org/maven2"
//!
//! [routing]
//! catalog_groups = ["androidx", "com.android"]
//! ```

use anyhow::{Context, Result};
use m2v_schema::{Dependency, RepositoryBases};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Browser-like agent; catalog sites turn away bare HTTP clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// How dependencies are split between the two addressing schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRules {
    /// A dependency whose groupId contains any of these is resolved through
    /// the catalog site; everything else through the primary repository.
    pub catalog_groups: Vec<String>,

    /// CSS class carried by the download buttons on catalog pages.
    pub download_link_class: String,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            catalog_groups: vec!["androidx".to_string()],
            download_link_class: "vbtn".to_string(),
        }
    }
}

impl RoutingRules {
    /// True when `dep` belongs to a catalog-routed namespace.
    pub fn routes_to_catalog(&self, dep: &Dependency) -> bool {
        self.catalog_groups
            .iter()
            .any(|pattern| dep.group_id.contains(pattern.as_str()))
    }
}

/// Complete configuration for one resolve-and-mirror run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub repositories: RepositoryBases,
    pub routing: RoutingRules,
    pub user_agent: String,
    /// Concurrent downloads during materialization.
    pub jobs: usize,
    /// Leave files that already exist under the mirror root untouched.
    pub skip_existing: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            repositories: RepositoryBases::default(),
            routing: RoutingRules::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            jobs: 4,
            skip_existing: false,
        }
    }
}

impl MirrorConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, a field has the wrong
    /// type, or a repository base is not an http(s) URL.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid m2v configuration")?;
        Ok(config.normalized())
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Load the default configuration file if it exists, else built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the default file exists and fails to load.
    pub fn load_default() -> Result<Self> {
        match crate::paths::config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    fn normalized(mut self) -> Self {
        self.jobs = self.jobs.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MirrorConfig::from_toml("").unwrap();
        assert_eq!(config, MirrorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = MirrorConfig::from_toml(
            r#"
            jobs = 0
            skip_existing = true

            [repositories]
            primary = "http://127.0.0.1:8080/maven2/"

            [routing]
            catalog_groups = ["androidx", "com.android"]
            "#,
        )
        .unwrap();

        assert_eq!(config.jobs, 1);
        assert!(config.skip_existing);
        assert_eq!(
            config.repositories.primary.as_str(),
            "http://127.0.0.1:8080/maven2"
        );
        assert_eq!(
            config.repositories.catalog,
            RepositoryBases::default().catalog
        );
        assert_eq!(config.routing.download_link_class, "vbtn");
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let err = MirrorConfig::from_toml(
            r#"
            [repositories]
            catalog = "ftp://example.com/artifact"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported scheme"));
    }

    #[test]
    fn test_routing_partition() {
        let rules = RoutingRules::default();
        assert!(rules.routes_to_catalog(&Dependency::new("androidx.core", "core", "1.12.0")));
        assert!(!rules.routes_to_catalog(&Dependency::new("com.google.dagger", "dagger", "2.50")));
    }
}
