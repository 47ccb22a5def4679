//! Repository locations and the conversions between addressing schemes.
//!
//! Four bases define every rewrite m2v performs:
//!
//! ```text
//! primary             {primary}/{group/path}/{artifact}/{version}      flat-layout directories
//! catalog             {catalog}/{group.id}/{artifact}/{version}        browsable catalog pages
//! secondary_catalog   {secondary_catalog}/...                          links as printed on catalog pages
//! secondary_download  {secondary_download}/...                         the same files, directly fetchable
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::dependency::Dependency;
use crate::link::is_absolute_url;

/// Default flat-layout repository.
pub const DEFAULT_PRIMARY_BASE: &str = "https://repo1.maven.org/maven2";
/// Default catalog site.
pub const DEFAULT_CATALOG_BASE: &str = "https://mvnrepository.com/artifact";
/// Default secondary store, as linked from catalog pages.
pub const DEFAULT_SECONDARY_CATALOG_BASE: &str = "https://maven.google.com";
/// Default secondary store direct-download prefix.
pub const DEFAULT_SECONDARY_DOWNLOAD_BASE: &str = "https://dl.google.com/dl/android/maven2";

/// Errors raised while validating repository locations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The base is not a parseable URL.
    #[error("Invalid repository base '{base}': {reason}")]
    InvalidBase {
        /// The rejected input.
        base: String,
        /// Parser message.
        reason: String,
    },

    /// The base parsed but does not use http or https.
    #[error("Unsupported scheme '{scheme}' in repository base '{base}'")]
    UnsupportedScheme {
        /// The rejected input.
        base: String,
        /// The scheme found.
        scheme: String,
    },
}

/// A validated repository base URL, stored without a trailing slash.
///
/// # Example
///
/// ```
/// use m2v_schema::RepoBase;
///
/// let base = RepoBase::new("https://repo1.maven.org/maven2/").unwrap();
/// assert_eq!(base.as_str(), "https://repo1.maven.org/maven2");
/// assert_eq!(base.strip("https://repo1.maven.org/maven2/a/b.pom"), Some("a/b.pom"));
/// assert_eq!(base.strip("https://repo1.maven.org/maven22/a.pom"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoBase(String);

impl RepoBase {
    /// Validate and normalize a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidBase`] if `s` is not a URL and
    /// [`LocationError::UnsupportedScheme`] if it is not http(s).
    pub fn new(s: &str) -> Result<Self, LocationError> {
        let trimmed = s.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| LocationError::InvalidBase {
            base: s.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LocationError::UnsupportedScheme {
                base: s.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The normalized base.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path below this base, or `None` if `link` lives elsewhere.
    ///
    /// Matching respects segment boundaries, so `.../maven2` does not match
    /// `.../maven22/...`. The base itself strips to an empty remainder.
    pub fn strip<'a>(&self, link: &'a str) -> Option<&'a str> {
        let rest = link.strip_prefix(self.0.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// True when `link` lives under this base.
    pub fn contains(&self, link: &str) -> bool {
        self.strip(link).is_some()
    }

    /// Append path segments to the base.
    pub fn join<I>(&self, segments: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut out = self.0.clone();
        for segment in segments {
            let segment = segment.as_ref().trim_matches('/');
            if !segment.is_empty() {
                out.push('/');
                out.push_str(segment);
            }
        }
        out
    }
}

impl TryFrom<String> for RepoBase {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RepoBase> for String {
    fn from(value: RepoBase) -> Self {
        value.0
    }
}

impl fmt::Display for RepoBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four known repository bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryBases {
    /// Flat-layout repository that directory URLs are built under.
    pub primary: RepoBase,
    /// Catalog site that catalog URLs are built under.
    pub catalog: RepoBase,
    /// Secondary store prefix as it appears on catalog pages.
    pub secondary_catalog: RepoBase,
    /// Direct-download prefix the secondary store is rewritten to.
    pub secondary_download: RepoBase,
}

impl Default for RepositoryBases {
    fn default() -> Self {
        Self {
            primary: RepoBase(DEFAULT_PRIMARY_BASE.to_string()),
            catalog: RepoBase(DEFAULT_CATALOG_BASE.to_string()),
            secondary_catalog: RepoBase(DEFAULT_SECONDARY_CATALOG_BASE.to_string()),
            secondary_download: RepoBase(DEFAULT_SECONDARY_DOWNLOAD_BASE.to_string()),
        }
    }
}

impl RepositoryBases {
    /// Flat-layout directory of a dependency: `{primary}/{group/path}/{artifact}/{version}`.
    pub fn directory_url(&self, dep: &Dependency) -> String {
        let group_path = dep.group_path();
        self.primary.join([
            group_path.as_str(),
            dep.artifact_id.as_str(),
            dep.version.as_str(),
        ])
    }

    /// Catalog page of a dependency: `{catalog}/{group.id}/{artifact}/{version}`.
    pub fn catalog_url(&self, dep: &Dependency) -> String {
        self.catalog.join([&dep.group_id, &dep.artifact_id, &dep.version])
    }

    /// Rewrite a secondary-store catalog link to its direct-download form.
    ///
    /// Returns `None` for links outside the secondary catalog base.
    pub fn rewrite_secondary(&self, link: &str) -> Option<String> {
        self.secondary_catalog
            .strip(link)
            .map(|rest| self.secondary_download.join([rest]))
    }

    /// True when `link` points into the catalog site.
    pub fn is_catalog(&self, link: &str) -> bool {
        self.catalog.contains(link)
    }

    /// True when `link` points into the primary repository.
    pub fn is_primary(&self, link: &str) -> bool {
        self.primary.contains(link)
    }

    /// Path of `link` relative to whichever mirrorable store it belongs to.
    ///
    /// The catalog site is not mirrorable; links there, or anywhere else,
    /// yield `None`.
    pub fn mirror_relative<'a>(&self, link: &'a str) -> Option<&'a str> {
        [
            &self.primary,
            &self.secondary_catalog,
            &self.secondary_download,
        ]
        .into_iter()
        .find_map(|base| base.strip(link))
    }
}

/// Where a descriptor document can be read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorRef {
    /// Fetched over HTTP.
    Remote(String),
    /// Read from the local filesystem.
    Local(PathBuf),
}

impl DescriptorRef {
    /// `http(s)://` references are remote; anything else is a local path.
    pub fn parse(s: &str) -> Self {
        if is_absolute_url(s) {
            Self::Remote(s.to_string())
        } else {
            Self::Local(PathBuf::from(s))
        }
    }

    /// True for [`DescriptorRef::Remote`].
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for DescriptorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dagger() -> Dependency {
        Dependency::new("com.google.dagger", "dagger", "2.50")
    }

    #[test]
    fn test_base_validation() {
        assert!(RepoBase::new("https://repo1.maven.org/maven2").is_ok());
        assert!(matches!(
            RepoBase::new("not a url"),
            Err(LocationError::InvalidBase { .. })
        ));
        assert!(matches!(
            RepoBase::new("ftp://mirror.example.com/maven2"),
            Err(LocationError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_directory_and_catalog_urls() {
        let bases = RepositoryBases::default();
        assert_eq!(
            bases.directory_url(&dagger()),
            "https://repo1.maven.org/maven2/com/google/dagger/dagger/2.50"
        );
        assert_eq!(
            bases.catalog_url(&dagger()),
            "https://mvnrepository.com/artifact/com.google.dagger/dagger/2.50"
        );
    }

    #[test]
    fn test_secondary_rewrite_keeps_remainder() {
        let bases = RepositoryBases::default();
        let link = "https://maven.google.com/androidx/core/core/1.12.0/core-1.12.0.pom";
        assert_eq!(
            bases.rewrite_secondary(link).as_deref(),
            Some("https://dl.google.com/dl/android/maven2/androidx/core/core/1.12.0/core-1.12.0.pom")
        );
        assert_eq!(
            bases.rewrite_secondary("https://repo1.maven.org/maven2/a/b/1/b-1.pom"),
            None
        );
    }

    #[test]
    fn test_mirror_relative_paths() {
        let bases = RepositoryBases::default();
        assert_eq!(
            bases.mirror_relative("https://repo1.maven.org/maven2/a/b/1/b-1.jar"),
            Some("a/b/1/b-1.jar")
        );
        assert_eq!(
            bases.mirror_relative("https://dl.google.com/dl/android/maven2/x/y/1/y-1.aar"),
            Some("x/y/1/y-1.aar")
        );
        assert_eq!(
            bases.mirror_relative("https://maven.google.com/x/y/1/y-1.pom"),
            Some("x/y/1/y-1.pom")
        );
        assert_eq!(
            bases.mirror_relative("https://mvnrepository.com/artifact/x/y/1"),
            None
        );
        assert_eq!(bases.mirror_relative("https://example.com/z.jar"), None);
    }

    #[test]
    fn test_descriptor_ref_parse() {
        assert!(DescriptorRef::parse("https://x.org/a.pom").is_remote());
        assert_eq!(
            DescriptorRef::parse("/tmp/a.pom"),
            DescriptorRef::Local(PathBuf::from("/tmp/a.pom"))
        );
    }
}
