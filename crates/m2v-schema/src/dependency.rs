//! Dependency coordinates read from descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder a descriptor uses to refer to its own version.
pub const PROJECT_VERSION_TOKEN: &str = "${project.version}";

/// Coordinates of one entry in a descriptor's dependency list.
///
/// Dependencies are plain values: two entries with the same three fields are
/// the same dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dependency {
    /// Dotted group identifier, e.g. `com.google.dagger`.
    pub group_id: String,
    /// Artifact identifier within the group, e.g. `dagger`.
    pub artifact_id: String,
    /// Version string, possibly still the [`PROJECT_VERSION_TOKEN`].
    pub version: String,
}

impl Dependency {
    /// Create a dependency from its three coordinates.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Substitute the enclosing project's version for `${project.version}`.
    ///
    /// Any other version string, including other `${...}` references, is kept
    /// verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use m2v_schema::Dependency;
    ///
    /// let dep = Dependency::new("com.google.dagger", "dagger-spi", "${project.version}");
    /// assert_eq!(dep.with_project_version("2.3.1").version, "2.3.1");
    /// ```
    #[must_use]
    pub fn with_project_version(mut self, project_version: &str) -> Self {
        if self.version == PROJECT_VERSION_TOKEN {
            self.version = project_version.to_string();
        }
        self
    }

    /// Group identifier as path segments (`com.google.dagger` -> `com/google/dagger`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_version_substitution() {
        let dep = Dependency::new("com.google.dagger", "dagger", PROJECT_VERSION_TOKEN)
            .with_project_version("2.3.1");
        assert_eq!(dep.version, "2.3.1");
    }

    #[test]
    fn test_explicit_version_is_kept() {
        let dep = Dependency::new("javax.inject", "javax.inject", "1").with_project_version("2.3.1");
        assert_eq!(dep.version, "1");

        let dep = Dependency::new("a.b", "c", "${other.version}").with_project_version("9");
        assert_eq!(dep.version, "${other.version}");
    }

    #[test]
    fn test_group_path_and_display() {
        let dep = Dependency::new("com.google.dagger", "dagger", "2.50");
        assert_eq!(dep.group_path(), "com/google/dagger");
        assert_eq!(dep.to_string(), "com.google.dagger:dagger:2.50");
    }
}
