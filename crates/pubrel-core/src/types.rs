//! Core types for pubrel

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, VersionError};

/// Suffix appended to a changelog version header while the version is in development
pub const DEVELOPMENT_MARKER: &str = "-WIP";

/// Whether packages are being prepared for development or for release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    /// Local dependencies use `path:` and publishing is gated
    #[default]
    Development,
    /// Local dependencies are pinned and the publish gate is cleared
    Release,
}

impl ReleaseMode {
    /// Build a mode from a `--release` style flag
    pub fn from_release_flag(release: bool) -> Self {
        if release {
            Self::Release
        } else {
            Self::Development
        }
    }

    /// Returns true for [`ReleaseMode::Release`]
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release)
    }

    /// Returns the string representation of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Release => "release",
        }
    }

    /// Label used in a changelog header for `version` in this mode
    pub fn section_label(&self, version: &str) -> String {
        match self {
            Self::Development => format!("{}{}", version, DEVELOPMENT_MARKER),
            Self::Release => version.to_string(),
        }
    }
}

impl std::fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate a version argument as a semantic version
pub fn parse_version(version: &str) -> Result<semver::Version> {
    if version.ends_with(DEVELOPMENT_MARKER) {
        return Err(VersionError::InvalidFormat {
            version: version.to_string(),
            reason: format!(
                "pass the plain version, the {} marker is managed automatically",
                DEVELOPMENT_MARKER
            ),
        }
        .into());
    }

    semver::Version::parse(version).map_err(|e| {
        VersionError::InvalidFormat {
            version: version.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Ordered, fixed set of packages managed together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRegistry {
    packages: Vec<String>,
}

impl PackageRegistry {
    /// Create a registry from package names, keeping their order
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Package names in registry order
    pub fn names(&self) -> &[String] {
        &self.packages
    }

    /// Check whether a name belongs to the registry
    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p == name)
    }

    /// Number of registered packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Resolve a package selector to registered names.
    ///
    /// Each argument may hold several names separated by commas or whitespace.
    /// An empty selector selects every package. Unknown names are returned
    /// separately so callers can warn about them.
    pub fn resolve<S: AsRef<str>>(&self, selector: &[S]) -> Selection {
        let tokens: Vec<&str> = selector
            .iter()
            .flat_map(|arg| arg.as_ref().split(|c: char| c == ',' || c.is_whitespace()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Selection {
                packages: self.packages.clone(),
                unknown: Vec::new(),
            };
        }

        let mut selection = Selection::default();
        for token in tokens {
            if !self.contains(token) {
                warn!(package = token, "unknown package in selector");
                if !selection.unknown.iter().any(|u| u == token) {
                    selection.unknown.push(token.to_string());
                }
                continue;
            }
            if !selection.packages.iter().any(|p| p == token) {
                selection.packages.push(token.to_string());
            }
        }
        selection
    }
}

/// Result of resolving a package selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Registered packages, in selector order
    pub packages: Vec<String>,
    /// Names that are not part of the registry
    pub unknown: Vec<String>,
}
