//! Error types for pubrel

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PubrelError
pub type Result<T> = std::result::Result<T, PubrelError>;

/// Main error type for pubrel operations
#[derive(Debug, Error)]
pub enum PubrelError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Manifest-related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Publish-related errors
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Invalid version format
    #[error("Invalid version '{version}': {reason}")]
    InvalidFormat { version: String, reason: String },
}

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Package manifest not found
    #[error("Package manifest not found at {0}")]
    NotFound(PathBuf),

    /// Manifest has no top-level version line
    #[error("No 'version:' line found in {0}")]
    MissingVersion(PathBuf),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file not found
    #[error("Changelog file not found at {0}")]
    FileNotFound(PathBuf),

    /// No version header could be found
    #[error("Could not determine current version from {0}")]
    NoVersion(PathBuf),
}

/// Errors raised while invoking the external publish command
#[derive(Debug, Error)]
pub enum PublishError {
    /// Package directory does not exist
    #[error("Package directory {0} not found")]
    PackageDirNotFound(PathBuf),

    /// The publish executable could not be found
    #[error("'{0}' command not found. Ensure it is on your PATH")]
    ToolNotFound(String),

    /// The publish command did not finish in time
    #[error("Publish command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// The publish command exited unsuccessfully
    #[error("Publish command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: String },

    /// Spawning or talking to the child process failed
    #[error("Failed to run '{command}': {reason}")]
    Spawn { command: String, reason: String },
}

impl PubrelError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error came from loading or validating configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_transparent() {
        let err: PubrelError = ConfigError::InvalidValue {
            field: "packages".to_string(),
            message: "at least one package is required".to_string(),
        }
        .into();

        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: packages - at least one package is required"
        );
    }

    #[test]
    fn test_publish_timeout_message() {
        let err = PublishError::Timeout {
            command: "dart pub publish".to_string(),
            seconds: 300,
        };
        assert_eq!(
            err.to_string(),
            "Publish command 'dart pub publish' timed out after 300s"
        );
    }
}
