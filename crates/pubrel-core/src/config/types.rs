//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::PackageRegistry;

use super::defaults::{
    DEFAULT_CHANGELOG_FILE, DEFAULT_MANIFEST_FILE, DEFAULT_PACKAGES, DEFAULT_PUBLISH_ARGS,
    DEFAULT_PUBLISH_COMMAND, DEFAULT_PUBLISH_STDIN, DEFAULT_PUBLISH_TIMEOUT_SECS,
};

/// Main configuration for pubrel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Packages managed together, in processing order
    pub packages: Vec<String>,

    /// Manifest file name inside each package directory
    pub manifest_file: String,

    /// Changelog file name inside each package directory
    pub changelog_file: String,

    /// Publishing configuration
    pub publish: PublishConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            changelog_file: DEFAULT_CHANGELOG_FILE.to_string(),
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    /// Build the package registry described by this configuration
    pub fn registry(&self) -> PackageRegistry {
        PackageRegistry::new(self.packages.iter().cloned())
    }
}

/// Publishing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Executable invoked in each package directory
    pub command: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,

    /// Text written to the command's stdin (answers confirmation prompts)
    pub stdin: String,

    /// Seconds to wait before the command is killed
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PUBLISH_COMMAND.to_string(),
            args: DEFAULT_PUBLISH_ARGS.iter().map(|a| a.to_string()).collect(),
            stdin: DEFAULT_PUBLISH_STDIN.to_string(),
            timeout_secs: DEFAULT_PUBLISH_TIMEOUT_SECS,
        }
    }
}

impl PublishConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
