//! Package layout on disk

use std::path::{Path, PathBuf};

use pubrel_core::config::Config;
use pubrel_core::error::Result;
use pubrel_core::PackageRegistry;
use tracing::debug;

/// A directory holding one sub-directory per registered package, each with a
/// manifest and a changelog
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    registry: PackageRegistry,
    manifest_file: String,
    changelog_file: String,
}

impl Workspace {
    /// Create a workspace rooted at `root` with the layout from `config`
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            registry: config.registry(),
            manifest_file: config.manifest_file.clone(),
            changelog_file: config.changelog_file.clone(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registered packages
    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    /// Directory of `package`
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }

    /// Manifest path of `package`
    pub fn manifest_path(&self, package: &str) -> PathBuf {
        self.package_dir(package).join(&self.manifest_file)
    }

    /// Changelog path of `package`
    pub fn changelog_path(&self, package: &str) -> PathBuf {
        self.package_dir(package).join(&self.changelog_file)
    }

    /// Whether the directory of `package` exists
    pub fn has_package_dir(&self, package: &str) -> bool {
        self.package_dir(package).is_dir()
    }

    /// Read a file, `None` if it does not exist
    pub fn read(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite a file with `content`
    pub fn write(&self, path: &Path, content: &str) -> Result<()> {
        debug!(path = %path.display(), bytes = content.len(), "writing file");
        std::fs::write(path, content)?;
        Ok(())
    }
}
