//! Read-only workspace status

use pubrel_adapters::{DependencyMode, PubspecDocument};
use pubrel_changelog::Changelog;
use pubrel_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workflow::ReleaseWorkflow;

/// Release state of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatus {
    /// Package name
    pub package: String,
    /// Whether the package directory exists
    pub exists: bool,
    /// Version from the manifest
    pub manifest_version: Option<String>,
    /// Topmost changelog section, marker included
    pub changelog_version: Option<String>,
    /// Whether the topmost changelog section is still in development
    pub in_development: bool,
    /// Bullet entries in the topmost changelog section
    pub pending_entries: usize,
    /// Whether `publish_to: none` is set
    pub publish_gate: bool,
    /// How sibling packages are referenced
    pub dependency_mode: Option<DependencyMode>,
}

impl PackageStatus {
    /// Whether the manifest and the changelog agree on the version
    pub fn is_consistent(&self) -> bool {
        match (&self.manifest_version, &self.changelog_version) {
            (Some(manifest), Some(changelog)) => {
                changelog == manifest
                    || changelog
                        .strip_suffix(pubrel_core::DEVELOPMENT_MARKER)
                        .is_some_and(|base| base == manifest)
            }
            _ => false,
        }
    }
}

/// Release state of every package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Per-package status, in registry order
    pub packages: Vec<PackageStatus>,
}

impl StatusReport {
    /// Distinct manifest versions across the workspace
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = Vec::new();
        for version in self
            .packages
            .iter()
            .filter_map(|p| p.manifest_version.as_deref())
        {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
        versions
    }

    /// Whether every package exists, agrees with its changelog and shares
    /// one version
    pub fn in_sync(&self) -> bool {
        self.packages.iter().all(|p| p.exists && p.is_consistent()) && self.versions().len() == 1
    }
}

impl ReleaseWorkflow {
    /// Inspect every package without changing anything
    pub fn status(&self) -> Result<StatusReport> {
        let workspace = self.workspace();
        let locals = workspace.registry().names();
        let mut packages = Vec::with_capacity(locals.len());

        for package in locals {
            let mut status = PackageStatus {
                package: package.clone(),
                exists: workspace.has_package_dir(package),
                manifest_version: None,
                changelog_version: None,
                in_development: false,
                pending_entries: 0,
                publish_gate: false,
                dependency_mode: None,
            };

            if let Some(text) = workspace.read(&workspace.manifest_path(package))? {
                let manifest = PubspecDocument::parse(&text);
                status.manifest_version = manifest.version();
                status.publish_gate = manifest.has_publish_gate();
                status.dependency_mode = Some(manifest.dependency_mode(locals));
            }

            if let Some(text) = workspace.read(&workspace.changelog_path(package))? {
                let changelog = Changelog::parse(&text);
                if let Some(section) = changelog.sections().into_iter().next() {
                    status.changelog_version = Some(section.header.label());
                    status.in_development = section.header.development;
                    status.pending_entries = section.entry_count(changelog.lines());
                }
            }

            debug!(?status, "package status");
            packages.push(status);
        }

        Ok(StatusReport { packages })
    }
}
