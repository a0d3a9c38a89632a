//! Synchronizing versions across every package

use pubrel_adapters::pubspec;
use pubrel_changelog::Changelog;
use pubrel_core::error::Result;
use pubrel_core::{parse_version, ReleaseMode};
use tracing::{info, instrument};

use crate::report::{PackageAction, PackageReport, WorkflowReport};
use crate::workflow::{missing_package, ReleaseWorkflow};

impl ReleaseWorkflow {
    /// Move every package to `version` in `mode`.
    ///
    /// Each manifest is rewritten for the mode (a missing manifest is a
    /// warning) and each changelog gets a section for the version, plus
    /// `message` when given. Missing changelogs are created.
    #[instrument(skip(self, message), fields(dry_run = self.is_dry_run()))]
    pub fn update_all_versions(
        &self,
        version: &str,
        mode: ReleaseMode,
        message: Option<&str>,
    ) -> Result<WorkflowReport> {
        parse_version(version)?;
        info!(version, mode = %mode, "updating all versions");

        let packages = self.workspace().registry().names().to_vec();
        Ok(self.run_packages("version", &packages, |workflow, package| {
            workflow.update_package(package, version, mode, message)
        }))
    }

    fn update_package(
        &self,
        package: &str,
        version: &str,
        mode: ReleaseMode,
        message: Option<&str>,
    ) -> Result<PackageReport> {
        if !self.workspace().has_package_dir(package) {
            return Ok(missing_package(self, package));
        }

        let mut report = PackageReport::new(package);
        report.version = Some(mode.section_label(version));
        let locals = self.workspace().registry().names();

        let manifest_path = self.workspace().manifest_path(package);
        match self.workspace().read(&manifest_path)? {
            Some(original) => {
                let updated = pubspec::rewrite(&original, version, mode, locals);
                if updated != original {
                    self.persist(package, &manifest_path, &updated)?;
                    report.action(PackageAction::ManifestUpdated);
                }
            }
            None => self.warn(
                &mut report,
                format!("{} not found, manifest skipped", manifest_path.display()),
            ),
        }

        let changelog_path = self.workspace().changelog_path(package);
        let original = self.workspace().read(&changelog_path)?;
        let mut changelog = match &original {
            Some(text) => Changelog::parse(text),
            None => Changelog::for_package(package),
        };

        let update = changelog.apply(version, mode, message);
        if update.section_created {
            report.action(PackageAction::SectionCreated);
        }
        if update.marker_stripped {
            report.action(PackageAction::MarkerStripped);
        }
        if update.message_added {
            report.action(PackageAction::MessageAdded);
        } else if message.is_some() {
            self.warn(
                &mut report,
                format!(
                    "no '{}' section in the changelog, message not added",
                    mode.section_label(version)
                ),
            );
        }

        let updated = changelog.to_normalized_string();
        match original {
            None => {
                self.persist(package, &changelog_path, &updated)?;
                report.action(PackageAction::ChangelogCreated);
            }
            Some(original) if original != updated => {
                self.persist(package, &changelog_path, &updated)?;
                report.action(PackageAction::ChangelogUpdated);
            }
            Some(_) => {}
        }

        Ok(report)
    }
}
