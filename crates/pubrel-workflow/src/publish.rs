//! Publishing every package

use pubrel_adapters::{PubspecDocument, Publisher};
use pubrel_changelog::Changelog;
use pubrel_core::error::{ChangelogError, ManifestError, PublishError, Result};
use tracing::{info, instrument};

use crate::report::{PackageAction, PackageReport, WorkflowReport};
use crate::reporter::WorkflowEvent;
use crate::workflow::ReleaseWorkflow;

impl ReleaseWorkflow {
    /// Publish every package at the version of its topmost changelog section.
    ///
    /// For each package the development marker is removed from that section,
    /// the manifest version is forced to it and the publish gate is removed,
    /// then `publisher` runs in the package directory. A package that fails
    /// at any step is recorded and the next one is attempted.
    #[instrument(skip(self, publisher), fields(command = %publisher.describe(), dry_run = self.is_dry_run()))]
    pub fn publish(&self, publisher: &dyn Publisher) -> Result<WorkflowReport> {
        info!("publishing all packages");
        let packages = self.workspace().registry().names().to_vec();
        Ok(self.run_packages("publish", &packages, |workflow, package| {
            workflow.publish_package(package, publisher)
        }))
    }

    fn publish_package(&self, package: &str, publisher: &dyn Publisher) -> Result<PackageReport> {
        let mut report = PackageReport::new(package);
        let dir = self.workspace().package_dir(package);
        if !dir.is_dir() {
            report.fail(PublishError::PackageDirNotFound(dir).to_string());
            return Ok(report);
        }

        let changelog_path = self.workspace().changelog_path(package);
        let Some(text) = self.workspace().read(&changelog_path)? else {
            report.fail(ChangelogError::FileNotFound(changelog_path).to_string());
            return Ok(report);
        };
        let mut changelog = Changelog::parse(&text);
        let Some(header) = changelog.current_version() else {
            report.fail(ChangelogError::NoVersion(changelog_path).to_string());
            return Ok(report);
        };
        let version = header.version;
        report.version = Some(version.clone());

        if header.development && changelog.strip_development_marker(&version) {
            self.persist(package, &changelog_path, &changelog.to_normalized_string())?;
            report.action(PackageAction::MarkerStripped);
        }

        let manifest_path = self.workspace().manifest_path(package);
        let Some(text) = self.workspace().read(&manifest_path)? else {
            report.fail(ManifestError::NotFound(manifest_path).to_string());
            return Ok(report);
        };
        let mut manifest = PubspecDocument::parse(&text);
        if manifest.version().is_none() {
            report.fail(ManifestError::MissingVersion(manifest_path.clone()).to_string());
        }

        let version_forced = manifest.set_version(&version);
        let gate_removed = manifest.remove_publish_gate();
        if version_forced || gate_removed {
            self.persist(package, &manifest_path, &manifest.to_normalized_string())?;
        }
        if version_forced {
            report.action(PackageAction::VersionForced);
        }
        if gate_removed {
            report.action(PackageAction::PublishGateRemoved);
        }

        if self.is_dry_run() {
            info!(package, version = %version, "dry run, publish command not run");
            return Ok(report);
        }

        let command = publisher.describe();
        self.emit(WorkflowEvent::PublishStarted {
            package: package.to_string(),
            command: command.clone(),
        });

        match publisher.publish(&dir) {
            Ok(output) => {
                for (text, is_stderr) in [(&output.stdout, false), (&output.stderr, true)] {
                    if text.trim().is_empty() {
                        continue;
                    }
                    self.emit(WorkflowEvent::PublishOutput {
                        package: package.to_string(),
                        text: text.clone(),
                        is_stderr,
                        success: output.success,
                    });
                }

                if output.success {
                    report.action(PackageAction::Published);
                } else {
                    report.fail(
                        PublishError::CommandFailed {
                            command,
                            code: output.code_label(),
                        }
                        .to_string(),
                    );
                }
                report.publish_output = Some(output);
            }
            Err(e) => report.fail(e.to_string()),
        }

        Ok(report)
    }
}
