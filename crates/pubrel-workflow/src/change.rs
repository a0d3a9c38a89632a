//! Recording change messages

use pubrel_changelog::Changelog;
use pubrel_core::error::Result;
use tracing::{info, instrument};

use crate::report::{PackageAction, PackageOutcome, PackageReport, WorkflowReport};
use crate::workflow::{missing_package, ReleaseWorkflow};

impl ReleaseWorkflow {
    /// Add `message` to the topmost changelog section of the selected
    /// packages.
    ///
    /// Selector entries may hold several names separated by commas or
    /// whitespace; an empty selector selects every package. Unknown names
    /// and missing package directories are warned about and skipped.
    #[instrument(skip(self, selector, message), fields(dry_run = self.is_dry_run()))]
    pub fn add_change_message<S: AsRef<str>>(
        &self,
        selector: &[S],
        message: &str,
    ) -> Result<WorkflowReport> {
        let selection = self.workspace().registry().resolve(selector);
        info!(
            packages = selection.packages.len(),
            unknown = selection.unknown.len(),
            "adding change message"
        );

        let mut report = self.run_packages("change", &selection.packages, |workflow, package| {
            workflow.add_package_message(package, message)
        });
        report.unknown = selection.unknown;
        Ok(report)
    }

    fn add_package_message(&self, package: &str, message: &str) -> Result<PackageReport> {
        if !self.workspace().has_package_dir(package) {
            return Ok(missing_package(self, package));
        }

        let mut report = PackageReport::new(package);
        let path = self.workspace().changelog_path(package);
        let original = self.workspace().read(&path)?;
        let mut changelog = match &original {
            Some(text) => Changelog::parse(text),
            None => Changelog::for_package(package),
        };

        report.version = changelog.current_version().map(|header| header.label());
        if changelog.append_message(message, None) {
            report.action(PackageAction::MessageAdded);
        } else {
            self.warn(&mut report, "changelog has no version section, message not added");
            report.outcome = PackageOutcome::skipped("no version section");
        }

        let updated = changelog.to_normalized_string();
        match original {
            None => {
                self.persist(package, &path, &updated)?;
                report.action(PackageAction::ChangelogCreated);
            }
            Some(original) if original != updated => {
                self.persist(package, &path, &updated)?;
                report.action(PackageAction::ChangelogUpdated);
            }
            Some(_) => {}
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::options::WorkflowOptions;
    use crate::workflow::test_support::*;
    use tempfile::TempDir;

    use super::*;

    const PACKAGES: &[&str] = &["minigpu", "minigpu_ffi", "gpu_tensor"];

    fn seed(root: &std::path::Path) {
        for package in PACKAGES {
            write_file(
                root,
                package,
                "CHANGELOG.md",
                &format!("# {} CHANGELOG\n\n## 1.1.0-WIP\n\n- earlier\n\n## 1.0.0\n\n- initial\n", package),
            );
        }
    }

    #[test]
    fn test_message_for_all_packages() {
        let temp = TempDir::new().unwrap();
        seed(temp.path());

        let workflow = workflow(temp.path(), PACKAGES, WorkflowOptions::default());
        let report = workflow.add_change_message::<&str>(&[], "fixed a leak").unwrap();

        assert!(report.success());
        assert_eq!(report.packages.len(), 3);
        for package in PACKAGES {
            assert_eq!(
                read_file(temp.path(), package, "CHANGELOG.md"),
                format!(
                    "# {} CHANGELOG\n\n## 1.1.0-WIP\n\n- fixed a leak\n- earlier\n\n## 1.0.0\n\n- initial\n",
                    package
                )
            );
        }
        assert_eq!(report.packages[0].version.as_deref(), Some("1.1.0-WIP"));
    }

    #[test]
    fn test_message_for_selected_packages() {
        let temp = TempDir::new().unwrap();
        seed(temp.path());

        let workflow = workflow(temp.path(), PACKAGES, WorkflowOptions::default());
        let report = workflow
            .add_change_message(&["gpu_tensor, nope", "gpu_tensor minigpu"], "tensor work")
            .unwrap();

        let names: Vec<&str> = report.packages.iter().map(|p| p.package.as_str()).collect();
        assert_eq!(names, vec!["gpu_tensor", "minigpu"]);
        assert_eq!(report.unknown, vec!["nope".to_string()]);
        assert!(!read_file(temp.path(), "minigpu_ffi", "CHANGELOG.md").contains("tensor work"));
        assert!(read_file(temp.path(), "gpu_tensor", "CHANGELOG.md").contains("- tensor work\n- earlier"));
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "minigpu", "CHANGELOG.md", "# minigpu\n\n## 1.0.0\n");

        let workflow = workflow(temp.path(), PACKAGES, WorkflowOptions::default());
        let report = workflow.add_change_message(&["minigpu", "gpu_tensor"], "x").unwrap();

        assert!(report.success());
        assert_eq!(report.succeeded().len(), 1);
        assert_eq!(report.skipped()[0].package, "gpu_tensor");
        assert!(!temp.path().join("gpu_tensor").exists());
    }

    #[test]
    fn test_missing_changelog_is_created_without_message() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("minigpu_ffi")).unwrap();

        let workflow = workflow(temp.path(), PACKAGES, WorkflowOptions::default());
        let report = workflow.add_change_message(&["minigpu_ffi"], "lost").unwrap();

        let package = &report.packages[0];
        assert!(matches!(package.outcome, PackageOutcome::Skipped { .. }));
        assert_eq!(package.actions, vec![PackageAction::ChangelogCreated]);
        assert_eq!(
            read_file(temp.path(), "minigpu_ffi", "CHANGELOG.md"),
            "# minigpu_ffi CHANGELOG\n"
        );
    }
}
