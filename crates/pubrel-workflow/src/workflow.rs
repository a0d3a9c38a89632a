//! Release workflow driver

use std::path::Path;
use std::time::Instant;

use pubrel_core::error::Result;
use tracing::error;

use crate::options::WorkflowOptions;
use crate::report::{PackageOutcome, PackageReport, WorkflowReport};
use crate::reporter::{Reporter, ReporterRegistry, WorkflowEvent};
use crate::workspace::Workspace;

/// Runs release workflows over every package of a workspace.
///
/// Packages are processed one at a time in registry order. A package that
/// fails is recorded in the report and the remaining packages are still
/// processed.
#[derive(Debug)]
pub struct ReleaseWorkflow {
    workspace: Workspace,
    options: WorkflowOptions,
    reporters: ReporterRegistry,
}

impl ReleaseWorkflow {
    /// Create a workflow reporting through tracing
    pub fn new(workspace: Workspace, options: WorkflowOptions) -> Self {
        Self {
            workspace,
            options,
            reporters: ReporterRegistry::new(),
        }
    }

    /// Add a progress reporter
    pub fn with_reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.reporters.register(reporter);
        self
    }

    /// Workspace being processed
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Check if this is a dry run
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub(crate) fn emit(&self, event: WorkflowEvent) {
        self.reporters.broadcast(&event);
    }

    pub(crate) fn warn(&self, report: &mut PackageReport, message: impl Into<String>) {
        let message = message.into();
        self.emit(WorkflowEvent::Warning {
            package: report.package.clone(),
            message: message.clone(),
        });
        report.warn(message);
    }

    /// Write `content` to `path` unless this is a dry run
    pub(crate) fn persist(&self, package: &str, path: &Path, content: &str) -> Result<()> {
        if !self.is_dry_run() {
            self.workspace.write(path, content)?;
        }
        self.emit(WorkflowEvent::FileWritten {
            package: package.to_string(),
            path: path.display().to_string(),
            dry_run: self.is_dry_run(),
        });
        Ok(())
    }

    /// Run `step` for each package, turning errors into failed reports
    pub(crate) fn run_packages<F>(
        &self,
        operation: &str,
        packages: &[String],
        mut step: F,
    ) -> WorkflowReport
    where
        F: FnMut(&Self, &str) -> Result<PackageReport>,
    {
        let start = Instant::now();
        let mut report = WorkflowReport::new(operation, self.is_dry_run());

        for package in packages {
            self.emit(WorkflowEvent::PackageStarted {
                package: package.clone(),
                operation: operation.to_string(),
            });

            let package_report = step(self, package).unwrap_or_else(|e| {
                error!(package = %package, error = %e, "{} failed", operation);
                let mut failed = PackageReport::new(package.clone());
                failed.fail(e.to_string());
                failed
            });

            self.emit(WorkflowEvent::PackageFinished {
                package: package.clone(),
                outcome: package_report.outcome.clone(),
            });
            report.packages.push(package_report);
        }

        self.emit(WorkflowEvent::Completed {
            operation: operation.to_string(),
            succeeded: report.succeeded().len(),
            skipped: report.skipped().len(),
            failed: report.failed().len(),
            duration: start.elapsed(),
        });
        report
    }
}

/// Report for a package whose directory is missing
pub(crate) fn missing_package(workflow: &ReleaseWorkflow, package: &str) -> PackageReport {
    let mut report = PackageReport::new(package);
    let dir = workflow.workspace().package_dir(package);
    workflow.warn(
        &mut report,
        format!("package directory {} not found", dir.display()),
    );
    report.outcome = PackageOutcome::skipped("package directory not found");
    report
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::*;
    use super::*;
    use crate::reporter::CollectingReporter;
    use pubrel_core::PubrelError;
    use tempfile::TempDir;

    #[test]
    fn test_run_packages_continues_after_failure() {
        let temp = TempDir::new().unwrap();
        let collector = Arc::new(CollectingReporter::default());
        let workflow = workflow(temp.path(), &["a", "b"], WorkflowOptions::default())
            .with_reporter(collector.clone());

        let packages = vec!["a".to_string(), "b".to_string()];
        let report = workflow.run_packages("test", &packages, |_, package| {
            if package == "a" {
                Err(PubrelError::other("broken"))
            } else {
                Ok(PackageReport::new(package))
            }
        });

        assert!(!report.success());
        assert_eq!(report.failed()[0].package, "a");
        assert_eq!(report.succeeded()[0].package, "b");

        let events = collector.events();
        assert!(matches!(events.last(), Some(WorkflowEvent::Completed { failed: 1, .. })));
    }

    #[test]
    fn test_persist_respects_dry_run() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.md");

        let dry = workflow(temp.path(), &["a"], WorkflowOptions::dry_run());
        dry.persist("a", &path, "text\n").unwrap();
        assert!(!path.exists());

        let real = workflow(temp.path(), &["a"], WorkflowOptions::default());
        real.persist("a", &path, "text\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text\n");
    }
}
