//! Workflow reports

use pubrel_adapters::PublishOutput;
use serde::{Deserialize, Serialize};

/// A change made (or, in a dry run, planned) to a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageAction {
    /// Manifest rewritten
    ManifestUpdated,
    /// Changelog created from scratch
    ChangelogCreated,
    /// Changelog rewritten
    ChangelogUpdated,
    /// A version section was added to the changelog
    SectionCreated,
    /// The development marker was removed from the changelog section
    MarkerStripped,
    /// The change message was added to the changelog
    MessageAdded,
    /// The manifest version was forced to the release version
    VersionForced,
    /// The `publish_to: none` gate was removed
    PublishGateRemoved,
    /// The publish command succeeded
    Published,
}

impl PackageAction {
    /// Short human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ManifestUpdated => "manifest updated",
            Self::ChangelogCreated => "changelog created",
            Self::ChangelogUpdated => "changelog updated",
            Self::SectionCreated => "section added",
            Self::MarkerStripped => "development marker removed",
            Self::MessageAdded => "message added",
            Self::VersionForced => "manifest version set",
            Self::PublishGateRemoved => "publish gate removed",
            Self::Published => "published",
        }
    }
}

/// How a package fared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageOutcome {
    /// Everything for the package went through
    Success,
    /// The package was left alone
    Skipped { reason: String },
    /// The package could not be processed
    Failed { reason: String },
}

impl PackageOutcome {
    /// Skip with a reason
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Fail with a reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether this is a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of a workflow for one package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReport {
    /// Package name
    pub package: String,
    /// Version the package was moved to or published at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Changes made, in order
    pub actions: Vec<PackageAction>,
    /// Problems that did not stop the package
    pub warnings: Vec<String>,
    /// Final outcome
    pub outcome: PackageOutcome,
    /// Output of the publish command, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_output: Option<PublishOutput>,
}

impl PackageReport {
    /// Start a successful report for `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: None,
            actions: Vec::new(),
            warnings: Vec::new(),
            outcome: PackageOutcome::Success,
            publish_output: None,
        }
    }

    /// Record an action
    pub fn action(&mut self, action: PackageAction) {
        self.actions.push(action);
    }

    /// Record a warning
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Mark the package as failed, keeping the first reason
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.outcome.is_failed() {
            self.outcome = PackageOutcome::failed(reason);
        }
    }

    /// Whether the package did not fail
    pub fn is_ok(&self) -> bool {
        !self.outcome.is_failed()
    }
}

/// Result of a workflow across the workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Workflow name (`version`, `change`, `publish`)
    pub operation: String,
    /// Whether files were left untouched
    pub dry_run: bool,
    /// Per-package results, in processing order
    pub packages: Vec<PackageReport>,
    /// Selector entries that named no registered package
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
}

impl WorkflowReport {
    /// Create an empty report
    pub fn new(operation: impl Into<String>, dry_run: bool) -> Self {
        Self {
            operation: operation.into(),
            dry_run,
            packages: Vec::new(),
            unknown: Vec::new(),
        }
    }

    /// Whether no package failed
    pub fn success(&self) -> bool {
        self.packages.iter().all(PackageReport::is_ok)
    }

    /// Packages that went through
    pub fn succeeded(&self) -> Vec<&PackageReport> {
        self.packages
            .iter()
            .filter(|p| p.outcome == PackageOutcome::Success)
            .collect()
    }

    /// Packages that were skipped
    pub fn skipped(&self) -> Vec<&PackageReport> {
        self.packages
            .iter()
            .filter(|p| matches!(p.outcome, PackageOutcome::Skipped { .. }))
            .collect()
    }

    /// Packages that failed
    pub fn failed(&self) -> Vec<&PackageReport> {
        self.packages.iter().filter(|p| !p.is_ok()).collect()
    }

    /// Find the report for `package`
    pub fn package(&self, package: &str) -> Option<&PackageReport> {
        self.packages.iter().find(|p| p.package == package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_keeps_first_reason() {
        let mut report = PackageReport::new("minigpu");
        report.fail("no version");
        report.fail("publish failed");
        assert_eq!(report.outcome, PackageOutcome::failed("no version"));
        assert!(!report.is_ok());
    }

    #[test]
    fn test_workflow_report_counts() {
        let mut report = WorkflowReport::new("publish", false);
        report.packages.push(PackageReport::new("a"));
        let mut skipped = PackageReport::new("b");
        skipped.outcome = PackageOutcome::skipped("missing");
        report.packages.push(skipped);
        assert!(report.success());

        let mut failed = PackageReport::new("c");
        failed.fail("boom");
        report.packages.push(failed);

        assert!(!report.success());
        assert_eq!(report.succeeded().len(), 1);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.failed()[0].package, "c");
        assert!(report.package("b").is_some());
    }

    #[test]
    fn test_report_json_shape() {
        let mut package = PackageReport::new("gpu_tensor");
        package.version = Some("2.0.0".to_string());
        package.action(PackageAction::MarkerStripped);
        package.fail("publish command failed");

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["actions"][0], "marker_stripped");
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["reason"], "publish command failed");
        assert!(json.get("publish_output").is_none());
    }
}
