//! pubrel Workflow - Release workflows
//!
//! This crate drives the manifest and changelog rewriters across every
//! package of a workspace: synchronizing versions, recording change messages,
//! publishing, and reporting status.

mod change;
pub mod options;
mod publish;
pub mod report;
pub mod reporter;
mod status;
mod version;
pub mod workflow;
pub mod workspace;

pub use options::WorkflowOptions;
pub use report::{PackageAction, PackageOutcome, PackageReport, WorkflowReport};
pub use reporter::{
    CollectingReporter, Reporter, ReporterRegistry, TracingReporter, WorkflowEvent,
};
pub use status::{PackageStatus, StatusReport};
pub use workflow::ReleaseWorkflow;
pub use workspace::Workspace;
