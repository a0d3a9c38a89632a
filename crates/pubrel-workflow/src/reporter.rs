//! Workflow progress reporting

use std::sync::Arc;
use std::time::Duration;

use crate::report::PackageOutcome;

/// Events emitted while a workflow runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// A package is being processed
    PackageStarted { package: String, operation: String },
    /// A file was written (or would be, in a dry run)
    FileWritten {
        package: String,
        path: String,
        dry_run: bool,
    },
    /// Something went wrong without stopping the package
    Warning { package: String, message: String },
    /// The publish command is starting
    PublishStarted { package: String, command: String },
    /// Captured output of one stream of the publish command, verbatim
    PublishOutput {
        package: String,
        text: String,
        is_stderr: bool,
        /// Whether the command exited successfully
        success: bool,
    },
    /// A package is done
    PackageFinished {
        package: String,
        outcome: PackageOutcome,
    },
    /// All packages are done
    Completed {
        operation: String,
        succeeded: usize,
        skipped: usize,
        failed: usize,
        duration: Duration,
    },
}

/// Trait for reporting workflow progress
pub trait Reporter: Send + Sync {
    /// Handle a workflow event
    fn report(&self, event: &WorkflowEvent);
}

/// Reporter that logs to tracing
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::PackageStarted { package, operation } => {
                tracing::info!("{}: {}", operation, package);
            }
            WorkflowEvent::FileWritten {
                package,
                path,
                dry_run,
            } => {
                if *dry_run {
                    tracing::info!("[{}] would write {}", package, path);
                } else {
                    tracing::info!("[{}] wrote {}", package, path);
                }
            }
            WorkflowEvent::Warning { package, message } => {
                tracing::warn!("[{}] {}", package, message);
            }
            WorkflowEvent::PublishStarted { package, command } => {
                tracing::info!("[{}] running {}", package, command);
            }
            WorkflowEvent::PublishOutput {
                package,
                text,
                is_stderr,
                success,
            } => {
                let stream = if *is_stderr { "stderr" } else { "stdout" };
                if *is_stderr || !*success {
                    tracing::warn!(package = %package, stream, "{}", text);
                } else {
                    tracing::info!(package = %package, stream, "{}", text);
                }
            }
            WorkflowEvent::PackageFinished { package, outcome } => match outcome {
                PackageOutcome::Success => tracing::info!("{} done", package),
                PackageOutcome::Skipped { reason } => {
                    tracing::warn!("{} skipped: {}", package, reason)
                }
                PackageOutcome::Failed { reason } => {
                    tracing::error!("{} failed: {}", package, reason)
                }
            },
            WorkflowEvent::Completed {
                operation,
                succeeded,
                skipped,
                failed,
                duration,
            } => {
                tracing::info!(
                    "{} complete: {} succeeded, {} skipped, {} failed ({:.1}s)",
                    operation,
                    succeeded,
                    skipped,
                    failed,
                    duration.as_secs_f64()
                );
            }
        }
    }
}

/// Reporter that collects events for later inspection (useful for testing)
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: std::sync::Mutex<Vec<WorkflowEvent>>,
}

impl CollectingReporter {
    /// Get all collected events
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: &WorkflowEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, event: &WorkflowEvent) {
        (**self).report(event);
    }
}

/// Registry of workflow reporters
pub struct ReporterRegistry {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl ReporterRegistry {
    /// Registry with the tracing reporter
    pub fn new() -> Self {
        Self {
            reporters: vec![Arc::new(TracingReporter)],
        }
    }

    /// Registry without reporters
    pub fn empty() -> Self {
        Self {
            reporters: Vec::new(),
        }
    }

    /// Add a reporter
    pub fn register<R: Reporter + 'static>(&mut self, reporter: R) {
        self.reporters.push(Arc::new(reporter));
    }

    /// Broadcast an event to all registered reporters
    pub fn broadcast(&self, event: &WorkflowEvent) {
        for reporter in &self.reporters {
            reporter.report(event);
        }
    }
}

impl Default for ReporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReporterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterRegistry")
            .field("reporters", &self.reporters.len())
            .finish()
    }
}
