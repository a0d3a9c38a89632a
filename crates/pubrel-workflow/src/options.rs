//! Workflow options

/// Options shared by every workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Report what would change without writing files or publishing
    pub dry_run: bool,
}

impl WorkflowOptions {
    /// Create options for a dry run
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Set dry run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
