//! Change command

use clap::Args;
use tracing::info;

use super::CommandContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes::{ExitError, ERROR};

/// Add a change message to package changelogs
#[derive(Debug, Args)]
pub struct ChangeCommand {
    /// Message recorded as a bullet under the latest version
    pub message: String,

    /// Packages to update, separated by spaces or commas (default: all)
    pub packages: Vec<String>,
}

impl ChangeCommand {
    /// Execute the change command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(packages = ?self.packages, "executing change command");

        let context = CommandContext::load(cli)?;
        let workflow = context.workflow(cli);
        let report = workflow.add_change_message(self.packages.as_slice(), &self.message)?;

        match cli.format {
            OutputFormat::Json => output::json(&report)?,
            OutputFormat::Text if !cli.quiet => {
                for name in &report.unknown {
                    output::warning(&format!("Unknown package '{}' ignored", name));
                }
                output::summary(&report);
            }
            OutputFormat::Text => {}
        }

        if !report.success() {
            return Err(ExitError::new(ERROR, "change message could not be recorded").into());
        }
        Ok(())
    }
}
