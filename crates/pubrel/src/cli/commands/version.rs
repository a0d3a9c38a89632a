//! Version command

use clap::Args;
use tracing::info;

use pubrel_core::ReleaseMode;

use super::CommandContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes::{ExitError, ERROR};

/// Set the version of every package
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// New semantic version, without the -WIP marker
    #[arg(id = "new_version", value_name = "VERSION")]
    pub version: String,

    /// Release mode: pin sibling packages and clear the publish gate
    #[arg(long)]
    pub release: bool,

    /// Change message to record under the new version
    #[arg(short, long)]
    pub message: Option<String>,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let mode = ReleaseMode::from_release_flag(self.release);
        info!(version = %self.version, mode = %mode, "executing version command");

        let context = CommandContext::load(cli)?;
        let workflow = context.workflow(cli);

        if cli.is_interactive_text() {
            output::info(&format!(
                "Moving {} packages to {} ({})",
                context.workspace.registry().len(),
                output::version_style().apply_to(mode.section_label(&self.version)),
                mode
            ));
        }

        let report =
            workflow.update_all_versions(&self.version, mode, self.message.as_deref())?;

        match cli.format {
            OutputFormat::Json => output::json(&report)?,
            OutputFormat::Text if !cli.quiet => output::summary(&report),
            OutputFormat::Text => {}
        }

        if !report.success() {
            return Err(ExitError::new(ERROR, "version update failed for some packages").into());
        }
        Ok(())
    }
}
