//! Publish command

use clap::Args;
use tracing::{info, warn};

use pubrel_adapters::{CommandPublisher, Publisher};

use super::CommandContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes::{ExitError, PUBLISH_FAILED};

/// Publish every package
#[derive(Debug, Args)]
pub struct PublishCommand {
    /// Seconds to wait for each publish command (overrides configuration)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl PublishCommand {
    /// Execute the publish command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(timeout = ?self.timeout, dry_run = cli.dry_run, "executing publish command");

        let context = CommandContext::load(cli)?;
        let mut publish_config = context.config.publish.clone();
        if let Some(timeout) = self.timeout {
            publish_config.timeout_secs = timeout;
        }
        let publisher = CommandPublisher::from_config(&publish_config);

        if which::which(&publish_config.command).is_err() {
            warn!(command = %publish_config.command, "publish command not found on PATH");
            if cli.is_interactive_text() && !cli.dry_run {
                output::warning(&format!(
                    "'{}' was not found on PATH, publishing will fail",
                    publish_config.command
                ));
            }
        }

        if cli.is_interactive_text() {
            output::info(&format!("Publishing with {}", publisher.describe()));
        }

        let workflow = context.workflow(cli);
        let report = workflow.publish(&publisher)?;

        match cli.format {
            OutputFormat::Json => output::json(&report)?,
            OutputFormat::Text if !cli.quiet => output::summary(&report),
            OutputFormat::Text => {}
        }

        if !report.success() {
            return Err(ExitError::new(
                PUBLISH_FAILED,
                format!("{} package(s) failed to publish", report.failed().len()),
            )
            .into());
        }
        Ok(())
    }
}
