//! CLI commands

mod change;
mod init;
mod publish;
mod status;
mod version;

pub use change::ChangeCommand;
pub use init::InitCommand;
pub use publish::PublishCommand;
pub use status::StatusCommand;
pub use version::VersionCommand;

use std::path::PathBuf;

use pubrel_core::config::{load_config, load_config_or_default, project_root, Config};
use pubrel_workflow::{ReleaseWorkflow, WorkflowOptions, Workspace};
use tracing::debug;

use crate::cli::output::ConsoleReporter;
use crate::cli::Cli;

/// Configuration and workspace resolved for a command
pub(crate) struct CommandContext {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub workspace: Workspace,
}

impl CommandContext {
    /// Load the configuration named by `--config`, or search for one from
    /// the working directory, and bind the workspace to its root
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = match &cli.config {
            Some(path) => (load_config(path)?, Some(path.clone())),
            None => load_config_or_default(&cwd)?,
        };

        let root = project_root(config_path.as_deref(), &cwd);
        debug!(
            root = %root.display(),
            config = ?config_path,
            packages = config.packages.len(),
            "resolved workspace"
        );

        let workspace = Workspace::new(root, &config);
        Ok(Self {
            config,
            config_path,
            workspace,
        })
    }

    /// Build the release workflow, with console progress for text output
    pub fn workflow(&self, cli: &Cli) -> ReleaseWorkflow {
        let options = WorkflowOptions::default().with_dry_run(cli.dry_run);
        let workflow = ReleaseWorkflow::new(self.workspace.clone(), options);
        if cli.is_interactive_text() {
            workflow.with_reporter(ConsoleReporter::new(cli.verbose))
        } else {
            workflow
        }
    }
}
