//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pubrel_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use pubrel_core::config::Config;

use crate::cli::output;
use crate::cli::Cli;

/// Write a default pubrel configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write YAML instead of TOML
    #[arg(long)]
    pub yaml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yaml = self.yaml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.yaml {
            DEFAULT_CONFIG_YAML
        } else {
            DEFAULT_CONFIG_TOML
        };
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = if self.yaml {
            format!("# pubrel configuration\n\n{}", serde_yaml::to_string(&Config::default())?)
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        if cli.dry_run {
            output::info(&format!("Dry run: would write {}", config_path.display()));
            print!("{}", content);
            return Ok(());
        }

        std::fs::write(&config_path, &content)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to list your packages", config_path.display());
            println!("  2. Run {} to check the workspace", style("pubrel status").cyan());
            println!(
                "  3. Run {} to start the next version",
                style("pubrel version <x.y.z>").cyan()
            );
        }

        Ok(())
    }
}
