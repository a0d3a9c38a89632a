//! Status command

use clap::Args;
use console::style;
use tracing::info;

use super::CommandContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Show the release state of every package
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing status command");
        let context = CommandContext::load(cli)?;
        let report = context.workflow(cli).status()?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config_path": context.config_path.as_ref().map(|p| p.display().to_string()),
                    "root": context.workspace.root().display().to_string(),
                    "in_sync": report.in_sync(),
                    "packages": report.packages,
                });
                output::json(&output)?;
            }
            OutputFormat::Text => {
                println!("{}", output::header("pubrel status"));
                println!();
                match &context.config_path {
                    Some(path) => println!(
                        "{}",
                        output::key_value("Config", &output::path_style().apply_to(path.display()).to_string())
                    ),
                    None => println!(
                        "{}",
                        output::key_value("Config", &format!("{} (using defaults)", style("not found").yellow()))
                    ),
                }
                println!(
                    "{}",
                    output::key_value("Root", &context.workspace.root().display().to_string())
                );
                println!();

                for package in &report.packages {
                    println!("{}", style(&package.package).bold());
                    if !package.exists {
                        println!("  {}", style("directory not found").red());
                        continue;
                    }

                    let manifest = package.manifest_version.as_deref().unwrap_or("-");
                    let changelog = package.changelog_version.as_deref().unwrap_or("-");
                    println!(
                        "{}",
                        output::key_value("Manifest", &output::version_style().apply_to(manifest).to_string())
                    );
                    println!(
                        "{}",
                        output::key_value(
                            "Changelog",
                            &format!("{} ({} entries)", changelog, package.pending_entries)
                        )
                    );
                    println!(
                        "{}",
                        output::key_value(
                            "Publish gate",
                            if package.publish_gate { "set" } else { "clear" }
                        )
                    );
                    if let Some(mode) = package.dependency_mode {
                        println!("{}", output::key_value("Local deps", mode.as_str()));
                    }
                    if !package.is_consistent() {
                        println!(
                            "  {} manifest and changelog versions differ",
                            style("!").yellow().bold()
                        );
                    }
                }

                println!();
                if report.in_sync() {
                    output::success(&format!(
                        "All packages at {}",
                        report.versions().first().copied().unwrap_or("-")
                    ));
                } else {
                    output::warning(&format!(
                        "Packages are out of sync (versions: {})",
                        report.versions().join(", ")
                    ));
                }
            }
        }

        Ok(())
    }
}
