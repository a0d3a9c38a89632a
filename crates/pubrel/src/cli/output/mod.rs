//! Output formatting utilities

mod reporter;

pub use reporter::ConsoleReporter;

use console::{style, Style};
use pubrel_workflow::{PackageOutcome, WorkflowReport};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Print a report as pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the closing summary of a workflow
pub fn summary(report: &WorkflowReport) {
    println!();
    println!("{}", header(&format!("{} summary", report.operation)));

    for package in &report.packages {
        let actions = package
            .actions
            .iter()
            .map(|a| a.describe())
            .collect::<Vec<_>>()
            .join(", ");
        let detail = match &package.outcome {
            PackageOutcome::Success if actions.is_empty() => "no changes".to_string(),
            PackageOutcome::Success => actions,
            PackageOutcome::Skipped { reason } => format!("skipped: {}", reason),
            PackageOutcome::Failed { reason } => format!("failed: {}", reason),
        };
        println!("{}", key_value(&package.package, &detail));
    }

    for name in &report.unknown {
        println!("{}", key_value(name, &style("unknown package").yellow().to_string()));
    }

    println!();
    let counts = format!(
        "{} succeeded, {} skipped, {} failed",
        report.succeeded().len(),
        report.skipped().len(),
        report.failed().len()
    );
    if report.success() {
        success(&counts);
    } else {
        error(&counts);
    }
    if report.dry_run {
        info("Dry run: no files were written");
    }
}
