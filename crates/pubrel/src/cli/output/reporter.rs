//! Live console progress for workflows

use console::style;
use pubrel_workflow::{PackageOutcome, Reporter, WorkflowEvent};

/// Prints workflow events as they happen
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a reporter; verbose mode also echoes the output of successful
    /// publish commands
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Whether publish output should be printed
    fn shows_output(&self, is_stderr: bool, success: bool) -> bool {
        is_stderr || !success || self.verbose
    }
}

/// Captured command output, indented under the package, blank lines kept
fn indent_output(text: &str) -> String {
    text.trim_end()
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::PackageStarted { package, .. } => {
                println!("{}", style(package).bold());
            }
            WorkflowEvent::FileWritten { path, dry_run, .. } => {
                let verb = if *dry_run { "would write" } else { "wrote" };
                println!("  {} {}", style(verb).dim(), super::path_style().apply_to(path));
            }
            WorkflowEvent::Warning { message, .. } => {
                println!("  {} {}", style("!").yellow().bold(), message);
            }
            WorkflowEvent::PublishStarted { command, .. } => {
                println!("  {} {}", style("→").blue(), command);
            }
            WorkflowEvent::PublishOutput {
                text,
                is_stderr,
                success,
                ..
            } => {
                if !self.shows_output(*is_stderr, *success) {
                    return;
                }
                let text = indent_output(text);
                if *is_stderr {
                    eprintln!("{}", style(text).red());
                } else if *success {
                    println!("{}", style(text).dim());
                } else {
                    println!("{}", text);
                }
            }
            WorkflowEvent::PackageFinished { outcome, .. } => match outcome {
                PackageOutcome::Success => {}
                PackageOutcome::Skipped { reason } => {
                    println!("  {} skipped: {}", style("-").yellow(), reason);
                }
                PackageOutcome::Failed { reason } => {
                    eprintln!("  {} {}", style("✗").red().bold(), reason);
                }
            },
            WorkflowEvent::Completed { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_shown_on_failure_without_verbose() {
        let reporter = ConsoleReporter::new(false);
        assert!(reporter.shows_output(false, false));
        assert!(reporter.shows_output(true, true));
        assert!(!reporter.shows_output(false, true));
        assert!(ConsoleReporter::new(true).shows_output(false, true));
    }

    #[test]
    fn test_indent_output_keeps_blank_lines() {
        assert_eq!(
            indent_output("Publishing minigpu\n\nPackage has 0 warnings.\n"),
            "    Publishing minigpu\n    \n    Package has 0 warnings."
        );
    }
}
