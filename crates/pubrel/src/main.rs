//! pubrel - Release bookkeeping CLI for multi-package Dart workspaces

mod cli;
mod exit_codes;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;
use exit_codes::ExitError;
use pubrel_core::PubrelError;

fn main() {
    let cli = Cli::parse();
    let guard = init_tracing(cli.verbose);

    let code = match cli.execute() {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => exit_code_for(&e, cli.quiet),
    };

    drop(guard);
    std::process::exit(code);
}

/// Map a command error to an exit code, reporting it unless the command
/// already did
fn exit_code_for(error: &anyhow::Error, quiet: bool) -> i32 {
    if let Some(exit) = error.downcast_ref::<ExitError>() {
        if quiet {
            cli::output::error(&exit.message);
        }
        return exit.code;
    }

    cli::output::error(&format!("{:#}", error));
    match error.downcast_ref::<PubrelError>() {
        Some(e) if e.is_config() => exit_codes::CONFIG_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Set up tracing with two layers:
/// - Console: controlled by RUST_LOG (default: warn, debug with --verbose)
/// - File: always debug-level JSON to ~/.pubrel/logs/
fn init_tracing(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    if let Some(log_dir) = log_directory() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "pubrel.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_filter(console_filter),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_filter(EnvFilter::new("debug")),
            )
            .init();

        return Some(guard);
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    None
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".pubrel").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubrel_core::error::ConfigError;

    #[test]
    fn test_config_errors_use_config_exit_code() {
        let error = anyhow::Error::from(PubrelError::from(ConfigError::NotFound(
            "pubrel.toml".into(),
        )));
        assert_eq!(exit_code_for(&error, false), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_exit_error_keeps_its_code() {
        let error = anyhow::Error::from(ExitError::new(exit_codes::PUBLISH_FAILED, "2 failed"));
        assert_eq!(exit_code_for(&error, true), exit_codes::PUBLISH_FAILED);
    }

    #[test]
    fn test_other_errors_use_general_exit_code() {
        let error = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&error, false), exit_codes::ERROR);
    }
}
