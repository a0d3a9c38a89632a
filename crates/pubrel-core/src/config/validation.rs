//! Configuration validation

use std::collections::HashSet;

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Package names must be valid manifest keys
static PACKAGE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_packages(config)?;
    validate_files(config)?;
    validate_publish(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_packages(config: &Config) -> Result<()> {
    if config.packages.is_empty() {
        return Err(invalid("packages", "at least one package is required"));
    }

    let mut seen = HashSet::new();
    for (i, package) in config.packages.iter().enumerate() {
        if !PACKAGE_NAME_REGEX.is_match(package) {
            return Err(invalid(
                &format!("packages[{}]", i),
                &format!("'{}' is not a valid package name", package),
            ));
        }
        if !seen.insert(package.as_str()) {
            return Err(invalid(
                &format!("packages[{}]", i),
                &format!("'{}' is listed more than once", package),
            ));
        }
    }

    Ok(())
}

fn validate_files(config: &Config) -> Result<()> {
    if config.manifest_file.trim().is_empty() {
        return Err(invalid("manifest_file", "file name cannot be empty"));
    }
    if config.changelog_file.trim().is_empty() {
        return Err(invalid("changelog_file", "file name cannot be empty"));
    }
    Ok(())
}

fn validate_publish(config: &Config) -> Result<()> {
    if config.publish.command.trim().is_empty() {
        return Err(invalid("publish.command", "command cannot be empty"));
    }
    if config.publish.timeout_secs == 0 {
        return Err(invalid("publish.timeout_secs", "must be greater than zero"));
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::PubrelError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_packages() {
        let config = Config {
            packages: vec!["minigpu".to_string(), "minigpu".to_string()],
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_rejects_bad_package_name() {
        let config = Config {
            packages: vec!["minigpu-web".to_string()],
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.publish.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("publish.timeout_secs"));
    }

    #[test]
    fn test_rejects_empty_command() {
        let mut config = Config::default();
        config.publish.command = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
