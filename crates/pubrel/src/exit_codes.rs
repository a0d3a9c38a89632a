//! Exit codes for the CLI

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// One or more packages failed to publish
pub const PUBLISH_FAILED: i32 = 6;

/// A command finished and already reported its outcome, but must exit
/// unsuccessfully
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExitError {
    /// Process exit code
    pub code: i32,
    /// Summary of what failed
    pub message: String,
}

impl ExitError {
    /// Create an exit error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
