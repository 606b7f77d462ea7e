use thiserror::Error;

use retro_tidy_lib::TidyError;

/// Errors that end a CLI command with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Fatal library error (missing root, unreadable settings)
    #[error("{0}")]
    Tidy(#[from] TidyError),

    /// Report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
