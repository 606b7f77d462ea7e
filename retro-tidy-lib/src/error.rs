use std::path::PathBuf;

use retro_tidy_gamelist::GamelistError;
use thiserror::Error;

/// Errors that can occur while reconciling a library.
#[derive(Debug, Error)]
pub enum TidyError {
    /// I/O error outside of a specific file operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Gamelist could not be read, parsed or written
    #[error("Gamelist error: {0}")]
    Gamelist(#[from] GamelistError),

    /// A top-level library directory is missing; nothing is processed
    #[error("{kind} directory does not exist: {}", path.display())]
    MissingRoot { kind: &'static str, path: PathBuf },

    /// A directory needed by the requested passes was not configured
    #[error("No {0} configured (set it in settings.toml or pass it on the command line)")]
    NotConfigured(&'static str),

    /// A rename, delete or write of a single file failed
    #[error("Failed to {op} {}: {source}", path.display())]
    FileOperation {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// settings.toml could not be read or parsed
    #[error("Settings error: {0}")]
    Settings(String),
}

impl TidyError {
    pub fn missing_root(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingRoot {
            kind,
            path: path.into(),
        }
    }

    pub fn file_op(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
