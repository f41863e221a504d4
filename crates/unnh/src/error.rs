use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid number of arguments: expected 2, got {0}")]
    ArgumentCount(usize),

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list game variants under {}: {source}", .root.display())]
    GlobFailed {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up {}: {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to {op} core dump limit: {source}")]
    CoreLimit {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {}: {source}", .binary.display())]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write crash log {}: {source}", .path.display())]
    CrashLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the operation and path that produced it.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io { source, .. }
            | Error::GlobFailed { source, .. }
            | Error::CrashLog { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Error::Backup { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
