use std::path::Path;

use thiserror::Error;

/// Result type alias for hostaudit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors raised by collaborators and setup code.
///
/// Checks and recovery actions never let these escape: they fold them
/// into a failing result after logging.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Reading or writing a file failed
    #[error("io error on {path}: {source}")]
    Io {
        /// File the operation targeted
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external command could not be run or exited non-zero
    #[error("command `{program}` failed: {detail}")]
    Command {
        /// Program name
        program: String,
        /// Exit status or spawn error
        detail: String,
    },

    /// A file or command output did not have the expected shape
    #[error("could not parse {what}: {detail}")]
    Parse {
        /// What was being parsed
        what: String,
        /// Why it was rejected
        detail: String,
    },

    /// Configuration is invalid
    #[error("config error: {0}")]
    Config(String),

    /// Escalation marker could not be read or written
    #[error("escalation marker error: {0}")]
    Marker(String),
}

impl AuditError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Build a command failure.
    pub fn command(program: &str, detail: impl Into<String>) -> Self {
        Self::Command {
            program: program.to_string(),
            detail: detail.into(),
        }
    }

    /// Build a parse failure.
    pub fn parse(what: &str, detail: impl Into<String>) -> Self {
        Self::Parse {
            what: what.to_string(),
            detail: detail.into(),
        }
    }

    /// Returns true if the error means the file simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
