//! Error types for session-logger.

use std::path::PathBuf;
use thiserror::Error;

/// Library error type.
///
/// Nothing in the monitors lets these escape to the host: the sink and the
/// supervisor convert them into diagnostics or failed run outcomes. They only
/// surface from setup paths (config loading, reading the log back).
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure on a specific path
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed host event
    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// No location could be resolved for the activity log
    #[error("cannot resolve a documents or home directory for the activity log")]
    NoLogLocation,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
