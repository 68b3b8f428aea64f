use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing a session document
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File system failure other than a missing file
    #[error("Failed to access session document '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON
    #[error("Malformed session document '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed, but its root is not an object
    #[error("Session document '{path}' is not a JSON object")]
    NotAnObject { path: PathBuf },
}
