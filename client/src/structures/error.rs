use std::{io, path::PathBuf};

use thiserror::Error;

use hudsync_shared::nbt::NbtError;

/// Errors that can occur while reading a stored structure data file
#[derive(Debug, Error)]
pub enum StructureFileError {
    /// The file exists but could not be read
    #[error("Failed to read structure file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content is not a tag tree
    #[error("Malformed structure file '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: NbtError,
    },
}
