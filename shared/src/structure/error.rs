use hudsync_serde::SerdeErr;
use thiserror::Error;

use crate::nbt::NbtError;

/// Errors that can occur while decoding a structure broadcast message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Truncated or otherwise malformed framing
    #[error("Malformed structure message: {0}")]
    Serde(#[from] SerdeErr),

    /// Box list or header compound could not be decoded
    #[error("Malformed structure message tags: {0}")]
    Nbt(#[from] NbtError),

    /// Leading kind tag is not a structure message
    #[error("Unknown structure message kind {kind}")]
    UnknownKind { kind: i32 },

    /// Header compound carries no world seed
    #[error("Structure message carries no world seed")]
    MissingSeed,

    /// Declared box count was negative
    #[error("Negative declared box count {count}")]
    NegativeBoxCount { count: i32 },
}
