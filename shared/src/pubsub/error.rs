use hudsync_serde::SerdeErr;
use thiserror::Error;

use crate::nbt::NbtError;

/// Errors that can occur while decoding subscription-channel traffic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubSubError {
    /// Truncated or malformed primitive
    #[error("Malformed subscription message: {0}")]
    Serde(#[from] SerdeErr),

    /// Malformed structured blob value
    #[error("Malformed blob value: {0}")]
    Blob(#[from] NbtError),

    /// Value type tag outside the six known kinds. The whole batch is rejected.
    #[error("Unknown value type tag {type_tag}")]
    UnknownValueType { type_tag: i32 },

    /// Message kind not understood by this side of the channel
    #[error("Unknown subscription packet id {id}")]
    UnknownPacketId { id: i32 },
}
