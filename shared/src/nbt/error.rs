use hudsync_serde::SerdeErr;
use thiserror::Error;

/// Errors that can occur while reading a named-binary-tag tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NbtError {
    /// Underlying byte stream was malformed
    #[error("Malformed tag data: {0}")]
    Serde(#[from] SerdeErr),

    /// Unknown tag id
    #[error("Unknown tag id {id}")]
    UnknownTagId { id: u8 },

    /// The root was not a named compound
    #[error("Root tag must be a named compound tag, found tag id {id}")]
    RootNotCompound { id: u8 },

    /// Nesting went past the depth limit (SECURITY: protects the stack from hostile input)
    #[error("Tag nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// A length prefix was negative
    #[error("Negative array or list length {length}")]
    NegativeLength { length: i32 },

    /// A tag name or string value was not valid UTF-8
    #[error("Tag string is not valid UTF-8")]
    InvalidString,

    /// Gzip framing could not be inflated or deflated
    #[error("Gzip compression failed: {reason}")]
    Compression { reason: String },

    /// A gzip framed file inflated past the size limit (SECURITY: bounds memory on hostile files)
    #[error("Inflated tag data exceeds the limit of {limit} bytes")]
    InflatedTooLarge { limit: usize },
}
