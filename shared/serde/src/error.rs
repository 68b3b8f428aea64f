use thiserror::Error;

/// Errors raised while reading wire data.
///
/// SECURITY: every variant describes untrusted input from a remote peer. None of them
/// are fatal; the caller drops the message being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Ran off the end of the buffer
    #[error("Unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A VarInt used more than five bytes
    #[error("VarInt is longer than {max_bytes} bytes")]
    VarIntTooLong { max_bytes: usize },

    /// A length prefix was negative
    #[error("Negative length prefix {length}")]
    NegativeLength { length: i32 },

    /// A string exceeded its declared maximum
    #[error("String of {length} exceeds the maximum of {max}")]
    StringTooLong { length: usize, max: usize },

    /// A string was not valid UTF-8
    #[error("String is not valid UTF-8")]
    InvalidUtf8,
}
