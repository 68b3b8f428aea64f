//! # Hudsync Serde
//! Byte-level primitives for the hudsync wire protocols: a bounds-checked reader, a growable
//! writer, the `Serde` trait with big-endian number impls, VarInts and bounded strings.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod reader;
mod serde;
mod var_int;
mod writer;

pub use error::SerdeErr;
pub use reader::ByteReader;
pub use serde::{read_bounded_string, Serde, MAX_STRING_CHARS};
pub use var_int::VarInt;
pub use writer::{ByteCounter, ByteWrite, ByteWriter};
