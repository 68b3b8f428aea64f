//! # Hudsync Shared
//! Wire types shared by the world-state cache and any peer that feeds it: named-binary-tag
//! blobs, the subscription channel messages, the packet splitter and the structure broadcast
//! messages.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use hudsync_serde::{
    read_bounded_string, ByteCounter, ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr, VarInt,
    MAX_STRING_CHARS,
};

pub mod nbt;
pub mod pubsub;
pub mod splitter;
pub mod structure;
mod types;

pub use splitter::{PacketSplitter, SplitterError};
pub use types::{BlockPos, ChunkPos, Vec3d};
