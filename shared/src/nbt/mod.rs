//! Named-binary-tag trees: the structured blob format carried by subscription values and
//! structure payloads, and stored in structure data files.

mod error;
mod io;
mod tag;

pub use error::NbtError;
pub use io::{
    read_compound, read_file_bytes, read_file_bytes_limited, read_named_root,
    read_optional_compound, write_compound, write_compressed, write_optional_compound, MAX_DEPTH,
    MAX_INFLATED_SIZE,
};
pub use tag::{tag_id, Compound, Tag, TagList};
