//! Generated structures: the closed set of kinds, their records, the broadcast messages that
//! carry them and the stored data files they can be read from.

mod bounding_box;
mod error;
mod map;
mod record;
mod start_data;
mod structure_type;
mod transfer;

pub use bounding_box::BoundingBox;
pub use error::TransferError;
pub use map::StructureMap;
pub use record::StructureRecord;
pub use start_data::{read_structure_starts, structure_file_names, STRUCTURE_FILE_EXTENSION};
pub use structure_type::{StructureType, TEMPLE_STRUCTURE_NAME};
pub use transfer::{
    decode_box, encode_box, encode_bulk, encode_chunked, encode_chunked_body,
    encode_chunked_header, StructureUpdate, KIND_BULK, KIND_CHUNKED_BODY, KIND_CHUNKED_HEADER,
    MAX_BOXES_PER_BODY, MIN_MESSAGE_LENGTH,
};
