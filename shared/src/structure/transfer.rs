use hudsync_serde::{ByteReader, ByteWrite, ByteWriter, Serde, VarInt};
use log::debug;

use crate::{
    nbt::{read_compound, write_compound, Compound, Tag, TagList},
    structure::{
        bounding_box::BoundingBox, error::TransferError, record::StructureRecord,
        structure_type::StructureType,
    },
};

pub const KIND_BULK: i32 = 3;
pub const KIND_CHUNKED_HEADER: i32 = 7;
pub const KIND_CHUNKED_BODY: i32 = 8;

/// Payloads this short carry nothing beyond the kind tag and are ignored.
pub const MIN_MESSAGE_LENGTH: usize = 5;

/// Most boxes one chunked body can carry.
pub const MAX_BOXES_PER_BODY: usize = u8::MAX as usize;

const KEY_SEED: &str = "Seed";
const KEY_BOXES: &str = "Boxes";
const KEY_TYPE: &str = "type";
const KEY_BOUNDS: &str = "bb";
const KEY_COMPONENT_ID: &str = "id";
const KEY_COMPONENT_COUNT: &str = "components";

/// A fully decoded structure broadcast message. Decoding never touches the cache, so a
/// message that fails to decode cannot leave it half-updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureUpdate {
    /// Replace the whole cache.
    Replace {
        seed: i64,
        records: Vec<StructureRecord>,
    },
    /// Clear the cache and open a chunked assembly.
    Begin { seed: i64, expected: usize },
    /// Append to the open chunked assembly.
    Append { records: Vec<StructureRecord> },
}

impl StructureUpdate {
    /// Decode one broadcast message. Returns `None` for a payload too short to hold a body.
    pub fn decode(bytes: &[u8]) -> Result<Option<StructureUpdate>, TransferError> {
        if bytes.len() < MIN_MESSAGE_LENGTH {
            return Ok(None);
        }

        let mut reader = ByteReader::new(bytes);
        let kind = i32::de(&mut reader)?;
        let update = match kind {
            KIND_BULK => {
                let compound = read_compound(&mut reader)?;
                let seed = read_seed(&compound)?;
                let records = match compound.get_list(KEY_BOXES) {
                    Some(list) => decode_boxes(list.compounds()),
                    None => Vec::new(),
                };
                StructureUpdate::Replace { seed, records }
            }
            KIND_CHUNKED_HEADER => {
                let compound = read_compound(&mut reader)?;
                let seed = read_seed(&compound)?;
                let count = VarInt::de(&mut reader)?.get();
                let expected = usize::try_from(count)
                    .map_err(|_| TransferError::NegativeBoxCount { count })?;
                StructureUpdate::Begin { seed, expected }
            }
            KIND_CHUNKED_BODY => {
                let count = reader.read_byte()?;
                let mut compounds = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    compounds.push(read_compound(&mut reader)?);
                }
                StructureUpdate::Append {
                    records: decode_boxes(compounds.iter()),
                }
            }
            kind => return Err(TransferError::UnknownKind { kind }),
        };

        Ok(Some(update))
    }
}

fn read_seed(compound: &Compound) -> Result<i64, TransferError> {
    compound.get_long(KEY_SEED).ok_or(TransferError::MissingSeed)
}

fn decode_boxes<'a>(compounds: impl Iterator<Item = &'a Compound>) -> Vec<StructureRecord> {
    compounds.filter_map(decode_box).collect()
}

/// Classify one box compound; boxes of unknown kind or with malformed bounds are skipped.
pub fn decode_box(compound: &Compound) -> Option<StructureRecord> {
    let name = compound.get_str(KEY_TYPE)?;
    let Some(bounding_box) = compound.get_int_array(KEY_BOUNDS).and_then(BoundingBox::from_array)
    else {
        debug!("Skipping structure box '{}' with malformed bounds", name);
        return None;
    };
    let component_count = compound
        .get_int(KEY_COMPONENT_COUNT)
        .and_then(|count| usize::try_from(count).ok());
    let kind = StructureType::classify(name, compound.get_str(KEY_COMPONENT_ID), component_count)?;

    Some(StructureRecord::new(kind, bounding_box, component_count))
}

pub fn encode_box(record: &StructureRecord) -> Compound {
    let mut compound = Compound::new()
        .with(KEY_TYPE, Tag::String(record.kind().structure_name().to_string()))
        .with(KEY_BOUNDS, Tag::IntArray(record.bounding_box().to_array().to_vec()));
    if let Some(id) = record.kind().temple_component_id() {
        compound.insert(KEY_COMPONENT_ID, Tag::String(id.to_string()));
    }
    if let Some(count) = record.component_count() {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        compound.insert(KEY_COMPONENT_COUNT, Tag::Int(count));
    }
    compound
}

/// Peer side: one bulk message replacing the receiver's whole cache.
pub fn encode_bulk(seed: i64, records: &[StructureRecord]) -> Vec<u8> {
    let boxes: TagList = records.iter().map(|record| Tag::Compound(encode_box(record))).collect();
    let compound = Compound::new()
        .with(KEY_SEED, Tag::Long(seed))
        .with(KEY_BOXES, Tag::List(boxes));

    let mut writer = ByteWriter::new();
    KIND_BULK.ser(&mut writer);
    write_compound(&mut writer, "", &compound);
    writer.to_bytes()
}

/// Peer side: a chunked header followed by as many bodies as needed, each carrying at most
/// `boxes_per_body` boxes (clamped to `1..=255`).
pub fn encode_chunked(seed: i64, records: &[StructureRecord], boxes_per_body: usize) -> Vec<Vec<u8>> {
    let boxes_per_body = boxes_per_body.clamp(1, MAX_BOXES_PER_BODY);
    let mut messages = vec![encode_chunked_header(seed, records.len())];
    messages.extend(records.chunks(boxes_per_body).map(encode_chunked_body));
    messages
}

pub fn encode_chunked_header(seed: i64, expected: usize) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    KIND_CHUNKED_HEADER.ser(&mut writer);
    write_compound(&mut writer, "", &Compound::new().with(KEY_SEED, Tag::Long(seed)));
    VarInt::from_len(expected).ser(&mut writer);
    writer.to_bytes()
}

/// Encodes at most 255 boxes; the rest of `records` is left for another body.
pub fn encode_chunked_body(records: &[StructureRecord]) -> Vec<u8> {
    let records = &records[..records.len().min(MAX_BOXES_PER_BODY)];
    let mut writer = ByteWriter::new();
    KIND_CHUNKED_BODY.ser(&mut writer);
    writer.write_byte(records.len() as u8);
    for record in records {
        write_compound(&mut writer, "", &encode_box(record));
    }
    writer.to_bytes()
}
