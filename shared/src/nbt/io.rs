use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use hudsync_serde::{ByteReader, ByteWrite, ByteWriter, Serde};

use super::{
    error::NbtError,
    tag::{tag_id, Compound, Tag, TagList},
};

/// Deepest nesting of lists/compounds accepted from the wire.
pub const MAX_DEPTH: usize = 512;

/// Largest inflated size accepted for a gzip framed tag file.
pub const MAX_INFLATED_SIZE: usize = 16 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Read a named root compound, returning its name alongside it.
pub fn read_named_root(reader: &mut ByteReader) -> Result<(String, Compound), NbtError> {
    let id = reader.read_byte()?;
    if id != tag_id::COMPOUND {
        return Err(NbtError::RootNotCompound { id });
    }
    let name = read_string(reader)?;
    let compound = read_compound_payload(reader, 1)?;
    Ok((name, compound))
}

/// Read a named root compound, discarding its name.
pub fn read_compound(reader: &mut ByteReader) -> Result<Compound, NbtError> {
    read_named_root(reader).map(|(_, compound)| compound)
}

/// Packet framing for "a compound or nothing": a leading `END` byte means nothing.
pub fn read_optional_compound(reader: &mut ByteReader) -> Result<Option<Compound>, NbtError> {
    if reader.peek_byte()? == tag_id::END {
        reader.read_byte()?;
        return Ok(None);
    }
    read_compound(reader).map(Some)
}

pub fn write_compound(writer: &mut dyn ByteWrite, name: &str, compound: &Compound) {
    writer.write_byte(tag_id::COMPOUND);
    write_string(writer, name);
    write_compound_payload(writer, compound);
}

pub fn write_optional_compound(writer: &mut dyn ByteWrite, compound: Option<&Compound>) {
    match compound {
        Some(compound) => write_compound(writer, "", compound),
        None => writer.write_byte(tag_id::END),
    }
}

/// Decode a stored tag file, inflating it first when it is gzip framed.
pub fn read_file_bytes(bytes: &[u8]) -> Result<Compound, NbtError> {
    read_file_bytes_limited(bytes, MAX_INFLATED_SIZE)
}

/// Like [`read_file_bytes`], refusing gzip files that inflate past `limit` bytes.
pub fn read_file_bytes_limited(bytes: &[u8], limit: usize) -> Result<Compound, NbtError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        GzDecoder::new(bytes)
            .take(cap)
            .read_to_end(&mut inflated)
            .map_err(|error| NbtError::Compression {
                reason: error.to_string(),
            })?;
        if inflated.len() > limit {
            return Err(NbtError::InflatedTooLarge { limit });
        }
        read_compound(&mut ByteReader::new(&inflated))
    } else {
        read_compound(&mut ByteReader::new(bytes))
    }
}

/// Encode a root compound with gzip framing, the layout used for stored tag files.
pub fn write_compressed(compound: &Compound) -> Result<Vec<u8>, NbtError> {
    let mut writer = ByteWriter::new();
    write_compound(&mut writer, "", compound);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&writer.to_bytes())
        .and_then(|_| encoder.finish())
        .map_err(|error| NbtError::Compression {
            reason: error.to_string(),
        })
}

fn read_compound_payload(reader: &mut ByteReader, depth: usize) -> Result<Compound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::DepthLimitExceeded { limit: MAX_DEPTH });
    }

    let mut compound = Compound::new();
    loop {
        let id = reader.read_byte()?;
        if id == tag_id::END {
            return Ok(compound);
        }
        let name = read_string(reader)?;
        let tag = read_payload(reader, id, depth + 1)?;
        compound.insert(name, tag);
    }
}

fn read_payload(reader: &mut ByteReader, id: u8, depth: usize) -> Result<Tag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::DepthLimitExceeded { limit: MAX_DEPTH });
    }

    let tag = match id {
        tag_id::BYTE => Tag::Byte(i8::de(reader)?),
        tag_id::SHORT => Tag::Short(i16::de(reader)?),
        tag_id::INT => Tag::Int(i32::de(reader)?),
        tag_id::LONG => Tag::Long(i64::de(reader)?),
        tag_id::FLOAT => Tag::Float(f32::de(reader)?),
        tag_id::DOUBLE => Tag::Double(f64::de(reader)?),
        tag_id::BYTE_ARRAY => {
            let length = read_length(reader)?;
            let bytes = reader.read_bytes(length)?;
            Tag::ByteArray(bytes.iter().map(|byte| *byte as i8).collect())
        }
        tag_id::STRING => Tag::String(read_string(reader)?),
        tag_id::LIST => {
            let element_id = reader.read_byte()?;
            let length = read_length(reader)?;
            if length > 0 && element_id == tag_id::END {
                return Err(NbtError::UnknownTagId { id: element_id });
            }
            let mut elements = Vec::with_capacity(length.min(reader.remaining()));
            for _ in 0..length {
                elements.push(read_payload(reader, element_id, depth + 1)?);
            }
            Tag::List(TagList::from_parts(element_id, elements))
        }
        tag_id::COMPOUND => Tag::Compound(read_compound_payload(reader, depth)?),
        tag_id::INT_ARRAY => {
            let length = read_length(reader)?;
            let mut values = Vec::with_capacity(length.min(reader.remaining() / 4));
            for _ in 0..length {
                values.push(i32::de(reader)?);
            }
            Tag::IntArray(values)
        }
        tag_id::LONG_ARRAY => {
            let length = read_length(reader)?;
            let mut values = Vec::with_capacity(length.min(reader.remaining() / 8));
            for _ in 0..length {
                values.push(i64::de(reader)?);
            }
            Tag::LongArray(values)
        }
        id => return Err(NbtError::UnknownTagId { id }),
    };

    Ok(tag)
}

fn write_compound_payload(writer: &mut dyn ByteWrite, compound: &Compound) {
    for (name, tag) in compound.iter() {
        writer.write_byte(tag.id());
        write_string(writer, name);
        write_payload(writer, tag);
    }
    writer.write_byte(tag_id::END);
}

fn write_payload(writer: &mut dyn ByteWrite, tag: &Tag) {
    match tag {
        Tag::Byte(value) => value.ser(writer),
        Tag::Short(value) => value.ser(writer),
        Tag::Int(value) => value.ser(writer),
        Tag::Long(value) => value.ser(writer),
        Tag::Float(value) => value.ser(writer),
        Tag::Double(value) => value.ser(writer),
        Tag::ByteArray(values) => {
            write_length(writer, values.len());
            for value in values {
                value.ser(writer);
            }
        }
        Tag::String(value) => write_string(writer, value),
        Tag::List(list) => {
            writer.write_byte(list.element_id());
            write_length(writer, list.len());
            for element in list.iter() {
                write_payload(writer, element);
            }
        }
        Tag::Compound(compound) => write_compound_payload(writer, compound),
        Tag::IntArray(values) => {
            write_length(writer, values.len());
            for value in values {
                value.ser(writer);
            }
        }
        Tag::LongArray(values) => {
            write_length(writer, values.len());
            for value in values {
                value.ser(writer);
            }
        }
    }
}

fn read_length(reader: &mut ByteReader) -> Result<usize, NbtError> {
    let length = i32::de(reader)?;
    if length < 0 {
        return Err(NbtError::NegativeLength { length });
    }
    Ok(length as usize)
}

fn write_length(writer: &mut dyn ByteWrite, length: usize) {
    i32::try_from(length).unwrap_or(i32::MAX).ser(writer);
}

fn read_string(reader: &mut ByteReader) -> Result<String, NbtError> {
    let length = u16::de(reader)? as usize;
    let bytes = reader.read_bytes(length)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| NbtError::InvalidString)
}

// Tag strings carry a u16 length; longer values are cut at the last char boundary that fits.
fn write_string(writer: &mut dyn ByteWrite, value: &str) {
    let mut end = value.len().min(u16::MAX as usize);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    (end as u16).ser(writer);
    writer.write_bytes(&value.as_bytes()[..end]);
}
