use hudsync_serde::{read_bounded_string, ByteReader, ByteWrite, Serde, VarInt, MAX_STRING_CHARS};

use crate::{
    nbt::{self, Compound, Tag},
    pubsub::error::PubSubError,
};

pub const TYPE_BLOB: i32 = 0;
pub const TYPE_STRING: i32 = 1;
pub const TYPE_INT: i32 = 2;
pub const TYPE_FLOAT: i32 = 3;
pub const TYPE_LONG: i32 = 4;
pub const TYPE_DOUBLE: i32 = 5;

/// A value published on a subscription node. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Blob(Tag),
    String(String),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
}

impl TypedValue {
    pub fn type_tag(&self) -> i32 {
        match self {
            TypedValue::Blob(_) => TYPE_BLOB,
            TypedValue::String(_) => TYPE_STRING,
            TypedValue::Int(_) => TYPE_INT,
            TypedValue::Float(_) => TYPE_FLOAT,
            TypedValue::Long(_) => TYPE_LONG,
            TypedValue::Double(_) => TYPE_DOUBLE,
        }
    }

    /// Numeric kinds widened to `f64`; blobs and strings are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Int(value) => Some(f64::from(*value)),
            TypedValue::Float(value) => Some(f64::from(*value)),
            TypedValue::Long(value) => Some(*value as f64),
            TypedValue::Double(value) => Some(*value),
            TypedValue::Blob(_) | TypedValue::String(_) => None,
        }
    }

    /// Numeric kinds narrowed to `i32` (truncating, like a Java `Number.intValue`).
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TypedValue::Int(value) => Some(*value),
            TypedValue::Float(value) => Some(*value as i32),
            TypedValue::Long(value) => Some(*value as i32),
            TypedValue::Double(value) => Some(*value as i32),
            TypedValue::Blob(_) | TypedValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, PubSubError> {
        let type_tag = VarInt::de(reader)?.get();
        let value = match type_tag {
            TYPE_BLOB => {
                // A non-compound value travels wrapped under the empty key
                let mut compound = nbt::read_compound(reader)?;
                match compound.remove("") {
                    Some(inner) => TypedValue::Blob(inner),
                    None => TypedValue::Blob(Tag::Compound(compound)),
                }
            }
            TYPE_STRING => TypedValue::String(read_bounded_string(reader, MAX_STRING_CHARS)?),
            TYPE_INT => TypedValue::Int(i32::de(reader)?),
            TYPE_FLOAT => TypedValue::Float(f32::de(reader)?),
            TYPE_LONG => TypedValue::Long(i64::de(reader)?),
            TYPE_DOUBLE => TypedValue::Double(f64::de(reader)?),
            type_tag => return Err(PubSubError::UnknownValueType { type_tag }),
        };
        Ok(value)
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        VarInt::new(self.type_tag()).ser(writer);
        match self {
            TypedValue::Blob(Tag::Compound(compound)) if !compound.contains_key("") => {
                nbt::write_compound(writer, "", compound);
            }
            TypedValue::Blob(tag) => {
                let wrapper = Compound::new().with("", tag.clone());
                nbt::write_compound(writer, "", &wrapper);
            }
            TypedValue::String(value) => value.ser(writer),
            TypedValue::Int(value) => value.ser(writer),
            TypedValue::Float(value) => value.ser(writer),
            TypedValue::Long(value) => value.ser(writer),
            TypedValue::Double(value) => value.ser(writer),
        }
    }
}
