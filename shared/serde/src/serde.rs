use crate::{
    error::SerdeErr,
    reader::ByteReader,
    var_int::VarInt,
    writer::{ByteCounter, ByteWrite},
};

/// Maximum number of characters in a protocol string.
pub const MAX_STRING_CHARS: usize = 32767;

/// A type that can be written to and read from the byte-level wire format.
///
/// Multi-byte numbers are big-endian.
pub trait Serde: Sized {
    /// Serialize Self into a ByteWrite
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parse Self from a ByteReader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Return length of value in bytes
    fn byte_length(&self) -> usize {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.count()
    }
}

macro_rules! impl_serde_for_number {
    ($type:ty) => {
        impl Serde for $type {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                writer.write_bytes(&self.to_be_bytes());
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                Ok(<$type>::from_be_bytes(reader.read_array()?))
            }

            fn byte_length(&self) -> usize {
                std::mem::size_of::<$type>()
            }
        }
    };
}

impl_serde_for_number!(u8);
impl_serde_for_number!(i8);
impl_serde_for_number!(u16);
impl_serde_for_number!(i16);
impl_serde_for_number!(i32);
impl_serde_for_number!(i64);
impl_serde_for_number!(f32);
impl_serde_for_number!(f64);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(reader.read_byte()? != 0)
    }

    fn byte_length(&self) -> usize {
        1
    }
}

/// Strings are a VarInt byte length followed by UTF-8 bytes.
impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        VarInt::from_len(self.len()).ser(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        read_bounded_string(reader, MAX_STRING_CHARS)
    }
}

/// Read a string holding at most `max_chars` characters.
pub fn read_bounded_string(reader: &mut ByteReader, max_chars: usize) -> Result<String, SerdeErr> {
    let length = VarInt::de(reader)?.get();
    if length < 0 {
        return Err(SerdeErr::NegativeLength { length });
    }
    let length = length as usize;
    if length > max_chars * 4 {
        return Err(SerdeErr::StringTooLong {
            length,
            max: max_chars * 4,
        });
    }

    let bytes = reader.read_bytes(length)?;
    let value = std::str::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)?;
    let chars = value.chars().count();
    if chars > max_chars {
        return Err(SerdeErr::StringTooLong {
            length: chars,
            max: max_chars,
        });
    }

    Ok(value.to_string())
}
