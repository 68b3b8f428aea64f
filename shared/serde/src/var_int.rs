use crate::{error::SerdeErr, reader::ByteReader, serde::Serde, writer::ByteWrite};

const MAX_VAR_INT_BYTES: usize = 5;

/// A signed 32-bit integer written in 7-bit groups, least significant group first.
/// The high bit of each byte signals that another byte follows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct VarInt(i32);

impl VarInt {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Length prefixes are bounded by the protocol to `i32::MAX`.
    pub fn from_len(length: usize) -> Self {
        Self(i32::try_from(length).unwrap_or(i32::MAX))
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Read a VarInt that must be a non-negative length.
    pub fn de_len(reader: &mut ByteReader) -> Result<usize, SerdeErr> {
        let length = Self::de(reader)?.get();
        if length < 0 {
            return Err(SerdeErr::NegativeLength { length });
        }
        Ok(length as usize)
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl Serde for VarInt {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let mut value = self.0 as u32;
        loop {
            if value & !0x7F == 0 {
                writer.write_byte(value as u8);
                return;
            }
            writer.write_byte(((value & 0x7F) | 0x80) as u8);
            value >>= 7;
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut output: u32 = 0;
        for index in 0..MAX_VAR_INT_BYTES {
            let byte = reader.read_byte()?;
            output |= ((byte & 0x7F) as u32) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(Self(output as i32));
            }
        }
        Err(SerdeErr::VarIntTooLong {
            max_bytes: MAX_VAR_INT_BYTES,
        })
    }

    fn byte_length(&self) -> usize {
        let mut value = self.0 as u32;
        let mut output = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            output += 1;
        }
        output
    }
}
