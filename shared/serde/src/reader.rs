use crate::error::SerdeErr;

/// Cursor over a borrowed byte buffer. All reads are bounds-checked.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(&self) -> Result<u8, SerdeErr> {
        self.buffer
            .get(self.cursor)
            .copied()
            .ok_or(SerdeErr::UnexpectedEnd {
                needed: 1,
                remaining: 0,
            })
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let byte = self.peek_byte()?;
        self.cursor += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut output = [0u8; N];
        output.copy_from_slice(self.read_bytes(N)?);
        Ok(output)
    }

    /// Everything not yet consumed.
    pub fn read_remaining(&mut self) -> &'b [u8] {
        let start = self.cursor;
        self.cursor = self.buffer.len();
        &self.buffer[start..]
    }
}
