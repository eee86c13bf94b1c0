//! Bounds-checked big-endian cursor
//!
//! Every read validates against the remaining buffer before touching it, so
//! a declared length can never drive a read past the end of its block.

use crate::error::{PaletteError, Result};

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    /// Absolute offset of `data[0]` in the original input, for error reporting
    base: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next byte to be read.
    pub fn offset(&self) -> usize {
        self.base + self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves to `position`, relative to the start of this reader.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(PaletteError::TruncatedData {
                offset: self.base + position,
                needed: 0,
                available: 0,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Ensures `needed` bytes are available without consuming them.
    pub fn require(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(PaletteError::TruncatedData {
                offset: self.offset(),
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.require(len)?;
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Reads an unsigned big-endian integer `size` bytes wide (1..=8).
    pub fn read_uint(&mut self, size: usize) -> Result<u64> {
        if !(1..=8).contains(&size) {
            return Err(PaletteError::UnsupportedStructure(format!(
                "integer width of {size} bytes"
            )));
        }
        Ok(self
            .read_bytes(size)?
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Reads `units` UTF-16BE code units and decodes them.
    pub fn read_utf16(&mut self, units: usize) -> Result<String> {
        let offset = self.offset();
        let byte_len = units.checked_mul(2).ok_or(PaletteError::TruncatedData {
            offset,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        let bytes = self.read_bytes(byte_len)?;
        let code_units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&code_units).map_err(|_| {
            PaletteError::EncodingError(format!("invalid UTF-16 string at offset {offset}"))
        })
    }

    /// Splits off the next `len` bytes as an independent reader.
    pub fn sub_reader(&mut self, len: usize) -> Result<ByteReader<'a>> {
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(ByteReader {
            data,
            position: 0,
            base,
        })
    }
}
