use crate::error::{PaletteError, Result};

/// Big-endian output buffer used by the binary coders.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes the low `size` bytes of `value`, big-endian.
    pub fn write_uint(&mut self, value: u64, size: usize) {
        let bytes = value.to_be_bytes();
        self.write_bytes(&bytes[8 - size.min(8)..]);
    }

    /// Writes `text` as UTF-16BE code units, without terminator or length.
    pub fn write_utf16(&mut self, text: &str) {
        for unit in text.encode_utf16() {
            self.write_u16(unit);
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

/// Length of `text` in UTF-16 code units plus a NUL terminator, checked
/// against the width of the format's length field.
pub fn utf16_len_with_nul<T: TryFrom<usize>>(text: &str) -> Result<T> {
    let units = text.encode_utf16().count() + 1;
    T::try_from(units).map_err(|_| {
        PaletteError::UnsupportedStructure(format!("name of {units} UTF-16 units is too long"))
    })
}
