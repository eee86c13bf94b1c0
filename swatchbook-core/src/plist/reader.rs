//! `bplist00` decoder
//!
//! Layout: 8-byte header, object data, offset table, 32-byte trailer. The
//! trailer gives the width of offsets and object references, the object
//! count, the top object and where the offset table starts.

use super::{PlistDictionary, PlistValue};
use crate::binary::ByteReader;
use crate::error::{PaletteError, Result};
use std::cell::Cell;

pub(super) const HEADER: &[u8; 8] = b"bplist00";
pub(super) const TRAILER_LEN: usize = 32;

/// Deepest container nesting accepted before giving up.
const MAX_DEPTH: usize = 256;
/// Objects may be shared, so the expanded tree is bounded separately.
const MAX_VISITS: usize = 1 << 20;
/// Bytes the expanded tree may occupy per input byte. Shared objects are
/// copied once per reference, and every copy is charged.
const EXPANSION_FACTOR: usize = 64;
/// Expansion allowance for inputs too small for the factor to matter.
const MIN_EXPANSION: usize = 1 << 20;
/// Charged for every materialized object on top of its payload.
const OBJECT_COST: usize = std::mem::size_of::<PlistValue>();

struct Trailer {
    offset_size: usize,
    ref_size: usize,
    object_count: usize,
    top_object: usize,
    table_offset: usize,
}

impl Trailer {
    fn read(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(&data[data.len() - TRAILER_LEN..]);
        reader.read_bytes(6)?;
        let offset_size = reader.read_u8()? as usize;
        let ref_size = reader.read_u8()? as usize;
        let object_count = reader.read_u64()?;
        let top_object = reader.read_u64()?;
        let table_offset = reader.read_u64()?;

        let invalid = |what: &str| PaletteError::UnrecognizedFormat(format!("bplist trailer: {what}"));
        if !(1..=8).contains(&offset_size) || !(1..=8).contains(&ref_size) {
            return Err(invalid("bad integer widths"));
        }
        let object_count = usize::try_from(object_count).map_err(|_| invalid("object count"))?;
        let top_object = usize::try_from(top_object).map_err(|_| invalid("top object"))?;
        let table_offset = usize::try_from(table_offset).map_err(|_| invalid("table offset"))?;
        if top_object >= object_count {
            return Err(invalid("top object out of range"));
        }

        Ok(Self {
            offset_size,
            ref_size,
            object_count,
            top_object,
            table_offset,
        })
    }
}

/// Parses a binary property list.
pub fn parse(data: &[u8]) -> Result<PlistValue> {
    if !data.starts_with(HEADER) {
        return Err(PaletteError::UnrecognizedFormat(
            "missing bplist00 header".to_string(),
        ));
    }
    if data.len() < HEADER.len() + TRAILER_LEN {
        return Err(PaletteError::TruncatedData {
            offset: data.len(),
            needed: HEADER.len() + TRAILER_LEN,
            available: data.len(),
        });
    }

    let trailer = Trailer::read(data)?;
    let body = &data[..data.len() - TRAILER_LEN];

    let mut table = ByteReader::new(body);
    table.seek(trailer.table_offset)?;
    table.require(trailer.object_count.saturating_mul(trailer.offset_size))?;
    let offsets = (0..trailer.object_count)
        .map(|_| table.read_uint(trailer.offset_size).map(|o| o as usize))
        .collect::<Result<Vec<usize>>>()?;

    let parser = ObjectParser {
        body,
        offsets,
        ref_size: trailer.ref_size,
        visits: Cell::new(0),
        budget: Cell::new(
            data.len()
                .saturating_mul(EXPANSION_FACTOR)
                .max(MIN_EXPANSION),
        ),
    };
    parser.object(trailer.top_object, 0)
}

struct ObjectParser<'a> {
    body: &'a [u8],
    offsets: Vec<usize>,
    ref_size: usize,
    visits: Cell<usize>,
    /// Bytes the expanded tree may still occupy
    budget: Cell<usize>,
}

impl<'a> ObjectParser<'a> {
    fn reader_at(&self, index: usize) -> Result<ByteReader<'a>> {
        let offset = *self.offsets.get(index).ok_or_else(|| {
            PaletteError::UnrecognizedFormat(format!("bplist object reference {index} out of range"))
        })?;
        let mut reader = ByteReader::new(self.body);
        reader.seek(offset)?;
        Ok(reader)
    }

    fn charge(&self, payload: usize) -> Result<()> {
        let cost = payload.saturating_add(OBJECT_COST);
        match self.budget.get().checked_sub(cost) {
            Some(left) => {
                self.budget.set(left);
                Ok(())
            }
            None => Err(PaletteError::UnsupportedStructure(
                "bplist expands far beyond its input size".to_string(),
            )),
        }
    }

    fn object(&self, index: usize, depth: usize) -> Result<PlistValue> {
        if depth > MAX_DEPTH {
            return Err(PaletteError::UnsupportedStructure(
                "bplist nesting too deep".to_string(),
            ));
        }
        self.visits.set(self.visits.get() + 1);
        if self.visits.get() > MAX_VISITS {
            return Err(PaletteError::UnsupportedStructure(
                "bplist expands to too many objects".to_string(),
            ));
        }

        let mut reader = self.reader_at(index)?;
        let offset = reader.offset();
        let marker = reader.read_u8()?;
        let info = marker & 0x0F;

        let value = match marker >> 4 {
            0x0 => match info {
                0x8 => PlistValue::Boolean(false),
                0x9 => PlistValue::Boolean(true),
                _ => return Err(unsupported_marker(marker, offset)),
            },
            0x1 => PlistValue::Integer(read_integer(&mut reader, info)?),
            0x2 => match info {
                2 => PlistValue::Real(reader.read_f32()? as f64),
                3 => PlistValue::Real(reader.read_f64()?),
                _ => return Err(unsupported_marker(marker, offset)),
            },
            0x4 => {
                let len = read_length(&mut reader, info)?;
                let bytes = reader.read_bytes(len)?;
                self.charge(len)?;
                PlistValue::Data(bytes.to_vec())
            }
            0x5 => {
                let len = read_length(&mut reader, info)?;
                let bytes = reader.read_bytes(len)?;
                self.charge(len)?;
                if !bytes.is_ascii() {
                    return Err(PaletteError::EncodingError(format!(
                        "non-ASCII bplist string at offset {offset}"
                    )));
                }
                PlistValue::String(String::from_utf8_lossy(bytes).into_owned())
            }
            0x6 => {
                let len = read_length(&mut reader, info)?;
                self.charge(len.saturating_mul(2))?;
                PlistValue::String(reader.read_utf16(len)?)
            }
            0x8 => PlistValue::Uid(reader.read_uint(info as usize + 1)?),
            0xA => {
                let refs = self.read_refs(&mut reader, info)?;
                self.charge(refs.len().saturating_mul(OBJECT_COST))?;
                let items = refs
                    .into_iter()
                    .map(|r| self.object(r, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                PlistValue::Array(items)
            }
            0xD => {
                let len = read_length(&mut reader, info)?;
                let keys = self.read_ref_list(&mut reader, len)?;
                let values = self.read_ref_list(&mut reader, len)?;
                self.charge(len.saturating_mul(OBJECT_COST))?;

                let mut dict = PlistDictionary::new();
                for (key, value) in keys.into_iter().zip(values) {
                    let key = match self.object(key, depth + 1)? {
                        PlistValue::String(key) => key,
                        _ => {
                            return Err(PaletteError::UnsupportedStructure(format!(
                                "non-string bplist dictionary key at offset {offset}"
                            )))
                        }
                    };
                    dict.set(key, self.object(value, depth + 1)?);
                }
                PlistValue::Dictionary(dict)
            }
            _ => return Err(unsupported_marker(marker, offset)),
        };
        self.charge(0)?;
        Ok(value)
    }

    fn read_refs(&self, reader: &mut ByteReader<'_>, info: u8) -> Result<Vec<usize>> {
        let len = read_length(reader, info)?;
        self.read_ref_list(reader, len)
    }

    fn read_ref_list(&self, reader: &mut ByteReader<'_>, len: usize) -> Result<Vec<usize>> {
        reader.require(len.saturating_mul(self.ref_size))?;
        (0..len)
            .map(|_| reader.read_uint(self.ref_size).map(|r| r as usize))
            .collect()
    }
}

fn read_integer(reader: &mut ByteReader<'_>, info: u8) -> Result<i64> {
    match info {
        0..=2 => Ok(reader.read_uint(1 << info)? as i64),
        3 => Ok(reader.read_u64()? as i64),
        _ => Err(PaletteError::UnsupportedStructure(format!(
            "bplist integer of {} bytes",
            1u32 << info
        ))),
    }
}

/// Object length from the marker's low nibble, or from a following integer
/// object when the nibble is 0xF.
fn read_length(reader: &mut ByteReader<'_>, info: u8) -> Result<usize> {
    if info != 0x0F {
        return Ok(info as usize);
    }
    let offset = reader.offset();
    let marker = reader.read_u8()?;
    if marker >> 4 != 0x1 {
        return Err(unsupported_marker(marker, offset));
    }
    let len = read_integer(reader, marker & 0x0F)?;
    usize::try_from(len).map_err(|_| {
        PaletteError::UnsupportedStructure(format!("negative bplist length at offset {offset}"))
    })
}

fn unsupported_marker(marker: u8, offset: usize) -> PaletteError {
    PaletteError::UnsupportedStructure(format!(
        "bplist object marker {marker:#04x} at offset {offset}"
    ))
}
