//! `bplist00` encoder
//!
//! The value tree is flattened into an object table in pre-order, so the top
//! object is always object 0. Reference and offset widths are the smallest
//! that fit.

use super::reader::{HEADER, TRAILER_LEN};
use super::PlistValue;
use crate::binary::ByteWriter;
use crate::error::{PaletteError, Result};

enum FlatObject<'a> {
    Key(&'a str),
    Scalar(&'a PlistValue),
    Array(Vec<usize>),
    Dictionary { keys: Vec<usize>, values: Vec<usize> },
}

#[derive(Default)]
struct Flattener<'a> {
    objects: Vec<FlatObject<'a>>,
}

impl<'a> Flattener<'a> {
    fn push(&mut self, value: &'a PlistValue) -> usize {
        let index = self.objects.len();
        match value {
            PlistValue::Array(items) => {
                self.objects.push(FlatObject::Array(Vec::new()));
                let refs = items.iter().map(|item| self.push(item)).collect();
                self.objects[index] = FlatObject::Array(refs);
            }
            PlistValue::Dictionary(dict) => {
                self.objects.push(FlatObject::Array(Vec::new()));
                let mut keys = Vec::with_capacity(dict.len());
                let mut values = Vec::with_capacity(dict.len());
                for (key, value) in dict.iter() {
                    keys.push(self.objects.len());
                    self.objects.push(FlatObject::Key(key));
                    values.push(self.push(value));
                }
                self.objects[index] = FlatObject::Dictionary { keys, values };
            }
            scalar => self.objects.push(FlatObject::Scalar(scalar)),
        }
        index
    }
}

/// Serializes `value` as a binary property list.
pub fn to_bytes(value: &PlistValue) -> Result<Vec<u8>> {
    let mut flattener = Flattener::default();
    flattener.push(value);
    let objects = flattener.objects;

    let ref_size = width_for(objects.len() as u64);
    let mut writer = ByteWriter::new();
    writer.write_bytes(HEADER);

    let mut offsets = Vec::with_capacity(objects.len());
    for object in &objects {
        offsets.push(writer.len() as u64);
        match object {
            FlatObject::Key(key) => write_string(&mut writer, key),
            FlatObject::Scalar(value) => write_scalar(&mut writer, value)?,
            FlatObject::Array(refs) => {
                write_marker(&mut writer, 0xA, refs.len());
                write_refs(&mut writer, refs, ref_size);
            }
            FlatObject::Dictionary { keys, values } => {
                write_marker(&mut writer, 0xD, keys.len());
                write_refs(&mut writer, keys, ref_size);
                write_refs(&mut writer, values, ref_size);
            }
        }
    }

    let table_offset = writer.len() as u64;
    let offset_size = width_for(table_offset);
    for offset in &offsets {
        writer.write_uint(*offset, offset_size);
    }

    let mut trailer = [0u8; TRAILER_LEN];
    trailer[6] = offset_size as u8;
    trailer[7] = ref_size as u8;
    trailer[8..16].copy_from_slice(&(objects.len() as u64).to_be_bytes());
    trailer[16..24].copy_from_slice(&0u64.to_be_bytes());
    trailer[24..32].copy_from_slice(&table_offset.to_be_bytes());
    writer.write_bytes(&trailer);

    Ok(writer.into_inner())
}

fn write_scalar(writer: &mut ByteWriter, value: &PlistValue) -> Result<()> {
    match value {
        PlistValue::Boolean(false) => writer.write_u8(0x08),
        PlistValue::Boolean(true) => writer.write_u8(0x09),
        PlistValue::Integer(i) => write_integer(writer, *i),
        PlistValue::Real(r) => {
            writer.write_u8(0x23);
            writer.write_f64(*r);
        }
        PlistValue::Data(bytes) => {
            write_marker(writer, 0x4, bytes.len());
            writer.write_bytes(bytes);
        }
        PlistValue::String(s) => write_string(writer, s),
        PlistValue::Uid(uid) => {
            let size = width_for(*uid);
            writer.write_u8(0x80 | (size as u8 - 1));
            writer.write_uint(*uid, size);
        }
        PlistValue::Array(_) | PlistValue::Dictionary(_) => {
            return Err(PaletteError::UnsupportedStructure(
                "container written as a scalar plist object".to_string(),
            ))
        }
    }
    Ok(())
}

fn write_string(writer: &mut ByteWriter, s: &str) {
    if s.is_ascii() {
        write_marker(writer, 0x5, s.len());
        writer.write_bytes(s.as_bytes());
    } else {
        write_marker(writer, 0x6, s.encode_utf16().count());
        writer.write_utf16(s);
    }
}

fn write_integer(writer: &mut ByteWriter, value: i64) {
    if value < 0 {
        writer.write_u8(0x13);
        writer.write_u64(value as u64);
        return;
    }
    let (info, size) = match value {
        0..=0xFF => (0, 1),
        0x100..=0xFFFF => (1, 2),
        0x1_0000..=0xFFFF_FFFF => (2, 4),
        _ => (3, 8),
    };
    writer.write_u8(0x10 | info);
    writer.write_uint(value as u64, size);
}

fn write_marker(writer: &mut ByteWriter, kind: u8, len: usize) {
    if len < 0x0F {
        writer.write_u8((kind << 4) | len as u8);
    } else {
        writer.write_u8((kind << 4) | 0x0F);
        write_integer(writer, len as i64);
    }
}

fn write_refs(writer: &mut ByteWriter, refs: &[usize], ref_size: usize) {
    for r in refs {
        writer.write_uint(*r as u64, ref_size);
    }
}

/// Smallest of 1, 2, 4 or 8 bytes able to hold `value`.
fn width_for(value: u64) -> usize {
    match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFFFF_FFFF => 4,
        _ => 8,
    }
}
