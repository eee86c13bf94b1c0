//! Adobe Swatch Exchange (`.ase`)
//!
//! Big-endian, block tagged:
//!
//! ```text
//! "ASEF" u16 major(1) u16 minor(0) u32 block_count
//! block := u16 type, u32 length, payload[length]
//!   0xC001 group start : name
//!   0xC002 group end   : (empty)
//!   0x0001 color       : name, model[4], f32 × n, u16 usage
//! name := u16 units (incl. NUL), UTF-16BE units
//! ```

use super::{ensure_no_global_colors, Format, PaletteCoder, ParseOptions};
use crate::binary::{utf16_len_with_nul, ByteReader, ByteWriter};
use crate::color::{Color, ColorSpace, ColorType};
use crate::error::{PaletteError, Result};
use crate::palette::{Group, Palette};

const MAGIC: &[u8; 4] = b"ASEF";
const VERSION: (u16, u16) = (1, 0);

const BLOCK_GROUP_START: u16 = 0xC001;
const BLOCK_GROUP_END: u16 = 0xC002;
const BLOCK_COLOR: u16 = 0x0001;

#[derive(Debug, Clone, Copy, Default)]
pub struct AseCoder {
    options: ParseOptions,
}

impl AseCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    fn read_color(&self, block: &mut ByteReader<'_>) -> Result<Color> {
        let name = read_name(block)?;

        let model = block.read_bytes(4)?;
        let space = match model {
            b"RGB " => ColorSpace::Rgb,
            b"CMYK" => ColorSpace::Cmyk,
            b"LAB " => ColorSpace::Lab,
            b"Gray" => ColorSpace::Gray,
            other => {
                return Err(PaletteError::UnsupportedColorSpace(format!(
                    "ASE color model {:?}",
                    String::from_utf8_lossy(other)
                )))
            }
        };

        let components = (0..space.arity())
            .map(|_| block.read_f32())
            .collect::<Result<Vec<f32>>>()?;

        let usage_offset = block.offset();
        let color_type = match block.read_u16()? {
            0 => ColorType::Global,
            1 => ColorType::Spot,
            2 => ColorType::Normal,
            other if self.options.strict => {
                return Err(PaletteError::UnrecognizedFormat(format!(
                    "unknown ASE color type {other} at offset {usage_offset}"
                )))
            }
            other => {
                tracing::warn!(color_type = other, offset = usage_offset, "treating unknown ASE color type as normal");
                ColorType::Normal
            }
        };

        Color::create(space, components, name, color_type)
    }

    fn check_block_consumed(&self, block: &ByteReader<'_>, block_type: u16) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }
        if self.options.strict {
            Err(PaletteError::UnrecognizedFormat(format!(
                "ASE block {block_type:#06x} has {} unparsed bytes at offset {}",
                block.remaining(),
                block.offset()
            )))
        } else {
            tracing::warn!(block_type, remaining = block.remaining(), "ignoring unparsed ASE block bytes");
            Ok(())
        }
    }
}

impl PaletteCoder for AseCoder {
    fn format(&self) -> Format {
        Format::Ase
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        if data.get(..4) != Some(MAGIC.as_slice()) {
            return Err(PaletteError::UnrecognizedFormat(
                "missing ASEF signature".to_string(),
            ));
        }

        let mut reader = ByteReader::new(data);
        reader.read_bytes(MAGIC.len())?;
        let major = reader.read_u16()?;
        let minor = reader.read_u16()?;
        if (major, minor) != VERSION {
            return Err(PaletteError::UnsupportedVersion(format!(
                "ASE {major}.{minor}"
            )));
        }

        let block_count = reader.read_u32()? as usize;
        self.options.check_count(block_count, "ASE blocks")?;

        let mut palette = Palette::new();
        let mut open_group: Option<Group> = None;

        for _ in 0..block_count {
            let block_offset = reader.offset();
            let block_type = reader.read_u16()?;
            let length = reader.read_u32()? as usize;
            let mut block = reader.sub_reader(length)?;
            tracing::trace!(block_type, length, offset = block_offset, "ASE block");

            match block_type {
                BLOCK_GROUP_START => {
                    if open_group.is_some() {
                        return Err(PaletteError::UnsupportedStructure(format!(
                            "nested ASE group at offset {block_offset}"
                        )));
                    }
                    open_group = Some(match read_name(&mut block)? {
                        Some(name) => Group::new(name, Vec::new()),
                        None => Group::unnamed(Vec::new()),
                    });
                }
                BLOCK_GROUP_END => match open_group.take() {
                    Some(group) => palette.push_group(group),
                    None => {
                        return Err(PaletteError::UnsupportedStructure(format!(
                            "ASE group end without group start at offset {block_offset}"
                        )))
                    }
                },
                BLOCK_COLOR => {
                    let color = self.read_color(&mut block)?;
                    match open_group.as_mut() {
                        Some(group) => group.push_color(color),
                        None => palette.push_color(color),
                    }
                }
                other if self.options.strict => {
                    return Err(PaletteError::UnrecognizedFormat(format!(
                        "unknown ASE block type {other:#06x} at offset {block_offset}"
                    )))
                }
                other => {
                    tracing::warn!(block_type = other, offset = block_offset, "skipping unknown ASE block");
                    continue;
                }
            }
            self.check_block_consumed(&block, block_type)?;
        }

        if let Some(group) = open_group {
            if self.options.strict {
                return Err(PaletteError::TruncatedData {
                    offset: reader.offset(),
                    needed: 6,
                    available: reader.remaining(),
                });
            }
            tracing::warn!(group = group.name().unwrap_or_default(), "closing unterminated ASE group");
            palette.push_group(group);
        }

        self.options
            .check_trailing(Format::Ase, reader.remaining(), reader.offset())?;

        tracing::debug!(
            colors = palette.colors().len(),
            groups = palette.groups().len(),
            "decoded ASE palette"
        );
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::Ase)?;

        let block_count = palette.colors().len()
            + palette
                .groups()
                .iter()
                .map(|group| group.len() + 2)
                .sum::<usize>();
        let block_count = u32::try_from(block_count).map_err(|_| {
            PaletteError::UnsupportedStructure(format!("{block_count} ASE blocks"))
        })?;

        let mut writer = ByteWriter::with_capacity(12 + block_count as usize * 40);
        writer.write_bytes(MAGIC);
        writer.write_u16(VERSION.0);
        writer.write_u16(VERSION.1);
        writer.write_u32(block_count);

        for color in palette.colors() {
            write_color_block(&mut writer, color)?;
        }

        for group in palette.groups() {
            let mut block = ByteWriter::new();
            write_name(&mut block, group.name())?;
            write_block(&mut writer, BLOCK_GROUP_START, block)?;

            for color in group.colors() {
                write_color_block(&mut writer, color)?;
            }

            write_block(&mut writer, BLOCK_GROUP_END, ByteWriter::new())?;
        }

        tracing::debug!(blocks = block_count, bytes = writer.len(), "encoded ASE palette");
        Ok(writer.into_inner())
    }
}

fn read_name(block: &mut ByteReader<'_>) -> Result<Option<String>> {
    let units = block.read_u16()? as usize;
    if units == 0 {
        return Ok(None);
    }
    let offset = block.offset();
    let name = block.read_utf16(units - 1)?;
    if block.read_u16()? != 0 {
        return Err(PaletteError::EncodingError(format!(
            "ASE name at offset {offset} is not NUL terminated"
        )));
    }
    Ok(Some(name))
}

fn write_name(writer: &mut ByteWriter, name: Option<&str>) -> Result<()> {
    match name {
        None => writer.write_u16(0),
        Some(name) => {
            writer.write_u16(utf16_len_with_nul(name)?);
            writer.write_utf16(name);
            writer.write_u16(0);
        }
    }
    Ok(())
}

fn write_color_block(writer: &mut ByteWriter, color: &Color) -> Result<()> {
    let mut block = ByteWriter::new();
    write_name(&mut block, color.name())?;

    block.write_bytes(match color.space() {
        ColorSpace::Rgb => b"RGB ",
        ColorSpace::Cmyk => b"CMYK",
        ColorSpace::Lab => b"LAB ",
        ColorSpace::Gray => b"Gray",
    });
    for &component in color.components() {
        block.write_f32(component);
    }
    block.write_u16(match color.color_type() {
        ColorType::Global => 0,
        ColorType::Spot => 1,
        ColorType::Normal => 2,
    });

    write_block(writer, BLOCK_COLOR, block)
}

fn write_block(writer: &mut ByteWriter, block_type: u16, block: ByteWriter) -> Result<()> {
    let length = u32::try_from(block.len())
        .map_err(|_| PaletteError::UnsupportedStructure("ASE block too large".to_string()))?;
    writer.write_u16(block_type);
    writer.write_u32(length);
    writer.write_bytes(&block.into_inner());
    Ok(())
}
