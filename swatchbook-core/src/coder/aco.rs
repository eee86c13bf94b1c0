//! Adobe Color Swatch (`.aco`)
//!
//! Two stacked big-endian sections sharing one entry count. Version 1 holds
//! bare color records; version 2 repeats them, each followed by a
//! `u32`-length-prefixed, NUL-terminated UTF-16BE name.
//!
//! ```text
//! u16 version(1) u16 count  { u16 space, u16 w, u16 x, u16 y, u16 z } × count
//! u16 version(2) u16 count  { u16 space, u16 w, u16 x, u16 y, u16 z, u32 units, UTF-16BE } × count
//! ```

use super::{ensure_no_global_colors, Format, PaletteCoder, ParseOptions};
use crate::binary::{utf16_len_with_nul, ByteReader, ByteWriter};
use crate::color::{Color, ColorSpace};
use crate::error::{PaletteError, Result};
use crate::palette::{Palette, SourceLayout};

const SPACE_RGB: u16 = 0;
const SPACE_CMYK: u16 = 2;
const SPACE_LAB: u16 = 7;
const SPACE_GRAY: u16 = 8;

const RGB_SCALE: f64 = 65535.0;
const LAB_SCALE: f64 = 100.0;
const GRAY_SCALE: f64 = 10000.0;

/// A raw color record: color space code and four channel words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Record {
    space: u16,
    words: [u16; 4],
}

impl Record {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let space = reader.read_u16()?;
        let mut words = [0u16; 4];
        for word in &mut words {
            *word = reader.read_u16()?;
        }
        Ok(Self { space, words })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.space);
        for word in self.words {
            writer.write_u16(word);
        }
    }

    fn to_color(self) -> Result<Color> {
        let [w, x, y, z] = self.words;
        match self.space {
            SPACE_RGB => Color::rgb(unit(w, RGB_SCALE), unit(x, RGB_SCALE), unit(y, RGB_SCALE)),
            // 0 is full ink, 65535 is none
            SPACE_CMYK => Color::cmyk(
                inverted_unit(w),
                inverted_unit(x),
                inverted_unit(y),
                inverted_unit(z),
            ),
            SPACE_LAB => Color::lab(
                unit(w, LAB_SCALE),
                (x as i16 as f64 / LAB_SCALE) as f32,
                (y as i16 as f64 / LAB_SCALE) as f32,
            ),
            SPACE_GRAY => Color::gray(unit(w, GRAY_SCALE)),
            other => Err(PaletteError::UnsupportedColorSpace(format!(
                "ACO color space {other}"
            ))),
        }
    }

    fn from_color(color: &Color) -> Self {
        let c = color.components();
        match color.space() {
            ColorSpace::Rgb => Self {
                space: SPACE_RGB,
                words: [word(c[0], RGB_SCALE), word(c[1], RGB_SCALE), word(c[2], RGB_SCALE), 0],
            },
            ColorSpace::Cmyk => Self {
                space: SPACE_CMYK,
                words: [
                    inverted_word(c[0]),
                    inverted_word(c[1]),
                    inverted_word(c[2]),
                    inverted_word(c[3]),
                ],
            },
            ColorSpace::Lab => Self {
                space: SPACE_LAB,
                words: [
                    word(c[0], LAB_SCALE),
                    signed_word(c[1]) as u16,
                    signed_word(c[2]) as u16,
                    0,
                ],
            },
            ColorSpace::Gray => Self {
                space: SPACE_GRAY,
                words: [word(c[0], GRAY_SCALE), 0, 0, 0],
            },
        }
    }
}

fn unit(word: u16, scale: f64) -> f32 {
    (word as f64 / scale) as f32
}

fn inverted_unit(word: u16) -> f32 {
    (1.0 - word as f64 / RGB_SCALE) as f32
}

fn word(component: f32, scale: f64) -> u16 {
    (component as f64 * scale).round().clamp(0.0, u16::MAX as f64) as u16
}

fn inverted_word(component: f32) -> u16 {
    ((1.0 - component as f64) * RGB_SCALE).round().clamp(0.0, RGB_SCALE) as u16
}

fn signed_word(component: f32) -> i16 {
    (component as f64 * LAB_SCALE)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcoCoder {
    options: ParseOptions,
}

impl AcoCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Reads the version 2 section and attaches its names. Its records must
    /// repeat the version 1 records; strict parsing rejects any difference.
    fn read_names(
        &self,
        reader: &mut ByteReader<'_>,
        records: &[Record],
        colors: &mut [Color],
    ) -> Result<()> {
        let version = reader.read_u16()?;
        if version != 2 {
            return Err(PaletteError::UnsupportedVersion(format!(
                "ACO section version {version}, expected 2"
            )));
        }

        let count = reader.read_u16()? as usize;
        if count != colors.len() {
            return Err(PaletteError::UnsupportedStructure(format!(
                "ACO version 1 has {} colors but version 2 has {count}",
                colors.len()
            )));
        }

        for (index, (color, expected)) in colors.iter_mut().zip(records).enumerate() {
            let offset = reader.offset();
            let record = Record::read(reader)?;
            if record != *expected {
                if self.options.strict {
                    return Err(PaletteError::UnsupportedStructure(format!(
                        "ACO version 2 record {index} at offset {offset} differs from version 1"
                    )));
                }
                tracing::warn!(index, offset, "keeping version 1 record over differing version 2 record");
            }
            color.set_name(read_name(reader)?);
        }
        Ok(())
    }
}

impl PaletteCoder for AcoCoder {
    fn format(&self) -> Format {
        Format::Aco
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        let mut reader = ByteReader::new(data);

        let version = reader.read_u16()?;
        if version != 1 {
            return Err(PaletteError::UnsupportedVersion(format!(
                "ACO section version {version}, expected 1"
            )));
        }

        let count = reader.read_u16()? as usize;
        self.options.check_count(count, "ACO colors")?;
        // each record is 10 bytes; fail before allocating for a lying count
        reader.require(count * 10)?;

        let records = (0..count)
            .map(|_| Record::read(&mut reader))
            .collect::<Result<Vec<Record>>>()?;
        let mut colors = records
            .iter()
            .map(|record| record.to_color())
            .collect::<Result<Vec<Color>>>()?;

        let has_names = !reader.is_empty();
        if has_names {
            self.read_names(&mut reader, &records, &mut colors)?;
            self.options
                .check_trailing(Format::Aco, reader.remaining(), reader.offset())?;
        }

        let mut palette = Palette::new();
        for color in colors {
            palette.push_color(color);
        }
        palette.set_layout(SourceLayout {
            aco_name_section: has_names,
        });

        tracing::debug!(colors = count, has_names, "decoded ACO palette");
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::Aco)?;

        let colors: Vec<&Color> = palette.all_colors().collect();
        let count = u16::try_from(colors.len()).map_err(|_| {
            PaletteError::UnsupportedStructure(format!(
                "ACO holds at most {} colors, found {}",
                u16::MAX,
                colors.len()
            ))
        })?;

        let mut writer = ByteWriter::with_capacity(4 + colors.len() * 10);
        writer.write_u16(1);
        writer.write_u16(count);
        for color in &colors {
            Record::from_color(color).write(&mut writer);
        }

        // a decoded version 2 section is kept even when all its names are empty
        let has_names = palette.layout().aco_name_section
            || colors.iter().any(|color| color.name().is_some());
        if has_names {
            writer.write_u16(2);
            writer.write_u16(count);
            for color in &colors {
                Record::from_color(color).write(&mut writer);
                write_name(&mut writer, color.name())?;
            }
        }

        tracing::debug!(colors = colors.len(), has_names, "encoded ACO palette");
        Ok(writer.into_inner())
    }
}

fn read_name(reader: &mut ByteReader<'_>) -> Result<Option<String>> {
    let units = reader.read_u32()? as usize;
    if units == 0 {
        return Ok(None);
    }
    let offset = reader.offset();
    let name = reader.read_utf16(units - 1)?;
    if reader.read_u16()? != 0 {
        return Err(PaletteError::EncodingError(format!(
            "ACO name at offset {offset} is not NUL terminated"
        )));
    }
    Ok(Some(name))
}

fn write_name(writer: &mut ByteWriter, name: Option<&str>) -> Result<()> {
    match name {
        None => writer.write_u32(0),
        Some(name) => {
            writer.write_u32(utf16_len_with_nul(name)?);
            writer.write_utf16(name);
            writer.write_u16(0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_rgb(words: &[[u16; 3]]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_u16(1);
        writer.write_u16(words.len() as u16);
        for [r, g, b] in words {
            Record {
                space: SPACE_RGB,
                words: [*r, *g, *b, 0],
            }
            .write(&mut writer);
        }
        writer.into_inner()
    }

    #[test]
    fn test_v1_only_has_no_names() {
        let data = v1_rgb(&[[65535, 0, 0], [0, 65535, 0]]);
        let palette = AcoCoder::new().load(&data).unwrap();

        assert_eq!(palette.colors().len(), 2);
        assert_eq!(palette.colors()[0].hex_rgb(), "#ff0000");
        assert_eq!(palette.colors()[1].name(), None);
        assert_eq!(AcoCoder::new().data(&palette).unwrap(), data);
    }

    #[test]
    fn test_names_attach_by_position() {
        let mut palette = Palette::new();
        palette.push_color(Color::rgb(1.0, 1.0, 1.0).unwrap().with_name("white"));
        palette.push_color(Color::rgb(0.0, 0.0, 0.0).unwrap());
        palette.push_color(Color::rgb(0.5, 0.5, 0.5).unwrap().with_name(""));

        let coder = AcoCoder::new();
        let data = coder.data(&palette).unwrap();
        let decoded = coder.load(&data).unwrap();

        assert_eq!(decoded.colors()[0].name(), Some("white"));
        assert_eq!(decoded.colors()[1].name(), None);
        assert_eq!(decoded.colors()[2].name(), Some(""));
        assert_eq!(coder.data(&decoded).unwrap(), data);
    }

    fn with_v2_section(v1: &[u8], entries: &[(Record, Option<&str>)]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_bytes(v1);
        writer.write_u16(2);
        writer.write_u16(entries.len() as u16);
        for (record, name) in entries {
            record.write(&mut writer);
            write_name(&mut writer, *name).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn test_unnamed_v2_section_roundtrips_byte_exact() {
        let record = Record {
            space: SPACE_RGB,
            words: [65535, 0, 0, 0],
        };
        let data = with_v2_section(&v1_rgb(&[[65535, 0, 0]]), &[(record, None)]);
        assert_eq!(data.len(), 32);

        let coder = AcoCoder::new();
        let palette = coder.load(&data).unwrap();
        assert_eq!(palette.colors()[0].name(), None);
        assert_eq!(coder.data(&palette).unwrap(), data);

        // equal to a palette built without the section, which encodes v1 only
        let mut built = Palette::new();
        built.push_color(Color::rgb(1.0, 0.0, 0.0).unwrap());
        assert_eq!(palette, built);
        assert_eq!(coder.data(&built).unwrap().len(), 14);
    }

    #[test]
    fn test_differing_v2_record_strict_and_lenient() {
        let other = Record {
            space: SPACE_RGB,
            words: [0, 65535, 0, 0],
        };
        let data = with_v2_section(&v1_rgb(&[[65535, 0, 0]]), &[(other, Some("red"))]);

        assert!(matches!(
            AcoCoder::new().load(&data),
            Err(PaletteError::UnsupportedStructure(_))
        ));
        let palette = AcoCoder::with_options(ParseOptions::lenient())
            .load(&data)
            .unwrap();
        assert_eq!(palette.colors()[0].hex_rgb(), "#ff0000");
        assert_eq!(palette.colors()[0].name(), Some("red"));
    }

    #[test]
    fn test_record_conversions() {
        let cmyk = Record {
            space: SPACE_CMYK,
            words: [65535, 0, 32768, 65535],
        }
        .to_color()
        .unwrap();
        assert_eq!(cmyk.space(), ColorSpace::Cmyk);
        assert_eq!(cmyk.components()[0], 0.0);
        assert_eq!(cmyk.components()[1], 1.0);

        let lab = Record {
            space: SPACE_LAB,
            words: [5000, (-2500i16) as u16, 1250, 0],
        }
        .to_color()
        .unwrap();
        assert_eq!(lab.components(), &[50.0, -25.0, 12.5]);

        let gray = Record {
            space: SPACE_GRAY,
            words: [2500, 0, 0, 0],
        }
        .to_color()
        .unwrap();
        assert_eq!(gray.components(), &[0.25]);
    }

    #[test]
    fn test_record_words_survive_conversion() {
        let records = [
            Record { space: SPACE_RGB, words: [1, 32767, 65534, 0] },
            Record { space: SPACE_CMYK, words: [1, 2, 65533, 40000] },
            Record { space: SPACE_LAB, words: [9999, (-12800i16) as u16, 12700, 0] },
            Record { space: SPACE_GRAY, words: [1234, 0, 0, 0] },
        ];
        for record in records {
            let color = record.to_color().unwrap();
            assert_eq!(Record::from_color(&color), record);
        }
    }

    #[test]
    fn test_unsupported_space() {
        let mut writer = ByteWriter::new();
        writer.write_u16(1);
        writer.write_u16(1);
        Record { space: 1, words: [0; 4] }.write(&mut writer);

        assert!(matches!(
            AcoCoder::new().load(&writer.into_inner()),
            Err(PaletteError::UnsupportedColorSpace(_))
        ));
    }

    #[test]
    fn test_bad_versions() {
        assert!(matches!(
            AcoCoder::new().load(&[0, 3, 0, 0]),
            Err(PaletteError::UnsupportedVersion(_))
        ));

        let mut data = v1_rgb(&[[0, 0, 0]]);
        data.extend_from_slice(&[0, 7, 0, 1]);
        assert!(matches!(
            AcoCoder::new().load(&data),
            Err(PaletteError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_section_count_mismatch() {
        let mut data = v1_rgb(&[[0, 0, 0]]);
        data.extend_from_slice(&[0, 2, 0, 2]);
        assert!(matches!(
            AcoCoder::new().load(&data),
            Err(PaletteError::UnsupportedStructure(_))
        ));
    }

    #[test]
    fn test_declared_count_exceeds_data() {
        let mut data = v1_rgb(&[[0, 0, 0]]);
        data[3] = 200;
        assert!(matches!(
            AcoCoder::new().load(&data),
            Err(PaletteError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_groups_are_flattened() {
        let mut palette = Palette::new();
        palette.push_color(Color::gray(1.0).unwrap());
        palette.push_group(crate::palette::Group::new(
            "g",
            vec![Color::gray(0.0).unwrap()],
        ));

        let decoded = AcoCoder::new()
            .load(&AcoCoder::new().data(&palette).unwrap())
            .unwrap();
        assert_eq!(decoded.colors().len(), 2);
        assert!(decoded.groups().is_empty());
    }
}
