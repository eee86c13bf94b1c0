//! Apple Color List (`.clr`)
//!
//! An `NSColorList` serialized with `NSKeyedArchiver` into a binary property
//! list. The list holds parallel `NSKeys` / `NSColors` arrays; each `NSColor`
//! carries its components as an ASCII string of space separated numbers.
//!
//! Lists stored with the older `NSArchiver` typedstream encoding are not
//! decoded; they are reported as [`PaletteError::UnrecognizedFormat`].

use super::{ensure_no_global_colors, ensure_space, Format, PaletteCoder, ParseOptions};
use crate::color::{Color, ColorSpace, ColorType};
use crate::error::{PaletteError, Result};
use crate::palette::Palette;
use crate::plist::{ArchiveBuilder, KeyedArchive, PlistDictionary, PlistValue};

const COLOR_LIST_CLASS: &str = "NSColorList";
/// Version byte, length and signature opening an `NSArchiver` stream.
const TYPEDSTREAM_SIGNATURE: &[u8] = b"\x04\x0bstreamtyped";
const COLOR_CLASS: &str = "NSColor";

/// `NSColorSpace` codes
const CALIBRATED_RGB: i64 = 1;
const DEVICE_RGB: i64 = 2;
const CALIBRATED_WHITE: i64 = 3;
const DEVICE_WHITE: i64 = 4;
const DEVICE_CMYK: i64 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClrCoder {
    options: ParseOptions,
}

impl ClrCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl PaletteCoder for ClrCoder {
    fn format(&self) -> Format {
        Format::Clr
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        if data.starts_with(TYPEDSTREAM_SIGNATURE) {
            return Err(PaletteError::UnrecognizedFormat(
                "NSArchiver typedstream color lists are not supported, only keyed archives"
                    .to_string(),
            ));
        }
        let archive = KeyedArchive::from_bytes(data)?;
        let root = archive.root()?;
        let class = archive.class_name(root)?;
        if class != COLOR_LIST_CLASS {
            return Err(PaletteError::UnsupportedStructure(format!(
                "expected {COLOR_LIST_CLASS} archive, found {class}"
            )));
        }

        let keys = archive.array(root, "NSKeys")?;
        let colors = archive.array(root, "NSColors")?;
        if keys.len() != colors.len() {
            return Err(PaletteError::UnsupportedStructure(format!(
                "color list has {} keys for {} colors",
                keys.len(),
                colors.len()
            )));
        }
        self.options.check_count(colors.len(), "CLR colors")?;

        let mut palette = Palette::new();
        palette.set_name(
            archive
                .resolve(root, "NSName")?
                .and_then(PlistValue::as_str)
                .map(str::to_string),
        );

        for (index, (key, color)) in keys.into_iter().zip(colors).enumerate() {
            let color = color
                .and_then(PlistValue::as_dictionary)
                .ok_or_else(|| {
                    PaletteError::UnsupportedStructure(format!("color {index} is not an NSColor"))
                })?;
            let mut color = read_color(&archive, color)?;
            color.set_name(key.and_then(PlistValue::as_str).map(str::to_string));
            palette.push_color(color);
        }

        tracing::debug!(colors = palette.colors().len(), "decoded CLR palette");
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::Clr)?;

        let mut builder = ArchiveBuilder::new();
        let root = builder.reserve();
        let list_class = builder.class(COLOR_LIST_CLASS, &["NSObject"]);

        let mut keys = Vec::new();
        let mut colors = Vec::new();
        for color in palette.all_colors() {
            ensure_space(
                color,
                &[ColorSpace::Rgb, ColorSpace::Gray, ColorSpace::Cmyk],
                Format::Clr,
            )?;
            keys.push(match color.name() {
                Some(name) => builder.add(name),
                None => 0,
            });
            let dict = color_dictionary(&mut builder, color);
            colors.push(builder.add(dict));
        }

        let count = colors.len();
        let keys = builder.array(keys);
        let colors = builder.array(colors);

        let mut list = PlistDictionary::new();
        if let Some(name) = palette.name() {
            list.set("NSName", PlistValue::Uid(builder.add(name)));
        }
        list.set("NSKeys", PlistValue::Uid(keys));
        list.set("NSColors", PlistValue::Uid(colors));
        list.set("$class", PlistValue::Uid(list_class));
        builder.set(root, list);

        let bytes = builder.finish(root)?;
        tracing::debug!(colors = count, bytes = bytes.len(), "encoded CLR palette");
        Ok(bytes)
    }
}

fn read_color(archive: &KeyedArchive, dict: &PlistDictionary) -> Result<Color> {
    let class = archive.class_name(dict)?;
    if class != COLOR_CLASS {
        return Err(PaletteError::UnsupportedStructure(format!(
            "expected {COLOR_CLASS}, found {class}"
        )));
    }

    let code = dict
        .get("NSColorSpace")
        .and_then(PlistValue::as_integer)
        .ok_or_else(|| PaletteError::UnsupportedStructure("NSColor without NSColorSpace".to_string()))?;
    let (space, key) = match code {
        CALIBRATED_RGB | DEVICE_RGB => (ColorSpace::Rgb, "NSRGB"),
        CALIBRATED_WHITE | DEVICE_WHITE => (ColorSpace::Gray, "NSWhite"),
        DEVICE_CMYK => (ColorSpace::Cmyk, "NSCMYK"),
        other => {
            return Err(PaletteError::UnsupportedColorSpace(format!(
                "NSColorSpace {other}"
            )))
        }
    };

    let text = archive
        .resolve(dict, key)?
        .and_then(PlistValue::as_data)
        .ok_or_else(|| PaletteError::UnsupportedStructure(format!("NSColor without {key}")))?;
    let mut values = parse_components(text)?;

    let arity = space.arity();
    if values.len() < arity || values.len() > arity + 1 {
        return Err(PaletteError::InvalidComponentCount {
            space,
            expected: arity,
            found: values.len(),
        });
    }
    let alpha = if values.len() > arity { values.pop() } else { None };

    let color = Color::create(space, values, None, ColorType::Normal)?;
    match alpha {
        Some(alpha) => color.with_alpha(alpha),
        None => Ok(color),
    }
}

fn color_dictionary(builder: &mut ArchiveBuilder, color: &Color) -> PlistDictionary {
    let (code, key) = match color.space() {
        ColorSpace::Gray => (CALIBRATED_WHITE, "NSWhite"),
        ColorSpace::Cmyk => (DEVICE_CMYK, "NSCMYK"),
        _ => (CALIBRATED_RGB, "NSRGB"),
    };

    let mut values: Vec<String> = color.components().iter().map(|c| c.to_string()).collect();
    if color.alpha() < 1.0 {
        values.push(color.alpha().to_string());
    }
    let mut text = values.join(" ").into_bytes();
    text.push(0);

    let mut dict = PlistDictionary::new();
    dict.set("NSColorSpace", code);
    dict.set(key, PlistValue::Data(text));
    dict.set("$class", PlistValue::Uid(builder.class(COLOR_CLASS, &["NSObject"])));
    dict
}

/// Parses `"0.5 0.25 1\0"` style component strings.
fn parse_components(text: &[u8]) -> Result<Vec<f32>> {
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let text = std::str::from_utf8(&text[..end])
        .map_err(|_| PaletteError::EncodingError("NSColor component string is not ASCII".to_string()))?;
    text.split_ascii_whitespace()
        .map(|token| {
            token.parse::<f32>().map_err(|_| {
                PaletteError::UnsupportedStructure(format!("bad NSColor component {token:?}"))
            })
        })
        .collect()
}
