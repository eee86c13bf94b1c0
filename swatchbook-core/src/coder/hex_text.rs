//! Hex text palettes (`.hex`, `.rgb`, `.rgba`)
//!
//! One color per line as `#RRGGBB` or `#RRGGBBAA`, optionally followed by a
//! name. Lines starting with `;` are comments; `; Name: ...` names the
//! palette.

use super::gimp::{decode_text, next_token};
use super::{ensure_no_global_colors, ensure_space, Format, PaletteCoder, ParseOptions};
use crate::color::{Color, ColorSpace};
use crate::error::{PaletteError, Result};
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, Default)]
pub struct HexTextCoder {
    options: ParseOptions,
}

impl HexTextCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl PaletteCoder for HexTextCoder {
    fn format(&self) -> Format {
        Format::HexText
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        let text = decode_text(data, Format::HexText)?;
        let mut palette = Palette::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix(';') {
                if let Some(name) = comment.trim().strip_prefix("Name:") {
                    let name = name.trim();
                    palette.set_name((!name.is_empty()).then(|| name.to_string()));
                }
                continue;
            }

            let Some((hex, name)) = next_token(line) else {
                continue;
            };
            match Color::from_hex(hex, true) {
                Ok(color) => {
                    self.options
                        .check_count(palette.colors().len() + 1, "hex colors")?;
                    let color = if name.is_empty() {
                        color
                    } else {
                        color.with_name(name)
                    };
                    palette.push_color(color);
                }
                Err(e) if self.options.strict => {
                    return Err(PaletteError::MalformedLine {
                        line: index + 1,
                        message: e.to_string(),
                    })
                }
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "skipping malformed hex palette line");
                }
            }
        }

        tracing::debug!(colors = palette.colors().len(), "decoded hex palette");
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::HexText)?;

        let mut out = String::new();
        if let Some(name) = palette.name() {
            out.push_str(&format!("; Name: {name}\n"));
        }

        let mut count = 0;
        for color in palette.all_colors() {
            ensure_space(color, &[ColorSpace::Rgb], Format::HexText)?;
            if color.alpha() < 1.0 {
                out.push_str(&color.hex_rgba());
            } else {
                out.push_str(&color.hex_rgb());
            }
            if let Some(name) = color.name() {
                out.push(' ');
                out.push_str(name);
            }
            out.push('\n');
            count += 1;
        }

        tracing::debug!(colors = count, "encoded hex palette");
        Ok(out.into_bytes())
    }
}
