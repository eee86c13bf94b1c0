//! JASC / PaintShop Pro palette (`.pal`)
//!
//! ```text
//! JASC-PAL
//! 0100
//! 2
//! 255 0 0
//! 0 0 255
//! ```
//!
//! Lines are written with CRLF endings; either ending is accepted.

use super::gimp::{decode_text, next_token};
use super::{ensure_no_global_colors, ensure_space, Format, PaletteCoder, ParseOptions};
use crate::color::{Color, ColorSpace};
use crate::error::{PaletteError, Result};
use crate::palette::Palette;

const HEADER: &str = "JASC-PAL";
const VERSION: &str = "0100";

#[derive(Debug, Clone, Copy, Default)]
pub struct JascCoder {
    options: ParseOptions,
}

impl JascCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    fn malformed(&self, line: usize, message: String) -> Result<()> {
        if self.options.strict {
            Err(PaletteError::MalformedLine { line, message })
        } else {
            tracing::warn!(line, %message, "skipping malformed JASC palette line");
            Ok(())
        }
    }
}

impl PaletteCoder for JascCoder {
    fn format(&self) -> Format {
        Format::Jasc
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        let text = decode_text(data, Format::Jasc)?;
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        if !matches!(lines.next(), Some((_, HEADER))) {
            return Err(PaletteError::UnrecognizedFormat(format!(
                "missing \"{HEADER}\" header"
            )));
        }
        match lines.next() {
            Some((_, VERSION)) => {}
            Some((_, other)) => {
                return Err(PaletteError::UnsupportedVersion(format!("JASC-PAL {other}")))
            }
            None => {
                return Err(PaletteError::TruncatedData {
                    offset: data.len(),
                    needed: 1,
                    available: 0,
                })
            }
        }

        let (count_line, count) = match lines.next() {
            Some((line, text)) => (line, text),
            None => {
                return Err(PaletteError::TruncatedData {
                    offset: data.len(),
                    needed: 1,
                    available: 0,
                })
            }
        };
        let count = count.parse::<usize>().map_err(|_| PaletteError::MalformedLine {
            line: count_line,
            message: format!("color count {count:?} is not a number"),
        })?;
        self.options.check_count(count, "JASC colors")?;

        let mut palette = Palette::new();
        let mut seen = 0;
        while seen < count {
            let Some((line_number, line)) = lines.next() else {
                break;
            };
            seen += 1;
            match parse_color_line(line) {
                Ok(color) => palette.push_color(color),
                Err(message) => self.malformed(line_number, message)?,
            }
        }

        if seen < count {
            if self.options.strict {
                return Err(PaletteError::TruncatedData {
                    offset: data.len(),
                    needed: count,
                    available: seen,
                });
            }
            tracing::warn!(declared = count, found = seen, "JASC palette has fewer colors than declared");
        }

        if let Some((line_number, _)) = lines.next() {
            self.malformed(
                line_number,
                format!("unexpected line after {count} declared colors"),
            )?;
        }

        tracing::debug!(colors = palette.colors().len(), "decoded JASC palette");
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::Jasc)?;

        let colors: Vec<&Color> = palette.all_colors().collect();
        let mut out = format!("{HEADER}\r\n{VERSION}\r\n{}\r\n", colors.len());
        for color in &colors {
            ensure_space(color, &[ColorSpace::Rgb], Format::Jasc)?;
            let [r, g, b] = color.rgb_bytes();
            out.push_str(&format!("{r} {g} {b}\r\n"));
        }

        tracing::debug!(colors = colors.len(), "encoded JASC palette");
        Ok(out.into_bytes())
    }
}

fn parse_color_line(line: &str) -> std::result::Result<Color, String> {
    let mut rest = line;
    let mut channels = [0u8; 3];
    for channel in channels.iter_mut() {
        let (token, tail) =
            next_token(rest).ok_or_else(|| format!("expected three channel values in {line:?}"))?;
        *channel = token
            .parse::<u8>()
            .map_err(|_| format!("channel value {token:?} is not in 0..=255"))?;
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(format!("unexpected {rest:?} after channel values"));
    }

    let [r, g, b] = channels;
    Ok(Color::from_rgb_bytes(r, g, b))
}
