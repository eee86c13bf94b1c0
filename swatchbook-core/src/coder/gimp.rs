//! GIMP palette (`.gpl`)
//!
//! ```text
//! GIMP Palette
//! Name: Mona
//! Columns: 6
//! #
//!  12  34 255	Deep blue
//! ```

use super::{ensure_no_global_colors, ensure_space, Format, PaletteCoder, ParseOptions};
use crate::color::{Color, ColorSpace};
use crate::error::{PaletteError, Result};
use crate::palette::Palette;

const HEADER: &str = "GIMP Palette";

#[derive(Debug, Clone, Copy, Default)]
pub struct GimpCoder {
    options: ParseOptions,
}

impl GimpCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl PaletteCoder for GimpCoder {
    fn format(&self) -> Format {
        Format::Gimp
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        let text = decode_text(data, Format::Gimp)?;
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        match lines.next() {
            Some((_, HEADER)) => {}
            _ => {
                return Err(PaletteError::UnrecognizedFormat(format!(
                    "missing \"{HEADER}\" header"
                )))
            }
        }

        let mut palette = Palette::new();
        for (line_number, line) in lines {
            if line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix("Name:") {
                let name = name.trim();
                palette.set_name((!name.is_empty()).then(|| name.to_string()));
                continue;
            }
            if line.starts_with("Columns:") {
                continue;
            }

            match parse_color_line(line) {
                Ok(color) => {
                    self.options
                        .check_count(palette.colors().len() + 1, "GIMP colors")?;
                    palette.push_color(color);
                }
                Err(message) if self.options.strict => {
                    return Err(PaletteError::MalformedLine {
                        line: line_number,
                        message,
                    })
                }
                Err(message) => {
                    tracing::warn!(line = line_number, %message, "skipping malformed GIMP palette line");
                }
            }
        }

        tracing::debug!(colors = palette.colors().len(), "decoded GIMP palette");
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        ensure_no_global_colors(palette, Format::Gimp)?;

        let mut out = String::new();
        out.push_str(HEADER);
        out.push('\n');
        if let Some(name) = palette.name() {
            out.push_str(&format!("Name: {name}\n"));
        }
        out.push_str("#\n");

        let mut count = 0;
        for color in palette.all_colors() {
            ensure_space(color, &[ColorSpace::Rgb], Format::Gimp)?;
            let [r, g, b] = color.rgb_bytes();
            out.push_str(&format!("{r:>3} {g:>3} {b:>3}"));
            if let Some(name) = color.name() {
                out.push('\t');
                out.push_str(name);
            }
            out.push('\n');
            count += 1;
        }

        tracing::debug!(colors = count, "encoded GIMP palette");
        Ok(out.into_bytes())
    }
}

/// UTF-8 text of a line-oriented format, without a byte order mark.
pub(crate) fn decode_text(data: &[u8], format: Format) -> Result<&str> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    std::str::from_utf8(data)
        .map_err(|e| PaletteError::EncodingError(format!("{format} is not valid UTF-8: {e}")))
}

/// Splits the first whitespace-delimited token off `text`.
pub(crate) fn next_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some((&text[..end], text[end..].trim_start()))
}

/// Parses `R G B [name]`; the error is a human-readable reason.
fn parse_color_line(line: &str) -> std::result::Result<Color, String> {
    let mut rest = line;
    let mut channels = [0u8; 3];
    for channel in channels.iter_mut() {
        let (token, tail) = next_token(rest)
            .ok_or_else(|| format!("expected three channel values in {line:?}"))?;
        *channel = token
            .parse::<u8>()
            .map_err(|_| format!("channel value {token:?} is not in 0..=255"))?;
        rest = tail;
    }

    let [r, g, b] = channels;
    let mut color = Color::from_rgb_bytes(r, g, b);
    let name = rest.trim();
    if !name.is_empty() {
        color = color.with_name(name);
    }
    Ok(color)
}
