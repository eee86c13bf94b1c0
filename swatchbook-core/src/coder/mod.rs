//! Palette coders
//!
//! Every supported file format has one coder implementing [`PaletteCoder`].
//! The set is closed: [`Format`] names the formats and [`Coder`] dispatches
//! to the concrete implementation with an exhaustive `match`. A process-wide
//! registry maps format identifiers (file extensions) to formats.
//!
//! ```rust,no_run
//! use swatchbook::coder::{self, PaletteCoder};
//! use std::path::Path;
//!
//! # fn main() -> swatchbook::Result<()> {
//! let path = Path::new("swatches.ase");
//! let palette = coder::coder_for_path(path)?.load_file(path)?;
//!
//! let gpl = coder::coder_for("gpl")?.data(&palette)?;
//! # let _ = gpl;
//! # Ok(())
//! # }
//! ```

pub mod aco;
pub mod ase;
pub mod clr;
pub mod gimp;
pub mod hex_text;
pub mod jasc;
pub mod json;

pub use self::aco::AcoCoder;
pub use self::ase::AseCoder;
pub use self::clr::ClrCoder;
pub use self::gimp::GimpCoder;
pub use self::hex_text::HexTextCoder;
pub use self::jasc::JascCoder;
pub use self::json::JsonCoder;

use crate::color::{Color, ColorSpace};
use crate::error::{PaletteError, Result};
use crate::palette::Palette;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Options controlling how tolerant decoding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject anything the format does not define instead of skipping it
    pub strict: bool,
    /// Upper bound for any declared entry count, checked before allocating
    pub max_entries: usize,
    /// Accept bytes after the last block of a binary file
    pub allow_trailing_data: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::strict()
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            max_entries: 65_536,
            allow_trailing_data: false,
        }
    }

    /// Skips unknown blocks, malformed lines and trailing data with a warning.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            max_entries: 65_536,
            allow_trailing_data: true,
        }
    }

    pub(crate) fn check_count(&self, count: usize, what: &str) -> Result<()> {
        if count > self.max_entries {
            return Err(PaletteError::UnsupportedStructure(format!(
                "{count} {what} exceeds the limit of {}",
                self.max_entries
            )));
        }
        Ok(())
    }

    /// Handles bytes left over after the last block of a binary format.
    pub(crate) fn check_trailing(&self, format: Format, remaining: usize, offset: usize) -> Result<()> {
        if remaining == 0 {
            return Ok(());
        }
        if self.allow_trailing_data {
            tracing::warn!(%format, remaining, offset, "ignoring trailing data");
            Ok(())
        } else {
            Err(PaletteError::UnrecognizedFormat(format!(
                "{remaining} unexpected bytes after the last {format} block at offset {offset}"
            )))
        }
    }
}

/// The closed set of supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Adobe Swatch Exchange
    Ase,
    /// Adobe Color Swatch
    Aco,
    /// Apple Color List
    Clr,
    /// GIMP palette
    Gimp,
    /// JASC / PaintShop Pro palette
    Jasc,
    /// One hex color per line
    HexText,
    /// Structured JSON palette document
    Json,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Ase,
        Format::Aco,
        Format::Clr,
        Format::Gimp,
        Format::Jasc,
        Format::HexText,
        Format::Json,
    ];

    /// Registry identifiers for this format; the first is the preferred file extension.
    pub fn identifiers(&self) -> &'static [&'static str] {
        match self {
            Format::Ase => &["ase"],
            Format::Aco => &["aco"],
            Format::Clr => &["clr"],
            Format::Gimp => &["gpl"],
            Format::Jasc => &["pal", "psppalette"],
            Format::HexText => &["hex", "rgb", "rgba"],
            Format::Json => &["json", "jsoncolorpalette"],
        }
    }

    pub fn extension(&self) -> &'static str {
        self.identifiers()[0]
    }

    /// Whether the format keeps groups rather than flattening them.
    pub fn supports_groups(&self) -> bool {
        matches!(self, Format::Ase | Format::Json)
    }

    /// A coder for this format with default options.
    pub fn coder(&self) -> Coder {
        self.coder_with_options(ParseOptions::default())
    }

    pub fn coder_with_options(&self, options: ParseOptions) -> Coder {
        match self {
            Format::Ase => Coder::Ase(AseCoder::with_options(options)),
            Format::Aco => Coder::Aco(AcoCoder::with_options(options)),
            Format::Clr => Coder::Clr(ClrCoder::with_options(options)),
            Format::Gimp => Coder::Gimp(GimpCoder::with_options(options)),
            Format::Jasc => Coder::Jasc(JascCoder::with_options(options)),
            Format::HexText => Coder::HexText(HexTextCoder::with_options(options)),
            Format::Json => Coder::Json(JsonCoder::with_options(options)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Ase => "Adobe Swatch Exchange",
            Format::Aco => "Adobe Color Swatch",
            Format::Clr => "Apple Color List",
            Format::Gimp => "GIMP palette",
            Format::Jasc => "JASC palette",
            Format::HexText => "hex text palette",
            Format::Json => "JSON palette",
        };
        f.write_str(name)
    }
}

/// Decode/encode contract shared by every format.
pub trait PaletteCoder {
    fn format(&self) -> Format;

    /// Decodes a palette from an in-memory buffer.
    fn load(&self, data: &[u8]) -> Result<Palette>;

    /// Reads the whole file and decodes it.
    fn load_file(&self, path: &Path) -> Result<Palette> {
        let data = std::fs::read(path).map_err(|source| PaletteError::FileNotReadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&data)
    }

    /// Encodes a palette into the format's bytes.
    fn data(&self, palette: &Palette) -> Result<Vec<u8>>;
}

/// One of the concrete coders.
#[derive(Debug, Clone, Copy)]
pub enum Coder {
    Ase(AseCoder),
    Aco(AcoCoder),
    Clr(ClrCoder),
    Gimp(GimpCoder),
    Jasc(JascCoder),
    HexText(HexTextCoder),
    Json(JsonCoder),
}

impl PaletteCoder for Coder {
    fn format(&self) -> Format {
        match self {
            Coder::Ase(coder) => coder.format(),
            Coder::Aco(coder) => coder.format(),
            Coder::Clr(coder) => coder.format(),
            Coder::Gimp(coder) => coder.format(),
            Coder::Jasc(coder) => coder.format(),
            Coder::HexText(coder) => coder.format(),
            Coder::Json(coder) => coder.format(),
        }
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        match self {
            Coder::Ase(coder) => coder.load(data),
            Coder::Aco(coder) => coder.load(data),
            Coder::Clr(coder) => coder.load(data),
            Coder::Gimp(coder) => coder.load(data),
            Coder::Jasc(coder) => coder.load(data),
            Coder::HexText(coder) => coder.load(data),
            Coder::Json(coder) => coder.load(data),
        }
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        match self {
            Coder::Ase(coder) => coder.data(palette),
            Coder::Aco(coder) => coder.data(palette),
            Coder::Clr(coder) => coder.data(palette),
            Coder::Gimp(coder) => coder.data(palette),
            Coder::Jasc(coder) => coder.data(palette),
            Coder::HexText(coder) => coder.data(palette),
            Coder::Json(coder) => coder.data(palette),
        }
    }
}

lazy_static::lazy_static! {
    static ref REGISTRY: HashMap<&'static str, Format> = {
        let mut registry = HashMap::new();
        for format in Format::ALL {
            for identifier in format.identifiers() {
                registry.insert(*identifier, format);
            }
        }
        registry
    };
}

/// Looks up the coder for a format identifier such as `"ase"` or `".GPL"`.
pub fn coder_for(identifier: &str) -> Result<Coder> {
    let key = identifier.trim().trim_start_matches('.').to_ascii_lowercase();
    REGISTRY
        .get(key.as_str())
        .map(Format::coder)
        .ok_or_else(|| PaletteError::UnknownFormat(identifier.to_string()))
}

/// Looks up the coder for a path by its extension.
pub fn coder_for_path(path: &Path) -> Result<Coder> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| PaletteError::UnknownFormat(path.display().to_string()))?;
    coder_for(extension)
}

/// Every registered identifier with its format, sorted by identifier.
pub fn supported_formats() -> Vec<(&'static str, Format)> {
    let mut formats: Vec<_> = REGISTRY.iter().map(|(id, format)| (*id, *format)).collect();
    formats.sort_by_key(|(id, _)| *id);
    formats
}

/// Decodes a file using the coder registered for its extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<Palette> {
    let path = path.as_ref();
    coder_for_path(path)?.load_file(path)
}

/// Fails when a palette carries a global color pool the format cannot hold.
pub(crate) fn ensure_no_global_colors(palette: &Palette, format: Format) -> Result<()> {
    if palette.global_colors().is_empty() {
        Ok(())
    } else {
        Err(PaletteError::UnsupportedStructure(format!(
            "{format} has no global color pool ({} global colors)",
            palette.global_colors().len()
        )))
    }
}

/// Fails unless `color` is in one of the `allowed` spaces.
pub(crate) fn ensure_space(color: &Color, allowed: &[ColorSpace], format: Format) -> Result<()> {
    if allowed.contains(&color.space()) {
        Ok(())
    } else {
        Err(PaletteError::UnsupportedColorSpace(format!(
            "{format} cannot store {} colors",
            color.space()
        )))
    }
}
