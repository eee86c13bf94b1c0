//! Structured JSON palette documents (`.json`)
//!
//! The only format that keeps every field of a [`Palette`]: name, groups,
//! global colors, alpha and color types.
//!
//! ```json
//! {
//!   "name": "Brand",
//!   "colors": [
//!     { "name": "Ink", "colorSpace": "RGB", "components": [0.1, 0.1, 0.2], "colorType": "spot" }
//!   ],
//!   "groups": []
//! }
//! ```

use super::{Format, PaletteCoder, ParseOptions};
use crate::error::Result;
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCoder {
    options: ParseOptions,
}

impl JsonCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl PaletteCoder for JsonCoder {
    fn format(&self) -> Format {
        Format::Json
    }

    fn load(&self, data: &[u8]) -> Result<Palette> {
        let palette: Palette = serde_json::from_slice(data)?;
        self.options.check_count(
            palette.total_color_count() + palette.global_colors().len(),
            "JSON colors",
        )?;

        tracing::debug!(
            colors = palette.colors().len(),
            groups = palette.groups().len(),
            global_colors = palette.global_colors().len(),
            "decoded JSON palette"
        );
        Ok(palette)
    }

    fn data(&self, palette: &Palette) -> Result<Vec<u8>> {
        let data = serde_json::to_vec_pretty(palette)?;
        tracing::debug!(bytes = data.len(), "encoded JSON palette");
        Ok(data)
    }
}
