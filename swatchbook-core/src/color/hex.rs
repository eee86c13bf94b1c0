use super::{Color, ColorSpace};
use crate::error::{PaletteError, Result};

impl Color {
    /// Parses `#RRGGBB`, or `#RRGGBBAA` when `includes_alpha` is set.
    ///
    /// The leading `#` is optional and digits are case-insensitive. The result
    /// is always an RGB color; a trailing alpha pair becomes the color's alpha.
    pub fn from_hex(hex: &str, includes_alpha: bool) -> Result<Self> {
        let malformed = || PaletteError::MalformedHexString(hex.to_string());

        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let bytes = match digits.len() {
            6 => parse_pairs(digits),
            8 if includes_alpha => parse_pairs(digits),
            _ => return Err(malformed()),
        }
        .ok_or_else(malformed)?;

        let color = Color::rgb(
            channel(bytes[0]),
            channel(bytes[1]),
            channel(bytes[2]),
        )?;
        match bytes.get(3) {
            Some(&alpha) => color.with_alpha(channel(alpha)),
            None => Ok(color),
        }
    }

    /// Lowercase `#rrggbb`, converting to RGB first when needed.
    pub fn hex_rgb(&self) -> String {
        let [r, g, b] = self.rgb_components().map(to_byte);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Lowercase `#rrggbbaa`, converting to RGB first when needed.
    pub fn hex_rgba(&self) -> String {
        format!("{}{:02x}", self.hex_rgb(), to_byte(self.alpha))
    }

    /// RGB bytes in 0..=255, as the 8-bit text formats store them.
    pub fn rgb_bytes(&self) -> [u8; 3] {
        self.rgb_components().map(to_byte)
    }

    /// Builds an RGB color from 8-bit channels.
    pub fn from_rgb_bytes(r: u8, g: u8, b: u8) -> Self {
        Color {
            space: ColorSpace::Rgb,
            components: vec![channel(r), channel(g), channel(b)],
            alpha: 1.0,
            name: None,
            color_type: Default::default(),
        }
    }
}

fn parse_pairs(digits: &str) -> Option<Vec<u8>> {
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

fn channel(byte: u8) -> f32 {
    byte as f32 / 255.0
}

pub(crate) fn to_byte(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}
