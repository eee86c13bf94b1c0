//! Color values
//!
//! A [`Color`] is a color space, a validated component vector, an optional
//! name and a usage type. Conversions only ever go *to* RGB, which is all the
//! hex helpers and the RGB-only formats need.

mod convert;
mod hex;

use crate::error::{PaletteError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dimensional model of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Red, green, blue in 0.0..=1.0
    #[serde(rename = "RGB")]
    Rgb,
    /// Cyan, magenta, yellow, key in 0.0..=1.0
    #[serde(rename = "CMYK")]
    Cmyk,
    /// A single luminance channel in 0.0..=1.0 (0.0 is black)
    #[serde(rename = "Gray")]
    Gray,
    /// CIE L*a*b*, L in 0..=100, a and b in -128..=128
    #[serde(rename = "LAB")]
    Lab,
}

impl ColorSpace {
    /// Number of components a color in this space carries.
    pub fn arity(&self) -> usize {
        match self {
            ColorSpace::Rgb | ColorSpace::Lab => 3,
            ColorSpace::Cmyk => 4,
            ColorSpace::Gray => 1,
        }
    }

    /// Inclusive legal range of the component at `index`.
    pub fn component_range(&self, index: usize) -> (f32, f32) {
        match (self, index) {
            (ColorSpace::Lab, 0) => (0.0, 100.0),
            (ColorSpace::Lab, _) => (-128.0, 128.0),
            _ => (0.0, 1.0),
        }
    }

    fn validate(&self, components: &[f32]) -> Result<()> {
        if components.len() != self.arity() {
            return Err(PaletteError::InvalidComponentCount {
                space: *self,
                expected: self.arity(),
                found: components.len(),
            });
        }

        for (index, &value) in components.iter().enumerate() {
            let (min, max) = self.component_range(index);
            // NaN fails both comparisons, so test for containment
            if !(min..=max).contains(&value) {
                return Err(PaletteError::InvalidComponentRange {
                    space: *self,
                    index,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Cmyk => "CMYK",
            ColorSpace::Gray => "Gray",
            ColorSpace::Lab => "LAB",
        };
        f.write_str(name)
    }
}

/// How a swatch is meant to be used by the application that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    /// Process color
    #[default]
    Normal,
    /// Spot (named ink) color
    Spot,
    /// Global color, edits propagate to every use
    Global,
}

/// A single color value.
///
/// Equality is structural: space, components, alpha, name and type are all
/// compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRecord", into = "ColorRecord")]
pub struct Color {
    space: ColorSpace,
    components: Vec<f32>,
    alpha: f32,
    name: Option<String>,
    color_type: ColorType,
}

impl Color {
    /// Creates a color, validating component count and range.
    pub fn new(space: ColorSpace, components: impl Into<Vec<f32>>) -> Result<Self> {
        let components = components.into();
        space.validate(&components)?;
        Ok(Self {
            space,
            components,
            alpha: 1.0,
            name: None,
            color_type: ColorType::Normal,
        })
    }

    /// Creates a color with every attribute supplied up front.
    pub fn create(
        space: ColorSpace,
        components: impl Into<Vec<f32>>,
        name: Option<String>,
        color_type: ColorType,
    ) -> Result<Self> {
        let mut color = Self::new(space, components)?;
        color.name = name;
        color.color_type = color_type;
        Ok(color)
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Result<Self> {
        Self::new(ColorSpace::Rgb, [r, g, b])
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Result<Self> {
        Self::rgb(r, g, b)?.with_alpha(a)
    }

    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Result<Self> {
        Self::new(ColorSpace::Cmyk, [c, m, y, k])
    }

    pub fn gray(value: f32) -> Result<Self> {
        Self::new(ColorSpace::Gray, [value])
    }

    pub fn lab(l: f32, a: f32, b: f32) -> Result<Self> {
        Self::new(ColorSpace::Lab, [l, a, b])
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color_type(mut self, color_type: ColorType) -> Self {
        self.color_type = color_type;
        self
    }

    /// Sets the alpha channel, which must lie in 0.0..=1.0.
    pub fn with_alpha(mut self, alpha: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(PaletteError::InvalidComponentRange {
                space: self.space,
                index: self.space.arity(),
                value: alpha,
            });
        }
        self.alpha = alpha;
        Ok(self)
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn components(&self) -> &[f32] {
        &self.components
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn set_color_type(&mut self, color_type: ColorType) {
        self.color_type = color_type;
    }

    /// The color expressed as clamped RGB components.
    pub fn rgb_components(&self) -> [f32; 3] {
        convert::to_rgb(self.space, &self.components)
    }

    /// Converts to an RGB color, keeping name, type and alpha.
    pub fn to_rgb(&self) -> Color {
        Color {
            space: ColorSpace::Rgb,
            components: self.rgb_components().to_vec(),
            alpha: self.alpha,
            name: self.name.clone(),
            color_type: self.color_type,
        }
    }
}

/// Serialized shape of a [`Color`]. Deserialization goes through
/// [`Color::create`] so invalid documents are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    color_space: ColorSpace,
    components: Vec<f32>,
    #[serde(default = "opaque", skip_serializing_if = "is_opaque")]
    alpha: f32,
    #[serde(default)]
    color_type: ColorType,
}

fn opaque() -> f32 {
    1.0
}

fn is_opaque(alpha: &f32) -> bool {
    *alpha == 1.0
}

impl TryFrom<ColorRecord> for Color {
    type Error = PaletteError;

    fn try_from(record: ColorRecord) -> Result<Self> {
        Color::create(
            record.color_space,
            record.components,
            record.name,
            record.color_type,
        )?
        .with_alpha(record.alpha)
    }
}

impl From<Color> for ColorRecord {
    fn from(color: Color) -> Self {
        ColorRecord {
            name: color.name,
            color_space: color.space,
            components: color.components,
            alpha: color.alpha,
            color_type: color.color_type,
        }
    }
}
