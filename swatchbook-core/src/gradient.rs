//! Color gradients
//!
//! A [`Gradient`] keeps its stops in the order they were supplied. Use
//! [`Gradient::sorted`] or [`Gradient::normalized`] for position-ordered views.

use crate::color::Color;
use crate::error::{PaletteError, Result};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};

/// A (position, color) pair within a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub position: f64,
    pub color: Color,
}

impl Stop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Absent and empty names are distinct, so the field is omitted rather
    /// than written as `""` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub stops: Vec<Stop>,
}

impl Gradient {
    /// Spreads `colors` evenly over 0.0..=1.0 in the given order.
    pub fn from_colors(colors: Vec<Color>) -> Self {
        let positions = even_positions(colors.len());
        Self::from_stops(positions.into_iter().zip(colors).collect())
    }

    /// Pairs each color with the position at the same index.
    pub fn from_colors_with_positions(colors: Vec<Color>, positions: &[f64]) -> Result<Self> {
        if colors.len() != positions.len() {
            return Err(PaletteError::MismatchedStops {
                colors: colors.len(),
                positions: positions.len(),
            });
        }
        Ok(Self::from_stops(
            positions.iter().copied().zip(colors).collect(),
        ))
    }

    /// Stores the stops exactly as given.
    pub fn from_stops(stops: Vec<(f64, Color)>) -> Self {
        Self {
            name: None,
            stops: stops
                .into_iter()
                .map(|(position, color)| Stop::new(position, color))
                .collect(),
        }
    }

    /// Builds an evenly spaced gradient from the palette's ungrouped colors.
    pub fn from_palette(palette: &Palette) -> Self {
        let mut gradient = Self::from_colors(palette.colors().to_vec());
        gradient.name = palette.name().map(str::to_string);
        gradient
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in ascending position; equal positions keep their input order.
    pub fn sorted(&self) -> Gradient {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Gradient {
            name: self.name.clone(),
            stops,
        }
    }

    /// Sorts the stops and rescales positions so the lowest maps to 0.0 and
    /// the highest to 1.0.
    ///
    /// Fails with [`PaletteError::DegenerateRange`] when there are no stops,
    /// all positions are equal, or any position is NaN or infinite.
    pub fn normalized(&self) -> Result<Gradient> {
        if let Some(stop) = self.stops.iter().find(|stop| !stop.position.is_finite()) {
            return Err(PaletteError::DegenerateRange(stop.position));
        }
        let (min, max) = self
            .position_bounds()
            .ok_or(PaletteError::DegenerateRange(0.0))?;
        let span = max - min;
        if span == 0.0 || !span.is_finite() {
            return Err(PaletteError::DegenerateRange(min));
        }

        let mut gradient = self.sorted();
        for stop in &mut gradient.stops {
            stop.position = (stop.position - min) / span;
        }
        Ok(gradient)
    }

    /// Mirrors a normalized copy of the gradient, so 0.0 becomes 1.0.
    pub fn reversed(&self) -> Result<Gradient> {
        let mut gradient = self.normalized()?;
        for stop in &mut gradient.stops {
            stop.position = 1.0 - stop.position;
        }
        gradient.stops.reverse();
        Ok(gradient)
    }

    /// A palette holding the stop colors in position order.
    pub fn to_palette(&self) -> Palette {
        let mut palette = match &self.name {
            Some(name) => Palette::named(name.clone()),
            None => Palette::new(),
        };
        for stop in self.sorted().stops {
            palette.push_color(stop.color);
        }
        palette
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    fn position_bounds(&self) -> Option<(f64, f64)> {
        let mut positions = self.stops.iter().map(|stop| stop.position);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

fn even_positions(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (count - 1) as f64;
            (0..count).map(|i| i as f64 / last).collect()
        }
    }
}
