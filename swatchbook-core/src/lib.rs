//! # swatchbook
//!
//! Read and write color palettes and gradients in the file formats used by
//! design tools, with one in-memory model shared by every format.
//!
//! ## Features
//!
//! - **Color model**: RGB, CMYK, Gray and L*a*b* colors with validated components, names and usage types
//! - **Palettes**: ungrouped colors, named groups and a global color pool
//! - **Gradients**: positioned color stops with sorting, normalization and JSON serialization
//! - **Binary formats**: Adobe Swatch Exchange (`.ase`), Adobe Color Swatch (`.aco`), Apple Color List (`.clr`)
//! - **Text formats**: GIMP (`.gpl`), JASC / PaintShop Pro (`.pal`), hex lists (`.hex`, `.rgb`, `.rgba`)
//! - **JSON**: a structured document that keeps every palette field
//! - **Strict or lenient parsing**: reject or skip anything a format does not define
//!
//! ## Quick Start
//!
//! ### Building and encoding a palette
//!
//! ```rust
//! use swatchbook::coder::{self, PaletteCoder};
//! use swatchbook::{Color, ColorType, Group, Palette, Result};
//!
//! # fn main() -> Result<()> {
//! let mut palette = Palette::new();
//! palette.push_color(Color::rgb(0.9, 0.1, 0.1)?.with_name("Signal"));
//! palette.push_group(Group::new(
//!     "Print",
//!     vec![Color::cmyk(0.0, 0.6, 1.0, 0.0)?.with_color_type(ColorType::Spot)],
//! ));
//!
//! let ase = coder::coder_for("ase")?;
//! let bytes = ase.data(&palette)?;
//! assert_eq!(ase.load(&bytes)?, palette);
//! # Ok(())
//! # }
//! ```
//!
//! ### Loading a file
//!
//! ```rust,no_run
//! use swatchbook::coder;
//!
//! # fn main() -> swatchbook::Result<()> {
//! let palette = coder::load_file("Material.aco")?;
//! for color in palette.all_colors() {
//!     println!("{} {}", color.hex_rgb(), color.name().unwrap_or("-"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Gradients
//!
//! ```rust
//! use swatchbook::{Color, Gradient, Result};
//!
//! # fn main() -> Result<()> {
//! let gradient = Gradient::from_colors_with_positions(
//!     vec![Color::from_hex("#ffffff", false)?, Color::from_hex("#000000", false)?],
//!     &[80.0, 20.0],
//! )?;
//! let normalized = gradient.normalized()?;
//! assert_eq!(normalized.stops[0].position, 0.0);
//! assert_eq!(normalized.stops[0].color.hex_rgb(), "#000000");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`color`] - Color values, hex strings and RGB conversion
//! - [`palette`] - Palette and group containers
//! - [`gradient`] - Gradients and stops
//! - [`coder`] - Format registry, parse options and one coder per format
//! - [`binary`] - Bounds-checked big-endian cursors shared by the binary coders
//! - [`plist`] - Binary property lists and keyed archives, used by the `.clr` coder
//! - [`error`] - Error type for every fallible operation

pub mod binary;
pub mod coder;
pub mod color;
pub mod error;
pub mod gradient;
pub mod palette;
pub mod plist;

pub use coder::{Coder, Format, PaletteCoder, ParseOptions};
pub use color::{Color, ColorSpace, ColorType};
pub use error::{PaletteError, Result};
pub use gradient::{Gradient, Stop};
pub use palette::{Group, GroupId, Palette};

/// Current version of swatchbook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
