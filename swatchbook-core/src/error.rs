use crate::color::ColorSpace;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Invalid component count for {space}: expected {expected}, found {found}")]
    InvalidComponentCount {
        space: ColorSpace,
        expected: usize,
        found: usize,
    },

    #[error("Component {index} of {space} color is out of range: {value}")]
    InvalidComponentRange {
        space: ColorSpace,
        index: usize,
        value: f32,
    },

    #[error("Malformed hex color string: {0:?}")]
    MalformedHexString(String),

    #[error("Unrecognized format: {0}")]
    UnrecognizedFormat(String),

    #[error("Truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("Unable to read {}: {source}", path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No coder registered for format: {0:?}")]
    UnknownFormat(String),

    #[error("Unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    #[error("Unsupported palette structure: {0}")]
    UnsupportedStructure(String),

    #[error("Malformed line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("Gradient positions span a degenerate range at {0}")]
    DegenerateRange(f64),

    #[error("Gradient has {colors} colors but {positions} positions")]
    MismatchedStops { colors: usize, positions: usize },

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PaletteError {
    fn from(err: serde_json::Error) -> Self {
        PaletteError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PaletteError>;
