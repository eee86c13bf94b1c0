//! Byte-level plumbing shared by the binary coders.

mod reader;
mod writer;

pub use reader::ByteReader;
pub use writer::{utf16_len_with_nul, ByteWriter};
