//! Helpers for using compression/decompression.
//!
//! Feed documents can be large, so decompression happens while writing: compressed chunks go
//! into a [`DecompressingWriter`], which forwards the uncompressed data to its inner writer.

mod detecting;
mod limit;
mod writer;

pub use detecting::*;
pub use limit::*;
pub use writer::*;
