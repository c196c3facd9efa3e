//! octascan-io: memory-mapped loading of OCT scan files.
//!
//! A scan file is a flat little-endian f64 sample stream whose dimensions
//! are encoded in the file name (`X<n> Y<n> Z<n>`).
//!

pub mod error;
pub mod reader;

pub use error::{Error, Result};
pub use reader::ScanFile;
