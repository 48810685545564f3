//! Checksums and the boundary to the external DEFLATE engine.

pub mod crc32;
#[cfg(feature = "flate2")]
pub mod flate;
pub mod options;

pub use crc32::{crc32, Crc32};
#[cfg(feature = "flate2")]
pub use flate::Flate2Compressor;
pub use options::{CompressOptions, Compressor};
