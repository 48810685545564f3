//! [`Compressor`] backed by `flate2`.
//!
//! Stands in for a zopfli engine: the output is valid but not golfed.
//! `iterations` picks the flate2 level (1 is fastest, 9 and up is best);
//! flate2 has no block splitting control, so those options only matter to
//! an external engine.

use std::io::Write;

use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;

use super::options::{CompressOptions, Compressor};
use crate::error::{Error, Result};
use crate::format::Format;

/// Compressor using `flate2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flate2Compressor;

impl Flate2Compressor {
    /// flate2 level used for `options`.
    pub fn level(options: &CompressOptions) -> Compression {
        Compression::new(options.iterations.clamp(1, 9))
    }

    fn finish<W: Write>(mut encoder: W, input: &[u8]) -> Result<W> {
        encoder
            .write_all(input)
            .map_err(|e| Error::CompressionError(e.to_string()))?;
        Ok(encoder)
    }
}

impl Compressor for Flate2Compressor {
    fn compress(&self, input: &[u8], format: Format, options: &CompressOptions) -> Result<Vec<u8>> {
        options.validate()?;
        let level = Self::level(options);
        let out = match format {
            Format::Gzip => {
                Self::finish(GzEncoder::new(Vec::new(), level), input)?.finish()
            }
            Format::Zlib => {
                Self::finish(ZlibEncoder::new(Vec::new(), level), input)?.finish()
            }
            Format::Raw => {
                Self::finish(DeflateEncoder::new(Vec::new(), level), input)?.finish()
            }
        };
        out.map_err(|e| Error::CompressionError(e.to_string()))
    }
}
