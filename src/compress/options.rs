//! Options and trait for the external DEFLATE engine.

use crate::error::{Error, Result};
use crate::format::Format;

/// Options forwarded to a zopfli-style compressor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    /// Number of optimization iterations (at least 1).
    pub iterations: u32,
    /// Split the input into multiple blocks when it pays off.
    pub block_splitting: bool,
    /// Upper bound on the number of block splits (at least 1).
    pub block_splitting_max: u32,
    /// Print progress from the compressor.
    pub verbose: bool,
    /// Print detailed per-block output from the compressor.
    pub verbose_more: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            iterations: 15,
            block_splitting: true,
            block_splitting_max: 15,
            verbose: false,
            verbose_more: false,
        }
    }
}

impl CompressOptions {
    /// Single iteration; useful while iterating on a bootstrap.
    pub fn fast() -> Self {
        Self {
            iterations: 1,
            ..Self::default()
        }
    }

    /// Same as the default.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Many iterations; slowest.
    pub fn max_compression() -> Self {
        Self {
            iterations: 100,
            ..Self::default()
        }
    }

    /// Reject values the compressor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidOptions(
                "iterations must be a positive integer".into(),
            ));
        }
        if self.block_splitting_max == 0 {
            return Err(Error::InvalidOptions(
                "block_splitting_max must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

/// A DEFLATE engine producing gzip, zlib or raw output.
///
/// Implementations are treated as black boxes; the rest of the crate only
/// relies on the output being a well-formed stream in the requested format.
pub trait Compressor {
    /// Compress `input` into `format`.
    fn compress(&self, input: &[u8], format: Format, options: &CompressOptions) -> Result<Vec<u8>>;
}

impl<F> Compressor for F
where
    F: Fn(&[u8], Format, &CompressOptions) -> Result<Vec<u8>>,
{
    fn compress(&self, input: &[u8], format: Format, options: &CompressOptions) -> Result<Vec<u8>> {
        self(input, format, options)
    }
}
