//! Polyglot PNG writer.
//!
//! The image is a single row of 8-bit grayscale pixels. Its IDAT chunk
//! claims more bytes than the compressed stream holds and loses its CRC, so
//! everything after the stream, including the HTML bootstrap, reads to an
//! image decoder as unused trailing data. No IEND chunk is written.

pub mod chunk;
pub mod filter;

use crate::compress::{CompressOptions, Compressor};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::html::{self, Overlap};

pub use filter::FilterType;

/// PNG file signature (magic bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Slack added to the declared IDAT length beyond payload and bootstrap.
const IDAT_OVERSHOOT: usize = 3;

/// Build the IHDR payload for a `width` x 1 grayscale image.
fn ihdr(width: u32) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&width.to_be_bytes());
    data[4..8].copy_from_slice(&1u32.to_be_bytes()); // height
    data[8] = 8; // bit depth
    data[9] = 0; // color type: grayscale
    data[10] = 0; // compression method
    data[11] = 0; // filter method
    data[12] = 0; // interlace: none
    data
}

/// Image bytes up to the end of the compressed stream, without a bootstrap.
fn image_prefix(width: u32, deflated: &[u8], bootstrap_len: usize) -> Result<Vec<u8>> {
    if width == 0 || width > i32::MAX as u32 {
        return Err(Error::InvalidWidth(width));
    }
    let declared = deflated.len() + bootstrap_len + IDAT_OVERSHOOT;
    let declared = u32::try_from(declared)
        .ok()
        .filter(|&len| len <= i32::MAX as u32)
        .ok_or(Error::PayloadTooLarge {
            what: "IDAT chunk",
            len: declared,
            max: i32::MAX as usize,
        })?;

    let mut out = Vec::with_capacity(8 + 25 + 8 + deflated.len() + bootstrap_len + IDAT_OVERSHOOT);
    out.extend_from_slice(&PNG_SIGNATURE);
    chunk::write_chunk(&mut out, b"IHDR", &ihdr(width));
    chunk::write_open_chunk(&mut out, b"IDAT", declared, deflated);
    Ok(out)
}

/// Build a PNG that is also an HTML document running `bootstrap`.
///
/// `deflated` is the zlib stream of the filtered scanline (see
/// [`compress_idat`]). `bootstrap` must start with `<`.
pub fn build_png(width: u32, deflated: &[u8], bootstrap: &[u8]) -> Result<Vec<u8>> {
    build_png_with_overlap(width, deflated, bootstrap).map(|(png, _)| png)
}

/// Same as [`build_png`], also reporting how the bootstrap was attached.
pub fn build_png_with_overlap(
    width: u32,
    deflated: &[u8],
    bootstrap: &[u8],
) -> Result<(Vec<u8>, Overlap)> {
    if bootstrap.first() != Some(&b'<') {
        return Err(Error::InvalidBootstrap);
    }
    let mut out = image_prefix(width, deflated, bootstrap.len())?;
    let overlap = html::splice(&mut out, bootstrap)?;
    Ok((out, overlap))
}

/// Best compressed scanline found by [`compress_idat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdatCandidate {
    /// Image width, the input length.
    pub width: u32,
    /// Filter that produced the smallest stream.
    pub filter: FilterType,
    /// zlib stream for the IDAT chunk.
    pub compressed: Vec<u8>,
}

/// Store `input` as one row of grayscale pixels, trying every filter and
/// keeping the smallest zlib stream. Ties keep the earlier filter.
pub fn compress_idat<C: Compressor + ?Sized>(
    compressor: &C,
    input: &[u8],
    options: &CompressOptions,
) -> Result<IdatCandidate> {
    if input.is_empty() {
        return Err(Error::EmptyPayload);
    }
    options.validate()?;
    let width = u32::try_from(input.len()).map_err(|_| Error::PayloadTooLarge {
        what: "scanline",
        len: input.len(),
        max: u32::MAX as usize,
    })?;

    let mut best: Option<IdatCandidate> = None;
    for filter in FilterType::ALL {
        let filtered = filter::filter_row(input, filter);
        let compressed = compressor.compress(&filtered, Format::Zlib, options)?;
        if best
            .as_ref()
            .map_or(true, |b| compressed.len() < b.compressed.len())
        {
            best = Some(IdatCandidate {
                width,
                filter,
                compressed,
            });
        }
    }
    best.ok_or(Error::EmptyPayload)
}
