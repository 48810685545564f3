//! # polypack
//!
//! Build files that are two things at once: a ZIP archive or PNG image, and
//! an HTML document that runs a trailing bootstrap script.
//!
//! ## Features
//!
//! - **ZIP**: single-entry archives with byte-exact headers
//! - **PNG**: one-row grayscale images whose bytes double as an HTML prefix
//! - **Overlap analysis**: an HTML5 tokenizer model that finds where the
//!   bootstrap can take over from the container bytes
//! - **DEFLATE inspection**: per-block, per-symbol bit costs of gzip, zlib
//!   or raw streams
//!
//! Compression itself is pluggable through [`compress::Compressor`]; the
//! `flate2` feature provides a ready-made implementation.
//!
//! ## Example
//!
//! ```rust
//! use polypack::{decode, html, png, Format};
//!
//! // Stored-block zlib stream holding a single filtered row `00 41`
//! let idat = [0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, 0x00, 0x41, 0x00, 0x43, 0x00, 0x42];
//! let file = png::build_png(1, &idat, b"<script>alert(1)</script>").unwrap();
//! assert!(file.starts_with(&png::PNG_SIGNATURE));
//! assert!(file.ends_with(b"</script>"));
//!
//! let blocks = decode::inspect(Format::Zlib, &idat).unwrap();
//! assert_eq!(blocks[0].produced(), [0x00, 0x41]);
//!
//! let overlap = html::overlap_or_close(b"text <p", b"<p>hi").unwrap();
//! assert_eq!(overlap, html::Overlap::Reuse(2));
//! ```

#![cfg_attr(not(feature = "wasm"), forbid(unsafe_code))]
#![warn(missing_docs)]

pub mod compress;
pub mod decode;
pub mod error;
pub mod format;
pub mod html;
pub mod png;
#[cfg(feature = "wasm")]
pub mod wasm;
pub mod zip;

pub use error::{Error, Result};
pub use format::Format;
