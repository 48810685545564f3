//! Error types for the polypack library.

use std::fmt;

/// Result type alias for polypack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building containers or inspecting streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// ZIP entry name is empty or uses characters outside `[0-9A-Za-z-._]`.
    InvalidFilename(String),
    /// Bootstrap code is empty or does not start with `<`.
    InvalidBootstrap,
    /// Container bytes would open a tag that changes how the browser
    /// tokenizes everything after it.
    ProblematicTag(String),
    /// The compressed stream ended before the decoder was done with it.
    TruncatedStream,
    /// A Huffman code did not match any symbol.
    InvalidHuffmanCode,
    /// DEFLATE block type 3 (reserved).
    UnsupportedBlockType(u8),
    /// gzip or zlib framing is malformed.
    BadContainerHeader(String),
    /// Dynamic block code length sequence is malformed.
    InvalidCodeLengths(String),
    /// Back-reference reaches before the start of the output.
    InvalidDistance {
        /// Requested distance.
        distance: usize,
        /// Bytes produced so far.
        available: usize,
    },
    /// PNG width must be in `1..=2^31-1`.
    InvalidWidth(u32),
    /// Nothing to compress.
    EmptyPayload,
    /// A length does not fit its on-disk field.
    PayloadTooLarge {
        /// Which field overflowed.
        what: &'static str,
        /// Actual length.
        len: usize,
        /// Largest representable length.
        max: usize,
    },
    /// Compression options out of range.
    InvalidOptions(String),
    /// The external compressor failed.
    CompressionError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFilename(name) => {
                write!(
                    f,
                    "Invalid filename {:?}: expected a non-empty name made of [0-9A-Za-z-._]",
                    name
                )
            }
            Error::InvalidBootstrap => {
                write!(f, "Invalid bootstrap code: should start with `<`")
            }
            Error::ProblematicTag(tag) => {
                write!(
                    f,
                    "The compressed data contains a problematic `<{}` tag, try other input",
                    tag
                )
            }
            Error::TruncatedStream => write!(f, "Incomplete deflate stream"),
            Error::InvalidHuffmanCode => write!(f, "Invalid Huffman code in deflate stream"),
            Error::UnsupportedBlockType(kind) => {
                write!(f, "Deflate block type {} is reserved", kind)
            }
            Error::BadContainerHeader(reason) => {
                write!(f, "Bad container header: {}", reason)
            }
            Error::InvalidCodeLengths(reason) => {
                write!(f, "Invalid code lengths: {}", reason)
            }
            Error::InvalidDistance {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Back-reference distance {} exceeds {} decoded bytes",
                    distance, available
                )
            }
            Error::InvalidWidth(width) => {
                write!(f, "Invalid image width: {}", width)
            }
            Error::EmptyPayload => write!(f, "Payload is empty"),
            Error::PayloadTooLarge { what, len, max } => {
                write!(f, "{} length {} exceeds maximum {}", what, len, max)
            }
            Error::InvalidOptions(msg) => {
                write!(f, "Invalid compression options: {}", msg)
            }
            Error::CompressionError(msg) => {
                write!(f, "Compression error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problematic_tag_message() {
        let err = Error::ProblematicTag("script".into());
        assert_eq!(
            err.to_string(),
            "The compressed data contains a problematic `<script` tag, try other input"
        );
    }

    #[test]
    fn test_invalid_distance_message() {
        let err = Error::InvalidDistance {
            distance: 10,
            available: 3,
        };
        assert!(err.to_string().contains("distance 10"));
    }
}
