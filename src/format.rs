//! Compressed stream framing.

/// Container framing around a DEFLATE bitstream.
///
/// The numeric values match the format codes used by zopfli front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Format {
    /// RFC 1952 gzip member.
    Gzip = 0,
    /// RFC 1950 zlib stream.
    Zlib = 1,
    /// Bare RFC 1951 DEFLATE.
    Raw = 2,
}

impl Format {
    /// Bytes of framing before the DEFLATE payload, when fixed.
    ///
    /// gzip headers are variable-length, so this is the minimum.
    #[inline]
    pub const fn header_len(self) -> usize {
        match self {
            Format::Gzip => 10,
            Format::Zlib => 2,
            Format::Raw => 0,
        }
    }

    /// Bytes of framing after the DEFLATE payload.
    #[inline]
    pub const fn trailer_len(self) -> usize {
        match self {
            Format::Gzip => 8,
            Format::Zlib => 4,
            Format::Raw => 0,
        }
    }

    /// Lowercase name as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Format::Gzip => "gzip",
            Format::Zlib => "zlib",
            Format::Raw => "raw",
        }
    }
}

impl TryFrom<u8> for Format {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::Gzip),
            1 => Ok(Format::Zlib),
            2 => Ok(Format::Raw),
            other => Err(other),
        }
    }
}

impl From<Format> for u8 {
    fn from(format: Format) -> Self {
        format as u8
    }
}
