//! Single-entry ZIP archive writer.
//!
//! The archive holds exactly one DEFLATE-compressed entry. Every size and
//! offset is derived from the name and payload lengths up front, so the
//! layout is known before a single byte is written:
//!
//! ```text
//! 0                      local file header (30 + n)
//! 30 + n                 compressed data (d)
//! 30 + n + d             central directory record (46 + n)
//! 76 + 2n + d            end of central directory (22)
//! ```

use chrono::{Datelike, Local, Timelike};

use crate::compress::crc32;
use crate::error::{Error, Result};

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4B50;
const END_OF_CENTRAL_DIR_SIGNATURE: u32 = 0x0605_4B50;

/// Fixed part of the local file header.
pub const LOCAL_HEADER_LEN: usize = 30;
/// Fixed part of the central directory record.
pub const CENTRAL_HEADER_LEN: usize = 46;
/// End of central directory record (no comment).
pub const END_OF_CENTRAL_DIR_LEN: usize = 22;

/// Version needed to extract: 2.0, the first version with DEFLATE.
const VERSION_NEEDED: u16 = 0x0014;
/// Version made by: MS-DOS host, spec version 3.0.
const VERSION_MADE_BY: u16 = 0x001E;
/// Compression method 8 (deflate).
const METHOD_DEFLATE: u16 = 8;

/// Modification timestamp in the MS-DOS date/time bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    /// `day | month << 5 | (year - 1980) << 9`
    pub date: u16,
    /// `second / 2 | minute << 5 | hour << 11`
    pub time: u16,
}

impl DosDateTime {
    /// Pack calendar fields. Years outside 1980..=2107 are clamped, seconds
    /// lose their lowest bit.
    pub fn from_parts(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let year = (year.clamp(1980, 2107) - 1980) as u16;
        let date = (day as u16 & 0x1F) | ((month as u16 & 0x0F) << 5) | (year << 9);
        let time =
            ((second as u16 >> 1) & 0x1F) | ((minute as u16 & 0x3F) << 5) | ((hour as u16 & 0x1F) << 11);
        Self { date, time }
    }

    /// Current local time.
    pub fn now() -> Self {
        let now = Local::now();
        Self::from_parts(
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
        )
    }

    /// Time in the low half, date in the high half, as stored on disk.
    #[inline]
    pub const fn packed(self) -> u32 {
        (self.date as u32) << 16 | self.time as u32
    }
}

/// Metadata shared by the local header and the central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Trimmed, validated entry name.
    pub filename: String,
    /// Uncompressed length.
    pub inflated_len: u32,
    /// Compressed length.
    pub deflated_len: u32,
    /// CRC32 of the uncompressed data.
    pub crc32: u32,
    /// Modification time.
    pub modified: DosDateTime,
}

impl EntryDescriptor {
    /// Validate the name and compute the entry metadata.
    pub fn new(filename: &str, inflated: &[u8], deflated: &[u8], modified: DosDateTime) -> Result<Self> {
        let filename = validate_filename(filename)?;
        let deflated_len = field_u32("deflated data", deflated.len())?;
        directory_offset(filename.len(), deflated_len)?;
        Ok(Self {
            filename: filename.to_owned(),
            inflated_len: field_u32("inflated data", inflated.len())?,
            deflated_len,
            crc32: crc32(inflated),
            modified,
        })
    }

    fn name_len(&self) -> u16 {
        // bounded by validate_filename
        self.filename.len() as u16
    }

    /// Size of the central directory (a single record).
    pub fn central_directory_len(&self) -> u32 {
        (CENTRAL_HEADER_LEN + self.filename.len()) as u32
    }

    /// Offset of the central directory from the start of the archive.
    pub fn central_directory_offset(&self) -> u32 {
        // checked in new()
        (LOCAL_HEADER_LEN + self.filename.len()) as u32 + self.deflated_len
    }

    /// Total archive length.
    pub fn archive_len(&self) -> usize {
        self.central_directory_offset() as usize
            + self.central_directory_len() as usize
            + END_OF_CENTRAL_DIR_LEN
    }

    fn write_local_header(&self, out: &mut Vec<u8>) {
        put_u32(out, LOCAL_HEADER_SIGNATURE);
        put_u16(out, VERSION_NEEDED);
        put_u16(out, 0); // general purpose flags
        put_u16(out, METHOD_DEFLATE);
        put_u32(out, self.modified.packed());
        put_u32(out, self.crc32);
        put_u32(out, self.deflated_len);
        put_u32(out, self.inflated_len);
        put_u16(out, self.name_len());
        put_u16(out, 0); // extra field length
        out.extend_from_slice(self.filename.as_bytes());
    }

    fn write_central_header(&self, out: &mut Vec<u8>) {
        put_u32(out, CENTRAL_HEADER_SIGNATURE);
        put_u16(out, VERSION_MADE_BY);
        put_u16(out, VERSION_NEEDED);
        put_u16(out, 0); // general purpose flags
        put_u16(out, METHOD_DEFLATE);
        put_u32(out, self.modified.packed());
        put_u32(out, self.crc32);
        put_u32(out, self.deflated_len);
        put_u32(out, self.inflated_len);
        put_u16(out, self.name_len());
        put_u16(out, 0); // extra field length
        put_u16(out, 0); // comment length
        put_u16(out, 0); // starting disk
        put_u16(out, 0); // internal attributes: binary
        put_u32(out, 0); // external attributes
        put_u32(out, 0); // local header offset
        out.extend_from_slice(self.filename.as_bytes());
    }

    fn write_end_of_central_directory(&self, out: &mut Vec<u8>) {
        put_u32(out, END_OF_CENTRAL_DIR_SIGNATURE);
        put_u16(out, 0); // this disk
        put_u16(out, 0); // disk with the central directory
        put_u16(out, 1); // records on this disk
        put_u16(out, 1); // records in total
        put_u32(out, self.central_directory_len());
        put_u32(out, self.central_directory_offset());
        put_u16(out, 0); // comment length
    }
}

/// Build a ZIP archive holding `deflated` as the single entry `filename`,
/// stamped with the current local time.
///
/// `deflated` must be the raw DEFLATE encoding of `inflated`.
pub fn build_zip(filename: &str, inflated: &[u8], deflated: &[u8]) -> Result<Vec<u8>> {
    build_zip_at(filename, inflated, deflated, DosDateTime::now())
}

/// Same as [`build_zip`] with an explicit modification time.
pub fn build_zip_at(
    filename: &str,
    inflated: &[u8],
    deflated: &[u8],
    modified: DosDateTime,
) -> Result<Vec<u8>> {
    let entry = EntryDescriptor::new(filename, inflated, deflated, modified)?;

    let mut out = Vec::with_capacity(entry.archive_len());
    entry.write_local_header(&mut out);
    out.extend_from_slice(deflated);
    entry.write_central_header(&mut out);
    entry.write_end_of_central_directory(&mut out);

    debug_assert_eq!(out.len(), entry.archive_len());
    Ok(out)
}

/// Trim `name` and check it against `[0-9A-Za-z-._]+`.
///
/// Anything else would drag in filename encoding questions.
pub fn validate_filename(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_'));
    if !valid {
        return Err(Error::InvalidFilename(name.to_owned()));
    }
    if trimmed.len() > u16::MAX as usize {
        return Err(Error::PayloadTooLarge {
            what: "filename",
            len: trimmed.len(),
            max: u16::MAX as usize,
        });
    }
    Ok(trimmed)
}

/// `30 + name_len + deflated_len`, which must fit the 32-bit offset field.
fn directory_offset(name_len: usize, deflated_len: u32) -> Result<u32> {
    let offset = (LOCAL_HEADER_LEN + name_len) as u64 + deflated_len as u64;
    u32::try_from(offset).map_err(|_| Error::PayloadTooLarge {
        what: "central directory offset",
        len: offset as usize,
        max: u32::MAX as usize,
    })
}

fn field_u32(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::PayloadTooLarge {
        what,
        len,
        max: u32::MAX as usize,
    })
}

#[inline]
fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[inline]
fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le16(data: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([data[at], data[at + 1]])
    }

    fn le32(data: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
    }

    const STAMP: DosDateTime = DosDateTime {
        date: 0x5A21,
        time: 0x6000,
    };

    #[test]
    fn test_dos_date_time_packing() {
        let dt = DosDateTime::from_parts(2025, 1, 1, 12, 0, 0);
        assert_eq!(dt.date, 1 | (1 << 5) | (45 << 9));
        assert_eq!(dt.time, 12 << 11);
        assert_eq!(dt.packed(), (dt.date as u32) << 16 | dt.time as u32);
    }

    #[test]
    fn test_dos_date_time_halves_seconds() {
        let dt = DosDateTime::from_parts(1980, 1, 1, 0, 0, 59);
        assert_eq!(dt.time & 0x1F, 29);
    }

    #[test]
    fn test_dos_date_time_clamps_year() {
        assert_eq!(DosDateTime::from_parts(1970, 1, 1, 0, 0, 0).date >> 9, 0);
        assert_eq!(DosDateTime::from_parts(2200, 1, 1, 0, 0, 0).date >> 9, 127);
    }

    #[test]
    fn test_validate_filename() {
        assert_eq!(validate_filename("  index.html \n").unwrap(), "index.html");
        assert_eq!(validate_filename("a-b_c.D9").unwrap(), "a-b_c.D9");
        assert!(matches!(
            validate_filename("   "),
            Err(Error::InvalidFilename(_))
        ));
        assert!(validate_filename("dir/file").is_err());
        assert!(validate_filename("héllo").is_err());
        assert!(validate_filename("a b").is_err());
    }

    #[test]
    fn test_zip_layout() {
        let inflated = b"hello";
        let deflated = [0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
        let zip = build_zip_at("a.txt", inflated, &deflated, STAMP).unwrap();

        let n = 5;
        let d = deflated.len();
        assert_eq!(zip.len(), 30 + n + d + 46 + n + 22);

        // local file header
        assert_eq!(le32(&zip, 0), LOCAL_HEADER_SIGNATURE);
        assert_eq!(le16(&zip, 4), 20);
        assert_eq!(le16(&zip, 8), 8);
        assert_eq!(le32(&zip, 10), STAMP.packed());
        assert_eq!(le32(&zip, 14), crc32(inflated));
        assert_eq!(le32(&zip, 18), d as u32);
        assert_eq!(le32(&zip, 22), 5);
        assert_eq!(le16(&zip, 26), n as u16);
        assert_eq!(le16(&zip, 28), 0);
        assert_eq!(&zip[30..35], b"a.txt");
        assert_eq!(&zip[35..35 + d], &deflated);

        // central directory
        let cd = 30 + n + d;
        assert_eq!(le32(&zip, cd), CENTRAL_HEADER_SIGNATURE);
        assert_eq!(le32(&zip, cd + 16), crc32(inflated));
        assert_eq!(le32(&zip, cd + 20), d as u32);
        assert_eq!(le32(&zip, cd + 24), 5);
        assert_eq!(le32(&zip, cd + 42), 0);
        assert_eq!(&zip[cd + 46..cd + 46 + n], b"a.txt");

        // end of central directory
        let eocd = cd + 46 + n;
        assert_eq!(le32(&zip, eocd), END_OF_CENTRAL_DIR_SIGNATURE);
        assert_eq!(le16(&zip, eocd + 8), 1);
        assert_eq!(le16(&zip, eocd + 10), 1);
        assert_eq!(le32(&zip, eocd + 12), (46 + n) as u32);
        assert_eq!(le32(&zip, eocd + 16), cd as u32);
        assert_eq!(le16(&zip, eocd + 20), 0);
    }

    #[test]
    fn test_zip_uses_trimmed_name() {
        let zip = build_zip_at(" x ", b"", &[0x03, 0x00], STAMP).unwrap();
        assert_eq!(le16(&zip, 26), 1);
        assert_eq!(zip[30], b'x');
    }

    #[test]
    fn test_zip_rejects_bad_name() {
        let err = build_zip_at("../evil", b"", &[0x03, 0x00], STAMP).unwrap_err();
        assert_eq!(err, Error::InvalidFilename("../evil".into()));
    }

    #[test]
    fn test_directory_offset_overflow() {
        assert_eq!(directory_offset(5, 100).unwrap(), 135);
        assert_eq!(directory_offset(0, u32::MAX - 30).unwrap(), u32::MAX);
        assert_eq!(
            directory_offset(5, u32::MAX - 34).unwrap_err(),
            Error::PayloadTooLarge {
                what: "central directory offset",
                len: u32::MAX as usize + 1,
                max: u32::MAX as usize,
            }
        );
    }

    #[test]
    fn test_descriptor_offsets() {
        let entry = EntryDescriptor::new("ab", b"xyz", &[1, 2, 3, 4], STAMP).unwrap();
        assert_eq!(entry.central_directory_offset(), 30 + 2 + 4);
        assert_eq!(entry.central_directory_len(), 48);
        assert_eq!(entry.archive_len(), 36 + 48 + 22);
    }
}
