//! PNG chunk handling.

use crate::compress::crc32::Crc32;

/// Write a PNG chunk (length, type, data, CRC32) to the output buffer.
pub fn write_chunk(output: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    output.reserve(12 + data.len());
    output.extend_from_slice(&(data.len() as u32).to_be_bytes());
    output.extend_from_slice(chunk_type);
    output.extend_from_slice(data);
    output.extend_from_slice(&chunk_crc(chunk_type, data).to_be_bytes());
}

/// Write a chunk header declaring `declared_len` bytes followed by `data`,
/// without the trailing CRC.
///
/// Decoders that hit end-of-file inside a chunk treat the missing bytes as
/// unused stream data, which is what lets the bytes after `data` be anything.
pub fn write_open_chunk(output: &mut Vec<u8>, chunk_type: &[u8; 4], declared_len: u32, data: &[u8]) {
    output.reserve(8 + data.len());
    output.extend_from_slice(&declared_len.to_be_bytes());
    output.extend_from_slice(chunk_type);
    output.extend_from_slice(data);
}

/// CRC32 over the chunk type and data.
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(data);
    crc.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_iend_chunk() {
        let mut output = Vec::new();
        write_chunk(&mut output, b"IEND", &[]);

        assert_eq!(output.len(), 12);
        assert_eq!(&output[0..4], &[0, 0, 0, 0]);
        assert_eq!(&output[4..8], b"IEND");
        assert_eq!(&output[8..12], &0xAE426082_u32.to_be_bytes());
    }

    #[test]
    fn test_write_chunk_with_data() {
        let mut output = Vec::new();
        write_chunk(&mut output, b"tEXt", b"hello");

        assert_eq!(output.len(), 17);
        assert_eq!(&output[0..4], &[0, 0, 0, 5]);
        assert_eq!(&output[4..8], b"tEXt");
        assert_eq!(&output[8..13], b"hello");
        assert_eq!(
            &output[13..17],
            &crate::compress::crc32(b"tEXthello").to_be_bytes()
        );
    }

    #[test]
    fn test_write_open_chunk() {
        let mut output = Vec::new();
        write_open_chunk(&mut output, b"IDAT", 100, b"abc");

        assert_eq!(output.len(), 11);
        assert_eq!(&output[0..4], &100u32.to_be_bytes());
        assert_eq!(&output[4..8], b"IDAT");
        assert_eq!(&output[8..], b"abc");
    }
}
