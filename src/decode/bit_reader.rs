//! Bit-level reader for DEFLATE streams.
//!
//! Bits are consumed least-significant first. Whole bytes are pulled into
//! the buffer only when needed, so at most seven unread bits remain buffered
//! between reads; that keeps [`BitReader::bits_read`] exact.

use crate::error::{Error, Result};

/// Bit reader for LSB-first bit streams.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader over the DEFLATE payload.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Ensure at least `n` bits are available in the buffer.
    #[inline]
    fn ensure(&mut self, n: u8) -> Result<()> {
        while self.bits_in_buf < n {
            let byte = *self.data.get(self.pos).ok_or(Error::TruncatedStream)?;
            self.bit_buf |= (byte as u64) << self.bits_in_buf;
            self.pos += 1;
            self.bits_in_buf += 8;
        }
        Ok(())
    }

    /// Read `n` bits (at most 32), first bit in the lowest position.
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);
        self.ensure(n)?;
        let val = (self.bit_buf & ((1u64 << n) - 1)) as u32;
        self.bit_buf >>= n;
        self.bits_in_buf -= n;
        Ok(val)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        self.read_bits(1)
    }

    /// Align to byte boundary (discard remaining bits in current byte).
    pub fn align_to_byte(&mut self) {
        let discard = self.bits_in_buf % 8;
        if discard > 0 {
            self.bit_buf >>= discard;
            self.bits_in_buf -= discard;
        }
    }

    /// Align, then read a little-endian `u16`.
    pub fn read_u16_aligned(&mut self) -> Result<u16> {
        self.align_to_byte();
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read bytes directly into a buffer (assumes byte-aligned).
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        debug_assert_eq!(self.bits_in_buf % 8, 0);

        // First drain any buffered bits
        let buffered_bytes = (self.bits_in_buf / 8) as usize;
        let from_buf = buffered_bytes.min(buf.len());
        if buf.len() - from_buf > self.data.len() - self.pos {
            return Err(Error::TruncatedStream);
        }
        for byte in buf.iter_mut().take(from_buf) {
            *byte = (self.bit_buf & 0xFF) as u8;
            self.bit_buf >>= 8;
            self.bits_in_buf -= 8;
        }

        // Read remaining directly from input
        let remaining = &mut buf[from_buf..];
        remaining.copy_from_slice(&self.data[self.pos..self.pos + remaining.len()]);
        self.pos += remaining.len();
        Ok(())
    }

    /// Number of bits consumed so far.
    #[inline]
    pub fn bits_read(&self) -> u64 {
        self.pos as u64 * 8 - self.bits_in_buf as u64
    }

    /// Bytes not yet pulled into the bit buffer.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.pos
    }
}
