//! Canonical Huffman tables for DEFLATE decoding.
//!
//! A table is built from a symbol -> code length array alone: walking the
//! lengths from 1 upward, each symbol of the current length (in symbol
//! order) takes the next code value, and the running code is shifted left
//! when moving to the next length. Decoding extends a candidate code one bit
//! at a time and checks it against the range of codes of that length, so a
//! lookup costs O(code length) with no hashing.

use std::sync::LazyLock;

use super::bit_reader::BitReader;
use crate::error::{Error, Result};

/// Maximum code length for DEFLATE Huffman codes.
pub const MAX_BITS: usize = 15;

/// Decoding table for one canonical code.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Number of codes of each length; index 0 is unused.
    counts: [u16; MAX_BITS + 1],
    /// Symbols sorted by (code length, symbol).
    symbols: Vec<u16>,
    /// Longest code length present.
    max_len: u8,
}

impl HuffmanTable {
    /// Build a table from code lengths. Symbols with length 0 are unused.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_BITS + 1];
        for &len in lengths {
            if len as usize > MAX_BITS {
                return Err(Error::InvalidCodeLengths(format!(
                    "code length {len} exceeds {MAX_BITS}"
                )));
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let max_len = (1..=MAX_BITS).rev().find(|&l| counts[l] > 0).unwrap_or(0) as u8;

        let mut symbols = Vec::with_capacity(lengths.len());
        for len in 1..=max_len {
            symbols.extend(
                lengths
                    .iter()
                    .enumerate()
                    .filter(|&(_, &l)| l == len)
                    .map(|(symbol, _)| symbol as u16),
            );
        }

        Ok(Self {
            counts,
            symbols,
            max_len,
        })
    }

    /// Longest code length in the table (0 when empty).
    #[inline]
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Decode one symbol, returning it with the number of bits it took.
    pub fn decode(&self, reader: &mut BitReader) -> Result<(u16, u8)> {
        let mut code = 0u32;
        let mut first = 0u32;
        let mut index = 0usize;
        for len in 1..=self.max_len as usize {
            code |= reader.read_bit()?;
            let count = self.counts[len] as u32;
            if let Some(offset) = code.checked_sub(first).filter(|&o| o < count) {
                return Ok((self.symbols[index + offset as usize], len as u8));
            }
            index += count as usize;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(Error::InvalidHuffmanCode)
    }
}

/// Canonical `(length, code)` for every symbol, `None` for unused ones.
///
/// Codes are given most-significant bit first, as they appear on the wire.
pub fn canonical_codes(lengths: &[u8]) -> Vec<Option<(u8, u16)>> {
    let mut codes = vec![None; lengths.len()];
    let mut code = 0u16;
    for len in 1..=MAX_BITS as u8 {
        for (symbol, &l) in lengths.iter().enumerate() {
            if l == len {
                codes[symbol] = Some((len, code));
                code = code.wrapping_add(1);
            }
        }
        code = code.wrapping_shl(1);
    }
    codes
}

/// Code lengths of the fixed literal/length code (RFC 1951 section 3.2.6).
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);
    lengths
}

/// Fixed literal/length table, built once.
pub static FIXED_LITERAL: LazyLock<HuffmanTable> = LazyLock::new(|| {
    HuffmanTable::from_lengths(&fixed_literal_lengths())
        .unwrap_or_else(|_| unreachable!("fixed code lengths are valid"))
});

/// Fixed distance table, built once. All 32 codes are 5 bits.
pub static FIXED_DISTANCE: LazyLock<HuffmanTable> = LazyLock::new(|| {
    HuffmanTable::from_lengths(&[5u8; 32])
        .unwrap_or_else(|_| unreachable!("fixed code lengths are valid"))
});
