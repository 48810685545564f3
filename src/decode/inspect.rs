//! DEFLATE stream inspection.
//!
//! Decodes a stream into blocks, and each block into the events that
//! produced output bytes together with what they cost in bits. Meant for
//! visualizing where the bits of a compressed payload go.
//!
//! The LZ77 window is never trimmed; inputs are expected to be small.

use super::bit_reader::BitReader;
use super::huffman::{HuffmanTable, FIXED_DISTANCE, FIXED_LITERAL};
use crate::error::{Error, Result};
use crate::format::Format;

/// Length code base values (codes 257-285).
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (codes 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order of code length codes for dynamic Huffman.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

const END_OF_BLOCK: u16 = 256;

const GZIP_FHCRC: u8 = 0x02;
const GZIP_FEXTRA: u8 = 0x04;
const GZIP_FNAME: u8 = 0x08;
const GZIP_FCOMMENT: u8 = 0x10;

/// How a block encodes its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlockKind {
    /// Type 0, copied verbatim.
    Stored,
    /// Type 1, fixed Huffman codes.
    Fixed,
    /// Type 2, Huffman codes transmitted in the block header.
    Dynamic,
}

/// One output-producing event: a stored copy, a literal, or a match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    /// Bits spent on this event.
    pub bits: u32,
    /// Bytes it produced.
    pub bytes: Vec<u8>,
}

/// A decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeflateBlock {
    /// Block type.
    pub kind: BlockKind,
    /// Bits that produced no output: block header, padding, stored length
    /// fields, code tables and the end-of-block code.
    pub overhead_bits: u32,
    /// Output events in stream order.
    pub entries: Vec<Entry>,
}

impl DeflateBlock {
    fn new(kind: BlockKind, overhead_bits: u32) -> Self {
        Self {
            kind,
            overhead_bits,
            entries: Vec::new(),
        }
    }

    /// Total bits of the block.
    pub fn total_bits(&self) -> u64 {
        self.overhead_bits as u64 + self.entries.iter().map(|e| e.bits as u64).sum::<u64>()
    }

    /// Number of bytes the block produced.
    pub fn produced_len(&self) -> usize {
        self.entries.iter().map(|e| e.bytes.len()).sum()
    }

    /// Concatenated output of the block.
    pub fn produced(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|e| e.bytes.iter().copied())
            .collect()
    }
}

/// Decode `data` in the given framing into annotated blocks.
pub fn inspect(format: Format, data: &[u8]) -> Result<Vec<DeflateBlock>> {
    let payload = strip_framing(format, data)?;
    Inspector::new(payload).run()
}

/// The DEFLATE payload inside `data`, with framing validated and removed.
pub fn strip_framing(format: Format, data: &[u8]) -> Result<&[u8]> {
    match format {
        Format::Gzip => strip_gzip(data),
        Format::Zlib => strip_zlib(data),
        Format::Raw => Ok(data),
    }
}

fn strip_gzip(data: &[u8]) -> Result<&[u8]> {
    let min_len = Format::Gzip.header_len() + Format::Gzip.trailer_len();
    if data.len() < min_len {
        return Err(Error::BadContainerHeader("gzip stream too short".into()));
    }
    if data[0] != 0x1F {
        return Err(Error::BadContainerHeader("gzip with incorrect magic1".into()));
    }
    if data[1] != 0x8B {
        return Err(Error::BadContainerHeader("gzip with incorrect magic2".into()));
    }
    if data[2] != 0x08 {
        return Err(Error::BadContainerHeader(
            "gzip with unexpected compression method".into(),
        ));
    }
    let flags = data[3];
    let end = data.len() - Format::Gzip.trailer_len();
    let mut cur = Format::Gzip.header_len();

    if flags & GZIP_FEXTRA != 0 {
        let xlen = data
            .get(cur..cur + 2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as usize)
            .ok_or_else(|| Error::BadContainerHeader("gzip extra field truncated".into()))?;
        cur += 2 + xlen;
    }
    if flags & GZIP_FNAME != 0 {
        cur = skip_zero_terminated(data, cur, "file name")?;
    }
    if flags & GZIP_FCOMMENT != 0 {
        cur = skip_zero_terminated(data, cur, "comment")?;
    }
    if flags & GZIP_FHCRC != 0 {
        cur += 2;
    }
    if cur > end {
        return Err(Error::BadContainerHeader(
            "gzip header overlaps the trailer".into(),
        ));
    }
    Ok(&data[cur..end])
}

fn skip_zero_terminated(data: &[u8], from: usize, what: &str) -> Result<usize> {
    data.get(from..)
        .and_then(|rest| rest.iter().position(|&b| b == 0))
        .map(|nul| from + nul + 1)
        .ok_or_else(|| Error::BadContainerHeader(format!("gzip {what} is not terminated")))
}

fn strip_zlib(data: &[u8]) -> Result<&[u8]> {
    let min_len = Format::Zlib.header_len() + Format::Zlib.trailer_len();
    if data.len() < min_len {
        return Err(Error::BadContainerHeader("zlib stream too short".into()));
    }
    let cmf = data[0];
    let flg = data[1];
    if cmf & 0x0F != 8 {
        return Err(Error::BadContainerHeader(
            "zlib with unexpected compression method".into(),
        ));
    }
    if flg & 0x20 != 0 {
        return Err(Error::BadContainerHeader(
            "zlib with unexpected preset dictionary".into(),
        ));
    }
    if (((cmf as u16) << 8) | (flg as u16)) % 31 != 0 {
        return Err(Error::BadContainerHeader("zlib with incorrect check".into()));
    }
    Ok(&data[2..data.len() - Format::Zlib.trailer_len()])
}

/// Decoder state for one stream.
struct Inspector<'a> {
    reader: BitReader<'a>,
    window: Vec<u8>,
    blocks: Vec<DeflateBlock>,
}

impl<'a> Inspector<'a> {
    fn new(payload: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(payload),
            window: Vec::with_capacity(payload.len() * 4),
            blocks: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<DeflateBlock>> {
        loop {
            let start = self.reader.bits_read();
            let is_final = self.reader.read_bits(1)? == 1;
            let block = match self.reader.read_bits(2)? {
                0 => self.stored_block(start)?,
                1 => self.huffman_block(start, BlockKind::Fixed, &FIXED_LITERAL, &FIXED_DISTANCE)?,
                2 => {
                    let (lit_table, dist_table) = self.read_dynamic_tables()?;
                    self.huffman_block(start, BlockKind::Dynamic, &lit_table, &dist_table)?
                }
                other => return Err(Error::UnsupportedBlockType(other as u8)),
            };
            self.blocks.push(block);
            if is_final {
                return Ok(self.blocks);
            }
        }
    }

    fn overhead_since(&self, start: u64) -> u32 {
        (self.reader.bits_read() - start) as u32
    }

    fn stored_block(&mut self, start: u64) -> Result<DeflateBlock> {
        let len = self.reader.read_u16_aligned()? as usize;
        // NLEN is not checked
        self.reader.read_u16_aligned()?;
        let mut block = DeflateBlock::new(BlockKind::Stored, self.overhead_since(start));

        let mut bytes = vec![0u8; len];
        self.reader.read_bytes(&mut bytes)?;
        self.window.extend_from_slice(&bytes);
        block.entries.push(Entry {
            bits: len as u32 * 8,
            bytes,
        });
        Ok(block)
    }

    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, HuffmanTable)> {
        let reader = &mut self.reader;
        let hlit = reader.read_bits(5)? as usize + 257;
        let hdist = reader.read_bits(5)? as usize + 1;
        let hclen = reader.read_bits(4)? as usize + 4;

        let mut cl_lengths = [0u8; 19];
        for &symbol in &CODE_LENGTH_ORDER[..hclen] {
            cl_lengths[symbol] = reader.read_bits(3)? as u8;
        }
        let cl_table = HuffmanTable::from_lengths(&cl_lengths)?;

        let total = hlit + hdist;
        let mut lengths: Vec<u8> = Vec::with_capacity(total);
        while lengths.len() < total {
            let (symbol, _) = cl_table.decode(reader)?;
            let (value, repeat) = match symbol {
                0..=15 => (symbol as u8, 1),
                16 => {
                    let prev = *lengths.last().ok_or_else(|| {
                        Error::InvalidCodeLengths("repeat code at start".into())
                    })?;
                    (prev, reader.read_bits(2)? as usize + 3)
                }
                17 => (0, reader.read_bits(3)? as usize + 3),
                18 => (0, reader.read_bits(7)? as usize + 11),
                _ => return Err(Error::InvalidHuffmanCode),
            };
            if lengths.len() + repeat > total {
                return Err(Error::InvalidCodeLengths("too many code lengths".into()));
            }
            lengths.resize(lengths.len() + repeat, value);
        }

        let lit_table = HuffmanTable::from_lengths(&lengths[..hlit])?;
        let dist_table = HuffmanTable::from_lengths(&lengths[hlit..])?;
        Ok((lit_table, dist_table))
    }

    fn huffman_block(
        &mut self,
        start: u64,
        kind: BlockKind,
        lit_table: &HuffmanTable,
        dist_table: &HuffmanTable,
    ) -> Result<DeflateBlock> {
        let mut block = DeflateBlock::new(kind, self.overhead_since(start));
        loop {
            let (symbol, code_bits) = lit_table.decode(&mut self.reader)?;
            match symbol {
                0..=255 => {
                    self.window.push(symbol as u8);
                    block.entries.push(Entry {
                        bits: code_bits as u32,
                        bytes: vec![symbol as u8],
                    });
                }
                END_OF_BLOCK => {
                    block.overhead_bits += code_bits as u32;
                    return Ok(block);
                }
                257..=285 => {
                    let entry = self.copy_match(symbol, code_bits, dist_table)?;
                    block.entries.push(entry);
                }
                _ => return Err(Error::InvalidHuffmanCode),
            }
        }
    }

    fn copy_match(&mut self, symbol: u16, code_bits: u8, dist_table: &HuffmanTable) -> Result<Entry> {
        let len_idx = (symbol - 257) as usize;
        let length = LENGTH_BASE[len_idx] as usize
            + self.reader.read_bits(LENGTH_EXTRA[len_idx])? as usize;

        let (dist_symbol, dist_bits) = dist_table.decode(&mut self.reader)?;
        let dist_idx = dist_symbol as usize;
        if dist_idx >= DISTANCE_BASE.len() {
            return Err(Error::InvalidHuffmanCode);
        }
        let distance = DISTANCE_BASE[dist_idx] as usize
            + self.reader.read_bits(DISTANCE_EXTRA[dist_idx])? as usize;

        if distance > self.window.len() {
            return Err(Error::InvalidDistance {
                distance,
                available: self.window.len(),
            });
        }

        // Copy from the window (may overlap)
        let start = self.window.len() - distance;
        for i in 0..length {
            let byte = self.window[start + i];
            self.window.push(byte);
        }

        let bits = code_bits as u32
            + LENGTH_EXTRA[len_idx] as u32
            + dist_bits as u32
            + DISTANCE_EXTRA[dist_idx] as u32;
        Ok(Entry {
            bits,
            bytes: self.window[self.window.len() - length..].to_vec(),
        })
    }
}

/// Aggregate numbers for a decoded stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InspectSummary {
    /// Number of blocks.
    pub blocks: usize,
    /// Number of entries across all blocks.
    pub entries: usize,
    /// Bits spent on output-producing events.
    pub payload_bits: u64,
    /// Bits spent on everything else.
    pub overhead_bits: u64,
    /// Decompressed length.
    pub produced_len: usize,
}

impl InspectSummary {
    /// `payload_bits + overhead_bits`.
    pub fn total_bits(&self) -> u64 {
        self.payload_bits + self.overhead_bits
    }
}

/// Summarize a list of blocks.
pub fn summarize(blocks: &[DeflateBlock]) -> InspectSummary {
    blocks.iter().fold(InspectSummary::default(), |mut acc, block| {
        acc.blocks += 1;
        acc.entries += block.entries.len();
        acc.overhead_bits += block.overhead_bits as u64;
        acc.payload_bits += block.total_bits() - block.overhead_bits as u64;
        acc.produced_len += block.produced_len();
        acc
    })
}
