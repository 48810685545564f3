//! DEFLATE stream decoding for inspection.
//!
//! Accepts the same three framings the compressor can produce and breaks the
//! stream down into blocks and per-symbol bit costs.

pub mod bit_reader;
pub mod huffman;
pub mod inspect;

pub use inspect::{
    inspect, strip_framing, summarize, BlockKind, DeflateBlock, Entry, InspectSummary,
};
