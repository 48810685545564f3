//! Helpers shared by the integration tests.

#![allow(dead_code)]

pub mod bit_writer;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Deterministic corpus mixing random bytes with repeated text, so that
/// reference compressors emit literals, matches and dynamic blocks.
pub fn mixed_corpus(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let words: [&[u8]; 6] = [b"<div>", b"polyglot ", b"the ", b"zip", b"\x00\x00\x00", b"</div>\n"];
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        if rng.gen_bool(0.3) {
            out.push(rng.gen());
        } else {
            out.extend_from_slice(words[rng.gen_range(0..words.len())]);
        }
    }
    out.truncate(len);
    out
}
