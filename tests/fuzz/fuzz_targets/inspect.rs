//! Fuzz target for DEFLATE stream inspection.
//!
//! Tests that the inspector handles arbitrary input without panicking and
//! that whatever it accepts is accounted for bit by bit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use polypack::{decode, Format};

/// Structured input for inspection fuzzing.
#[derive(Arbitrary, Debug)]
struct InspectInput {
    /// Framing selector (taken modulo 3)
    format: u8,
    /// Stream bytes
    data: Vec<u8>,
}

fuzz_target!(|input: InspectInput| {
    let format = Format::try_from(input.format % 3).unwrap();

    let Ok(payload) = decode::strip_framing(format, &input.data) else {
        return;
    };
    let Ok(blocks) = decode::inspect(format, &input.data) else {
        return;
    };

    let summary = decode::summarize(&blocks);
    assert!(
        summary.total_bits() <= payload.len() as u64 * 8,
        "more bits accounted than present"
    );
    assert_eq!(
        summary.produced_len,
        blocks.iter().map(|b| b.produced().len()).sum::<usize>()
    );
});
