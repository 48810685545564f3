//! Fuzz target for prefix/bootstrap overlap analysis.
//!
//! Whatever the prefix, a spliced bootstrap must start in the data state.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use polypack::html::{splice, Overlap, Tokenizer};

#[derive(Arbitrary, Debug)]
struct OverlapInput {
    prefix: Vec<u8>,
    /// Appended after a leading `<`
    bootstrap_tail: Vec<u8>,
}

fuzz_target!(|input: OverlapInput| {
    let mut bootstrap = vec![b'<'];
    bootstrap.extend_from_slice(&input.bootstrap_tail);

    let mut out = input.prefix.clone();
    let Ok(overlap) = splice(&mut out, &bootstrap) else {
        return;
    };
    assert!(out.ends_with(&bootstrap));

    let start = match overlap {
        Overlap::Reuse(n) => input.prefix.len() - n,
        Overlap::ResetSuffix(suffix) => input.prefix.len() + suffix.len(),
    };
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed_all(&out[..start]).unwrap();
    assert!(tokenizer.feed(b'<').unwrap());
});
