//! Joining container bytes and a bootstrap so the browser starts the
//! bootstrap in the data state.

use super::tokenizer::{State, Tokenizer};
use crate::error::{Error, Result};

/// How to attach a bootstrap to a byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The last `n` bytes of the prefix already equal the first `n` bytes of
    /// the bootstrap; append `bootstrap[n..]`.
    Reuse(usize),
    /// Append these bytes (at most 3), then the whole bootstrap.
    ResetSuffix(&'static [u8]),
}

/// Shortest input that brings `state` back to data, or to a state that
/// reconsumes `<` in data.
pub const fn reset_suffix(state: State) -> &'static [u8] {
    match state {
        State::Data | State::TagOpen => b"",
        State::AttrValueDoubleQuoted => b"\">",
        State::AttrValueSingleQuoted => b"'>",
        State::Comment => b"-->",
        State::CommentEndDash => b"->",
        State::EndTagOpen
        | State::TagName
        | State::BeforeAttrName
        | State::AttrName
        | State::AfterAttrName
        | State::BeforeAttrValue
        | State::AttrValueUnquoted
        | State::AfterAttrValueQuoted
        | State::SelfClosingStartTag
        | State::BogusComment
        | State::MarkupDeclOpen
        | State::MarkupDecl
        | State::MarkupDeclDash
        | State::CommentStart
        | State::CommentStartDash
        | State::CommentEnd
        | State::CommentEndBang => b">",
    }
}

/// Decide how `bootstrap` can follow `prefix`.
///
/// The prefix is tokenized byte by byte. At position `i`, if the rest of the
/// prefix is the beginning of the bootstrap and the tokenizer passes through
/// the data state while consuming `prefix[i]`, the bootstrap can take over
/// from there and `Reuse(prefix.len() - i)` is returned. Otherwise the
/// suffix for the final state is returned.
///
/// Fails with [`Error::ProblematicTag`] if the prefix opens a tag that
/// changes how the following bytes are tokenized, and with
/// [`Error::InvalidBootstrap`] if the bootstrap does not start with `<`.
pub fn overlap_or_close(prefix: &[u8], bootstrap: &[u8]) -> Result<Overlap> {
    if bootstrap.first() != Some(&b'<') {
        return Err(Error::InvalidBootstrap);
    }

    let mut tokenizer = Tokenizer::new();
    for (i, &byte) in prefix.iter().enumerate() {
        let tail = &prefix[i..];
        let can_overlap = tail.len() <= bootstrap.len() && bootstrap.starts_with(tail);

        let passed_data = tokenizer.feed(byte)?;
        if can_overlap && passed_data {
            return Ok(Overlap::Reuse(tail.len()));
        }
    }

    let suffix = reset_suffix(tokenizer.state());
    tokenizer.feed_all(suffix)?;
    let resets = tokenizer.feed(bootstrap[0])?;
    assert!(
        resets,
        "reset suffix {:?} did not return {:?} to the data state",
        suffix,
        tokenizer.state()
    );
    Ok(Overlap::ResetSuffix(suffix))
}

/// Append `bootstrap` to `prefix` according to [`overlap_or_close`].
pub fn splice(prefix: &mut Vec<u8>, bootstrap: &[u8]) -> Result<Overlap> {
    let overlap = overlap_or_close(prefix, bootstrap)?;
    match overlap {
        Overlap::Reuse(n) => prefix.extend_from_slice(&bootstrap[n..]),
        Overlap::ResetSuffix(suffix) => {
            prefix.extend_from_slice(suffix);
            prefix.extend_from_slice(bootstrap);
        }
    }
    Ok(overlap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reset_suffix_returns_to_data() {
        for state in State::ALL {
            let suffix = reset_suffix(state);
            assert!(suffix.len() <= 3, "{state:?}");

            let mut tokenizer = Tokenizer::in_state(state);
            tokenizer.feed_all(suffix).unwrap();
            assert!(
                tokenizer.feed(b'<').unwrap(),
                "{state:?} + {suffix:?} does not reach data"
            );
            assert_eq!(tokenizer.state(), State::TagOpen);
        }
    }

    #[test]
    fn test_reuse_trailing_tag_prefix() {
        let prefix = b"\x89PNG junk <scr";
        let bootstrap = b"<script>x</script>";
        assert_eq!(
            overlap_or_close(prefix, bootstrap).unwrap(),
            Overlap::Reuse(4)
        );
    }

    #[test]
    fn test_reuse_single_lt() {
        assert_eq!(
            overlap_or_close(b"abc<", b"<p>").unwrap(),
            Overlap::Reuse(1)
        );
    }

    #[test]
    fn test_no_reuse_inside_attribute_value() {
        // the trailing `<` sits inside a quoted value, so it cannot be reused
        let result = overlap_or_close(b"<a b=\"<", b"<p>").unwrap();
        assert_eq!(result, Overlap::ResetSuffix(b"\">"));
    }

    #[test]
    fn test_reuse_never_exceeds_bootstrap() {
        // "<b" is longer than the bootstrap, only the final "<" may be reused
        let result = overlap_or_close(b"x<b><", b"<").unwrap();
        assert_eq!(result, Overlap::Reuse(1));
    }

    #[test]
    fn test_reset_from_tag_name() {
        assert_eq!(
            overlap_or_close(b"x<div", b"<p>").unwrap(),
            Overlap::ResetSuffix(b">")
        );
    }

    #[test]
    fn test_reset_from_comment() {
        assert_eq!(
            overlap_or_close(b"<!-- hi", b"<p>").unwrap(),
            Overlap::ResetSuffix(b"-->")
        );
    }

    #[test]
    fn test_empty_suffix_when_already_in_data() {
        assert_eq!(
            overlap_or_close(b"plain text", b"<p>").unwrap(),
            Overlap::ResetSuffix(b"")
        );
        assert_eq!(
            overlap_or_close(b"", b"<p>").unwrap(),
            Overlap::ResetSuffix(b"")
        );
    }

    #[test]
    fn test_problematic_prefix() {
        assert_eq!(
            overlap_or_close(b"<title>", b"<p>").unwrap_err(),
            Error::ProblematicTag("title".into())
        );
    }

    #[test]
    fn test_invalid_bootstrap() {
        assert_eq!(
            overlap_or_close(b"x", b"").unwrap_err(),
            Error::InvalidBootstrap
        );
        assert_eq!(
            overlap_or_close(b"x", b"p>").unwrap_err(),
            Error::InvalidBootstrap
        );
    }

    #[test]
    fn test_splice() {
        let mut out = b"abc<scr".to_vec();
        assert_eq!(
            splice(&mut out, b"<script>1</script>").unwrap(),
            Overlap::Reuse(4)
        );
        assert_eq!(out, b"abc<script>1</script>");

        let mut out = b"<i".to_vec();
        splice(&mut out, b"<p>").unwrap();
        assert_eq!(out, b"<i><p>");
    }
}
