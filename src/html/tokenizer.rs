//! The slice of the HTML5 tokenizer that tracks tag, comment and markup
//! declaration boundaries.
//!
//! Tree construction is not modeled. Character references are not modeled
//! either: they never move the tokenizer out of the states tracked here.
//! `<!` is followed by lookahead in the real tokenizer; that lookahead is
//! unrolled into `MarkupDeclOpen`, `MarkupDecl` and `MarkupDeclDash`.

use crate::error::{Error, Result};

/// Tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Plain text, the state every bootstrap expects to start in.
    Data,
    /// After `<`.
    TagOpen,
    /// After `</`.
    EndTagOpen,
    /// Inside a tag name.
    TagName,
    /// Whitespace after the tag name or an attribute.
    BeforeAttrName,
    /// Inside an attribute name.
    AttrName,
    /// Whitespace after an attribute name.
    AfterAttrName,
    /// After `=`.
    BeforeAttrValue,
    /// Inside `"..."`.
    AttrValueDoubleQuoted,
    /// Inside `'...'`.
    AttrValueSingleQuoted,
    /// Inside an unquoted value.
    AttrValueUnquoted,
    /// Right after a closing quote.
    AfterAttrValueQuoted,
    /// After `/` inside a tag.
    SelfClosingStartTag,
    /// `<?...`, `</1...` and other malformed markup, up to `>`.
    BogusComment,
    /// After `<!`.
    MarkupDeclOpen,
    /// After `<!x`, accumulating the declaration name.
    MarkupDecl,
    /// After `<!-`.
    MarkupDeclDash,
    /// After `<!--`.
    CommentStart,
    /// After `<!---`.
    CommentStartDash,
    /// Comment text.
    Comment,
    /// `-` inside a comment.
    CommentEndDash,
    /// `--` inside a comment.
    CommentEnd,
    /// `--!` inside a comment.
    CommentEndBang,
}

impl State {
    /// Every state, in declaration order.
    pub const ALL: [State; 23] = [
        State::Data,
        State::TagOpen,
        State::EndTagOpen,
        State::TagName,
        State::BeforeAttrName,
        State::AttrName,
        State::AfterAttrName,
        State::BeforeAttrValue,
        State::AttrValueDoubleQuoted,
        State::AttrValueSingleQuoted,
        State::AttrValueUnquoted,
        State::AfterAttrValueQuoted,
        State::SelfClosingStartTag,
        State::BogusComment,
        State::MarkupDeclOpen,
        State::MarkupDecl,
        State::MarkupDeclDash,
        State::CommentStart,
        State::CommentStartDash,
        State::Comment,
        State::CommentEndDash,
        State::CommentEnd,
        State::CommentEndBang,
    ];
}

/// Side effect attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Just move.
    None,
    /// Append the lowercased byte to the tag name / declaration buffer.
    Stash,
    /// A tag or declaration has been emitted; clear the buffer.
    EmitClear,
    /// Process the same byte again in the target state.
    Reconsume,
}

/// A transition target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Side effect performed on entry.
    pub action: Action,
    /// Next state.
    pub target: State,
}

/// How the transition table sees an input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// `[A-Za-z]`
    Alpha,
    /// Tab, LF, FF or space.
    Space,
    /// Anything else.
    Byte(u8),
}

impl InputClass {
    /// Classify a byte.
    #[inline]
    pub const fn of(byte: u8) -> Self {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' => InputClass::Alpha,
            b'\t' | b'\n' | 0x0C | b' ' => InputClass::Space,
            other => InputClass::Byte(other),
        }
    }
}

/// Tags whose appearance would desynchronize the tokenizer from this model.
///
/// Matched against the lowercased buffer after every append, so `XmP` and
/// `xmpa` are rejected as well as `xmp`.
pub const FORBIDDEN_TAGS: [&str; 14] = [
    // RCDATA content
    "title",
    "textarea",
    // raw text content
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    // script data
    "script",
    // PLAINTEXT
    "plaintext",
    // "in frameset" insertion mode ignores unknown tags
    "frameset",
    // scripts inside have no browsing context
    "template",
    // may switch the document to quirks mode
    "!doctype",
    // case sensitive in browsers, treated case-insensitively here
    "![cdata[",
];

const fn go(target: State) -> Transition {
    Transition {
        action: Action::None,
        target,
    }
}

const fn stash(target: State) -> Transition {
    Transition {
        action: Action::Stash,
        target,
    }
}

const fn emit(target: State) -> Transition {
    Transition {
        action: Action::EmitClear,
        target,
    }
}

const fn reconsume(target: State) -> Transition {
    Transition {
        action: Action::Reconsume,
        target,
    }
}

/// The transition table. The last arm for each state is its default.
///
/// Character reference transitions (`&`) are left out; they return to the
/// state they came from and never affect the outcome.
pub const fn transition(state: State, class: InputClass) -> Transition {
    use InputClass::{Alpha, Byte, Space};
    use State::*;

    match (state, class) {
        (Data, Byte(b'<')) => go(TagOpen),
        (Data, _) => go(Data),

        (TagOpen, Byte(b'!')) => stash(MarkupDeclOpen),
        (TagOpen, Byte(b'/')) => go(EndTagOpen),
        (TagOpen, Alpha) => stash(TagName),
        (TagOpen, Byte(b'?')) => go(BogusComment),
        (TagOpen, _) => reconsume(Data),

        (EndTagOpen, Alpha) => stash(TagName),
        (EndTagOpen, Byte(b'>')) => go(Data),
        (EndTagOpen, _) => reconsume(BogusComment),

        (TagName, Space) => go(BeforeAttrName),
        (TagName, Byte(b'/')) => go(SelfClosingStartTag),
        (TagName, Byte(b'>')) => emit(Data),
        (TagName, _) => stash(TagName),

        (BeforeAttrName, Space) => go(BeforeAttrName),
        (BeforeAttrName, Byte(b'/' | b'>')) => reconsume(AfterAttrName),
        (BeforeAttrName, Byte(b'=')) => go(AttrName),
        (BeforeAttrName, _) => reconsume(AttrName),

        (AttrName, Space | Byte(b'/' | b'>')) => reconsume(AfterAttrName),
        (AttrName, Byte(b'=')) => go(BeforeAttrValue),
        (AttrName, _) => go(AttrName),

        (AfterAttrName, Space) => go(AfterAttrName),
        (AfterAttrName, Byte(b'/')) => go(SelfClosingStartTag),
        (AfterAttrName, Byte(b'=')) => go(BeforeAttrValue),
        (AfterAttrName, Byte(b'>')) => emit(Data),
        (AfterAttrName, _) => reconsume(AttrName),

        (BeforeAttrValue, Space) => go(BeforeAttrValue),
        (BeforeAttrValue, Byte(b'"')) => go(AttrValueDoubleQuoted),
        (BeforeAttrValue, Byte(b'\'')) => go(AttrValueSingleQuoted),
        (BeforeAttrValue, Byte(b'>')) => emit(Data),
        (BeforeAttrValue, _) => reconsume(AttrValueUnquoted),

        (AttrValueDoubleQuoted, Byte(b'"')) => go(AfterAttrValueQuoted),
        (AttrValueDoubleQuoted, _) => go(AttrValueDoubleQuoted),

        (AttrValueSingleQuoted, Byte(b'\'')) => go(AfterAttrValueQuoted),
        (AttrValueSingleQuoted, _) => go(AttrValueSingleQuoted),

        (AttrValueUnquoted, Space) => go(BeforeAttrName),
        (AttrValueUnquoted, Byte(b'>')) => emit(Data),
        (AttrValueUnquoted, _) => go(AttrValueUnquoted),

        (AfterAttrValueQuoted, Space) => go(BeforeAttrName),
        (AfterAttrValueQuoted, Byte(b'/')) => go(SelfClosingStartTag),
        (AfterAttrValueQuoted, Byte(b'>')) => emit(Data),
        (AfterAttrValueQuoted, _) => reconsume(BeforeAttrName),

        (SelfClosingStartTag, Byte(b'>')) => emit(Data),
        (SelfClosingStartTag, _) => reconsume(BeforeAttrName),

        (BogusComment, Byte(b'>')) => go(Data),
        (BogusComment, _) => go(BogusComment),

        (MarkupDeclOpen, Byte(b'-')) => emit(MarkupDeclDash),
        (MarkupDeclOpen, Byte(b'>')) => emit(Data),
        (MarkupDeclOpen, _) => stash(MarkupDecl),

        (MarkupDecl, Byte(b'>')) => emit(Data),
        (MarkupDecl, _) => stash(MarkupDecl),

        (MarkupDeclDash, Byte(b'-')) => go(CommentStart),
        (MarkupDeclDash, Byte(b'>')) => go(Data),
        (MarkupDeclDash, _) => go(BogusComment),

        (CommentStart, Byte(b'-')) => go(CommentStartDash),
        (CommentStart, Byte(b'>')) => go(Data),
        (CommentStart, _) => reconsume(Comment),

        (CommentStartDash, Byte(b'-')) => go(CommentEnd),
        (CommentStartDash, Byte(b'>')) => go(Data),
        (CommentStartDash, _) => reconsume(Comment),

        (Comment, Byte(b'-')) => go(CommentEndDash),
        (Comment, _) => go(Comment),

        (CommentEndDash, Byte(b'-')) => go(CommentEnd),
        (CommentEndDash, _) => reconsume(Comment),

        (CommentEnd, Byte(b'>')) => go(Data),
        (CommentEnd, Byte(b'!')) => go(CommentEndBang),
        (CommentEnd, Byte(b'-')) => go(CommentEnd),
        (CommentEnd, _) => reconsume(Comment),

        (CommentEndBang, Byte(b'-')) => go(CommentEndDash),
        (CommentEndBang, Byte(b'>')) => go(Data),
        (CommentEndBang, _) => reconsume(Comment),
    }
}

/// Tokenizer position: current state plus the tag name / declaration buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    state: State,
    stash: Vec<u8>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Start in the data state with an empty buffer.
    pub fn new() -> Self {
        Self::in_state(State::Data)
    }

    /// Start in an arbitrary state with an empty buffer.
    pub fn in_state(state: State) -> Self {
        Self {
            state,
            stash: Vec::new(),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Lowercased tag name or declaration seen so far.
    #[inline]
    pub fn stash(&self) -> &[u8] {
        &self.stash
    }

    /// Consume one byte, following reconsume chains to completion.
    ///
    /// Returns whether the data state was passed through: either the
    /// tokenizer sat in it before the byte, or a reconsume chain went
    /// through it.
    pub fn feed(&mut self, byte: u8) -> Result<bool> {
        let class = InputClass::of(byte);
        let mut passed_data = self.state == State::Data;
        loop {
            let Transition { action, target } = transition(self.state, class);
            self.state = target;
            match action {
                Action::None => return Ok(passed_data),
                Action::Stash => {
                    self.push_stash(byte)?;
                    return Ok(passed_data);
                }
                Action::EmitClear => {
                    self.stash.clear();
                    return Ok(passed_data);
                }
                Action::Reconsume => passed_data |= target == State::Data,
            }
        }
    }

    /// Consume a run of bytes.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.feed(byte)?;
        }
        Ok(())
    }

    fn push_stash(&mut self, byte: u8) -> Result<()> {
        self.stash.push(byte.to_ascii_lowercase());
        if let Some(tag) = FORBIDDEN_TAGS
            .iter()
            .find(|tag| tag.as_bytes() == self.stash.as_slice())
        {
            return Err(Error::ProblematicTag((*tag).to_owned()));
        }
        Ok(())
    }
}
