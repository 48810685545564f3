//! HTML5 tokenizer model and prefix/bootstrap overlap analysis.
//!
//! A browser that sniffs a polyglot file as HTML tokenizes the container
//! bytes before it ever reaches the bootstrap. This module tracks where the
//! tokenizer ends up so the bootstrap can be attached at a point where it
//! will be seen as markup.

pub mod overlap;
pub mod tokenizer;

pub use overlap::{overlap_or_close, reset_suffix, splice, Overlap};
pub use tokenizer::{Action, InputClass, State, Tokenizer, Transition, FORBIDDEN_TAGS};
