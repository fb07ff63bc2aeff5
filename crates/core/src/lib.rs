//! tact-cst: lossless concrete-syntax-tree parser for Tact source files.
//!
//! The parser is a backtracking PEG built from small combinators
//! ([`combinator`], [`terminal`]) and a hand-written grammar table
//! ([`grammar`]). Every whitespace run and comment is kept in the tree as a
//! trailing sibling of the token before it, so concatenating the leaves of
//! a successful parse gives back the input byte for byte.
//!
//! # Public API
//!
//! - [`parse()`] -- parse a whole file into a `Module` node
//! - [`parse_imports()`] -- parse only the leading imports
//! - [`parse_fragment()`] -- parse one expression, statement or type
//! - [`Cst`] -- the tree; walk it by node kind, `field` and `group`
//! - [`Variant`] -- which grammar table to use
//! - [`ParseError`] -- the single failure mode
//!
//! # Resource limits
//!
//! Rules recurse on the native stack, one frame chain per nesting level of
//! the input. Deeply nested input needs a correspondingly large stack; run
//! the parser on a thread with a raised stack size when the input is not
//! trusted.

pub mod combinator;
pub mod context;
pub mod cst;
pub mod error;
pub mod grammar;
pub mod terminal;

// ── Convenience re-exports ───────────────────────────────────────────

pub use context::{Context, Variant};
pub use cst::{Cst, CstId, COMMENT, WHITESPACE};
pub use error::ParseError;
pub use grammar::{parse, parse_fragment, parse_imports, Fragment};
