//! Parse session state: source text, cursor, active trivia rule and grammar
//! variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cst::{Cst, IdGen};
use crate::terminal;

/// Rule used to skip trivia after every terminal.
pub type TriviaRule = fn(&mut Context<'_>, &mut Vec<Cst>) -> bool;

/// Grammar table version.
///
/// Both tables can run side by side on the same input to compare an old
/// and a new grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Legacy grammar: explicit terminators everywhere, no `codeOf`, no
    /// contract parameters, no `..` in destructuring.
    V1,
    #[default]
    V2,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::V1, Variant::V2];

    pub fn name(self) -> &'static str {
        match self {
            Variant::V1 => "v1",
            Variant::V2 => "v2",
        }
    }

    /// `;` may be left out right before a closing `}`.
    pub fn implicit_terminator(self) -> bool {
        self == Variant::V2
    }

    pub fn code_of(self) -> bool {
        self == Variant::V2
    }

    pub fn contract_parameters(self) -> bool {
        self == Variant::V2
    }

    pub fn destruct_rest(self) -> bool {
        self == Variant::V2
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable cursor over an immutable source string.
///
/// `position` is a byte offset and always sits on a char boundary with
/// `0 <= position <= source.len()`.
#[derive(Debug)]
pub struct Context<'src> {
    source: &'src str,
    position: usize,
    trivia: Option<TriviaRule>,
    variant: Variant,
    ids: IdGen,
}

impl<'src> Context<'src> {
    pub fn new(source: &'src str, variant: Variant) -> Self {
        Context {
            source,
            position: 0,
            trivia: Some(terminal::trivia as TriviaRule),
            variant,
            ids: IdGen::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor back to a previously observed position.
    pub fn reset(&mut self, position: usize) {
        debug_assert!(position <= self.source.len());
        debug_assert!(self.source.is_char_boundary(position));
        self.position = position;
    }

    pub fn rest(&self) -> &'src str {
        &self.source[self.position..]
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn advance(&mut self, bytes: usize) {
        self.reset(self.position + bytes);
    }

    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn trivia(&self) -> Option<TriviaRule> {
        self.trivia
    }

    /// Run `f` with `trivia` installed, restoring the previous rule after.
    pub fn with_trivia<T>(
        &mut self,
        trivia: Option<TriviaRule>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.trivia, trivia);
        let out = f(self);
        self.trivia = saved;
        out
    }

    pub fn leaf(&mut self, text: impl Into<String>) -> Cst {
        Cst::leaf(&mut self.ids, text)
    }

    pub fn node(&mut self, kind: &'static str, children: Vec<Cst>) -> Cst {
        Cst::node(&mut self.ids, kind, children)
    }
}
