//! Terminal matchers, the trivia skipper and lexical mode.
//!
//! Every terminal, once matched, skips the trivia that follows it using the
//! context's current trivia rule, so trivia always trails the token it
//! follows. [`lex`] suspends that for the duration of an atomic token and
//! [`stringify`] collapses a match into one leaf of raw text.

use crate::combinator::{alt, node, not, plus, rule, star, Rule};
use crate::context::Context;
use crate::cst::{Cst, ANONYMOUS, COMMENT, WHITESPACE};

/// Push the matched span, plus any trivia after it, as one anonymous node.
fn emit(ctx: &mut Context<'_>, acc: &mut Vec<Cst>, start: usize) {
    let text = ctx.slice(start, ctx.position());
    let mut children = vec![ctx.leaf(text)];
    skip_trivia(ctx, &mut children);
    let token = ctx.node(ANONYMOUS, children);
    acc.push(token);
}

/// Consume trivia with the context's current trivia rule, if any.
pub fn skip_trivia(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) {
    let Some(trivia) = ctx.trivia() else {
        return;
    };
    ctx.with_trivia(None, |ctx| {
        let start = ctx.position();
        let mark = acc.len();
        if !trivia(ctx, acc) {
            ctx.reset(start);
            acc.truncate(mark);
        }
    });
}

/// One character satisfying `pred`.
pub fn class(pred: fn(char) -> bool) -> impl Rule {
    rule(move |ctx, acc| match ctx.peek_char() {
        Some(c) if pred(c) => {
            let start = ctx.position();
            ctx.advance(c.len_utf8());
            emit(ctx, acc, start);
            true
        }
        _ => false,
    })
}

/// The exact string `text`.
pub fn lit(text: &'static str) -> impl Rule {
    rule(move |ctx, acc| {
        if !ctx.rest().starts_with(text) {
            return false;
        }
        let start = ctx.position();
        ctx.advance(text.len());
        emit(ctx, acc, start);
        true
    })
}

/// Any single character.
pub fn any() -> impl Rule {
    class(|_| true)
}

/// Matches only at the end of input.
pub fn eof() -> impl Rule {
    rule(|ctx, _acc| ctx.at_end())
}

/// Match `inner` as one atomic token: no trivia inside, trivia once after.
pub fn lex<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mut children = Vec::new();
        if !ctx.with_trivia(None, |ctx| inner.parse(ctx, &mut children)) {
            ctx.reset(start);
            return false;
        }
        skip_trivia(ctx, &mut children);
        let token = ctx.node(ANONYMOUS, children);
        acc.push(token);
        true
    })
}

/// Replace whatever `inner` builds with a single leaf of the text it spans.
pub fn stringify<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mut scratch = Vec::new();
        if !inner.parse(ctx, &mut scratch) {
            ctx.reset(start);
            return false;
        }
        let text = ctx.slice(start, ctx.position());
        let leaf = ctx.leaf(text);
        acc.push(leaf);
        true
    })
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn whitespace(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(WHITESPACE, stringify(plus(class(is_space)))).parse(ctx, acc)
}

fn comment(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let line = (lit("//"), star((not(lit("\n")), any())));
    let block = (lit("/*"), star((not(lit("*/")), any())), lit("*/"));
    node(COMMENT, stringify(alt((line, block)))).parse(ctx, acc)
}

/// Default trivia: whitespace runs and comments, greedily. Block comments
/// do not nest.
pub fn trivia(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    plus(alt((whitespace, comment))).parse(ctx, acc)
}
