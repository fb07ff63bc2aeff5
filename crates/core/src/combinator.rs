//! Backtracking PEG combinators.
//!
//! Every rule has the same shape: it receives the parse [`Context`] and an
//! accumulator of children, and returns whether it matched. A rule that
//! returns `false` leaves both the cursor and the accumulator exactly as it
//! found them; every combinator that takes a position snapshot restores it
//! before reporting failure.
//!
//! Tuples are sequences: `(a, b, c)` runs each rule in order into the shared
//! accumulator and fails as a whole if any element fails.

use crate::context::{Context, Variant};
use crate::cst::{flatten, Cst};

/// A grammar rule.
pub trait Rule {
    fn parse(&self, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool;
}

impl<F> Rule for F
where
    F: Fn(&mut Context<'_>, &mut Vec<Cst>) -> bool,
{
    fn parse(&self, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
        self(ctx, acc)
    }
}

/// Pin a closure to the rule signature.
pub fn rule<F>(f: F) -> F
where
    F: Fn(&mut Context<'_>, &mut Vec<Cst>) -> bool,
{
    f
}

macro_rules! impl_sequence {
    ($($name:ident)+) => {
        impl<$($name: Rule),+> Rule for ($($name,)+) {
            #[allow(non_snake_case)]
            fn parse(&self, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
                let ($($name,)+) = self;
                let start = ctx.position();
                let mark = acc.len();
                $(
                    if !$name.parse(ctx, acc) {
                        ctx.reset(start);
                        acc.truncate(mark);
                        return false;
                    }
                )+
                true
            }
        }
    };
}

impl_sequence!(A);
impl_sequence!(A B);
impl_sequence!(A B C);
impl_sequence!(A B C D);
impl_sequence!(A B C D E);
impl_sequence!(A B C D E F);
impl_sequence!(A B C D E F G);
impl_sequence!(A B C D E F G H);
impl_sequence!(A B C D E F G H I);
impl_sequence!(A B C D E F G H I J);
impl_sequence!(A B C D E F G H I J K);
impl_sequence!(A B C D E F G H I J K L);

/// A tuple of rules tried in declaration order.
pub trait Alternatives {
    fn choose(&self, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool;
}

macro_rules! impl_alternatives {
    ($($name:ident)+) => {
        impl<$($name: Rule),+> Alternatives for ($($name,)+) {
            #[allow(non_snake_case)]
            fn choose(&self, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
                let ($($name,)+) = self;
                let start = ctx.position();
                let mark = acc.len();
                $(
                    if $name.parse(ctx, acc) {
                        return true;
                    }
                    ctx.reset(start);
                    acc.truncate(mark);
                )+
                false
            }
        }
    };
}

impl_alternatives!(A B);
impl_alternatives!(A B C);
impl_alternatives!(A B C D);
impl_alternatives!(A B C D E);
impl_alternatives!(A B C D E F);
impl_alternatives!(A B C D E F G);
impl_alternatives!(A B C D E F G H);
impl_alternatives!(A B C D E F G H I);
impl_alternatives!(A B C D E F G H I J);
impl_alternatives!(A B C D E F G H I J K);
impl_alternatives!(A B C D E F G H I J K L);
impl_alternatives!(A B C D E F G H I J K L M);

/// Ordered choice: the first alternative that matches wins.
pub fn alt<A: Alternatives>(alternatives: A) -> impl Rule {
    rule(move |ctx, acc| alternatives.choose(ctx, acc))
}

/// Run `inner` and promote its children to a node of `kind`.
pub fn node<R: Rule>(kind: &'static str, inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mut children = Vec::new();
        if !inner.parse(ctx, &mut children) {
            ctx.reset(start);
            return false;
        }
        let node = ctx.node(kind, children);
        acc.push(node);
        true
    })
}

/// Like [`node`], but a match that produced exactly one node and nothing
/// else is passed through unwrapped.
pub fn collapse<R: Rule>(kind: &'static str, inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mut children = Vec::new();
        if !inner.parse(ctx, &mut children) {
            ctx.reset(start);
            return false;
        }
        let mut children = flatten(children);
        if children.len() == 1 && children[0].is_node() {
            if let Some(mut only) = children.pop() {
                // the role was relative to a wrapper that is not built
                only.clear_field();
                acc.push(only);
            }
        } else {
            let node = ctx.node(kind, children);
            acc.push(node);
        }
        true
    })
}

pub fn opt<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mark = acc.len();
        if !inner.parse(ctx, acc) {
            ctx.reset(start);
            acc.truncate(mark);
        }
        true
    })
}

/// Repeat `inner` until it fails or stops consuming input.
fn repeat<R: Rule>(inner: &R, ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> usize {
    let mut count = 0;
    loop {
        let start = ctx.position();
        let mark = acc.len();
        if !inner.parse(ctx, acc) {
            ctx.reset(start);
            acc.truncate(mark);
            return count;
        }
        count += 1;
        if ctx.position() == start {
            return count;
        }
    }
}

pub fn star<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, acc| {
        repeat(&inner, ctx, acc);
        true
    })
}

pub fn plus<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, acc| repeat(&inner, ctx, acc) > 0)
}

fn probe<R: Rule>(inner: &R, ctx: &mut Context<'_>) -> bool {
    let start = ctx.position();
    let mut scratch = Vec::new();
    let matched = inner.parse(ctx, &mut scratch);
    ctx.reset(start);
    matched
}

/// Positive lookahead. Never consumes input.
pub fn look<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, _acc| probe(&inner, ctx))
}

/// Negative lookahead. Never consumes input.
pub fn not<R: Rule>(inner: R) -> impl Rule {
    rule(move |ctx, _acc| !probe(&inner, ctx))
}

/// One `item`, then any number of `sep item` pairs, as a flat list.
pub fn inter<R: Rule, S: Rule>(item: R, sep: S) -> impl Rule {
    rule(move |ctx, acc| {
        let start = ctx.position();
        if !item.parse(ctx, acc) {
            ctx.reset(start);
            return false;
        }
        loop {
            let before = ctx.position();
            let mark = acc.len();
            if !(sep.parse(ctx, acc) && item.parse(ctx, acc)) {
                ctx.reset(before);
                acc.truncate(mark);
                break;
            }
            if ctx.position() == before {
                break;
            }
        }
        true
    })
}

/// Apply `tag` to the single node `inner` produced. Anything else (several
/// nodes, or only tokens) is wrapped in a node named after the tag.
fn tagged<R: Rule>(
    inner: &R,
    name: &'static str,
    tag: fn(&mut Cst, &'static str),
    ctx: &mut Context<'_>,
    acc: &mut Vec<Cst>,
) -> bool {
    let start = ctx.position();
    let mut children = Vec::new();
    if !inner.parse(ctx, &mut children) {
        ctx.reset(start);
        return false;
    }
    let mut children = flatten(children);
    let targets: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_node() && !c.is_trivia())
        .map(|(i, _)| i)
        .collect();
    match targets.as_slice() {
        [only] => {
            tag(&mut children[*only], name);
            acc.extend(children);
        }
        [] if children.is_empty() => {}
        _ => {
            let mut wrapper = ctx.node(name, children);
            tag(&mut wrapper, name);
            acc.push(wrapper);
        }
    }
    true
}

/// Tag the match with the role it plays in the enclosing production.
pub fn field<R: Rule>(name: &'static str, inner: R) -> impl Rule {
    rule(move |ctx, acc| tagged(&inner, name, Cst::set_field, ctx, acc))
}

/// Tag the match as one arm of the alternation family `name`.
pub fn group<R: Rule>(name: &'static str, inner: R) -> impl Rule {
    rule(move |ctx, acc| tagged(&inner, name, Cst::set_group, ctx, acc))
}

/// Enable `inner` only for grammar variants accepted by `enabled`.
pub fn when<R: Rule>(enabled: fn(Variant) -> bool, inner: R) -> impl Rule {
    rule(move |ctx, acc| enabled(ctx.variant()) && inner.parse(ctx, acc))
}
