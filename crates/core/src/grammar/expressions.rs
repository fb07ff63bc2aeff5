//! Expression productions: the precedence ladder from the ternary
//! conditional down to primaries and their suffix chains.

use super::literals::{bool_literal, integer_literal, null_literal, string_literal};
use super::{id, keyword, parameter_list, type_id};
use crate::combinator::{alt, collapse, field, group, inter, node, not, opt, rule, star, when, Rule};
use crate::context::{Context, Variant};
use crate::cst::{flatten, Cst};
use crate::terminal::{lex, lit};

const OPERATOR: &str = "Operator";

pub(crate) fn expression(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    conditional(ctx, acc)
}

/// `cond ? a : b`, right associative.
fn conditional(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    collapse(
        "Conditional",
        (
            field("condition", or),
            opt((
                lit("?"),
                field("thenBranch", or),
                lit(":"),
                field("elseBranch", conditional),
            )),
        ),
    )
    .parse(ctx, acc)
}

/// One left-associative precedence level.
///
/// Operands and operators are kept flat in source order; the first operand
/// is tagged `left` and every later one `right`. Without any operator the
/// operand is passed through as is.
fn binary<P: Rule, O: Rule>(kind: &'static str, operand: P, operator: O) -> impl Rule {
    let chain = inter(operand, field("op", node(OPERATOR, operator)));
    rule(move |ctx, acc| {
        let start = ctx.position();
        let mut items = Vec::new();
        if !chain.parse(ctx, &mut items) {
            ctx.reset(start);
            return false;
        }
        let mut items = flatten(items);
        if !items.iter().any(|item| item.is_kind(OPERATOR)) {
            for mut item in items {
                item.clear_field();
                acc.push(item);
            }
            return true;
        }
        let mut side = "left";
        for item in items.iter_mut() {
            if item.is_node() && !item.is_trivia() && !item.is_kind(OPERATOR) {
                item.set_field(side);
                side = "right";
            }
        }
        let level = ctx.node(kind, items);
        acc.push(level);
        true
    })
}

/// `sym`, unless it is the start of the longer operator `sym` + `next`.
fn op_unless(sym: &'static str, next: &'static str) -> impl Rule {
    lex((lit(sym), not(lit(next))))
}

fn or(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("Or", and, lit("||")).parse(ctx, acc)
}

fn and(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("And", bitwise_or, lit("&&")).parse(ctx, acc)
}

fn bitwise_or(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("BitwiseOr", bitwise_xor, op_unless("|", "|")).parse(ctx, acc)
}

fn bitwise_xor(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("BitwiseXor", bitwise_and, lit("^")).parse(ctx, acc)
}

fn bitwise_and(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("BitwiseAnd", equality, op_unless("&", "&")).parse(ctx, acc)
}

fn equality(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("Equality", compare, alt((lit("!="), lit("==")))).parse(ctx, acc)
}

fn compare(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let operator = alt((
        lit("<="),
        op_unless("<", "<"),
        lit(">="),
        op_unless(">", ">"),
    ));
    binary("Compare", shift, operator).parse(ctx, acc)
}

fn shift(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("Shift", add, alt((lit("<<"), lit(">>")))).parse(ctx, acc)
}

fn add(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let operator = alt((op_unless("+", "+"), op_unless("-", "-")));
    binary("Add", mul, operator).parse(ctx, acc)
}

fn mul(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    binary("Mul", unary, alt((lit("*"), lit("/"), lit("%")))).parse(ctx, acc)
}

fn unary(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let prefix = alt((lit("-"), lit("+"), lit("!"), lit("~")));
    collapse(
        "Unary",
        (
            star(field("op", node(OPERATOR, prefix))),
            field("operand", suffix),
        ),
    )
    .parse(ctx, acc)
}

fn suffix(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let unbox = node("SuffixUnboxNotNull", lit("!!"));
    let call = node("SuffixCall", field("params", parameter_list(expression)));
    let access = node("SuffixFieldAccess", (lit("."), field("name", id)));
    collapse(
        "Suffix",
        (
            field("expression", primary),
            star(group("suffix", alt((unbox, call, access)))),
        ),
    )
    .parse(ctx, acc)
}

fn primary(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((
        parens,
        struct_instance,
        integer_literal,
        bool_literal,
        init_of,
        when(Variant::code_of, code_of),
        null_literal,
        string_literal,
        id,
    ))
    .parse(ctx, acc)
}

fn parens(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("Parens", (lit("("), field("child", expression), lit(")"))).parse(ctx, acc)
}

fn struct_field_initializer(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StructFieldInitializer",
        (
            field("name", id),
            opt((lit(":"), field("init", expression))),
        ),
    )
    .parse(ctx, acc)
}

/// `Point { x: 1, y }`. A bare name is shorthand for `y: y`.
fn struct_instance(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StructInstance",
        (
            field("type", type_id),
            lit("{"),
            opt((inter(struct_field_initializer, lit(",")), opt(lit(",")))),
            lit("}"),
        ),
    )
    .parse(ctx, acc)
}

fn init_of(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "InitOf",
        (
            keyword("initOf"),
            field("name", id),
            field("params", parameter_list(expression)),
        ),
    )
    .parse(ctx, acc)
}

fn code_of(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("CodeOf", (keyword("codeOf"), field("name", id))).parse(ctx, acc)
}
