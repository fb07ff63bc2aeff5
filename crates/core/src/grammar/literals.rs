use super::keyword;
use crate::combinator::{alt, field, node, opt, star, Rule};
use crate::context::Context;
use crate::cst::Cst;
use crate::terminal::{class, lex, lit, stringify};

/// Digits of one class, with single `_` separators between them.
fn underscored(digit: fn(char) -> bool) -> impl Rule {
    (class(digit), star((opt(lit("_")), class(digit))))
}

fn hex_digit() -> impl Rule {
    class(|c| c.is_ascii_hexdigit())
}

fn integer_hex(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "IntegerLiteralHex",
        lex(stringify((
            lit("0"),
            class(|c| matches!(c, 'x' | 'X')),
            underscored(|c| c.is_ascii_hexdigit()),
        ))),
    )
    .parse(ctx, acc)
}

fn integer_bin(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "IntegerLiteralBin",
        lex(stringify((
            lit("0"),
            class(|c| matches!(c, 'b' | 'B')),
            underscored(|c| matches!(c, '0' | '1')),
        ))),
    )
    .parse(ctx, acc)
}

fn integer_oct(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "IntegerLiteralOct",
        lex(stringify((
            lit("0"),
            class(|c| matches!(c, 'o' | 'O')),
            underscored(|c| matches!(c, '0'..='7')),
        ))),
    )
    .parse(ctx, acc)
}

fn integer_dec(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "IntegerLiteralDec",
        lex(stringify(underscored(|c| c.is_ascii_digit()))),
    )
    .parse(ctx, acc)
}

pub(crate) fn integer_literal(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "IntegerLiteral",
        field(
            "value",
            alt((integer_hex, integer_bin, integer_oct, integer_dec)),
        ),
    )
    .parse(ctx, acc)
}

pub(crate) fn bool_literal(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("BoolLiteral", alt((keyword("true"), keyword("false")))).parse(ctx, acc)
}

pub(crate) fn null_literal(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("Null", keyword("null")).parse(ctx, acc)
}

fn is_string_char(c: char) -> bool {
    !matches!(c, '"' | '\\' | '\n' | '\r')
}

fn escape(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    (
        lit("\\"),
        alt((
            class(|c| matches!(c, '\\' | '"' | 'n' | 'r' | 't' | 'v' | 'b' | 'f')),
            (
                lit("u{"),
                hex_digit(),
                opt(hex_digit()),
                opt(hex_digit()),
                opt(hex_digit()),
                opt(hex_digit()),
                opt(hex_digit()),
                lit("}"),
            ),
            (lit("u"), hex_digit(), hex_digit(), hex_digit(), hex_digit()),
            (lit("x"), hex_digit(), hex_digit()),
        )),
    )
        .parse(ctx, acc)
}

/// `"..."`: the quotes and the raw body are three separate leaves.
pub(crate) fn string_literal(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StringLiteral",
        lex((
            lit("\""),
            stringify(star(alt((class(is_string_char), escape)))),
            lit("\""),
        )),
    )
    .parse(ctx, acc)
}
