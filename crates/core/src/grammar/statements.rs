use super::expressions::expression;
use super::types::type_expr;
use super::{id, keyword, semicolon, type_id};
use crate::combinator::{alt, field, group, inter, node, not, opt, star, when, Rule};
use crate::context::{Context, Variant};
use crate::cst::Cst;
use crate::terminal::{lex, lit};

/// `{ statement* }`, left anonymous so the statements land in the
/// enclosing production.
pub(crate) fn block(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    (lit("{"), star(statement), lit("}")).parse(ctx, acc)
}

/// Any statement, tagged with the `statement` group.
pub(crate) fn statement(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    group(
        "statement",
        alt((
            statement_let,
            statement_destruct,
            statement_block,
            statement_return,
            statement_condition,
            statement_while,
            statement_repeat,
            statement_until,
            statement_try,
            statement_foreach,
            statement_expression,
            statement_assign,
            statement_augmented_assign,
        )),
    )
    .parse(ctx, acc)
}

fn statement_let(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementLet",
        (
            keyword("let"),
            field("name", id),
            opt((lit(":"), field("type", type_expr))),
            lit("="),
            field("init", expression),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

fn regular_field(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "RegularField",
        (field("fieldName", id), lit(":"), field("varName", id)),
    )
    .parse(ctx, acc)
}

fn punned_field(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("PunnedField", field("name", id)).parse(ctx, acc)
}

fn rest_argument(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    when(Variant::destruct_rest, node("RestArgument", lit(".."))).parse(ctx, acc)
}

/// `let Point { x: px, y, .. } = p;`
fn statement_destruct(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let items = inter(alt((regular_field, punned_field)), lit(","));
    let tail = opt(alt(((lit(","), rest_argument), lit(","))));
    node(
        "StatementDestruct",
        (
            keyword("let"),
            field("type", type_id),
            lit("{"),
            opt(alt(((items, tail), rest_argument))),
            lit("}"),
            lit("="),
            field("init", expression),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

fn statement_block(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("StatementBlock", block).parse(ctx, acc)
}

fn statement_return(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementReturn",
        (
            keyword("return"),
            opt(field("expression", expression)),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

/// `if c { } else if d { } else { }`: an `else if` nests another
/// condition as the false branch.
fn statement_condition(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementCondition",
        (
            keyword("if"),
            field("condition", expression),
            block,
            opt((
                keyword("else"),
                field(
                    "falseBranch",
                    alt((node("FalseBranch", block), statement_condition)),
                ),
            )),
        ),
    )
    .parse(ctx, acc)
}

fn statement_while(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementWhile",
        (
            keyword("while"),
            lit("("),
            field("condition", expression),
            lit(")"),
            block,
        ),
    )
    .parse(ctx, acc)
}

fn statement_repeat(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementRepeat",
        (
            keyword("repeat"),
            lit("("),
            field("iterations", expression),
            lit(")"),
            block,
        ),
    )
    .parse(ctx, acc)
}

fn statement_until(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementUntil",
        (
            keyword("do"),
            block,
            keyword("until"),
            lit("("),
            field("condition", expression),
            lit(")"),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

fn catch_clause(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "CatchClause",
        (
            keyword("catch"),
            lit("("),
            field("name", id),
            lit(")"),
            block,
        ),
    )
    .parse(ctx, acc)
}

fn statement_try(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementTry",
        (keyword("try"), block, opt(field("handler", catch_clause))),
    )
    .parse(ctx, acc)
}

fn statement_foreach(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementForEach",
        (
            keyword("foreach"),
            lit("("),
            field("key", id),
            lit(","),
            field("value", id),
            keyword("in"),
            field("expression", expression),
            lit(")"),
            block,
        ),
    )
    .parse(ctx, acc)
}

fn statement_expression(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementExpression",
        (field("expression", expression), semicolon),
    )
    .parse(ctx, acc)
}

fn statement_assign(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StatementAssign",
        (
            field("left", expression),
            lex((lit("="), not(lit("=")))),
            field("right", expression),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

fn statement_augmented_assign(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let operator = alt((
        lit("||="),
        lit("&&="),
        lit(">>="),
        lit("<<="),
        lit("-="),
        lit("+="),
        lit("*="),
        lit("/="),
        lit("%="),
        lit("|="),
        lit("&="),
        lit("^="),
    ));
    node(
        "StatementAugmentedAssign",
        (
            field("left", expression),
            field("operator", node("Operator", operator)),
            field("right", expression),
            semicolon,
        ),
    )
    .parse(ctx, acc)
}
