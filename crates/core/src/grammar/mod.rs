//! Grammar table for Tact source files, and the parse entry points.
//!
//! Productions are plain functions with the [`Rule`] signature so that they
//! can refer to each other recursively. Each one builds its combinator chain
//! on the spot; the chains are zero-sized or close to it.

mod expressions;
mod items;
mod literals;
mod statements;
mod types;

use tracing::debug;

use crate::combinator::{alt, inter, look, node, not, opt, plus, star, when, Rule};
use crate::context::{Context, Variant};
use crate::cst::Cst;
use crate::error::ParseError;
use crate::terminal::{class, lex, lit, skip_trivia, stringify};

/// A part of a source file that can be parsed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Expression,
    Statement,
    Type,
}

/// Parse a whole source file into a `Module` node.
///
/// `path` is only carried into the error. The whole input must match;
/// otherwise the error holds the offset of the first item that could not
/// be parsed.
pub fn parse(source: &str, path: &str, variant: Variant) -> Result<Cst, ParseError> {
    debug!(path, %variant, bytes = source.len(), "parsing module");
    let mut ctx = Context::new(source, variant);
    let mut children = Vec::new();
    module_body(&mut ctx, &mut children);
    if !ctx.at_end() {
        debug!(path, position = ctx.position(), "module stopped matching");
        return Err(ParseError::no_match(path, ctx.position()));
    }
    let module = ctx.node("Module", children);
    debug!(path, leaves = module.leaf_count(), "parsed module");
    Ok(module)
}

/// Parse only the leading imports of a file into a `JustImports` node.
///
/// Whatever follows the last import is ignored, so this never fails.
pub fn parse_imports(source: &str, path: &str, variant: Variant) -> Cst {
    let mut ctx = Context::new(source, variant);
    let mut children = Vec::new();
    leading_trivia(&mut ctx, &mut children);
    star(items::import).parse(&mut ctx, &mut children);
    let imports = ctx.node("JustImports", children);
    debug!(
        path,
        %variant,
        imports = imports.nodes().count(),
        "parsed imports"
    );
    imports
}

/// Parse a single expression, statement or type into a `Fragment` node.
pub fn parse_fragment(
    fragment: Fragment,
    source: &str,
    path: &str,
    variant: Variant,
) -> Result<Cst, ParseError> {
    debug!(path, ?fragment, %variant, "parsing fragment");
    let mut ctx = Context::new(source, variant);
    let mut children = Vec::new();
    leading_trivia(&mut ctx, &mut children);
    let matched = match fragment {
        Fragment::Expression => expressions::expression(&mut ctx, &mut children),
        Fragment::Statement => statements::statement(&mut ctx, &mut children),
        Fragment::Type => types::type_expr(&mut ctx, &mut children),
    };
    if !matched || !ctx.at_end() {
        return Err(ParseError::no_match(path, ctx.position()));
    }
    Ok(ctx.node("Fragment", children))
}

fn module_body(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    (
        leading_trivia,
        star(items::import),
        star(items::module_item),
    )
        .parse(ctx, acc)
}

/// Trivia before the first token of the input.
fn leading_trivia(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    skip_trivia(ctx, acc);
    true
}

// ── Lexical productions ──────────────────────────────────────────────

const RESERVED: &[&str] = &[
    "extend",
    "public",
    "fun",
    "let",
    "return",
    "receive",
    "native",
    "primitive",
    "null",
    "if",
    "else",
    "while",
    "repeat",
    "do",
    "until",
    "try",
    "catch",
    "foreach",
    "as",
    "map",
    "mutates",
    "extends",
    "external",
    "import",
    "with",
    "trait",
    "initOf",
    "override",
    "abstract",
    "virtual",
    "inline",
    "const",
];

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_id_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `word`, not followed by another identifier character.
pub(crate) fn keyword(word: &'static str) -> impl Rule {
    lex((lit(word), not(class(is_id_part))))
}

fn reserved_word(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    RESERVED.iter().any(|word| keyword(*word).parse(ctx, acc))
}

pub(crate) fn id(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "Id",
        lex((
            not(reserved_word),
            stringify((class(is_id_start), star(class(is_id_part)))),
        )),
    )
    .parse(ctx, acc)
}

pub(crate) fn type_id(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "TypeId",
        lex(stringify((
            class(|c| c.is_ascii_uppercase()),
            star(class(is_id_part)),
        ))),
    )
    .parse(ctx, acc)
}

fn is_func_id_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | ',' | '.' | ';' | '~')
}

/// Name of a FunC function bound by a native declaration.
pub(crate) fn func_id(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let quoted = (lit("`"), star((not(lit("`")), class(|c| c != '\n'))), lit("`"));
    node(
        "FuncId",
        lex((
            opt(alt((lit("."), lit("~")))),
            stringify(alt((quoted, plus(class(is_func_id_char))))),
        )),
    )
    .parse(ctx, acc)
}

/// Statement and declaration terminator. Newer grammars accept a missing
/// `;` right before `}`.
pub(crate) fn semicolon(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((lit(";"), when(Variant::implicit_terminator, look(lit("}"))))).parse(ctx, acc)
}

/// `( item, item, ... )` with an optional trailing comma.
pub(crate) fn parameter_list<R: Rule>(item: R) -> impl Rule {
    node(
        "ParameterList",
        (lit("("), opt((inter(item, lit(",")), opt(lit(",")))), lit(")")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: fn(&mut Context<'_>, &mut Vec<Cst>) -> bool, src: &str) -> Option<Cst> {
        let mut ctx = Context::new(src, Variant::V2);
        let mut acc = Vec::new();
        if rule(&mut ctx, &mut acc) && ctx.at_end() {
            acc.pop()
        } else {
            None
        }
    }

    #[test]
    fn reserved_words_are_not_identifiers() {
        for word in ["let", "if", "return", "fun", "initOf", "const"] {
            assert!(run(id, word).is_none(), "{word} parsed as identifier");
        }
    }

    #[test]
    fn identifiers_may_start_with_reserved_words() {
        for word in ["lethal", "iffy", "returns", "constant", "_let", "as1"] {
            let parsed = run(id, word).unwrap_or_else(|| panic!("{word} rejected"));
            assert!(parsed.is_kind("Id"));
            assert_eq!(parsed.text(), word);
        }
    }

    #[test]
    fn keyword_requires_word_boundary() {
        let mut ctx = Context::new("letx = 1", Variant::V2);
        let mut acc = Vec::new();
        assert!(!keyword("let").parse(&mut ctx, &mut acc));
        assert_eq!(ctx.position(), 0);

        let mut ctx = Context::new("let(", Variant::V2);
        assert!(keyword("let").parse(&mut ctx, &mut acc));
        assert_eq!(ctx.position(), 3);
    }

    #[test]
    fn type_ids_start_uppercase() {
        assert!(run(type_id, "Int").is_some());
        assert!(run(type_id, "int").is_none());
    }

    #[test]
    fn func_ids_accept_func_names() {
        let parsed = run(func_id, "~load_uint").unwrap();
        assert!(parsed.is_kind("FuncId"));
        assert!(run(func_id, "`weird name`").is_some());
        assert!(run(func_id, "__tact_my?fn").is_some());
    }

    #[test]
    fn terminator_leniency_depends_on_variant() {
        let mut ctx = Context::new("}", Variant::V2);
        let mut acc = Vec::new();
        assert!(semicolon(&mut ctx, &mut acc));
        assert_eq!(ctx.position(), 0);
        assert!(acc.is_empty());

        let mut ctx = Context::new("}", Variant::V1);
        assert!(!semicolon(&mut ctx, &mut acc));
    }

    #[test]
    fn imports_only_ignores_the_rest() {
        let src = "// deps\nimport \"@stdlib/deploy\";\nimport \"./util\";\ncontract A {";
        let imports = parse_imports(src, "a.tact", Variant::V2);
        assert!(imports.is_kind("JustImports"));
        assert_eq!(imports.nodes().filter(|n| n.is_kind("Import")).count(), 2);
        assert!(src.starts_with(&imports.text()));
    }

    #[test]
    fn fragment_requires_full_input() {
        let parsed = parse_fragment(Fragment::Expression, "a + b", "f", Variant::V2).unwrap();
        assert!(parsed.nodes().next().unwrap().is_kind("Add"));

        let err = parse_fragment(Fragment::Expression, "a + ", "f", Variant::V2).unwrap_err();
        assert_eq!(err.position(), 2);
    }
}
