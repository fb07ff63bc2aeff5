use super::{id, keyword, type_id};
use crate::combinator::{alt, collapse, field, node, opt, star, Rule};
use crate::context::Context;
use crate::cst::Cst;
use crate::terminal::lit;

fn type_regular(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("TypeRegular", type_id).parse(ctx, acc)
}

/// `map<K as k, V as v>`; both serialization hints are optional.
fn type_map(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "TypeMap",
        (
            keyword("map"),
            lit("<"),
            field("key", type_id),
            opt((keyword("as"), field("keyAs", id))),
            lit(","),
            field("value", type_id),
            opt((keyword("as"), field("valueAs", id))),
            lit(">"),
        ),
    )
    .parse(ctx, acc)
}

fn type_bounced(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "TypeBounced",
        (keyword("bounced"), lit("<"), field("type", type_id), lit(">")),
    )
    .parse(ctx, acc)
}

fn type_primary(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((type_map, type_bounced, type_regular)).parse(ctx, acc)
}

fn type_optional(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    collapse(
        "TypeOptional",
        (field("type", type_primary), star(lit("?"))),
    )
    .parse(ctx, acc)
}

/// A type with any number of `as` serialization suffixes.
pub(crate) fn type_expr(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    collapse(
        "TypeAs",
        (
            field("type", type_optional),
            star((keyword("as"), field("as", id))),
        ),
    )
    .parse(ctx, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Variant;

    fn parse_type(src: &str) -> Option<Cst> {
        let mut ctx = Context::new(src, Variant::V2);
        let mut acc = Vec::new();
        if type_expr(&mut ctx, &mut acc) && ctx.at_end() {
            acc.pop()
        } else {
            None
        }
    }

    #[test]
    fn plain_type_has_no_wrappers() {
        let ty = parse_type("Int").unwrap();
        assert!(ty.is_kind("TypeRegular"));
        assert_eq!(ty.field(), None);
    }

    #[test]
    fn optional_and_serialized() {
        let ty = parse_type("Int? as uint8").unwrap();
        assert!(ty.is_kind("TypeAs"));
        let inner = ty.child_by_field("type").unwrap();
        assert!(inner.is_kind("TypeOptional"));
        assert_eq!(ty.child_by_field("as").unwrap().text(), "uint8");
    }

    #[test]
    fn map_with_hints() {
        let ty = parse_type("map<Int as uint32, Address>").unwrap();
        assert!(ty.is_kind("TypeMap"));
        assert_eq!(ty.child_by_field("key").unwrap().text(), "Int ");
        assert_eq!(ty.child_by_field("keyAs").unwrap().text(), "uint32");
        assert_eq!(ty.child_by_field("value").unwrap().text(), "Address");
        assert!(ty.child_by_field("valueAs").is_none());
    }

    #[test]
    fn bounced_message() {
        let ty = parse_type("bounced<Transfer>").unwrap();
        assert!(ty.is_kind("TypeBounced"));
        assert!(ty.child_by_field("type").unwrap().is_kind("TypeId"));
    }

    #[test]
    fn lowercase_is_not_a_type() {
        assert!(parse_type("int").is_none());
    }
}
