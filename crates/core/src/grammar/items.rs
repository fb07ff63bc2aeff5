//! Top-level declarations and the bodies of contracts and traits.

use super::expressions::expression;
use super::literals::{integer_literal, string_literal};
use super::statements::block;
use super::types::type_expr;
use super::{func_id, id, keyword, parameter_list, semicolon, type_id};
use crate::combinator::{alt, field, group, inter, node, not, opt, star, when, Rule};
use crate::context::{Context, Variant};
use crate::cst::Cst;
use crate::terminal::{any, class, lex, lit, stringify};

pub(crate) fn import(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "Import",
        (keyword("import"), field("path", string_literal), lit(";")),
    )
    .parse(ctx, acc)
}

/// Any top-level declaration, tagged with the `item` group.
pub(crate) fn module_item(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    group(
        "item",
        alt((
            primitive_type_decl,
            function,
            asm_function,
            native_function_decl,
            constant,
            struct_decl,
            message_decl,
            contract,
            trait_decl,
        )),
    )
    .parse(ctx, acc)
}

fn primitive_type_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "PrimitiveTypeDecl",
        (keyword("primitive"), field("name", type_id), semicolon),
    )
    .parse(ctx, acc)
}

fn parameter(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "Parameter",
        (field("name", id), lit(":"), field("type", type_expr)),
    )
    .parse(ctx, acc)
}

fn return_type(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    opt((lit(":"), field("returnType", type_expr))).parse(ctx, acc)
}

fn function_attribute(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let getter = (
        keyword("get"),
        opt((lit("("), field("methodId", expression), lit(")"))),
    );
    node(
        "FunctionAttribute",
        alt((
            getter,
            keyword("mutates"),
            keyword("extends"),
            keyword("virtual"),
            keyword("override"),
            keyword("inline"),
            keyword("abstract"),
        )),
    )
    .parse(ctx, acc)
}

fn function(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "Function",
        (
            star(field("attribute", function_attribute)),
            keyword("fun"),
            field("name", id),
            field("parameters", parameter_list(parameter)),
            return_type,
            field(
                "body",
                alt((
                    node("FunctionDefinition", block),
                    node("FunctionDeclaration", semicolon),
                )),
            ),
        ),
    )
    .parse(ctx, acc)
}

/// `( a b -> 1 0 )` stack rearrangement of an assembly function.
fn asm_shuffle(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "AsmShuffle",
        (
            lit("("),
            star(field("arg", id)),
            opt((lit("->"), star(field("ret", integer_literal)))),
            lit(")"),
        ),
    )
    .parse(ctx, acc)
}

/// One piece of an assembly body. Braces must balance; braces inside
/// strings and line comments do not count.
fn asm_item(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((
        (lit("{"), star(asm_item), lit("}")),
        (lit("\""), star((not(lit("\"")), any())), lit("\"")),
        (lit("//"), star((not(lit("\n")), any()))),
        class(|c| c != '{' && c != '}'),
    ))
    .parse(ctx, acc)
}

fn asm_instructions(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node("AsmInstructions", lex(stringify(star(asm_item)))).parse(ctx, acc)
}

fn asm_function(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "AsmFunction",
        (
            keyword("asm"),
            opt(field("shuffle", asm_shuffle)),
            star(field("attribute", function_attribute)),
            keyword("fun"),
            field("name", id),
            field("parameters", parameter_list(parameter)),
            return_type,
            lit("{"),
            field("instructions", asm_instructions),
            lit("}"),
        ),
    )
    .parse(ctx, acc)
}

/// `@name(func_name) native tactName(...): T;`
fn native_function_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "NativeFunctionDecl",
        (
            keyword("@name"),
            lit("("),
            field("nativeName", func_id),
            lit(")"),
            star(field("attribute", function_attribute)),
            keyword("native"),
            field("name", id),
            field("parameters", parameter_list(parameter)),
            return_type,
            semicolon,
        ),
    )
    .parse(ctx, acc)
}

fn constant_attribute(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "ConstantAttribute",
        alt((
            keyword("virtual"),
            keyword("override"),
            keyword("abstract"),
        )),
    )
    .parse(ctx, acc)
}

fn constant(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let definition = node(
        "ConstantDefinition",
        (lit("="), field("expression", expression), semicolon),
    );
    node(
        "Constant",
        (
            star(field("attribute", constant_attribute)),
            keyword("const"),
            field("name", id),
            opt((lit(":"), field("type", type_expr))),
            field(
                "body",
                alt((definition, node("ConstantDeclaration", semicolon))),
            ),
        ),
    )
    .parse(ctx, acc)
}

fn field_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "FieldDecl",
        (
            field("name", id),
            lit(":"),
            field("type", type_expr),
            opt((lit("="), field("initializer", expression))),
        ),
    )
    .parse(ctx, acc)
}

/// `{ a: Int; b: Int; }`, the last `;` optional.
fn struct_body(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    (
        lit("{"),
        opt((inter(field("field", field_decl), lit(";")), opt(lit(";")))),
        lit("}"),
    )
        .parse(ctx, acc)
}

fn struct_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "StructDecl",
        (keyword("struct"), field("name", type_id), struct_body),
    )
    .parse(ctx, acc)
}

fn message_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "MessageDecl",
        (
            keyword("message"),
            opt((lit("("), field("opcode", expression), lit(")"))),
            field("name", type_id),
            struct_body,
        ),
    )
    .parse(ctx, acc)
}

fn contract_attribute(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "ContractAttribute",
        (
            keyword("@interface"),
            lit("("),
            field("name", string_literal),
            lit(")"),
        ),
    )
    .parse(ctx, acc)
}

fn inherited_traits(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    opt((
        keyword("with"),
        inter(field("trait", id), lit(",")),
        opt(lit(",")),
    ))
    .parse(ctx, acc)
}

fn contract_init(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "ContractInit",
        (
            keyword("init"),
            field("parameters", parameter_list(parameter)),
            block,
        ),
    )
    .parse(ctx, acc)
}

/// `receive(msg: Transfer) { }`, `receive("comment") { }`, `bounced(..)`
/// or `external(..)`.
fn receiver(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let kind = alt((
        keyword("bounced"),
        keyword("receive"),
        keyword("external"),
    ));
    node(
        "Receiver",
        (
            field("type", node("ReceiverType", kind)),
            lit("("),
            opt(field("param", alt((parameter, string_literal)))),
            lit(")"),
            block,
        ),
    )
    .parse(ctx, acc)
}

fn storage_field(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    (field_decl, semicolon).parse(ctx, acc)
}

fn contract_item(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((
        contract_init,
        receiver,
        function,
        asm_function,
        constant,
        storage_field,
    ))
    .parse(ctx, acc)
}

fn trait_item(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    alt((receiver, function, asm_function, constant, storage_field)).parse(ctx, acc)
}

fn contract(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    let parameters = when(
        Variant::contract_parameters,
        field("parameters", parameter_list(field_decl)),
    );
    node(
        "Contract",
        (
            star(field("attribute", contract_attribute)),
            keyword("contract"),
            field("name", id),
            opt(parameters),
            inherited_traits,
            lit("{"),
            star(group("declaration", contract_item)),
            lit("}"),
        ),
    )
    .parse(ctx, acc)
}

fn trait_decl(ctx: &mut Context<'_>, acc: &mut Vec<Cst>) -> bool {
    node(
        "Trait",
        (
            star(field("attribute", contract_attribute)),
            keyword("trait"),
            field("name", id),
            inherited_traits,
            lit("{"),
            star(group("declaration", trait_item)),
            lit("}"),
        ),
    )
    .parse(ctx, acc)
}
