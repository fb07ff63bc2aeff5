//! End-to-end parses of small programs through the public entry points.

use tact_cst::{parse, parse_fragment, parse_imports, Cst, Fragment, Variant};

fn module(source: &str) -> Cst {
    parse(source, "test.tact", Variant::V2)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
}

fn expression(source: &str) -> Cst {
    let fragment = parse_fragment(Fragment::Expression, source, "expr", Variant::V2)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e));
    let first = fragment.nodes().next().cloned().unwrap();
    first
}

fn items(module: &Cst) -> Vec<&Cst> {
    module.children_by_group("item").collect()
}

// ── Concrete programs ────────────────────────────────────────────────

#[test]
fn function_with_parameter_and_return() {
    let m = module("fun foo(a: Int) { return a; }");
    let items = items(&m);
    assert_eq!(items.len(), 1);

    let f = items[0];
    assert!(f.is_kind("Function"));
    assert_eq!(f.child_by_field("name").unwrap().token_text(), "foo");

    let params: Vec<_> = f.child_by_field("parameters").unwrap().nodes().collect();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].child_by_field("name").unwrap().token_text(), "a");
    assert_eq!(params[0].child_by_field("type").unwrap().token_text(), "Int");

    let body = f.child_by_field("body").unwrap();
    let statements: Vec<_> = body.children_by_group("statement").collect();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].is_kind("StatementReturn"));
}

#[test]
fn constant_with_initializer() {
    let m = module("const X: Int = 5;");
    let items = items(&m);
    assert_eq!(items.len(), 1);

    let c = items[0];
    assert!(c.is_kind("Constant"));
    assert_eq!(c.children_by_field("attribute").count(), 0);
    let init = c
        .child_by_field("body")
        .and_then(|b| b.child_by_field("expression"))
        .unwrap();
    assert!(init.is_kind("IntegerLiteral"));
    assert_eq!(init.token_text(), "5");
}

#[test]
fn additive_over_multiplicative() {
    let e = expression("x + y * z");
    assert!(e.is_kind("Add"));
    assert_eq!(e.child_by_field("left").unwrap().token_text(), "x");
    let right = e.child_by_field("right").unwrap();
    assert!(right.is_kind("Mul"));
    assert_eq!(right.token_text(), "y*z");
}

#[test]
fn multiplicative_under_additive() {
    let e = expression("x * y + z");
    assert!(e.is_kind("Add"));
    assert!(e.child_by_field("left").unwrap().is_kind("Mul"));
    assert!(e.child_by_field("right").unwrap().is_kind("Id"));
}

#[test]
fn unterminated_string_fails_at_quote() {
    let err = parse("\"abc", "test.tact", Variant::V2).unwrap_err();
    assert_eq!(err.position(), 0);

    let err = parse_fragment(Fragment::Expression, "\"abc", "expr", Variant::V2).unwrap_err();
    assert_eq!(err.position(), 0);
}

#[test]
fn statement_without_terminator_fails() {
    for variant in Variant::ALL {
        assert!(parse_fragment(Fragment::Statement, "let x = 1", "stmt", variant).is_err());
    }
    assert!(parse_fragment(Fragment::Statement, "let x = 1;", "stmt", Variant::V1).is_ok());
}

// ── Properties on fixed inputs ───────────────────────────────────────

#[test]
fn conditional_nests_in_else_branch() {
    let e = expression("a ? b : c ? d : e");
    assert!(e.is_kind("Conditional"));
    let else_branch = e.child_by_field("elseBranch").unwrap();
    assert!(else_branch.is_kind("Conditional"));
    assert_eq!(else_branch.child_by_field("condition").unwrap().token_text(), "c");
}

#[test]
fn reserved_words_are_rejected_as_names() {
    for word in ["let", "if", "return", "while", "foreach", "const"] {
        let src = format!("fun {}() {{}}", word);
        assert!(parse(&src, "test.tact", Variant::V2).is_err(), "{}", src);
    }
    assert!(parse("fun lethal() {}", "test.tact", Variant::V2).is_ok());
}

#[test]
fn ordered_choice_prefers_struct_instance() {
    // `Foo {}` is taken as an instance even where a block could follow
    let s = parse_fragment(Fragment::Statement, "if Foo {} {}", "stmt", Variant::V2).unwrap();
    let cond = s.nodes().next().unwrap();
    assert!(cond.child_by_field("condition").unwrap().is_kind("StructInstance"));
}

#[test]
fn round_trip_preserves_comments_and_layout() {
    let src = "  // leading\n\nimport \"a\"; /* trailing */\n\nfun f(): Int {\n\treturn 1 + /* inner */ 2; // end\n}\n";
    let m = module(src);
    assert_eq!(m.text(), src);
    assert!(m.children()[0].is_kind("Whitespace"));
    assert!(m.children()[1].is_kind("Comment"));
}

#[test]
fn empty_and_trivia_only_files() {
    assert_eq!(module("").children().len(), 0);
    let m = module("\n// nothing here\n");
    assert_eq!(m.text(), "\n// nothing here\n");
    assert_eq!(items(&m).len(), 0);
}

#[test]
fn parsing_is_deterministic() {
    let src = "contract A { x: Int; get fun x(): Int { return self.x; } }";
    let first = module(src);
    let second = module(src);
    assert_eq!(first, second);
    assert!(first.same_shape(&second));
}

#[test]
fn implicit_terminator_only_in_new_grammar() {
    let src = "fun f(): Int { return 1 }";
    assert!(parse(src, "test.tact", Variant::V2).is_ok());
    let err = parse(src, "test.tact", Variant::V1).unwrap_err();
    assert_eq!(err.position(), 0);
}

#[test]
fn failure_reports_first_unparsed_item() {
    let src = "const A: Int = 1;\nconst B: Int = ;\n";
    let err = parse(src, "test.tact", Variant::V2).unwrap_err();
    assert_eq!(err.position(), src.find("const B").unwrap());
}

#[test]
fn imports_only_stops_after_imports() {
    let src = "import \"@stdlib/ownable\";\nimport \"./types\";\n\nthis is not tact";
    let imports = parse_imports(src, "test.tact", Variant::V2);
    let paths: Vec<_> = imports
        .nodes()
        .filter_map(|n| n.child_by_field("path"))
        .map(Cst::token_text)
        .collect();
    assert_eq!(paths, ["\"@stdlib/ownable\"", "\"./types\""]);
    assert!(parse(src, "test.tact", Variant::V2).is_err());
}

#[test]
fn blank_string_literals_keep_their_body() {
    let m = module("import \"  \";");
    let import = m.nodes().next().unwrap();
    assert_eq!(import.child_by_field("path").unwrap().token_text(), "\"  \"");

    assert_eq!(expression("\"   \"").token_text(), "\"   \"");
    assert_eq!(expression("\"   \" + \"\"").token_text(), "\"   \"+\"\"");
}

#[test]
fn type_fragment() {
    let t = parse_fragment(Fragment::Type, "map<Int as uint8, Address>?", "type", Variant::V2)
        .unwrap();
    let ty = t.nodes().next().unwrap();
    assert!(ty.is_kind("TypeOptional"));
    assert!(ty.child_by_field("type").unwrap().is_kind("TypeMap"));
}

#[test]
fn tree_serializes_to_json() {
    let m = module("primitive Int;");
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["type"], "Module");
    assert_eq!(json["children"][0]["type"], "PrimitiveTypeDecl");
    assert_eq!(json["children"][0]["group"], "item");
}
