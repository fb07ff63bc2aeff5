//! Parses every `.tact` file under `tests/fixtures` and checks that the
//! tree prints back to the exact source.

use std::path::{Path, PathBuf};

use tact_cst::{parse, Variant};

fn collect_fixtures() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut paths: Vec<_> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", dir.display(), e))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "tact"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn all_fixtures_round_trip() {
    let fixtures = collect_fixtures();
    assert!(!fixtures.is_empty(), "no fixtures found");

    let mut failures = Vec::new();
    for path in &fixtures {
        let source = std::fs::read_to_string(path).unwrap();
        let name = path.display().to_string();
        match parse(&source, &name, Variant::V2) {
            Ok(module) => {
                if module.text() != source {
                    failures.push(format!("{}: round trip changed the text", name));
                }
            }
            Err(e) => failures.push(e.to_string()),
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        fixtures.len(),
        failures.join("\n")
    );
}

#[test]
fn fixture_items_are_grouped() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wallet.tact");
    let source = std::fs::read_to_string(path).unwrap();
    let module = parse(&source, "wallet.tact", Variant::V2).unwrap();

    let kinds: Vec<_> = module
        .children_by_group("item")
        .filter_map(|n| n.kind())
        .collect();
    assert_eq!(kinds, ["Constant", "MessageDecl", "StructDecl", "Contract"]);
    assert_eq!(
        module.nodes().filter(|n| n.is_kind("Import")).count(),
        2
    );
    // the header comment is kept ahead of the first import
    assert!(module.children()[0].is_kind("Comment"));
}

#[test]
fn legacy_grammar_rejects_newer_syntax() {
    // contract parameters, `..` and `codeOf` only exist in the newer grammar
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/traits.tact");
    let source = std::fs::read_to_string(path).unwrap();
    assert!(parse(&source, "traits.tact", Variant::V2).is_ok());
    let err = parse(&source, "traits.tact", Variant::V1).unwrap_err();
    assert_eq!(&source[err.position()..err.position() + 14], "contract Vault");
}
