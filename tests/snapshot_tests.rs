//! Golden snapshot tests for AST dumps and formatter output
//!
//! These tests render fixed inputs and compare the output against stored
//! snapshots, so any change to tree shape or layout is reviewed and intentional.
//!
//! Run with: `cargo test --test snapshot_tests`
//! Review changes: `cargo insta review`

use std::fs;

use mpp::{dump, format_source, parser};

/// Load a fixture from the valid fixtures directory
fn load_fixture(name: &str) -> String {
    let path = format!("tests/fixtures/valid/{}.mpp", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {}", path))
}

fn sexp(source: &str) -> String {
    dump::to_sexp(&parser::parse_source(source))
}

#[test]
fn test_precedence_sexp() {
    let output = sexp("1 + 2 * 3;\n2 ** 3 ** 2;\n$a = $b = 5;\n1 ? 2 : 3 ? 4 : 5;\n");
    insta::assert_snapshot!("precedence", output);
}

#[test]
fn test_error_recovery_sexp() {
    let output = sexp("foo(1, 2;\nbar();\nmy $x = 1 +;\nprint $x;\n}\nsay 'done';\n");
    insta::assert_snapshot!("error_recovery", output);
}

#[test]
fn test_classes_fixture_sexp() {
    let output = sexp(&load_fixture("classes"));
    insta::assert_snapshot!("classes_sexp", output);
}

#[test]
fn test_classes_fixture_formatted() {
    let output = format_source(&load_fixture("classes")).expect("fixture formats");
    insta::assert_snapshot!("classes_formatted", output);
}

#[test]
fn test_declaration_json() {
    let output = dump::to_json_string(&parser::parse_source("my $x = 10;"));
    insta::assert_snapshot!("declaration_json", output);
}
