//! AST dumpers: S-expressions (one line per top-level statement) and JSON.
//!
//! Both renderings keep the node `type` tag and every declared field, emit optional fields only when
//! present, and mark Error nodes distinctly so tooling can grep for parse failures.

mod json;

pub use json::{node_to_json, program_to_json};

use mpp_syntax::ast::Node;

/// Render a program as S-expressions, one top-level statement per line.
pub fn to_sexp(program: &[Node]) -> String {
    let mut out = String::new();
    for node in program {
        out.push_str(&node.to_string());
        out.push('\n');
    }
    out
}

/// Render a program as pretty-printed JSON.
pub fn to_json_string(program: &[Node]) -> String {
    // Value -> String serialization cannot fail: every map key is a string.
    serde_json::to_string_pretty(&program_to_json(program)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpp_syntax::parser::parse_source;

    #[test]
    fn test_sexp_one_line_per_statement() {
        let out = to_sexp(&parse_source("my $x = 1;\nprint $x;\n"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("(Declaration"));
        assert!(lines[1].starts_with("(Print"));
    }

    #[test]
    fn test_sexp_marks_errors() {
        let out = to_sexp(&parse_source("my $x = ;"));
        assert!(out.contains("(Error "));
    }

    #[test]
    fn test_json_string_parses_back() {
        let text = to_json_string(&parse_source("foo(1, 2);"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["type"], "Call");
        assert_eq!(value[0]["parenthesized"], true);
    }
}
