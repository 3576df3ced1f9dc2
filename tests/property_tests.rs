//! Property-based tests for the MPP front-end
//!
//! These tests use proptest to verify pipeline invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use mpp::ast::has_error_node;
use mpp::classify::{self, category_of, classify_token};
use mpp::format::format_source;
use mpp::{lexer, parser};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Printable ASCII plus newlines and tabs: anything a user might type, valid or not.
fn source_strategy() -> impl Strategy<Value = String> {
    "[ -~\n\t]{0,120}"
}

/// An operand nested in brackets, braces, and calls, with commas only inside delimiters.
fn nested_term_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof!["[0-9]{1,3}", "\\$[a-z]{1,3}"];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|xs| format!("f({})", xs.join(", "))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|xs| format!("[{}]", xs.join(","))),
            (inner.clone(), inner).prop_map(|(k, v)| format!("{{{k} => {v}}}")),
        ]
    })
}

/// Arithmetic/logical expressions with explicit grouping.
fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof!["[0-9]{1,3}", "\\$[a-z]{1,3}", "'[a-z]{0,4}'"];
    let ops = prop::sample::select(vec![
        "+", "-", "*", "/", ".", "**", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "//", "eq", "ne", "%",
    ]);
    leaf.prop_recursive(5, 32, 3, move |inner| {
        prop_oneof![
            (inner.clone(), ops.clone(), inner.clone()).prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|a| format!("({a})")),
            inner.clone().prop_map(|a| format!("!({a})")),
            inner.clone().prop_map(|a| format!("-({a})")),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, t, e)| format!("{c} ? {t} : {e}")),
            prop::collection::vec(inner, 0..3).prop_map(|xs| format!("foo({})", xs.join(", "))),
        ]
    })
}

/// A complete statement that parses as exactly one top-level node.
fn valid_statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        expression_strategy().prop_map(|e| format!("my $r = {e};")),
        expression_strategy().prop_map(|e| format!("$total += {e};")),
        nested_term_strategy().prop_map(|t| format!("push @out, {t};")),
        "h_[a-z]{1,5}".prop_map(|name| format!("sub {name} {{ return 1; }}")),
    ]
}

/// A one-line statement with a syntax error that still ends at its own `;`.
fn malformed_statement_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "$x = ;",
        "foo(1, 2;",
        "my $y = 1 +;",
        "print (;",
        "$a $b;",
        "$a ? 1;",
        "if $x;",
    ])
}

fn program_with(statements: &[String], at: usize, middle: &str) -> String {
    let mut lines: Vec<&str> = statements.iter().map(String::as_str).collect();
    lines.insert(at, middle);
    lines.join("\n")
}

// =============================================================================
// Pipeline Properties
// =============================================================================

proptest! {
    /// Property: the pipeline terminates on any input and yields a finite statement list
    #[test]
    fn pipeline_is_total(source in source_strategy()) {
        let program = parser::parse_source(&source);
        prop_assert!(program.len() <= source.len() + 1);
    }

    /// Property: token positions never move backwards
    #[test]
    fn token_positions_are_monotonic(source in source_strategy()) {
        let tokens = lexer::lex(&source);
        for pair in tokens.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                (a.line, a.column) <= (b.line, b.column),
                "{} came before {}", a, b
            );
        }
        for token in &tokens {
            prop_assert!(token.line >= 1 && token.column >= 1);
        }
    }

    /// Property: classification is a pure function of the token
    #[test]
    fn classification_is_total_and_pure(source in source_strategy()) {
        for token in lexer::lex(&source) {
            let category = category_of(&token);
            prop_assert_eq!(category, category_of(&token));
            prop_assert_eq!(classify_token(token).category, category);
        }
    }

    /// Property: splitting source into two chunks anywhere does not change the parse
    #[test]
    fn chunk_boundaries_are_invisible(source in source_strategy(), cut in any::<prop::sample::Index>()) {
        let at = cut.index(source.len() + 1);
        let (head, tail) = source.split_at(at);
        let streamed: Vec<_> = parser::parse_chunks([head, tail]).collect();
        prop_assert_eq!(streamed, parser::parse_source(&source));
    }

    /// Property: a malformed statement costs exactly its own slot and leaves its neighbours intact
    #[test]
    fn malformed_statement_is_contained(
        statements in prop::collection::vec(valid_statement_strategy(), 1..6),
        broken in malformed_statement_strategy(),
        slot in any::<prop::sample::Index>(),
    ) {
        let at = slot.index(statements.len() + 1);
        let damaged = parser::parse_source(&program_with(&statements, at, broken));
        let repaired = parser::parse_source(&program_with(&statements, at, "1;"));

        prop_assert_eq!(damaged.len(), repaired.len());
        prop_assert_eq!(repaired.len(), statements.len() + 1);
        prop_assert!(has_error_node(&damaged[at..=at]), "{} parsed as {}", broken, damaged[at]);
        prop_assert_eq!(&damaged[..at], &repaired[..at]);
        prop_assert_eq!(&damaged[at + 1..], &repaired[at + 1..]);
    }

    /// Property: top-level comma splitting ignores commas inside any mix of delimiters
    #[test]
    fn comma_splitting_is_depth_aware(terms in prop::collection::vec(nested_term_strategy(), 1..5)) {
        let source = terms.join(", ");
        let lexemes = classify::lexemes(&source);
        prop_assert_eq!(parser::split_top_level_commas(&lexemes).len(), terms.len());
    }

    /// Property: an opening delimiter's match is the last lexeme of its group
    #[test]
    fn delimiter_matching_finds_group_end(term in nested_term_strategy()) {
        let source = format!("({term})");
        let lexemes = classify::lexemes(&source);
        prop_assert_eq!(parser::find_matching(&lexemes, 0), Some(lexemes.len() - 1));
    }
}

// =============================================================================
// Format Properties
// =============================================================================

proptest! {
    /// Property: parse → format → parse yields the same tree
    #[test]
    fn formatting_preserves_expression_trees(expr in expression_strategy()) {
        let source = format!("my $r = {expr};");
        let original = parser::parse_source(&source);
        prop_assume!(!has_error_node(&original));

        let formatted = format_source(&source).expect("clean source formats");
        prop_assert_eq!(&original, &parser::parse_source(&formatted), "formatted as {}", formatted);
    }

    /// Property: formatting is idempotent
    #[test]
    fn formatting_is_idempotent(expr in expression_strategy()) {
        let source = format!("print {expr};\n");
        prop_assume!(!has_error_node(&parser::parse_source(&source)));

        let once = format_source(&source).expect("clean source formats");
        let twice = format_source(&once).expect("formatted source formats");
        prop_assert_eq!(once, twice);
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    /// Property: Empty or whitespace-only input formats to nothing
    #[test]
    fn format_handles_empty_input() {
        for source in ["", "   ", "\n\n\n", "\t\t", ";;"] {
            assert_eq!(format_source(source).unwrap(), "", "input {source:?}");
        }
    }
}
