//! Integration tests for the MPP front-end pipeline

use std::fs;
use std::path::{Path, PathBuf};

use mpp::ast::{Node, find_error_nodes, has_error_node};
use mpp::{classify, dump, format_source, lexer, parser};

/// Collect `.mpp` fixtures from a directory, sorted by name.
fn fixtures(dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(Path::new(dir))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "mpp"))
        .collect();
    files.sort();
    files
}

/// Test that all valid fixtures parse without error nodes
#[test]
fn test_valid_fixtures() {
    let files = fixtures("tests/fixtures/valid");
    assert!(!files.is_empty());
    for path in files {
        let source = fs::read_to_string(&path).unwrap();
        let program = parser::parse_source(&source);
        let errors = find_error_nodes(&program);
        assert!(errors.is_empty(), "Expected {} to parse cleanly, got {:?}", path.display(), errors);
    }
}

/// Test that invalid fixtures produce errors without losing the statements around them
#[test]
fn test_invalid_fixtures() {
    let files = fixtures("tests/fixtures/invalid");
    assert!(!files.is_empty());
    for path in files {
        let source = fs::read_to_string(&path).unwrap();
        let program = parser::parse_source(&source);
        assert!(has_error_node(&program), "Expected errors in {}", path.display());
        assert!(program.len() >= 2, "{} lost its neighbouring statement", path.display());
    }
}

/// Formatting a valid fixture keeps its tree and is stable
#[test]
fn test_fixtures_round_trip_through_formatter() {
    for path in fixtures("tests/fixtures/valid") {
        let source = fs::read_to_string(&path).unwrap();
        let formatted = format_source(&source).unwrap();
        assert_eq!(
            parser::parse_source(&source),
            parser::parse_source(&formatted),
            "formatting changed the tree of {}:\n{}",
            path.display(),
            formatted
        );
        assert_eq!(format_source(&formatted).unwrap(), formatted);
    }
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_declaration_scenario() {
        let program = parser::parse_source("my $x = 10;");
        assert_eq!(program.len(), 1);
        assert_eq!(
            program[0],
            Node::Declaration {
                declarator: "my".to_string(),
                variables: vec![Node::variable('$', "x")],
                initializer: Some(Box::new(Node::number("10"))),
                parenthesized: false,
            }
        );
    }

    #[test]
    fn test_fat_comma_scenario() {
        let program = parser::parse_source("my %h = { foo => 1 };");
        assert_eq!(
            program[0].to_string(),
            "(Declaration my (Variable %h) :initializer (HashLiteral (Pair (String \"foo\") (Number 1))))"
        );
    }

    #[test]
    fn test_if_elsif_else_is_one_statement() {
        let program =
            parser::parse_source("if ($x > 5) { return 1; } elsif ($x > 0) { return 2; } else { return 3; }");
        assert_eq!(program.len(), 1);
        let Node::If {
            elsif_clauses,
            else_block,
            ..
        } = &program[0]
        else {
            panic!("Expected If, got {}", program[0]);
        };
        assert_eq!(elsif_clauses.len(), 1);
        assert!(else_block.is_some());
    }

    #[test]
    fn test_missing_right_hand_side_is_contained() {
        let program = parser::parse_source("$x = ;\nprint 1;\n");
        assert_eq!(program.len(), 2);
        let Node::Assignment { value, .. } = &program[0] else {
            panic!("Expected Assignment, got {}", program[0]);
        };
        assert!(value.is_error());
        assert!(!has_error_node(&program[1..]));
    }

    #[test]
    fn test_unterminated_string_scenario() {
        let lexemes = classify::lexemes("\"unterminated");
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].category.name(), "TOKEN_ERROR");

        let program = parser::parse_source("\"unterminated");
        let error = program[0].as_error().unwrap();
        assert_eq!(error.message, "Unterminated string literal");
        assert_eq!((error.line, error.column), (1, 1));
    }

    #[test]
    fn test_ternary_before_postfix_if() {
        let program = parser::parse_source("$x ? 1 : 2 if $y;");
        assert_eq!(
            program[0].to_string(),
            "(If (Variable $y) (block (Ternary (Variable $x) (Number 1) (Number 2))) :postfix)"
        );
    }
}

mod streaming_tests {
    use super::*;

    #[test]
    fn test_single_character_chunks_match_whole_source() {
        let source = fs::read_to_string("tests/fixtures/valid/subs.mpp").unwrap();
        let chars: Vec<String> = source.chars().map(String::from).collect();
        let streamed: Vec<Node> = parser::parse_chunks(chars).collect();
        assert_eq!(streamed, parser::parse_source(&source));
    }

    #[test]
    fn test_stages_compose_by_hand() {
        let tokens = lexer::tokenize(["print ", "1;"]);
        let lexemes = classify::classify(tokens);
        let program: Vec<Node> = parser::parse(lexemes).collect();
        assert_eq!(program.len(), 1);
        assert!(matches!(program[0], Node::Print { .. }));
    }

    #[test]
    fn test_independent_parses_on_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || parser::parse_source(&format!("my $v{i} = {i};")).len()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}

mod dump_tests {
    use super::*;

    #[test]
    fn test_sexp_dump_of_fixture_has_one_line_per_statement() {
        let source = fs::read_to_string("tests/fixtures/valid/basics.mpp").unwrap();
        let program = parser::parse_source(&source);
        assert_eq!(dump::to_sexp(&program).lines().count(), program.len());
    }

    #[test]
    fn test_json_dump_marks_errors() {
        let program = parser::parse_source("my $x = 1 +;");
        let json = dump::program_to_json(&program);
        assert_eq!(json[0]["initializer"]["right"]["type"], "Error");
    }
}
