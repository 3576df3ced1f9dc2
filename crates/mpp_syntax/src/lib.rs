//! Streaming syntax frontend for MPP: tokenizer, lexeme classifier, parser, AST, diagnostics.
//!
//! Every stage is a pull-based iterator adapter: source chunks flow into the [`lexer::Tokenizer`], tokens
//! into the [`classify::Classifier`], and lexemes into the [`parser::Parser`], which yields one top-level
//! statement at a time.
//!
//! ## Notes
//! - Nothing here fails: malformed input is reported as `Error` nodes inside the tree, and the stream keeps
//!   going with the next statement.
//! - Vocabulary identity (keywords/operators/punctuation/sigils) comes from `mpp_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use mpp_syntax::parser;
//!
//! let program = parser::parse_source("my $x = 1 + 2;\nprint $x;\n");
//! assert_eq!(program.len(), 2);
//! assert!(!mpp_syntax::ast::has_error_node(&program));
//! ```
//!
//! ## See also
//! - `mpp_core::lang` for registry-backed language vocabulary.

pub mod ast;
pub mod classify;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
