#![forbid(unsafe_code)]
//! MPP: a streaming front-end for a Perl-like scripting language.
//!
//! The core pipeline lives in the `mpp_syntax` crate (tokenizer → lexeme classifier → parser) with its
//! vocabulary in `mpp_core`. This crate adds the tooling around it: the CLI, AST dumpers, and a source
//! formatter.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Malformed source** is never an `Err`: the parser returns `Error` nodes inside a complete tree.
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod dump;
pub mod format;
pub mod version;

pub use mpp_syntax::ast;
pub use mpp_syntax::classify;
pub use mpp_syntax::diagnostics;
pub use mpp_syntax::lexer;
pub use mpp_syntax::parser;

pub use format::{FormatConfig, check_formatted, format_diff, format_source, format_source_with_config};

/// Runs the README examples as doctests.
#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
