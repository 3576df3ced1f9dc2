//! Parser for MPP: lexemes → statements.
//!
//! The parser groups lexemes into statement-sized buffers (tracking brace depth and multi-part control
//! structures such as `if`/`elsif`/`else` and `try`/`catch`/`finally`), then parses each buffer into a
//! [`Node`] with dedicated routines for statements and precedence climbing for expressions.
//!
//! ## Notes
//! - Errors are data: every routine that cannot build its node returns a [`Node::Error`] in its place,
//!   so one malformed construct never swallows its neighbours.
//! - The parser is an [`Iterator`]; a consumer may act on early statements before the input is fully
//!   read, and dropping it stops pulling from upstream.
//!
//! ## Examples
//!
//! ```rust
//! use mpp_syntax::{classify, parser};
//!
//! let statements: Vec<_> = parser::parse(classify::lexemes("if ($x) { 1 } else { 2 } print 3;")).collect();
//! assert_eq!(statements.len(), 2);
//! ```

use std::cell::Cell;
use std::collections::VecDeque;

use crate::ast::*;
use crate::classify::{Classifier, Lexeme, LexemeCategory};
use crate::lexer::{TokenKind, Tokenizer};
use mpp_core::lang::keywords::KeywordId;
use mpp_core::lang::operators::{self, OperatorClass, OperatorId};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/segment.rs");
include!("parser/errors.rs");
include!("parser/util.rs");
include!("parser/stmts.rs");
include!("parser/decl.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
