//! MPP language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, operators, delimiters,
//! sigils, and quote-like operators.
//!
//! The design goal is to avoid stringly-typed checks scattered across the tokenizer/classifier/parser.
//! Instead, callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings and
//! metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - Adding an operator means adding exactly one row to [`operators::OPERATORS`]; nothing else hardcodes
//!   precedence.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("elsif"), Some(KeywordId::Elsif));
//! assert_eq!(keywords::category(KeywordId::Elsif), KeywordCategory::Control);
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod quoting;
pub mod registry;
pub mod sigils;
