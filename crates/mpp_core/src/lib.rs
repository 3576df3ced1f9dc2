//! Canonical language vocabulary for the MPP front-end.
//!
//! This crate is intentionally small and dependency-free. It holds the static tables that every stage of the
//! pipeline consults: reserved keywords and their categories, operator precedence/associativity, delimiters,
//! sigils, and quote-like operators.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no mutable global state, and no syntax-tree types.
//! - Lookup indexes are built lazily on first use and are read-only afterwards, so they can be shared freely
//!   across threads and parser instances.

pub mod lang;
