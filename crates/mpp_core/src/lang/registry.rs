//! Shareable metadata for `mpp_core::lang` registries.
//!
//! The `mpp_core::lang` module is a set of **registry-first** vocabularies: keywords, operators, delimiters,
//! sigils. This submodule provides the small, dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules still lives in the
//!   tokenizer/parser.

use std::collections::HashMap;
use std::hash::Hash;

/// Language version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use mpp_core::lang::registry::Since;
///
/// let since = Since(0, 1);
/// assert_eq!(since.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Since(pub u8, pub u8);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - `Missing` marks vocabulary that is reserved and recognized by the tokenizer but whose grammar is not
///   implemented yet (tracked gaps of the scoped Perl subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Missing,
}

/// Build a spelling → id index from a registry table.
///
/// Registries call this from a `LazyLock` so the index is constructed once and shared read-only.
pub(crate) fn spelling_index<T, Id>(
    table: &'static [T],
    spellings: impl Fn(&'static T) -> &'static [&'static str],
    id: impl Fn(&'static T) -> Id,
) -> HashMap<&'static str, Id>
where
    Id: Copy + Eq + Hash,
{
    let mut index = HashMap::with_capacity(table.len());
    for item in table {
        for &spelling in spellings(item) {
            index.entry(spelling).or_insert_with(|| id(item));
        }
    }
    index
}
