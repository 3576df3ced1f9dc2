//! Variable sigils and postfix-dereference forms.
//!
//! ## Notes
//! - A sigil followed by an identifier (or by `_`, or a digit run) introduces a variable.
//! - After `->`, a sigil followed by `*` (`->@*`) or by an opening bracket (`->@[`, `->@{`) is a postfix
//!   dereference instead.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::sigils::{self, SigilId};
//!
//! assert_eq!(sigils::from_char('@'), Some(SigilId::Array));
//! assert!(sigils::is_postfix_deref("@*"));
//! assert!(!sigils::is_postfix_deref("&*"));
//! ```

/// Stable identifier for variable sigils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigilId {
    Scalar,
    Array,
    Hash,
    Code,
}

/// Metadata for a sigil.
#[derive(Debug, Clone, Copy)]
pub struct SigilInfo {
    pub id: SigilId,
    pub canonical: char,
    pub description: &'static str,
}

/// Registry of all sigils.
pub const SIGILS: &[SigilInfo] = &[
    SigilInfo {
        id: SigilId::Scalar,
        canonical: '$',
        description: "scalar variable",
    },
    SigilInfo {
        id: SigilId::Array,
        canonical: '@',
        description: "array variable",
    },
    SigilInfo {
        id: SigilId::Hash,
        canonical: '%',
        description: "hash variable",
    },
    SigilInfo {
        id: SigilId::Code,
        canonical: '&',
        description: "code variable",
    },
];

/// Whole-container postfix dereference spellings (`$ref->@*`).
pub const POSTFIX_DEREF: &[&str] = &["@*", "%*", "$*"];

/// Sliced postfix dereference spellings (`$ref->@[...]`, `$ref->@{...}`).
pub const POSTFIX_DEREF_SLICE: &[&str] = &["@[", "@{"];

/// Resolve a sigil character.
pub fn from_char(c: char) -> Option<SigilId> {
    SIGILS.iter().find(|s| s.canonical == c).map(|s| s.id)
}

/// Canonical sigil character.
pub fn as_char(id: SigilId) -> char {
    match id {
        SigilId::Scalar => '$',
        SigilId::Array => '@',
        SigilId::Hash => '%',
        SigilId::Code => '&',
    }
}

/// Return `true` if `s` (two characters) is a postfix-dereference form.
pub fn is_postfix_deref(s: &str) -> bool {
    POSTFIX_DEREF.contains(&s) || POSTFIX_DEREF_SLICE.contains(&s)
}
