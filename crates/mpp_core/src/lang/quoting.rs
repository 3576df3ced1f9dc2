//! Quote-like operators (`qw`, `qr`, `m`) and their delimiter rules.
//!
//! ## Notes
//! - Paired delimiters (`()`, `[]`, `{}`, `<>`) nest: the body ends at the partner that returns the depth
//!   to zero.
//! - Any other punctuation character is unpaired and the body ends at its first unescaped recurrence.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::quoting::{self, QuoteLikeId};
//!
//! assert_eq!(quoting::from_str("qw"), Some(QuoteLikeId::Qw));
//! assert_eq!(quoting::closing_delimiter('('), ')');
//! assert_eq!(quoting::closing_delimiter('/'), '/');
//! ```

/// Stable identifier for quote-like operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteLikeId {
    /// `qw(...)` - whitespace-separated word list.
    Qw,
    /// `qr/.../` - compiled regex.
    Qr,
    /// `m/.../` - match.
    M,
}

/// Resolve a quote-like operator name.
pub fn from_str(s: &str) -> Option<QuoteLikeId> {
    match s {
        "qw" => Some(QuoteLikeId::Qw),
        "qr" => Some(QuoteLikeId::Qr),
        "m" => Some(QuoteLikeId::M),
        _ => None,
    }
}

/// Canonical spelling.
pub fn as_str(id: QuoteLikeId) -> &'static str {
    match id {
        QuoteLikeId::Qw => "qw",
        QuoteLikeId::Qr => "qr",
        QuoteLikeId::M => "m",
    }
}

/// Return the closing delimiter for an opening one (itself when unpaired).
pub fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// Return `true` if `open` is one of the nesting bracket pairs.
pub fn is_paired(open: char) -> bool {
    closing_delimiter(open) != open
}

/// Return `true` if `c` may open a quote-like body.
///
/// Word characters, whitespace, and characters that would make `qw` read as an ordinary bareword
/// (`,` `;` `=` `)` and friends) are excluded.
pub fn is_opening_delimiter(c: char) -> bool {
    !(c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | ',' | ';' | '=' | ')' | ']' | '}' | '>' | '-'))
}
