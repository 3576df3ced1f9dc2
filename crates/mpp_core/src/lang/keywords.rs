//! Define the reserved keyword vocabulary for the MPP language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) that records canonical spellings, categories, and provenance.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Keyword categories partition the reserved words: every keyword belongs to exactly one
//!   [`KeywordCategory`]. The lexeme classifier narrows `KEYWORD` tokens with these categories.
//! - Word operators (`and`, `eq`, `cmp`, ...) are reserved here *and* carry precedence in
//!   [`crate::lang::operators`]; use that module when you need operator semantics.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("foreach"), Some(KeywordId::Foreach));
//! assert_eq!(keywords::as_str(KeywordId::Foreach), "foreach");
//! assert!(!keywords::is_keyword("Foreach"));
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use super::registry::{Since, Stability, spelling_index};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    My,
    Our,
    State,
    Const,
    Sub,
    Async,
    Class,
    Field,
    Method,

    // Special
    Has,

    // Control flow
    If,
    Elsif,
    Else,
    Unless,
    While,
    Until,
    For,
    Foreach,
    Given,
    When,
    Default,
    Break,
    Next,
    Last,
    Redo,
    Continue,
    Return,
    Do,
    Eval,
    Try,
    Catch,
    Finally,
    Throw,
    Die,
    Warn,
    Defer,

    // Modules
    Use,
    Require,
    Package,
    Import,

    // Builtins
    Print,
    Say,
    Spawn,
    Send,
    Recv,
    SelfKw,
    Kill,
    Alive,
    Defined,
    Undef,
    Exists,
    Delete,
    True,
    False,

    // Word operators
    And,
    Or,
    Not,
    Xor,
    Cmp,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Partition of the reserved words.
///
/// ## Notes
/// - `Declaration` and `Control` are load-bearing: the classifier maps them to the `DECLARATION` and
///   `CONTROL` lexeme categories. The remaining categories classify as generic `KEYWORD` lexemes
///   (except the boolean literals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Special,
    Control,
    Module,
    Builtin,
    WordOperator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped by category for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    info(KeywordId::My, "my", KeywordCategory::Declaration, Since(0, 1)),
    info(KeywordId::Our, "our", KeywordCategory::Declaration, Since(0, 1)),
    info(KeywordId::State, "state", KeywordCategory::Declaration, Since(0, 1)),
    info(KeywordId::Const, "const", KeywordCategory::Declaration, Since(0, 2)),
    info(KeywordId::Sub, "sub", KeywordCategory::Declaration, Since(0, 1)),
    info(KeywordId::Async, "async", KeywordCategory::Declaration, Since(0, 3)),
    info(KeywordId::Class, "class", KeywordCategory::Declaration, Since(0, 2)),
    info(KeywordId::Field, "field", KeywordCategory::Declaration, Since(0, 2)),
    info(KeywordId::Method, "method", KeywordCategory::Declaration, Since(0, 2)),
    // Special
    info(KeywordId::Has, "has", KeywordCategory::Special, Since(0, 2)),
    // Control flow
    info(KeywordId::If, "if", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Elsif, "elsif", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Else, "else", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Unless, "unless", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::While, "while", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Until, "until", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::For, "for", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Foreach, "foreach", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Given, "given", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::When, "when", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Default, "default", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Break, "break", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Next, "next", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Last, "last", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Redo, "redo", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Continue, "continue", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Return, "return", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Do, "do", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Eval, "eval", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Try, "try", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Catch, "catch", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Finally, "finally", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Throw, "throw", KeywordCategory::Control, Since(0, 2)),
    info(KeywordId::Die, "die", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Warn, "warn", KeywordCategory::Control, Since(0, 1)),
    info(KeywordId::Defer, "defer", KeywordCategory::Control, Since(0, 3)),
    // Modules
    info(KeywordId::Use, "use", KeywordCategory::Module, Since(0, 1)),
    info(KeywordId::Require, "require", KeywordCategory::Module, Since(0, 1)),
    info(KeywordId::Package, "package", KeywordCategory::Module, Since(0, 1)),
    info(KeywordId::Import, "import", KeywordCategory::Module, Since(0, 3)),
    // Builtins
    info(KeywordId::Print, "print", KeywordCategory::Builtin, Since(0, 1)),
    info(KeywordId::Say, "say", KeywordCategory::Builtin, Since(0, 1)),
    draft(KeywordId::Spawn, "spawn", KeywordCategory::Builtin, Since(0, 3)),
    draft(KeywordId::Send, "send", KeywordCategory::Builtin, Since(0, 3)),
    draft(KeywordId::Recv, "recv", KeywordCategory::Builtin, Since(0, 3)),
    info(KeywordId::SelfKw, "self", KeywordCategory::Builtin, Since(0, 2)),
    draft(KeywordId::Kill, "kill", KeywordCategory::Builtin, Since(0, 3)),
    draft(KeywordId::Alive, "alive", KeywordCategory::Builtin, Since(0, 3)),
    info(KeywordId::Defined, "defined", KeywordCategory::Builtin, Since(0, 1)),
    info(KeywordId::Undef, "undef", KeywordCategory::Builtin, Since(0, 1)),
    info(KeywordId::Exists, "exists", KeywordCategory::Builtin, Since(0, 1)),
    info(KeywordId::Delete, "delete", KeywordCategory::Builtin, Since(0, 1)),
    info(KeywordId::True, "true", KeywordCategory::Builtin, Since(0, 2)),
    info(KeywordId::False, "false", KeywordCategory::Builtin, Since(0, 2)),
    // Word operators
    info(KeywordId::And, "and", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Or, "or", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Not, "not", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Xor, "xor", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Cmp, "cmp", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Eq, "eq", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Ne, "ne", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Lt, "lt", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Gt, "gt", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Le, "le", KeywordCategory::WordOperator, Since(0, 1)),
    info(KeywordId::Ge, "ge", KeywordCategory::WordOperator, Since(0, 1)),
];

static INDEX: LazyLock<HashMap<&'static str, KeywordId>> =
    LazyLock::new(|| spelling_index(KEYWORDS, |k| std::slice::from_ref(&k.canonical), |k| k.id));

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling for `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The keyword's [`KeywordCategory`].
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error; guarded by the
///   registry tests).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    INDEX.get(s).copied()
}

/// Return `true` if `s` is a reserved word.
pub fn is_keyword(s: &str) -> bool {
    INDEX.contains_key(s)
}

/// Return `true` if the keyword introduces a declaration (`my`, `sub`, `class`, ...).
pub fn is_declaration(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Declaration
}

/// Return `true` if the keyword is a control-flow keyword (`if`, `return`, `try`, ...).
pub fn is_control(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Control
}

/// Return `true` if the keyword is spelled like a word operator (`and`, `eq`, `cmp`, ...).
pub fn is_word_operator(id: KeywordId) -> bool {
    category(id) == KeywordCategory::WordOperator
}

/// Return `true` for the boolean literals `true` / `false`.
pub fn is_boolean(id: KeywordId) -> bool {
    matches!(id, KeywordId::True | KeywordId::False)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, since: Since) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        since,
        stability: Stability::Stable,
    }
}

const fn draft(id: KeywordId, canonical: &'static str, category: KeywordCategory, since: Since) -> KeywordInfo {
    KeywordInfo {
        stability: Stability::Draft,
        ..info(id, canonical, category, since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_partition_control_words() {
        for id in [KeywordId::If, KeywordId::Catch, KeywordId::Defer, KeywordId::Return] {
            assert!(is_control(id), "{id:?} should be control");
        }
        assert!(is_declaration(KeywordId::Method));
        assert!(!is_control(KeywordId::Has));
        assert_eq!(category(KeywordId::Has), KeywordCategory::Special);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("my"), Some(KeywordId::My));
        assert_eq!(from_str("My"), None);
        assert_eq!(from_str("self"), Some(KeywordId::SelfKw));
    }
}
