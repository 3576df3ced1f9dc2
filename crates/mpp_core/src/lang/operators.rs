//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `+` and word operators like `eq`)
//! along with precedence, associativity, and the syntactic class the lexeme classifier uses.
//!
//! ## Notes
//! - Precedence follows Perl's table: **lower numbers bind tighter**. Levels run from 2 (the arrow and
//!   postfix `++`/`--`) to 21 (low-precedence `or`/`xor`).
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`and`, `cmp`, ...) are tokenized as keywords; their entries have
//!   [`OperatorInfo::is_keyword_spelling`] set.
//! - The `x` repetition operator is spelled with a letter but is *not* reserved: the tokenizer only treats
//!   it as an operator after a complete term.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::operators::{self, Associativity, OperatorId};
//!
//! assert_eq!(operators::from_str("**"), Some(OperatorId::StarStar));
//! assert_eq!(operators::precedence(OperatorId::StarStar), 3);
//! assert_eq!(operators::associativity(OperatorId::StarStar), Associativity::Right);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use super::registry::{Since, spelling_index};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Syntactic class of an operator.
///
/// ## Notes
/// - `Special` covers the arrow and `++`/`--`, which the parser handles outside the precedence climber.
/// - `Ternary` covers the `?` / `:` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Binary,
    Assignment,
    Unary,
    Ternary,
    Special,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Postfix / dereference
    Arrow,
    Increment,
    Decrement,

    // Exponentiation
    StarStar,

    // Symbolic unary
    Bang,
    Tilde,
    Backslash,

    // Binding
    Match,
    NotMatch,

    // Multiplicative
    Star,
    Slash,
    Percent,
    Repeat,

    // Additive
    Plus,
    Minus,
    Dot,

    // Shift
    ShiftLeft,
    ShiftRight,

    // Relational
    Lt,
    Gt,
    LtEq,
    GtEq,
    StrLt,
    StrGt,
    StrLe,
    StrGe,

    // Equality
    EqEq,
    NotEq,
    Spaceship,
    StrEq,
    StrNe,
    StrCmp,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,

    // Logical
    AndAnd,
    OrOr,
    DefinedOr,

    // Range
    DotDot,
    DotDotDot,

    // Ternary
    Question,
    Colon,

    // Assignment
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    DotEq,
    PercentEq,
    StarStarEq,
    RepeatEq,
    AndAndEq,
    OrOrEq,
    DefinedOrEq,
    BitAndEq,
    BitOrEq,
    BitXorEq,
    ShiftLeftEq,
    ShiftRightEq,

    // List
    FatComma,

    // Low-precedence logical (word spellings)
    Not,
    And,
    Or,
    Xor,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub class: OperatorClass,
    /// `true` for `+` / `-`, which are binary but may also appear in prefix position.
    pub also_prefix: bool,
    pub is_keyword_spelling: bool,
    pub since: Since,
}

/// Tightest precedence level (arrow, postfix `++`/`--`).
pub const TIGHTEST: u8 = 2;

/// Loosest precedence level (low-precedence `or` / `xor`).
pub const LOOSEST: u8 = 21;

/// Operand bound for named unary builtins (`defined $x`, `exists $h{k}`): shifts and tighter bind inside
/// the operand, relational operators do not.
pub const NAMED_UNARY: u8 = 8;

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    special(OperatorId::Arrow, "->", Associativity::Left),
    special(OperatorId::Increment, "++", Associativity::None),
    special(OperatorId::Decrement, "--", Associativity::None),
    binary(OperatorId::StarStar, "**", 3, Associativity::Right),
    unary(OperatorId::Bang, "!", 4),
    unary(OperatorId::Tilde, "~", 4),
    unary(OperatorId::Backslash, "\\", 4),
    binary(OperatorId::Match, "=~", 5, Associativity::Left),
    binary(OperatorId::NotMatch, "!~", 5, Associativity::Left),
    binary(OperatorId::Star, "*", 6, Associativity::Left),
    binary(OperatorId::Slash, "/", 6, Associativity::Left),
    binary(OperatorId::Percent, "%", 6, Associativity::Left),
    binary(OperatorId::Repeat, "x", 6, Associativity::Left),
    prefixable(OperatorId::Plus, "+", 7),
    prefixable(OperatorId::Minus, "-", 7),
    binary(OperatorId::Dot, ".", 7, Associativity::Left),
    binary(OperatorId::ShiftLeft, "<<", 8, Associativity::Left),
    binary(OperatorId::ShiftRight, ">>", 8, Associativity::Left),
    binary(OperatorId::Lt, "<", 9, Associativity::Left),
    binary(OperatorId::Gt, ">", 9, Associativity::Left),
    binary(OperatorId::LtEq, "<=", 9, Associativity::Left),
    binary(OperatorId::GtEq, ">=", 9, Associativity::Left),
    word(OperatorId::StrLt, "lt", 9, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::StrGt, "gt", 9, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::StrLe, "le", 9, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::StrGe, "ge", 9, OperatorClass::Binary, Associativity::Left),
    binary(OperatorId::EqEq, "==", 10, Associativity::Left),
    binary(OperatorId::NotEq, "!=", 10, Associativity::Left),
    binary(OperatorId::Spaceship, "<=>", 10, Associativity::Left),
    word(OperatorId::StrEq, "eq", 10, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::StrNe, "ne", 10, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::StrCmp, "cmp", 10, OperatorClass::Binary, Associativity::Left),
    binary(OperatorId::BitAnd, "&", 11, Associativity::Left),
    binary(OperatorId::BitOr, "|", 12, Associativity::Left),
    binary(OperatorId::BitXor, "^", 12, Associativity::Left),
    binary(OperatorId::AndAnd, "&&", 13, Associativity::Left),
    binary(OperatorId::OrOr, "||", 14, Associativity::Left),
    binary(OperatorId::DefinedOr, "//", 14, Associativity::Left),
    binary(OperatorId::DotDot, "..", 15, Associativity::None),
    binary(OperatorId::DotDotDot, "...", 15, Associativity::None),
    ternary(OperatorId::Question, "?"),
    ternary(OperatorId::Colon, ":"),
    assign(OperatorId::Assign, "="),
    assign(OperatorId::PlusEq, "+="),
    assign(OperatorId::MinusEq, "-="),
    assign(OperatorId::StarEq, "*="),
    assign(OperatorId::SlashEq, "/="),
    assign(OperatorId::DotEq, ".="),
    assign(OperatorId::PercentEq, "%="),
    assign(OperatorId::StarStarEq, "**="),
    assign(OperatorId::RepeatEq, "x="),
    assign(OperatorId::AndAndEq, "&&="),
    assign(OperatorId::OrOrEq, "||="),
    assign(OperatorId::DefinedOrEq, "//="),
    assign(OperatorId::BitAndEq, "&="),
    assign(OperatorId::BitOrEq, "|="),
    assign(OperatorId::BitXorEq, "^="),
    assign(OperatorId::ShiftLeftEq, "<<="),
    assign(OperatorId::ShiftRightEq, ">>="),
    binary(OperatorId::FatComma, "=>", 18, Associativity::Left),
    word(OperatorId::Not, "not", 19, OperatorClass::Unary, Associativity::Right),
    word(OperatorId::And, "and", 20, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::Or, "or", 21, OperatorClass::Binary, Associativity::Left),
    word(OperatorId::Xor, "xor", 21, OperatorClass::Binary, Associativity::Left),
];

static INDEX: LazyLock<HashMap<&'static str, OperatorId>> =
    LazyLock::new(|| spelling_index(OPERATORS, |o| std::slice::from_ref(&o.spelling), |o| o.id));

/// Symbolic spellings of two or more characters, longest first.
///
/// The tokenizer matches these greedily (3-character sequences before 2-character ones) before falling
/// back to single-character operators.
pub static MULTI_CHAR_OPERATORS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut spellings: Vec<&'static str> = OPERATORS
        .iter()
        .filter(|o| !o.is_keyword_spelling && is_symbolic(o.spelling) && o.spelling.len() > 1)
        .map(|o| o.spelling)
        .collect();
    spellings.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    spellings
});

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling (symbolic or word) to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    INDEX.get(spelling).copied()
}

/// Resolve a *symbolic* spelling only; word operators and `x` are excluded.
pub fn symbolic_from_str(spelling: &str) -> Option<OperatorId> {
    if is_symbolic(spelling) { from_str(spelling) } else { None }
}

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Precedence level (lower binds tighter).
pub fn precedence(id: OperatorId) -> u8 {
    info_for(id).precedence
}

/// Precedence by spelling, if the spelling is an operator.
pub fn get_operator_precedence(spelling: &str) -> Option<u8> {
    from_str(spelling).map(precedence)
}

/// Associativity.
pub fn associativity(id: OperatorId) -> Associativity {
    info_for(id).associativity
}

/// Return `true` if chains of this operator group to the right (`**`, `?:`, assignment, `not`).
pub fn is_right_associative(id: OperatorId) -> bool {
    associativity(id) == Associativity::Right
}

/// Syntactic class.
pub fn class(id: OperatorId) -> OperatorClass {
    info_for(id).class
}

/// Return `true` for the assignment family (`=`, `+=`, `//=`, ...).
pub fn is_assignment(id: OperatorId) -> bool {
    class(id) == OperatorClass::Assignment
}

/// Return `true` for operators that may appear in prefix position.
pub fn is_prefix(id: OperatorId) -> bool {
    let info = info_for(id);
    info.class == OperatorClass::Unary || info.also_prefix || matches!(id, OperatorId::Increment | OperatorId::Decrement)
}

/// Return `true` if `s` is one of the multi-character symbolic operators.
pub fn is_multi_char_operator(s: &str) -> bool {
    s.chars().count() > 1 && symbolic_from_str(s).is_some()
}

fn is_symbolic(spelling: &str) -> bool {
    !spelling.chars().any(|c| c.is_ascii_alphanumeric() || c == '_')
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    class: OperatorClass,
    is_keyword_spelling: bool,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        class,
        also_prefix: false,
        is_keyword_spelling,
        since: Since(0, 1),
    }
}

const fn binary(id: OperatorId, spelling: &'static str, precedence: u8, associativity: Associativity) -> OperatorInfo {
    op(id, spelling, precedence, associativity, OperatorClass::Binary, false)
}

const fn prefixable(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    OperatorInfo {
        also_prefix: true,
        ..binary(id, spelling, precedence, Associativity::Left)
    }
}

const fn unary(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    op(id, spelling, precedence, Associativity::Right, OperatorClass::Unary, false)
}

const fn assign(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    op(id, spelling, 17, Associativity::Right, OperatorClass::Assignment, false)
}

const fn ternary(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    op(id, spelling, 16, Associativity::Right, OperatorClass::Ternary, false)
}

const fn special(id: OperatorId, spelling: &'static str, associativity: Associativity) -> OperatorInfo {
    op(id, spelling, TIGHTEST, associativity, OperatorClass::Special, false)
}

const fn word(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    class: OperatorClass,
    associativity: Associativity,
) -> OperatorInfo {
    op(id, spelling, precedence, associativity, class, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_char_operators_longest_first() {
        let ops = &*MULTI_CHAR_OPERATORS;
        let first_two = ops.iter().position(|s| s.len() == 2).unwrap();
        assert!(ops[..first_two].iter().all(|s| s.len() == 3));
        assert!(ops.contains(&"<=>"));
        assert!(ops.contains(&"->"));
        assert!(!ops.contains(&"x="), "letter-spelled operators are not symbolic");
    }

    #[test]
    fn test_precedence_ordering_matches_perl() {
        assert!(precedence(OperatorId::Arrow) < precedence(OperatorId::StarStar));
        assert!(precedence(OperatorId::Star) < precedence(OperatorId::Plus));
        assert!(precedence(OperatorId::AndAnd) < precedence(OperatorId::OrOr));
        assert!(precedence(OperatorId::Assign) < precedence(OperatorId::Not));
        assert_eq!(precedence(OperatorId::Or), LOOSEST);
        assert_eq!(associativity(OperatorId::DotDot), Associativity::None);
    }

    #[test]
    fn test_word_operators_are_keyword_spelled() {
        for spelling in ["and", "or", "not", "xor", "cmp", "eq", "ne", "lt", "gt", "le", "ge"] {
            let id = from_str(spelling).unwrap();
            assert!(info_for(id).is_keyword_spelling, "{spelling}");
            assert_eq!(symbolic_from_str(spelling), None);
        }
    }

    #[test]
    fn test_prefix_operators() {
        assert!(is_prefix(OperatorId::Minus));
        assert!(is_prefix(OperatorId::Bang));
        assert!(is_prefix(OperatorId::Increment));
        assert!(!is_prefix(OperatorId::Star));
    }
}
