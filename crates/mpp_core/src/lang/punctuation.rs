//! Delimiter and separator vocabulary.
//!
//! This module defines the structural punctuation the tokenizer maps 1:1 onto token kinds: the three
//! bracket pairs, the list separator `,`, and the statement terminator `;`.
//!
//! ## Examples
//! ```rust
//! use mpp_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char('{'), Some(PunctuationId::LBrace));
//! assert_eq!(punctuation::closing(PunctuationId::LBrace), Some(PunctuationId::RBrace));
//! assert!(punctuation::is_delimiter(';'));
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Opening brackets.
    Open,
    /// Closing brackets.
    Close,
    /// `,`
    Separator,
    /// `;`
    Terminator,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: char,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, '(', PunctuationCategory::Open),
    info(PunctuationId::RParen, ')', PunctuationCategory::Close),
    info(PunctuationId::LBrace, '{', PunctuationCategory::Open),
    info(PunctuationId::RBrace, '}', PunctuationCategory::Close),
    info(PunctuationId::LBracket, '[', PunctuationCategory::Open),
    info(PunctuationId::RBracket, ']', PunctuationCategory::Close),
    info(PunctuationId::Comma, ',', PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ';', PunctuationCategory::Terminator),
];

/// Return the canonical spelling for a punctuation token.
pub fn as_char(id: PunctuationId) -> char {
    info_for(id).canonical
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Resolve a character to its punctuation identifier.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == c).map(|p| p.id)
}

/// Return `true` if `c` is structural punctuation.
pub fn is_delimiter(c: char) -> bool {
    from_char(c).is_some()
}

/// Return the closing partner of an opening bracket.
pub fn closing(id: PunctuationId) -> Option<PunctuationId> {
    match id {
        PunctuationId::LParen => Some(PunctuationId::RParen),
        PunctuationId::LBrace => Some(PunctuationId::RBrace),
        PunctuationId::LBracket => Some(PunctuationId::RBracket),
        _ => None,
    }
}

const fn info(id: PunctuationId, canonical: char, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
    }
}
