//! Small helper APIs for working with `Token` / `Lexeme`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to recover registry IDs
//! from token spellings.

use crate::classify::{Lexeme, LexemeCategory};
use crate::lexer::{Token, TokenKind};
use mpp_core::lang::keywords::{self, KeywordId};
use mpp_core::lang::operators::{self, OperatorId};

impl Token {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self.kind {
            TokenKind::Keyword => keywords::from_str(&self.text),
            _ => None,
        }
    }

    /// Return the operator id for operator tokens and word-operator keywords (`and`, `eq`, ...).
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self.kind {
            TokenKind::Operator => operators::from_str(&self.text),
            TokenKind::Keyword => operators::from_str(&self.text).filter(|id| operators::info_for(*id).is_keyword_spelling),
            _ => None,
        }
    }

    /// Return `true` if this is an opening bracket.
    pub fn is_open(&self) -> bool {
        matches!(self.kind, TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket)
    }

    /// Return `true` if this is a closing bracket.
    pub fn is_close(&self) -> bool {
        matches!(self.kind, TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket)
    }
}

impl Lexeme {
    /// Convenience wrapper for `self.token.text`.
    pub fn text(&self) -> &str {
        &self.token.text
    }

    /// Convenience wrapper for `self.token.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.token.keyword_id()
    }

    /// Convenience wrapper for `self.token.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.token.operator_id()
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.keyword_id() == Some(id)
    }

    /// Return `true` if this is the given operator (symbolic or word spelling).
    pub fn is_op(&self, id: OperatorId) -> bool {
        self.operator_id() == Some(id)
    }

    /// Return `true` if the lexeme has the given category.
    pub fn is(&self, category: LexemeCategory) -> bool {
        self.category == category
    }

    /// Return `true` for barewords usable as hash keys or method names (identifiers and keywords).
    pub fn is_word(&self) -> bool {
        matches!(self.token.kind, TokenKind::Identifier | TokenKind::Keyword)
    }

    /// Nesting delta contributed by this lexeme: `+1` for openers, `-1` for closers.
    pub fn depth_delta(&self) -> isize {
        if self.token.is_open() {
            1
        } else if self.token.is_close() {
            -1
        } else {
            0
        }
    }
}
