//! Token types for the MPP tokenizer.
//!
//! Tokens are deliberately flat: a payload-free [`TokenKind`] plus the exact source spelling. Vocabulary
//! identity (which keyword, which operator) is recovered on demand from `mpp_core::lang` registries via
//! `crate::token_helpers`, so there is one source of truth for spellings.
//!
//! ## Notes
//! - `text` is the full source spelling, including quotes for strings and the `qw(...)` wrapper for word
//!   lists. Helpers such as [`Token::string_body`] and [`Token::qw_words`] slice into it.
//! - `line` / `column` are 1-based and captured at the token's first character.

use std::fmt;

use crate::ast::Span;
use mpp_core::lang::quoting;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unterminated string/word list, a sigil without a name, or an unrecognized character.
    Error,
    Number,
    /// Quoted string, or a regex literal (`m/../`, `qr/../`, `/../` after a binding operator).
    String,
    /// `qw(...)` word list.
    QwList,
    Identifier,
    Variable,
    Keyword,
    Operator,
    /// `@*`, `%*`, `$*` (whole-container) or a bare `@` / `%` before a slice subscript, after `->`.
    PostfixDerefSigil,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Terminator,
}

impl TokenKind {
    /// Upper-case display name used by debug dumps (`NUMBER`, `LPAREN`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Error => "ERROR",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::QwList => "QWLIST",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::PostfixDerefSigil => "POSTFIX_DEREF_SIGIL",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Terminator => "TERMINATOR",
        }
    }

    /// Return `true` for kinds that complete an operand (`$x`, `42`, `)`), after which `%`, `&` and `x`
    /// read as operators.
    pub fn ends_term(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::String
                | TokenKind::QwList
                | TokenKind::Identifier
                | TokenKind::Variable
                | TokenKind::RParen
                | TokenKind::RBracket
        )
    }
}

/// A token with its kind, spelling, and source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            span,
        }
    }

    /// Body of a quoted string (escapes kept verbatim), without the surrounding quotes.
    ///
    /// Returns `None` for non-string tokens and for regex literals.
    pub fn string_body(&self) -> Option<&str> {
        if self.kind != TokenKind::String {
            return None;
        }
        let quote = self.text.chars().next()?;
        if !matches!(quote, '"' | '\'') || self.text.len() < 2 {
            return None;
        }
        Some(&self.text[1..self.text.len() - 1])
    }

    /// Return `true` for double-quoted (interpolating) strings.
    pub fn is_interpolated(&self) -> bool {
        self.kind == TokenKind::String && self.text.starts_with('"')
    }

    /// Split a regex literal into `(pattern, flags)`.
    ///
    /// Accepts `/pat/flags`, `m{pat}flags` and `qr<pat>flags` spellings; returns `None` otherwise.
    pub fn regex_parts(&self) -> Option<(&str, &str)> {
        if self.kind != TokenKind::String {
            return None;
        }
        let rest = self
            .text
            .strip_prefix("qr")
            .or_else(|| self.text.strip_prefix('m'))
            .or_else(|| self.text.starts_with('/').then_some(self.text.as_str()))?;
        let open = rest.chars().next()?;
        let close = quoting::closing_delimiter(open);
        let body = &rest[open.len_utf8()..];
        let end = body.rfind(close)?;
        Some((&body[..end], &body[end + close.len_utf8()..]))
    }

    /// Words of a `qw(...)` list.
    pub fn qw_words(&self) -> Vec<&str> {
        if self.kind != TokenKind::QwList {
            return Vec::new();
        }
        let Some(rest) = self.text.strip_prefix("qw") else {
            return Vec::new();
        };
        let Some(open) = rest.chars().next() else {
            return Vec::new();
        };
        let inner = &rest[open.len_utf8()..];
        let inner = inner
            .strip_suffix(quoting::closing_delimiter(open))
            .unwrap_or(inner);
        inner.split_whitespace().collect()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} {:?}", self.line, self.column, self.kind.name(), self.text)
    }
}
