//! Lexeme classifier: narrows raw tokens into semantic categories.
//!
//! Classification is one-to-one (no token is dropped, merged or split) and a pure function of the token
//! kind plus, for variables, the sigil, and for keywords/operators, registry membership.
//!
//! ## Examples
//! ```rust
//! use mpp_syntax::classify::{self, LexemeCategory};
//! use mpp_syntax::lexer;
//!
//! let lexemes: Vec<_> = classify::classify(lexer::lex("my @xs += 1;")).collect();
//! let categories: Vec<_> = lexemes.iter().map(|l| l.category).collect();
//! assert_eq!(
//!     categories,
//!     vec![
//!         LexemeCategory::Declaration,
//!         LexemeCategory::ArrayVar,
//!         LexemeCategory::AssignOp,
//!         LexemeCategory::Literal,
//!         LexemeCategory::Terminator,
//!     ]
//! );
//! ```

use std::fmt;

use crate::lexer::{Token, TokenKind};
use mpp_core::lang::keywords::{self, KeywordCategory};
use mpp_core::lang::operators::{self, OperatorClass};
use mpp_core::lang::sigils::{self, SigilId};

/// Semantic category of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeCategory {
    TokenError,
    Literal,
    Boolean,
    ScalarVar,
    ArrayVar,
    HashVar,
    CodeVar,
    Variable,
    Declaration,
    Control,
    Keyword,
    AssignOp,
    BinOp,
    UnOp,
    /// Arrow, `++`/`--`, and the ternary pair.
    Operator,
    PostfixDerefSigil,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Terminator,
    Identifier,
}

impl LexemeCategory {
    /// Upper-case display name (`SCALAR_VAR`, `ASSIGNOP`, ...).
    pub fn name(self) -> &'static str {
        match self {
            LexemeCategory::TokenError => "TOKEN_ERROR",
            LexemeCategory::Literal => "LITERAL",
            LexemeCategory::Boolean => "BOOLEAN",
            LexemeCategory::ScalarVar => "SCALAR_VAR",
            LexemeCategory::ArrayVar => "ARRAY_VAR",
            LexemeCategory::HashVar => "HASH_VAR",
            LexemeCategory::CodeVar => "CODE_VAR",
            LexemeCategory::Variable => "VARIABLE",
            LexemeCategory::Declaration => "DECLARATION",
            LexemeCategory::Control => "CONTROL",
            LexemeCategory::Keyword => "KEYWORD",
            LexemeCategory::AssignOp => "ASSIGNOP",
            LexemeCategory::BinOp => "BINOP",
            LexemeCategory::UnOp => "UNOP",
            LexemeCategory::Operator => "OPERATOR",
            LexemeCategory::PostfixDerefSigil => "POSTFIX_DEREF_SIGIL",
            LexemeCategory::LParen => "LPAREN",
            LexemeCategory::RParen => "RPAREN",
            LexemeCategory::LBrace => "LBRACE",
            LexemeCategory::RBrace => "RBRACE",
            LexemeCategory::LBracket => "LBRACKET",
            LexemeCategory::RBracket => "RBRACKET",
            LexemeCategory::Comma => "COMMA",
            LexemeCategory::Terminator => "TERMINATOR",
            LexemeCategory::Identifier => "IDENTIFIER",
        }
    }

    /// Return `true` for the sigil-specific variable categories (and the generic fallback).
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            LexemeCategory::ScalarVar
                | LexemeCategory::ArrayVar
                | LexemeCategory::HashVar
                | LexemeCategory::CodeVar
                | LexemeCategory::Variable
        )
    }
}

/// A token with its semantic category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub category: LexemeCategory,
    pub token: Token,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {:?}",
            self.token.line,
            self.token.column,
            self.category.name(),
            self.token.text
        )
    }
}

/// Classify a single token.
pub fn classify_token(token: Token) -> Lexeme {
    Lexeme {
        category: category_of(&token),
        token,
    }
}

/// Category for a token.
///
/// ## Notes
/// - The match over [`TokenKind`] is exhaustive: a new token kind does not compile until it is
///   classified here.
pub fn category_of(token: &Token) -> LexemeCategory {
    match token.kind {
        TokenKind::Error => LexemeCategory::TokenError,
        TokenKind::Number | TokenKind::String | TokenKind::QwList => LexemeCategory::Literal,
        TokenKind::Variable => match token.text.chars().next().and_then(sigils::from_char) {
            Some(SigilId::Scalar) => LexemeCategory::ScalarVar,
            Some(SigilId::Array) => LexemeCategory::ArrayVar,
            Some(SigilId::Hash) => LexemeCategory::HashVar,
            Some(SigilId::Code) => LexemeCategory::CodeVar,
            None => LexemeCategory::Variable,
        },
        TokenKind::Keyword => match keywords::from_str(&token.text) {
            Some(id) if keywords::is_boolean(id) => LexemeCategory::Boolean,
            Some(id) => match keywords::category(id) {
                KeywordCategory::Declaration => LexemeCategory::Declaration,
                KeywordCategory::Control => LexemeCategory::Control,
                KeywordCategory::Special
                | KeywordCategory::Module
                | KeywordCategory::Builtin
                | KeywordCategory::WordOperator => LexemeCategory::Keyword,
            },
            None => LexemeCategory::Keyword,
        },
        TokenKind::Operator => match operators::from_str(&token.text).map(operators::class) {
            Some(OperatorClass::Assignment) => LexemeCategory::AssignOp,
            Some(OperatorClass::Binary) | None => LexemeCategory::BinOp,
            Some(OperatorClass::Unary) => LexemeCategory::UnOp,
            Some(OperatorClass::Special | OperatorClass::Ternary) => LexemeCategory::Operator,
        },
        TokenKind::PostfixDerefSigil => LexemeCategory::PostfixDerefSigil,
        TokenKind::LParen => LexemeCategory::LParen,
        TokenKind::RParen => LexemeCategory::RParen,
        TokenKind::LBrace => LexemeCategory::LBrace,
        TokenKind::RBrace => LexemeCategory::RBrace,
        TokenKind::LBracket => LexemeCategory::LBracket,
        TokenKind::RBracket => LexemeCategory::RBracket,
        TokenKind::Comma => LexemeCategory::Comma,
        TokenKind::Terminator => LexemeCategory::Terminator,
        TokenKind::Identifier => LexemeCategory::Identifier,
    }
}

/// Lazy classifier over a token stream.
pub struct Classifier<I> {
    tokens: I,
}

impl<I: Iterator<Item = Token>> Iterator for Classifier<I> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        self.tokens.next().map(classify_token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

/// Classify a token stream, one lexeme per token.
pub fn classify<T>(tokens: T) -> Classifier<T::IntoIter>
where
    T: IntoIterator<Item = Token>,
{
    Classifier {
        tokens: tokens.into_iter(),
    }
}

/// Tokenize and classify a whole source string.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lexemes(source: &str) -> Vec<Lexeme> {
    classify(crate::lexer::tokenize(std::iter::once(source))).collect()
}
