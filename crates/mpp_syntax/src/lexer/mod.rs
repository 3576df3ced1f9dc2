//! Tokenizer for the MPP language.
//!
//! Handles tokenization including:
//! - Numbers (decimal digit runs only) and quoted strings
//! - Variables with sigils (`$x`, `@list`, `%map`, `&code`, `$Pkg::name`, `$$ref`)
//! - Identifiers (with `::` package separators) and reserved keywords
//! - Quote-like operators (`qw(...)`, `m/../`, `qr/../`) and regex literals after `=~` / `!~`
//! - Operators (greedy 3 → 2 → 1 character matching) and delimiters
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `source` - Lazy chunked character source (`SourceChars`)
//! - `quotes` - String, word-list and regex scanning
//!
//! ## Notes
//! - Malformed input never aborts the scan: it yields [`TokenKind::Error`] tokens and every branch
//!   consumes at least one character.
//! - The tokenizer is a pull-based [`Iterator`]; it reads upstream chunks only as far as its lookahead
//!   requires.

mod quotes;
pub mod source;
pub mod tokens;

pub use source::SourceChars;
pub use tokens::{Token, TokenKind};

use crate::ast::Span;
use mpp_core::lang::{keywords, operators, punctuation, quoting};

// ============================================================================
// TOKENIZER STATE
// ============================================================================

/// Position of the first character of the token being scanned.
#[derive(Debug, Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
    offset: usize,
}

/// The previously emitted token, as far as context-sensitive scanning needs it.
#[derive(Debug, Clone)]
struct Previous {
    kind: TokenKind,
    text: String,
}

/// Streaming tokenizer over source chunks.
///
/// Converts a lazy sequence of text chunks into a lazy sequence of [`Token`]s, treating the
/// concatenation of the chunks as one continuous character stream.
pub struct Tokenizer<I> {
    source: SourceChars<I>,
    line: usize,
    column: usize,
    offset: usize,
    previous: Option<Previous>,
}

impl<I> Tokenizer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a tokenizer over a chunk iterator.
    pub fn new(chunks: I) -> Self {
        Self {
            source: SourceChars::new(chunks),
            line: 1,
            column: 1,
            offset: 0,
            previous: None,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.source.peek_nth(0)
    }

    fn peek_nth(&mut self, n: usize) -> Option<char> {
        self.source.peek_nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.source.next_char()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `n` characters into `text`.
    fn advance_into(&mut self, text: &mut String, n: usize) {
        for _ in 0..n {
            if let Some(c) = self.advance() {
                text.push(c);
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn token(&self, kind: TokenKind, text: String, mark: Mark) -> Token {
        Token::new(kind, text, mark.line, mark.column, Span::new(mark.offset, self.offset))
    }

    // ========================================================================
    // Context
    // ========================================================================

    fn previous_text(&self) -> Option<&str> {
        self.previous.as_ref().map(|p| p.text.as_str())
    }

    /// Return `true` if the previous token completes an operand.
    fn after_term(&self) -> bool {
        self.previous.as_ref().is_some_and(|p| p.kind.ends_term())
    }

    fn after_arrow(&self) -> bool {
        self.previous_text() == Some("->")
    }

    fn after_binding(&self) -> bool {
        matches!(self.previous_text(), Some("=~" | "!~"))
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    /// Skip whitespace and `#` comments. Returns the next significant character, if any.
    fn skip_trivia(&mut self) -> Option<char> {
        loop {
            let c = self.peek()?;
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            } else {
                return Some(c);
            }
        }
    }

    fn scan_token(&mut self, c: char) -> Token {
        let mark = self.mark();

        if matches!(c, '"' | '\'') {
            return self.scan_string(mark);
        }
        if matches!(c, '$' | '@' | '%' | '&') {
            if let Some(token) = self.scan_sigil(c, mark) {
                return token;
            }
            return self.scan_operator(mark);
        }
        if c == 'x' && self.after_term() && !self.peek_nth(1).is_some_and(is_ident_start) {
            return self.scan_repeat(mark);
        }
        if is_ident_start(c) {
            return self.scan_word(mark);
        }
        if c.is_ascii_digit() {
            return self.scan_number(mark);
        }
        if c == '/' && self.after_binding() {
            return self.scan_delimited(mark, String::new(), TokenKind::String);
        }
        self.scan_operator(mark)
    }

    // ========================================================================
    // Sigils and variables
    // ========================================================================

    /// Scan a variable or postfix-dereference sigil.
    ///
    /// Returns `None` when the sigil character should be read as an operator instead (`%` and `&` after
    /// a complete term, or not followed by a name).
    fn scan_sigil(&mut self, sigil: char, mark: Mark) -> Option<Token> {
        let next = self.peek_nth(1);

        if self.after_arrow() {
            match (sigil, next) {
                ('@' | '%' | '$', Some('*')) => {
                    let mut text = String::new();
                    self.advance_into(&mut text, 2);
                    return Some(self.token(TokenKind::PostfixDerefSigil, text, mark));
                }
                ('@' | '%', Some('[' | '{')) => {
                    let mut text = String::new();
                    self.advance_into(&mut text, 1);
                    return Some(self.token(TokenKind::PostfixDerefSigil, text, mark));
                }
                _ => {}
            }
        }

        if matches!(sigil, '%' | '&') && self.after_term() {
            // `keys %h`: a bareword directly followed by a named hash keeps the sigil reading.
            let after_bareword = self
                .previous
                .as_ref()
                .is_some_and(|p| p.kind == TokenKind::Identifier);
            if !(after_bareword && next.is_some_and(is_ident_start)) {
                return None;
            }
        }

        let mut text = String::new();
        match next {
            Some(n) if is_ident_start(n) => {
                self.advance_into(&mut text, 1);
                self.consume_name(&mut text);
            }
            Some('$') if self.peek_nth(2).is_some_and(is_ident_start) => {
                self.advance_into(&mut text, 2);
                self.consume_name(&mut text);
            }
            Some(d) if sigil == '$' && d.is_ascii_digit() => {
                self.advance_into(&mut text, 1);
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance_into(&mut text, 1);
                }
            }
            Some('#') if sigil == '$' && self.peek_nth(2).is_some_and(is_ident_start) => {
                self.advance_into(&mut text, 2);
                self.consume_name(&mut text);
            }
            Some('@' | '!') if sigil == '$' => {
                self.advance_into(&mut text, 2);
            }
            _ if matches!(sigil, '%' | '&') => return None,
            _ => {
                self.advance_into(&mut text, 1);
                return Some(self.token(TokenKind::Error, text, mark));
            }
        }
        Some(self.token(TokenKind::Variable, text, mark))
    }

    /// Consume identifier characters and `::` package separators.
    fn consume_name(&mut self, text: &mut String) {
        loop {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance_into(text, 1);
            }
            let separator = self.peek() == Some(':')
                && self.peek_nth(1) == Some(':')
                && self.peek_nth(2).is_some_and(is_ident_start);
            if !separator {
                return;
            }
            self.advance_into(text, 2);
        }
    }

    // ========================================================================
    // Words and numbers
    // ========================================================================

    fn scan_word(&mut self, mark: Mark) -> Token {
        let mut text = String::new();
        self.consume_name(&mut text);

        let opens_quote = self.peek().is_some_and(quoting::is_opening_delimiter);
        match quoting::from_str(&text) {
            Some(quoting::QuoteLikeId::Qw) if opens_quote => {
                return self.scan_delimited(mark, text, TokenKind::QwList);
            }
            Some(quoting::QuoteLikeId::M | quoting::QuoteLikeId::Qr) if opens_quote => {
                return self.scan_delimited(mark, text, TokenKind::String);
            }
            _ => {}
        }

        let kind = if keywords::is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.token(kind, text, mark)
    }

    /// Scan the repetition operator `x` / `x=` after a term.
    fn scan_repeat(&mut self, mark: Mark) -> Token {
        let mut text = String::new();
        self.advance_into(&mut text, 1);
        if self.peek() == Some('=') && !matches!(self.peek_nth(1), Some('=' | '~')) {
            self.advance_into(&mut text, 1);
        }
        self.token(TokenKind::Operator, text, mark)
    }

    fn scan_number(&mut self, mark: Mark) -> Token {
        let mut text = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_into(&mut text, 1);
        }
        self.token(TokenKind::Number, text, mark)
    }

    // ========================================================================
    // Operators and delimiters
    // ========================================================================

    fn scan_operator(&mut self, mark: Mark) -> Token {
        for len in [3, 2] {
            let candidate: Option<String> = (0..len).map(|i| self.peek_nth(i)).collect();
            if candidate.is_some_and(|c| operators::is_multi_char_operator(&c)) {
                let mut text = String::new();
                self.advance_into(&mut text, len);
                return self.token(TokenKind::Operator, text, mark);
            }
        }

        let mut text = String::new();
        let Some(c) = self.advance() else {
            return self.token(TokenKind::Error, text, mark);
        };
        text.push(c);

        let kind = match punctuation::from_char(c) {
            Some(id) => delimiter_kind(id),
            None if operators::symbolic_from_str(&text).is_some() => TokenKind::Operator,
            None => TokenKind::Error,
        };
        self.token(kind, text, mark)
    }
}

impl<I> Iterator for Tokenizer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let c = self.skip_trivia()?;
        let token = self.scan_token(c);
        self.previous = Some(Previous {
            kind: token.kind,
            text: token.text.clone(),
        });
        Some(token)
    }
}

fn delimiter_kind(id: punctuation::PunctuationId) -> TokenKind {
    use punctuation::PunctuationId as P;
    match id {
        P::LParen => TokenKind::LParen,
        P::RParen => TokenKind::RParen,
        P::LBrace => TokenKind::LBrace,
        P::RBrace => TokenKind::RBrace,
        P::LBracket => TokenKind::LBracket,
        P::RBracket => TokenKind::RBracket,
        P::Comma => TokenKind::Comma,
        P::Semicolon => TokenKind::Terminator,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// Public API
// ============================================================================

/// Tokenize a lazy sequence of source chunks.
///
/// ## Parameters
/// - `chunks`: Any iterable of string-like chunks (lines, buffers, ...). Chunk boundaries are invisible
///   to the scan.
///
/// ## Returns
/// - A lazy [`Tokenizer`] yielding one [`Token`] per lexical unit.
pub fn tokenize<C>(chunks: C) -> Tokenizer<C::IntoIter>
where
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    Tokenizer::new(chunks.into_iter())
}

/// Tokenize a whole source string.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Vec<Token> {
    tokenize(std::iter::once(source)).collect()
}
