//! String, word-list and regex scanning.
//!
//! ## Notes
//! - Backslash escapes are kept verbatim in the token text; nothing is unescaped here.
//! - Running out of input inside any quoted construct yields a single [`TokenKind::Error`] token that
//!   spans from the opening character to the end of input.

use super::{Mark, Token, TokenKind, Tokenizer};
use mpp_core::lang::quoting;

impl<I> Tokenizer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Scan a `"..."` or `'...'` literal starting at the opening quote.
    pub(super) fn scan_string(&mut self, mark: Mark) -> Token {
        let mut text = String::new();
        let Some(quote) = self.advance() else {
            return self.token(TokenKind::Error, text, mark);
        };
        text.push(quote);

        loop {
            match self.advance() {
                None => return self.token(TokenKind::Error, text, mark),
                Some('\\') => {
                    text.push('\\');
                    if let Some(escaped) = self.advance() {
                        text.push(escaped);
                    }
                }
                Some(c) => {
                    text.push(c);
                    if c == quote {
                        return self.token(TokenKind::String, text, mark);
                    }
                }
            }
        }
    }

    /// Scan a delimited body (`qw(...)`, `m{...}`, `qr/.../`, `/.../`) whose prefix is already in `text`.
    ///
    /// Paired delimiters nest; unpaired ones end at the first unescaped recurrence. Regex kinds
    /// (`TokenKind::String`) also consume trailing flag letters.
    pub(super) fn scan_delimited(&mut self, mark: Mark, mut text: String, kind: TokenKind) -> Token {
        let Some(open) = self.advance() else {
            return self.token(TokenKind::Error, text, mark);
        };
        text.push(open);
        let close = quoting::closing_delimiter(open);
        let paired = quoting::is_paired(open);
        let mut depth = 1usize;

        loop {
            let Some(c) = self.advance() else {
                return self.token(TokenKind::Error, text, mark);
            };
            text.push(c);
            if c == '\\' {
                if let Some(escaped) = self.advance() {
                    text.push(escaped);
                }
                continue;
            }
            if paired && c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }

        if kind == TokenKind::String {
            while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                self.advance_into(&mut text, 1);
            }
        }
        self.token(kind, text, mark)
    }
}
