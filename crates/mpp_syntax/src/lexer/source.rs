//! Lazy character source over a sequence of text chunks.
//!
//! The tokenizer never sees chunk boundaries: [`SourceChars`] pulls the next chunk only when a lookahead
//! request runs past the characters already buffered, so a token may straddle any number of chunks.

use std::collections::VecDeque;

/// Character stream over lazily pulled chunks with arbitrary lookahead.
pub struct SourceChars<I> {
    chunks: I,
    pending: VecDeque<char>,
}

impl<I> SourceChars<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            pending: VecDeque::new(),
        }
    }

    /// Look `n` characters ahead (0 = next character) without consuming anything.
    ///
    /// Pulls chunks from upstream until enough characters are buffered or the input ends.
    pub fn peek_nth(&mut self, n: usize) -> Option<char> {
        while self.pending.len() <= n {
            let chunk = self.chunks.next()?;
            self.pending.extend(chunk.as_ref().chars());
        }
        self.pending.get(n).copied()
    }

    /// Consume one character.
    pub fn next_char(&mut self) -> Option<char> {
        self.peek_nth(0)?;
        self.pending.pop_front()
    }
}

impl<I> Iterator for SourceChars<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.next_char()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookahead_crosses_chunks() {
        let mut chars = SourceChars::new(["a", "", "bc", "d"].into_iter());
        assert_eq!(chars.peek_nth(3), Some('d'));
        assert_eq!(chars.next_char(), Some('a'));
        assert_eq!(chars.peek_nth(0), Some('b'));
        assert_eq!(chars.collect::<String>(), "bcd");
    }

    #[test]
    fn test_exhausted_source() {
        let mut chars = SourceChars::new(std::iter::empty::<&str>());
        assert_eq!(chars.peek_nth(0), None);
        assert_eq!(chars.next_char(), None);
    }
}
