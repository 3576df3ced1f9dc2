/// Statement segmentation (the run loop's buffering stage).
///
/// Lexemes are buffered into one pending statement at a time. A statement ends at a `;` at brace depth
/// 0, or when a closing brace returns to depth 0 for a self-terminating construct (`if`, `sub`, a bare
/// block, ...). Multi-part constructs wait for one more lexeme to decide whether the next clause
/// (`elsif`, `catch`, `when`, `continue`, ...) continues them.

/// A multi-part construct waiting on its next clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    /// `if` → `elsif` / `else`
    If,
    /// `unless` → `else`
    Unless,
    /// `try` → `catch` (repeatable) / `finally`
    Try,
    /// `given` → `when` (repeatable) / `default`
    Given,
    /// `while` / `until` / `foreach` → `continue`
    Loop,
}

impl Continuation {
    fn accepts(self, lexeme: &Lexeme) -> bool {
        matches!(
            (self, lexeme.keyword_id()),
            (Continuation::If, Some(KeywordId::Elsif | KeywordId::Else))
                | (Continuation::Unless, Some(KeywordId::Else))
                | (Continuation::Try, Some(KeywordId::Catch | KeywordId::Finally))
                | (Continuation::Given, Some(KeywordId::When | KeywordId::Default))
                | (Continuation::Loop, Some(KeywordId::Continue))
        )
    }
}

/// Splits a lexeme stream into statement-sized buffers.
#[derive(Debug, Default)]
pub(crate) struct Segmenter {
    buffer: Vec<Lexeme>,
    brace_depth: usize,
    paren_depth: usize,
    /// Most recent clause keyword at depth 0 (`if`, then `elsif`, then `else`, ...).
    clause: Option<KeywordId>,
    pending: Option<Continuation>,
}

impl Segmenter {
    /// Feed one lexeme; returns the statements completed by it (zero, one, or two).
    pub(crate) fn push(&mut self, lexeme: Lexeme) -> Vec<Vec<Lexeme>> {
        let mut ready = Vec::new();

        if let Some(pending) = self.pending.take() {
            if pending.accepts(&lexeme) {
                self.clause = lexeme.keyword_id();
                self.buffer.push(lexeme);
                return ready;
            }
            ready.extend(self.emit());
        }

        match lexeme.category {
            LexemeCategory::Terminator if self.brace_depth == 0 && !self.in_for_header() => {
                ready.extend(self.emit());
            }
            LexemeCategory::LBrace => {
                self.brace_depth += 1;
                self.buffer.push(lexeme);
            }
            LexemeCategory::RBrace if self.brace_depth == 0 => {
                // Stray closer: finish what we have and hand the brace on as its own statement.
                ready.extend(self.emit());
                ready.push(vec![lexeme]);
            }
            LexemeCategory::RBrace => {
                self.brace_depth -= 1;
                self.buffer.push(lexeme);
                if self.brace_depth == 0 && self.paren_depth == 0 && self.is_self_terminating() {
                    match self.continuation() {
                        Some(continuation) => self.pending = Some(continuation),
                        None => ready.extend(self.emit()),
                    }
                }
            }
            LexemeCategory::LParen | LexemeCategory::LBracket => {
                self.paren_depth += 1;
                self.buffer.push(lexeme);
            }
            LexemeCategory::RParen | LexemeCategory::RBracket => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.buffer.push(lexeme);
            }
            _ => {
                if self.buffer.is_empty() {
                    self.clause = lexeme.keyword_id();
                }
                self.buffer.push(lexeme);
            }
        }
        ready
    }

    /// Flush at end of input: any non-empty buffer becomes a final (possibly incomplete) statement.
    pub(crate) fn finish(&mut self) -> Option<Vec<Lexeme>> {
        self.pending = None;
        self.emit()
    }

    fn emit(&mut self) -> Option<Vec<Lexeme>> {
        self.brace_depth = 0;
        self.paren_depth = 0;
        self.clause = None;
        if self.buffer.is_empty() {
            return None;
        }
        let buffer = std::mem::take(&mut self.buffer);
        tracing::trace!(lexemes = buffer.len(), line = buffer[0].token.line, "statement buffered");
        Some(buffer)
    }

    /// First lexeme after an optional `LABEL:` prefix.
    fn head(&self) -> Option<&Lexeme> {
        match self.buffer.as_slice() {
            [label, colon, rest @ ..] if label.is(LexemeCategory::Identifier) && colon.is_op(OperatorId::Colon) => {
                rest.first()
            }
            buffer => buffer.first(),
        }
    }

    /// Inside the parenthesized header of a C-style `for`, where `;` separates clauses.
    fn in_for_header(&self) -> bool {
        self.paren_depth > 0
            && self
                .head()
                .is_some_and(|l| matches!(l.keyword_id(), Some(KeywordId::For | KeywordId::Foreach)))
    }

    fn is_self_terminating(&self) -> bool {
        let Some(head) = self.head() else {
            return false;
        };
        if head.is(LexemeCategory::LBrace) {
            return true;
        }
        let second = self.buffer.get(1);
        match head.keyword_id() {
            Some(
                KeywordId::If
                | KeywordId::Unless
                | KeywordId::While
                | KeywordId::Until
                | KeywordId::For
                | KeywordId::Foreach
                | KeywordId::Given
                | KeywordId::When
                | KeywordId::Default
                | KeywordId::Try
                | KeywordId::Defer
                | KeywordId::Else
                | KeywordId::Elsif
                | KeywordId::Catch
                | KeywordId::Finally
                | KeywordId::Sub
                | KeywordId::Class
                | KeywordId::Package
                | KeywordId::Method,
            ) => true,
            Some(KeywordId::Async | KeywordId::My | KeywordId::Our | KeywordId::State) => {
                second.is_some_and(|l| l.is_keyword(KeywordId::Sub))
            }
            _ => false,
        }
    }

    fn continuation(&self) -> Option<Continuation> {
        let head = self.head()?.keyword_id()?;
        match (head, self.clause) {
            (KeywordId::If, Some(KeywordId::If | KeywordId::Elsif)) => Some(Continuation::If),
            (KeywordId::Unless, Some(KeywordId::Unless)) => Some(Continuation::Unless),
            (KeywordId::Try, Some(KeywordId::Try | KeywordId::Catch)) => Some(Continuation::Try),
            (KeywordId::Given, Some(KeywordId::Given | KeywordId::When)) => Some(Continuation::Given),
            // A labeled loop starts with its label, so the clause may be unset.
            (KeywordId::While | KeywordId::Until | KeywordId::For | KeywordId::Foreach, clause)
                if clause != Some(KeywordId::Continue) =>
            {
                Some(Continuation::Loop)
            }
            _ => None,
        }
    }
}
