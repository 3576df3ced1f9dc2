/// Error System: factory for typed Error nodes and recovery-position helpers.
///
/// Every parsing routine that cannot build the node it was asked for returns one of these instead, so
/// a malformed construct degrades precision locally without aborting the parse.
///
/// ## Notes
/// - Errors are differentiated by message shape, not by type: all of them are [`Node::Error`].
/// - The factory is injected into the [`Parser`] (see [`Parser::with_errors`]); its configuration only
///   affects message text.

// ============================================================================
// Configuration
// ============================================================================

/// Error message configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorConfig {
    /// How many lexemes of trailing context to quote in "found ..." messages.
    pub context_width: usize,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self { context_width: 3 }
    }
}

/// Factory for [`Node::Error`] values.
#[derive(Debug, Clone, Default)]
pub struct ErrorFactory {
    config: ErrorConfig,
}

impl ErrorFactory {
    pub fn new(config: ErrorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ErrorConfig {
        self.config
    }

    fn build(&self, message: String, at: Option<&Lexeme>) -> Node {
        let (text, line, column) = match at {
            Some(l) => (l.text().to_string(), l.token.line, l.token.column),
            None => (String::new(), 0, 0),
        };
        tracing::debug!(%message, line, column, "error node");
        Node::Error(ErrorNode {
            message,
            text,
            line,
            column,
        })
    }

    /// Quote up to `context_width` lexemes of `lexemes`, or describe the end of the statement.
    fn context(&self, lexemes: &[Lexeme]) -> String {
        if lexemes.is_empty() {
            return "end of statement".to_string();
        }
        let width = self.config.context_width.max(1);
        let shown: Vec<&str> = lexemes.iter().take(width).map(Lexeme::text).collect();
        let ellipsis = if lexemes.len() > width { " ..." } else { "" };
        format!("'{}{}'", shown.join(" "), ellipsis)
    }

    // ========================================================================
    // Structural errors
    // ========================================================================

    /// `Expected {expected}, found {context}`, positioned at the first found lexeme (or `at`).
    pub fn missing_token(&self, expected: &str, found: &[Lexeme], at: &Lexeme) -> Node {
        let message = format!("Expected {expected}, found {}", self.context(found));
        self.build(message, Some(found.first().unwrap_or(at)))
    }

    /// `Unexpected '{token}' {context}`.
    pub fn unexpected_token(&self, token: &Lexeme, context: &str) -> Node {
        self.build(format!("Unexpected '{}' {context}", token.text()), Some(token))
    }

    /// A bracket with no matching partner.
    pub fn missing_closing_delimiter(&self, open: &Lexeme) -> Node {
        let close = match open.token.kind {
            TokenKind::LParen => ")",
            TokenKind::LBracket => "]",
            _ => "}",
        };
        self.build(format!("Missing closing '{close}' for '{}'", open.text()), Some(open))
    }

    /// Nesting past [`MAX_NESTING_DEPTH`]; the rest of the construct is not parsed.
    pub fn nesting_too_deep(&self, at: &Lexeme) -> Node {
        self.build(format!("Nesting deeper than {MAX_NESTING_DEPTH} levels"), Some(at))
    }

    /// `Unterminated {construct}`.
    pub fn unterminated(&self, construct: &str, at: &Lexeme) -> Node {
        self.build(format!("Unterminated {construct}"), Some(at))
    }

    // ========================================================================
    // Expression errors
    // ========================================================================

    /// A required expression position is empty.
    pub fn empty_expression(&self, context: &str, at: &Lexeme) -> Node {
        self.build(format!("Empty expression {context}"), Some(at))
    }

    /// A binary operator with nothing on its right.
    pub fn missing_operand(&self, op: &Lexeme) -> Node {
        self.build(format!("Missing right operand after '{}'", op.text()), Some(op))
    }

    // ========================================================================
    // Declaration / statement-shape errors
    // ========================================================================

    /// `Incomplete {kind} declaration: {detail}`.
    pub fn incomplete_declaration(&self, kind: &str, detail: &str, at: &Lexeme) -> Node {
        self.build(format!("Incomplete {kind} declaration: {detail}"), Some(at))
    }

    /// A statement whose overall shape is invalid (message used verbatim).
    pub fn invalid_statement(&self, message: &str, at: &Lexeme) -> Node {
        self.build(message.to_string(), Some(at))
    }

    /// Generic fallback when a construct could not be parsed.
    pub fn parse_failure(&self, construct: &str, lexemes: &[Lexeme], at: &Lexeme) -> Node {
        let message = format!("Could not parse {construct}: {}", self.context(lexemes));
        self.build(message, Some(lexemes.first().unwrap_or(at)))
    }

    /// An empty statement buffer. Without an anchor the position is reported as `0:0`.
    pub fn empty_statement(&self, at: Option<&Lexeme>) -> Node {
        self.build("Empty statement".to_string(), at)
    }

    // ========================================================================
    // Tokenization errors
    // ========================================================================

    /// Convert a `TOKEN_ERROR` lexeme into an error node.
    pub fn token_error(&self, token: &Lexeme) -> Node {
        let text = token.text();
        let message = if text.starts_with(['"', '\'']) {
            "Unterminated string literal".to_string()
        } else if text.starts_with("qw") {
            "Unterminated qw word list".to_string()
        } else if text.len() > 1 && (text.starts_with('/') || text.starts_with('m') || text.starts_with("qr")) {
            "Unterminated regex literal".to_string()
        } else if matches!(text, "$" | "@" | "%" | "&") {
            format!("Expected variable name after '{text}'")
        } else {
            format!("Unrecognized character '{text}'")
        };
        self.build(message, Some(token))
    }
}

// ============================================================================
// Recovery positions
// ============================================================================

/// Index of the next `;` at nesting depth 0 at or after `from` (or `lexemes.len()`).
pub fn skip_to_terminator(lexemes: &[Lexeme], from: usize) -> usize {
    skip_to_top_level(lexemes, from, |l| l.is(LexemeCategory::Terminator))
}

/// Index of the next `,` at nesting depth 0 at or after `from` (or `lexemes.len()`).
pub fn skip_to_comma(lexemes: &[Lexeme], from: usize) -> usize {
    skip_to_top_level(lexemes, from, |l| l.is(LexemeCategory::Comma))
}

/// Index of the next safe resumption point at or after `from`: just past a top-level `;` or a brace
/// that closes back to depth 0, or at a top-level declaration/control keyword. Returns
/// `lexemes.len()` when there is none.
pub fn synchronize(lexemes: &[Lexeme], from: usize) -> usize {
    let mut depth = 0isize;
    for (i, lexeme) in lexemes.iter().enumerate().skip(from) {
        if depth == 0 && i > from && matches!(lexeme.category, LexemeCategory::Declaration | LexemeCategory::Control) {
            return i;
        }
        match lexeme.category {
            LexemeCategory::Terminator if depth == 0 => return i + 1,
            LexemeCategory::RBrace if depth == 1 => return i + 1,
            _ => {}
        }
        depth = (depth + lexeme.depth_delta()).max(0);
    }
    lexemes.len()
}

fn skip_to_top_level(lexemes: &[Lexeme], from: usize, stop: impl Fn(&Lexeme) -> bool) -> usize {
    let mut depth = 0isize;
    for (i, lexeme) in lexemes.iter().enumerate().skip(from) {
        if depth == 0 && stop(lexeme) {
            return i;
        }
        depth = (depth + lexeme.depth_delta()).max(0);
    }
    lexemes.len()
}
