//! Diagnostics for reporting parse errors.
//!
//! The parser records errors as [`Node::Error`](crate::ast::Node::Error) data. This module turns those
//! nodes into [`SyntaxDiagnostic`]s (thiserror + miette) so tooling can render them with source context.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::ErrorNode;

/// A syntax error with location information and source context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(mpp::syntax))]
pub struct SyntaxDiagnostic {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
    #[help]
    pub help: Option<String>,
}

impl ErrorNode {
    /// Build a renderable diagnostic for this error.
    ///
    /// ## Parameters
    /// - `file`: Display name of the source (path or `<stdin>`).
    /// - `source`: Full source text the error positions refer to.
    pub fn to_diagnostic(&self, file: &str, source: &str) -> SyntaxDiagnostic {
        let offset = offset_of(source, self.line, self.column);
        let len = self.text.len().clamp(1, source.len().saturating_sub(offset).max(1));
        SyntaxDiagnostic {
            message: self.message.clone(),
            src: NamedSource::new(file, source.to_string()),
            span: (offset, len).into(),
            help: hint_for(&self.message),
        }
    }
}

/// Byte offset of a 1-based `(line, column)` position. Positions past the end clamp to the source length.
pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut current_column = 1;
    for (i, c) in source.char_indices() {
        if current_line == line && current_column == column {
            return i;
        }
        if c == '\n' {
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.len()
}

// ============================================================================
// Hint catalog
// ============================================================================

fn hint_for(message: &str) -> Option<String> {
    let hint = if message.starts_with("Unterminated string") {
        "Close the string with the same quote character it was opened with"
    } else if message.starts_with("Unterminated qw") {
        "Close the word list with the delimiter matching its opening one"
    } else if message.starts_with("Missing closing") {
        "Check for an unbalanced bracket earlier in the statement"
    } else if message.starts_with("Missing right operand") {
        "A binary operator needs an expression on both sides"
    } else if message.starts_with("Empty expression") {
        "An expression is required here"
    } else if message.starts_with("Incomplete") {
        "Declarations need a name and, for subs, a `{ ... }` body"
    } else {
        return None;
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of_counts_characters() {
        let source = "ab\ncd\n";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 2), 4);
        assert_eq!(offset_of(source, 9, 9), source.len());
    }

    #[test]
    fn test_to_diagnostic_points_at_error_text() {
        let error = ErrorNode {
            message: "Unterminated string literal".to_string(),
            text: "\"abc".to_string(),
            line: 2,
            column: 7,
        };
        let diagnostic = error.to_diagnostic("t.mpp", "x;\nprint \"abc");
        assert_eq!(diagnostic.span.offset(), 9);
        assert_eq!(diagnostic.span.len(), 4);
        assert!(diagnostic.help.is_some());
        assert_eq!(diagnostic.to_string(), "Unterminated string literal");
    }
}
