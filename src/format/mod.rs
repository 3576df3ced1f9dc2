//! MPP source formatter
//!
//! Parses the source, then prints the tree back in a canonical layout:
//! - configurable indentation (4 spaces by default), one statement per line
//! - operators spaced and parenthesized by precedence only
//! - blank lines around named subs, methods, and block-form classes/packages
//!
//! Source that does not parse cleanly is refused rather than rewritten: an `Error` node has no
//! canonical spelling.

mod config;
mod formatter;
mod writer;

pub use config::{FormatConfig, QuoteStyle};
pub use formatter::Formatter;

use mpp_syntax::ast::find_error_nodes;
use mpp_syntax::parser;
use thiserror::Error;

/// Why a source could not be formatted.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot format source with {count} syntax error(s); first: {first}")]
    Syntax { count: usize, first: String },
}

/// Format MPP source code with default settings
pub fn format_source(source: &str) -> Result<String, FormatError> {
    format_source_with_config(source, FormatConfig::default())
}

/// Format MPP source code with custom configuration
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn format_source_with_config(source: &str, config: FormatConfig) -> Result<String, FormatError> {
    let program = parser::parse_source(source);
    let errors = find_error_nodes(&program);
    if let Some(first) = errors.first() {
        tracing::debug!(count = errors.len(), "refusing to format source with syntax errors");
        return Err(FormatError::Syntax {
            count: errors.len(),
            first: format!("{} at {}:{}", first.message, first.line, first.column),
        });
    }
    Ok(Formatter::new(config).format(&program))
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> Result<bool, FormatError> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}

/// Get the diff between original and formatted source
pub fn format_diff(source: &str) -> Result<Option<String>, FormatError> {
    let formatted = format_source(source)?;

    if source == formatted {
        return Ok(None);
    }

    // Line-by-line diff
    let mut diff = String::new();
    let original_lines: Vec<&str> = source.lines().collect();
    let formatted_lines: Vec<&str> = formatted.lines().collect();

    for i in 0..original_lines.len().max(formatted_lines.len()) {
        let orig = original_lines.get(i).copied().unwrap_or("");
        let fmt = formatted_lines.get(i).copied().unwrap_or("");

        if orig != fmt {
            if !orig.is_empty() {
                diff.push_str(&format!("-{:4} | {}\n", i + 1, orig));
            }
            if !fmt.is_empty() {
                diff.push_str(&format!("+{:4} | {}\n", i + 1, fmt));
            }
        }
    }

    Ok(Some(diff))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // format_source tests
    // ========================================

    #[test]
    fn test_format_empty_source() {
        assert_eq!(format_source("").unwrap(), "");
    }

    #[test]
    fn test_format_normalizes_spacing() {
        let out = format_source("my $total=$a+$b*2;").unwrap();
        assert_eq!(out, "my $total = $a + $b * 2;\n");
    }

    #[test]
    fn test_format_is_idempotent() {
        let source = "package Counter; sub inc { my ($self) = @_; $self->{n}++; return $self; } 1;";
        let once = format_source(source).unwrap();
        let twice = format_source(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_preserves_tree() {
        let source = "for my $i (1..10) { next if $i % 2; print \"$i\\n\"; }";
        let formatted = format_source(source).unwrap();
        assert_eq!(parser::parse_source(source), parser::parse_source(&formatted));
    }

    #[test]
    fn test_format_refuses_syntax_errors() {
        let err = format_source("my $x = ;").unwrap_err();
        let FormatError::Syntax { count, first } = err;
        assert_eq!(count, 1);
        assert!(first.contains("1:"), "first error should carry its position: {first}");
    }

    // ========================================
    // check_formatted / format_diff tests
    // ========================================

    #[test]
    fn test_check_formatted() {
        assert!(check_formatted("print 1;\n").unwrap());
        assert!(!check_formatted("print   1;").unwrap());
    }

    #[test]
    fn test_format_diff_none_when_formatted() {
        assert_eq!(format_diff("my $x = 1;\n").unwrap(), None);
    }

    #[test]
    fn test_format_diff_reports_changed_lines() {
        let diff = format_diff("my $x=1;\n").unwrap().unwrap();
        assert!(diff.contains("-   1 | my $x=1;"));
        assert!(diff.contains("+   1 | my $x = 1;"));
    }
}
