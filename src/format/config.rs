//! Formatting configuration for MPP source.

/// Formatting configuration
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Quote style for string literals
    pub quote_style: QuoteStyle,
    /// Number of blank lines around top-level `sub` / `class` / `package` blocks
    pub blank_lines_around_subs: usize,
}

/// Quote style for string literals
///
/// `Double` and `Single` only rewrite strings whose body reads the same under both quotes (no escapes,
/// quotes or interpolation sigils); everything else keeps its original quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Double,
    Single,
    Preserve,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            quote_style: QuoteStyle::Preserve,
            blank_lines_around_subs: 1,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the quote style
    pub fn with_quote_style(mut self, style: QuoteStyle) -> Self {
        self.quote_style = style;
        self
    }

    /// Set the blank lines emitted around top-level block declarations
    pub fn with_blank_lines_around_subs(mut self, count: usize) -> Self {
        self.blank_lines_around_subs = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormatConfig::default();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.quote_style, QuoteStyle::Preserve);
        assert_eq!(config.blank_lines_around_subs, 1);
    }

    #[test]
    fn test_builder_chain_all() {
        let config = FormatConfig::new()
            .with_indent_width(2)
            .with_quote_style(QuoteStyle::Single)
            .with_blank_lines_around_subs(0);

        assert_eq!(config.indent_width, 2);
        assert_eq!(config.quote_style, QuoteStyle::Single);
        assert_eq!(config.blank_lines_around_subs, 0);
    }

    #[test]
    fn test_builder_override() {
        let config = FormatConfig::new().with_indent_width(2).with_indent_width(8);

        assert_eq!(config.indent_width, 8); // Last value wins
    }
}
