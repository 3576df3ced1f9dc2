/// Parse a lexeme stream into a lazy sequence of top-level statements.
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `lexemes`: Lexeme stream produced by [`crate::classify::classify`].
///
/// ## Returns
/// A [`Parser`] yielding one [`Node`] per statement. Malformed statements come back as (or contain)
/// [`Node::Error`]; the iteration itself never fails.
pub fn parse<L>(lexemes: L) -> Parser<L::IntoIter>
where
    L: IntoIterator<Item = Lexeme>,
{
    Parser::new(lexemes.into_iter())
}

/// Run the full pipeline (tokenize → classify → parse) over source chunks.
///
/// ## Notes
/// - Chunks may split a token anywhere; the tokenizer stitches them back together.
/// - Nothing is read until the returned parser is polled.
pub fn parse_chunks<C>(chunks: C) -> Parser<Classifier<Tokenizer<C::IntoIter>>>
where
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    Parser::new(crate::classify::classify(crate::lexer::tokenize(chunks)))
}

/// Parse a whole source string and collect its statements.
///
/// ## Examples
/// ```rust
/// use mpp_syntax::{ast::Node, parser};
///
/// let program = parser::parse_source("my $x = 10; print $x;");
/// assert_eq!(program.len(), 2);
/// assert!(matches!(program[0], Node::Declaration { .. }));
/// ```
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_source(source: &str) -> Vec<Node> {
    let program: Vec<Node> = parse_chunks(std::iter::once(source)).collect();
    tracing::debug!(statements = program.len(), "parsed source");
    program
}

/// Parse one statement-sized buffer (no segmentation; a trailing `;` must already be stripped).
pub fn parse_statement(lexemes: &[Lexeme]) -> Node {
    let errors = ErrorFactory::default();
    Grammar::new(&errors).statement(lexemes)
}

/// Parse one expression (commas and low-precedence word operators included).
pub fn parse_expression(lexemes: &[Lexeme]) -> Node {
    let errors = ErrorFactory::default();
    let grammar = Grammar::new(&errors);
    match lexemes.first() {
        Some(first) => grammar.expression(lexemes, first, "in expression"),
        None => errors.empty_statement(None),
    }
}
