/// Parser utilities: depth tracking, delimiter matching, comma splitting, category predicates.
///
/// These are pure functions over lexeme slices. Every nesting-aware helper counts `(`, `[` and `{`
/// uniformly, so they stay correct for arbitrarily mixed delimiters.

// ============================================================================
// Delimiters
// ============================================================================

/// Index of the bracket closing the opener at `open`.
///
/// Returns `None` if `open` is not an opener, the group never closes, or it closes with the wrong kind
/// of bracket.
pub fn find_matching(lexemes: &[Lexeme], open: usize) -> Option<usize> {
    let opener = lexemes.get(open)?;
    let expected = match opener.token.kind {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBracket => TokenKind::RBracket,
        TokenKind::LBrace => TokenKind::RBrace,
        _ => return None,
    };
    let mut depth = 0isize;
    for (i, lexeme) in lexemes.iter().enumerate().skip(open) {
        depth += lexeme.depth_delta();
        if depth == 0 {
            return (lexeme.token.kind == expected).then_some(i);
        }
    }
    None
}

/// Split on commas at nesting depth 0. Empty segments (a trailing comma, `,,`) are skipped.
///
/// ## Examples
/// ```rust
/// use mpp_syntax::{classify, parser};
///
/// let lexemes = classify::lexemes("f(1, [2,3], {4=>5}), 6");
/// assert_eq!(parser::split_top_level_commas(&lexemes).len(), 2);
/// ```
pub fn split_top_level_commas(lexemes: &[Lexeme]) -> Vec<&[Lexeme]> {
    let mut segments = Vec::new();
    let mut start = 0;
    while start <= lexemes.len() {
        let end = skip_to_comma(lexemes, start);
        if end > start {
            segments.push(&lexemes[start..end]);
        }
        if end >= lexemes.len() {
            break;
        }
        start = end + 1;
    }
    segments
}

/// Return `true` if `lexemes` contains a comma at depth 0.
pub fn has_top_level_comma(lexemes: &[Lexeme]) -> bool {
    skip_to_comma(lexemes, 0) < lexemes.len()
}

/// First index at nesting depth 0 whose lexeme satisfies `pred`.
pub fn find_top_level(lexemes: &[Lexeme], pred: impl Fn(&Lexeme) -> bool) -> Option<usize> {
    let mut depth = 0isize;
    for (i, lexeme) in lexemes.iter().enumerate() {
        if depth == 0 && pred(lexeme) {
            return Some(i);
        }
        depth += lexeme.depth_delta();
    }
    None
}

/// Split on every depth-0 lexeme satisfying `pred` (the separators are dropped; empty parts are kept).
pub fn split_top_level(lexemes: &[Lexeme], pred: impl Fn(&Lexeme) -> bool) -> Vec<&[Lexeme]> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (i, lexeme) in lexemes.iter().enumerate() {
        if depth == 0 && pred(lexeme) {
            parts.push(&lexemes[start..i]);
            start = i + 1;
        }
        depth += lexeme.depth_delta();
    }
    parts.push(&lexemes[start..]);
    parts
}

/// Index of the `:` partnering a `?` whose branch starts at `lexemes[0]`.
///
/// Nested `?:` pairs inside the branch are skipped by a ternary depth that is tracked separately from
/// bracket depth.
pub fn find_ternary_colon(lexemes: &[Lexeme]) -> Option<usize> {
    let mut depth = 0isize;
    let mut ternary_depth = 0usize;
    for (i, lexeme) in lexemes.iter().enumerate() {
        if depth == 0 {
            if lexeme.is_op(OperatorId::Question) {
                ternary_depth += 1;
            } else if lexeme.is_op(OperatorId::Colon) {
                if ternary_depth == 0 {
                    return Some(i);
                }
                ternary_depth -= 1;
            }
        }
        depth += lexeme.depth_delta();
        if depth < 0 {
            return None;
        }
    }
    None
}

// ============================================================================
// Category predicates
// ============================================================================

/// Lexemes that can begin an operand (used to detect list-operator calls such as `push @a, 1`).
pub fn starts_term(lexeme: &Lexeme) -> bool {
    match lexeme.category {
        LexemeCategory::Literal
        | LexemeCategory::Boolean
        | LexemeCategory::ScalarVar
        | LexemeCategory::ArrayVar
        | LexemeCategory::HashVar
        | LexemeCategory::CodeVar
        | LexemeCategory::Variable
        | LexemeCategory::Identifier
        | LexemeCategory::LBracket
        | LexemeCategory::LBrace
        | LexemeCategory::Declaration
        | LexemeCategory::UnOp
        | LexemeCategory::TokenError => true,
        LexemeCategory::Keyword => lexeme.operator_id().is_none(),
        LexemeCategory::Control => matches!(
            lexeme.keyword_id(),
            Some(KeywordId::Do | KeywordId::Eval | KeywordId::Die | KeywordId::Return)
        ),
        _ => false,
    }
}

/// Low-precedence word operators (`or`, `xor`, `and`, `not`).
fn is_low_precedence(lexeme: &Lexeme, ids: &[OperatorId]) -> bool {
    lexeme.is(LexemeCategory::Keyword) && lexeme.operator_id().is_some_and(|id| ids.contains(&id))
}

/// Builtins that may take a leading `{ ... }` argument (`map { ... } @list`).
pub fn takes_block_argument(name: &str) -> bool {
    matches!(name, "map" | "grep" | "sort" | "first" | "any" | "all" | "none")
}

/// Builtins that take exactly one argument and bind tighter than comparison (`ref $x eq 'HASH'`).
pub fn is_named_unary(name: &str) -> bool {
    matches!(
        name,
        "ref"
            | "scalar"
            | "lc"
            | "uc"
            | "lcfirst"
            | "ucfirst"
            | "length"
            | "chr"
            | "ord"
            | "int"
            | "abs"
            | "sqrt"
            | "hex"
            | "oct"
            | "chomp"
            | "chop"
            | "chdir"
            | "rmdir"
            | "readline"
            | "close"
            | "exit"
            | "rand"
            | "srand"
            | "log"
            | "exp"
            | "quotemeta"
            | "fc"
            | "caller"
            | "keys"
            | "values"
            | "each"
            | "shift"
            | "pop"
            | "defined"
            | "undef"
            | "exists"
            | "delete"
            | "alive"
    )
}

/// Filehandle-looking barewords (`STDERR`, `OUT`).
fn is_filehandle_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Convert a `$name` / `@name` spelling into `(sigil, name)`.
fn split_sigil(text: &str) -> (char, String) {
    let mut chars = text.chars();
    let sigil = chars.next().unwrap_or('$');
    (sigil, chars.as_str().to_string())
}
