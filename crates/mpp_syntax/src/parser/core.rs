/// Parser core types and the streaming run loop.
///
/// This chunk defines the public [`Parser`] (an [`Iterator`] of top-level statements), the internal
/// [`Grammar`] that turns one statement-sized lexeme buffer into a [`Node`], and the [`Cursor`] the
/// grammar routines share.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a single module while
///   avoiding a single “god file”.

/// Streaming parser: pulls lexemes, segments them into statements, and yields one [`Node`] per
/// top-level statement.
///
/// ## Notes
/// - Statements are produced as soon as their end is known, so a consumer can act on early statements
///   before the rest of the input has been read.
/// - Malformed input never stops the iteration: it surfaces as [`Node::Error`] values.
pub struct Parser<I> {
    lexemes: I,
    segmenter: Segmenter,
    ready: VecDeque<Vec<Lexeme>>,
    errors: ErrorFactory,
    exhausted: bool,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Lexeme>,
{
    /// Create a parser over a lexeme stream.
    ///
    /// ## Parameters
    /// - `lexemes`: Lexeme stream produced by [`crate::classify::classify`].
    pub fn new(lexemes: I) -> Self {
        Self {
            lexemes,
            segmenter: Segmenter::default(),
            ready: VecDeque::new(),
            errors: ErrorFactory::default(),
            exhausted: false,
        }
    }

    /// Replace the error factory (the injectable Error System).
    pub fn with_errors(mut self, errors: ErrorFactory) -> Self {
        self.errors = errors;
        self
    }

    fn grammar(&self) -> Grammar<'_> {
        Grammar::new(&self.errors)
    }
}

impl<I> Iterator for Parser<I>
where
    I: Iterator<Item = Lexeme>,
{
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        loop {
            if let Some(buffer) = self.ready.pop_front() {
                return Some(self.grammar().statement(&buffer));
            }
            if self.exhausted {
                return None;
            }
            match self.lexemes.next() {
                Some(lexeme) => self.ready.extend(self.segmenter.push(lexeme)),
                None => {
                    self.exhausted = true;
                    self.ready.extend(self.segmenter.finish());
                }
            }
        }
    }
}

/// Statement and expression grammar over lexeme slices.
///
/// Every routine returns a [`Node`]; internal helpers use `Result<_, Node>` so that `?` can return an
/// error node as the whole construct.
struct Grammar<'e> {
    errors: &'e ErrorFactory,
    depth: Cell<usize>,
}

/// Maximum nesting of blocks, groups and chained operands within one statement.
pub const MAX_NESTING_DEPTH: usize = 100;

impl<'e> Grammar<'e> {
    fn new(errors: &'e ErrorFactory) -> Self {
        Self {
            errors,
            depth: Cell::new(0),
        }
    }

    /// Enter one nesting level, or return an error node anchored at `at` once the limit is reached.
    ///
    /// The level is released when the returned guard is dropped.
    fn enter(&self, at: &Lexeme) -> Result<DepthGuard<'_>, Node> {
        let depth = self.depth.get();
        if depth >= MAX_NESTING_DEPTH {
            return Err(self.errors.nesting_too_deep(at));
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard(&self.depth))
    }
}

/// Releases one nesting level on drop.
struct DepthGuard<'g>(&'g Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// A bracketed group consumed by [`Cursor::group`].
struct Group<'l> {
    open: &'l Lexeme,
    inner: &'l [Lexeme],
    closed: bool,
}

/// Position within a statement-sized lexeme slice.
struct Cursor<'l> {
    lexemes: &'l [Lexeme],
    pos: usize,
}

impl<'l> Cursor<'l> {
    fn new(lexemes: &'l [Lexeme]) -> Self {
        Self { lexemes, pos: 0 }
    }

    /// Start after the first `pos` lexemes (typically after a leading keyword).
    fn at(lexemes: &'l [Lexeme], pos: usize) -> Self {
        Self {
            lexemes,
            pos: pos.min(lexemes.len()),
        }
    }

    fn peek(&self) -> Option<&'l Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&'l Lexeme> {
        self.lexemes.get(self.pos + n)
    }

    fn advance(&mut self) -> Option<&'l Lexeme> {
        let lexeme = self.lexemes.get(self.pos)?;
        self.pos += 1;
        Some(lexeme)
    }

    fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.lexemes.len());
    }

    fn rest(&self) -> &'l [Lexeme] {
        &self.lexemes[self.pos..]
    }

    fn take_rest(&mut self) -> &'l [Lexeme] {
        let rest = self.rest();
        self.pos = self.lexemes.len();
        rest
    }

    fn check(&self, category: LexemeCategory) -> bool {
        self.peek().is_some_and(|l| l.is(category))
    }

    /// If the next lexeme is the opener `category`, consume the whole group.
    ///
    /// An unclosed group consumes the rest of the slice and is reported with `closed == false`.
    fn group(&mut self, category: LexemeCategory) -> Option<Group<'l>> {
        let open = self.peek().filter(|l| l.is(category))?;
        match find_matching(self.lexemes, self.pos) {
            Some(close) => {
                let inner = &self.lexemes[self.pos + 1..close];
                self.pos = close + 1;
                Some(Group {
                    open,
                    inner,
                    closed: true,
                })
            }
            None => {
                let inner = &self.lexemes[self.pos + 1..];
                self.pos = self.lexemes.len();
                Some(Group {
                    open,
                    inner,
                    closed: false,
                })
            }
        }
    }
}

/// Collapse an internal result: both arms are nodes.
fn settle(result: Result<Node, Node>) -> Node {
    match result {
        Ok(node) | Err(node) => node,
    }
}
