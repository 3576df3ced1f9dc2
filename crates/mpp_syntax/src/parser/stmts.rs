/// Statement dispatch and control-flow statements.
///
/// ## Notes
/// - Dispatch is keyed on the first lexeme of the buffer and is ordered: loop label, postfix modifier,
///   bare block, control keywords, `package` / `use` / `require` / `class`, `print` / `say`,
///   sub-like declarations, variable declarations, assignment, and finally a plain expression.

impl Grammar<'_> {
    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Parse one statement-sized buffer (without its terminating `;`).
    fn statement(&self, lx: &[Lexeme]) -> Node {
        let Some(first) = lx.first() else {
            return self.errors.empty_statement(None);
        };

        if let Some(node) = self.labeled(lx) {
            return node;
        }
        if let Some(at) = postfix_modifier_index(lx) {
            return self.postfix_modifier(lx, at);
        }
        if first.is(LexemeCategory::LBrace) {
            return self.bare_block(lx, None);
        }

        let second = lx.get(1);
        match first.keyword_id() {
            Some(KeywordId::If) => return settle(self.if_statement(lx)),
            Some(KeywordId::Unless) => return settle(self.unless_statement(lx)),
            Some(KeywordId::While | KeywordId::Until) => return settle(self.while_statement(lx, None)),
            Some(KeywordId::For | KeywordId::Foreach) => return settle(self.foreach_statement(lx, None)),
            Some(KeywordId::Given) => return settle(self.given_statement(lx)),
            Some(KeywordId::When) => return settle(self.when_statement(lx)),
            Some(KeywordId::Default) => return settle(self.default_statement(lx)),
            Some(KeywordId::Try) => return settle(self.try_statement(lx)),
            Some(KeywordId::Defer) => return settle(self.defer_statement(lx)),
            Some(KeywordId::Elsif | KeywordId::Else | KeywordId::Catch | KeywordId::Finally) => {
                return self.errors.unexpected_token(first, "without a preceding block statement");
            }
            Some(KeywordId::Package) => return settle(self.package_statement(lx)),
            Some(KeywordId::Use) => return settle(self.use_statement(lx)),
            Some(KeywordId::Require) => return settle(self.require_statement(lx)),
            Some(KeywordId::Class) => return settle(self.class_statement(lx)),
            Some(KeywordId::Print | KeywordId::Say)
                if !second.is_some_and(|l| l.is(LexemeCategory::LParen)) && !has_low_precedence_op(lx) =>
            {
                return self.print_like(first, &lx[1..]);
            }
            Some(KeywordId::Sub) if second.is_some_and(|l| l.is(LexemeCategory::Identifier)) => {
                return settle(self.sub_statement(lx));
            }
            Some(KeywordId::Async | KeywordId::My | KeywordId::Our | KeywordId::State)
                if second.is_some_and(|l| l.is_keyword(KeywordId::Sub)) =>
            {
                return settle(self.sub_statement(lx));
            }
            Some(KeywordId::Method) => return settle(self.method_statement(lx)),
            Some(KeywordId::Field) => return settle(self.field_statement(lx)),
            Some(KeywordId::Has) if second.is_some_and(|l| l.category.is_variable()) => {
                return settle(self.field_statement(lx));
            }
            Some(KeywordId::My | KeywordId::Our | KeywordId::State | KeywordId::Const) => {
                return settle(self.declaration_statement(lx));
            }
            _ => {}
        }

        if !has_top_level_comma(lx) && !has_low_precedence_op(lx) {
            if let Some(at) = find_top_level(lx, |l| l.is(LexemeCategory::AssignOp)) {
                return self.assignment_statement(lx, at);
            }
        }
        self.expression(lx, first, "in statement")
    }

    /// `LABEL: while ...`, `LABEL: foreach ...`, `LABEL: { ... }`.
    fn labeled(&self, lx: &[Lexeme]) -> Option<Node> {
        let [label, colon, head, ..] = lx else {
            return None;
        };
        if !label.is(LexemeCategory::Identifier) || !colon.is_op(OperatorId::Colon) {
            return None;
        }
        let name = Some(label.text().to_string());
        match head.keyword_id() {
            Some(KeywordId::While | KeywordId::Until) => Some(settle(self.while_statement(&lx[2..], name))),
            Some(KeywordId::For | KeywordId::Foreach) => Some(settle(self.foreach_statement(&lx[2..], name))),
            _ if head.is(LexemeCategory::LBrace) => Some(self.bare_block(&lx[2..], name)),
            _ => None,
        }
    }

    /// `STATEMENT if COND`, `STATEMENT foreach LIST`, ...
    fn postfix_modifier(&self, lx: &[Lexeme], at: usize) -> Node {
        let keyword = &lx[at];
        let inner = self.statement(&lx[..at]);
        if matches!(
            inner,
            Node::Sub { name: Some(_), .. } | Node::Class { .. } | Node::Package { .. } | Node::Use { .. }
        ) {
            let message = format!("Invalid target for postfix '{}': {}", keyword.text(), inner.type_name());
            return self.errors.invalid_statement(&message, keyword);
        }

        let context = format!("after postfix '{}'", keyword.text());
        let condition = Box::new(self.expression(&lx[at + 1..], keyword, &context));
        let body = vec![inner];
        match keyword.keyword_id() {
            Some(KeywordId::Unless) => Node::Unless {
                condition,
                then_block: body,
                else_block: None,
                postfix: true,
            },
            Some(KeywordId::While) => Node::While {
                label: None,
                condition,
                body,
                continue_block: None,
                postfix: true,
            },
            Some(KeywordId::Until) => Node::Until {
                label: None,
                condition,
                body,
                continue_block: None,
                postfix: true,
            },
            Some(KeywordId::For | KeywordId::Foreach) => Node::Foreach {
                label: None,
                declarator: None,
                variable: None,
                list: condition,
                body,
                continue_block: None,
                postfix: true,
            },
            _ => Node::If {
                condition,
                then_block: body,
                elsif_clauses: Vec::new(),
                else_block: None,
                postfix: true,
            },
        }
    }

    fn bare_block(&self, lx: &[Lexeme], label: Option<String>) -> Node {
        let open = &lx[0];
        match find_matching(lx, 0) {
            Some(close) if close + 1 == lx.len() => Node::Block {
                label,
                statements: self.block_body(&lx[1..close]),
            },
            // `{ ... }->method` and friends: an expression that happens to start with a brace.
            Some(_) if label.is_none() => self.expression(lx, open, "in statement"),
            Some(close) => self.errors.unexpected_token(&lx[close + 1], "after labeled block"),
            None => self.errors.unterminated("block", open),
        }
    }

    fn assignment_statement(&self, lx: &[Lexeme], at: usize) -> Node {
        let op = &lx[at];
        let (lhs, rhs) = (&lx[..at], &lx[at + 1..]);
        let target = if lhs.is_empty() {
            self.errors.empty_expression(&format!("before '{}'", op.text()), op)
        } else {
            self.expression(lhs, op, "in assignment target")
        };
        let value = if rhs.is_empty() {
            self.errors.empty_expression(&format!("after '{}'", op.text()), op)
        } else {
            self.expression(rhs, op, "in assignment")
        };
        Node::assignment(target, op.text(), value)
    }

    // ========================================================================
    // Shared pieces
    // ========================================================================

    /// Parse the statements of a block body with a fresh segmenter.
    fn block_body(&self, inner: &[Lexeme]) -> Block {
        let Some(first) = inner.first() else {
            return Vec::new();
        };
        let _guard = match self.enter(first) {
            Ok(guard) => guard,
            Err(error) => return vec![error],
        };
        let mut segmenter = Segmenter::default();
        let mut buffers = Vec::new();
        for lexeme in inner {
            buffers.extend(segmenter.push(lexeme.clone()));
        }
        buffers.extend(segmenter.finish());
        buffers.iter().map(|buffer| self.statement(buffer)).collect()
    }

    /// `( EXPR )` after a control keyword.
    fn paren_condition(&self, cur: &mut Cursor<'_>, keyword: &Lexeme) -> Result<Node, Node> {
        let Some(group) = cur.group(LexemeCategory::LParen) else {
            let expected = format!("'(' after '{}'", keyword.text());
            return Err(self.errors.missing_token(&expected, cur.rest(), keyword));
        };
        if !group.closed {
            return Err(self.errors.missing_closing_delimiter(group.open));
        }
        if group.inner.is_empty() {
            let context = format!("in '{}' condition", keyword.text());
            return Ok(self.errors.empty_expression(&context, group.open));
        }
        Ok(self.expression(group.inner, group.open, "in condition"))
    }

    /// `{ STATEMENTS }` owned by `owner`.
    fn block(&self, cur: &mut Cursor<'_>, owner: &Lexeme) -> Result<Block, Node> {
        let Some(group) = cur.group(LexemeCategory::LBrace) else {
            let expected = format!("block for '{}'", owner.text());
            return Err(self.errors.missing_token(&expected, cur.rest(), owner));
        };
        if !group.closed {
            return Err(self.errors.unterminated("block", group.open));
        }
        Ok(self.block_body(group.inner))
    }

    /// Fail if anything is left after a complete construct.
    fn expect_end(&self, cur: &Cursor<'_>, construct: &str) -> Result<(), Node> {
        match cur.peek() {
            Some(extra) => Err(self.errors.unexpected_token(extra, &format!("after {construct}"))),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Conditionals
    // ========================================================================

    fn if_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let condition = self.paren_condition(&mut cur, keyword)?;
        let then_block = self.block(&mut cur, keyword)?;

        let mut elsif_clauses = Vec::new();
        let mut else_block = None;
        while let Some(next) = cur.advance() {
            match next.keyword_id() {
                Some(KeywordId::Elsif) if else_block.is_none() => {
                    let condition = self.paren_condition(&mut cur, next)?;
                    let block = self.block(&mut cur, next)?;
                    elsif_clauses.push(ElsifClause { condition, block });
                }
                Some(KeywordId::Else) if else_block.is_none() => {
                    else_block = Some(self.block(&mut cur, next)?);
                }
                _ => return Err(self.errors.unexpected_token(next, "after 'if' statement")),
            }
        }

        Ok(Node::If {
            condition: Box::new(condition),
            then_block,
            elsif_clauses,
            else_block,
            postfix: false,
        })
    }

    fn unless_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let condition = self.paren_condition(&mut cur, keyword)?;
        let then_block = self.block(&mut cur, keyword)?;

        let mut else_block = None;
        if cur.peek().is_some_and(|l| l.is_keyword(KeywordId::Else)) {
            let else_kw = &lx[cur.pos];
            cur.skip(1);
            else_block = Some(self.block(&mut cur, else_kw)?);
        }
        self.expect_end(&cur, "'unless' statement")?;

        Ok(Node::Unless {
            condition: Box::new(condition),
            then_block,
            else_block,
            postfix: false,
        })
    }

    fn given_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let topic = self.paren_condition(&mut cur, keyword)?;
        let block = self.block(&mut cur, keyword)?;

        let mut whens = Vec::new();
        let mut default = None;
        while let Some(next) = cur.advance() {
            match next.keyword_id() {
                Some(KeywordId::When) if default.is_none() => {
                    let condition = self.paren_condition(&mut cur, next)?;
                    let block = self.block(&mut cur, next)?;
                    whens.push(Node::When {
                        condition: Box::new(condition),
                        block,
                    });
                }
                Some(KeywordId::Default) if default.is_none() => {
                    default = Some(self.block(&mut cur, next)?);
                }
                _ => return Err(self.errors.unexpected_token(next, "after 'given' statement")),
            }
        }

        Ok(Node::Given {
            topic: Box::new(topic),
            block,
            whens,
            default,
        })
    }

    fn when_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let condition = self.paren_condition(&mut cur, keyword)?;
        let block = self.block(&mut cur, keyword)?;
        self.expect_end(&cur, "'when' block")?;
        Ok(Node::When {
            condition: Box::new(condition),
            block,
        })
    }

    fn default_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let mut cur = Cursor::at(lx, 1);
        let block = self.block(&mut cur, &lx[0])?;
        self.expect_end(&cur, "'default' block")?;
        Ok(Node::Default { block })
    }

    // ========================================================================
    // Loops
    // ========================================================================

    fn while_statement(&self, lx: &[Lexeme], label: Option<String>) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let condition = Box::new(self.paren_condition(&mut cur, keyword)?);
        let body = self.block(&mut cur, keyword)?;
        let continue_block = self.continue_block(&mut cur)?;
        self.expect_end(&cur, &format!("'{}' loop", keyword.text()))?;
        Ok(if keyword.is_keyword(KeywordId::Until) {
            Node::Until {
                label,
                condition,
                body,
                continue_block,
                postfix: false,
            }
        } else {
            Node::While {
                label,
                condition,
                body,
                continue_block,
                postfix: false,
            }
        })
    }

    /// An optional `continue BLOCK` after a loop body.
    fn continue_block(&self, cur: &mut Cursor<'_>) -> Result<Option<Block>, Node> {
        match cur.peek() {
            Some(keyword) if keyword.is_keyword(KeywordId::Continue) => {
                cur.skip(1);
                self.block(cur, keyword).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// `foreach [my] $x (LIST) BLOCK`, `foreach (LIST) BLOCK`, or C-style `for (INIT; COND; STEP) BLOCK`.
    fn foreach_statement(&self, lx: &[Lexeme], label: Option<String>) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);

        if cur.check(LexemeCategory::LParen) {
            if let Some(close) = find_matching(lx, cur.pos) {
                let header = &lx[cur.pos + 1..close];
                if find_top_level(header, |l| l.is(LexemeCategory::Terminator)).is_some() {
                    cur.skip(close + 1 - cur.pos);
                    return self.c_style_for(&mut cur, keyword, header, label);
                }
            }
        }

        let mut declarator = None;
        if let Some(decl) = cur.peek().filter(|l| is_scope_declarator(l)) {
            declarator = Some(decl.text().to_string());
            cur.skip(1);
        }
        let variable = match cur.peek() {
            Some(var) if var.is(LexemeCategory::ScalarVar) => {
                cur.skip(1);
                Some(Box::new(variable_node(var)))
            }
            Some(other) if declarator.is_some() || other.category.is_variable() => {
                let message = format!("foreach without a scalar iterator variable: found '{}'", other.text());
                return Err(self.errors.invalid_statement(&message, other));
            }
            None if declarator.is_some() => {
                return Err(self.errors.incomplete_declaration("foreach", "missing iterator variable", keyword));
            }
            _ => None,
        };

        let Some(group) = cur.group(LexemeCategory::LParen) else {
            return Err(self.errors.missing_token("'(' with the list to iterate", cur.rest(), keyword));
        };
        if !group.closed {
            return Err(self.errors.missing_closing_delimiter(group.open));
        }
        let list = if group.inner.is_empty() {
            Node::List { elements: Vec::new() }
        } else {
            self.expression(group.inner, group.open, "in foreach list")
        };
        let body = self.block(&mut cur, keyword)?;
        let continue_block = self.continue_block(&mut cur)?;
        self.expect_end(&cur, "'foreach' loop")?;

        Ok(Node::Foreach {
            label,
            declarator,
            variable,
            list: Box::new(list),
            body,
            continue_block,
            postfix: false,
        })
    }

    fn c_style_for(
        &self,
        cur: &mut Cursor<'_>,
        keyword: &Lexeme,
        header: &[Lexeme],
        label: Option<String>,
    ) -> Result<Node, Node> {
        let first = skip_to_terminator(header, 0);
        let second = skip_to_terminator(header, first + 1);
        if second >= header.len() {
            return Err(self.errors.missing_token("second ';' in 'for' header", &[], &header[first]));
        }
        let clause = |part: &[Lexeme]| (!part.is_empty()).then(|| Box::new(self.statement(part)));
        let init = clause(&header[..first]);
        let condition = clause(&header[first + 1..second]);
        let step = clause(&header[second + 1..]);
        let body = self.block(cur, keyword)?;
        self.expect_end(cur, "'for' loop")?;
        Ok(Node::For {
            label,
            init,
            condition,
            step,
            body,
        })
    }

    // ========================================================================
    // Exceptions and scope guards
    // ========================================================================

    fn try_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let block = self.block(&mut cur, keyword)?;

        let mut catches = Vec::new();
        let mut finally = None;
        while let Some(next) = cur.advance() {
            match next.keyword_id() {
                Some(KeywordId::Catch) if finally.is_none() => {
                    let variable = self.catch_variable(&mut cur)?;
                    let block = self.block(&mut cur, next)?;
                    catches.push(CatchClause { variable, block });
                }
                Some(KeywordId::Finally) if finally.is_none() => {
                    finally = Some(self.block(&mut cur, next)?);
                }
                _ => return Err(self.errors.unexpected_token(next, "after 'try' statement")),
            }
        }

        Ok(Node::Try {
            block,
            catches,
            finally,
        })
    }

    /// Optional `($e)` after `catch`.
    fn catch_variable(&self, cur: &mut Cursor<'_>) -> Result<Option<Node>, Node> {
        let Some(group) = cur.group(LexemeCategory::LParen) else {
            return Ok(None);
        };
        if !group.closed {
            return Err(self.errors.missing_closing_delimiter(group.open));
        }
        match group.inner {
            [var] if var.category.is_variable() => Ok(Some(variable_node(var))),
            [] => Err(self.errors.empty_expression("in 'catch' variable", group.open)),
            [other, ..] => Err(self.errors.unexpected_token(other, "in 'catch' variable")),
        }
    }

    fn defer_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let mut cur = Cursor::at(lx, 1);
        let block = self.block(&mut cur, &lx[0])?;
        self.expect_end(&cur, "'defer' block")?;
        Ok(Node::Defer { block })
    }
}

/// Index of a statement-modifier keyword (`if`, `unless`, `while`, `until`, `for`, `foreach`) at depth 0,
/// unless the statement itself starts with a block construct.
fn postfix_modifier_index(lx: &[Lexeme]) -> Option<usize> {
    let first = lx.first()?;
    let starts_block_construct = first.is(LexemeCategory::LBrace)
        || matches!(
            first.keyword_id(),
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
                    | KeywordId::Elsif
                    | KeywordId::Else
                    | KeywordId::Catch
                    | KeywordId::Finally
                    | KeywordId::Class
                    | KeywordId::Method
            )
        )
        || (first.is_keyword(KeywordId::Sub) && lx.get(1).is_some_and(|l| l.is(LexemeCategory::Identifier)));
    if starts_block_construct {
        return None;
    }
    find_top_level(&lx[1..], |l| {
        matches!(
            l.keyword_id(),
            Some(
                KeywordId::If
                    | KeywordId::Unless
                    | KeywordId::While
                    | KeywordId::Until
                    | KeywordId::For
                    | KeywordId::Foreach
            )
        )
    })
    .map(|i| i + 1)
}

/// `or` / `xor` / `and` / `not` anywhere at depth 0.
fn has_low_precedence_op(lx: &[Lexeme]) -> bool {
    find_top_level(lx, |l| {
        is_low_precedence(l, &[OperatorId::Or, OperatorId::Xor, OperatorId::And, OperatorId::Not])
    })
    .is_some()
}

fn variable_node(lexeme: &Lexeme) -> Node {
    let (sigil, name) = split_sigil(lexeme.text());
    Node::Variable { sigil, name }
}
