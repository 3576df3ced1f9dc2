/// Expression grammar: low-precedence word operators, comma lists, and precedence climbing.
///
/// ## Notes
/// - Layering, loosest first: `or`/`xor` → `and` → `not` → list operators and comma lists → the
///   precedence climber over the operator table (assignment and tighter).
/// - Word operators and commas are split off by depth-0 scans before climbing, so the climber never sees
///   a bound looser than assignment.

/// Climbing bound that admits assignment and everything tighter.
const ASSIGNMENT_BOUND: u8 = 17;
/// Bound for the false branch of `?:` (nested ternaries, but not assignment).
const TERNARY_BOUND: u8 = 16;
/// Bound for the operand of a symbolic unary operator (admits `**` only).
const UNARY_OPERAND_BOUND: u8 = 3;

impl Grammar<'_> {
    // ========================================================================
    // Entry and low-precedence layers
    // ========================================================================

    /// Parse a full expression. `at` anchors the error when `lx` is empty.
    fn expression(&self, lx: &[Lexeme], at: &Lexeme, context: &str) -> Node {
        if lx.is_empty() {
            return self.errors.empty_expression(context, at);
        }
        match self.enter(&lx[0]) {
            Ok(_guard) => self.low_or(lx),
            Err(error) => error,
        }
    }

    /// `or` / `xor` (left-associative).
    fn low_or(&self, lx: &[Lexeme]) -> Node {
        self.low_chain(lx, &[OperatorId::Or, OperatorId::Xor], |operand| self.low_and(operand))
    }

    fn low_and(&self, lx: &[Lexeme]) -> Node {
        self.low_chain(lx, &[OperatorId::And], |operand| self.low_not(operand))
    }

    /// Fold the operands between the depth-0 occurrences of `ops` from the left.
    fn low_chain(&self, lx: &[Lexeme], ops: &[OperatorId], operand: impl Fn(&[Lexeme]) -> Node) -> Node {
        let mut splits = Vec::new();
        let mut start = 0;
        while let Some(i) = find_top_level(&lx[start..], |l| is_low_precedence(l, ops)) {
            splits.push(start + i);
            start += i + 1;
        }
        let Some(&first) = splits.first() else {
            return operand(lx);
        };

        let mut left = if first == 0 {
            self.errors.empty_expression(&format!("before '{}'", lx[0].text()), &lx[0])
        } else {
            operand(&lx[..first])
        };
        for (n, &at) in splits.iter().enumerate() {
            let op = &lx[at];
            let end = splits.get(n + 1).copied().unwrap_or(lx.len());
            let right = if at + 1 == end {
                self.errors.missing_operand(op)
            } else {
                operand(&lx[at + 1..end])
            };
            left = Node::binary(op.text(), left, right);
        }
        left
    }

    fn low_not(&self, lx: &[Lexeme]) -> Node {
        match lx {
            [op, rest @ ..] if is_low_precedence(op, &[OperatorId::Not]) => {
                let operand = if rest.is_empty() {
                    self.errors.missing_operand(op)
                } else {
                    match self.enter(op) {
                        Ok(_guard) => self.low_not(rest),
                        Err(error) => error,
                    }
                };
                Node::UnaryOp {
                    op: op.text().to_string(),
                    operand: Box::new(operand),
                }
            }
            _ => self.comma_list(lx),
        }
    }

    // ========================================================================
    // Lists
    // ========================================================================

    fn comma_list(&self, lx: &[Lexeme]) -> Node {
        let first = &lx[0];
        if let Some(node) = self.list_operator(lx) {
            return node;
        }
        if has_top_level_comma(lx) || find_top_level(lx, |l| l.is_op(OperatorId::FatComma)).is_some() {
            return Node::List {
                elements: self.list_elements(lx, first),
            };
        }
        self.climb(lx, ASSIGNMENT_BOUND)
    }

    /// A list operator at the head of `lx` swallows everything after it (`push @a, 1, 2`).
    fn list_operator(&self, lx: &[Lexeme]) -> Option<Node> {
        let (head, rest) = lx.split_first()?;
        let next = rest.first();
        match head.keyword_id() {
            Some(KeywordId::Print | KeywordId::Say) if !next.is_some_and(|l| l.is(LexemeCategory::LParen)) => {
                return Some(self.print_like(head, rest));
            }
            Some(
                KeywordId::Return
                | KeywordId::Die
                | KeywordId::Warn
                | KeywordId::Throw
                | KeywordId::Next
                | KeywordId::Last
                | KeywordId::Redo
                | KeywordId::Break
                | KeywordId::Continue,
            ) => return Some(self.jump(head, rest)),
            _ => {}
        }
        let callable = head.is(LexemeCategory::Identifier)
            || matches!(
                head.keyword_id(),
                Some(KeywordId::Spawn | KeywordId::Send | KeywordId::Recv | KeywordId::Kill | KeywordId::Import)
            );
        if !callable || is_named_unary(head.text()) {
            return None;
        }
        let next = next?;
        if next.is(LexemeCategory::LBrace) && takes_block_argument(head.text()) {
            return Some(self.block_call(head, rest));
        }
        if !starts_term(next) {
            return None;
        }
        Some(Node::Call {
            function: Box::new(Node::identifier(head.text())),
            args: self.list_elements(rest, head),
            parenthesized: false,
            arrow: false,
        })
    }

    /// Whether an element starting with `segment` swallows the rest of the enclosing list.
    fn swallows_list(&self, segment: &[Lexeme]) -> bool {
        match segment {
            [head, next, ..] if head.is(LexemeCategory::Identifier) => {
                !is_named_unary(head.text())
                    && (starts_term(next) || next.is(LexemeCategory::LBrace) && takes_block_argument(head.text()))
            }
            [head, rest @ ..] => match head.keyword_id() {
                Some(KeywordId::Print | KeywordId::Say) => {
                    !rest.first().is_some_and(|l| l.is(LexemeCategory::LParen))
                }
                Some(KeywordId::Return | KeywordId::Die | KeywordId::Warn) => true,
                _ => false,
            },
            [] => false,
        }
    }

    /// Split on depth-0 commas, autoquoting barewords before `=>`.
    fn list_elements(&self, lx: &[Lexeme], at: &Lexeme) -> Vec<Node> {
        let mut elements = Vec::new();
        let mut start = 0;
        while start < lx.len() {
            let end = skip_to_comma(lx, start);
            let segment = &lx[start..end];
            if self.swallows_list(segment) {
                elements.push(self.expression(&lx[start..], at, "in list"));
                break;
            }
            if !segment.is_empty() {
                self.pair_elements(segment, &mut elements);
            }
            start = end + 1;
        }
        elements
    }

    /// `a => b => c` flattens into its parts; every part before a `=>` is autoquoted.
    fn pair_elements(&self, segment: &[Lexeme], out: &mut Vec<Node>) {
        let parts = split_top_level(segment, |l| l.is_op(OperatorId::FatComma));
        let last = parts.len() - 1;
        let anchor = &segment[0];
        for (i, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                if i < last {
                    out.push(self.errors.empty_expression("before '=>'", anchor));
                } else {
                    out.push(self.errors.missing_operand(anchor));
                }
            } else if i < last {
                out.push(self.autoquote(part, anchor));
            } else {
                out.push(self.expression(part, anchor, "in list"));
            }
        }
    }

    /// A lone bareword becomes a plain string; anything else parses normally.
    fn autoquote(&self, part: &[Lexeme], at: &Lexeme) -> Node {
        match part {
            [word] if word.is_word() => Node::string(word.text(), false),
            _ => self.expression(part, at, "in list"),
        }
    }

    /// Hash literal body: `key => value` pairs and spread expressions.
    fn hash_entries(&self, inner: &[Lexeme], open: &Lexeme) -> Vec<HashEntry> {
        split_top_level_commas(inner)
            .into_iter()
            .map(|segment| match find_top_level(segment, |l| l.is_op(OperatorId::FatComma)) {
                Some(arrow_at) => {
                    let arrow = &segment[arrow_at];
                    let key = if arrow_at == 0 {
                        self.errors.empty_expression("before '=>'", arrow)
                    } else {
                        self.autoquote(&segment[..arrow_at], open)
                    };
                    let value = &segment[arrow_at + 1..];
                    let value = if value.is_empty() {
                        self.errors.missing_operand(arrow)
                    } else {
                        self.expression(value, arrow, "in hash value")
                    };
                    HashEntry::Pair { key, value }
                }
                None => HashEntry::Spread(self.expression(segment, open, "in hash literal")),
            })
            .collect()
    }

    /// Hash subscript: a lone bareword key is autoquoted.
    fn hash_key(&self, group: &Group<'_>) -> Node {
        match group.inner {
            [] => self.errors.empty_expression("in hash subscript", group.open),
            [word] if word.is_word() => Node::string(word.text(), false),
            [minus, word] if minus.is_op(OperatorId::Minus) && word.is_word() => {
                Node::string(format!("-{}", word.text()), false)
            }
            inner => self.expression(inner, group.open, "in hash subscript"),
        }
    }

    // ========================================================================
    // Precedence climbing
    // ========================================================================

    /// Climb over the whole slice; leftovers are reported rather than dropped.
    fn climb(&self, lx: &[Lexeme], max: u8) -> Node {
        let mut cur = Cursor::new(lx);
        let node = self.parse_binary(&mut cur, max);
        match cur.peek() {
            Some(extra) => self.errors.parse_failure("expression", cur.rest(), extra),
            None => node,
        }
    }

    /// Run `parse` one nesting level deeper. Past the limit the rest of the slice is consumed and the
    /// nesting error takes the operand's place.
    fn nested<'l>(&self, cur: &mut Cursor<'l>, at: &Lexeme, parse: impl FnOnce(&mut Cursor<'l>) -> Node) -> Node {
        match self.enter(at) {
            Ok(_guard) => parse(cur),
            Err(error) => {
                cur.take_rest();
                error
            }
        }
    }

    /// The operand after `op`, climbing up to `max`.
    fn operand(&self, cur: &mut Cursor<'_>, op: &Lexeme, max: u8) -> Node {
        if !cur.peek().is_some_and(can_start_operand) {
            return self.errors.missing_operand(op);
        }
        self.nested(cur, op, |cur| self.parse_binary(cur, max))
    }

    /// Binary operators whose precedence is `<= max` (smaller binds tighter).
    fn parse_binary(&self, cur: &mut Cursor<'_>, max: u8) -> Node {
        let mut left = self.parse_unary(cur);
        while let Some(lexeme) = cur.peek() {
            let Some(op) = lexeme.operator_id() else {
                break;
            };
            if matches!(operators::class(op), OperatorClass::Special | OperatorClass::Unary)
                || matches!(op, OperatorId::Colon | OperatorId::FatComma)
            {
                break;
            }
            let precedence = operators::precedence(op);
            if precedence > max {
                break;
            }
            if op == OperatorId::Question {
                left = self.ternary(cur, left);
                continue;
            }
            cur.skip(1);

            let next_max = if operators::is_right_associative(op) {
                precedence
            } else {
                precedence - 1
            };
            let right = self.operand(cur, lexeme, next_max);
            left = if operators::is_assignment(op) {
                Node::assignment(left, lexeme.text(), right)
            } else {
                Node::binary(lexeme.text(), left, right)
            };
        }
        left
    }

    /// `COND ? THEN : ELSE` with the cursor on `?`.
    fn ternary(&self, cur: &mut Cursor<'_>, condition: Node) -> Node {
        let Some(question) = cur.advance() else {
            return condition;
        };
        let rest = cur.rest();
        let colon_at = find_ternary_colon(rest);
        let then_part = &rest[..colon_at.unwrap_or(rest.len())];
        let then_expr = if then_part.is_empty() {
            self.errors.empty_expression("in ternary branch", question)
        } else {
            match self.enter(question) {
                Ok(_guard) => self.climb(then_part, ASSIGNMENT_BOUND),
                Err(error) => error,
            }
        };

        let else_expr = match colon_at {
            Some(colon_at) => {
                let colon = &rest[colon_at];
                cur.skip(colon_at + 1);
                self.operand(cur, colon, TERNARY_BOUND)
            }
            None => {
                cur.take_rest();
                self.errors.missing_token("':' in ternary", &[], question)
            }
        };

        Node::Ternary {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    /// Prefix operators, then a primary with its postfix chain.
    fn parse_unary(&self, cur: &mut Cursor<'_>) -> Node {
        let Some(lexeme) = cur.peek() else {
            return self.errors.empty_statement(None);
        };
        let prefix = lexeme.operator_id().filter(|_| !lexeme.is(LexemeCategory::Keyword));
        match prefix {
            Some(OperatorId::Plus) if cur.peek_at(1).is_some_and(|l| l.is(LexemeCategory::LBrace)) => {
                cur.skip(1);
                let node = self.primary(cur);
                self.postfix(cur, node)
            }
            Some(OperatorId::Minus | OperatorId::Plus | OperatorId::Bang | OperatorId::Tilde | OperatorId::Backslash) => {
                cur.skip(1);
                let operand = self.operand(cur, lexeme, UNARY_OPERAND_BOUND);
                Node::UnaryOp {
                    op: lexeme.text().to_string(),
                    operand: Box::new(operand),
                }
            }
            Some(OperatorId::Increment | OperatorId::Decrement) => {
                cur.skip(1);
                let operand = if cur.peek().is_some_and(can_start_operand) {
                    self.nested(cur, lexeme, |cur| self.parse_unary(cur))
                } else {
                    self.errors.missing_operand(lexeme)
                };
                Node::PrefixOp {
                    op: lexeme.text().to_string(),
                    operand: Box::new(operand),
                }
            }
            _ if lexeme.is_op(OperatorId::Not) => {
                cur.skip(1);
                let operand = self.operand(cur, lexeme, ASSIGNMENT_BOUND);
                Node::UnaryOp {
                    op: lexeme.text().to_string(),
                    operand: Box::new(operand),
                }
            }
            _ => {
                let node = self.primary(cur);
                self.postfix(cur, node)
            }
        }
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    fn primary(&self, cur: &mut Cursor<'_>) -> Node {
        let Some(lexeme) = cur.peek() else {
            return self.errors.empty_statement(None);
        };
        match lexeme.category {
            LexemeCategory::LParen => self.paren_expression(cur),
            LexemeCategory::LBracket => match cur.group(LexemeCategory::LBracket) {
                Some(group) if group.closed => Node::ArrayLiteral {
                    elements: self.list_elements(group.inner, group.open),
                },
                _ => self.errors.missing_closing_delimiter(lexeme),
            },
            LexemeCategory::LBrace => match cur.group(LexemeCategory::LBrace) {
                Some(group) if group.closed => Node::HashLiteral {
                    entries: self.hash_entries(group.inner, group.open),
                },
                _ => self.errors.missing_closing_delimiter(lexeme),
            },
            LexemeCategory::Declaration if is_scope_declarator(lexeme) || lexeme.is_keyword(KeywordId::Const) => {
                match self.declarator(cur) {
                    Ok((declarator, variables, parenthesized)) => Node::Declaration {
                        declarator,
                        variables,
                        initializer: None,
                        parenthesized,
                    },
                    Err(error) => error,
                }
            }
            _ => {
                cur.skip(1);
                self.atom(cur, lexeme)
            }
        }
    }

    /// `( ... )`: grouping, or a list (`()` is the empty list).
    fn paren_expression(&self, cur: &mut Cursor<'_>) -> Node {
        let Some(group) = cur.group(LexemeCategory::LParen) else {
            return self.errors.empty_statement(None);
        };
        if !group.closed {
            return self.errors.missing_closing_delimiter(group.open);
        }
        if group.inner.is_empty() {
            return Node::List { elements: Vec::new() };
        }
        self.expression(group.inner, group.open, "in parentheses")
    }

    /// Single-lexeme primaries and keyword-led forms (the lexeme is already consumed).
    fn atom(&self, cur: &mut Cursor<'_>, lexeme: &Lexeme) -> Node {
        match lexeme.category {
            LexemeCategory::TokenError => self.errors.token_error(lexeme),
            LexemeCategory::Literal => literal(lexeme),
            LexemeCategory::Boolean => Node::Boolean {
                value: lexeme.is_keyword(KeywordId::True),
            },
            LexemeCategory::ScalarVar | LexemeCategory::HashVar | LexemeCategory::Variable => variable_node(lexeme),
            LexemeCategory::ArrayVar => self.array_variable(cur, lexeme),
            LexemeCategory::CodeVar => {
                let function = variable_node(lexeme);
                match cur.group(LexemeCategory::LParen) {
                    Some(group) if !group.closed => self.errors.missing_closing_delimiter(group.open),
                    Some(group) => Node::Call {
                        function: Box::new(function),
                        args: self.list_elements(group.inner, group.open),
                        parenthesized: true,
                        arrow: false,
                    },
                    None => function,
                }
            }
            LexemeCategory::Identifier => self.bareword(cur, lexeme),
            LexemeCategory::Declaration | LexemeCategory::Control | LexemeCategory::Keyword => {
                self.keyword_primary(cur, lexeme)
            }
            LexemeCategory::AssignOp
            | LexemeCategory::BinOp
            | LexemeCategory::UnOp
            | LexemeCategory::Operator
            | LexemeCategory::PostfixDerefSigil
            | LexemeCategory::LParen
            | LexemeCategory::RParen
            | LexemeCategory::LBrace
            | LexemeCategory::RBrace
            | LexemeCategory::LBracket
            | LexemeCategory::RBracket
            | LexemeCategory::Comma
            | LexemeCategory::Terminator => self.errors.unexpected_token(lexeme, "in expression"),
        }
    }

    /// `@list`, `@list[0, 1]`, `@hash{'a', 'b'}`.
    fn array_variable(&self, cur: &mut Cursor<'_>, lexeme: &Lexeme) -> Node {
        let variable = Box::new(variable_node(lexeme));
        if let Some(group) = cur.group(LexemeCategory::LBracket) {
            if !group.closed {
                return self.errors.missing_closing_delimiter(group.open);
            }
            return Node::ArraySlice {
                array: variable,
                indices: self.list_elements(group.inner, group.open),
            };
        }
        if let Some(group) = cur.group(LexemeCategory::LBrace) {
            if !group.closed {
                return self.errors.missing_closing_delimiter(group.open);
            }
            return Node::HashSlice {
                hash: variable,
                keys: self.slice_keys(&group),
            };
        }
        *variable
    }

    fn slice_keys(&self, group: &Group<'_>) -> Vec<Node> {
        match group.inner {
            [word] if word.is_word() => vec![Node::string(word.text(), false)],
            inner => self.list_elements(inner, group.open),
        }
    }

    /// Barewords: autoquoted keys, calls, block-taking builtins, named unary operators.
    fn bareword(&self, cur: &mut Cursor<'_>, lexeme: &Lexeme) -> Node {
        let name = lexeme.text();
        let Some(next) = cur.peek() else {
            return Node::identifier(name);
        };
        if next.is_op(OperatorId::FatComma) {
            return Node::string(name, false);
        }
        if let Some(group) = cur.group(LexemeCategory::LParen) {
            if !group.closed {
                return self.errors.missing_closing_delimiter(group.open);
            }
            return Node::Call {
                function: Box::new(Node::identifier(name)),
                args: self.list_elements(group.inner, group.open),
                parenthesized: true,
                arrow: false,
            };
        }
        if next.is(LexemeCategory::LBrace) && takes_block_argument(name) {
            return self.block_call(lexeme, cur.take_rest());
        }
        if !starts_term(next) || next.is(LexemeCategory::LBrace) {
            return Node::identifier(name);
        }
        let args = if is_named_unary(name) {
            vec![self.nested(cur, lexeme, |cur| self.parse_binary(cur, operators::NAMED_UNARY))]
        } else {
            self.list_elements(cur.take_rest(), lexeme)
        };
        Node::Call {
            function: Box::new(Node::identifier(name)),
            args,
            parenthesized: false,
            arrow: false,
        }
    }

    /// `map { ... } LIST`: the block becomes the first argument.
    fn block_call(&self, head: &Lexeme, rest: &[Lexeme]) -> Node {
        let Some(close) = find_matching(rest, 0) else {
            return self.errors.missing_closing_delimiter(&rest[0]);
        };
        let mut args = vec![Node::Block {
            label: None,
            statements: self.block_body(&rest[1..close]),
        }];
        let mut tail = &rest[close + 1..];
        if tail.first().is_some_and(|l| l.is(LexemeCategory::Comma)) {
            tail = &tail[1..];
        }
        args.extend(self.list_elements(tail, head));
        Node::Call {
            function: Box::new(Node::identifier(head.text())),
            args,
            parenthesized: false,
            arrow: false,
        }
    }

    fn keyword_primary(&self, cur: &mut Cursor<'_>, keyword: &Lexeme) -> Node {
        let Some(id) = keyword.keyword_id() else {
            return self.errors.unexpected_token(keyword, "in expression");
        };
        match id {
            KeywordId::Sub => self.anonymous_sub(cur, keyword, false),
            KeywordId::Async if cur.peek().is_some_and(|l| l.is_keyword(KeywordId::Sub)) => {
                cur.skip(1);
                self.anonymous_sub(cur, keyword, true)
            }
            KeywordId::Do | KeywordId::Eval => self.do_or_eval(cur, keyword, id),
            KeywordId::Return
            | KeywordId::Die
            | KeywordId::Warn
            | KeywordId::Throw
            | KeywordId::Next
            | KeywordId::Last
            | KeywordId::Redo
            | KeywordId::Break
            | KeywordId::Continue => self.jump(keyword, cur.take_rest()),
            KeywordId::Print | KeywordId::Say => {
                if cur.check(LexemeCategory::LParen) {
                    self.bareword(cur, keyword)
                } else {
                    self.print_like(keyword, cur.take_rest())
                }
            }
            KeywordId::Require => match self.require_target(cur, keyword) {
                Ok(target) => Node::Require {
                    target: Box::new(target),
                },
                Err(error) => error,
            },
            KeywordId::SelfKw => Node::identifier(keyword.text()),
            KeywordId::Defined
            | KeywordId::Undef
            | KeywordId::Exists
            | KeywordId::Delete
            | KeywordId::Spawn
            | KeywordId::Send
            | KeywordId::Recv
            | KeywordId::Kill
            | KeywordId::Alive
            | KeywordId::Import
            | KeywordId::Has => self.bareword(cur, keyword),
            _ => self.errors.unexpected_token(keyword, "in expression"),
        }
    }

    /// `do { ... }`, `eval { ... }`, `do FILE`, `eval EXPR`.
    fn do_or_eval(&self, cur: &mut Cursor<'_>, keyword: &Lexeme, id: KeywordId) -> Node {
        match cur.group(LexemeCategory::LBrace) {
            Some(group) if !group.closed => self.errors.unterminated("block", group.open),
            Some(group) => {
                let statements = self.block_body(group.inner);
                if id == KeywordId::Do {
                    Node::DoBlock { statements }
                } else {
                    Node::Eval { statements }
                }
            }
            None if cur.peek().is_some_and(starts_term) => Node::Call {
                function: Box::new(Node::identifier(keyword.text())),
                args: vec![self.nested(cur, keyword, |cur| self.parse_binary(cur, operators::NAMED_UNARY))],
                parenthesized: false,
                arrow: false,
            },
            None if id == KeywordId::Eval => Node::Call {
                function: Box::new(Node::identifier(keyword.text())),
                args: Vec::new(),
                parenthesized: false,
                arrow: false,
            },
            None => self.errors.missing_token("block or file after 'do'", cur.rest(), keyword),
        }
    }

    /// Jumps and exceptions: `return LIST`, `die LIST`, `next LABEL`, `break`, ...
    fn jump(&self, keyword: &Lexeme, rest: &[Lexeme]) -> Node {
        let value = || {
            (!rest.is_empty()).then(|| Box::new(self.expression(rest, keyword, &format!("after '{}'", keyword.text()))))
        };
        let label = || match rest {
            [] => Ok(None),
            [label] if label.is(LexemeCategory::Identifier) => Ok(Some(label.text().to_string())),
            [other, ..] => Err(self.errors.unexpected_token(other, "after loop control")),
        };
        let bare = |node: Node| match rest.first() {
            Some(extra) => self.errors.unexpected_token(extra, &format!("after '{}'", keyword.text())),
            None => node,
        };
        match keyword.keyword_id() {
            Some(KeywordId::Return) => Node::Return { value: value() },
            Some(KeywordId::Throw) => Node::Throw { value: value() },
            Some(KeywordId::Die) => Node::Die {
                args: self.list_elements(rest, keyword),
            },
            Some(KeywordId::Warn) => Node::Warn {
                args: self.list_elements(rest, keyword),
            },
            Some(KeywordId::Next) => settle(label().map(|label| Node::Next { label })),
            Some(KeywordId::Last) => settle(label().map(|label| Node::Last { label })),
            Some(KeywordId::Redo) => settle(label().map(|label| Node::Redo { label })),
            Some(KeywordId::Break) => bare(Node::Break),
            Some(KeywordId::Continue) => bare(Node::Continue),
            _ => self.errors.unexpected_token(keyword, "in expression"),
        }
    }

    /// `print [FILEHANDLE] LIST` / `say [FILEHANDLE] LIST` without parentheses.
    fn print_like(&self, keyword: &Lexeme, rest: &[Lexeme]) -> Node {
        let (filehandle, args) = match rest {
            [open, ..] if open.is(LexemeCategory::LBrace) => match find_matching(rest, 0) {
                Some(close) => {
                    let block = Node::Block {
                        label: None,
                        statements: self.block_body(&rest[1..close]),
                    };
                    (Some(Box::new(block)), &rest[close + 1..])
                }
                None => return self.errors.missing_closing_delimiter(open),
            },
            [handle, next, ..]
                if handle.is(LexemeCategory::Identifier)
                    && is_filehandle_name(handle.text())
                    && starts_term(next)
                    && !next.is(LexemeCategory::LBrace) =>
            {
                (Some(Box::new(Node::identifier(handle.text()))), &rest[1..])
            }
            [handle, next, ..]
                if handle.is(LexemeCategory::ScalarVar)
                    && starts_term(next)
                    && !matches!(next.category, LexemeCategory::LBrace | LexemeCategory::LBracket | LexemeCategory::UnOp) =>
            {
                (Some(Box::new(variable_node(handle))), &rest[1..])
            }
            _ => (None, rest),
        };
        let args = self.list_elements(args, keyword);
        if keyword.is_keyword(KeywordId::Say) {
            Node::Say { filehandle, args }
        } else {
            Node::Print { filehandle, args }
        }
    }

    // ========================================================================
    // Postfix chains
    // ========================================================================

    /// Greedily consume `->...`, direct subscripts, and postfix `++` / `--`.
    fn postfix(&self, cur: &mut Cursor<'_>, mut node: Node) -> Node {
        while let Some(next) = cur.peek() {
            if next.is_op(OperatorId::Arrow) {
                cur.skip(1);
                node = self.arrow(cur, next, node);
                if node.is_error() {
                    break;
                }
            } else if allows_direct_subscript(&node) && next.is(LexemeCategory::LBracket) {
                node = match cur.group(LexemeCategory::LBracket) {
                    Some(group) if group.closed => Node::ArrayAccess {
                        array: Box::new(node),
                        index: Box::new(self.expression(group.inner, group.open, "in array subscript")),
                        arrow: false,
                    },
                    _ => return self.errors.missing_closing_delimiter(next),
                };
            } else if allows_direct_subscript(&node) && next.is(LexemeCategory::LBrace) {
                node = match cur.group(LexemeCategory::LBrace) {
                    Some(group) if group.closed => Node::HashAccess {
                        hash: Box::new(node),
                        key: Box::new(self.hash_key(&group)),
                        arrow: false,
                    },
                    _ => return self.errors.missing_closing_delimiter(next),
                };
            } else if next.is_op(OperatorId::Increment) || next.is_op(OperatorId::Decrement) {
                cur.skip(1);
                node = Node::PostfixOp {
                    op: next.text().to_string(),
                    operand: Box::new(node),
                };
            } else {
                break;
            }
        }
        node
    }

    /// Whatever follows `->`.
    fn arrow(&self, cur: &mut Cursor<'_>, arrow: &Lexeme, node: Node) -> Node {
        let Some(next) = cur.peek() else {
            return self.errors.missing_token("method name or subscript after '->'", &[], arrow);
        };
        match next.category {
            LexemeCategory::LParen => match cur.group(LexemeCategory::LParen) {
                Some(group) if group.closed => Node::Call {
                    function: Box::new(node),
                    args: self.list_elements(group.inner, group.open),
                    parenthesized: true,
                    arrow: true,
                },
                _ => self.errors.missing_closing_delimiter(next),
            },
            LexemeCategory::LBracket => match cur.group(LexemeCategory::LBracket) {
                Some(group) if group.closed => Node::ArrayAccess {
                    array: Box::new(node),
                    index: Box::new(self.expression(group.inner, group.open, "in array subscript")),
                    arrow: true,
                },
                _ => self.errors.missing_closing_delimiter(next),
            },
            LexemeCategory::LBrace => match cur.group(LexemeCategory::LBrace) {
                Some(group) if group.closed => Node::HashAccess {
                    hash: Box::new(node),
                    key: Box::new(self.hash_key(&group)),
                    arrow: true,
                },
                _ => self.errors.missing_closing_delimiter(next),
            },
            LexemeCategory::PostfixDerefSigil => {
                cur.skip(1);
                self.postfix_deref(cur, next, node)
            }
            LexemeCategory::ScalarVar => {
                cur.skip(1);
                self.method_call(cur, node, next.text())
            }
            _ if next.is_word() => {
                cur.skip(1);
                self.method_call(cur, node, next.text())
            }
            _ => self.errors.missing_token("method name or subscript after '->'", cur.rest(), arrow),
        }
    }

    fn method_call(&self, cur: &mut Cursor<'_>, invocant: Node, method: &str) -> Node {
        let (args, parenthesized) = match cur.group(LexemeCategory::LParen) {
            Some(group) if !group.closed => return self.errors.missing_closing_delimiter(group.open),
            Some(group) => (self.list_elements(group.inner, group.open), true),
            None => (Vec::new(), false),
        };
        Node::MethodCall {
            invocant: Box::new(invocant),
            method: method.to_string(),
            args,
            parenthesized,
        }
    }

    /// `->@*`, `->%*`, `->$*`, `->@[...]`, `->@{...}`.
    fn postfix_deref(&self, cur: &mut Cursor<'_>, sigil: &Lexeme, expr: Node) -> Node {
        let text = sigil.text();
        let sigil_char = text.chars().next().unwrap_or('@');
        if text.ends_with('*') {
            return Node::PostfixDeref {
                expr: Box::new(expr),
                sigil: sigil_char,
            };
        }
        let (group, kind) = if let Some(group) = cur.group(LexemeCategory::LBracket) {
            (group, SliceKind::Array)
        } else if let Some(group) = cur.group(LexemeCategory::LBrace) {
            (group, SliceKind::Hash)
        } else {
            return self.errors.missing_token("'[' or '{' after postfix slice sigil", cur.rest(), sigil);
        };
        if !group.closed {
            return self.errors.missing_closing_delimiter(group.open);
        }
        let indices = match kind {
            SliceKind::Array => self.list_elements(group.inner, group.open),
            SliceKind::Hash => self.slice_keys(&group),
        };
        Node::PostfixDerefSlice {
            expr: Box::new(expr),
            sigil: sigil_char,
            kind,
            indices,
        }
    }
}

/// `[..]` / `{..}` directly after these nodes is an element access rather than a new term.
fn allows_direct_subscript(node: &Node) -> bool {
    matches!(
        node,
        Node::Variable { sigil: '$', .. } | Node::ArrayAccess { .. } | Node::HashAccess { .. } | Node::List { .. }
    )
}

/// Whether `lexeme` can begin the operand of a binary or prefix operator.
fn can_start_operand(lexeme: &Lexeme) -> bool {
    match lexeme.category {
        LexemeCategory::RParen
        | LexemeCategory::RBrace
        | LexemeCategory::RBracket
        | LexemeCategory::Comma
        | LexemeCategory::Terminator
        | LexemeCategory::PostfixDerefSigil => false,
        LexemeCategory::BinOp | LexemeCategory::AssignOp | LexemeCategory::Operator | LexemeCategory::UnOp => {
            lexeme.operator_id().is_some_and(operators::is_prefix)
        }
        LexemeCategory::Keyword => lexeme.operator_id().is_none_or(|id| id == OperatorId::Not),
        _ => true,
    }
}

/// Literal token → node: numbers, strings, regexes, and `qw` word lists.
fn literal(lexeme: &Lexeme) -> Node {
    let token = &lexeme.token;
    match token.kind {
        TokenKind::Number => Node::number(lexeme.text()),
        TokenKind::QwList => Node::List {
            elements: token.qw_words().into_iter().map(|w| Node::string(w, false)).collect(),
        },
        _ => match token.regex_parts() {
            Some((pattern, flags)) => Node::RegexLiteral {
                pattern: pattern.to_string(),
                flags: flags.to_string(),
            },
            None => Node::string(token.string_body().unwrap_or_default(), token.is_interpolated()),
        },
    }
}
