/// Declarations: variables, subs, methods, fields, classes, packages and module loading.

impl Grammar<'_> {
    // ========================================================================
    // Variables
    // ========================================================================

    /// `my $x = EXPR`, `our ($a, @b) = LIST`, `const $PI = 3`.
    fn declaration_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let mut cur = Cursor::new(lx);
        let (declarator, variables, parenthesized) = self.declarator(&mut cur)?;
        let initializer = match cur.advance() {
            None => None,
            Some(op) if op.is_op(OperatorId::Assign) => {
                let rest = cur.take_rest();
                Some(Box::new(if rest.is_empty() {
                    self.errors.empty_expression("after '='", op)
                } else {
                    self.expression(rest, op, "in initializer")
                }))
            }
            Some(other) => return Err(self.errors.unexpected_token(other, "in declaration")),
        };
        Ok(Node::Declaration {
            declarator,
            variables,
            initializer,
            parenthesized,
        })
    }

    /// Declarator keyword plus one variable or a parenthesized variable list.
    fn declarator(&self, cur: &mut Cursor<'_>) -> Result<(String, Vec<Node>, bool), Node> {
        let Some(keyword) = cur.advance() else {
            return Err(self.errors.empty_statement(None));
        };
        let declarator = keyword.text().to_string();

        if let Some(var) = cur.peek().filter(|l| l.category.is_variable()) {
            cur.skip(1);
            return Ok((declarator, vec![variable_node(var)], false));
        }

        let Some(group) = cur.group(LexemeCategory::LParen) else {
            return Err(self.errors.incomplete_declaration(&declarator, "missing variable name", keyword));
        };
        if !group.closed {
            return Err(self.errors.missing_closing_delimiter(group.open));
        }
        let segments = split_top_level_commas(group.inner);
        if segments.is_empty() {
            return Err(self.errors.incomplete_declaration(&declarator, "empty variable list", group.open));
        }
        let variables = segments
            .into_iter()
            .map(|segment| match segment {
                [var] if var.category.is_variable() => variable_node(var),
                [placeholder] if placeholder.is_keyword(KeywordId::Undef) => Node::identifier("undef"),
                [other, ..] => self.errors.unexpected_token(other, "in declaration list"),
                [] => self.errors.empty_expression("in declaration list", group.open),
            })
            .collect();
        Ok((declarator, variables, true))
    }

    // ========================================================================
    // Subroutines and methods
    // ========================================================================

    /// `[my|our|state] [async] sub NAME [(PARAMS)] BLOCK`
    fn sub_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let mut cur = Cursor::new(lx);
        let mut declarator = None;
        if let Some(decl) = cur.peek().filter(|l| is_scope_declarator(l)) {
            declarator = Some(decl.text().to_string());
            cur.skip(1);
        }
        let is_async = cur.peek().is_some_and(|l| l.is_keyword(KeywordId::Async));
        if is_async {
            cur.skip(1);
        }
        let Some(keyword) = cur.advance().filter(|l| l.is_keyword(KeywordId::Sub)) else {
            return Err(self.errors.missing_token("'sub'", cur.rest(), &lx[0]));
        };
        let Some(name) = cur.peek().filter(|l| l.is(LexemeCategory::Identifier)) else {
            return Err(self.errors.incomplete_declaration("sub", "missing name", keyword));
        };
        cur.skip(1);

        let (params, body) = self.signature_and_body(&mut cur, keyword, "sub")?;
        self.expect_end(&cur, "sub declaration")?;
        Ok(Node::Sub {
            name: Some(name.text().to_string()),
            declarator,
            is_async,
            params,
            body,
        })
    }

    /// Anonymous `sub [(PARAMS)] BLOCK` in expression position (`sub` already consumed).
    fn anonymous_sub(&self, cur: &mut Cursor<'_>, keyword: &Lexeme, is_async: bool) -> Node {
        if let Some(name) = cur.peek().filter(|l| l.is(LexemeCategory::Identifier)) {
            return self.errors.unexpected_token(name, "named sub in expression");
        }
        match self.signature_and_body(cur, keyword, "sub") {
            Ok((params, body)) => Node::Sub {
                name: None,
                declarator: None,
                is_async,
                params,
                body,
            },
            Err(error) => error,
        }
    }

    /// `method NAME [(PARAMS)] BLOCK`
    fn method_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let Some(name) = cur.peek().filter(|l| l.is_word()) else {
            return Err(self.errors.incomplete_declaration("method", "missing method name", keyword));
        };
        cur.skip(1);
        let (params, body) = self.signature_and_body(&mut cur, keyword, "method")?;
        self.expect_end(&cur, "method declaration")?;
        Ok(Node::Method {
            name: Some(name.text().to_string()),
            params,
            body,
        })
    }

    /// Optional signature followed by a mandatory body.
    fn signature_and_body(
        &self,
        cur: &mut Cursor<'_>,
        keyword: &Lexeme,
        kind: &str,
    ) -> Result<(Option<Vec<Node>>, Block), Node> {
        let params = match cur.group(LexemeCategory::LParen) {
            Some(group) if !group.closed => return Err(self.errors.missing_closing_delimiter(group.open)),
            Some(group) => Some(self.parameters(group.inner, group.open)),
            None => None,
        };
        if !cur.check(LexemeCategory::LBrace) {
            return Err(self.errors.incomplete_declaration(kind, "missing body", cur.peek().unwrap_or(keyword)));
        }
        let body = self.block(cur, keyword)?;
        Ok((params, body))
    }

    /// Signature parameters: `$x`, `@rest`, `$y = 10`, `$z //= 0`.
    fn parameters(&self, inner: &[Lexeme], open: &Lexeme) -> Vec<Node> {
        split_top_level_commas(inner)
            .into_iter()
            .map(|segment| {
                let var = &segment[0];
                if !var.category.is_variable() {
                    return self.errors.unexpected_token(var, "in parameter list");
                }
                let (sigil, name) = split_sigil(var.text());
                let default = match segment.get(1) {
                    None => None,
                    Some(op) if op.is(LexemeCategory::AssignOp) => {
                        let value = &segment[2..];
                        Some(Box::new(if value.is_empty() {
                            self.errors.empty_expression("in parameter default", op)
                        } else {
                            self.expression(value, open, "in parameter default")
                        }))
                    }
                    Some(other) => return self.errors.unexpected_token(other, "in parameter list"),
                };
                Node::Parameter { sigil, name, default }
            })
            .collect()
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// `class NAME [VERSION] [:isa(PARENT)] [BLOCK]`
    fn class_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let Some(name) = cur.peek().filter(|l| l.is(LexemeCategory::Identifier)) else {
            return Err(self.errors.incomplete_declaration("class", "missing class name", keyword));
        };
        cur.skip(1);
        let version = version(&mut cur);

        let mut parent = None;
        while let Some(colon) = cur.peek().filter(|l| l.is_op(OperatorId::Colon)) {
            cur.skip(1);
            let attribute = self.attribute(&mut cur, colon)?;
            if attribute.name != "isa" {
                let message = format!("Unknown class attribute ':{}'", attribute.name);
                return Err(self.errors.invalid_statement(&message, colon));
            }
            let Some(value) = attribute.value else {
                return Err(self.errors.missing_token("parent class in ':isa(...)'", cur.rest(), colon));
            };
            parent = Some(value);
        }

        let body = if cur.check(LexemeCategory::LBrace) {
            Some(self.block(&mut cur, keyword)?)
        } else {
            None
        };
        self.expect_end(&cur, "class declaration")?;
        Ok(Node::Class {
            name: name.text().to_string(),
            version,
            parent,
            body,
        })
    }

    /// `field $x [:param] [:reader(get_x)] [= EXPR]` (also spelled `has`).
    fn field_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let Some(var) = cur.peek().filter(|l| l.category.is_variable()) else {
            return Err(self.errors.incomplete_declaration("field", "missing variable name", keyword));
        };
        cur.skip(1);

        let mut attributes = Vec::new();
        while let Some(colon) = cur.peek().filter(|l| l.is_op(OperatorId::Colon)) {
            cur.skip(1);
            attributes.push(self.attribute(&mut cur, colon)?);
        }

        let default = match cur.advance() {
            None => None,
            Some(op) if op.is(LexemeCategory::AssignOp) => {
                let rest = cur.take_rest();
                Some(Box::new(if rest.is_empty() {
                    self.errors.empty_expression(&format!("after '{}'", op.text()), op)
                } else {
                    self.expression(rest, op, "in field default")
                }))
            }
            Some(other) => return Err(self.errors.unexpected_token(other, "in field declaration")),
        };
        Ok(Node::Field {
            variable: Box::new(variable_node(var)),
            attributes,
            default,
        })
    }

    /// `NAME` or `NAME(VALUE)` after a `:`; the value keeps its raw lexeme text.
    fn attribute(&self, cur: &mut Cursor<'_>, colon: &Lexeme) -> Result<Attribute, Node> {
        let Some(name) = cur.peek().filter(|l| l.is_word()) else {
            return Err(self.errors.missing_token("attribute name after ':'", cur.rest(), colon));
        };
        cur.skip(1);
        let value = match cur.group(LexemeCategory::LParen) {
            Some(group) if !group.closed => return Err(self.errors.missing_closing_delimiter(group.open)),
            Some(group) => Some(group.inner.iter().map(Lexeme::text).collect::<Vec<_>>().join(" ")),
            None => None,
        };
        Ok(Attribute {
            name: name.text().to_string(),
            value,
        })
    }

    // ========================================================================
    // Packages and modules
    // ========================================================================

    /// `package NAME [VERSION] [BLOCK]`
    fn package_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let Some(name) = cur.peek().filter(|l| l.is(LexemeCategory::Identifier)) else {
            return Err(self.errors.incomplete_declaration("package", "missing package name", keyword));
        };
        cur.skip(1);
        let version = version(&mut cur);
        let block = if cur.check(LexemeCategory::LBrace) {
            Some(self.block(&mut cur, keyword)?)
        } else {
            None
        };
        self.expect_end(&cur, "package declaration")?;
        Ok(Node::Package {
            name: name.text().to_string(),
            version,
            block,
        })
    }

    /// `use MODULE [VERSION] [IMPORTS]` or the version pragma `use v5.40` / `use 5.040`.
    fn use_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let Some(next) = cur.peek() else {
            return Err(self.errors.invalid_statement("use statement with empty module name", keyword));
        };

        if is_version_start(next) {
            let version = version(&mut cur);
            self.expect_end(&cur, "version in 'use'")?;
            return Ok(Node::Use {
                module: None,
                version,
                imports: None,
            });
        }

        if !next.is_word() {
            return Err(self.errors.missing_token("module name after 'use'", cur.rest(), keyword));
        }
        cur.skip(1);
        let module = Some(next.text().to_string());
        let version = match cur.peek() {
            Some(l) if l.token.kind == TokenKind::Number => version(&mut cur),
            _ => None,
        };
        let rest = cur.take_rest();
        let imports = (!rest.is_empty()).then(|| Box::new(self.expression(rest, next, "in import list")));
        Ok(Node::Use {
            module,
            version,
            imports,
        })
    }

    /// `require Foo::Bar`, `require "file.pl"`, `require 5.006`.
    fn require_statement(&self, lx: &[Lexeme]) -> Result<Node, Node> {
        let keyword = &lx[0];
        let mut cur = Cursor::at(lx, 1);
        let target = self.require_target(&mut cur, keyword)?;
        self.expect_end(&cur, "'require'")?;
        Ok(Node::Require {
            target: Box::new(target),
        })
    }

    fn require_target(&self, cur: &mut Cursor<'_>, keyword: &Lexeme) -> Result<Node, Node> {
        match cur.peek() {
            None => Err(self.errors.missing_token("module name after 'require'", &[], keyword)),
            Some(next) if is_version_start(next) => Ok(Node::number(version(cur).unwrap_or_default())),
            Some(next) if next.is(LexemeCategory::Identifier) => {
                cur.skip(1);
                Ok(Node::identifier(next.text()))
            }
            Some(_) => Ok(self.parse_binary(cur, operators::NAMED_UNARY)),
        }
    }
}

/// `my`, `our` or `state` (scope declarators that can prefix `sub` or a loop variable).
fn is_scope_declarator(lexeme: &Lexeme) -> bool {
    matches!(lexeme.keyword_id(), Some(KeywordId::My | KeywordId::Our | KeywordId::State))
}

// ============================================================================
// Version literals
// ============================================================================

/// `5`, `v5`, or a `v`-string head such as `v5` in `v5.40`.
fn is_version_start(lexeme: &Lexeme) -> bool {
    match lexeme.token.kind {
        TokenKind::Number => true,
        TokenKind::Identifier => is_vstring_head(lexeme.text()),
        _ => false,
    }
}

fn is_vstring_head(text: &str) -> bool {
    text.strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Consume a dotted version (`5.040`, `v5.40.1`, `1.2`), joining its parts back into one spelling.
fn version(cur: &mut Cursor<'_>) -> Option<String> {
    let head = cur.peek().filter(|l| is_version_start(l))?;
    cur.skip(1);
    let mut spelling = head.text().to_string();
    while cur.peek().is_some_and(|l| l.is_op(OperatorId::Dot))
        && cur.peek_at(1).is_some_and(|l| l.token.kind == TokenKind::Number)
    {
        spelling.push('.');
        spelling.push_str(cur.peek_at(1).map(Lexeme::text).unwrap_or_default());
        cur.skip(2);
    }
    Some(spelling)
}
