//! Core formatting logic for MPP source code
//!
//! Walks the AST and emits source that parses back to the same tree:
//! - nested operators are parenthesized by precedence (never more than needed to keep the grouping),
//! - lists always carry their parentheses (`(1,)` for a single element),
//! - blocks are laid out one statement per line; a block holding a single simple statement inside an
//!   expression (`map { $_ * 2 } @xs`) stays on one line.

use mpp_core::lang::operators::{self, Associativity};
use mpp_syntax::ast::*;
use mpp_syntax::parser::{is_named_unary, takes_block_argument};

use super::config::{FormatConfig, QuoteStyle};
use super::writer::FormatWriter;

/// Atoms, postfix chains, and anything already delimited.
const ATOM: u8 = 0;
/// Operand bound of `++` / `--` and of the base of a subscript or method call.
const POSTFIX: u8 = 2;
/// Operand bound of a symbolic unary operator (admits `**`).
const UNARY_OPERAND: u8 = 3;
/// Prefix `-`, `!`, `~`, `\`.
const SYMBOLIC_UNARY: u8 = 4;
const TERNARY: u8 = 16;
const ASSIGNMENT: u8 = 17;
/// Low-precedence `not`.
const NOT: u8 = 19;
/// List operators (`push @a, 1`, `print ...`, `return ...`) run up to the next low-precedence word operator.
const LIST_OPERATOR: u8 = 19;
/// Bound that admits every expression.
const ANY: u8 = operators::LOOSEST;

/// Formatter that transforms AST back to formatted source code
pub struct Formatter {
    writer: FormatWriter,
}

impl Formatter {
    /// Create a new formatter with the given config
    pub fn new(config: FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(config),
        }
    }

    /// Formatter for a fragment spliced into a line at `indent_level`.
    fn continuing(config: FormatConfig, indent_level: usize) -> Self {
        Self {
            writer: FormatWriter::continuing(config, indent_level),
        }
    }

    /// Format a program (its top-level statements) and return the formatted source
    pub fn format(mut self, program: &[Node]) -> String {
        self.format_statements(program);
        self.writer.finish()
    }

    fn config(&self) -> &FormatConfig {
        self.writer.config()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn format_statements(&mut self, statements: &[Node]) {
        let blank = self.config().blank_lines_around_subs;
        for (i, node) in statements.iter().enumerate() {
            if i > 0 && (is_spaced(&statements[i - 1]) || is_spaced(node)) {
                self.writer.blank_lines(blank);
            }
            self.format_statement(node);
        }
    }

    fn format_statement(&mut self, node: &Node) {
        match node {
            Node::If {
                condition,
                then_block,
                elsif_clauses,
                else_block,
                postfix: false,
            } => {
                let head = format!("if ({}) ", self.expr(condition, ANY));
                self.writer.write(&head);
                self.format_block(then_block);
                for clause in elsif_clauses {
                    let head = format!(" elsif ({}) ", self.expr(&clause.condition, ANY));
                    self.writer.write(&head);
                    self.format_block(&clause.block);
                }
                if let Some(block) = else_block {
                    self.writer.write(" else ");
                    self.format_block(block);
                }
            }
            Node::Unless {
                condition,
                then_block,
                else_block,
                postfix: false,
            } => {
                let head = format!("unless ({}) ", self.expr(condition, ANY));
                self.writer.write(&head);
                self.format_block(then_block);
                if let Some(block) = else_block {
                    self.writer.write(" else ");
                    self.format_block(block);
                }
            }
            Node::While {
                label,
                condition,
                body,
                continue_block,
                postfix: false,
            }
            | Node::Until {
                label,
                condition,
                body,
                continue_block,
                postfix: false,
            } => {
                let keyword = if matches!(node, Node::Until { .. }) { "until" } else { "while" };
                let head = format!("{}{keyword} ({}) ", label_prefix(label), self.expr(condition, ANY));
                self.writer.write(&head);
                self.format_block(body);
                self.format_continue(continue_block.as_ref());
            }
            Node::Foreach {
                label,
                declarator,
                variable,
                list,
                body,
                continue_block,
                postfix: false,
            } => {
                let mut head = format!("{}foreach ", label_prefix(label));
                if let Some(declarator) = declarator {
                    head.push_str(declarator);
                    head.push(' ');
                }
                if let Some(variable) = variable {
                    head.push_str(&self.expr(variable, ATOM));
                    head.push(' ');
                }
                head.push_str(&self.paren_list(list));
                head.push(' ');
                self.writer.write(&head);
                self.format_block(body);
                self.format_continue(continue_block.as_ref());
            }
            Node::For {
                label,
                init,
                condition,
                step,
                body,
            } => {
                let clause = |part: &Option<Box<Node>>| part.as_ref().map(|n| self.simple_statement(n)).unwrap_or_default();
                let head = format!(
                    "{}for ({}; {}; {}) ",
                    label_prefix(label),
                    clause(init),
                    clause(condition),
                    clause(step)
                );
                self.writer.write(&head);
                self.format_block(body);
            }
            Node::Block { label, statements } => {
                self.writer.write(&label_prefix(label));
                self.format_block(statements);
            }
            Node::Given {
                topic,
                block,
                whens,
                default,
            } => {
                let head = format!("given ({}) ", self.expr(topic, ANY));
                self.writer.write(&head);
                self.format_block(block);
                for when in whens {
                    self.writer.write(" ");
                    self.format_when(when);
                }
                if let Some(block) = default {
                    self.writer.write(" default ");
                    self.format_block(block);
                }
            }
            Node::When { .. } => self.format_when(node),
            Node::Default { block } => {
                self.writer.write("default ");
                self.format_block(block);
            }
            Node::Try {
                block,
                catches,
                finally,
            } => {
                self.writer.write("try ");
                self.format_block(block);
                for clause in catches {
                    let head = match &clause.variable {
                        Some(variable) => format!(" catch ({}) ", self.expr(variable, ATOM)),
                        None => " catch ".to_string(),
                    };
                    self.writer.write(&head);
                    self.format_block(&clause.block);
                }
                if let Some(block) = finally {
                    self.writer.write(" finally ");
                    self.format_block(block);
                }
            }
            Node::Defer { block } => {
                self.writer.write("defer ");
                self.format_block(block);
            }
            Node::Sub {
                name: Some(name),
                declarator,
                is_async,
                params,
                body,
            } => {
                let mut head = String::new();
                if let Some(declarator) = declarator {
                    head.push_str(declarator);
                    head.push(' ');
                }
                if *is_async {
                    head.push_str("async ");
                }
                head.push_str("sub ");
                head.push_str(name);
                head.push_str(&self.signature(params.as_deref()));
                head.push(' ');
                self.writer.write(&head);
                self.format_block(body);
            }
            Node::Method { name, params, body } => {
                let mut head = String::from("method");
                if let Some(name) = name {
                    head.push(' ');
                    head.push_str(name);
                }
                head.push_str(&self.signature(params.as_deref()));
                head.push(' ');
                self.writer.write(&head);
                self.format_block(body);
            }
            Node::Class {
                name,
                version,
                parent,
                body: Some(body),
            } => {
                let head = format!("{} ", class_head(name, version.as_deref(), parent.as_deref()));
                self.writer.write(&head);
                self.format_block(body);
            }
            Node::Package {
                name,
                version,
                block: Some(block),
            } => {
                let head = format!("{} ", package_head(name, version.as_deref()));
                self.writer.write(&head);
                self.format_block(block);
            }
            _ => {
                let text = self.simple_statement(node);
                self.writer.write(&text);
                self.writer.write(";");
            }
        }
        self.writer.newline();
    }

    fn format_when(&mut self, node: &Node) {
        if let Node::When { condition, block } = node {
            let head = format!("when ({}) ", self.expr(condition, ANY));
            self.writer.write(&head);
            self.format_block(block);
        }
    }

    /// `{ ... }` with one statement per line; the closing brace is left open for `else`, `catch`, ...
    fn format_block(&mut self, statements: &[Node]) {
        if statements.is_empty() {
            self.writer.write("{}");
            return;
        }
        self.writer.writeln("{");
        self.writer.indent();
        self.format_statements(statements);
        self.writer.dedent();
        self.writer.write("}");
    }

    fn format_continue(&mut self, block: Option<&Block>) {
        if let Some(block) = block {
            self.writer.write(" continue ");
            self.format_block(block);
        }
    }

        /// A statement that fits on one line, without its terminating `;`.
    fn simple_statement(&self, node: &Node) -> String {
        match node {
            Node::If {
                condition,
                then_block,
                postfix: true,
                ..
            } => self.postfix_form(then_block, "if", condition),
            Node::Unless {
                condition,
                then_block,
                postfix: true,
                ..
            } => self.postfix_form(then_block, "unless", condition),
            Node::While {
                condition,
                body,
                postfix: true,
                ..
            } => self.postfix_form(body, "while", condition),
            Node::Until {
                condition,
                body,
                postfix: true,
                ..
            } => self.postfix_form(body, "until", condition),
            Node::Foreach {
                list,
                body,
                postfix: true,
                ..
            } => self.postfix_form(body, "foreach", list),
            Node::Field {
                variable,
                attributes,
                default,
            } => {
                let mut text = format!("field {}", self.expr(variable, ATOM));
                for attribute in attributes {
                    text.push_str(" :");
                    text.push_str(&attribute.name);
                    if let Some(value) = &attribute.value {
                        text.push('(');
                        text.push_str(value);
                        text.push(')');
                    }
                }
                if let Some(default) = default {
                    text.push_str(" = ");
                    text.push_str(&self.expr(default, ANY));
                }
                text
            }
            Node::Use {
                module,
                version,
                imports,
            } => {
                let mut text = String::from("use");
                for part in [module, version].into_iter().flatten() {
                    text.push(' ');
                    text.push_str(part);
                }
                if let Some(imports) = imports {
                    text.push(' ');
                    text.push_str(&self.expr(imports, ANY));
                }
                text
            }
            Node::Package {
                name,
                version,
                block: None,
            } => package_head(name, version.as_deref()),
            Node::Class {
                name,
                version,
                parent,
                body: None,
            } => class_head(name, version.as_deref(), parent.as_deref()),
            // A brace at statement start opens a bare block.
            Node::HashLiteral { .. } => format!("+{}", self.expr(node, ANY)),
            _ => self.expr(node, ANY),
        }
    }

    fn postfix_form(&self, body: &[Node], keyword: &str, condition: &Node) -> String {
        let inner = match body {
            [inner] => self.simple_statement(inner),
            _ => self.block_text(body),
        };
        format!("{inner} {keyword} {}", self.expr(condition, ANY))
    }

    /// Format a block-shaped statement into a string for use inside an expression.
    fn nested_statement(&self, node: &Node) -> String {
        let mut nested = Formatter::continuing(self.config().clone(), self.writer.current_indent());
        nested.format_statement(node);
        nested.writer.finish().trim_end().to_string()
    }

    /// `{ ... }` inside an expression (anonymous sub bodies, `do`, `map`, print filehandles).
    fn block_text(&self, statements: &[Node]) -> String {
        match statements {
            [] => "{}".to_string(),
            [single] if !is_block_statement(single) => format!("{{ {} }}", self.simple_statement(single)),
            _ => {
                let mut nested = Formatter::continuing(self.config().clone(), self.writer.current_indent());
                nested.format_block(statements);
                nested.writer.finish()
            }
        }
    }

    fn signature(&self, params: Option<&[Node]>) -> String {
        match params {
            Some(params) => format!("({})", self.elements(params)),
            None => String::new(),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Render `node`, parenthesized when it binds looser than `max`.
    fn expr(&self, node: &Node, max: u8) -> String {
        let (text, level) = self.expr_level(node);
        if level > max { format!("({text})") } else { text }
    }

    /// Rendered text plus the binding level of its outermost operator.
    fn expr_level(&self, node: &Node) -> (String, u8) {
        match node {
            Node::Number { value } => (value.clone(), ATOM),
            Node::String { value, interpolated } => (self.string_literal(value, *interpolated), ATOM),
            Node::Boolean { value } => (value.to_string(), ATOM),
            Node::RegexLiteral { pattern, flags } => {
                let text = if pattern.contains('/') {
                    format!("m{{{pattern}}}{flags}")
                } else {
                    format!("m/{pattern}/{flags}")
                };
                (text, ATOM)
            }
            Node::Variable { sigil, name } => (format!("{sigil}{name}"), ATOM),
            Node::Identifier { name } => (name.clone(), ATOM),

            Node::ArrayLiteral { elements } => (format!("[{}]", self.elements(elements)), ATOM),
            Node::HashLiteral { entries } => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|entry| match entry {
                        HashEntry::Pair { key, value } => {
                            format!("{} => {}", self.hash_key(key), self.expr(value, ASSIGNMENT))
                        }
                        HashEntry::Spread(node) => self.expr(node, ASSIGNMENT),
                    })
                    .collect();
                (format!("{{{}}}", entries.join(", ")), ATOM)
            }
            Node::List { .. } => (self.paren_list(node), ATOM),

            Node::ArrayAccess { array, index, arrow } => {
                let arrow = if *arrow { "->" } else { "" };
                let text = format!("{}{arrow}[{}]", self.expr(array, POSTFIX), self.expr(index, ANY));
                (text, ATOM)
            }
            Node::ArraySlice { array, indices } => {
                (format!("{}[{}]", self.expr(array, ATOM), self.elements(indices)), ATOM)
            }
            Node::HashAccess { hash, key, arrow } => {
                let arrow = if *arrow { "->" } else { "" };
                let text = format!("{}{arrow}{{{}}}", self.expr(hash, POSTFIX), self.hash_key(key));
                (text, ATOM)
            }
            Node::HashSlice { hash, keys } => (format!("{}{{{}}}", self.expr(hash, ATOM), self.elements(keys)), ATOM),
            Node::PostfixDeref { expr, sigil } => (format!("{}->{sigil}*", self.expr(expr, POSTFIX)), ATOM),
            Node::PostfixDerefSlice {
                expr,
                sigil,
                kind,
                indices,
            } => {
                let (open, close) = match kind {
                    SliceKind::Array => ('[', ']'),
                    SliceKind::Hash => ('{', '}'),
                };
                let text = format!("{}->{sigil}{open}{}{close}", self.expr(expr, POSTFIX), self.elements(indices));
                (text, ATOM)
            }

            Node::BinaryOp { op, left, right } => {
                let (level, left_max, right_max) = match operators::from_str(op) {
                    Some(id) => {
                        let p = operators::precedence(id);
                        match operators::associativity(id) {
                            Associativity::Left => (p, p, p - 1),
                            Associativity::Right => (p, p - 1, p),
                            Associativity::None => (p, p - 1, p - 1),
                        }
                    }
                    None => (ANY, ATOM, ATOM),
                };
                let text = format!("{} {op} {}", self.expr(left, left_max), self.expr(right, right_max));
                (text, level)
            }
            Node::UnaryOp { op, operand } if op == "not" => (format!("not {}", self.expr(operand, ASSIGNMENT)), NOT),
            Node::UnaryOp { op, operand } => {
                let operand = self.expr(operand, UNARY_OPERAND);
                let separator = if operand.starts_with(['-', '+', '!', '~', '\\']) { " " } else { "" };
                (format!("{op}{separator}{operand}"), SYMBOLIC_UNARY)
            }
            Node::PrefixOp { op, operand } => (format!("{op}{}", self.expr(operand, POSTFIX)), POSTFIX),
            Node::PostfixOp { op, operand } => (format!("{}{op}", self.expr(operand, POSTFIX)), POSTFIX),
            Node::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let text = format!(
                    "{} ? {} : {}",
                    self.expr(condition, TERNARY - 1),
                    self.expr(then_expr, ASSIGNMENT),
                    self.expr(else_expr, TERNARY)
                );
                (text, TERNARY)
            }
            Node::Assignment { target, op, value } => {
                let text = format!("{} {op} {}", self.expr(target, TERNARY), self.expr(value, ASSIGNMENT));
                (text, ASSIGNMENT)
            }

            Node::DoBlock { statements } => (format!("do {}", self.block_text(statements)), ATOM),
            Node::Eval { statements } => (format!("eval {}", self.block_text(statements)), ATOM),
            Node::Sub {
                name: None,
                is_async,
                params,
                body,
                ..
            } => {
                let prefix = if *is_async { "async sub" } else { "sub" };
                let signature = self.signature(params.as_deref());
                let separator = if signature.is_empty() { "" } else { " " };
                let text = format!("{prefix}{separator}{signature} {}", self.block_text(body));
                (text, ATOM)
            }
            Node::Parameter { sigil, name, default } => {
                let text = match default {
                    Some(default) => format!("{sigil}{name} = {}", self.expr(default, ASSIGNMENT)),
                    None => format!("{sigil}{name}"),
                };
                (text, ATOM)
            }
            Node::Declaration {
                declarator,
                variables,
                initializer,
                parenthesized,
            } => {
                let variables = if *parenthesized {
                    format!("({})", self.elements(variables))
                } else {
                    self.elements(variables)
                };
                match initializer {
                    Some(initializer) => (format!("{declarator} {variables} = {}", self.expr(initializer, ANY)), ANY),
                    None => (format!("{declarator} {variables}"), ATOM),
                }
            }
            Node::Require { target } => {
                let target = match target.as_ref() {
                    Node::Identifier { name } => name.clone(),
                    Node::Number { value } => value.clone(),
                    other => self.expr(other, operators::NAMED_UNARY),
                };
                (format!("require {target}"), operators::NAMED_UNARY)
            }

            Node::Return { value } => (self.keyword_with("return", value.as_deref()), LIST_OPERATOR),
            Node::Throw { value } => (self.keyword_with("throw", value.as_deref()), LIST_OPERATOR),
            Node::Die { args } => (self.keyword_with_list("die", args), LIST_OPERATOR),
            Node::Warn { args } => (self.keyword_with_list("warn", args), LIST_OPERATOR),
            Node::Last { label } => (keyword_with_label("last", label), LIST_OPERATOR),
            Node::Next { label } => (keyword_with_label("next", label), LIST_OPERATOR),
            Node::Redo { label } => (keyword_with_label("redo", label), LIST_OPERATOR),
            Node::Break => ("break".to_string(), LIST_OPERATOR),
            Node::Continue => ("continue".to_string(), LIST_OPERATOR),

            Node::Call {
                function,
                args,
                parenthesized,
                arrow,
            } => self.call(function, args, *parenthesized, *arrow),
            Node::MethodCall {
                invocant,
                method,
                args,
                parenthesized,
            } => {
                let mut text = format!("{}->{method}", self.expr(invocant, POSTFIX));
                if *parenthesized || !args.is_empty() {
                    text.push_str(&format!("({})", self.elements(args)));
                }
                (text, ATOM)
            }
            Node::Print { filehandle, args } => (self.print_like("print", filehandle.as_deref(), args), LIST_OPERATOR),
            Node::Say { filehandle, args } => (self.print_like("say", filehandle.as_deref(), args), LIST_OPERATOR),

            Node::Error(error) => (error.text.clone(), ATOM),

            Node::If { .. }
            | Node::Unless { .. }
            | Node::While { .. }
            | Node::Until { .. }
            | Node::Foreach { .. }
            | Node::For { .. }
            | Node::Block { .. }
            | Node::Given { .. }
            | Node::When { .. }
            | Node::Default { .. }
            | Node::Try { .. }
            | Node::Defer { .. }
            | Node::Sub { .. }
            | Node::Method { .. }
            | Node::Class { .. }
            | Node::Package { .. }
            | Node::Use { .. }
            | Node::Field { .. } => (self.nested_statement(node), ATOM),
        }
    }

    fn call(&self, function: &Node, args: &[Node], parenthesized: bool, arrow: bool) -> (String, u8) {
        if arrow {
            return (format!("{}->({})", self.expr(function, POSTFIX), self.elements(args)), ATOM);
        }
        let Node::Identifier { name } = function else {
            // `&name(...)`
            return (format!("{}({})", self.expr(function, ATOM), self.elements(args)), ATOM);
        };
        if parenthesized {
            return (format!("{name}({})", self.elements(args)), ATOM);
        }
        match args {
            [] => (name.clone(), ATOM),
            [arg] if is_named_unary(name) || name == "do" || name == "eval" => {
                let arg = self.expr(arg, operators::NAMED_UNARY);
                (format!("{name} {arg}"), operators::NAMED_UNARY)
            }
            [Node::Block { statements, .. }, rest @ ..] if takes_block_argument(name) => {
                let mut text = format!("{name} {}", self.block_text(statements));
                if !rest.is_empty() {
                    text.push(' ');
                    text.push_str(&self.elements(rest));
                }
                (text, LIST_OPERATOR)
            }
            _ => (format!("{name} {}", self.elements(args)), LIST_OPERATOR),
        }
    }

    fn print_like(&self, keyword: &str, filehandle: Option<&Node>, args: &[Node]) -> String {
        let mut text = keyword.to_string();
        match filehandle {
            Some(Node::Block { statements, .. }) => {
                text.push(' ');
                text.push_str(&self.block_text(statements));
            }
            Some(handle) => {
                text.push(' ');
                text.push_str(&self.expr(handle, ATOM));
            }
            None => {}
        }
        if !args.is_empty() {
            text.push(' ');
            text.push_str(&self.elements(args));
        }
        text
    }

    fn keyword_with(&self, keyword: &str, value: Option<&Node>) -> String {
        match value {
            Some(value) => format!("{keyword} {}", self.expr(value, LIST_OPERATOR)),
            None => keyword.to_string(),
        }
    }

    fn keyword_with_list(&self, keyword: &str, args: &[Node]) -> String {
        if args.is_empty() {
            keyword.to_string()
        } else {
            format!("{keyword} {}", self.elements(args))
        }
    }

    /// Comma-separated elements of a list, call, or subscript.
    ///
    /// A list operator in last position swallows the rest of the list anyway, so it stays bare
    /// (`push @a, join ',', @b`).
    fn elements(&self, nodes: &[Node]) -> String {
        let last = nodes.len().saturating_sub(1);
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                if i == last && swallows_rest(node) {
                    self.expr(node, LIST_OPERATOR)
                } else {
                    self.expr(node, ASSIGNMENT)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// A parenthesized list: `()`, `(x,)`, `(a, b)`, or `(expr)` for a non-list node.
    fn paren_list(&self, node: &Node) -> String {
        match node {
            Node::List { elements } if elements.len() == 1 => format!("({},)", self.expr(&elements[0], ASSIGNMENT)),
            Node::List { elements } => format!("({})", self.elements(elements)),
            other => format!("({})", self.expr(other, ANY)),
        }
    }

    fn hash_key(&self, key: &Node) -> String {
        match key {
            Node::String {
                value,
                interpolated: false,
            } if is_bareword(value) => value.clone(),
            other => self.expr(other, ANY),
        }
    }

    fn string_literal(&self, value: &str, interpolated: bool) -> String {
        let plain = !value.contains(['\\', '"', '\'', '$', '@']);
        let quote = match self.config().quote_style {
            QuoteStyle::Double if plain => '"',
            QuoteStyle::Single if plain => '\'',
            _ if interpolated => '"',
            _ => '\'',
        };
        format!("{quote}{value}{quote}")
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Statements that own a `{ ... }` body and end without `;`.
fn is_block_statement(node: &Node) -> bool {
    match node {
        Node::If { postfix, .. }
        | Node::Unless { postfix, .. }
        | Node::While { postfix, .. }
        | Node::Until { postfix, .. }
        | Node::Foreach { postfix, .. } => !postfix,
        Node::For { .. }
        | Node::Block { .. }
        | Node::Given { .. }
        | Node::When { .. }
        | Node::Default { .. }
        | Node::Try { .. }
        | Node::Defer { .. }
        | Node::Method { .. } => true,
        Node::Sub { name, .. } => name.is_some(),
        Node::Class { body, .. } => body.is_some(),
        Node::Package { block, .. } => block.is_some(),
        _ => false,
    }
}

/// Nodes that, printed bare at the head of a list element, take every following element as theirs.
fn swallows_rest(node: &Node) -> bool {
    match node {
        Node::Call {
            function,
            args,
            parenthesized: false,
            arrow: false,
        } => match function.as_ref() {
            Node::Identifier { name } => !args.is_empty() && !is_named_unary(name) && name != "do" && name != "eval",
            _ => false,
        },
        Node::Print { .. } | Node::Say { .. } | Node::Die { .. } | Node::Warn { .. } | Node::Return { .. } => true,
        _ => false,
    }
}

/// Declarations set apart from their neighbours by blank lines.
fn is_spaced(node: &Node) -> bool {
    matches!(
        node,
        Node::Sub { name: Some(_), .. } | Node::Method { .. } | Node::Class { body: Some(_), .. } | Node::Package { block: Some(_), .. }
    )
}

fn is_bareword(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn label_prefix(label: &Option<String>) -> String {
    label.as_ref().map(|label| format!("{label}: ")).unwrap_or_default()
}

fn keyword_with_label(keyword: &str, label: &Option<String>) -> String {
    match label {
        Some(label) => format!("{keyword} {label}"),
        None => keyword.to_string(),
    }
}

fn class_head(name: &str, version: Option<&str>, parent: Option<&str>) -> String {
    let mut text = format!("class {name}");
    if let Some(version) = version {
        text.push(' ');
        text.push_str(version);
    }
    if let Some(parent) = parent {
        text.push_str(&format!(" :isa({parent})"));
    }
    text
}

fn package_head(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("package {name} {version}"),
        None => format!("package {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpp_syntax::parser::parse_source;

    fn fmt(source: &str) -> String {
        Formatter::new(FormatConfig::default()).format(&parse_source(source))
    }

    // ========================================
    // Layout
    // ========================================

    #[test]
    fn test_simple_statements_one_per_line() {
        assert_eq!(fmt("my $x=1;print $x;"), "my $x = 1;\nprint $x;\n");
    }

    #[test]
    fn test_if_elsif_else_layout() {
        let source = "if ($x > 5) { return 1; } elsif ($x > 0) { return 2; } else { return 3; }";
        let expected = "if ($x > 5) {\n    return 1;\n} elsif ($x > 0) {\n    return 2;\n} else {\n    return 3;\n}\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(fmt("while (1) { }"), "while (1) {}\n");
    }

    #[test]
    fn test_loop_continue_block_layout() {
        let source = "LINE: foreach my $l (@lines) { next LINE; } continue { $n++; }";
        let expected = "LINE: foreach my $l (@lines) {\n    next LINE;\n} continue {\n    $n++;\n}\n";
        assert_eq!(fmt(source), expected);
        assert_eq!(fmt("until ($done) { } continue { }"), "until ($done) {} continue {}\n");
    }

    #[test]
    fn test_blank_lines_around_subs() {
        let source = "use strict; sub a { 1; } sub b { 2; } print 1;";
        let expected = "use strict;\n\nsub a {\n    1;\n}\n\nsub b {\n    2;\n}\n\nprint 1;\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_custom_indent_width() {
        let config = FormatConfig::new().with_indent_width(2);
        let out = Formatter::new(config).format(&parse_source("if ($x) { foo(); }"));
        assert_eq!(out, "if ($x) {\n  foo();\n}\n");
    }

    #[test]
    fn test_nested_block_in_expression_is_indented() {
        let source = "my $f = sub { my $y = 1; return $y; };";
        let expected = "my $f = sub {\n    my $y = 1;\n    return $y;\n};\n";
        assert_eq!(fmt(source), expected);
    }

    // ========================================
    // Expressions
    // ========================================

    #[test]
    fn test_parenthesizes_only_where_needed() {
        assert_eq!(fmt("(1 + 2) * 3;"), "(1 + 2) * 3;\n");
        assert_eq!(fmt("1 + 2 * 3;"), "1 + 2 * 3;\n");
        assert_eq!(fmt("2 ** 3 ** 2;"), "2 ** 3 ** 2;\n");
        assert_eq!(fmt("(2 ** 3) ** 2;"), "(2 ** 3) ** 2;\n");
        assert_eq!(fmt("10 - (4 - 3);"), "10 - (4 - 3);\n");
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(fmt("-2 ** 2;"), "-2 ** 2;\n");
        assert_eq!(fmt("(-2) ** 2;"), "(-2) ** 2;\n");
    }

    #[test]
    fn test_lists_keep_parentheses() {
        assert_eq!(fmt("my @a = (1, 2);"), "my @a = (1, 2);\n");
        assert_eq!(fmt("return (1,);"), "return (1,);\n");
        assert_eq!(fmt("foo => 1;"), "('foo', 1);\n");
    }

    #[test]
    fn test_hash_literal_statement_gets_unary_plus() {
        assert_eq!(fmt("+{ a => 1 };"), "+{a => 1};\n");
    }

    #[test]
    fn test_block_call_and_named_unary() {
        assert_eq!(fmt("my @d = map { $_ * 2 } @list;"), "my @d = map { $_ * 2 } @list;\n");
        assert_eq!(fmt("ref $x eq 'HASH';"), "ref $x eq 'HASH';\n");
        assert_eq!(fmt("push @a, join ',', @b;"), "push @a, join ',', @b;\n");
        assert_eq!(fmt("push @a, (join ',', @b), 1;"), "push @a, (join ',', @b), 1;\n");
    }

    #[test]
    fn test_postfix_modifier() {
        assert_eq!(fmt("print 'x' if $y;"), "print 'x' if $y;\n");
        assert_eq!(fmt("say for @list;"), "say foreach @list;\n");
    }

    #[test]
    fn test_hash_keys_stay_bare() {
        assert_eq!(fmt("$h{key} = $r->{'two words'};"), "$h{key} = $r->{'two words'};\n");
    }

    #[test]
    fn test_quote_style_double_rewrites_plain_strings_only() {
        let config = FormatConfig::new().with_quote_style(QuoteStyle::Double);
        let out = Formatter::new(config).format(&parse_source("print 'a', 'it\\'s', \"$x\";"));
        assert_eq!(out, "print \"a\", 'it\\'s', \"$x\";\n");
    }
}
