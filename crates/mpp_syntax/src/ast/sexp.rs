//! S-expression rendering of the AST (`Display` for [`Node`]).
//!
//! Shape: `(Type positional... :option value... :flag...)`. Required fields are positional, optional
//! fields appear only when present, and boolean fields appear as bare flags only when set. Errors
//! render as `(Error "message" :at line:column)` so they are easy to grep for.
//!
//! ## Examples
//! ```rust
//! use mpp_syntax::parser;
//!
//! let program = parser::parse_source("1 + 2 * 3");
//! assert_eq!(program[0].to_string(), "(BinaryOp + (Number 1) (BinaryOp * (Number 2) (Number 3)))");
//! ```

use std::fmt::{self, Display, Formatter};

use super::{Block, HashEntry, Node, SliceKind};

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number { value } => write!(f, "(Number {value})"),
            Node::String { value, interpolated } => {
                write!(f, "(String {value:?}")?;
                flag(f, "interpolated", *interpolated)?;
                f.write_str(")")
            }
            Node::Boolean { value } => write!(f, "(Boolean {value})"),
            Node::RegexLiteral { pattern, flags } => {
                write!(f, "(RegexLiteral {pattern:?}")?;
                if !flags.is_empty() {
                    write!(f, " :flags {flags}")?;
                }
                f.write_str(")")
            }
            Node::Variable { sigil, name } => write!(f, "(Variable {sigil}{name})"),
            Node::Identifier { name } => write!(f, "(Identifier {name})"),

            Node::ArrayLiteral { elements } => open(f, "ArrayLiteral", elements),
            Node::HashLiteral { entries } => {
                f.write_str("(HashLiteral")?;
                for entry in entries {
                    match entry {
                        HashEntry::Pair { key, value } => write!(f, " (Pair {key} {value})")?,
                        HashEntry::Spread(node) => write!(f, " (Spread {node})")?,
                    }
                }
                f.write_str(")")
            }
            Node::List { elements } => open(f, "List", elements),

            Node::ArrayAccess { array, index, arrow } => {
                write!(f, "(ArrayAccess {array} {index}")?;
                flag(f, "arrow", *arrow)?;
                f.write_str(")")
            }
            Node::ArraySlice { array, indices } => {
                write!(f, "(ArraySlice {array}")?;
                items(f, indices)?;
                f.write_str(")")
            }
            Node::HashAccess { hash, key, arrow } => {
                write!(f, "(HashAccess {hash} {key}")?;
                flag(f, "arrow", *arrow)?;
                f.write_str(")")
            }
            Node::HashSlice { hash, keys } => {
                write!(f, "(HashSlice {hash}")?;
                items(f, keys)?;
                f.write_str(")")
            }
            Node::PostfixDeref { expr, sigil } => write!(f, "(PostfixDeref {expr} {sigil})"),
            Node::PostfixDerefSlice {
                expr,
                sigil,
                kind,
                indices,
            } => {
                let kind = match kind {
                    SliceKind::Array => "array",
                    SliceKind::Hash => "hash",
                };
                write!(f, "(PostfixDerefSlice {expr} {sigil} {kind}")?;
                items(f, indices)?;
                f.write_str(")")
            }

            Node::BinaryOp { op, left, right } => write!(f, "(BinaryOp {op} {left} {right})"),
            Node::UnaryOp { op, operand } => write!(f, "(UnaryOp {op} {operand})"),
            Node::PrefixOp { op, operand } => write!(f, "(PrefixOp {op} {operand})"),
            Node::PostfixOp { op, operand } => write!(f, "(PostfixOp {op} {operand})"),
            Node::Ternary {
                condition,
                then_expr,
                else_expr,
            } => write!(f, "(Ternary {condition} {then_expr} {else_expr})"),
            Node::Assignment { target, op, value } => write!(f, "(Assignment {target} {op} {value})"),

            Node::If {
                condition,
                then_block,
                elsif_clauses,
                else_block,
                postfix,
            } => {
                write!(f, "(If {condition} ")?;
                block(f, then_block)?;
                for clause in elsif_clauses {
                    write!(f, " (elsif {} ", clause.condition)?;
                    block(f, &clause.block)?;
                    f.write_str(")")?;
                }
                opt_block(f, "else", else_block.as_ref())?;
                flag(f, "postfix", *postfix)?;
                f.write_str(")")
            }
            Node::Unless {
                condition,
                then_block,
                else_block,
                postfix,
            } => {
                write!(f, "(Unless {condition} ")?;
                block(f, then_block)?;
                opt_block(f, "else", else_block.as_ref())?;
                flag(f, "postfix", *postfix)?;
                f.write_str(")")
            }
            Node::While {
                label,
                condition,
                body,
                continue_block,
                postfix,
            } => looped(f, "While", label, condition, body, continue_block.as_ref(), *postfix),
            Node::Until {
                label,
                condition,
                body,
                continue_block,
                postfix,
            } => looped(f, "Until", label, condition, body, continue_block.as_ref(), *postfix),
            Node::Foreach {
                label,
                declarator,
                variable,
                list,
                body,
                continue_block,
                postfix,
            } => {
                write!(f, "(Foreach {list} ")?;
                block(f, body)?;
                opt_block(f, "continue", continue_block.as_ref())?;
                opt(f, "label", label.as_ref())?;
                opt(f, "declarator", declarator.as_ref())?;
                opt(f, "variable", variable.as_ref())?;
                flag(f, "postfix", *postfix)?;
                f.write_str(")")
            }
            Node::For {
                label,
                init,
                condition,
                step,
                body,
            } => {
                f.write_str("(For ")?;
                block(f, body)?;
                opt(f, "init", init.as_ref())?;
                opt(f, "condition", condition.as_ref())?;
                opt(f, "step", step.as_ref())?;
                opt(f, "label", label.as_ref())?;
                f.write_str(")")
            }
            Node::Block { label, statements } => {
                f.write_str("(Block")?;
                items(f, statements)?;
                opt(f, "label", label.as_ref())?;
                f.write_str(")")
            }
            Node::DoBlock { statements } => open(f, "DoBlock", statements),
            Node::Eval { statements } => open(f, "Eval", statements),
            Node::Given {
                topic,
                block: body,
                whens,
                default,
            } => {
                write!(f, "(Given {topic} ")?;
                block(f, body)?;
                items(f, whens)?;
                opt_block(f, "default", default.as_ref())?;
                f.write_str(")")
            }
            Node::When { condition, block: body } => {
                write!(f, "(When {condition} ")?;
                block(f, body)?;
                f.write_str(")")
            }
            Node::Default { block: body } => {
                f.write_str("(Default ")?;
                block(f, body)?;
                f.write_str(")")
            }
            Node::Try {
                block: body,
                catches,
                finally,
            } => {
                f.write_str("(Try ")?;
                block(f, body)?;
                for catch in catches {
                    f.write_str(" (catch ")?;
                    block(f, &catch.block)?;
                    opt(f, "variable", catch.variable.as_ref())?;
                    f.write_str(")")?;
                }
                opt_block(f, "finally", finally.as_ref())?;
                f.write_str(")")
            }
            Node::Defer { block: body } => {
                f.write_str("(Defer ")?;
                block(f, body)?;
                f.write_str(")")
            }

            Node::Declaration {
                declarator,
                variables,
                initializer,
                parenthesized,
            } => {
                write!(f, "(Declaration {declarator}")?;
                items(f, variables)?;
                opt(f, "initializer", initializer.as_ref())?;
                flag(f, "parenthesized", *parenthesized)?;
                f.write_str(")")
            }
            Node::Sub {
                name,
                declarator,
                is_async,
                params,
                body,
            } => {
                f.write_str("(Sub ")?;
                block(f, body)?;
                opt(f, "name", name.as_ref())?;
                opt(f, "declarator", declarator.as_ref())?;
                opt_params(f, params.as_ref())?;
                flag(f, "async", *is_async)?;
                f.write_str(")")
            }
            Node::Parameter { sigil, name, default } => {
                write!(f, "(Parameter {sigil}{name}")?;
                opt(f, "default", default.as_ref())?;
                f.write_str(")")
            }
            Node::Class {
                name,
                version,
                parent,
                body,
            } => {
                write!(f, "(Class {name}")?;
                opt(f, "version", version.as_ref())?;
                opt(f, "parent", parent.as_ref())?;
                opt_block(f, "body", body.as_ref())?;
                f.write_str(")")
            }
            Node::Field {
                variable,
                attributes,
                default,
            } => {
                write!(f, "(Field {variable}")?;
                for attribute in attributes {
                    match &attribute.value {
                        Some(value) => write!(f, " :attr ({} {value})", attribute.name)?,
                        None => write!(f, " :attr ({})", attribute.name)?,
                    }
                }
                opt(f, "default", default.as_ref())?;
                f.write_str(")")
            }
            Node::Method { name, params, body } => {
                f.write_str("(Method ")?;
                block(f, body)?;
                opt(f, "name", name.as_ref())?;
                opt_params(f, params.as_ref())?;
                f.write_str(")")
            }
            Node::Package { name, version, block } => {
                write!(f, "(Package {name}")?;
                opt(f, "version", version.as_ref())?;
                opt_block(f, "block", block.as_ref())?;
                f.write_str(")")
            }
            Node::Use {
                module,
                version,
                imports,
            } => {
                f.write_str("(Use")?;
                opt(f, "module", module.as_ref())?;
                opt(f, "version", version.as_ref())?;
                opt(f, "imports", imports.as_ref())?;
                f.write_str(")")
            }
            Node::Require { target } => write!(f, "(Require {target})"),

            Node::Return { value } => unary_opt(f, "Return", value.as_deref()),
            Node::Throw { value } => unary_opt(f, "Throw", value.as_deref()),
            Node::Last { label } => unary_opt(f, "Last", label.as_ref()),
            Node::Next { label } => unary_opt(f, "Next", label.as_ref()),
            Node::Redo { label } => unary_opt(f, "Redo", label.as_ref()),
            Node::Break => f.write_str("(Break)"),
            Node::Continue => f.write_str("(Continue)"),
            Node::Die { args } => open(f, "Die", args),
            Node::Warn { args } => open(f, "Warn", args),

            Node::Call {
                function,
                args,
                parenthesized,
                arrow,
            } => {
                write!(f, "(Call {function}")?;
                items(f, args)?;
                flag(f, "parenthesized", *parenthesized)?;
                flag(f, "arrow", *arrow)?;
                f.write_str(")")
            }
            Node::MethodCall {
                invocant,
                method,
                args,
                parenthesized,
            } => {
                write!(f, "(MethodCall {invocant} {method}")?;
                items(f, args)?;
                flag(f, "parenthesized", *parenthesized)?;
                f.write_str(")")
            }
            Node::Print { filehandle, args } => printed(f, "Print", filehandle.as_deref(), args),
            Node::Say { filehandle, args } => printed(f, "Say", filehandle.as_deref(), args),

            Node::Error(error) => write!(f, "(Error {:?} :at {}:{})", error.message, error.line, error.column),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn items(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        write!(f, " {node}")?;
    }
    Ok(())
}

fn open(f: &mut Formatter<'_>, tag: &str, nodes: &[Node]) -> fmt::Result {
    write!(f, "({tag}")?;
    items(f, nodes)?;
    f.write_str(")")
}

fn block(f: &mut Formatter<'_>, statements: &Block) -> fmt::Result {
    open(f, "block", statements)
}

fn flag(f: &mut Formatter<'_>, name: &str, set: bool) -> fmt::Result {
    if set {
        write!(f, " :{name}")?;
    }
    Ok(())
}

fn opt<T: Display>(f: &mut Formatter<'_>, name: &str, value: Option<T>) -> fmt::Result {
    match value {
        Some(value) => write!(f, " :{name} {value}"),
        None => Ok(()),
    }
}

fn opt_block(f: &mut Formatter<'_>, name: &str, statements: Option<&Block>) -> fmt::Result {
    match statements {
        Some(statements) => {
            write!(f, " :{name} ")?;
            block(f, statements)
        }
        None => Ok(()),
    }
}

fn opt_params(f: &mut Formatter<'_>, params: Option<&Vec<Node>>) -> fmt::Result {
    match params {
        Some(params) => {
            f.write_str(" :params (")?;
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(")")
        }
        None => Ok(()),
    }
}

fn unary_opt<T: Display>(f: &mut Formatter<'_>, tag: &str, value: Option<T>) -> fmt::Result {
    match value {
        Some(value) => write!(f, "({tag} {value})"),
        None => write!(f, "({tag})"),
    }
}

fn looped(
    f: &mut Formatter<'_>,
    tag: &str,
    label: &Option<String>,
    condition: &Node,
    body: &Block,
    continue_block: Option<&Block>,
    postfix: bool,
) -> fmt::Result {
    write!(f, "({tag} {condition} ")?;
    block(f, body)?;
    opt_block(f, "continue", continue_block)?;
    opt(f, "label", label.as_ref())?;
    flag(f, "postfix", postfix)?;
    f.write_str(")")
}

fn printed(f: &mut Formatter<'_>, tag: &str, filehandle: Option<&Node>, args: &[Node]) -> fmt::Result {
    write!(f, "({tag}")?;
    items(f, args)?;
    opt(f, "filehandle", filehandle)?;
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ErrorNode;

    #[test]
    fn test_optional_fields_only_when_present() {
        let bare = Node::Return { value: None };
        assert_eq!(bare.to_string(), "(Return)");
        let with_value = Node::Return {
            value: Some(Box::new(Node::number("1"))),
        };
        assert_eq!(with_value.to_string(), "(Return (Number 1))");
    }

    #[test]
    fn test_error_renders_distinctly() {
        let error = Node::Error(ErrorNode {
            message: "Unterminated string literal".to_string(),
            text: "\"abc".to_string(),
            line: 3,
            column: 7,
        });
        assert_eq!(error.to_string(), "(Error \"Unterminated string literal\" :at 3:7)");
    }

    #[test]
    fn test_flags_render_only_when_set() {
        let plain = Node::string("a", false);
        let interpolated = Node::string("a", true);
        assert_eq!(plain.to_string(), "(String \"a\")");
        assert_eq!(interpolated.to_string(), "(String \"a\" :interpolated)");
    }
}
