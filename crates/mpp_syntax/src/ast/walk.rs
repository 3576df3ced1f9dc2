//! Tree traversal over [`Node`].
//!
//! Consumers that want fail-fast behaviour compose the parser with [`has_error_node`] /
//! [`find_error_nodes`]: the parser itself never decides whether a tree with errors is acceptable.

use super::{ErrorNode, HashEntry, Node};

impl Node {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match self {
            Node::Number { .. }
            | Node::String { .. }
            | Node::Boolean { .. }
            | Node::RegexLiteral { .. }
            | Node::Variable { .. }
            | Node::Identifier { .. }
            | Node::Last { .. }
            | Node::Next { .. }
            | Node::Redo { .. }
            | Node::Break
            | Node::Continue
            | Node::Error(_) => {}

            Node::ArrayLiteral { elements } | Node::List { elements } => out.extend(elements),
            Node::HashLiteral { entries } => {
                for entry in entries {
                    match entry {
                        HashEntry::Pair { key, value } => {
                            out.push(key);
                            out.push(value);
                        }
                        HashEntry::Spread(node) => out.push(node),
                    }
                }
            }

            Node::ArrayAccess { array, index, .. } => {
                out.push(array);
                out.push(index);
            }
            Node::ArraySlice { array, indices } => {
                out.push(array);
                out.extend(indices);
            }
            Node::HashAccess { hash, key, .. } => {
                out.push(hash);
                out.push(key);
            }
            Node::HashSlice { hash, keys } => {
                out.push(hash);
                out.extend(keys);
            }
            Node::PostfixDeref { expr, .. } => out.push(expr),
            Node::PostfixDerefSlice { expr, indices, .. } => {
                out.push(expr);
                out.extend(indices);
            }

            Node::BinaryOp { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            Node::UnaryOp { operand, .. } | Node::PrefixOp { operand, .. } | Node::PostfixOp { operand, .. } => {
                out.push(operand)
            }
            Node::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                out.push(condition);
                out.push(then_expr);
                out.push(else_expr);
            }
            Node::Assignment { target, value, .. } => {
                out.push(target);
                out.push(value);
            }

            Node::If {
                condition,
                then_block,
                elsif_clauses,
                else_block,
                ..
            } => {
                out.push(condition);
                out.extend(then_block);
                for clause in elsif_clauses {
                    out.push(&clause.condition);
                    out.extend(&clause.block);
                }
                out.extend(else_block.iter().flatten());
            }
            Node::Unless {
                condition,
                then_block,
                else_block,
                ..
            } => {
                out.push(condition);
                out.extend(then_block);
                out.extend(else_block.iter().flatten());
            }
            Node::While {
                condition,
                body,
                continue_block,
                ..
            }
            | Node::Until {
                condition,
                body,
                continue_block,
                ..
            } => {
                out.push(condition);
                out.extend(body);
                out.extend(continue_block.iter().flatten());
            }
            Node::Foreach {
                variable,
                list,
                body,
                continue_block,
                ..
            } => {
                out.extend(variable.as_deref());
                out.push(list);
                out.extend(body);
                out.extend(continue_block.iter().flatten());
            }
            Node::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                out.extend(init.as_deref());
                out.extend(condition.as_deref());
                out.extend(step.as_deref());
                out.extend(body);
            }
            Node::Block { statements, .. } | Node::DoBlock { statements } | Node::Eval { statements } => {
                out.extend(statements)
            }
            Node::Given {
                topic,
                block,
                whens,
                default,
            } => {
                out.push(topic);
                out.extend(block);
                out.extend(whens);
                out.extend(default.iter().flatten());
            }
            Node::When { condition, block } => {
                out.push(condition);
                out.extend(block);
            }
            Node::Default { block } | Node::Defer { block } => out.extend(block),
            Node::Try {
                block,
                catches,
                finally,
            } => {
                out.extend(block);
                for catch in catches {
                    out.extend(catch.variable.as_ref());
                    out.extend(&catch.block);
                }
                out.extend(finally.iter().flatten());
            }

            Node::Declaration {
                variables, initializer, ..
            } => {
                out.extend(variables);
                out.extend(initializer.as_deref());
            }
            Node::Sub { params, body, .. } | Node::Method { params, body, .. } => {
                out.extend(params.iter().flatten());
                out.extend(body);
            }
            Node::Parameter { default, .. } => out.extend(default.as_deref()),
            Node::Class { body, .. } => out.extend(body.iter().flatten()),
            Node::Field { variable, default, .. } => {
                out.push(variable);
                out.extend(default.as_deref());
            }
            Node::Package { block, .. } => out.extend(block.iter().flatten()),
            Node::Use { imports, .. } => out.extend(imports.as_deref()),
            Node::Require { target } => out.push(target),

            Node::Return { value } | Node::Throw { value } => out.extend(value.as_deref()),
            Node::Die { args } | Node::Warn { args } => out.extend(args),

            Node::Call { function, args, .. } => {
                out.push(function);
                out.extend(args);
            }
            Node::MethodCall { invocant, args, .. } => {
                out.push(invocant);
                out.extend(args);
            }
            Node::Print { filehandle, args } | Node::Say { filehandle, args } => {
                out.extend(filehandle.as_deref());
                out.extend(args);
            }
        }
        out
    }

    /// Visit this node and all of its descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Return `true` if any node in `nodes` (transitively) is an error node.
pub fn has_error_node(nodes: &[Node]) -> bool {
    !find_error_nodes(nodes).is_empty()
}

/// Collect every error node in `nodes`, in pre-order.
pub fn find_error_nodes(nodes: &[Node]) -> Vec<&ErrorNode> {
    let mut found = Vec::new();
    for node in nodes {
        node.walk(&mut |n| {
            if let Some(error) = n.as_error() {
                found.push(error);
            }
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str) -> Node {
        Node::Error(ErrorNode {
            message: message.to_string(),
            text: "?".to_string(),
            line: 1,
            column: 1,
        })
    }

    #[test]
    fn test_find_error_nodes_is_transitive() {
        let tree = vec![
            Node::assignment(Node::variable('$', "x"), "=", error("Empty expression after '='")),
            Node::List {
                elements: vec![Node::number("1"), Node::binary("+", Node::number("2"), error("nested"))],
            },
        ];
        let found = find_error_nodes(&tree);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].message, "nested");
        assert!(has_error_node(&tree));
        assert!(!has_error_node(&[Node::number("1")]));
    }

    #[test]
    fn test_walk_is_preorder() {
        let node = Node::binary("*", Node::number("2"), Node::number("3"));
        let mut seen = Vec::new();
        node.walk(&mut |n| seen.push(n.type_name()));
        assert_eq!(seen, vec!["BinaryOp", "Number", "Number"]);
    }
}
