//! JSON rendering of the AST.
//!
//! Every node becomes an object tagged with `"type"`. Optional fields are emitted only when present and
//! boolean flags only when set, so the output stays close to the S-expression form. Error nodes carry
//! `message`, `text`, `line` and `column`.

use mpp_syntax::ast::{Block, HashEntry, Node, SliceKind};
use serde_json::{Map, Value, json};

/// Render a whole program as a JSON array of statements.
pub fn program_to_json(program: &[Node]) -> Value {
    Value::Array(program.iter().map(node_to_json).collect())
}

/// Render one node.
pub fn node_to_json(node: &Node) -> Value {
    let mut obj = Obj::new(node.type_name());
    match node {
        Node::Number { value } => obj.str("value", value),
        Node::String { value, interpolated } => {
            obj.str("value", value);
            obj.flag("interpolated", *interpolated);
        }
        Node::Boolean { value } => obj.set("value", json!(value)),
        Node::RegexLiteral { pattern, flags } => {
            obj.str("pattern", pattern);
            if !flags.is_empty() {
                obj.str("flags", flags);
            }
        }
        Node::Variable { sigil, name } => {
            obj.str("sigil", &sigil.to_string());
            obj.str("name", name);
        }
        Node::Identifier { name } => obj.str("name", name),

        Node::ArrayLiteral { elements } | Node::List { elements } => obj.nodes("elements", elements),
        Node::HashLiteral { entries } => {
            let entries = entries
                .iter()
                .map(|entry| match entry {
                    HashEntry::Pair { key, value } => json!({ "key": node_to_json(key), "value": node_to_json(value) }),
                    HashEntry::Spread(node) => json!({ "spread": node_to_json(node) }),
                })
                .collect();
            obj.set("entries", Value::Array(entries));
        }

        Node::ArrayAccess { array, index, arrow } => {
            obj.node("array", array);
            obj.node("index", index);
            obj.flag("arrow", *arrow);
        }
        Node::ArraySlice { array, indices } => {
            obj.node("array", array);
            obj.nodes("indices", indices);
        }
        Node::HashAccess { hash, key, arrow } => {
            obj.node("hash", hash);
            obj.node("key", key);
            obj.flag("arrow", *arrow);
        }
        Node::HashSlice { hash, keys } => {
            obj.node("hash", hash);
            obj.nodes("keys", keys);
        }
        Node::PostfixDeref { expr, sigil } => {
            obj.node("expr", expr);
            obj.str("sigil", &sigil.to_string());
        }
        Node::PostfixDerefSlice {
            expr,
            sigil,
            kind,
            indices,
        } => {
            obj.node("expr", expr);
            obj.str("sigil", &sigil.to_string());
            obj.str(
                "kind",
                match kind {
                    SliceKind::Array => "array",
                    SliceKind::Hash => "hash",
                },
            );
            obj.nodes("indices", indices);
        }

        Node::BinaryOp { op, left, right } => {
            obj.str("op", op);
            obj.node("left", left);
            obj.node("right", right);
        }
        Node::UnaryOp { op, operand } | Node::PrefixOp { op, operand } | Node::PostfixOp { op, operand } => {
            obj.str("op", op);
            obj.node("operand", operand);
        }
        Node::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            obj.node("condition", condition);
            obj.node("then", then_expr);
            obj.node("else", else_expr);
        }
        Node::Assignment { target, op, value } => {
            obj.node("target", target);
            obj.str("op", op);
            obj.node("value", value);
        }

        Node::If {
            condition,
            then_block,
            elsif_clauses,
            else_block,
            postfix,
        } => {
            obj.node("condition", condition);
            obj.nodes("then", then_block);
            if !elsif_clauses.is_empty() {
                let clauses = elsif_clauses
                    .iter()
                    .map(|clause| json!({ "condition": node_to_json(&clause.condition), "block": block(&clause.block) }))
                    .collect();
                obj.set("elsif", Value::Array(clauses));
            }
            obj.opt_block("else", else_block.as_ref());
            obj.flag("postfix", *postfix);
        }
        Node::Unless {
            condition,
            then_block,
            else_block,
            postfix,
        } => {
            obj.node("condition", condition);
            obj.nodes("then", then_block);
            obj.opt_block("else", else_block.as_ref());
            obj.flag("postfix", *postfix);
        }
        Node::While {
            label,
            condition,
            body,
            continue_block,
            postfix,
        }
        | Node::Until {
            label,
            condition,
            body,
            continue_block,
            postfix,
        } => {
            obj.opt_str("label", label.as_deref());
            obj.node("condition", condition);
            obj.nodes("body", body);
            obj.opt_block("continue", continue_block.as_ref());
            obj.flag("postfix", *postfix);
        }
        Node::Foreach {
            label,
            declarator,
            variable,
            list,
            body,
            continue_block,
            postfix,
        } => {
            obj.opt_str("label", label.as_deref());
            obj.opt_str("declarator", declarator.as_deref());
            obj.opt_node("variable", variable.as_deref());
            obj.node("list", list);
            obj.nodes("body", body);
            obj.opt_block("continue", continue_block.as_ref());
            obj.flag("postfix", *postfix);
        }
        Node::For {
            label,
            init,
            condition,
            step,
            body,
        } => {
            obj.opt_str("label", label.as_deref());
            obj.opt_node("init", init.as_deref());
            obj.opt_node("condition", condition.as_deref());
            obj.opt_node("step", step.as_deref());
            obj.nodes("body", body);
        }
        Node::Block { label, statements } => {
            obj.opt_str("label", label.as_deref());
            obj.nodes("statements", statements);
        }
        Node::DoBlock { statements } | Node::Eval { statements } => obj.nodes("statements", statements),
        Node::Given {
            topic,
            block: body,
            whens,
            default,
        } => {
            obj.node("topic", topic);
            obj.nodes("block", body);
            if !whens.is_empty() {
                obj.nodes("whens", whens);
            }
            obj.opt_block("default", default.as_ref());
        }
        Node::When { condition, block: body } => {
            obj.node("condition", condition);
            obj.nodes("block", body);
        }
        Node::Default { block: body } | Node::Defer { block: body } => obj.nodes("block", body),
        Node::Try {
            block: body,
            catches,
            finally,
        } => {
            obj.nodes("block", body);
            if !catches.is_empty() {
                let catches = catches
                    .iter()
                    .map(|clause| {
                        let mut catch = Map::new();
                        if let Some(variable) = &clause.variable {
                            catch.insert("variable".into(), node_to_json(variable));
                        }
                        catch.insert("block".into(), block(&clause.block));
                        Value::Object(catch)
                    })
                    .collect();
                obj.set("catches", Value::Array(catches));
            }
            obj.opt_block("finally", finally.as_ref());
        }

        Node::Declaration {
            declarator,
            variables,
            initializer,
            parenthesized,
        } => {
            obj.str("declarator", declarator);
            obj.nodes("variables", variables);
            obj.opt_node("initializer", initializer.as_deref());
            obj.flag("parenthesized", *parenthesized);
        }
        Node::Sub {
            name,
            declarator,
            is_async,
            params,
            body,
        } => {
            obj.opt_str("name", name.as_deref());
            obj.opt_str("declarator", declarator.as_deref());
            obj.flag("async", *is_async);
            if let Some(params) = params {
                obj.nodes("params", params);
            }
            obj.nodes("body", body);
        }
        Node::Parameter { sigil, name, default } => {
            obj.str("sigil", &sigil.to_string());
            obj.str("name", name);
            obj.opt_node("default", default.as_deref());
        }
        Node::Class {
            name,
            version,
            parent,
            body,
        } => {
            obj.str("name", name);
            obj.opt_str("version", version.as_deref());
            obj.opt_str("parent", parent.as_deref());
            obj.opt_block("body", body.as_ref());
        }
        Node::Field {
            variable,
            attributes,
            default,
        } => {
            obj.node("variable", variable);
            if !attributes.is_empty() {
                let attributes = attributes
                    .iter()
                    .map(|attr| match &attr.value {
                        Some(value) => json!({ "name": attr.name, "value": value }),
                        None => json!({ "name": attr.name }),
                    })
                    .collect();
                obj.set("attributes", Value::Array(attributes));
            }
            obj.opt_node("default", default.as_deref());
        }
        Node::Method { name, params, body } => {
            obj.opt_str("name", name.as_deref());
            if let Some(params) = params {
                obj.nodes("params", params);
            }
            obj.nodes("body", body);
        }
        Node::Package { name, version, block: body } => {
            obj.str("name", name);
            obj.opt_str("version", version.as_deref());
            obj.opt_block("block", body.as_ref());
        }
        Node::Use {
            module,
            version,
            imports,
        } => {
            obj.opt_str("module", module.as_deref());
            obj.opt_str("version", version.as_deref());
            obj.opt_node("imports", imports.as_deref());
        }
        Node::Require { target } => obj.node("target", target),

        Node::Return { value } | Node::Throw { value } => obj.opt_node("value", value.as_deref()),
        Node::Last { label } | Node::Next { label } | Node::Redo { label } => obj.opt_str("label", label.as_deref()),
        Node::Break | Node::Continue => {}
        Node::Die { args } | Node::Warn { args } => obj.nodes("args", args),

        Node::Call {
            function,
            args,
            parenthesized,
            arrow,
        } => {
            obj.node("function", function);
            obj.nodes("args", args);
            obj.flag("parenthesized", *parenthesized);
            obj.flag("arrow", *arrow);
        }
        Node::MethodCall {
            invocant,
            method,
            args,
            parenthesized,
        } => {
            obj.node("invocant", invocant);
            obj.str("method", method);
            obj.nodes("args", args);
            obj.flag("parenthesized", *parenthesized);
        }
        Node::Print { filehandle, args } | Node::Say { filehandle, args } => {
            obj.opt_node("filehandle", filehandle.as_deref());
            obj.nodes("args", args);
        }

        Node::Error(error) => {
            obj.str("message", &error.message);
            obj.str("text", &error.text);
            obj.set("line", json!(error.line));
            obj.set("column", json!(error.column));
        }
    }
    obj.finish()
}

fn block(statements: &Block) -> Value {
    Value::Array(statements.iter().map(node_to_json).collect())
}

/// Object under construction, `"type"` first.
struct Obj(Map<String, Value>);

impl Obj {
    fn new(type_name: &str) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(type_name.to_string()));
        Self(map)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    fn str(&mut self, key: &str, value: &str) {
        self.set(key, Value::String(value.to_string()));
    }

    fn opt_str(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.str(key, value);
        }
    }

    fn flag(&mut self, key: &str, value: bool) {
        if value {
            self.set(key, Value::Bool(true));
        }
    }

    fn node(&mut self, key: &str, node: &Node) {
        self.set(key, node_to_json(node));
    }

    fn opt_node(&mut self, key: &str, node: Option<&Node>) {
        if let Some(node) = node {
            self.node(key, node);
        }
    }

    fn nodes(&mut self, key: &str, nodes: &[Node]) {
        self.set(key, Value::Array(nodes.iter().map(node_to_json).collect()));
    }

    fn opt_block(&mut self, key: &str, statements: Option<&Block>) {
        if let Some(statements) = statements {
            self.set(key, block(statements));
        }
    }

    fn finish(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpp_syntax::parser::parse_source;

    fn first(source: &str) -> Value {
        node_to_json(&parse_source(source)[0])
    }

    #[test]
    fn test_type_tag_and_required_fields() {
        let value = first("1 + 2");
        assert_eq!(value["type"], "BinaryOp");
        assert_eq!(value["op"], "+");
        assert_eq!(value["left"]["type"], "Number");
        assert_eq!(value["right"]["value"], "2");
    }

    #[test]
    fn test_optional_fields_only_when_present() {
        let value = first("my $x;");
        assert_eq!(value["type"], "Declaration");
        assert!(value.get("initializer").is_none());
        assert!(value.get("parenthesized").is_none());

        let value = first("my ($a, $b) = @_;");
        assert_eq!(value["parenthesized"], true);
        assert_eq!(value["initializer"]["type"], "Variable");
    }

    #[test]
    fn test_error_node_fields() {
        let value = first("my $x = ;");
        let error = &value["initializer"];
        assert_eq!(error["type"], "Error");
        assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));
        assert_eq!(error["line"], 1);
    }

    #[test]
    fn test_program_is_array() {
        let value = program_to_json(&parse_source("1; 2;"));
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
