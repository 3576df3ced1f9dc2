//! Abstract Syntax Tree definitions for MPP.
//!
//! The tree is a closed sum type ([`Node`]) so that the parser and every downstream consumer (dumpers,
//! the formatter, future interpreters) match exhaustively over node kinds.
//!
//! ## Notes
//! - Parse errors are ordinary data: [`Node::Error`] may appear anywhere another node could, and the
//!   surrounding tree is still complete and walkable.
//! - Nodes are built bottom-up and never patched afterwards; optional attributes such as loop labels are
//!   fields set at construction.

mod sexp;
mod walk;

pub use walk::{find_error_nodes, has_error_node};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A statement list (`{ ... }` body).
pub type Block = Vec<Node>;

/// Payload of [`Node::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub message: String,
    /// Offending source text (the token the error is anchored on).
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Entry of a hash literal.
#[derive(Debug, Clone, PartialEq)]
pub enum HashEntry {
    /// `key => value`
    Pair { key: Node, value: Node },
    /// A bare element contributing its own pairs (`%defaults`, a list).
    Spread(Node),
}

/// `elsif (condition) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ElsifClause {
    pub condition: Node,
    pub block: Block,
}

/// `catch ($e) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub variable: Option<Node>,
    pub block: Block,
}

/// Field attribute (`:param`, `:reader(name)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// Container kind of a postfix-deref slice (`->@[...]` vs `->@{...}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Array,
    Hash,
}

/// AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // ========== Literals ==========
    Number {
        value: String,
    },
    String {
        value: String,
        interpolated: bool,
    },
    Boolean {
        value: bool,
    },
    RegexLiteral {
        pattern: String,
        flags: String,
    },

    // ========== Names ==========
    Variable {
        sigil: char,
        name: String,
    },
    Identifier {
        name: String,
    },

    // ========== Containers ==========
    ArrayLiteral {
        elements: Vec<Node>,
    },
    HashLiteral {
        entries: Vec<HashEntry>,
    },
    List {
        elements: Vec<Node>,
    },

    // ========== Access ==========
    ArrayAccess {
        array: Box<Node>,
        index: Box<Node>,
        arrow: bool,
    },
    ArraySlice {
        array: Box<Node>,
        indices: Vec<Node>,
    },
    HashAccess {
        hash: Box<Node>,
        key: Box<Node>,
        arrow: bool,
    },
    HashSlice {
        hash: Box<Node>,
        keys: Vec<Node>,
    },
    PostfixDeref {
        expr: Box<Node>,
        sigil: char,
    },
    PostfixDerefSlice {
        expr: Box<Node>,
        sigil: char,
        kind: SliceKind,
        indices: Vec<Node>,
    },

    // ========== Operators ==========
    BinaryOp {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryOp {
        op: String,
        operand: Box<Node>,
    },
    PrefixOp {
        op: String,
        operand: Box<Node>,
    },
    PostfixOp {
        op: String,
        operand: Box<Node>,
    },
    Ternary {
        condition: Box<Node>,
        then_expr: Box<Node>,
        else_expr: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        op: String,
        value: Box<Node>,
    },

    // ========== Control flow ==========
    If {
        condition: Box<Node>,
        then_block: Block,
        elsif_clauses: Vec<ElsifClause>,
        else_block: Option<Block>,
        postfix: bool,
    },
    Unless {
        condition: Box<Node>,
        then_block: Block,
        else_block: Option<Block>,
        postfix: bool,
    },
    While {
        label: Option<String>,
        condition: Box<Node>,
        body: Block,
        continue_block: Option<Block>,
        postfix: bool,
    },
    Until {
        label: Option<String>,
        condition: Box<Node>,
        body: Block,
        continue_block: Option<Block>,
        postfix: bool,
    },
    Foreach {
        label: Option<String>,
        declarator: Option<String>,
        variable: Option<Box<Node>>,
        list: Box<Node>,
        body: Block,
        /// `continue { ... }`, run after each iteration.
        continue_block: Option<Block>,
        postfix: bool,
    },
    /// C-style `for (init; condition; step) { ... }`.
    For {
        label: Option<String>,
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        step: Option<Box<Node>>,
        body: Block,
    },
    Block {
        label: Option<String>,
        statements: Block,
    },
    DoBlock {
        statements: Block,
    },
    Eval {
        statements: Block,
    },
    Given {
        topic: Box<Node>,
        block: Block,
        whens: Vec<Node>,
        default: Option<Block>,
    },
    When {
        condition: Box<Node>,
        block: Block,
    },
    Default {
        block: Block,
    },
    Try {
        block: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    Defer {
        block: Block,
    },

    // ========== Declarations ==========
    Declaration {
        declarator: String,
        variables: Vec<Node>,
        initializer: Option<Box<Node>>,
        parenthesized: bool,
    },
    Sub {
        name: Option<String>,
        declarator: Option<String>,
        is_async: bool,
        params: Option<Vec<Node>>,
        body: Block,
    },
    Parameter {
        sigil: char,
        name: String,
        default: Option<Box<Node>>,
    },
    Class {
        name: String,
        version: Option<String>,
        parent: Option<String>,
        body: Option<Block>,
    },
    Field {
        variable: Box<Node>,
        attributes: Vec<Attribute>,
        default: Option<Box<Node>>,
    },
    Method {
        name: Option<String>,
        params: Option<Vec<Node>>,
        body: Block,
    },
    Package {
        name: String,
        version: Option<String>,
        block: Option<Block>,
    },
    Use {
        module: Option<String>,
        version: Option<String>,
        imports: Option<Box<Node>>,
    },
    Require {
        target: Box<Node>,
    },

    // ========== Jumps ==========
    Return {
        value: Option<Box<Node>>,
    },
    Last {
        label: Option<String>,
    },
    Next {
        label: Option<String>,
    },
    Redo {
        label: Option<String>,
    },
    Break,
    Continue,
    Die {
        args: Vec<Node>,
    },
    Warn {
        args: Vec<Node>,
    },
    Throw {
        value: Option<Box<Node>>,
    },

    // ========== Calls ==========
    Call {
        function: Box<Node>,
        args: Vec<Node>,
        parenthesized: bool,
        /// `$code->(...)`
        arrow: bool,
    },
    MethodCall {
        invocant: Box<Node>,
        method: String,
        args: Vec<Node>,
        parenthesized: bool,
    },
    Print {
        filehandle: Option<Box<Node>>,
        args: Vec<Node>,
    },
    Say {
        filehandle: Option<Box<Node>>,
        args: Vec<Node>,
    },

    // ========== Errors ==========
    Error(ErrorNode),
}

impl Node {
    /// The `type` tag used by the serialization formats (`"BinaryOp"`, `"Error"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Number { .. } => "Number",
            Node::String { .. } => "String",
            Node::Boolean { .. } => "Boolean",
            Node::RegexLiteral { .. } => "RegexLiteral",
            Node::Variable { .. } => "Variable",
            Node::Identifier { .. } => "Identifier",
            Node::ArrayLiteral { .. } => "ArrayLiteral",
            Node::HashLiteral { .. } => "HashLiteral",
            Node::List { .. } => "List",
            Node::ArrayAccess { .. } => "ArrayAccess",
            Node::ArraySlice { .. } => "ArraySlice",
            Node::HashAccess { .. } => "HashAccess",
            Node::HashSlice { .. } => "HashSlice",
            Node::PostfixDeref { .. } => "PostfixDeref",
            Node::PostfixDerefSlice { .. } => "PostfixDerefSlice",
            Node::BinaryOp { .. } => "BinaryOp",
            Node::UnaryOp { .. } => "UnaryOp",
            Node::PrefixOp { .. } => "PrefixOp",
            Node::PostfixOp { .. } => "PostfixOp",
            Node::Ternary { .. } => "Ternary",
            Node::Assignment { .. } => "Assignment",
            Node::If { .. } => "If",
            Node::Unless { .. } => "Unless",
            Node::While { .. } => "While",
            Node::Until { .. } => "Until",
            Node::Foreach { .. } => "Foreach",
            Node::For { .. } => "For",
            Node::Block { .. } => "Block",
            Node::DoBlock { .. } => "DoBlock",
            Node::Eval { .. } => "Eval",
            Node::Given { .. } => "Given",
            Node::When { .. } => "When",
            Node::Default { .. } => "Default",
            Node::Try { .. } => "Try",
            Node::Defer { .. } => "Defer",
            Node::Declaration { .. } => "Declaration",
            Node::Sub { .. } => "Sub",
            Node::Parameter { .. } => "Parameter",
            Node::Class { .. } => "Class",
            Node::Field { .. } => "Field",
            Node::Method { .. } => "Method",
            Node::Package { .. } => "Package",
            Node::Use { .. } => "Use",
            Node::Require { .. } => "Require",
            Node::Return { .. } => "Return",
            Node::Last { .. } => "Last",
            Node::Next { .. } => "Next",
            Node::Redo { .. } => "Redo",
            Node::Break => "Break",
            Node::Continue => "Continue",
            Node::Die { .. } => "Die",
            Node::Warn { .. } => "Warn",
            Node::Throw { .. } => "Throw",
            Node::Call { .. } => "Call",
            Node::MethodCall { .. } => "MethodCall",
            Node::Print { .. } => "Print",
            Node::Say { .. } => "Say",
            Node::Error(_) => "Error",
        }
    }

    /// Return `true` for [`Node::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error(_))
    }

    /// Return the error payload, if this is an error node.
    pub fn as_error(&self) -> Option<&ErrorNode> {
        match self {
            Node::Error(e) => Some(e),
            _ => None,
        }
    }

    // Constructors used throughout the parser.

    pub fn number(value: impl Into<String>) -> Self {
        Node::Number { value: value.into() }
    }

    pub fn string(value: impl Into<String>, interpolated: bool) -> Self {
        Node::String {
            value: value.into(),
            interpolated,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier { name: name.into() }
    }

    pub fn variable(sigil: char, name: impl Into<String>) -> Self {
        Node::Variable {
            sigil,
            name: name.into(),
        }
    }

    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assignment(target: Node, op: impl Into<String>, value: Node) -> Self {
        Node::Assignment {
            target: Box::new(target),
            op: op.into(),
            value: Box::new(value),
        }
    }
}
