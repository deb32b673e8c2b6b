//! Syntax tree produced by the tokenizer adapter
//!
//! The node-kind set is closed: rules subscribe to kinds from this list and
//! the evaluator dispatches through a precomputed kind->rules index.

/// Node kinds rules can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The file root; one per tree, always first in traversal order
    Program,
    /// A `var`/`let`/`const` declarator
    Declaration,
    /// A `require('...')` call
    RequireCall,
    /// A `new Identifier` expression
    NewExpr,
    /// A string literal
    StringLiteral,
    /// An opening brace with owner classification
    BraceOpen,
    /// A key inside an object literal
    ObjectKey,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeKind::Program => "program",
            NodeKind::Declaration => "declaration",
            NodeKind::RequireCall => "require-call",
            NodeKind::NewExpr => "new-expr",
            NodeKind::StringLiteral => "string-literal",
            NodeKind::BraceOpen => "brace-open",
            NodeKind::ObjectKey => "object-key",
        };
        write!(f, "{}", s)
    }
}

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Var,
    Let,
    Const,
}

/// Classified initializer of a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitKind {
    /// `= new Callee(...)`
    New(String),
    /// `= require('module')`
    Require(String),
    /// `= function ...`
    Function,
    /// `= "literal"` / `= 'literal'` / `= 123`
    Literal,
    /// `= { ... }`
    ObjectLiteral,
    /// Anything else
    Other,
    /// No initializer
    None,
}

/// What an opening brace belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BraceOwner {
    /// Follows a control keyword clause (`if`, `for`, `while`, ...)
    Control(String),
    /// A function body (`function name(...) {`)
    Function,
    /// An object literal expression
    ObjectLiteral,
    /// A bare or otherwise-owned block
    Block,
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Program,
    Declaration {
        keyword: DeclKeyword,
        name: String,
        init: InitKind,
    },
    RequireCall {
        module: String,
        /// First require after a non-require statement (opens a new block)
        starts_block: bool,
    },
    NewExpr {
        callee: String,
    },
    StringLiteral {
        quote: char,
        value: String,
        has_unescaped_single_quote: bool,
    },
    BraceOpen {
        owner: BraceOwner,
        /// The owning keyword (if any) sits on the same source line
        same_line_as_owner: bool,
        /// Line of the matching close brace, once seen
        close_line: Option<usize>,
    },
    ObjectKey {
        key: String,
        /// Node index of the owning object-literal brace
        literal: usize,
    },
}

/// A node in the parsed source tree
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Parent node index, if any
    pub parent: Option<usize>,
    /// Payload
    pub data: NodeData,
}

impl SyntaxNode {
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Program => NodeKind::Program,
            NodeData::Declaration { .. } => NodeKind::Declaration,
            NodeData::RequireCall { .. } => NodeKind::RequireCall,
            NodeData::NewExpr { .. } => NodeKind::NewExpr,
            NodeData::StringLiteral { .. } => NodeKind::StringLiteral,
            NodeData::BraceOpen { .. } => NodeKind::BraceOpen,
            NodeData::ObjectKey { .. } => NodeKind::ObjectKey,
        }
    }
}

/// Parsed source tree: nodes stored in pre-order (source order)
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<SyntaxNode>,
}

impl Tree {
    pub fn new(nodes: Vec<SyntaxNode>) -> Self {
        Self { nodes }
    }

    /// Iterate nodes in deterministic pre-order, left-to-right
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SyntaxNode)> {
        self.nodes.iter().enumerate()
    }

    pub fn get(&self, idx: usize) -> Option<&SyntaxNode> {
        self.nodes.get(idx)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
