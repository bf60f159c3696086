//! Syntax-tree arena.
//!
//! Nodes live in a flat `Vec` addressed by `NodeId`; children are stored as
//! ids, never as owning pointers. The arena only ever grows: the evaluator
//! appends synthesized nodes (promoted lambda bodies) while a program runs,
//! and a REPL session keeps one arena alive across inputs because function
//! values hold ids into it.

mod render;

pub use render::{render, render_at, render_float, render_fun_body, render_table_body};

use crate::Line;

/// Index of a node in an [`Ast`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A syntax-tree node: its kind plus the source line it came from.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub line: Line,
}

/// Unary operators, prefix position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` arithmetic negation.
    Neg,
    /// `!` logical not.
    Not,
    /// `?` boolean coercion.
    Truth,
    /// `#` length.
    Len,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Truth => "?",
            UnaryOp::Len => "#",
        }
    }
}

/// Binary operators dispatched through the operator pattern tables.
///
/// The combinators (`=>`, `|`, `>>`, `<?=`, `<<`) are separate node kinds,
/// not `BinaryOp` variants, because their operand evaluation order and
/// lambda-marker placement differ per construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }
}

/// The closed set of node kinds the evaluator understands.
#[derive(Clone, Debug)]
pub enum NodeKind {
    // Literals
    Nothing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// `always`, legal only as a subscript key (table-literal `always:`
    /// items are `AlwaysItem`s).
    Always,
    /// `index`, the implicit loop counter.
    Index,

    /// A bare name, looked up against the environment chain.
    Name(String),
    /// `@expr`: lookup by a computed number or text key.
    Arg(NodeId),

    Group(NodeId),
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Subscript {
        target: NodeId,
        key: NodeId,
    },

    /// `args -> callee`.
    Call {
        args: NodeId,
        callee: NodeId,
    },
    /// `-> callee;` statement: invocation without arguments in a temporary
    /// frame.
    CallBlock {
        callee: NodeId,
    },

    /// `producer <?= detector`.
    Detect {
        producer: NodeId,
        detector: NodeId,
    },
    /// `producer => transformer`.
    Transform {
        producer: NodeId,
        transformer: NodeId,
    },
    /// `producer | predicate`.
    Filter {
        producer: NodeId,
        predicate: NodeId,
    },
    /// `producer >> reducer`.
    Reduce {
        producer: NodeId,
        reducer: NodeId,
    },
    /// `target << initializer`.
    Reload {
        target: NodeId,
        initializer: NodeId,
    },

    Assign {
        target: NodeId,
        value: NodeId,
    },
    /// `<- expr;`.
    Return(NodeId),
    /// `..expr`: splice into the aggregate under construction.
    Splice(NodeId),

    // Table-literal items
    SeqItem(NodeId),
    MapItem {
        key: NodeId,
        value: NodeId,
    },
    AlwaysItem(NodeId),

    TableLit {
        items: Vec<NodeId>,
    },
    FunLit {
        body: Vec<NodeId>,
    },
}

/// Arena of syntax-tree nodes.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, line: Line) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { kind, line });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn line(&self, id: NodeId) -> Line {
        self.nodes[id.index()].line
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
