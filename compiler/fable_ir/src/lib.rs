//! Shared IR for the Fable runtime.
//!
//! This crate defines everything the lexer, parser, and evaluator exchange:
//! source line coordinates, tokens, the syntax-tree arena, and source-code
//! rendering of nodes (used for diagnostics and for displaying values that
//! carry code, such as functions).

mod ast;
mod line;
mod token;

pub use ast::{
    render, render_at, render_float, render_fun_body, render_table_body, Ast, BinaryOp, Node,
    NodeId, NodeKind, UnaryOp,
};
pub use line::Line;
pub use token::{Token, TokenKind};
