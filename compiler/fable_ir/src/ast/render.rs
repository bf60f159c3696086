//! Source-code rendering of nodes.
//!
//! Diagnostics quote the offending operands by their code form, and function
//! values display as their (re-rendered) bodies, so rendering has to produce
//! text that reads back as the language it came from.

use crate::{Ast, NodeId, NodeKind};

const INDENT: &str = "    ";

/// Render a node at nesting depth zero.
pub fn render(ast: &Ast, id: NodeId) -> String {
    render_at(ast, id, 0)
}

/// Render a node at the given nesting depth.
///
/// Depth controls the indentation of multi-line forms (table and function
/// literals); everything else ignores it.
pub fn render_at(ast: &Ast, id: NodeId, depth: usize) -> String {
    match ast.kind(id) {
        NodeKind::Nothing => "nothing".to_string(),
        NodeKind::Bool(true) => "yes".to_string(),
        NodeKind::Bool(false) => "no".to_string(),
        NodeKind::Int(n) => n.to_string(),
        NodeKind::Float(f) => render_float(*f),
        NodeKind::Text(s) => format!("\"{s}\""),
        NodeKind::Always => "always".to_string(),
        NodeKind::Index => "index".to_string(),
        NodeKind::Name(name) => name.clone(),
        NodeKind::Arg(key) => format!("@{}", render_at(ast, *key, depth)),
        NodeKind::Group(inner) => format!("({})", render_at(ast, *inner, depth)),
        NodeKind::Unary { op, operand } => {
            format!("({}{})", op.symbol(), render_at(ast, *operand, depth))
        }
        NodeKind::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            render_at(ast, *lhs, depth),
            op.symbol(),
            render_at(ast, *rhs, depth)
        ),
        NodeKind::Subscript { target, key } => format!(
            "{}[{}]",
            render_at(ast, *target, depth),
            render_at(ast, *key, depth)
        ),
        NodeKind::Call { args, callee } => format!(
            "{} -> {}",
            render_at(ast, *args, depth),
            render_at(ast, *callee, depth)
        ),
        NodeKind::CallBlock { callee } => format!("-> {}", render_at(ast, *callee, depth)),
        NodeKind::Detect { producer, detector } => format!(
            "{} <?= {}",
            render_at(ast, *producer, depth),
            render_at(ast, *detector, depth)
        ),
        NodeKind::Transform {
            producer,
            transformer,
        } => format!(
            "{} => {}",
            render_at(ast, *producer, depth),
            render_at(ast, *transformer, depth)
        ),
        NodeKind::Filter {
            producer,
            predicate,
        } => format!(
            "{} | {}",
            render_at(ast, *producer, depth),
            render_at(ast, *predicate, depth)
        ),
        NodeKind::Reduce { producer, reducer } => format!(
            "{} >> {}",
            render_at(ast, *producer, depth),
            render_at(ast, *reducer, depth)
        ),
        NodeKind::Reload {
            target,
            initializer,
        } => format!(
            "{} << {}",
            render_at(ast, *target, depth),
            render_at(ast, *initializer, depth)
        ),
        NodeKind::Assign { target, value } => format!(
            "{} = {}",
            render_at(ast, *target, depth),
            render_at(ast, *value, depth)
        ),
        NodeKind::Return(value) => format!("<- {}", render_at(ast, *value, depth)),
        NodeKind::Splice(value) => format!("..{}", render_at(ast, *value, depth)),
        NodeKind::SeqItem(item) => render_at(ast, *item, depth),
        NodeKind::MapItem { key, value } => format!(
            "{}: {}",
            render_at(ast, *key, depth),
            render_at(ast, *value, depth)
        ),
        NodeKind::AlwaysItem(value) => format!("always: {}", render_at(ast, *value, depth)),
        NodeKind::TableLit { items } => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| render_at(ast, *item, depth + 1))
                .collect();
            render_table_body(&rendered, depth)
        }
        NodeKind::FunLit { body } => {
            let rendered: Vec<String> = body
                .iter()
                .map(|stmt| render_at(ast, *stmt, depth + 1))
                .collect();
            render_fun_body(&rendered, depth)
        }
    }
}

/// Bracketed multi-line table form shared with value rendering.
pub fn render_table_body(items: &[String], depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let outer = INDENT.repeat(depth);
    let joined = items
        .iter()
        .map(|item| format!("{inner}{item}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("[\n{joined}\n{outer}]")
}

/// Braced multi-line function form shared with value rendering.
pub fn render_fun_body(stmts: &[String], depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let outer = INDENT.repeat(depth);
    let mut joined = stmts
        .iter()
        .map(|stmt| format!("{inner}{stmt}"))
        .collect::<Vec<_>>()
        .join(";\n");
    if !joined.is_empty() {
        joined.push(';');
    }
    format!("{{\n{joined}\n{outer}}}")
}

/// Render a float with an explicit decimal point.
///
/// `2.0` must read back as a float literal, not the integer `2`.
pub fn render_float(f: f64) -> String {
    let s = format!("{f}");
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOp, Line, UnaryOp};
    use pretty_assertions::assert_eq;

    fn line() -> Line {
        Line::new(1)
    }

    #[test]
    fn renders_operators_and_subscripts() {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Name("a".into()), line());
        let two = ast.alloc(NodeKind::Int(2), line());
        let sum = ast.alloc(
            NodeKind::Binary {
                op: BinaryOp::Add,
                lhs: a,
                rhs: two,
            },
            line(),
        );
        let neg = ast.alloc(
            NodeKind::Unary {
                op: UnaryOp::Neg,
                operand: sum,
            },
            line(),
        );
        assert_eq!(render(&ast, neg), "(-a + 2)");

        let key = ast.alloc(NodeKind::Text("k".into()), line());
        let sub = ast.alloc(NodeKind::Subscript { target: a, key }, line());
        assert_eq!(render(&ast, sub), "a[\"k\"]");
    }

    #[test]
    fn renders_floats_with_decimal_point() {
        assert_eq!(render_float(2.0), "2.0");
        assert_eq!(render_float(2.5), "2.5");
    }

    #[test]
    fn renders_function_literal_with_indented_statements() {
        let mut ast = Ast::new();
        let one = ast.alloc(NodeKind::Int(1), line());
        let ret = ast.alloc(NodeKind::Return(one), line());
        let fun = ast.alloc(NodeKind::FunLit { body: vec![ret] }, line());
        assert_eq!(render(&ast, fun), "{\n    <- 1;\n}");
    }

    #[test]
    fn renders_table_literal_items() {
        let mut ast = Ast::new();
        let one = ast.alloc(NodeKind::Int(1), line());
        let item = ast.alloc(NodeKind::SeqItem(one), line());
        let key = ast.alloc(NodeKind::Text("k".into()), line());
        let two = ast.alloc(NodeKind::Int(2), line());
        let map = ast.alloc(NodeKind::MapItem { key, value: two }, line());
        let table = ast.alloc(
            NodeKind::TableLit {
                items: vec![item, map],
            },
            line(),
        );
        assert_eq!(render(&ast, table), "[\n    1,\n    \"k\": 2\n]");
    }
}
