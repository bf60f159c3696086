//! Value rendering.
//!
//! `render_code` reproduces source notation (text quoted, tables and
//! functions as literals) and is what `print` and error messages use for
//! structured values. The bare display form of finals lives with
//! concatenation in `operators`, the only place it is produced. Cyclic
//! tables render as `[...]` instead of recursing forever.

use fable_ir::{render_at, render_float, render_fun_body, render_table_body, Ast, NodeId};

use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::{FunctionValue, GenSource, GeneratorValue, Num, Value};

/// Source-notation rendering.
pub fn render_code(ast: &Ast, value: &Value) -> String {
    render(ast, value, 0, &mut Vec::new())
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn num_text(n: Num) -> String {
    match n {
        Num::Int(v) => v.to_string(),
        Num::Float(f) => render_float(f),
    }
}

fn render(ast: &Ast, value: &Value, depth: usize, visiting: &mut Vec<usize>) -> String {
    match value {
        Value::Nothing => "nothing".to_string(),
        Value::Bool(b) => bool_text(*b).to_string(),
        Value::Number(n) => num_text(*n),
        Value::Text(s) => format!("\"{s}\""),
        Value::Always => "always".to_string(),
        Value::Function(f) => match &*f.borrow() {
            FunctionValue::User { body } => body_code(ast, body, depth),
            FunctionValue::Builtin(b) => format!("{{**builtin: {}**}}", b.name()),
        },
        Value::Generator(g) => render_generator(ast, g, depth, visiting),
        Value::Table(t) => render_table(ast, t, depth, visiting),
    }
}

fn render_generator(
    ast: &Ast,
    gen: &Shared<GeneratorValue>,
    depth: usize,
    visiting: &mut Vec<usize>,
) -> String {
    match &gen.borrow().source {
        GenSource::Body(body) => body_code(ast, body, depth),
        GenSource::Transform {
            producer,
            transformer,
        } => format!(
            "{} => {}",
            render_generator(ast, producer, depth, visiting),
            render(ast, transformer, depth, visiting)
        ),
        GenSource::Filter {
            producer,
            predicate,
        } => format!(
            "{} | {}",
            render_generator(ast, producer, depth, visiting),
            render(ast, predicate, depth, visiting)
        ),
        GenSource::Range => "{**builtin: number generator**}".to_string(),
        GenSource::TableIter { .. } => "{**builtin: table iterator**}".to_string(),
    }
}

fn body_code(ast: &Ast, body: &[NodeId], depth: usize) -> String {
    let statements: Vec<String> = body
        .iter()
        .map(|id| render_at(ast, *id, depth + 1))
        .collect();
    render_fun_body(&statements, depth)
}

fn render_table(
    ast: &Ast,
    table: &Shared<Table>,
    depth: usize,
    visiting: &mut Vec<usize>,
) -> String {
    let address = table.address();
    if visiting.contains(&address) {
        return "[...]".to_string();
    }
    visiting.push(address);
    let t = table.borrow();
    let mut items: Vec<String> = t
        .seq()
        .iter()
        .map(|v| render(ast, v, depth + 1, visiting))
        .collect();
    for key in t.keys() {
        if let Some(value) = t.get(key) {
            items.push(format!(
                "{}: {}",
                key_code(key),
                render(ast, &value, depth + 1, visiting)
            ));
        }
    }
    if let Some(default) = t.default_value() {
        items.push(format!(
            "always: {}",
            render(ast, default, depth + 1, visiting)
        ));
    }
    drop(t);
    visiting.pop();
    render_table_body(&items, depth)
}

fn key_code(key: &TableKey) -> String {
    match key {
        TableKey::Nothing => "nothing".to_string(),
        TableKey::Bool(b) => bool_text(*b).to_string(),
        TableKey::Int(n) => n.to_string(),
        TableKey::Float(bits) => render_float(f64::from_bits(*bits)),
        TableKey::Text(s) => format!("\"{s}\""),
    }
}
