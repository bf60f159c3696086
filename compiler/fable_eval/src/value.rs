//! Runtime values.
//!
//! Finals (nothing, booleans, numbers, text) have value semantics; tables,
//! functions, and generators are [`Shared`] handles with reference
//! semantics. Copying a value is shallow for tables and resets cursor state
//! for generators.

use std::rc::Rc;

use fable_ir::NodeId;

use crate::shared::Shared;
use crate::table::Table;

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Nothing,
    Bool(bool),
    Number(Num),
    Text(Rc<str>),
    Function(Shared<FunctionValue>),
    Generator(Shared<GeneratorValue>),
    Table(Shared<Table>),
    /// The `always` keyword evaluated as a subscript key.
    Always,
}

/// Numbers keep integer identity until an operation forces a float.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn as_f64(self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }
}

/// A callable without cursor state.
#[derive(Debug)]
pub enum FunctionValue {
    /// A function literal: an ordered list of statement nodes.
    User { body: Rc<Vec<NodeId>> },
    Builtin(BuiltinFn),
}

/// The built-in callables seeded into the root environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinFn {
    Print,
    Stop,
    Range,
    Iter,
}

impl BuiltinFn {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFn::Print => "print",
            BuiltinFn::Stop => "stop",
            BuiltinFn::Range => "range",
            BuiltinFn::Iter => "iter",
        }
    }
}

/// A generator instance: a production source plus persisted state.
///
/// The initializer table is the generator's own scope and survives across
/// invocations; reloading merges into a fresh copy of it.
#[derive(Debug)]
pub struct GeneratorValue {
    pub source: GenSource,
    pub initializer: Shared<Table>,
    /// For `Body` sources: the statement index the next call resumes from.
    pub resume_index: usize,
    pub exhausted: bool,
}

impl GeneratorValue {
    pub fn new(source: GenSource, initializer: Shared<Table>) -> Self {
        GeneratorValue {
            source,
            initializer,
            resume_index: 0,
            exhausted: false,
        }
    }
}

/// What a generator produces values from.
#[derive(Debug)]
pub enum GenSource {
    /// Statement body with resumable execution.
    Body(Rc<Vec<NodeId>>),
    /// `producer => transformer`.
    Transform {
        producer: Shared<GeneratorValue>,
        transformer: Value,
    },
    /// `producer | predicate`.
    Filter {
        producer: Shared<GeneratorValue>,
        predicate: Value,
    },
    /// Number sequence over `[start, end]` bounds in the initializer.
    Range,
    /// Iteration over the initializer table: sequence slots first, then the
    /// snapshot of mapping keys taken at construction.
    TableIter {
        keys: Vec<crate::table::TableKey>,
        seq_cursor: usize,
        key_cursor: usize,
    },
}

impl Value {
    /// Type name used in operator mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nothing => "nothing",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Function(_) => "fun",
            Value::Generator(_) => "generator",
            Value::Table(_) => "table",
            Value::Always => "always",
        }
    }

    /// Truthiness, as tested by `?`, `!`, logic operators, and predicates.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Nothing => false,
            Value::Bool(b) => *b,
            Value::Number(Num::Int(n)) => *n != 0,
            Value::Number(Num::Float(f)) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Function(f) => match &*f.borrow() {
                FunctionValue::User { body } => !body.is_empty(),
                FunctionValue::Builtin(_) => true,
            },
            Value::Generator(g) => match &g.borrow().source {
                GenSource::Body(body) => !body.is_empty(),
                _ => true,
            },
            Value::Table(t) => !t.borrow().is_empty(),
            Value::Always => true,
        }
    }
}

/// The `<< []` copy discipline: finals clone, tables copy shallowly, and
/// generators get a fresh instance with copied state and reset cursors.
pub fn copy_value(value: &Value) -> Value {
    match value {
        Value::Function(f) => {
            let copied = match &*f.borrow() {
                FunctionValue::User { body } => FunctionValue::User {
                    body: Rc::clone(body),
                },
                FunctionValue::Builtin(b) => FunctionValue::Builtin(*b),
            };
            Value::Function(Shared::new(copied))
        }
        Value::Generator(g) => Value::Generator(copy_generator(g)),
        Value::Table(t) => Value::Table(Shared::new(t.borrow().clone())),
        other => other.clone(),
    }
}

/// A fresh generator instance over a copy of the initializer, with cursor
/// state reset. Nested producers are copied recursively.
pub fn copy_generator(gen: &Shared<GeneratorValue>) -> Shared<GeneratorValue> {
    let g = gen.borrow();
    let source = match &g.source {
        GenSource::Body(body) => GenSource::Body(Rc::clone(body)),
        GenSource::Transform {
            producer,
            transformer,
        } => GenSource::Transform {
            producer: copy_generator(producer),
            transformer: copy_value(transformer),
        },
        GenSource::Filter {
            producer,
            predicate,
        } => GenSource::Filter {
            producer: copy_generator(producer),
            predicate: copy_value(predicate),
        },
        GenSource::Range => GenSource::Range,
        GenSource::TableIter { keys, .. } => GenSource::TableIter {
            keys: keys.clone(),
            seq_cursor: 0,
            key_cursor: 0,
        },
    };
    let initializer = Shared::new(g.initializer.borrow().clone());
    Shared::new(GeneratorValue::new(source, initializer))
}
