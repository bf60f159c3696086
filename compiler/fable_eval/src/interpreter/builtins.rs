//! Built-in callables and the root environment.

use fable_ir::Line;

use crate::control::{Exec, Signal};
use crate::environment::Environment;
use crate::errors;
use crate::format::render_code;
use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::{BuiltinFn, FunctionValue, GenSource, GeneratorValue, Value};

use super::Interpreter;

/// A root environment with the built-ins bound by name.
pub fn root_environment() -> Environment {
    let env = Environment::root(Shared::default());
    for builtin in [
        BuiltinFn::Print,
        BuiltinFn::Stop,
        BuiltinFn::Range,
        BuiltinFn::Iter,
    ] {
        env.set(
            TableKey::Text(builtin.name().into()),
            Value::Function(Shared::new(FunctionValue::Builtin(builtin))),
        );
    }
    env
}

impl Interpreter<'_> {
    /// Dispatch a built-in invocation. `Ok(Some)` carries a returned
    /// value, `Ok(None)` means the builtin completed without one.
    pub(super) fn call_builtin(
        &mut self,
        builtin: BuiltinFn,
        args: &Shared<Table>,
        env: &Environment,
        line: Line,
    ) -> Exec<Option<Value>> {
        match builtin {
            BuiltinFn::Print => {
                let rendered: Vec<String> = args
                    .borrow()
                    .seq()
                    .iter()
                    .map(|value| render_code(self.ast, value))
                    .collect();
                self.out.push(rendered.join(" "));
                Ok(None)
            }
            BuiltinFn::Stop => {
                // The condition is argument 0, falling back to the scope
                // chain when the call carried no arguments.
                let condition = args
                    .borrow()
                    .get(&TableKey::Int(0))
                    .or_else(|| env.get(&TableKey::Int(0)));
                match condition {
                    Some(value) if value.truthy() => Err(Signal::Stop),
                    _ => Ok(None),
                }
            }
            BuiltinFn::Range => {
                let initializer = Shared::new(args.borrow().clone());
                let gen = GeneratorValue::new(GenSource::Range, initializer);
                Ok(Some(Value::Generator(Shared::new(gen))))
            }
            BuiltinFn::Iter => {
                let first = args.borrow().get(&TableKey::Int(0));
                let Some(Value::Table(table)) = first else {
                    return Err(errors::iter_needs_a_table(line).into());
                };
                let copy = table.borrow().clone();
                let keys = copy.keys().to_vec();
                let source = GenSource::TableIter {
                    keys,
                    seq_cursor: 0,
                    key_cursor: 0,
                };
                let gen = GeneratorValue::new(source, Shared::new(copy));
                Ok(Some(Value::Generator(Shared::new(gen))))
            }
        }
    }
}
