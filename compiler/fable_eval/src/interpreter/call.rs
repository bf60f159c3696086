//! Invocation: `args -> callee` calls and `-> callee;` call blocks.

use std::rc::Rc;

use fable_ir::{Line, NodeId};

use crate::control::{Exec, Signal};
use crate::environment::{Environment, SysKey};
use crate::errors;
use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::{BuiltinFn, FunctionValue, Num, Value};

use super::Interpreter;

/// Wrap a call argument into an argument table.
///
/// A table passes through as the same object; any other value is bound
/// both as sequence slot 0 and under the key `1`, so callees can read the
/// single argument as `@0` or `@1`.
pub(super) fn make_args(value: &Value) -> Shared<Table> {
    if let Value::Table(table) = value {
        return table.clone();
    }
    let mut table = Table::new();
    table.push(value.clone());
    table.set_map(TableKey::Int(1), value.clone());
    Shared::new(table)
}

impl Interpreter<'_> {
    /// `args -> callee`: the argument expression evaluates first, then the
    /// callee under a promotion marker, so a point-free callee like
    /// `@1 + 1` becomes a lambda instead of failing.
    pub(super) fn eval_call(
        &mut self,
        id: NodeId,
        args: NodeId,
        callee: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(args, env)?;
        self.eval_marked(callee, env)?;
        let (Some(args_value), Some(callee_value)) = (self.value(args), self.value(callee))
        else {
            return Ok(());
        };
        let line = self.ast.line(id);
        if !matches!(callee_value, Value::Function(_) | Value::Generator(_)) {
            return Err(errors::not_callable(line, &self.code(callee)).into());
        }
        let args_table = make_args(&args_value);
        let result = self.invoke_callable(&callee_value, &args_table, env, None, line)?;
        self.set_slot(id, result.unwrap_or(Value::Nothing));
        Ok(())
    }

    /// `-> callee;`: invocation without arguments in a temporary frame, so
    /// assignments inside the body land in the caller's scope. Return and
    /// stop signals are not caught here; a generator's produced value is
    /// re-raised as a return out of the enclosing body.
    pub(super) fn eval_call_block(
        &mut self,
        id: NodeId,
        callee: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(callee, env)?;
        let Some(callee_value) = self.value(callee) else {
            return Ok(());
        };
        let line = self.ast.line(id);
        match &callee_value {
            Value::Function(f) => {
                let behavior = behavior_of(f);
                match behavior {
                    Behavior::User(body) => {
                        let block_env = env.temporary_child(Shared::default());
                        for statement in body.iter() {
                            self.eval(*statement, &block_env)?;
                        }
                    }
                    Behavior::Builtin(builtin) => {
                        self.call_builtin(builtin, &Shared::default(), env, line)?;
                    }
                }
            }
            Value::Generator(gen) => {
                let initializer = gen.borrow().initializer.clone();
                let block_env = env.temporary_child(initializer);
                let produced = self.call_generator(gen, &block_env, line)?;
                return Err(Signal::Return(produced));
            }
            _ => return Err(errors::not_callable(line, &self.code(callee)).into()),
        }
        self.set_slot(id, Value::Nothing);
        Ok(())
    }

    /// Invoke any callable value with an argument table.
    ///
    /// `Ok(Some(v))` is a returned value, `Ok(None)` a body that completed
    /// without returning; a generator's end-of-sequence arrives as
    /// `Err(Signal::Stop)` and each call site decides what it means.
    /// `loop_index` is bound as the callee frame's `index` when given.
    pub(super) fn invoke_callable(
        &mut self,
        callee: &Value,
        args: &Shared<Table>,
        env: &Environment,
        loop_index: Option<i64>,
        line: Line,
    ) -> Exec<Option<Value>> {
        match callee {
            Value::Function(f) => {
                let behavior = behavior_of(f);
                match behavior {
                    Behavior::User(body) => {
                        let bindings = Shared::new(Table::new().reload_merged(&args.borrow()));
                        let call_env = env.child(bindings);
                        if let Some(index) = loop_index {
                            call_env.sys_set(SysKey::LoopIndex, Value::Number(Num::Int(index)));
                        }
                        self.run_body(&body, &call_env)
                    }
                    Behavior::Builtin(builtin) => self.call_builtin(builtin, args, env, line),
                }
            }
            Value::Generator(gen) => {
                let bindings = super::generators::init_generator(gen, Some(args));
                let call_env = env.child(bindings);
                if let Some(index) = loop_index {
                    call_env.sys_set(SysKey::LoopIndex, Value::Number(Num::Int(index)));
                }
                self.call_generator(gen, &call_env, line).map(Some)
            }
            other => {
                let code = crate::format::render_code(self.ast, other);
                Err(errors::not_callable(line, &code).into())
            }
        }
    }

    /// Run a function body, catching a return signal.
    pub(super) fn run_body(
        &mut self,
        body: &[NodeId],
        env: &Environment,
    ) -> Exec<Option<Value>> {
        for statement in body {
            match self.eval(*statement, env) {
                Ok(()) => {}
                Err(Signal::Return(value)) => return Ok(Some(value)),
                Err(other) => return Err(other),
            }
        }
        Ok(None)
    }
}

enum Behavior {
    User(Rc<Vec<NodeId>>),
    Builtin(BuiltinFn),
}

fn behavior_of(f: &Shared<FunctionValue>) -> Behavior {
    match &*f.borrow() {
        FunctionValue::User { body } => Behavior::User(Rc::clone(body)),
        FunctionValue::Builtin(builtin) => Behavior::Builtin(*builtin),
    }
}
