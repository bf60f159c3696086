//! Table and function literal construction.

use std::rc::Rc;

use fable_ir::{Line, NodeId, NodeKind};

use crate::control::{Exec, Signal, MAX_LOOP_COUNT};
use crate::environment::{Environment, SysKey};
use crate::errors;
use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::{FunctionValue, GenSource, GeneratorValue, Num, Value};

use super::Interpreter;

impl Interpreter<'_> {
    /// `[ ... ]`: one walk over the items, each applied to the table under
    /// construction as it evaluates (item values under promotion markers,
    /// splice operands without). Spliced generators drain at their item
    /// position, so their side effects interleave with the other items'.
    /// An unresolved child contributes nothing and leaves the literal's own
    /// slot unresolved.
    pub(super) fn eval_table_lit(
        &mut self,
        id: NodeId,
        items: &[NodeId],
        env: &Environment,
    ) -> Exec<()> {
        let mut table = Table::new();
        let mut complete = true;
        for item in items {
            match self.ast.kind(*item).clone() {
                NodeKind::SeqItem(value) => {
                    self.eval_marked(value, env)?;
                    match self.value(value) {
                        Some(v) => table.push(v),
                        None => complete = false,
                    }
                }
                NodeKind::AlwaysItem(value) => {
                    self.eval_marked(value, env)?;
                    match self.value(value) {
                        Some(v) => table.set_default(v),
                        None => complete = false,
                    }
                }
                NodeKind::MapItem { key, value } => {
                    self.eval(key, env)?;
                    self.eval_marked(value, env)?;
                    let (Some(key_value), Some(v)) = (self.value(key), self.value(value)) else {
                        complete = false;
                        continue;
                    };
                    let Some(table_key) = TableKey::from_value(&key_value) else {
                        return Err(
                            errors::invalid_key(self.ast.line(key), &self.code(key)).into()
                        );
                    };
                    // Keyed items always land in the mapping, even with a
                    // small integer key.
                    table.set_map(table_key, v);
                }
                NodeKind::Splice(operand) => {
                    self.eval(operand, env)?;
                    let Some(spliced) = self.value(operand) else {
                        complete = false;
                        continue;
                    };
                    let line = self.ast.line(*item);
                    match &spliced {
                        Value::Table(t) => table.splice_merge(&t.borrow()),
                        Value::Generator(gen) => {
                            self.drain_into_table(&mut table, gen, env, line)?;
                        }
                        _ => return Err(errors::splice_needs_generator(line).into()),
                    }
                }
                _ => {}
            }
        }
        if complete {
            self.set_slot(id, Value::Table(Shared::new(table)));
        }
        Ok(())
    }

    /// Drain a spliced generator into the table under construction.
    /// Produced tables merge, anything else appends to the sequence. The
    /// drain loop exposes its counter as `index`.
    fn drain_into_table(
        &mut self,
        table: &mut Table,
        gen: &Shared<GeneratorValue>,
        env: &Environment,
        line: Line,
    ) -> Exec<()> {
        let bindings = gen.borrow().initializer.clone();
        let gen_env = env.child(bindings);
        let mut count: usize = 0;
        loop {
            gen_env.sys_set(
                SysKey::LoopIndex,
                Value::Number(Num::Int(i64::try_from(count).unwrap_or(i64::MAX))),
            );
            if count > MAX_LOOP_COUNT {
                return Err(errors::possible_infinite_loop(line).into());
            }
            match self.call_generator(gen, &gen_env, line) {
                Ok(Value::Table(produced)) => table.splice_merge(&produced.borrow()),
                Ok(value) => table.push(value),
                Err(Signal::Stop) => return Ok(()),
                Err(other) => return Err(other),
            }
            count += 1;
        }
    }

    /// `{ ... }`: statements become the function body; splice statements
    /// evaluate at construction and inline the spliced function's
    /// statements in place. An unresolved splice operand is skipped.
    pub(super) fn eval_fun_lit(
        &mut self,
        id: NodeId,
        body: &[NodeId],
        env: &Environment,
    ) -> Exec<()> {
        let mut built: Vec<NodeId> = Vec::with_capacity(body.len());
        for statement in body {
            let NodeKind::Splice(operand) = self.ast.kind(*statement).clone() else {
                built.push(*statement);
                continue;
            };
            self.eval(operand, env)?;
            let Some(spliced) = self.value(operand) else {
                continue;
            };
            let line = self.ast.line(*statement);
            match &spliced {
                Value::Function(f) => match &*f.borrow() {
                    FunctionValue::User { body: spliced_body } => {
                        built.extend(spliced_body.iter().copied());
                    }
                    FunctionValue::Builtin(_) => {
                        return Err(
                            errors::splice_needs_function(line, &self.code(operand)).into()
                        );
                    }
                },
                Value::Generator(gen) => match &gen.borrow().source {
                    GenSource::Body(spliced_body) => {
                        built.extend(spliced_body.iter().copied());
                    }
                    _ => {
                        return Err(
                            errors::splice_needs_function(line, &self.code(operand)).into()
                        );
                    }
                },
                Value::Table(_) => {
                    return Err(errors::splice_table_outside_literal(line).into());
                }
                _ => {
                    return Err(errors::splice_needs_function(line, &self.code(operand)).into());
                }
            }
        }
        let function = FunctionValue::User {
            body: Rc::new(built),
        };
        self.set_slot(id, Value::Function(Shared::new(function)));
        Ok(())
    }
}
