//! Generator invocation and the lazy combinators.
//!
//! Pulling from a generator runs it inside an environment frame whose
//! bindings table is the generator's own initializer, so state written by
//! the body survives to the next pull. A per-instance marker on the
//! context stack rejects re-entrant invocation.

use std::rc::Rc;

use fable_ir::{Line, NodeId};

use crate::context::ContextFrame;
use crate::control::{Exec, Signal, MAX_LOOP_COUNT};
use crate::environment::{Environment, SysKey};
use crate::errors;
use crate::format::render_code;
use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::{copy_generator, copy_value, FunctionValue, GenSource, GeneratorValue, Num, Value};

use super::call::make_args;
use super::{Combinator, Interpreter};

/// Merge an argument table into the generator's initializer, replacing the
/// initializer with the merged table. Without arguments the current
/// initializer is handed out unchanged.
pub(super) fn init_generator(
    gen: &Shared<GeneratorValue>,
    args: Option<&Shared<Table>>,
) -> Shared<Table> {
    let Some(args) = args else {
        return gen.borrow().initializer.clone();
    };
    let merged = {
        let g = gen.borrow();
        let merged = g.initializer.borrow().reload_merged(&args.borrow());
        Shared::new(merged)
    };
    gen.borrow_mut().initializer = merged.clone();
    merged
}

fn loop_counter(count: usize) -> Value {
    Value::Number(Num::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

enum Step {
    Body(Rc<Vec<NodeId>>),
    Transform { producer: Shared<GeneratorValue>, transformer: Value },
    Filter { producer: Shared<GeneratorValue>, predicate: Value },
    Range,
    TableIter,
}

impl Interpreter<'_> {
    /// Pull one value from a generator. `Err(Signal::Stop)` is
    /// end-of-sequence; re-entering an already-executing instance fails.
    pub(super) fn call_generator(
        &mut self,
        gen: &Shared<GeneratorValue>,
        env: &Environment,
        line: Line,
    ) -> Exec<Value> {
        let address = gen.address();
        if self.ctx.generator_active(address) {
            return Err(errors::illegal_recursion(line).into());
        }
        self.ctx.push(ContextFrame::ActiveGenerator(address));
        let result = self.step_generator(gen, env, line);
        self.ctx.pop();
        result
    }

    fn step_generator(
        &mut self,
        gen: &Shared<GeneratorValue>,
        env: &Environment,
        line: Line,
    ) -> Exec<Value> {
        let step = match &gen.borrow().source {
            GenSource::Body(body) => Step::Body(Rc::clone(body)),
            GenSource::Transform {
                producer,
                transformer,
            } => Step::Transform {
                producer: producer.clone(),
                transformer: transformer.clone(),
            },
            GenSource::Filter {
                producer,
                predicate,
            } => Step::Filter {
                producer: producer.clone(),
                predicate: predicate.clone(),
            },
            GenSource::Range => Step::Range,
            GenSource::TableIter { .. } => Step::TableIter,
        };
        match step {
            Step::Body(body) => self.step_body(gen, &body, env),
            Step::Transform {
                producer,
                transformer,
            } => self.step_transform(gen, &producer, &transformer, env, line),
            Step::Filter {
                producer,
                predicate,
            } => self.step_filter(gen, &producer, &predicate, env, line),
            Step::Range => step_range(gen, line),
            Step::TableIter => step_table_iter(gen),
        }
    }

    /// Resumable body execution: run from the resumption index; a return
    /// produces a value and records where to resume. Completing a call
    /// that did not start at statement 0 earns one more full pass before
    /// the generator is exhausted.
    fn step_body(
        &mut self,
        gen: &Shared<GeneratorValue>,
        body: &[NodeId],
        env: &Environment,
    ) -> Exec<Value> {
        if gen.borrow().exhausted {
            return Err(Signal::Stop);
        }
        let resume = gen.borrow().resume_index;
        if let Some((at, value)) = self.run_body_from(body, resume, env)? {
            gen.borrow_mut().resume_index = at + 1;
            return Ok(value);
        }
        if resume > 0 {
            if let Some((at, value)) = self.run_body_from(body, 0, env)? {
                gen.borrow_mut().resume_index = at + 1;
                return Ok(value);
            }
        }
        gen.borrow_mut().exhausted = true;
        Err(Signal::Stop)
    }

    fn run_body_from(
        &mut self,
        body: &[NodeId],
        start: usize,
        env: &Environment,
    ) -> Exec<Option<(usize, Value)>> {
        for (i, id) in body.iter().enumerate().skip(start) {
            match self.eval(*id, env) {
                Ok(()) => {}
                Err(Signal::Return(value)) => return Ok(Some((i, value))),
                Err(other) => return Err(other),
            }
        }
        Ok(None)
    }

    /// One producer pull inside a frame over the producer's initializer.
    fn pull_producer(
        &mut self,
        producer: &Shared<GeneratorValue>,
        env: &Environment,
        line: Line,
    ) -> Exec<Value> {
        let bindings = producer.borrow().initializer.clone();
        let producer_env = env.child(bindings);
        self.call_generator(producer, &producer_env, line)
    }

    fn step_transform(
        &mut self,
        gen: &Shared<GeneratorValue>,
        producer: &Shared<GeneratorValue>,
        transformer: &Value,
        env: &Environment,
        line: Line,
    ) -> Exec<Value> {
        if gen.borrow().exhausted {
            return Err(Signal::Stop);
        }
        let produced = match self.pull_producer(producer, env, line) {
            Ok(value) => value,
            Err(Signal::Stop) => {
                gen.borrow_mut().exhausted = true;
                return Err(Signal::Stop);
            }
            Err(other) => return Err(other),
        };
        match transformer {
            Value::Function(_) | Value::Generator(_) => {
                let args = make_args(&produced);
                match self.invoke_callable(transformer, &args, env, None, line) {
                    Ok(Some(result)) => Ok(result),
                    // A transformer that completes without returning, or
                    // stops, has no result to produce.
                    Ok(None) | Err(Signal::Stop) => {
                        let code = render_code(self.ast, transformer);
                        Err(errors::missing_result(line, &code).into())
                    }
                    Err(other) => Err(other),
                }
            }
            Value::Table(table) => self.table_lookup(table, &produced, line),
            other => {
                let code = render_code(self.ast, other);
                Err(errors::not_callable(line, &code).into())
            }
        }
    }

    fn step_filter(
        &mut self,
        gen: &Shared<GeneratorValue>,
        producer: &Shared<GeneratorValue>,
        predicate: &Value,
        env: &Environment,
        line: Line,
    ) -> Exec<Value> {
        if gen.borrow().exhausted {
            return Err(Signal::Stop);
        }
        let mut count: usize = 0;
        loop {
            count += 1;
            if count > MAX_LOOP_COUNT {
                return Err(errors::possible_infinite_loop(line).into());
            }
            let produced = match self.pull_producer(producer, env, line) {
                Ok(value) => value,
                Err(Signal::Stop) => {
                    gen.borrow_mut().exhausted = true;
                    return Err(Signal::Stop);
                }
                Err(other) => return Err(other),
            };
            match predicate {
                Value::Function(_) | Value::Generator(_) => {
                    let args = make_args(&produced);
                    match self.invoke_callable(predicate, &args, env, None, line) {
                        Ok(Some(verdict)) => {
                            if verdict.truthy() {
                                return Ok(produced);
                            }
                        }
                        // No verdict: skip this value and keep pulling.
                        Ok(None) | Err(Signal::Stop) => {}
                        Err(other) => return Err(other),
                    }
                }
                Value::Table(table) => {
                    let entry = self.table_lookup(table, &produced, line)?;
                    if entry.truthy() {
                        return Ok(produced);
                    }
                }
                other => {
                    let code = render_code(self.ast, other);
                    return Err(errors::not_callable(line, &code).into());
                }
            }
        }
    }

    /// Index a transformer/predicate table by a produced value.
    fn table_lookup(
        &self,
        table: &Shared<Table>,
        produced: &Value,
        line: Line,
    ) -> Exec<Value> {
        let Some(key) = TableKey::from_value(produced) else {
            let code = render_code(self.ast, produced);
            return Err(errors::invalid_key(line, &code).into());
        };
        match table.borrow().get(&key) {
            Some(value) => Ok(value),
            None => {
                let code = render_code(self.ast, produced);
                Err(errors::missing_key(line, &code).into())
            }
        }
    }

    // ----- combinator nodes -----

    /// `producer => transformer` and `producer | predicate` construct lazy
    /// generators over copies of both operands.
    pub(super) fn eval_combinator(
        &mut self,
        id: NodeId,
        producer: NodeId,
        right: NodeId,
        env: &Environment,
        combinator: Combinator,
    ) -> Exec<()> {
        self.eval(producer, env)?;
        self.eval_marked(right, env)?;
        let (Some(producer_value), Some(right_value)) =
            (self.value(producer), self.value(right))
        else {
            return Ok(());
        };
        let symbol = match combinator {
            Combinator::Transform => "=>",
            Combinator::Filter => "|",
        };
        let Value::Generator(gen) = &producer_value else {
            return Err(self.combinator_mismatch(id, symbol, &producer_value, producer, &right_value, right));
        };
        if !matches!(
            right_value,
            Value::Function(_) | Value::Generator(_) | Value::Table(_)
        ) {
            return Err(self.combinator_mismatch(id, symbol, &producer_value, producer, &right_value, right));
        }
        let source = match combinator {
            Combinator::Transform => GenSource::Transform {
                producer: copy_generator(gen),
                transformer: copy_value(&right_value),
            },
            Combinator::Filter => GenSource::Filter {
                producer: copy_generator(gen),
                predicate: copy_value(&right_value),
            },
        };
        let value = Value::Generator(Shared::new(GeneratorValue::new(source, Shared::default())));
        self.set_slot(id, value);
        Ok(())
    }

    /// `producer <?= detector`: drain the named generator in place until
    /// the detector accepts a produced value.
    pub(super) fn eval_detect(
        &mut self,
        id: NodeId,
        producer: NodeId,
        detector: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(producer, env)?;
        self.eval_marked(detector, env)?;
        let (Some(producer_value), Some(detector_value)) =
            (self.value(producer), self.value(detector))
        else {
            return Ok(());
        };
        let line = self.ast.line(id);
        let Value::Generator(gen) = &producer_value else {
            return Err(self.combinator_mismatch(id, "<?=", &producer_value, producer, &detector_value, detector));
        };
        if !matches!(detector_value, Value::Function(_) | Value::Generator(_)) {
            return Err(self.combinator_mismatch(id, "<?=", &producer_value, producer, &detector_value, detector));
        }
        let gen_env = env.child(init_generator(gen, None));
        let mut count: usize = 0;
        loop {
            gen_env.sys_set(SysKey::LoopIndex, loop_counter(count));
            if count > MAX_LOOP_COUNT {
                return Err(errors::possible_infinite_loop(line).into());
            }
            let produced = match self.call_generator(gen, &gen_env, line) {
                Ok(value) => value,
                Err(Signal::Stop) => {
                    self.set_slot(id, Value::Nothing);
                    return Ok(());
                }
                Err(other) => return Err(other),
            };
            let args = make_args(&produced);
            let index = i64::try_from(count).unwrap_or(i64::MAX);
            // A stop raised by the detector itself is not caught here.
            if let Some(verdict) =
                self.invoke_callable(&detector_value, &args, env, Some(index), line)?
            {
                if verdict.truthy() {
                    self.set_slot(id, produced);
                    return Ok(());
                }
            }
            count += 1;
        }
    }

    /// `producer >> reducer`: drain the producer, feeding each value to a
    /// stateful reducer generator; the last returned value is the result.
    pub(super) fn eval_reduce(
        &mut self,
        id: NodeId,
        producer: NodeId,
        reducer: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(producer, env)?;
        self.eval_marked(reducer, env)?;
        let (Some(producer_value), Some(reducer_value)) =
            (self.value(producer), self.value(reducer))
        else {
            return Ok(());
        };
        let line = self.ast.line(id);
        let (Value::Generator(gen), Value::Generator(_)) = (&producer_value, &reducer_value)
        else {
            return Err(self.combinator_mismatch(id, ">>", &producer_value, producer, &reducer_value, reducer));
        };
        if gen.borrow().exhausted {
            return Err(Signal::Stop);
        }
        let mut reduced = Value::Nothing;
        let mut count: usize = 0;
        loop {
            count += 1;
            if count > MAX_LOOP_COUNT {
                return Err(errors::possible_infinite_loop(line).into());
            }
            let produced = match self.pull_producer(gen, env, line) {
                Ok(value) => value,
                Err(Signal::Stop) => {
                    gen.borrow_mut().exhausted = true;
                    self.set_slot(id, reduced);
                    return Ok(());
                }
                Err(other) => return Err(other),
            };
            let args = make_args(&produced);
            match self.invoke_callable(&reducer_value, &args, env, None, line) {
                Ok(Some(value)) => reduced = value,
                // A reducer pass without a result leaves the accumulator.
                Ok(None) | Err(Signal::Stop) => {}
                Err(other) => return Err(other),
            }
        }
    }

    /// `target << initializer`: rebuild the target over a fresh copy of
    /// the initializer table.
    pub(super) fn eval_reload(
        &mut self,
        id: NodeId,
        target: NodeId,
        initializer: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval_marked(target, env)?;
        self.eval(initializer, env)?;
        let (Some(target_value), Some(init_value)) =
            (self.value(target), self.value(initializer))
        else {
            return Ok(());
        };
        let Value::Table(init_table) = &init_value else {
            return Err(self.combinator_mismatch(id, "<<", &target_value, target, &init_value, initializer));
        };
        let fresh_init = || Shared::new(init_table.borrow().clone());
        let reloaded = match &target_value {
            Value::Table(table) => {
                let merged = table.borrow().reload_merged(&init_table.borrow());
                Value::Table(Shared::new(merged))
            }
            Value::Function(f) => {
                let source = match &*f.borrow() {
                    FunctionValue::User { body } => GenSource::Body(Rc::clone(body)),
                    FunctionValue::Builtin(crate::value::BuiltinFn::Range) => GenSource::Range,
                    // The other builtins reload into an empty-bodied
                    // generator that immediately exhausts.
                    FunctionValue::Builtin(_) => GenSource::Body(Rc::new(Vec::new())),
                };
                Value::Generator(Shared::new(GeneratorValue::new(source, fresh_init())))
            }
            Value::Generator(gen) => {
                let source = match &gen.borrow().source {
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
                    GenSource::TableIter { .. } => GenSource::TableIter {
                        keys: init_table.borrow().keys().to_vec(),
                        seq_cursor: 0,
                        key_cursor: 0,
                    },
                };
                Value::Generator(Shared::new(GeneratorValue::new(source, fresh_init())))
            }
            _ => {
                return Err(self.combinator_mismatch(id, "<<", &target_value, target, &init_value, initializer));
            }
        };
        self.set_slot(id, reloaded);
        Ok(())
    }

    fn combinator_mismatch(
        &self,
        id: NodeId,
        symbol: &str,
        left: &Value,
        lhs: NodeId,
        right: &Value,
        rhs: NodeId,
    ) -> Signal {
        errors::binary_mismatch(
            self.ast.line(id),
            symbol,
            left.type_name(),
            &self.code(lhs),
            right.type_name(),
            &self.code(rhs),
        )
        .into()
    }
}

/// Number sequence: produce the `[start, end]` lower bound and advance it.
fn step_range(gen: &Shared<GeneratorValue>, line: Line) -> Exec<Value> {
    if gen.borrow().exhausted {
        return Err(Signal::Stop);
    }
    let init = gen.borrow().initializer.clone();
    let start = init
        .borrow()
        .get(&TableKey::Int(0))
        .ok_or_else(|| Signal::from(errors::missing_key(line, "0")))?;
    let end = init
        .borrow()
        .get(&TableKey::Int(1))
        .ok_or_else(|| Signal::from(errors::missing_key(line, "1")))?;
    let (Value::Number(from), Value::Number(to)) = (&start, &end) else {
        return Err(errors::range_bounds_not_numbers(line).into());
    };
    if from.as_f64() > to.as_f64() {
        gen.borrow_mut().exhausted = true;
        return Err(Signal::Stop);
    }
    let next = match from {
        Num::Int(n) => Num::Int(
            n.checked_add(1)
                .ok_or_else(|| Signal::from(errors::integer_overflow(line)))?,
        ),
        Num::Float(f) => Num::Float(f + 1.0),
    };
    init.borrow_mut().set(TableKey::Int(0), Value::Number(next));
    Ok(start)
}

/// Table iteration: sequence slots first as `[index, value]` pairs, then
/// the construction-time snapshot of mapping keys as `[key, value]` pairs.
fn step_table_iter(gen: &Shared<GeneratorValue>) -> Exec<Value> {
    let mut guard = gen.borrow_mut();
    if guard.exhausted {
        return Err(Signal::Stop);
    }
    let g = &mut *guard;
    let GenSource::TableIter {
        keys,
        seq_cursor,
        key_cursor,
    } = &mut g.source
    else {
        g.exhausted = true;
        return Err(Signal::Stop);
    };
    let table = g.initializer.borrow();
    if *seq_cursor < table.seq_len() {
        let i = *seq_cursor;
        *seq_cursor += 1;
        let key = Value::Number(Num::Int(i64::try_from(i).unwrap_or(i64::MAX)));
        return Ok(pair(key, table.seq()[i].clone()));
    }
    while *key_cursor < keys.len() {
        let key = keys[*key_cursor].clone();
        *key_cursor += 1;
        if let Some(value) = table.get(&key) {
            return Ok(pair(key.to_value(), value));
        }
    }
    drop(table);
    g.exhausted = true;
    Err(Signal::Stop)
}

fn pair(key: Value, value: Value) -> Value {
    let mut table = Table::new();
    table.push(key);
    table.push(value);
    Value::Table(Shared::new(table))
}
