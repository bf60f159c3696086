//! The tree-walking evaluator.
//!
//! Every node owns a result slot in the interpreter, tagged `Unresolved` or
//! a value. Evaluating a node first clears its own slot; composite nodes
//! evaluate their children and, if any child slot is still unresolved,
//! return silently without setting their own. That protocol is what makes
//! lambda promotion work: a failed name lookup under a live promotion
//! marker sets the *marked* node's slot to a synthesized function and
//! leaves the failing leaf unresolved, so every ancestor up to the marked
//! node skips itself and the promoted value survives.

mod builtins;
mod call;
mod exprs;
mod generators;
mod literals;

pub use builtins::root_environment;

use std::rc::Rc;

use fable_ir::{Ast, NodeId, NodeKind};

use crate::context::{ContextFrame, ContextStack};
use crate::control::Exec;
use crate::environment::Environment;
use crate::errors;
use crate::shared::Shared;
use crate::stack::ensure_sufficient_stack;
use crate::table::TableKey;
use crate::value::{FunctionValue, Num, Value};

/// A node's evaluation result.
#[derive(Clone, Debug, Default)]
enum Slot {
    #[default]
    Unresolved,
    Value(Value),
}

/// Evaluator over one arena. Holds the result slots, the context stack,
/// and the output buffer `print` appends to.
pub struct Interpreter<'a> {
    ast: &'a mut Ast,
    slots: Vec<Slot>,
    ctx: ContextStack,
    out: Vec<String>,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a mut Ast) -> Self {
        Interpreter {
            ast,
            slots: Vec::new(),
            ctx: ContextStack::default(),
            out: Vec::new(),
        }
    }

    /// Evaluate top-level statements in order, stopping at the first
    /// unwinding signal.
    pub fn run(&mut self, statements: &[NodeId], env: &Environment) -> Exec<()> {
        for id in statements {
            self.eval(*id, env)?;
        }
        Ok(())
    }

    /// Drain the lines `print` produced so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.out)
    }

    fn eval(&mut self, id: NodeId, env: &Environment) -> Exec<()> {
        ensure_sufficient_stack(|| self.eval_inner(id, env))
    }

    fn eval_inner(&mut self, id: NodeId, env: &Environment) -> Exec<()> {
        self.clear_slot(id);
        let kind = self.ast.kind(id).clone();
        match kind {
            NodeKind::Nothing => {
                self.set_slot(id, Value::Nothing);
                Ok(())
            }
            NodeKind::Bool(b) => {
                self.set_slot(id, Value::Bool(b));
                Ok(())
            }
            NodeKind::Int(n) => {
                self.set_slot(id, Value::Number(Num::Int(n)));
                Ok(())
            }
            NodeKind::Float(f) => {
                self.set_slot(id, Value::Number(Num::Float(f)));
                Ok(())
            }
            NodeKind::Text(s) => {
                self.set_slot(id, Value::Text(Rc::from(s)));
                Ok(())
            }
            NodeKind::Always => {
                self.set_slot(id, Value::Always);
                Ok(())
            }
            NodeKind::Index => self.eval_index(id, env),
            NodeKind::Name(name) => self.eval_name(id, &name, env),
            NodeKind::Arg(key) => self.eval_arg(id, key, env),
            NodeKind::Group(inner) => self.eval_group(id, inner, env),
            NodeKind::Unary { op, operand } => self.eval_unary(id, op, operand, env),
            NodeKind::Binary { op, lhs, rhs } => self.eval_binary(id, op, lhs, rhs, env),
            NodeKind::Subscript { target, key } => self.eval_subscript(id, target, key, env),
            NodeKind::Assign { target, value } => self.eval_assign(id, target, value, env),
            NodeKind::Return(operand) => self.eval_return(operand, env),
            NodeKind::Call { args, callee } => self.eval_call(id, args, callee, env),
            NodeKind::CallBlock { callee } => self.eval_call_block(id, callee, env),
            NodeKind::Detect { producer, detector } => {
                self.eval_detect(id, producer, detector, env)
            }
            NodeKind::Transform {
                producer,
                transformer,
            } => self.eval_combinator(id, producer, transformer, env, Combinator::Transform),
            NodeKind::Filter {
                producer,
                predicate,
            } => self.eval_combinator(id, producer, predicate, env, Combinator::Filter),
            NodeKind::Reduce { producer, reducer } => {
                self.eval_reduce(id, producer, reducer, env)
            }
            NodeKind::Reload {
                target,
                initializer,
            } => self.eval_reload(id, target, initializer, env),
            NodeKind::TableLit { items } => self.eval_table_lit(id, &items, env),
            NodeKind::FunLit { body } => self.eval_fun_lit(id, &body, env),
            // Item and splice nodes are consumed by the enclosing literal,
            // never dispatched on their own.
            NodeKind::SeqItem(_)
            | NodeKind::MapItem { .. }
            | NodeKind::AlwaysItem(_)
            | NodeKind::Splice(_) => Ok(()),
        }
    }

    // ----- result slots -----

    fn value(&self, id: NodeId) -> Option<Value> {
        match self.slots.get(id.index()) {
            Some(Slot::Value(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_slot(&mut self, id: NodeId, value: Value) {
        self.grow_slots(id);
        self.slots[id.index()] = Slot::Value(value);
    }

    fn clear_slot(&mut self, id: NodeId) {
        self.grow_slots(id);
        self.slots[id.index()] = Slot::Unresolved;
    }

    fn is_unresolved(&self, id: NodeId) -> bool {
        !matches!(self.slots.get(id.index()), Some(Slot::Value(_)))
    }

    fn grow_slots(&mut self, id: NodeId) {
        if id.index() >= self.slots.len() {
            self.slots.resize(id.index() + 1, Slot::Unresolved);
        }
    }

    // ----- lambda promotion -----

    /// Evaluate `id` as a promotion candidate: a failed name lookup below
    /// it turns the whole marked expression into a function value.
    fn eval_marked(&mut self, id: NodeId, env: &Environment) -> Exec<()> {
        self.ctx.push(ContextFrame::LambdaCandidate(id));
        let result = self.eval(id, env);
        self.ctx.pop();
        result
    }

    /// Promote the innermost candidate, if a marker is live. Returns false
    /// when there is no marker and the lookup failure must become an error.
    ///
    /// The promotion happens at most once per candidate evaluation: a
    /// second failing leaf finds the slot already set and leaves it alone.
    fn try_promote(&mut self) -> bool {
        let Some(marked) = self.ctx.innermost_candidate() else {
            return false;
        };
        if self.is_unresolved(marked) {
            let line = self.ast.line(marked);
            let ret = self.ast.alloc(NodeKind::Return(marked), line);
            let body = Rc::new(vec![ret]);
            tracing::trace!(?marked, "promoting expression to a lambda");
            self.set_slot(marked, Value::Function(Shared::new(FunctionValue::User { body })));
        }
        true
    }

    // ----- leaf lookups -----

    fn eval_name(&mut self, id: NodeId, name: &str, env: &Environment) -> Exec<()> {
        if let Some(value) = env.get(&TableKey::Text(Rc::from(name))) {
            self.set_slot(id, value);
            return Ok(());
        }
        if self.try_promote() {
            return Ok(());
        }
        Err(errors::undefined_reference(self.ast.line(id), name).into())
    }

    fn eval_arg(&mut self, id: NodeId, key_id: NodeId, env: &Environment) -> Exec<()> {
        self.eval(key_id, env)?;
        let Some(key_value) = self.value(key_id) else {
            return Ok(());
        };
        if !matches!(key_value, Value::Number(_) | Value::Text(_)) {
            return Err(errors::invalid_arg_key(self.ast.line(id), &self.code(key_id)).into());
        }
        let Some(key) = TableKey::from_value(&key_value) else {
            return Err(errors::invalid_arg_key(self.ast.line(id), &self.code(key_id)).into());
        };
        if let Some(value) = env.get(&key) {
            self.set_slot(id, value);
            return Ok(());
        }
        if self.try_promote() {
            return Ok(());
        }
        let name = format!("@{}", self.code(key_id));
        Err(errors::undefined_reference(self.ast.line(id), &name).into())
    }

    fn eval_index(&mut self, id: NodeId, env: &Environment) -> Exec<()> {
        match env.sys_get(crate::environment::SysKey::LoopIndex) {
            Some(value) => {
                self.set_slot(id, value);
                Ok(())
            }
            None => Err(errors::index_outside_loop(self.ast.line(id)).into()),
        }
    }

    // ----- shared helpers -----

    /// Source text of a node, for error messages.
    fn code(&self, id: NodeId) -> String {
        fable_ir::render(self.ast, id)
    }
}

/// Which lazy combinator a `Transform`-shaped node builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Transform,
    Filter,
}
