//! Groups, operators, subscripts, assignment, and return.

use fable_diagnostic::Diagnostic;
use fable_ir::{BinaryOp, NodeId, NodeKind, UnaryOp};

use crate::control::{Exec, Signal};
use crate::environment::Environment;
use crate::errors;
use crate::operators::{evaluate_binary, evaluate_unary, OpError};
use crate::table::TableKey;
use crate::value::Value;

use super::Interpreter;

impl Interpreter<'_> {
    pub(super) fn eval_group(&mut self, id: NodeId, inner: NodeId, env: &Environment) -> Exec<()> {
        self.eval(inner, env)?;
        if let Some(value) = self.value(inner) {
            self.set_slot(id, value);
        }
        Ok(())
    }

    pub(super) fn eval_unary(
        &mut self,
        id: NodeId,
        op: UnaryOp,
        operand: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(operand, env)?;
        let Some(value) = self.value(operand) else {
            return Ok(());
        };
        match evaluate_unary(op, &value) {
            Ok(result) => {
                self.set_slot(id, result);
                Ok(())
            }
            Err(error) => {
                Err(self.unary_op_error(error, id, op.symbol(), &value, operand).into())
            }
        }
    }

    pub(super) fn eval_binary(
        &mut self,
        id: NodeId,
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(lhs, env)?;
        self.eval(rhs, env)?;
        let (Some(left), Some(right)) = (self.value(lhs), self.value(rhs)) else {
            return Ok(());
        };
        match evaluate_binary(op, &left, &right) {
            Ok(result) => {
                self.set_slot(id, result);
                Ok(())
            }
            Err(error) => Err(self
                .binary_op_error(error, id, op.symbol(), &left, lhs, &right, rhs)
                .into()),
        }
    }

    fn unary_op_error(
        &self,
        error: OpError,
        id: NodeId,
        symbol: &str,
        value: &Value,
        operand: NodeId,
    ) -> Diagnostic {
        let line = self.ast.line(id);
        match error {
            OpError::TypeMismatch => {
                errors::unary_mismatch(line, symbol, value.type_name(), &self.code(operand))
            }
            OpError::DivisionByZero => errors::division_by_zero(line),
            OpError::IntegerOverflow => errors::integer_overflow(line),
        }
    }

    pub(super) fn binary_op_error(
        &self,
        error: OpError,
        id: NodeId,
        symbol: &str,
        left: &Value,
        lhs: NodeId,
        right: &Value,
        rhs: NodeId,
    ) -> Diagnostic {
        let line = self.ast.line(id);
        match error {
            OpError::TypeMismatch => errors::binary_mismatch(
                line,
                symbol,
                left.type_name(),
                &self.code(lhs),
                right.type_name(),
                &self.code(rhs),
            ),
            OpError::DivisionByZero => errors::division_by_zero(line),
            OpError::IntegerOverflow => errors::integer_overflow(line),
        }
    }

    pub(super) fn eval_subscript(
        &mut self,
        id: NodeId,
        target: NodeId,
        key: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(target, env)?;
        self.eval(key, env)?;
        let (Some(target_value), Some(key_value)) = (self.value(target), self.value(key)) else {
            return Ok(());
        };
        let line = self.ast.line(id);
        let Value::Table(table) = &target_value else {
            return Err(errors::not_indexable(line, &self.code(target)).into());
        };
        if matches!(key_value, Value::Always) {
            let Some(default) = table.borrow().default_value().cloned() else {
                return Err(errors::missing_always(line).into());
            };
            self.set_slot(id, default);
            return Ok(());
        }
        let Some(table_key) = TableKey::from_value(&key_value) else {
            return Err(errors::invalid_key(line, &self.code(key)).into());
        };
        let Some(value) = table.borrow().get(&table_key) else {
            return Err(errors::missing_key(line, &self.code(key)).into());
        };
        self.set_slot(id, value);
        Ok(())
    }

    pub(super) fn eval_assign(
        &mut self,
        id: NodeId,
        target: NodeId,
        value: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        let mut t = target;
        while let NodeKind::Group(inner) = self.ast.kind(t) {
            t = *inner;
        }
        match self.ast.kind(t).clone() {
            NodeKind::Name(name) => {
                self.eval_marked(value, env)?;
                let Some(v) = self.value(value) else {
                    return Ok(());
                };
                env.set(TableKey::Text(name.as_str().into()), v.clone());
                self.set_slot(id, v);
                Ok(())
            }
            NodeKind::Subscript {
                target: table_node,
                key,
            } => self.eval_indexed_write(id, table_node, key, value, env),
            _ => {
                Err(errors::invalid_assignment_target(self.ast.line(id), &self.code(t)).into())
            }
        }
    }

    fn eval_indexed_write(
        &mut self,
        id: NodeId,
        table_node: NodeId,
        key: NodeId,
        value: NodeId,
        env: &Environment,
    ) -> Exec<()> {
        self.eval(table_node, env)?;
        self.eval(key, env)?;
        self.eval_marked(value, env)?;
        let (Some(target_value), Some(key_value), Some(v)) = (
            self.value(table_node),
            self.value(key),
            self.value(value),
        ) else {
            return Ok(());
        };
        let line = self.ast.line(id);
        let Value::Table(table) = &target_value else {
            return Err(errors::not_indexable(line, &self.code(table_node)).into());
        };
        if matches!(key_value, Value::Always) {
            table.borrow_mut().set_default(v.clone());
        } else {
            let Some(table_key) = TableKey::from_value(&key_value) else {
                return Err(errors::invalid_key(line, &self.code(key)).into());
            };
            table.borrow_mut().set(table_key, v.clone());
        }
        self.set_slot(id, v);
        Ok(())
    }

    /// `<- value;` raises the value out of the enclosing body. An
    /// unresolved operand skips the statement instead of returning.
    pub(super) fn eval_return(&mut self, operand: NodeId, env: &Environment) -> Exec<()> {
        self.eval_marked(operand, env)?;
        match self.value(operand) {
            Some(value) => Err(Signal::Return(value)),
            None => Ok(()),
        }
    }
}
