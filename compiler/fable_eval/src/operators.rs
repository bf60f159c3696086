//! Operator implementations over runtime values.
//!
//! Each operator accepts a fixed set of operand type patterns; anything
//! else is a type mismatch the interpreter reports with the operand source
//! text. Integer arithmetic is checked, division always produces a float,
//! and modulo follows the sign of the divisor.

use std::rc::Rc;

use fable_ir::{render_float, BinaryOp, UnaryOp};

use crate::shared::Shared;
use crate::value::{FunctionValue, GenSource, GeneratorValue, Num, Value};

/// Operator failure, mapped to a diagnostic by the interpreter, which knows
/// the operand source positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpError {
    TypeMismatch,
    DivisionByZero,
    IntegerOverflow,
}

pub(crate) fn evaluate_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, OpError> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => arithmetic(lhs, rhs, sub_nums),
        BinaryOp::Mul => mul(lhs, rhs),
        BinaryOp::Div => arithmetic(lhs, rhs, div_nums),
        BinaryOp::Mod => arithmetic(lhs, rhs, mod_nums),
        BinaryOp::Pow => arithmetic(lhs, rhs, pow_nums),
        BinaryOp::Lt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Less),
        BinaryOp::LtEq => compare(lhs, rhs, |o| o != std::cmp::Ordering::Greater),
        BinaryOp::Gt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Greater),
        BinaryOp::GtEq => compare(lhs, rhs, |o| o != std::cmp::Ordering::Less),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(lhs, rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(lhs, rhs))),
        BinaryOp::And => Ok(Value::Bool(lhs.truthy() && rhs.truthy())),
        BinaryOp::Or => Ok(Value::Bool(lhs.truthy() || rhs.truthy())),
        BinaryOp::Xor => Ok(Value::Bool(lhs.truthy() ^ rhs.truthy())),
    }
}

pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> Result<Value, OpError> {
    match op {
        UnaryOp::Neg => match operand {
            Value::Number(Num::Int(n)) => n
                .checked_neg()
                .map(|v| Value::Number(Num::Int(v)))
                .ok_or(OpError::IntegerOverflow),
            Value::Number(Num::Float(f)) => Ok(Value::Number(Num::Float(-f))),
            _ => Err(OpError::TypeMismatch),
        },
        UnaryOp::Not => match operand {
            Value::Bool(_) | Value::Number(_) => Ok(Value::Bool(!operand.truthy())),
            _ => Err(OpError::TypeMismatch),
        },
        UnaryOp::Truth => match operand {
            Value::Always => Err(OpError::TypeMismatch),
            _ => Ok(Value::Bool(operand.truthy())),
        },
        UnaryOp::Len => value_length(operand)
            .map(|n| Value::Number(Num::Int(n)))
            .ok_or(OpError::TypeMismatch),
    }
}

/// Equality: finals structurally, reference values by identity.
pub(crate) fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Nothing, Value::Nothing) | (Value::Always, Value::Always) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => nums_equal(*a, *b),
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Function(a), Value::Function(b)) => Shared::ptr_eq(a, b),
        (Value::Generator(a), Value::Generator(b)) => Shared::ptr_eq(a, b),
        (Value::Table(a), Value::Table(b)) => Shared::ptr_eq(a, b),
        _ => false,
    }
}

fn nums_equal(a: Num, b: Num) -> bool {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value, OpError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => add_nums(*a, *b),
        _ => concat(lhs, rhs),
    }
}

/// Concatenation: both sides must be finals and at least one must be text.
fn concat(lhs: &Value, rhs: &Value) -> Result<Value, OpError> {
    let text_involved = matches!(lhs, Value::Text(_)) || matches!(rhs, Value::Text(_));
    if !text_involved {
        return Err(OpError::TypeMismatch);
    }
    let (Some(left), Some(right)) = (final_display(lhs), final_display(rhs)) else {
        return Err(OpError::TypeMismatch);
    };
    Ok(Value::Text(Rc::from(format!("{left}{right}"))))
}

fn final_display(value: &Value) -> Option<String> {
    match value {
        Value::Nothing => Some("nothing".to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::Number(Num::Int(n)) => Some(n.to_string()),
        Value::Number(Num::Float(f)) => Some(render_float(*f)),
        Value::Text(s) => Some(s.to_string()),
        _ => None,
    }
}

fn mul(lhs: &Value, rhs: &Value) -> Result<Value, OpError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => mul_nums(*a, *b),
        (Value::Number(Num::Int(n)), Value::Text(s))
        | (Value::Text(s), Value::Number(Num::Int(n))) => Ok(repeat_text(s, *n)),
        _ => Err(OpError::TypeMismatch),
    }
}

fn repeat_text(s: &Rc<str>, count: i64) -> Value {
    let count = usize::try_from(count).unwrap_or(0);
    Value::Text(Rc::from(s.repeat(count)))
}

fn arithmetic(
    lhs: &Value,
    rhs: &Value,
    f: fn(Num, Num) -> Result<Value, OpError>,
) -> Result<Value, OpError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => f(*a, *b),
        _ => Err(OpError::TypeMismatch),
    }
}

fn compare(
    lhs: &Value,
    rhs: &Value,
    accept: fn(std::cmp::Ordering) -> bool,
) -> Result<Value, OpError> {
    let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
        return Err(OpError::TypeMismatch);
    };
    let ordering = match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.cmp(y),
        _ => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Greater),
    };
    Ok(Value::Bool(accept(ordering)))
}

fn int_value(n: i64) -> Value {
    Value::Number(Num::Int(n))
}

fn float_value(f: f64) -> Value {
    Value::Number(Num::Float(f))
}

fn add_nums(a: Num, b: Num) -> Result<Value, OpError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x
            .checked_add(y)
            .map(int_value)
            .ok_or(OpError::IntegerOverflow),
        _ => Ok(float_value(a.as_f64() + b.as_f64())),
    }
}

fn sub_nums(a: Num, b: Num) -> Result<Value, OpError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x
            .checked_sub(y)
            .map(int_value)
            .ok_or(OpError::IntegerOverflow),
        _ => Ok(float_value(a.as_f64() - b.as_f64())),
    }
}

fn mul_nums(a: Num, b: Num) -> Result<Value, OpError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x
            .checked_mul(y)
            .map(int_value)
            .ok_or(OpError::IntegerOverflow),
        _ => Ok(float_value(a.as_f64() * b.as_f64())),
    }
}

/// Division always produces a float; a zero divisor of either flavor fails.
fn div_nums(a: Num, b: Num) -> Result<Value, OpError> {
    if b.as_f64() == 0.0 {
        return Err(OpError::DivisionByZero);
    }
    Ok(float_value(a.as_f64() / b.as_f64()))
}

/// Modulo with the result taking the divisor's sign.
fn mod_nums(a: Num, b: Num) -> Result<Value, OpError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            if y == 0 {
                return Err(OpError::DivisionByZero);
            }
            let r = x.checked_rem(y).ok_or(OpError::IntegerOverflow)?;
            if r != 0 && (r < 0) != (y < 0) {
                Ok(int_value(r + y))
            } else {
                Ok(int_value(r))
            }
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            if y == 0.0 {
                return Err(OpError::DivisionByZero);
            }
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                Ok(float_value(r + y))
            } else {
                Ok(float_value(r))
            }
        }
    }
}

fn pow_nums(a: Num, b: Num) -> Result<Value, OpError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) if y >= 0 => {
            let exp = u32::try_from(y).map_err(|_| OpError::IntegerOverflow)?;
            x.checked_pow(exp)
                .map(int_value)
                .ok_or(OpError::IntegerOverflow)
        }
        _ => Ok(float_value(a.as_f64().powf(b.as_f64()))),
    }
}

/// The `#` length of a value, `None` where length is not defined.
///
/// Combinator generators report the producer length plus the transformer
/// length; the built-in sources have no statements and report zero.
fn value_length(value: &Value) -> Option<i64> {
    match value {
        Value::Function(f) => match &*f.borrow() {
            FunctionValue::User { body } => Some(to_len(body.len())),
            FunctionValue::Builtin(_) => Some(1),
        },
        Value::Generator(g) => generator_length(g),
        Value::Table(t) => Some(to_len(t.borrow().len())),
        _ => None,
    }
}

fn generator_length(gen: &Shared<GeneratorValue>) -> Option<i64> {
    match &gen.borrow().source {
        GenSource::Body(body) => Some(to_len(body.len())),
        GenSource::Transform {
            producer,
            transformer,
        } => Some(generator_length(producer)? + value_length(transformer)?),
        GenSource::Filter {
            producer,
            predicate,
        } => Some(generator_length(producer)? + value_length(predicate)?),
        GenSource::Range | GenSource::TableIter { .. } => Some(0),
    }
}

fn to_len(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
