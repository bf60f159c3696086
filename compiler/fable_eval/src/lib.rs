//! The Fable runtime: values, environments, and the tree-walking
//! evaluator.
//!
//! The host drives it in three steps: build an [`Ast`](fable_ir::Ast) with
//! the parser, create an [`Interpreter`] over it, and [`Interpreter::run`]
//! the top-level statements against an environment seeded by
//! [`root_environment`]. Output produced by `print` accumulates on the
//! interpreter and is drained with [`Interpreter::take_output`].

mod context;
mod control;
mod environment;
mod errors;
mod format;
mod interpreter;
mod operators;
mod shared;
mod stack;
mod table;
mod value;

#[cfg(test)]
mod tests;

pub use control::{Exec, Signal, MAX_LOOP_COUNT};
pub use environment::{Environment, SysKey};
pub use format::render_code;
pub use interpreter::{root_environment, Interpreter};
pub use shared::Shared;
pub use table::{Table, TableKey};
pub use value::{
    copy_value, BuiltinFn, FunctionValue, GenSource, GeneratorValue, Num, Value,
};
