//! Control-flow signals.
//!
//! Return and generator-stop are non-local control, not errors; both ride
//! the `Err` channel together with diagnostics so `?` unwinds them to the
//! nearest handler. A handler that does not understand a signal lets it
//! keep unwinding; the host reports a signal that escapes the top level.

use fable_diagnostic::Diagnostic;

use crate::value::Value;

/// Every loop that pulls from a generator is bounded by this count.
pub const MAX_LOOP_COUNT: usize = 900;

/// Non-local control raised during evaluation.
#[derive(Debug)]
pub enum Signal {
    /// `<- value;` raised out of a function or generator body.
    Return(Value),
    /// A generator signalled end-of-sequence.
    Stop,
    /// A diagnostic unwinding to the top level.
    Fail(Diagnostic),
}

/// Evaluation result: `Ok` or an unwinding [`Signal`].
pub type Exec<T = ()> = Result<T, Signal>;

impl From<Diagnostic> for Signal {
    fn from(diagnostic: Diagnostic) -> Self {
        Signal::Fail(diagnostic)
    }
}
