//! Diagnostic constructors for runtime failures.
//!
//! Messages name the offending operand by its rendered source code, the
//! same text the pretty-printer produces, so a report reads in the user's
//! own notation.

use fable_diagnostic::{Diagnostic, ErrorKind};
use fable_ir::Line;

pub(crate) fn undefined_reference(line: Line, name: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::UndefinedReference,
        line,
        format!("undefined variable: {name}"),
    )
}

pub(crate) fn index_outside_loop(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::UndefinedReference,
        line,
        "index used outside a loop".to_string(),
    )
}

pub(crate) fn binary_mismatch(
    line: Line,
    op: &str,
    lhs_type: &str,
    lhs_code: &str,
    rhs_type: &str,
    rhs_code: &str,
) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::OperatorTypeMismatch,
        line,
        format!("cannot apply {op} to ({lhs_type}: {lhs_code}, {rhs_type}: {rhs_code})"),
    )
}

pub(crate) fn unary_mismatch(line: Line, op: &str, type_name: &str, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::OperatorTypeMismatch,
        line,
        format!("cannot apply {op} to ({type_name}: {code})"),
    )
}

pub(crate) fn not_indexable(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::NotIndexable,
        line,
        format!("{code} is not a table"),
    )
}

pub(crate) fn missing_key(line: Line, key_code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::MissingKey,
        line,
        format!("{key_code} is not defined"),
    )
}

pub(crate) fn missing_always(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::MissingKey,
        line,
        "always is not defined".to_string(),
    )
}

pub(crate) fn invalid_key(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidKey,
        line,
        format!("{code} cannot be used as a key"),
    )
}

pub(crate) fn invalid_arg_key(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidKey,
        line,
        format!("{code} is not a number or text"),
    )
}

pub(crate) fn invalid_assignment_target(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidAssignmentTarget,
        line,
        format!("cannot assign to {code}"),
    )
}

pub(crate) fn not_callable(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(ErrorKind::NotCallable, line, format!("{code} is not callable"))
}

pub(crate) fn missing_result(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::MissingResult,
        line,
        format!("{code} did not return a value"),
    )
}

pub(crate) fn splice_table_outside_literal(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidSplice,
        line,
        "cannot splice a table outside a table literal".to_string(),
    )
}

pub(crate) fn splice_needs_generator(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidSplice,
        line,
        "only a generator can be spliced into a table literal".to_string(),
    )
}

pub(crate) fn splice_needs_function(line: Line, code: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::InvalidSplice,
        line,
        format!("{code} cannot be spliced into a function body"),
    )
}

pub(crate) fn division_by_zero(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::DivisionByZero,
        line,
        "division by zero".to_string(),
    )
}

pub(crate) fn integer_overflow(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::IntegerOverflow,
        line,
        "integer overflow".to_string(),
    )
}

pub(crate) fn possible_infinite_loop(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::PossibleInfiniteLoop,
        line,
        "possible infinite loop".to_string(),
    )
}

pub(crate) fn illegal_recursion(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::IllegalRecursion,
        line,
        "a generator cannot invoke itself".to_string(),
    )
}

pub(crate) fn range_bounds_not_numbers(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::OperatorTypeMismatch,
        line,
        "range bounds must be numbers".to_string(),
    )
}

pub(crate) fn iter_needs_a_table(line: Line) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::OperatorTypeMismatch,
        line,
        "iter requires a table argument".to_string(),
    )
}
