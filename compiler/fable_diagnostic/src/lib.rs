//! Diagnostics for the Fable runtime.
//!
//! Every failure surfaced to the host is a [`Diagnostic`]: an error kind, the
//! source line, and a message that quotes offending operands in their code
//! form. The host report format is a single line per diagnostic,
//! `line: N, error: message`.

use std::fmt;

use fable_ir::Line;

/// The closed error taxonomy.
///
/// Kinds classify failures for programmatic matching (tests, tooling); the
/// rendered report only shows the line and message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character or invalid escape sequence.
    Lex,
    /// Unexpected token, missing token, or grammar-context violation.
    Syntax,
    /// Name or positional lookup failed with no active promotion marker.
    UndefinedReference,
    /// Operand types matched no pattern of the operator's dispatch table.
    OperatorTypeMismatch,
    /// Subscript on a value without indexed access.
    NotIndexable,
    /// Key resolved to nothing and the table has no default.
    MissingKey,
    /// A reference value used where a final-value key is required.
    InvalidKey,
    /// Assignment whose left-hand side is neither a name nor a subscript.
    InvalidAssignmentTarget,
    /// Splice of an incompatible value, or outside an aggregate literal.
    InvalidSplice,
    /// Invocation of a value without the function capability.
    NotCallable,
    /// A transformer completed without producing a value.
    MissingResult,
    DivisionByZero,
    IntegerOverflow,
    /// An unbounded engine loop exceeded the iteration cap.
    PossibleInfiniteLoop,
    /// A generator instance was re-entered while already executing.
    IllegalRecursion,
}

/// A reportable error with its source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub line: Line,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, line: Line, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, error: {}", self.line, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_host_report_line() {
        let d = Diagnostic::new(ErrorKind::MissingKey, Line::new(3), "missing key \"a\"");
        assert_eq!(d.to_string(), "line: 3, error: missing key \"a\"");
    }

    #[test]
    fn kinds_compare_by_variant() {
        let a = Diagnostic::new(ErrorKind::Lex, Line::new(1), "x");
        assert_eq!(a.kind, ErrorKind::Lex);
        assert_ne!(a.kind, ErrorKind::Syntax);
    }
}
