//! Host glue for the Fable runtime.
//!
//! A [`Session`] owns the syntax-tree arena and the root environment, so
//! bindings persist across evaluated chunks; [`Session::eval`] turns one
//! chunk of source into a printed [`Report`].

use fable_eval::{root_environment, Environment, Interpreter, Signal};
use fable_ir::Ast;

/// The printed outcome of one evaluated chunk: output lines, followed by
/// one error line when the chunk failed.
pub struct Report {
    pub lines: Vec<String>,
    pub ok: bool,
}

/// One interpreter session. The arena and the root scope live as long as
/// the session, which is what lets a REPL keep its bindings between lines.
pub struct Session {
    ast: Ast,
    env: Environment,
}

impl Session {
    pub fn new() -> Self {
        Session {
            ast: Ast::new(),
            env: root_environment(),
        }
    }

    /// Lex, parse, and evaluate one chunk of source against the session
    /// scope. A failure at any stage ends the chunk; output produced
    /// before the failure is kept.
    pub fn eval(&mut self, source: &str) -> Report {
        let tokens = match fable_lexer::tokenize(source) {
            Ok(tokens) => tokens,
            Err(diagnostic) => {
                return Report {
                    lines: vec![diagnostic.to_string()],
                    ok: false,
                };
            }
        };
        let statements = match fable_parse::parse_program(&tokens, &mut self.ast) {
            Ok(statements) => statements,
            Err(diagnostic) => {
                return Report {
                    lines: vec![diagnostic.to_string()],
                    ok: false,
                };
            }
        };
        tracing::debug!(statements = statements.len(), "evaluating chunk");
        let mut interpreter = Interpreter::new(&mut self.ast);
        let result = interpreter.run(&statements, &self.env);
        let mut lines = interpreter.take_output();
        let ok = match result {
            Ok(()) => true,
            Err(Signal::Fail(diagnostic)) => {
                lines.push(diagnostic.to_string());
                false
            }
            Err(Signal::Return(_) | Signal::Stop) => {
                lines.push("return or stop used outside a function".to_string());
                false
            }
        };
        Report { lines, ok }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
