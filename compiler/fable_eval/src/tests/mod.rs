#![allow(clippy::unwrap_used)]

mod call_tests;
mod generator_tests;
mod operator_tests;
mod table_tests;

use crate::{root_environment, Interpreter, Signal};

/// Lex, parse, and run a program, collecting printed lines followed by an
/// error line if evaluation failed.
fn run_program(source: &str) -> Vec<String> {
    let tokens = fable_lexer::tokenize(source).unwrap();
    let mut ast = fable_ir::Ast::new();
    let statements = fable_parse::parse_program(&tokens, &mut ast).unwrap();
    let env = root_environment();
    let mut interpreter = Interpreter::new(&mut ast);
    let result = interpreter.run(&statements, &env);
    let mut report = interpreter.take_output();
    match result {
        Ok(()) => {}
        Err(Signal::Fail(diagnostic)) => report.push(diagnostic.to_string()),
        Err(Signal::Return(_) | Signal::Stop) => {
            report.push("return or stop used outside a function".to_string());
        }
    }
    report
}

/// The last report line, for error assertions.
fn last_line(source: &str) -> String {
    run_program(source).pop().unwrap_or_default()
}
