use pretty_assertions::assert_eq;

use super::{last_line, run_program};

#[test]
fn positional_and_named_arguments() {
    assert_eq!(
        run_program("f = { <- @0 + @1; }; [[1, 2] -> f] -> print;"),
        ["3"]
    );
    assert_eq!(
        run_program("f = { <- @\"a\" + @\"b\"; }; [[\"a\": 1, \"b\": 2] -> f] -> print;"),
        ["3"]
    );
}

#[test]
fn a_single_value_argument_binds_as_slot_zero_and_key_one() {
    assert_eq!(
        run_program("f = { <- @0 + @1; }; [5 -> f] -> print;"),
        ["10"]
    );
}

#[test]
fn completing_without_a_return_yields_nothing() {
    assert_eq!(run_program("f = { x = 1; }; [[] -> f] -> print;"), ["nothing"]);
}

#[test]
fn a_fun_literal_can_be_called_in_place() {
    assert_eq!(run_program("[[3] -> { <- @0 * 2; }] -> print;"), ["6"]);
}

#[test]
fn bodies_see_the_caller_scope_chain() {
    assert_eq!(
        run_program("f = { y = 1; g = { <- y; }; <- [] -> g; }; [[] -> f] -> print;"),
        ["1"]
    );
}

#[test]
fn call_blocks_assign_into_the_caller_scope() {
    assert_eq!(
        run_program("setup = { x = 42; }; -> setup; [x] -> print;"),
        ["42"]
    );
}

#[test]
fn a_call_block_over_a_generator_returns_its_value() {
    assert_eq!(
        run_program("g = { <- 7; } << []; f = { -> g; <- 99; }; [[] -> f] -> print;"),
        ["7"]
    );
}

#[test]
fn a_top_level_generator_call_block_escapes() {
    assert_eq!(
        run_program("g = { <- 7; } << []; -> g;"),
        ["return or stop used outside a function"]
    );
}

#[test]
fn calling_a_final_fails() {
    let line = last_line("[1] -> 2;");
    assert!(line.contains("2 is not callable"), "{line}");
}

#[test]
fn stop_reads_its_condition_from_the_scope_chain() {
    // With no explicit condition, `stop` falls back to argument 0 of the
    // enclosing call.
    assert_eq!(
        run_program("g = { [] -> stop; <- 1; }; [[0] -> g] -> print;"),
        ["1"]
    );
    assert_eq!(
        run_program("g = { [] -> stop; <- 1; }; [[yes] -> g] -> print;"),
        ["return or stop used outside a function"]
    );
}

#[test]
fn an_explicit_stop_condition_wins() {
    assert_eq!(
        run_program("f = { [1 > 2] -> stop; <- 5; }; [[] -> f] -> print;"),
        ["5"]
    );
    assert_eq!(
        run_program("f = { [1 < 2] -> stop; <- 5; }; [[] -> f] -> print;"),
        ["return or stop used outside a function"]
    );
}

#[test]
fn splicing_a_function_inlines_its_statements() {
    assert_eq!(
        run_program("g = { <- 1; <- 2; }; f = { ..g; <- 3; }; [#f] -> print;"),
        ["3"]
    );
}

#[test]
fn splicing_a_table_into_a_body_fails() {
    let line = last_line("f = { ..[1]; };");
    assert!(
        line.contains("cannot splice a table outside a table literal"),
        "{line}"
    );
}

#[test]
fn splicing_a_final_into_a_body_fails() {
    let line = last_line("f = { ..5; };");
    assert!(line.contains("cannot be spliced into a function body"), "{line}");
}
