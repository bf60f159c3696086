use pretty_assertions::assert_eq;

use super::{last_line, run_program};

#[test]
fn arithmetic_precedence() {
    assert_eq!(run_program("[1 + 2 * 3] -> print;"), ["7"]);
}

#[test]
fn division_always_produces_a_float() {
    assert_eq!(run_program("[4 / 2, 3 / 2] -> print;"), ["2.0 1.5"]);
}

#[test]
fn division_by_zero_fails() {
    assert!(last_line("[1 / 0] -> print;").contains("division by zero"));
    assert!(last_line("[1 % 0] -> print;").contains("division by zero"));
}

#[test]
fn modulo_takes_the_divisor_sign() {
    assert_eq!(
        run_program("[-7 % 3, 7 % -3, -7 % -3] -> print;"),
        ["2 -2 -1"]
    );
}

#[test]
fn integer_power_stays_integral() {
    assert_eq!(run_program("[2 ^ 10] -> print;"), ["1024"]);
}

#[test]
fn negative_exponent_goes_through_floats() {
    assert_eq!(run_program("[2 ^ -1] -> print;"), ["0.5"]);
}

#[test]
fn integer_overflow_is_an_error() {
    let line = last_line("[9223372036854775807 + 1] -> print;");
    assert!(line.contains("integer overflow"), "{line}");
}

#[test]
fn concatenation_renders_finals_in_display_form() {
    assert_eq!(
        run_program("[\"n=\" + 1, \"b=\" + yes, 1.5 + \"!\"] -> print;"),
        ["\"n=1\" \"b=yes\" \"1.5!\""]
    );
}

#[test]
fn text_repetition_requires_an_integer() {
    assert_eq!(run_program("[\"ab\" * 3] -> print;"), ["\"ababab\""]);
    let line = last_line("[\"ab\" * 1.5] -> print;");
    assert!(line.contains("cannot apply *"), "{line}");
}

#[test]
fn mismatched_operands_name_their_source() {
    let line = last_line("[yes + 1] -> print;");
    assert!(line.contains("cannot apply + to (bool: yes, number: 1)"), "{line}");
}

#[test]
fn equality_is_identity_for_tables() {
    assert_eq!(
        run_program("t = []; u = []; [t == u, t == t, t != u] -> print;"),
        ["no yes yes"]
    );
}

#[test]
fn numeric_equality_crosses_int_and_float() {
    assert_eq!(run_program("[1 == 1.0, 1 == 2] -> print;"), ["yes no"]);
}

#[test]
fn logic_operators_use_truthiness() {
    assert_eq!(
        run_program("[1 and \"x\", 0 or nothing, yes xor yes] -> print;"),
        ["yes no no"]
    );
}

#[test]
fn truth_test_operator() {
    assert_eq!(
        run_program("[?0, ?1, ?\"\", ?\"x\", ?nothing] -> print;"),
        ["no yes no yes no"]
    );
}

#[test]
fn not_accepts_booleans_and_numbers_only() {
    assert_eq!(run_program("[!yes, !0] -> print;"), ["no yes"]);
    let line = last_line("[!\"text\"] -> print;");
    assert!(line.contains("cannot apply !"), "{line}");
}

#[test]
fn length_of_tables_and_functions() {
    assert_eq!(
        run_program("f = { <- 1; }; [#[1, 2, \"k\": 3], #f, #print] -> print;"),
        ["3 1 1"]
    );
}

#[test]
fn length_is_undefined_for_text() {
    let line = last_line("[#\"abc\"] -> print;");
    assert!(line.contains("cannot apply #"), "{line}");
}

#[test]
fn comparisons_work_across_numeric_flavors() {
    assert_eq!(
        run_program("[1 < 1.5, 2 <= 2, 3 > 4, 2.5 >= 2.5] -> print;"),
        ["yes yes no yes"]
    );
}
