use pretty_assertions::assert_eq;

use super::{last_line, run_program};

#[test]
fn literal_lookup_covers_sequence_mapping_and_default() {
    assert_eq!(
        run_program("t = [1, 2, \"k\": 3, always: 9]; [t[0], t[1], t[\"k\"], t[42], #t] -> print;"),
        ["1 2 3 9 3"]
    );
}

#[test]
fn keyed_items_land_in_the_mapping() {
    // A literal `0:` item does not become sequence slot 0.
    assert_eq!(
        run_program("t = [0: \"zero\"]; [#t, t[0]] -> print;"),
        ["1 \"zero\""]
    );
}

#[test]
fn integral_float_keys_read_the_sequence() {
    assert_eq!(run_program("t = [\"x\"]; [t[0.0]] -> print;"), ["\"x\""]);
}

#[test]
fn out_of_range_writes_go_to_the_mapping() {
    assert_eq!(
        run_program("t = [10, 20]; t[1] = 99; t[5] = 50; [t[1], t[5], #t] -> print;"),
        ["99 50 3"]
    );
}

#[test]
fn always_subscript_reads_and_writes_the_default() {
    assert_eq!(
        run_program("t = [always: 5]; [t[123]] -> print; t[always] = 6; [t[always], t[99]] -> print;"),
        ["5", "6 6"]
    );
}

#[test]
fn always_read_without_a_default_fails() {
    let line = last_line("t = []; [t[always]] -> print;");
    assert!(line.contains("always is not defined"), "{line}");
}

#[test]
fn missing_key_names_the_key() {
    let line = last_line("t = []; [t[\"a\"]] -> print;");
    assert!(line.contains("\"a\" is not defined"), "{line}");
}

#[test]
fn subscripting_a_final_fails() {
    let line = last_line("x = 1; [x[0]] -> print;");
    assert!(line.contains("is not a table"), "{line}");
}

#[test]
fn reference_values_cannot_be_keys() {
    let line = last_line("t = []; u = []; [t[u]] -> print;");
    assert!(line.contains("cannot be used as a key"), "{line}");
}

#[test]
fn reload_merges_and_keeps_the_longer_left_tail() {
    assert_eq!(
        run_program(
            "a = [1, 2, 3, \"x\": 1, always: 7];\n\
             b = a << [9, \"y\": 2];\n\
             [b[0], b[1], b[2], b[\"x\"], b[\"y\"], b[99]] -> print;\n\
             [a[0]] -> print;"
        ),
        ["9 2 3 1 2 7", "1"]
    );
}

#[test]
fn splicing_a_table_merges_it() {
    assert_eq!(
        run_program(
            "a = [1, 2, \"k\": 1, always: 9];\n\
             b = [..a, 3];\n\
             [b[0], b[1], b[2], b[\"k\"], b[\"zzz\"]] -> print;"
        ),
        ["1 2 3 1 9"]
    );
}

#[test]
fn splicing_a_generator_drains_it() {
    assert_eq!(
        run_program(
            "t = [0, ..(range << [1, 3])];\n\
             [t[0], t[1], t[2], t[3], #t] -> print;"
        ),
        ["0 1 2 3 4"]
    );
}

#[test]
fn splice_drain_exposes_the_loop_counter() {
    // The body stops itself once the drain counter passes zero, and the
    // produced table merges instead of appending.
    assert_eq!(
        run_program(
            "t = [..({ [index > 0] -> stop; <- [\"k\": 1]; } << [])];\n\
             [t[\"k\"], #t] -> print;"
        ),
        ["1 1"]
    );
}

#[test]
fn splice_drains_interleave_with_later_items() {
    // The drain runs at its item position, so its side effects land before
    // a later item's, not after.
    assert_eq!(
        run_program(
            "t = [..({ [index > 0] -> stop; [\"inner\"] -> print; <- 1; } << []), \
             ([\"after\"] -> print)];"
        ),
        ["\"inner\"", "\"after\""]
    );
}

#[test]
fn splicing_a_final_into_a_literal_fails() {
    let line = last_line("t = [..5];");
    assert!(
        line.contains("only a generator can be spliced into a table literal"),
        "{line}"
    );
}

#[test]
fn cyclic_tables_render_without_recursing() {
    assert_eq!(
        run_program("t = [1]; t[0] = t; [t] -> print;"),
        ["[\n    [...]\n]"]
    );
}

#[test]
fn print_renders_code_forms() {
    assert_eq!(
        run_program("[[1, \"a\"], \"x\", yes, nothing] -> print;"),
        ["[\n    1,\n    \"a\"\n] \"x\" yes nothing"]
    );
}
