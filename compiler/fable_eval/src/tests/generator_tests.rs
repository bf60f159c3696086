use pretty_assertions::assert_eq;

use super::{last_line, run_program};

#[test]
fn range_produces_its_bounds_then_stops() {
    assert_eq!(
        run_program(
            "r = range << [1, 5];\n\
             [[] -> r] -> print;\n\
             [[] -> r] -> print;\n\
             [[] -> r] -> print;\n\
             [[] -> r] -> print;\n\
             [[] -> r] -> print;\n\
             [[] -> r] -> print;"
        ),
        ["1", "2", "3", "4", "5", "return or stop used outside a function"]
    );
}

#[test]
fn range_called_directly_returns_a_fresh_generator() {
    assert_eq!(
        run_program("g = [1, 3] -> range; [[] -> g, [] -> g] -> print;"),
        ["1 2"]
    );
}

#[test]
fn an_empty_range_stops_immediately() {
    assert_eq!(
        run_program("r = range << [5, 1]; [] -> r;"),
        ["return or stop used outside a function"]
    );
}

#[test]
fn float_ranges_step_by_one() {
    assert_eq!(
        run_program("r = range << [1.5, 3]; [[] -> r, [] -> r] -> print;"),
        ["1.5 2.5"]
    );
}

#[test]
fn range_bounds_must_be_numbers() {
    let line = last_line("r = range << [\"a\", 2]; [] -> r;");
    assert!(line.contains("range bounds must be numbers"), "{line}");
}

#[test]
fn a_body_generator_resumes_after_each_return() {
    // The third pull completes the interrupted pass and earns a fresh one.
    assert_eq!(
        run_program("g = { <- 1; <- 2; } << []; [[] -> g, [] -> g, [] -> g, [] -> g] -> print;"),
        ["1 2 1 2"]
    );
}

#[test]
fn generator_state_persists_in_the_initializer() {
    assert_eq!(
        run_program(
            "counter = { n = n + 1; <- n; } << [\"n\": 0];\n\
             [[] -> counter, [] -> counter, [] -> counter] -> print;"
        ),
        ["1 2 3"]
    );
}

#[test]
fn reloading_rebuilds_a_generator_from_scratch() {
    assert_eq!(
        run_program(
            "r = range << [1, 2];\n\
             [[] -> r, [] -> r] -> print;\n\
             s = r << [1, 2];\n\
             [[] -> s] -> print;"
        ),
        ["1 2", "1"]
    );
}

#[test]
fn reloading_a_builtin_other_than_range_exhausts_at_once() {
    assert_eq!(
        run_program("s = print << []; [] -> s;"),
        ["return or stop used outside a function"]
    );
}

#[test]
fn a_generator_cannot_invoke_itself() {
    let line = last_line("g = { <- [] -> g; } << []; [] -> g;");
    assert!(line.contains("a generator cannot invoke itself"), "{line}");
}

#[test]
fn transform_pulls_from_a_copy_of_the_producer() {
    assert_eq!(
        run_program(
            "r = range << [1, 5];\n\
             d = r => { <- @1 * 2; };\n\
             [[] -> d, [] -> r] -> print;"
        ),
        ["2 1"]
    );
}

#[test]
fn transform_applies_per_pull_until_the_producer_stops() {
    assert_eq!(
        run_program(
            "r = range << [1, 5];\n\
             d = r => { <- @1 * 2; };\n\
             [[] -> d, [] -> d, [] -> d, [] -> d, [] -> d] -> print;\n\
             [] -> d;"
        ),
        ["2 4 6 8 10", "return or stop used outside a function"]
    );
}

#[test]
fn a_table_transformer_maps_produced_values() {
    assert_eq!(
        run_program(
            "r = range << [1, 3];\n\
             t = r => [1: \"one\", 2: \"two\", always: \"?\"];\n\
             [[] -> t, [] -> t, [] -> t] -> print;"
        ),
        ["\"one\" \"two\" \"?\""]
    );
}

#[test]
fn a_transformer_without_a_result_is_an_error() {
    let line = last_line("r = range << [1, 3]; d = r => { x = 1; }; [] -> d;");
    assert!(line.contains("did not return a value"), "{line}");
}

#[test]
fn transform_requires_a_generator_producer() {
    let line = last_line("d = 1 => { <- @1; }; [] -> d;");
    assert!(line.contains("cannot apply =>"), "{line}");
}

#[test]
fn filter_keeps_matching_values() {
    assert_eq!(
        run_program(
            "r = range << [1, 5];\n\
             e = r | { <- @1 % 2 == 0; };\n\
             [[] -> e, [] -> e] -> print;\n\
             [] -> e;"
        ),
        ["2 4", "return or stop used outside a function"]
    );
}

#[test]
fn a_table_predicate_must_cover_every_produced_value() {
    let line = last_line("r = range << [1, 3]; f = r | [1: yes]; [[] -> f, [] -> f] -> print;");
    assert!(line.contains("2 is not defined"), "{line}");
}

#[test]
fn a_never_satisfied_filter_is_an_infinite_loop() {
    let line = last_line(
        "ones = { <- 1; } << [];\n\
         f = ones | { <- @1 == 2; };\n\
         [] -> f;",
    );
    assert!(line.contains("possible infinite loop"), "{line}");
}

#[test]
fn detect_returns_the_produced_value_and_drains_in_place() {
    assert_eq!(
        run_program(
            "r = range << [1, 9];\n\
             hit = r <?= { <- @1 == 3; };\n\
             [hit, [] -> r] -> print;"
        ),
        ["3 4"]
    );
}

#[test]
fn detect_exhaustion_yields_nothing() {
    assert_eq!(
        run_program("r = range << [1, 3]; hit = r <?= { <- @1 == 99; }; [hit] -> print;"),
        ["nothing"]
    );
}

#[test]
fn detect_exposes_the_loop_counter() {
    assert_eq!(
        run_program("r = range << [10, 14]; hit = r <?= { <- index == 2; }; [hit] -> print;"),
        ["12"]
    );
}

#[test]
fn a_never_satisfied_detect_is_an_infinite_loop() {
    let line = last_line(
        "ones = { <- 1; } << [];\n\
         hit = ones <?= { <- @1 == 2; };",
    );
    assert!(line.contains("possible infinite loop"), "{line}");
}

#[test]
fn reduce_folds_the_whole_producer() {
    assert_eq!(
        run_program(
            "r = range << [1, 5];\n\
             add = { total = total + @1; <- total; } << [\"total\": 0];\n\
             [r >> add] -> print;"
        ),
        ["15"]
    );
}

#[test]
fn reducing_an_exhausted_producer_stops() {
    assert_eq!(
        run_program(
            "r = range << [1, 3];\n\
             keep = { <- @1; } << [];\n\
             [r >> keep] -> print;\n\
             x = r >> keep;"
        ),
        ["3", "return or stop used outside a function"]
    );
}

#[test]
fn reduce_requires_generators_on_both_sides() {
    let line = last_line("r = range << [1, 3]; x = r >> { <- @1; };");
    assert!(line.contains("cannot apply >>"), "{line}");
}

#[test]
fn iter_walks_sequence_slots_then_mapping_keys() {
    assert_eq!(
        run_program(
            "t = [10, 20, \"k\": 5];\n\
             it = [t] -> iter;\n\
             p = [] -> it; [p[0], p[1]] -> print;\n\
             p = [] -> it; [p[0], p[1]] -> print;\n\
             p = [] -> it; [p[0], p[1]] -> print;\n\
             [] -> it;"
        ),
        ["0 10", "1 20", "\"k\" 5", "return or stop used outside a function"]
    );
}

#[test]
fn iter_snapshots_the_table() {
    assert_eq!(
        run_program("t = [10]; it = [t] -> iter; t[0] = 99; p = [] -> it; [p[1]] -> print;"),
        ["10"]
    );
}

#[test]
fn iter_requires_a_table() {
    let line = last_line("[1] -> iter;");
    assert!(line.contains("iter requires a table argument"), "{line}");
}
