use fablec::Session;
use pretty_assertions::assert_eq;

#[test]
fn bindings_persist_across_chunks() {
    let mut session = Session::new();
    assert!(session.eval("x = 2;").ok);
    let report = session.eval("[x * 21] -> print;");
    assert!(report.ok);
    assert_eq!(report.lines, ["42"]);
}

#[test]
fn generators_keep_their_state_between_chunks() {
    let mut session = Session::new();
    assert!(session.eval("counter = { n = n + 1; <- n; } << [\"n\": 0];").ok);
    assert_eq!(session.eval("[[] -> counter] -> print;").lines, ["1"]);
    assert_eq!(session.eval("[[] -> counter] -> print;").lines, ["2"]);
}

#[test]
fn a_parse_error_does_not_poison_the_session() {
    let mut session = Session::new();
    let report = session.eval("x = ;");
    assert!(!report.ok);
    assert_eq!(report.lines.len(), 1);
    assert!(report.lines[0].contains("error"), "{}", report.lines[0]);
    assert_eq!(session.eval("[1] -> print;").lines, ["1"]);
}

#[test]
fn output_precedes_the_error_line() {
    let mut session = Session::new();
    let report = session.eval("[1] -> print; missing;");
    assert!(!report.ok);
    assert_eq!(report.lines[0], "1");
    assert!(
        report.lines[1].contains("undefined variable: missing"),
        "{}",
        report.lines[1]
    );
}

#[test]
fn an_escaped_signal_is_reported_plainly() {
    let mut session = Session::new();
    let report = session.eval("r = range << [1, 1]; [] -> r; [] -> r;");
    assert!(!report.ok);
    assert_eq!(report.lines, ["return or stop used outside a function"]);
}
