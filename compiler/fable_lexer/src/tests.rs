#![allow(clippy::unwrap_used)]

use fable_diagnostic::ErrorKind;
use fable_ir::TokenKind;
use pretty_assertions::assert_eq;

use crate::tokenize;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .map(|tokens| tokens.into_iter().map(|t| t.kind).collect())
        .unwrap_or_default()
}

#[test]
fn maximal_munch_on_left_angle_operators() {
    assert_eq!(
        kinds("< <= <=> << <- <?="),
        vec![
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Swap,
            TokenKind::Reload,
            TokenKind::ReturnArrow,
            TokenKind::Detect,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn arrows_and_combinators() {
    assert_eq!(
        kinds("-> => >> | .."),
        vec![
            TokenKind::Arrow,
            TokenKind::Transform,
            TokenKind::Reduce,
            TokenKind::Pipe,
            TokenKind::Unfold,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_classified() {
    assert_eq!(
        kinds("index yes no nothing always and or xor indexed"),
        vec![
            TokenKind::Index,
            TokenKind::Yes,
            TokenKind::No,
            TokenKind::Nothing,
            TokenKind::Always,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Xor,
            TokenKind::Name("indexed".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn integer_then_unfold_then_integer() {
    // `1..5` is not a float followed by garbage.
    assert_eq!(
        kinds("1..5"),
        vec![
            TokenKind::Int(1),
            TokenKind::Unfold,
            TokenKind::Int(5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn float_literals_need_a_fraction_digit() {
    assert_eq!(
        kinds("1.5 2"),
        vec![TokenKind::Float(1.5), TokenKind::Int(2), TokenKind::Eof]
    );
}

#[test]
fn text_escapes_decode() {
    assert_eq!(
        kinds(r#""a\tb\n\"c\"""#),
        vec![TokenKind::Text("a\tb\n\"c\"".to_string()), TokenKind::Eof]
    );
    assert_eq!(
        kinds(r"'it\'s'"),
        vec![TokenKind::Text("it's".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unknown_escape_is_a_lex_error() {
    let err = tokenize(r#""\q""#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lex);
}

#[test]
fn unterminated_text_reports_opening_line() {
    let err = tokenize("\n\"abc").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lex);
    assert_eq!(err.line.get(), 2);
}

#[test]
fn newlines_advance_line_numbers() {
    let tokens = tokenize("a\nb\nc").unwrap_or_default();
    let lines: Vec<u32> = tokens.iter().map(|t| t.line.get()).collect();
    assert_eq!(lines, vec![1, 2, 3, 3]);
}

#[test]
fn number_too_large_is_a_lex_error() {
    let err = tokenize("99999999999999999999").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lex);
}

#[test]
fn unexpected_character_is_a_lex_error() {
    let err = tokenize("a $ b").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lex);
    assert!(err.message.contains('$'));
}
