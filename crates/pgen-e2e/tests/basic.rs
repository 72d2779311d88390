use pgen_e2e::basic::*;
use pretty_assertions::assert_eq;

fn run<'a>(parser: ParseFn, input: &'a str) -> Option<(Parsed, &'a str)> {
    let mut s = input;
    let parsed = parser(&mut s)?;
    Some((parsed, s))
}

#[track_caller]
fn assert_no_match(parser: ParseFn, input: &str) {
    let mut s = input;
    assert_eq!(parser(&mut s), None);
    assert_eq!(s, input, "cursor moved on a failed match");
}

#[test]
fn test_ordered_choice() {
    let (parsed, rest) = run(parse_choice, "ab").unwrap();
    assert_eq!(parsed.flatten(), "a");
    assert_eq!(rest, "b");
    assert_eq!(parsed.kind, ParsedType::Identifier);
    assert_eq!(parsed.identifier, IdentifierType::i_choice);
}

#[test]
fn test_backtracking() {
    let (parsed, rest) = run(parse_backtrack, "ac").unwrap();
    assert_eq!(rest, "");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.get(1).unwrap().literal, "c");

    assert_no_match(parse_backtrack, "ad");
    assert_no_match(parse_backtrack, "a");
    assert_no_match(parse_backtrack, "");
}

#[test]
fn test_optional() {
    let (parsed, rest) = run(parse_optional, "xz!").unwrap();
    assert_eq!((parsed.len(), rest), (2, "!"));

    let (parsed, _) = run(parse_optional, "xyz").unwrap();
    assert_eq!(parsed.flatten(), "xyz");

    assert_no_match(parse_optional, "xyy");
}

#[test]
fn test_repetition() {
    let (parsed, rest) = run(parse_many, "").unwrap();
    assert!(parsed.is_empty());
    assert_eq!(rest, "");

    let (parsed, rest) = run(parse_many, "xxxy").unwrap();
    assert_eq!((parsed.len(), rest), (3, "y"));

    assert_no_match(parse_some, "");
    assert_no_match(parse_some, "y");
    let (parsed, rest) = run(parse_some, "xx").unwrap();
    assert_eq!((parsed.len(), rest), (2, ""));
}

#[test]
fn test_negated_literal() {
    let (parsed, rest) = run(parse_line_comment, "# hé\nnext").unwrap();
    assert_eq!(parsed.flatten(), "# hé\n");
    assert_eq!(rest, "next");

    // each negated match consumes exactly one character
    let literals = parsed
        .group
        .iter()
        .map(|child| child.literal.as_str())
        .collect::<Vec<_>>();
    assert_eq!(literals, ["#", " ", "h", "é", "\n"]);

    let (parsed, rest) = run(parse_line_comment, "#").unwrap();
    assert_eq!((parsed.len(), rest), (1, ""));
}

#[test]
fn test_empty_alternative() {
    let (parsed, rest) = run(parse_empty_alternative, "qq").unwrap();
    assert_eq!((parsed.len(), rest), (1, "q"));

    for input in ["", "z"] {
        let (parsed, rest) = run(parse_empty_alternative, input).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(rest, input);
    }
}

#[test]
fn test_groups() {
    let (parsed, rest) = run(parse_nested, "(.).").unwrap();
    assert_eq!(rest, "");
    assert_eq!(parsed.flatten(), "(.).");

    let group = parsed.get_checked(0, IdentifierType::i_nested__g0);
    assert_eq!(group.kind, ParsedType::Group);
    assert_eq!(group.get_checked(1, IdentifierType::i_nested).flatten(), ".");
    assert_eq!(group.get(0).unwrap().identifier, IdentifierType::None);
    assert!(parsed.find(IdentifierType::i_nested__g0).is_some());
    assert!(parsed.find(IdentifierType::i_choice).is_none());
    assert_eq!(parsed.get(2), None);

    assert_no_match(parse_nested, "(.");
    assert_no_match(parse_nested, "(.)");
}

#[test]
#[should_panic]
fn test_get_checked_panics() {
    let (parsed, _) = run(parse_nested, "(.).").unwrap();
    parsed.get_checked(0, IdentifierType::i_nested);
}

#[test]
fn test_escaped_literals() {
    let (parsed, rest) = run(parse_escapes, "A\"\\\t.").unwrap();
    assert_eq!(parsed.len(), 4);
    assert_eq!(rest, ".");
}

#[test]
fn test_tables() {
    assert_eq!(IDENTIFIER_NAMES[0], "");
    assert_eq!(IdentifierType::None.name(), "");
    assert_eq!(IdentifierType::i_nested__g0.name(), "nested_$g0");
    assert_eq!(IDENTIFIER_NAMES.len(), PARSERS.len() + 1);

    let (_, parser) = PARSERS
        .iter()
        .find(|(identifier, _)| *identifier == IdentifierType::i_backtrack)
        .unwrap();
    let (parsed, _) = run(*parser, "ab").unwrap();
    assert_eq!(parsed.identifier, IdentifierType::i_backtrack);
}
