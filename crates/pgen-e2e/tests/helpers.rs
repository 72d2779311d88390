use std::collections::HashMap;

use pgen_e2e::arith::{helpers, *};
use pretty_assertions::assert_eq;

fn parse_all(parser: ParseFn, input: &str) -> Parsed {
    let mut s = input;
    let parsed = parser(&mut s).unwrap();
    assert_eq!(s, "", "input not fully consumed");
    parsed
}

#[test]
fn test_flatten_reproduces_input() {
    for input in ["1", "12+3", "(1-(2+30))+4"] {
        assert_eq!(parse_all(parse_expr, input).flatten(), input);
    }
}

#[test]
fn test_generate_tree() {
    let parsed = parse_all(parse_expr, "1+2");
    assert_eq!(
        helpers::generate_tree(&parsed),
        "\
expr
 term
  number
   digit
    '1'
 expr_$g0
  add_op
   '+'
  term
   number
    digit
     '2'
"
    );
}

#[test]
fn test_generate_graphviz() {
    let parsed = parse_all(parse_number, "12");
    assert_eq!(
        helpers::generate_graphviz(&parsed),
        "\
digraph g {
\ta1[label=\"number\" shape=box];
\ta2[label=\"digit\" shape=box];
\ta3[label=\"1\" shape=ellipse];
\ta4[label=\"digit\" shape=box];
\ta5[label=\"2\" shape=ellipse];

\ta1 -> a2
\ta2 -> a3
\ta1 -> a4
\ta4 -> a5

\t{ rank=same; a3 a5 }
}
"
    );

    let parsed = parse_all(parse_expr, "1+2");
    let graph = helpers::generate_graphviz(&parsed);
    assert!(graph.contains("[label=\"expr_$g0\" shape=hexagon];"));
}

#[test]
fn test_ansi_colored() {
    let colors = HashMap::from([
        ("number".to_owned(), "<n>".to_owned()),
        ("add_op".to_owned(), "<o>".to_owned()),
    ]);
    let parsed = parse_all(parse_expr, "1+23");
    assert_eq!(
        helpers::ansi_colored(&parsed, &colors, "<r>"),
        "<n>1<r><o>+<r><n>23<r>"
    );

    // nested colors restore the enclosing one
    let colors = HashMap::from([
        ("expr".to_owned(), "<e>".to_owned()),
        ("number".to_owned(), "<n>".to_owned()),
    ]);
    let parsed = parse_all(parse_expr, "(1)");
    assert_eq!(
        helpers::ansi_colored(&parsed, &colors, "<r>"),
        "<e>(<e><n>1<e><e>)<r>"
    );
}

#[test]
fn test_namespaced() {
    use pgen_e2e::namespaced::arith;

    let mut s = "4-2";
    let parsed = arith::parse_expr(&mut s).unwrap();
    assert_eq!(s, "");
    assert_eq!(parsed.identifier, arith::IdentifierType::i_expr);
    assert_eq!(parsed.identifier.name(), "expr");
    assert_eq!(arith::PARSERS.len(), PARSERS.len());
}
