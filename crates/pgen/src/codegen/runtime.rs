//! Support code emitted verbatim into every generated file.
//!
//! It expects `IdentifierType` and `IDENTIFIER_NAMES` to be defined next to it.

pub const MATCH_LITERAL: &str = "match_literal";
pub const MATCH_NEGATE_LITERAL: &str = "match_negate_literal";

pub const RUNTIME: &str = r##"impl IdentifierType {
    pub fn name(self) -> &'static str {
        IDENTIFIER_NAMES[self as usize]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ParsedType {
    Literal,
    Identifier,
    Group,
}

/// A node of the parse tree.
///
/// Literals carry the matched text, rules and groups carry their children in document order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Parsed {
    pub kind: ParsedType,
    pub identifier: IdentifierType,
    pub literal: String,
    pub group: Vec<Parsed>,
}

impl Parsed {
    pub fn literal(literal: &str) -> Parsed {
        Parsed {
            kind: ParsedType::Literal,
            identifier: IdentifierType::None,
            literal: literal.to_owned(),
            group: Vec::new(),
        }
    }

    pub fn node(kind: ParsedType, identifier: IdentifierType, group: Vec<Parsed>) -> Parsed {
        Parsed {
            kind,
            identifier,
            literal: String::new(),
            group,
        }
    }

    /// The first direct child tagged with `identifier`.
    pub fn find(&self, identifier: IdentifierType) -> Option<&Parsed> {
        self.group.iter().find(|child| child.identifier == identifier)
    }

    pub fn get(&self, index: usize) -> Option<&Parsed> {
        self.group.get(index)
    }

    /// Like `get`, but panics when the child is missing or tagged differently.
    #[track_caller]
    pub fn get_checked(&self, index: usize, identifier: IdentifierType) -> &Parsed {
        let child = &self.group[index];
        assert_eq!(
            child.identifier,
            identifier,
            "Child {index} of '{}' has an unexpected identifier",
            self.identifier.name()
        );
        child
    }

    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Concatenation of all literals in the subtree.
    pub fn flatten(&self) -> String {
        let mut buf = String::new();
        self.flatten_into(&mut buf);
        buf
    }

    fn flatten_into(&self, buf: &mut String) {
        match self.kind {
            ParsedType::Literal => buf.push_str(&self.literal),
            ParsedType::Identifier | ParsedType::Group => {
                for child in &self.group {
                    child.flatten_into(buf);
                }
            }
        }
    }
}

pub type ParseFn = fn(&mut &str) -> Option<Parsed>;

#[must_use]
pub fn match_literal(s: &mut &str, literal: &str) -> Option<Parsed> {
    let current = *s;
    if current.is_empty() {
        return None;
    }
    *s = current.strip_prefix(literal)?;
    Some(Parsed::literal(literal))
}

/// Matches exactly one character, provided the input does not start with `literal`.
#[must_use]
pub fn match_negate_literal(s: &mut &str, literal: &str) -> Option<Parsed> {
    let current = *s;
    if current.starts_with(literal) {
        return None;
    }
    let c = current.chars().next()?;
    let (matched, rest) = current.split_at(c.len_utf8());
    *s = rest;
    Some(Parsed::literal(matched))
}

pub mod helpers {
    use super::*;
    use std::collections::HashMap;

    struct Node<'a> {
        parsed: &'a Parsed,
        children: Vec<usize>,
    }

    fn collect_nodes<'a>(parsed: &'a Parsed, nodes: &mut Vec<Node<'a>>) -> usize {
        let index = nodes.len();
        nodes.push(Node {
            parsed,
            children: Vec::new(),
        });
        let children = parsed
            .group
            .iter()
            .map(|child| collect_nodes(child, nodes))
            .collect();
        nodes[index].children = children;
        index
    }

    fn escape_label(label: &str) -> String {
        let mut escaped = String::with_capacity(label.len());
        for c in label.chars() {
            match c {
                '"' | '\\' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                '\n' => escaped.push_str("\\n"),
                c => escaped.push(c),
            }
        }
        escaped
    }

    fn write_edges(nodes: &[Node], index: usize, buf: &mut String) {
        for &child in &nodes[index].children {
            buf.push_str(&format!("\ta{} -> a{}\n", index + 1, child + 1));
            write_edges(nodes, child, buf);
        }
    }

    /// Renders the tree as a Graphviz `digraph`, nodes are numbered in pre-order starting from 1.
    pub fn generate_graphviz(parsed: &Parsed) -> String {
        let mut nodes = Vec::new();
        collect_nodes(parsed, &mut nodes);

        let mut buf = String::from("digraph g {\n");
        for (index, node) in nodes.iter().enumerate() {
            let (label, shape) = match node.parsed.kind {
                ParsedType::Literal => (node.parsed.literal.as_str(), "ellipse"),
                ParsedType::Identifier => (node.parsed.identifier.name(), "box"),
                ParsedType::Group => (node.parsed.identifier.name(), "hexagon"),
            };
            buf.push_str(&format!(
                "\ta{}[label=\"{}\" shape={shape}];\n",
                index + 1,
                escape_label(label)
            ));
        }

        buf.push('\n');
        write_edges(&nodes, 0, &mut buf);
        buf.push('\n');

        buf.push_str("\t{ rank=same;");
        for (index, node) in nodes.iter().enumerate() {
            if node.parsed.kind == ParsedType::Literal {
                buf.push_str(&format!(" a{}", index + 1));
            }
        }
        buf.push_str(" }\n}\n");
        buf
    }

    /// One line per node, indented by one space per level, literals in single quotes.
    pub fn generate_tree(parsed: &Parsed) -> String {
        let mut buf = String::new();
        tree_into(parsed, 0, &mut buf);
        buf
    }

    fn tree_into(parsed: &Parsed, depth: usize, buf: &mut String) {
        for _ in 0..depth {
            buf.push(' ');
        }
        match parsed.kind {
            ParsedType::Literal => {
                buf.push('\'');
                buf.push_str(&parsed.literal);
                buf.push_str("'\n");
            }
            ParsedType::Identifier | ParsedType::Group => {
                buf.push_str(parsed.identifier.name());
                buf.push('\n');
                for child in &parsed.group {
                    tree_into(child, depth + 1, buf);
                }
            }
        }
    }

    /// Flattens the tree, wrapping the text of every node whose name is in `colors` in its color code.
    ///
    /// Once a node is finished the color of its closest colored ancestor, or `prev_color`, is restored.
    pub fn ansi_colored(
        parsed: &Parsed,
        colors: &HashMap<String, String>,
        prev_color: &str,
    ) -> String {
        let mut buf = String::new();
        colored_into(parsed, colors, prev_color, &mut buf);
        buf
    }

    fn colored_into(
        parsed: &Parsed,
        colors: &HashMap<String, String>,
        prev_color: &str,
        buf: &mut String,
    ) {
        let color = colors
            .get(parsed.identifier.name())
            .map(String::as_str)
            .filter(|color| !color.is_empty());

        if let Some(color) = color {
            buf.push_str(color);
        }
        match parsed.kind {
            ParsedType::Literal => buf.push_str(&parsed.literal),
            ParsedType::Identifier | ParsedType::Group => {
                for child in &parsed.group {
                    colored_into(child, colors, color.unwrap_or(prev_color), buf);
                }
            }
        }
        if color.is_some() {
            buf.push_str(prev_color);
        }
    }
}
"##;
