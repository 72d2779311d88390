use std::fmt::{Display, Formatter, Result, Write};

use crate::{
    ast::{Rule, RuleItem, RuleItemGroup, RuleItemKind},
    lexer::escape_string,
};

impl Display for RuleItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.kind {
            RuleItemKind::Literal(literal) => write!(f, "\"{}\"", escape_string(literal))?,
            RuleItemKind::Identifier(identifier) => f.write_str(identifier)?,
            RuleItemKind::Group(group) => group.fmt(f)?,
            RuleItemKind::Or => return f.write_char('|'),
        }

        if self.negate {
            f.write_char('^')?;
        }
        match (self.optional, self.multiple) {
            (true, true) => f.write_char('*'),
            (false, true) => f.write_char('+'),
            (true, false) => f.write_char('?'),
            (false, false) => Ok(()),
        }
    }
}

impl Display for RuleItemGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({})", self.seq.display())
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {}", self.name, self.seq.display())
    }
}

pub struct SequenceDisplay<'a>(&'a [RuleItem]);

impl Display for SequenceDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (i, item) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_char(' ')?;
            }
            item.fmt(f)?;
        }
        Ok(())
    }
}

pub trait SequenceExt {
    fn display(&self) -> SequenceDisplay;
}

impl SequenceExt for [RuleItem] {
    fn display(&self) -> SequenceDisplay {
        SequenceDisplay(self)
    }
}

/// Renders rules separated by blank lines, which is valid grammar text again.
pub struct RulesDisplay<'a>(&'a [Rule]);

impl Display for RulesDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for rule in self.0 {
            writeln!(f, "{rule}\n")?;
        }
        Ok(())
    }
}

pub trait RulesExt {
    fn display(&self) -> RulesDisplay;
}

impl RulesExt for [Rule] {
    fn display(&self) -> RulesDisplay {
        RulesDisplay(self)
    }
}

pub fn dump(value: &impl Display) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dump_items() {
        let rules = parse("r: \"a\\n\"^* b+ (c | \"d\")? | \"q\\\"\"").unwrap();
        assert_eq!(
            dump(&rules[0]),
            r#"r: "a\n"^* b+ (c | "d")? | "q\"""#
        );
        assert_eq!(dump(&rules[0].seq[1]), "b+");
        assert_eq!(dump(&rules[0].seq.display()), dump(&rules[0]).trim_start_matches("r: "));
    }

    #[test]
    fn test_dump_round_trip() {
        let src = "
# arithmetic
expr: term ((\"+\" | \"-\") term)*

term:
    factor
    (\"*\" factor)*

factor: \"(\" expr \")\" | number

number: \"\\x30\"+
";
        let rules = parse(src).unwrap();
        let dumped = dump(&rules.display());
        assert_eq!(
            dumped,
            r#"expr: term (("+" | "-") term)*

term: factor ("*" factor)*

factor: "(" expr ")" | number

number: "0"+

"#
        );
        // spans differ, everything else survives
        let reparsed = parse(&dumped).unwrap();
        let seqs = |rules: &[Rule]| {
            rules
                .iter()
                .map(|r| (r.name.clone(), r.seq.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(seqs(&reparsed), seqs(&rules));
    }
}
