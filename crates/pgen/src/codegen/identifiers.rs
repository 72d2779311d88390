use std::collections::{hash_map::Entry, HashMap};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::{
    ast::{visit_groups, Rule, RuleItemGroup},
    error::GenerateError,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IdentifierHandle(u32);
entity_impl!(IdentifierHandle);

impl IdentifierHandle {
    /// The tag of literal nodes.
    pub const NONE: IdentifierHandle = IdentifierHandle(0);
}

#[derive(Clone, Copy, Debug)]
pub enum IdentifierSource<'a> {
    None,
    Rule(&'a Rule),
    Group(&'a RuleItemGroup),
}

#[derive(Debug)]
pub struct Identifier<'a> {
    /// Name as declared in the grammar, or the generated name of a group.
    pub name: &'a str,
    /// `name` with every `$` replaced, valid as part of a Rust identifier.
    pub mangled: String,
    pub source: IdentifierSource<'a>,
}

impl Identifier<'_> {
    pub fn variant_name(&self) -> String {
        match self.source {
            IdentifierSource::None => "None".to_owned(),
            _ => format!("i_{}", self.mangled),
        }
    }
    pub fn function_name(&self) -> String {
        function_name(self.name)
    }
}

pub fn mangle(name: &str) -> String {
    name.replace('$', "_")
}

pub fn function_name(name: &str) -> String {
    format!("parse_{}", mangle(name))
}

/// The tags of a grammar: the `None` sentinel, then every rule in definition order,
/// then every group in pre-order.
#[derive(Debug)]
pub struct Identifiers<'a> {
    table: PrimaryMap<IdentifierHandle, Identifier<'a>>,
    rules: HashMap<&'a str, IdentifierHandle>,
    groups: HashMap<&'a str, IdentifierHandle>,
}

impl<'a> Identifiers<'a> {
    pub fn collect(rules: &'a [Rule]) -> Result<Identifiers<'a>, GenerateError> {
        let mut table = PrimaryMap::new();
        table.push(Identifier {
            name: "",
            mangled: String::new(),
            source: IdentifierSource::None,
        });

        let mut by_rule = HashMap::new();
        for rule in rules {
            let handle = table.push(Identifier {
                name: &rule.name,
                mangled: mangle(&rule.name),
                source: IdentifierSource::Rule(rule),
            });
            match by_rule.entry(rule.name.as_str()) {
                Entry::Occupied(_) => {
                    return Err(GenerateError::DuplicateRule {
                        name: rule.name.clone(),
                        span: rule.span,
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(handle);
                }
            }
        }

        let mut by_group = HashMap::new();
        for rule in rules {
            visit_groups(&rule.seq, &mut |group| {
                let handle = table.push(Identifier {
                    name: &group.name,
                    mangled: mangle(&group.name),
                    source: IdentifierSource::Group(group),
                });
                // group names are derived from unique rule names, they cannot repeat
                by_group.insert(group.name.as_str(), handle);
            });
        }

        let mut mangled: HashMap<&str, &str> = HashMap::new();
        for identifier in table.values().skip(1) {
            if let Some(first) = mangled.insert(&identifier.mangled, identifier.name) {
                return Err(GenerateError::NameCollision {
                    first: first.to_owned(),
                    second: identifier.name.to_owned(),
                });
            }
        }

        Ok(Identifiers {
            table,
            rules: by_rule,
            groups: by_group,
        })
    }

    pub fn rule(&self, name: &str) -> Option<IdentifierHandle> {
        self.rules.get(name).copied()
    }

    pub fn group(&self, name: &str) -> Option<IdentifierHandle> {
        self.groups.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IdentifierHandle, &Identifier<'a>)> {
        self.table.iter()
    }
}

impl<'a> std::ops::Index<IdentifierHandle> for Identifiers<'a> {
    type Output = Identifier<'a>;
    fn index(&self, index: IdentifierHandle) -> &Self::Output {
        &self.table[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn test_identifier_order() {
        let rules = parse("a: (\"x\" (y))\n\nb: (\"z\") | a").unwrap();
        let identifiers = Identifiers::collect(&rules).unwrap();

        let names = identifiers
            .iter()
            .map(|(_, i)| i.variant_name())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            ["None", "i_a", "i_b", "i_a__g0", "i_a__g0__g0", "i_b__g0"]
        );
        assert_eq!(identifiers.rule("b"), Some(IdentifierHandle::from_u32(2)));
        assert_eq!(identifiers.group("a_$g0_$g0"), Some(IdentifierHandle::from_u32(4)));
        assert_eq!(identifiers.rule("a_$g0"), None);
        assert_eq!(identifiers[IdentifierHandle::NONE].name, "");
        assert_eq!(identifiers[IdentifierHandle::from_u32(5)].function_name(), "parse_b__g0");
    }

    #[test]
    fn test_duplicate_rule() {
        let rules = parse("a: \"x\"\n\nb: \"y\"\n\na: \"z\"").unwrap();
        match Identifiers::collect(&rules) {
            Err(GenerateError::DuplicateRule { name, span }) => {
                assert_eq!(name, "a");
                assert_eq!(span.start(), 16);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_mangled_collision() {
        let rules = parse("r: (\"x\")\n\nr__g0: \"y\"").unwrap();
        assert_eq!(
            Identifiers::collect(&rules).unwrap_err(),
            GenerateError::NameCollision {
                first: "r__g0".to_owned(),
                second: "r_$g0".to_owned(),
            }
        );
    }
}
