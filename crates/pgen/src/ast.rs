use crate::span::Span;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    pub name: String,
    /// Span of the rule name in the grammar source.
    pub span: Span,
    pub seq: Vec<RuleItem>,
}

impl Rule {
    /// Splits the sequence into ordered-choice alternatives.
    pub fn alternatives(&self) -> impl Iterator<Item = &[RuleItem]> {
        alternatives(&self.seq)
    }
}

/// Anonymous sub-rule introduced by parentheses, named `<parent>_$g<n>`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuleItemGroup {
    pub name: String,
    pub seq: Vec<RuleItem>,
}

impl RuleItemGroup {
    pub fn alternatives(&self) -> impl Iterator<Item = &[RuleItem]> {
        alternatives(&self.seq)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RuleItemKind {
    Literal(String),
    Identifier(String),
    Group(RuleItemGroup),
    /// Boundary between two alternatives, never carries flags.
    Or,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuleItem {
    pub kind: RuleItemKind,
    pub optional: bool,
    pub multiple: bool,
    /// Only ever set on literals.
    pub negate: bool,
}

impl RuleItem {
    pub fn new(kind: RuleItemKind) -> RuleItem {
        Self {
            kind,
            optional: false,
            multiple: false,
            negate: false,
        }
    }
    pub fn literal(literal: impl Into<String>) -> RuleItem {
        Self::new(RuleItemKind::Literal(literal.into()))
    }
    pub fn identifier(identifier: impl Into<String>) -> RuleItem {
        Self::new(RuleItemKind::Identifier(identifier.into()))
    }
    pub fn or() -> RuleItem {
        Self::new(RuleItemKind::Or)
    }
    pub fn is_or(&self) -> bool {
        matches!(self.kind, RuleItemKind::Or)
    }
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, RuleItemKind::Literal(_))
    }
    pub fn as_group(&self) -> Option<&RuleItemGroup> {
        match &self.kind {
            RuleItemKind::Group(group) => Some(group),
            _ => None,
        }
    }
}

pub fn alternatives(seq: &[RuleItem]) -> impl Iterator<Item = &[RuleItem]> {
    seq.split(RuleItem::is_or)
}

/// Pre-order walk over all groups nested anywhere in `seq`.
pub fn visit_groups<'a>(seq: &'a [RuleItem], fun: &mut dyn FnMut(&'a RuleItemGroup)) {
    for item in seq {
        if let Some(group) = item.as_group() {
            fun(group);
            visit_groups(&group.seq, fun);
        }
    }
}
