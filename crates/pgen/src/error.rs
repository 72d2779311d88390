use std::fmt::Display;

use crate::span::Span;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GrammarErrorKind {
    ExpectedRuleName,
    MissingColon,
    EmptyRule,
    UnexpectedCharacter(char),
    UnexpectedEof,
    /// A `*`, `+`, `?` or `^` with no item before it in the current alternative.
    DanglingPostfix(char),
    NegateNonLiteral,
    UnclosedGroup,
}

impl Display for GrammarErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorKind::ExpectedRuleName => f.write_str("Expected rule name"),
            GrammarErrorKind::MissingColon => f.write_str("Expected ':' after rule name"),
            GrammarErrorKind::EmptyRule => f.write_str("Rule has an empty body"),
            GrammarErrorKind::UnexpectedCharacter(c) => {
                write!(f, "Unexpected character '{}'", c.escape_default())
            }
            GrammarErrorKind::UnexpectedEof => f.write_str("Unexpected end of input"),
            GrammarErrorKind::DanglingPostfix(c) => {
                write!(f, "'{c}' must follow a literal, identifier or group")
            }
            GrammarErrorKind::NegateNonLiteral => f.write_str("'^' can only negate a literal"),
            GrammarErrorKind::UnclosedGroup => f.write_str("Expected ')' to close group"),
        }
    }
}

/// A structural grammar error, aborts the whole parse.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GrammarError {
    pub kind: GrammarErrorKind,
    pub span: Span,
}

impl GrammarError {
    pub fn new(kind: GrammarErrorKind, span: Span) -> GrammarError {
        Self { kind, span }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for GrammarError {}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GenerateError {
    DuplicateRule {
        name: String,
        span: Span,
    },
    /// Two distinct rule or group names map onto the same Rust identifier.
    NameCollision {
        first: String,
        second: String,
    },
    InvalidNamespace(String),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::DuplicateRule { name, span } => {
                write!(f, "Rule '{name}' is defined more than once (at {span})")
            }
            GenerateError::NameCollision { first, second } => {
                write!(f, "'{first}' and '{second}' generate the same identifier")
            }
            GenerateError::InvalidNamespace(name) => {
                write!(f, "Namespace '{name}' is not a valid identifier")
            }
        }
    }
}

impl std::error::Error for GenerateError {}
