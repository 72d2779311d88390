//! Compiler from a small PEG-like grammar notation into Rust source of a backtracking
//! recursive descent parser.
//!
//! ```text
//! # a comment
//! list: "[" (item ("," item)*)? "]"
//!
//! item: "x" | list
//! ```
//!
//! [`parse`] turns grammar text into [`Rule`]s, [`generate`] turns those into source text which is
//! meant to be `include!`d from a build script's output.

pub mod ast;
pub mod codegen;
pub mod display;
pub mod error;
pub mod lexer;
pub mod parse;
pub mod span;

pub use ast::{Rule, RuleItem, RuleItemGroup, RuleItemKind};
pub use codegen::{generate, GenerateOptions};
pub use display::{dump, RulesExt, SequenceExt};
pub use error::{GenerateError, GrammarError, GrammarErrorKind};
pub use parse::parse;
pub use span::Span;
