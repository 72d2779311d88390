//! Lowering of the grammar into Rust source of a backtracking recursive descent parser.
//!
//! Every rule and every group becomes one `parse_*` function. An alternative works on a copy of the
//! cursor and only writes it back once all of its items matched, so a failed call never moves the
//! caller's cursor.

use std::collections::HashMap;

use cranelift_entity::{packed_option::PackedOption, SecondaryMap};
use log::{debug, warn};

use crate::{
    ast::{alternatives, Rule, RuleItem, RuleItemKind},
    display::SequenceExt,
    error::GenerateError,
    lexer::is_identifier,
};

use self::{
    code::{Block, CodeFile, Const, Enum, Expression, FunctionHandle, Item, Statement},
    identifiers::{function_name, IdentifierHandle, IdentifierSource, Identifiers},
};

pub mod code;
pub mod identifiers;
pub mod render;
pub mod runtime;

#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Wraps the generated code in `pub mod <namespace>`.
    pub namespace: Option<String>,
    /// Emits the grammar notation of every rule and group as a comment above its function.
    pub rule_comments: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            rule_comments: true,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> GenerateOptions {
        Self::default()
    }
    pub fn namespace(mut self, namespace: impl Into<String>) -> GenerateOptions {
        self.namespace = Some(namespace.into());
        self
    }
    pub fn rule_comments(mut self, rule_comments: bool) -> GenerateOptions {
        self.rule_comments = rule_comments;
        self
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

fn is_valid_namespace(name: &str) -> bool {
    let Some(&first) = name.as_bytes().first() else {
        return false;
    };
    !first.is_ascii_digit()
        && name != "_"
        && name.bytes().all(is_identifier)
        && !KEYWORDS.contains(&name)
}

/// Generates the source of a parser for `rules`.
///
/// The output is a sequence of items meant to be `include!`d into a module. References to rules that
/// are not defined are still emitted as calls, the parsing function must then be supplied next to the
/// generated code.
pub fn generate(rules: &[Rule], options: &GenerateOptions) -> Result<String, GenerateError> {
    if let Some(namespace) = &options.namespace {
        if !is_valid_namespace(namespace) {
            return Err(GenerateError::InvalidNamespace(namespace.clone()));
        }
    }

    let identifiers = Identifiers::collect(rules)?;
    let file = lower_file(&identifiers, options);

    debug!(
        "generated {} parsing functions",
        identifiers.len().saturating_sub(1)
    );
    Ok(render::render(&file))
}

fn lower_file(identifiers: &Identifiers, options: &GenerateOptions) -> CodeFile {
    let mut file = CodeFile::new();
    file.namespace = options.namespace.clone();

    file.push_item(Item::Enum(Enum {
        name: "IdentifierType".to_owned(),
        variants: identifiers
            .iter()
            .map(|(_, identifier)| identifier.variant_name())
            .collect(),
    }));
    file.push_item(Item::Const(Const {
        name: "IDENTIFIER_NAMES".to_owned(),
        ty: "&[&str]",
        value: Expression::Array(
            identifiers
                .iter()
                .map(|(_, identifier)| Expression::Str(identifier.name.to_owned()))
                .collect(),
        ),
    }));
    file.push_item(Item::Raw(runtime::RUNTIME));

    let mut lowering = Lowering {
        identifiers,
        functions: SecondaryMap::new(),
        undefined: HashMap::new(),
        match_literal: file.register_foreign_function(runtime::MATCH_LITERAL),
        match_negate_literal: file.register_foreign_function(runtime::MATCH_NEGATE_LITERAL),
    };

    let mut declared = Vec::new();
    for (handle, identifier) in identifiers.iter().skip(1) {
        let comment = options
            .rule_comments
            .then(|| rule_comment(identifiers, handle));
        let function = file.declare_function(identifier.function_name(), comment);
        lowering.functions[handle] = function.into();
        declared.push((identifier.variant_name(), function));
    }

    let entries = declared
        .iter()
        .map(|(variant, function)| {
            Expression::Tuple(vec![
                Expression::path(format!("IdentifierType::{variant}")),
                Expression::Function(*function),
            ])
        })
        .collect();
    file.push_item(Item::Const(Const {
        name: "PARSERS".to_owned(),
        ty: "&[(IdentifierType, ParseFn)]",
        value: Expression::Array(entries),
    }));
    for (_, function) in declared {
        file.push_item(Item::Function(function));
    }

    for (handle, identifier) in identifiers.iter() {
        let (kind, seq) = match identifier.source {
            IdentifierSource::None => continue,
            IdentifierSource::Rule(rule) => ("ParsedType::Identifier", &rule.seq),
            IdentifierSource::Group(group) => ("ParsedType::Group", &group.seq),
        };
        let Some(function) = lowering.functions[handle].expand() else {
            continue;
        };

        let body = lowering.lower_sequence(&mut file, handle, kind, seq);
        file.define_function(function, body);
        debug!("lowered {}", identifier.name);
    }

    file
}

fn rule_comment(identifiers: &Identifiers, handle: IdentifierHandle) -> String {
    let identifier = &identifiers[handle];
    match identifier.source {
        IdentifierSource::None => String::new(),
        IdentifierSource::Rule(rule) => format!("Rule: {rule}"),
        IdentifierSource::Group(group) => {
            format!("Rule: {}: {}", group.name, group.seq.display())
        }
    }
}

struct Lowering<'a, 'b> {
    identifiers: &'b Identifiers<'a>,
    functions: SecondaryMap<IdentifierHandle, PackedOption<FunctionHandle>>,
    /// Referenced rules without a definition, they are expected to be provided by the user.
    undefined: HashMap<&'a str, FunctionHandle>,
    match_literal: FunctionHandle,
    match_negate_literal: FunctionHandle,
}

impl<'a, 'b> Lowering<'a, 'b> {
    fn lower_sequence(
        &mut self,
        file: &mut CodeFile,
        handle: IdentifierHandle,
        kind: &'static str,
        seq: &'a [RuleItem],
    ) -> Block {
        let variant = format!("IdentifierType::{}", self.identifiers[handle].variant_name());

        let mut statements = Vec::new();
        for alternative in alternatives(seq) {
            let block = self.lower_alternative(file, alternative, kind, &variant);
            statements.push(Statement::Block(block));

            // an alternative without mandatory items always returns, nothing after it is reachable
            if alternative.iter().all(|item| item.optional) {
                return Block::new(statements);
            }
        }

        Block::with_tail(statements, Expression::path("None"))
    }

    fn lower_alternative(
        &mut self,
        file: &mut CodeFile,
        alternative: &'a [RuleItem],
        kind: &'static str,
        variant: &str,
    ) -> Block {
        let node = |group: Expression| Expression::CallPath {
            path: "Some",
            arguments: vec![Expression::CallPath {
                path: "Parsed::node",
                arguments: vec![Expression::path(kind), Expression::path(variant), group],
            }],
        };

        // matches the empty string, the cursor stays where it is
        if alternative.is_empty() {
            let empty = Expression::CallPath {
                path: "Vec::new",
                arguments: Vec::new(),
            };
            return Block::new(vec![Statement::Return(node(empty))]);
        }

        let commit = vec![
            Statement::Assign {
                place: Expression::path("s").deref(),
                value: Expression::path("sc"),
            },
            Statement::Return(node(Expression::path("group"))),
        ];

        let mut statements = vec![
            Statement::Let {
                mutable: true,
                name: "sc",
                value: Expression::path("s").deref(),
            },
            Statement::Let {
                mutable: true,
                name: "group",
                value: Expression::CallPath {
                    path: "Vec::new",
                    arguments: Vec::new(),
                },
            },
        ];
        statements.extend(self.lower_items(file, alternative, commit));
        Block::new(statements)
    }

    /// Mandatory items nest everything after them in their success branch, optional items are
    /// followed by the rest of the alternative regardless of their outcome.
    fn lower_items(
        &mut self,
        file: &mut CodeFile,
        items: &'a [RuleItem],
        commit: Vec<Statement>,
    ) -> Vec<Statement> {
        let Some((item, rest)) = items.split_first() else {
            return commit;
        };

        let attempt = self.lower_attempt(file, item);
        let mut body = vec![push_child()];
        if item.multiple {
            body.extend(repeat(attempt.clone()));
        }

        let matched = |body| Statement::IfLet {
            pattern: "Some(v)",
            value: attempt,
            body: Block::new(body),
        };

        if item.optional {
            let mut statements = vec![matched(body)];
            statements.extend(self.lower_items(file, rest, commit));
            statements
        } else {
            body.extend(self.lower_items(file, rest, commit));
            vec![matched(body)]
        }
    }

    /// A call which tries to match `item` at the working cursor.
    fn lower_attempt(&mut self, file: &mut CodeFile, item: &'a RuleItem) -> Expression {
        let cursor = Expression::path("sc").mut_ref();
        let function = match &item.kind {
            RuleItemKind::Literal(literal) => {
                let function = match item.negate {
                    true => self.match_negate_literal,
                    false => self.match_literal,
                };
                return Expression::Call {
                    function,
                    arguments: vec![cursor, Expression::Str(literal.clone())],
                };
            }
            RuleItemKind::Identifier(name) => match self.identifiers.rule(name) {
                Some(handle) => self.functions[handle].expand(),
                None => Some(self.undefined_rule(file, name)),
            },
            RuleItemKind::Group(group) => self
                .identifiers
                .group(&group.name)
                .and_then(|handle| self.functions[handle].expand()),
            RuleItemKind::Or => None,
        };

        match function {
            Some(function) => Expression::Call {
                function,
                arguments: vec![cursor],
            },
            // alternatives are split on every `Or` and all groups are declared
            None => unreachable!("No parsing function for {item}"),
        }
    }

    fn undefined_rule(&mut self, file: &mut CodeFile, name: &'a str) -> FunctionHandle {
        *self.undefined.entry(name).or_insert_with(|| {
            let function = function_name(name);
            warn!("Rule '{name}' is not defined, '{function}' must be provided externally");
            file.register_foreign_function(function)
        })
    }
}

/// `group.push(v);`
fn push_child() -> Statement {
    Statement::Expression(
        Expression::path("group").method("push", vec![Expression::path("v")]),
    )
}

/// Appends further matches of `attempt` until it fails or stops consuming input.
fn repeat(attempt: Expression) -> Vec<Statement> {
    let remaining = || Expression::path("sc").method("len", Vec::new());
    vec![
        Statement::Let {
            mutable: true,
            name: "progress",
            value: remaining(),
        },
        Statement::WhileLet {
            pattern: "Some(v)",
            value: attempt,
            body: Block::new(vec![
                Statement::If {
                    condition: remaining().binary("==", Expression::path("progress")),
                    body: Block::new(vec![Statement::Break]),
                },
                Statement::Assign {
                    place: Expression::path("progress"),
                    value: remaining(),
                },
                push_child(),
            ]),
        },
    ]
}
