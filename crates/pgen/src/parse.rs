use log::{debug, trace};

use crate::{
    ast::{Rule, RuleItem, RuleItemGroup, RuleItemKind},
    error::{GrammarError, GrammarErrorKind},
    lexer::Lexer,
    span::Span,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Postfix {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    Negate,
}

impl Postfix {
    fn symbol(self) -> char {
        match self {
            Postfix::ZeroOrMore => '*',
            Postfix::OneOrMore => '+',
            Postfix::ZeroOrOne => '?',
            Postfix::Negate => '^',
        }
    }
}

#[derive(Debug)]
enum Token {
    Item(RuleItem),
    Postfix(Postfix),
}

/// The body of a rule or group under construction.
///
/// Postfix tokens are folded into the last pushed item, which must exist and must not be an `Or`.
/// The group counter names groups `<name>_$g<counter>` in the order they are encountered.
struct SequenceBuilder {
    name: String,
    seq: Vec<RuleItem>,
    group_counter: u32,
}

impl SequenceBuilder {
    fn new(name: String) -> SequenceBuilder {
        Self {
            name,
            seq: Vec::new(),
            group_counter: 0,
        }
    }

    fn next_item(&mut self, l: &mut Lexer) -> Result<(), GrammarError> {
        let start = l.pos();
        match parse_rule_item(l, &self.name, &mut self.group_counter)? {
            Some(token) => self.push(token, l.span_since(start)),
            None => Err(unexpected(l)),
        }
    }

    fn push(&mut self, token: Token, span: Span) -> Result<(), GrammarError> {
        let postfix = match token {
            Token::Item(item) => {
                self.seq.push(item);
                return Ok(());
            }
            Token::Postfix(postfix) => postfix,
        };

        let last = match self.seq.last_mut() {
            Some(last) if !last.is_or() => last,
            _ => {
                let kind = GrammarErrorKind::DanglingPostfix(postfix.symbol());
                return Err(GrammarError::new(kind, span));
            }
        };

        match postfix {
            Postfix::ZeroOrMore => {
                last.optional = true;
                last.multiple = true;
            }
            Postfix::OneOrMore => last.multiple = true,
            Postfix::ZeroOrOne => last.optional = true,
            Postfix::Negate => {
                if !last.is_literal() {
                    return Err(GrammarError::new(GrammarErrorKind::NegateNonLiteral, span));
                }
                last.negate = true;
            }
        }

        trace!("{}: folded '{}' into {last}", self.name, postfix.symbol());
        Ok(())
    }

    fn finish(self) -> (String, Vec<RuleItem>) {
        (self.name, self.seq)
    }
}

fn unexpected(l: &Lexer) -> GrammarError {
    let start = l.pos();
    match l.peek_char() {
        Some(c) => GrammarError::new(
            GrammarErrorKind::UnexpectedCharacter(c),
            Span::new(start, start + c.len_utf8() as u32),
        ),
        None => GrammarError::new(GrammarErrorKind::UnexpectedEof, Span::at(start)),
    }
}

/// Parses a single item, operator, or postfix modifier.
///
/// Returns `None` at the end of input or when no production matches.
fn parse_rule_item(
    l: &mut Lexer,
    enclosing_name: &str,
    group_counter: &mut u32,
) -> Result<Option<Token>, GrammarError> {
    if l.is_empty() {
        return Ok(None);
    }

    if let Some(literal) = l.match_quoted_string() {
        return Ok(Some(Token::Item(RuleItem::literal(literal))));
    }
    if let Some(identifier) = l.match_identifier() {
        return Ok(Some(Token::Item(RuleItem::identifier(identifier))));
    }
    if let Some(group) = parse_group(l, enclosing_name, group_counter)? {
        return Ok(Some(Token::Item(RuleItem::new(RuleItemKind::Group(group)))));
    }

    let token = 'choice: {
        if l.match_literal("|") {
            break 'choice Token::Item(RuleItem::or());
        }
        if l.match_literal("*") {
            break 'choice Token::Postfix(Postfix::ZeroOrMore);
        }
        if l.match_literal("+") {
            break 'choice Token::Postfix(Postfix::OneOrMore);
        }
        if l.match_literal("?") {
            break 'choice Token::Postfix(Postfix::ZeroOrOne);
        }
        if l.match_literal("^") {
            break 'choice Token::Postfix(Postfix::Negate);
        }
        return Ok(None);
    };

    Ok(Some(token))
}

fn parse_group(
    l: &mut Lexer,
    enclosing_name: &str,
    group_counter: &mut u32,
) -> Result<Option<RuleItemGroup>, GrammarError> {
    let start = l.pos();
    if !l.match_literal("(") {
        return Ok(None);
    }

    let name = format!("{enclosing_name}_$g{group_counter}");
    *group_counter += 1;

    let mut builder = SequenceBuilder::new(name);
    loop {
        l.skip_whitespace();
        if l.match_literal(")") {
            break;
        }
        if l.is_empty() {
            let span = l.span_since(start);
            return Err(GrammarError::new(GrammarErrorKind::UnclosedGroup, span));
        }
        builder.next_item(l)?;
    }

    let (name, seq) = builder.finish();
    Ok(Some(RuleItemGroup { name, seq }))
}

fn parse_rule(l: &mut Lexer) -> Result<Rule, GrammarError> {
    let start = l.pos();
    let Some(name) = l.match_identifier() else {
        let mut err = unexpected(l);
        err.kind = GrammarErrorKind::ExpectedRuleName;
        return Err(err);
    };
    let span = l.span_since(start);

    l.skip_whitespace();
    if !l.match_literal(":") {
        return Err(GrammarError::new(
            GrammarErrorKind::MissingColon,
            Span::at(l.pos()),
        ));
    }

    let mut builder = SequenceBuilder::new(name.to_owned());
    loop {
        // trailing spaces must not hide the blank line which terminates the rule
        l.skip_horizontal_whitespace();
        if l.is_empty() || l.match_blank_line() {
            break;
        }
        l.skip_whitespace();
        if l.is_empty() {
            break;
        }
        builder.next_item(l)?;
    }

    let (name, seq) = builder.finish();
    if seq.is_empty() {
        return Err(GrammarError::new(GrammarErrorKind::EmptyRule, span));
    }

    debug!("parsed rule '{name}' with {} items", seq.len());
    Ok(Rule { name, span, seq })
}

/// Parses grammar text into its rules, in order of definition.
///
/// Rules are terminated by a blank line, `#` starts a comment which runs until the end of the line.
/// Identifiers are not resolved here.
pub fn parse(src: &str) -> Result<Vec<Rule>, GrammarError> {
    let mut l = Lexer::new(src);
    let mut rules = Vec::new();

    l.skip_whitespace();
    while !l.is_empty() {
        if l.match_literal("#") {
            l.skip_line();
            l.skip_whitespace();
            continue;
        }

        rules.push(parse_rule(&mut l)?);
        l.skip_whitespace();
    }

    debug!("parsed {} rules", rules.len());
    Ok(rules)
}
