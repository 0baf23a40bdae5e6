//! Rule-expression compiler
//!
//! ```text
//! expr      := section ('|' section)*
//! section   := (prefix ':')? rulechain
//! prefix    := 't' | 'n' | 'f'
//! rulechain := rule ('>' rule)*
//! rule      := ident ('(' arg (',' arg)* ')')?
//! arg       := int | float | "string"
//! ```
//!
//! Every rule name is resolved against the registry while compiling, so a
//! [`CompiledProgram`] can be executed without any further lookups.

use super::rules::{Literal, RuleCall, RuleId};
use super::Channel;
use crate::error::ParseError;

/// Expression used when none is configured
pub const DEFAULT_RULES: &str = "t:legacy_t|n:_t>str_filesafe|f:legacy_f";

/// Name of the title back-reference
const BACKREF: &str = "_t";

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Where a channel pipeline starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// Value chosen from the request cardinality
    Request,
    /// The already computed title (`_t`)
    Title,
}

/// The rule pipeline of one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProgram {
    pub seed: Seed,
    pub steps: Vec<RuleCall>,
}

impl ChannelProgram {
    fn new(seed: Seed, steps: Vec<RuleCall>) -> Self {
        Self { seed, steps }
    }
}

/// A fully resolved rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    title: ChannelProgram,
    filename: ChannelProgram,
    folder: ChannelProgram,
}

impl CompiledProgram {
    pub fn channel(&self, channel: Channel) -> &ChannelProgram {
        match channel {
            Channel::Title => &self.title,
            Channel::Filename => &self.filename,
            Channel::Folder => &self.folder,
        }
    }
}

impl Default for CompiledProgram {
    fn default() -> Self {
        Self {
            title: default_section(Channel::Title),
            filename: default_section(Channel::Filename),
            folder: default_section(Channel::Folder),
        }
    }
}

/// Compile a rule expression; `None` or a blank string gives the default program
pub fn compile(expression: Option<&str>) -> ParseResult<CompiledProgram> {
    let Some(expression) = expression.filter(|e| !e.trim().is_empty()) else {
        return Ok(CompiledProgram::default());
    };

    let tokens = Lexer::new(expression).tokenize()?;
    let sections = Parser::new(tokens).parse()?;

    let mut program: [Option<ChannelProgram>; 3] = [None, None, None];
    let several = sections.len() > 1;
    for section in sections {
        let channel = match section.prefix {
            Some(channel) => channel,
            None if several => {
                return Err(ParseError::UnprefixedSection {
                    position: section.position,
                })
            }
            None => Channel::Title,
        };
        let slot = &mut program[channel as usize];
        if slot.is_some() {
            return Err(ParseError::DuplicateSection {
                section: channel.prefix(),
                position: section.position,
            });
        }
        *slot = Some(resolve_section(channel, section.rules)?);
    }

    let [title, filename, folder] = program;
    let compiled = CompiledProgram {
        title: title.unwrap_or_else(|| default_section(Channel::Title)),
        filename: filename.unwrap_or_else(|| default_section(Channel::Filename)),
        folder: folder.unwrap_or_else(|| default_section(Channel::Folder)),
    };
    tracing::debug!(expression, "Compiled rule expression");
    Ok(compiled)
}

fn default_section(channel: Channel) -> ChannelProgram {
    match channel {
        Channel::Title => ChannelProgram::new(Seed::Request, vec![RuleCall::new(RuleId::LegacyT)]),
        Channel::Filename => {
            ChannelProgram::new(Seed::Title, vec![RuleCall::new(RuleId::StrFilesafe)])
        }
        Channel::Folder => ChannelProgram::new(Seed::Request, vec![RuleCall::new(RuleId::LegacyF)]),
    }
}

fn resolve_section(channel: Channel, rules: Vec<RawRule>) -> ParseResult<ChannelProgram> {
    let mut seed = Seed::Request;
    let mut steps = Vec::with_capacity(rules.len());
    for (index, rule) in rules.into_iter().enumerate() {
        if rule.name == BACKREF {
            if index != 0 || channel == Channel::Title {
                return Err(ParseError::MisplacedBackref {
                    position: rule.position,
                });
            }
            if !rule.args.is_empty() {
                return Err(ParseError::Arity {
                    rule: BACKREF,
                    expected: 0,
                    found: rule.args.len(),
                    position: rule.position,
                });
            }
            seed = Seed::Title;
            continue;
        }
        let id = RuleId::from_name(&rule.name).ok_or_else(|| ParseError::UnknownRule {
            name: rule.name.clone(),
            position: rule.position,
        })?;
        steps.push(RuleCall::resolve(id, rule.args, rule.position)?);
    }
    Ok(ChannelProgram::new(seed, steps))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Colon,
    Pipe,
    Gt,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::Int(v) => v.to_string(),
            Token::Float(v) => v.to_string(),
            Token::Str(s) => format!("\"{}\"", s),
            Token::Colon => "':'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of expression".to_string(),
        }
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn tokenize(mut self) -> ParseResult<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();
        loop {
            self.take_while(char::is_whitespace);
            let start = self.pos;
            let Some(c) = self.peek() else {
                tokens.push((Token::Eof, start));
                return Ok(tokens);
            };
            let token = match c {
                ':' | '|' | '>' | '(' | ')' | ',' => {
                    self.bump();
                    match c {
                        ':' => Token::Colon,
                        '|' => Token::Pipe,
                        '>' => Token::Gt,
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        _ => Token::Comma,
                    }
                }
                '"' => self.string(start)?,
                c if c.is_ascii_digit() || c == '-' || c == '+' => self.number(start)?,
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let ident = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    Token::Ident(ident.to_string())
                }
                ch => return Err(ParseError::UnexpectedChar { ch, position: start }),
            };
            tokens.push((token, start));
        }
    }

    fn string(&mut self, start: usize) -> ParseResult<Token> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::Str(value)),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(ParseError::UnterminatedString { position: start }),
                },
                Some(c) => value.push(c),
                None => return Err(ParseError::UnterminatedString { position: start }),
            }
        }
    }

    fn number(&mut self, start: usize) -> ParseResult<Token> {
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            let ch = self.peek().unwrap_or(' ');
            return Err(ParseError::UnexpectedChar {
                ch,
                position: self.pos,
            });
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            self.bump();
            self.take_while(|c| c.is_ascii_digit());
            is_float = true;
        }
        let text = &self.src[start..self.pos];
        let invalid = || ParseError::UnexpectedToken {
            expected: "a number",
            found: format!("'{}'", text),
            position: start,
        };
        if is_float {
            text.parse().map(Token::Float).map_err(|_| invalid())
        } else {
            text.parse().map(Token::Int).map_err(|_| invalid())
        }
    }
}

struct RawRule {
    name: String,
    args: Vec<Literal>,
    position: usize,
}

struct RawSection {
    prefix: Option<Channel>,
    rules: Vec<RawRule>,
    position: usize,
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.index + offset)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn position(&self) -> usize {
        match self.tokens.get(self.index).or(self.tokens.last()) {
            Some((_, position)) => *position,
            None => 0,
        }
    }

    fn next(&mut self) -> (Token, usize) {
        let position = self.position();
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        (token, position)
    }

    fn unexpected<T>(&self, expected: &'static str) -> ParseResult<T> {
        Err(ParseError::UnexpectedToken {
            expected,
            found: self.peek().describe(),
            position: self.position(),
        })
    }

    fn parse(mut self) -> ParseResult<Vec<RawSection>> {
        let mut sections = vec![self.section()?];
        while *self.peek() == Token::Pipe {
            self.next();
            sections.push(self.section()?);
        }
        if *self.peek() != Token::Eof {
            return self.unexpected("'|', '>' or end of expression");
        }
        Ok(sections)
    }

    fn section(&mut self) -> ParseResult<RawSection> {
        let position = self.position();
        let prefix = match (self.peek(), self.peek_at(1)) {
            (Token::Ident(name), Token::Colon) => Some(name.clone()),
            _ => None,
        };
        let prefix = match prefix {
            Some(name) => {
                let channel = Channel::from_prefix(&name)
                    .ok_or(ParseError::UnknownSection { prefix: name, position })?;
                self.next();
                self.next();
                Some(channel)
            }
            None => None,
        };

        let mut rules = vec![self.rule()?];
        while *self.peek() == Token::Gt {
            self.next();
            rules.push(self.rule()?);
        }
        Ok(RawSection {
            prefix,
            rules,
            position,
        })
    }

    fn rule(&mut self) -> ParseResult<RawRule> {
        if !matches!(self.peek(), Token::Ident(_)) {
            return self.unexpected("a rule name");
        }
        let (Token::Ident(name), position) = self.next() else {
            return self.unexpected("a rule name");
        };

        let mut args = Vec::new();
        if *self.peek() == Token::LParen {
            self.next();
            if *self.peek() != Token::RParen {
                loop {
                    args.push(self.literal()?);
                    if *self.peek() == Token::Comma {
                        self.next();
                    } else {
                        break;
                    }
                }
            }
            if *self.peek() != Token::RParen {
                return self.unexpected("')'");
            }
            self.next();
        }
        Ok(RawRule {
            name,
            args,
            position,
        })
    }

    fn literal(&mut self) -> ParseResult<Literal> {
        let literal = match self.peek() {
            Token::Int(v) => Literal::Int(*v),
            Token::Float(v) => Literal::Float(*v),
            Token::Str(s) => Literal::Str(s.clone()),
            _ => return self.unexpected("an argument"),
        };
        self.next();
        Ok(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namegen::rules::Arg;

    fn ids(program: &ChannelProgram) -> Vec<&'static str> {
        program.steps.iter().map(|c| c.rule().name()).collect()
    }

    #[test]
    fn test_default_program() {
        assert_eq!(compile(None).unwrap(), compile(Some(DEFAULT_RULES)).unwrap());
        assert_eq!(compile(Some("   ")).unwrap(), CompiledProgram::default());
    }

    #[test]
    fn test_unprefixed_single_section_is_title() {
        let program = compile(Some("p_title")).unwrap();
        assert_eq!(ids(program.channel(Channel::Title)), vec!["p_title"]);
        assert_eq!(program.channel(Channel::Filename).seed, Seed::Title);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let program = compile(Some("n:fc_rm>p_title>str_filesafe")).unwrap();
        assert_eq!(ids(program.channel(Channel::Title)), vec!["legacy_t"]);
        assert_eq!(ids(program.channel(Channel::Folder)), vec!["legacy_f"]);
        assert_eq!(
            ids(program.channel(Channel::Filename)),
            vec!["fc_rm", "p_title", "str_filesafe"]
        );
    }

    #[test]
    fn test_arguments_and_whitespace() {
        let program = compile(Some(r#" t : s_title > ss_max_len( 12 ) > to_string | n:_t>str_filesafe("-", ".")"#))
            .unwrap();
        let title = program.channel(Channel::Title);
        assert_eq!(title.steps[1].args(), &[Arg::Int(12)]);
        let filename = program.channel(Channel::Filename);
        assert_eq!(filename.seed, Seed::Title);
        assert_eq!(
            filename.steps[0].args(),
            &[Arg::Str("-".into()), Arg::Str(".".into())]
        );
    }

    #[test]
    fn test_string_escapes() {
        let program = compile(Some(r#"n:_t>str_replace_space("\"")"#)).unwrap();
        assert_eq!(
            program.channel(Channel::Filename).steps[0].args(),
            &[Arg::Str("\"".into())]
        );
    }

    #[test]
    fn test_unknown_rule_reports_name_and_position() {
        let err = compile(Some("t:p_title>fc_fulleee")).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownRule {
                name: "fc_fulleee".into(),
                position: 10
            }
        );
    }

    #[test]
    fn test_duplicate_section() {
        let err = compile(Some("t:p_title|t:v_title")).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateSection {
                section: 't',
                position: 10
            }
        );
    }

    #[test]
    fn test_unknown_section() {
        let err = compile(Some("x:p_title")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownSection { ref prefix, position: 0 } if prefix == "x"
        ));
    }

    #[test]
    fn test_unprefixed_section_among_several() {
        let err = compile(Some("p_title|n:_t>str_filesafe")).unwrap_err();
        assert_eq!(err, ParseError::UnprefixedSection { position: 0 });
    }

    #[test]
    fn test_backref_placement() {
        assert!(matches!(
            compile(Some("t:_t>str_filesafe")),
            Err(ParseError::MisplacedBackref { position: 2 })
        ));
        assert!(matches!(
            compile(Some("n:p_title>_t")),
            Err(ParseError::MisplacedBackref { position: 10 })
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            compile(Some("t:p_title>")),
            Err(ParseError::UnexpectedToken { expected: "a rule name", .. })
        ));
        assert!(matches!(
            compile(Some("t:p_title$")),
            Err(ParseError::UnexpectedChar { ch: '$', position: 9 })
        ));
        assert!(matches!(
            compile(Some(r#"t:ss_first("abc"#)),
            Err(ParseError::UnterminatedString { position: 11 })
        ));
        assert!(matches!(
            compile(Some("t:ss_first(1 2)")),
            Err(ParseError::UnexpectedToken { expected: "')'", .. })
        ));
    }

    #[test]
    fn test_argument_types_are_checked() {
        assert!(matches!(
            compile(Some("t:s_title>ss_max_len(\"x\")")),
            Err(ParseError::ArgumentType { rule: "ss_max_len", .. })
        ));
    }
}
