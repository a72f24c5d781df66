use std::fmt::Display;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Name given to the expression text in rendered diagnostics.
pub(crate) const SOURCE_NAME: &str = "<expression>";

#[derive(Error, Debug, Diagnostic)]
#[error("Unexpected character '{token}'")]
#[diagnostic(help("expressions may only contain numbers, letters, `+ - * /` and parentheses"))]
pub struct LexError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this character")]
    bad_bit: SourceSpan,

    pub token: char,
}

impl LexError {
    /// Byte offset of the offending character.
    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

impl Token<'_> {
    pub(crate) fn span(&self) -> SourceSpan {
        SourceSpan::from(self.offset..self.offset + self.literal.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Variable,
    Operator,
    LeftParen,
    RightParen,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number => write!(f, "NUMBER"),
            TokenKind::Variable => write!(f, "VARIABLE"),
            TokenKind::Operator => write!(f, "OPERATOR"),
            TokenKind::LeftParen => write!(f, "LPAREN"),
            TokenKind::RightParen => write!(f, "RPAREN"),
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.literal)
    }
}

/// Splits the whole input into tokens, failing on the first character that
/// starts no token.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(input).collect()
}

pub struct Lexer<'de> {
    whole: &'de str,
    rest: &'de str,
    byte: usize,
    peeked: Option<Result<Token<'de>, LexError>>,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            whole: input,
            rest: input,
            byte: 0,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Option<&Result<Token<'de>, LexError>> {
        if self.peeked.is_some() {
            return self.peeked.as_ref();
        }
        self.peeked = self.next();
        self.peeked.as_ref()
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let offset = self.byte;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            enum Start {
                Variable,
                Number,
            }

            let process = |kind: TokenKind| {
                Some(Ok(Token {
                    kind,
                    literal,
                    offset,
                }))
            };

            let started = match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '+' | '-' | '*' | '/' => return process(TokenKind::Operator),
                'a'..='z' | 'A'..='Z' => Start::Variable,
                '0'..='9' => Start::Number,
                ' ' | '\t' => continue,
                c => {
                    // Drop the rest so a collecting caller stops here.
                    self.rest = "";
                    return Some(Err(LexError {
                        src: NamedSource::new(SOURCE_NAME, self.whole.to_string()),
                        bad_bit: SourceSpan::from(offset..self.byte),
                        token: c,
                    }));
                }
            };

            let end = match started {
                Start::Variable => cur
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(cur.len()),
                Start::Number => {
                    let digits = cur
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(cur.len());
                    if cur[digits..].starts_with('.') {
                        let fraction = &cur[digits + 1..];
                        digits
                            + 1
                            + fraction
                                .find(|c: char| !c.is_ascii_digit())
                                .unwrap_or(fraction.len())
                    } else {
                        digits
                    }
                }
            };

            let literal = &cur[..end];
            let extra_bytes = literal.len() - c.len_utf8();
            self.byte += extra_bytes;
            self.rest = &self.rest[extra_bytes..];

            let kind = match started {
                Start::Variable => TokenKind::Variable,
                Start::Number => TokenKind::Number,
            };
            return Some(Ok(Token {
                kind,
                literal,
                offset,
            }));
        }
    }
}
