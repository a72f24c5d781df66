use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{
    lex::{SOURCE_NAME, Token, TokenKind},
    tree::Node,
};

/// Parenthesis nesting accepted unless the caller picks another limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tree height accepted unless the caller picks another limit. Every tree
/// operation recurses once per level, so this bounds their stack usage.
pub const DEFAULT_MAX_HEIGHT: usize = 2048;

/// Recursion limits enforced while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest parenthesis nesting
    pub max_depth: usize,
    /// Tallest tree, counting leaves as height 1
    pub max_height: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ParseError {
    #[error("Unexpected token '{token}'")]
    #[diagnostic(help("expected a number, a variable or `(` here"))]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
        token: String,
    },

    #[error("unexpected end of input")]
    #[diagnostic(help("the expression ended where a number, a variable or `(` was expected"))]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("input ends here")]
        span: SourceSpan,
    },

    #[error("expected closing parenthesis")]
    MissingClosingParen {
        #[source_code]
        src: NamedSource<String>,
        #[label("this parenthesis is never closed")]
        open: SourceSpan,
        #[label("expected `)` here")]
        span: SourceSpan,
    },

    /// Tokens left over after a complete expression. These are rejected
    /// rather than ignored, so `2 3` is an error instead of parsing as `2`.
    #[error("Unexpected token '{token}' after the end of the expression")]
    #[diagnostic(help("join it to the expression with an operator, or remove it"))]
    TrailingInput {
        #[source_code]
        src: NamedSource<String>,
        #[label("leftover input starts here")]
        span: SourceSpan,
        token: String,
    },

    #[error("parentheses nest deeper than {max_depth} levels")]
    TooDeep {
        #[source_code]
        src: NamedSource<String>,
        #[label("limit reached here")]
        span: SourceSpan,
        max_depth: usize,
    },

    #[error("expression tree height exceeds {max_height}")]
    #[diagnostic(help("split the expression or raise the tree height limit"))]
    TooTall {
        #[source_code]
        src: NamedSource<String>,
        #[label("limit reached at this operator")]
        span: SourceSpan,
        max_height: usize,
    },

    #[error("invalid numeric literal '{literal}'")]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,
        #[label("this numeric literal")]
        span: SourceSpan,
        literal: String,
        #[source]
        cause: std::num::ParseFloatError,
    },
}

/// Recursive descent parser over a token sequence, one token of lookahead.
///
/// ```text
/// expression := term (("+"|"-") term)*
/// term       := factor (("*"|"/") factor)*
/// factor     := NUMBER | VARIABLE | "(" expression ")"
/// ```
pub struct Parser<'de> {
    whole: &'de str,
    tokens: Vec<Token<'de>>,
    pos: usize,
    max_depth: usize,
    max_height: usize,
    nesting: usize,
}

impl<'de> Parser<'de> {
    /// `whole` is the text the tokens were cut from; it is only used for
    /// diagnostics.
    pub fn new(whole: &'de str, tokens: Vec<Token<'de>>) -> Self {
        Parser {
            whole,
            tokens,
            pos: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            nesting: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_limits(self, limits: Limits) -> Self {
        self.with_max_depth(limits.max_depth)
            .with_max_height(limits.max_height)
    }

    /// Parses the full token sequence into a single tree. Leftover tokens
    /// after a complete expression are an error.
    pub fn parse_expression(mut self) -> Result<Node, ParseError> {
        let (node, _) = self.expression()?;
        if let Some(token) = self.current() {
            return Err(ParseError::TrailingInput {
                src: self.source(),
                span: token.span(),
                token: token.literal.to_string(),
            });
        }
        tracing::trace!(tree = %node, "parsed expression");
        Ok(node)
    }

    fn current(&self) -> Option<Token<'de>> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Returns the lookahead if it is one of the given operators.
    fn operator(&self, ops: &[&str]) -> Option<Token<'de>> {
        self.current().filter(|token| {
            token.kind == TokenKind::Operator && ops.iter().any(|op| *op == token.literal)
        })
    }

    fn expression(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut height) = self.term()?;
        while let Some(op) = self.operator(&["+", "-"]) {
            self.advance();
            let (right, right_height) = self.term()?;
            node = match op.literal {
                "+" => Node::add(node, right),
                _ => Node::sub(node, right),
            };
            height = self.grow(height, right_height, op)?;
        }
        Ok((node, height))
    }

    fn term(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut height) = self.factor()?;
        while let Some(op) = self.operator(&["*", "/"]) {
            self.advance();
            let (right, right_height) = self.factor()?;
            node = match op.literal {
                "*" => Node::mul(node, right),
                _ => Node::div(node, right),
            };
            height = self.grow(height, right_height, op)?;
        }
        Ok((node, height))
    }

    fn factor(&mut self) -> Result<(Node, usize), ParseError> {
        let Some(token) = self.current() else {
            return Err(self.eof());
        };
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = match token.literal.parse::<f64>() {
                    Ok(value) => value,
                    Err(cause) => {
                        return Err(ParseError::InvalidNumber {
                            src: self.source(),
                            span: token.span(),
                            literal: token.literal.to_string(),
                            cause,
                        });
                    }
                };
                Ok((Node::Constant(value), 1))
            }
            TokenKind::Variable => {
                self.advance();
                Ok((Node::variable(token.literal), 1))
            }
            TokenKind::LeftParen => {
                if self.nesting >= self.max_depth {
                    return Err(self.too_deep(token));
                }
                self.nesting += 1;
                self.advance();
                let inner = self.expression()?;
                self.nesting -= 1;
                match self.current() {
                    Some(close) if close.kind == TokenKind::RightParen => {
                        self.advance();
                        Ok(inner)
                    }
                    found => Err(ParseError::MissingClosingParen {
                        src: self.source(),
                        open: token.span(),
                        span: found.map_or_else(|| self.end_span(), |found| found.span()),
                    }),
                }
            }
            TokenKind::Operator | TokenKind::RightParen => Err(ParseError::UnexpectedToken {
                src: self.source(),
                span: token.span(),
                token: token.literal.to_string(),
            }),
        }
    }

    /// Height of a new binary node over children of the given heights.
    fn grow(&self, left: usize, right: usize, op: Token<'de>) -> Result<usize, ParseError> {
        let height = 1 + left.max(right);
        if height > self.max_height {
            return Err(ParseError::TooTall {
                src: self.source(),
                span: op.span(),
                max_height: self.max_height,
            });
        }
        Ok(height)
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(SOURCE_NAME, self.whole.to_string())
    }

    fn end_span(&self) -> SourceSpan {
        SourceSpan::from(self.whole.len()..self.whole.len())
    }

    fn eof(&self) -> ParseError {
        ParseError::UnexpectedEof {
            src: self.source(),
            span: self.end_span(),
        }
    }

    fn too_deep(&self, token: Token<'de>) -> ParseError {
        ParseError::TooDeep {
            src: self.source(),
            span: token.span(),
            max_depth: self.max_depth,
        }
    }
}
