//! A small computer algebra system over `+ - * /`, numbers and variables.
//!
//! An expression is tokenized and parsed once into a [`Node`] tree, which
//! can then be evaluated, differentiated and simplified:
//!
//! ```
//! use std::collections::HashMap;
//! use cas::Cas;
//!
//! let cas = Cas::new("(2 * x) + 5").unwrap();
//! assert_eq!(cas.differentiate("x"), "2.0");
//! assert_eq!(cas.simplify(), "((2.0 * x) + 5.0)");
//!
//! let bindings = HashMap::from([("x".to_string(), 4.0)]);
//! assert_eq!(cas.evaluate(&bindings).unwrap(), "13.0");
//! ```

use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

mod diff;
pub mod eval;
pub mod lex;
pub mod parse;
mod simplify;
pub mod tree;

pub use eval::EvalError;
pub use lex::{LexError, Lexer, Token, TokenKind, tokenize};
pub use parse::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT, Limits, ParseError, Parser};
pub use tree::{DisplayNumber, Node};

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

/// Tokenizes and parses `input` into a tree.
pub fn parse(input: &str, limits: Limits) -> Result<Node, Error> {
    let tokens = tokenize(input)?;
    tracing::trace!(count = tokens.len(), "tokenized expression");
    let tree = Parser::new(input, tokens)
        .with_limits(limits)
        .parse_expression()?;
    Ok(tree)
}

/// Parses and evaluates a single expression.
pub fn eval(input: &str, bindings: &HashMap<String, f64>) -> Result<f64, Error> {
    let tree = parse(input, Limits::default())?;
    Ok(tree.evaluate(bindings)?)
}

/// A parsed expression with string-returning operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Cas {
    expression: String,
    tree: Node,
}

impl Cas {
    pub fn new(expression: &str) -> Result<Self, Error> {
        Self::with_limits(expression, Limits::default())
    }

    pub fn with_max_depth(expression: &str, max_depth: usize) -> Result<Self, Error> {
        let limits = Limits {
            max_depth,
            ..Limits::default()
        };
        Self::with_limits(expression, limits)
    }

    pub fn with_limits(expression: &str, limits: Limits) -> Result<Self, Error> {
        let tree = parse(expression, limits)?;
        tracing::debug!(expression, tree = %tree, "built expression");
        Ok(Self {
            expression: expression.to_string(),
            tree,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn evaluate(&self, bindings: &HashMap<String, f64>) -> Result<String, Error> {
        let value = self.tree.evaluate(bindings)?;
        tracing::debug!(value, "evaluated");
        Ok(DisplayNumber(value).to_string())
    }

    /// Derivative with respect to `var`, simplified.
    pub fn differentiate(&self, var: &str) -> String {
        let derivative = self.tree.differentiate(var);
        tracing::trace!(raw = %derivative, "differentiated");
        derivative.simplify().to_string()
    }

    pub fn simplify(&self) -> String {
        self.tree.simplify().to_string()
    }
}
