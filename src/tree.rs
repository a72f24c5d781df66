use std::fmt::{self, Display, Formatter};

/// Expression tree nodes. Binary nodes own both children exclusively.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric literal
    Constant(f64),
    /// A named variable, resolved at evaluation time
    Variable(String),
    /// <left> + <right>
    Add(Box<Node>, Box<Node>),
    /// <left> - <right>
    Subtract(Box<Node>, Box<Node>),
    /// <left> * <right>
    Multiply(Box<Node>, Box<Node>),
    /// <left> / <right>
    Divide(Box<Node>, Box<Node>),
}

impl Node {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn add(left: Node, right: Node) -> Self {
        Self::Add(Box::new(left), Box::new(right))
    }

    pub fn sub(left: Node, right: Node) -> Self {
        Self::Subtract(Box::new(left), Box::new(right))
    }

    pub fn mul(left: Node, right: Node) -> Self {
        Self::Multiply(Box::new(left), Box::new(right))
    }

    pub fn div(left: Node, right: Node) -> Self {
        Self::Divide(Box::new(left), Box::new(right))
    }

    /// If the node is a constant, get `Some(constant)`. Else, get `None`.
    pub fn value(&self) -> Option<f64> {
        if let Self::Constant(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Check whether the node is a constant carrying exactly `value`.
    pub fn is_constant(&self, value: f64) -> bool {
        self.value() == Some(value)
    }

    /// Height of the tree; leaves have height 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 1,
            Self::Add(left, right)
            | Self::Subtract(left, right)
            | Self::Multiply(left, right)
            | Self::Divide(left, right) => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{}", DisplayNumber(*value)),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Add(left, right) => write!(f, "({left} + {right})"),
            Self::Subtract(left, right) => write!(f, "({left} - {right})"),
            Self::Multiply(left, right) => write!(f, "({left} * {right})"),
            Self::Divide(left, right) => write!(f, "({left} / {right})"),
        }
    }
}

/// Renders a number the way constants appear in trees: integral values
/// always keep a `.0` suffix, everything else uses the shortest form that
/// reads back to the same `f64`.
#[derive(Debug, Clone, Copy)]
pub struct DisplayNumber(pub f64);

impl Display for DisplayNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n.is_finite() && n == n.trunc() {
            write!(f, "{n}.0")
        } else {
            write!(f, "{n}")
        }
    }
}
