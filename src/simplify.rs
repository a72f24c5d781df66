use std::collections::HashMap;

use crate::tree::Node;

impl Node {
    /// Simplifies the tree in a single bottom-up pass.
    ///
    /// Children are simplified first, then one local rule is tried on the
    /// node itself:
    ///
    /// - `Add`: fold two constants, drop a zero on either side;
    /// - `Subtract`: fold two constants, drop a zero on the right;
    /// - `Multiply`: fold two constants, a zero on either side gives zero,
    ///   drop a one on either side;
    /// - `Divide`: fold two constants unless the divisor is zero, drop a one
    ///   on the right.
    ///
    /// Nothing else is normalized: like terms are not collected and operands
    /// are never reordered.
    pub fn simplify(&self) -> Node {
        match self {
            Node::Constant(_) | Node::Variable(_) => self.clone(),
            Node::Add(left, right) => {
                let left = left.simplify();
                let right = right.simplify();
                if let (Some(lhs), Some(rhs)) = (left.value(), right.value()) {
                    return Node::Constant(lhs + rhs);
                }
                if left.is_constant(0.0) {
                    return right;
                }
                if right.is_constant(0.0) {
                    return left;
                }
                Node::add(left, right)
            }
            Node::Subtract(left, right) => {
                let left = left.simplify();
                let right = right.simplify();
                if let (Some(lhs), Some(rhs)) = (left.value(), right.value()) {
                    return Node::Constant(lhs - rhs);
                }
                if right.is_constant(0.0) {
                    return left;
                }
                Node::sub(left, right)
            }
            Node::Multiply(left, right) => {
                let left = left.simplify();
                let right = right.simplify();
                if let (Some(lhs), Some(rhs)) = (left.value(), right.value()) {
                    return Node::Constant(lhs * rhs);
                }
                if left.is_constant(0.0) || right.is_constant(0.0) {
                    return Node::Constant(0.0);
                }
                if left.is_constant(1.0) {
                    return right;
                }
                if right.is_constant(1.0) {
                    return left;
                }
                Node::mul(left, right)
            }
            Node::Divide(left, right) => {
                let left = left.simplify();
                let right = right.simplify();
                if let Some(quotient) = fold_quotient(&left, &right) {
                    return Node::Constant(quotient);
                }
                if right.is_constant(1.0) {
                    return left;
                }
                Node::div(left, right)
            }
        }
    }
}

/// Divides two constant operands by their evaluated values. A zero divisor
/// is left for `evaluate` to report.
fn fold_quotient(left: &Node, right: &Node) -> Option<f64> {
    if left.value().is_none() || right.value().is_none() {
        return None;
    }
    let no_bindings = HashMap::new();
    let lhs = left.evaluate(&no_bindings).ok()?;
    let rhs = right.evaluate(&no_bindings).ok()?;
    if rhs == 0.0 {
        return None;
    }
    Some(lhs / rhs)
}
