use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::tree::Node;

#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum EvalError {
    #[error("unbound variable `{name}`")]
    #[diagnostic(help("provide a value for `{name}`"))]
    UnboundVariable { name: String },

    #[error("division by zero")]
    #[diagnostic(help("the right operand of `/` evaluated to exactly zero"))]
    DivisionByZero,
}

impl Node {
    /// Evaluates the tree with the given variable values. Every variant
    /// takes the bindings, constants simply ignore them.
    pub fn evaluate(&self, bindings: &HashMap<String, f64>) -> Result<f64, EvalError> {
        Ok(match self {
            Node::Constant(value) => *value,
            Node::Variable(name) => match bindings.get(name) {
                Some(value) => *value,
                None => return Err(EvalError::UnboundVariable { name: name.clone() }),
            },
            Node::Add(left, right) => left.evaluate(bindings)? + right.evaluate(bindings)?,
            Node::Subtract(left, right) => left.evaluate(bindings)? - right.evaluate(bindings)?,
            Node::Multiply(left, right) => left.evaluate(bindings)? * right.evaluate(bindings)?,
            Node::Divide(left, right) => {
                let lhs = left.evaluate(bindings)?;
                let rhs = right.evaluate(bindings)?;
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs / rhs
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lex::tokenize, parse::Parser};
    use test_case::test_case;

    fn eval(input: &str, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
        let tree = Parser::new(input, tokenize(input).unwrap())
            .parse_expression()
            .unwrap();
        let bindings = bindings
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        tree.evaluate(&bindings)
    }

    #[test_case("2+3*4" => Ok(14.0) ; "precedence")]
    #[test_case("(2+3)*4" => Ok(20.0) ; "parentheses")]
    #[test_case("10-4-3" => Ok(3.0) ; "left associative subtraction")]
    #[test_case("16/4/2" => Ok(2.0) ; "left associative division")]
    #[test_case("1/4" => Ok(0.25) ; "fractional result")]
    #[test_case("7" => Ok(7.0) ; "single constant")]
    fn constants_only(input: &str) -> Result<f64, EvalError> {
        eval(input, &[])
    }

    #[test]
    fn constant_ignores_bindings() {
        let bindings = HashMap::from([("x".to_string(), 9.0)]);
        assert_eq!(Node::constant(3.0).evaluate(&bindings), Ok(3.0));
        assert_eq!(Node::constant(3.0).evaluate(&HashMap::new()), Ok(3.0));
    }

    #[test]
    fn resolves_variables() {
        assert_eq!(eval("2*x + y", &[("x", 3.0), ("y", 0.5)]), Ok(6.5));
    }

    #[test]
    fn unbound_variable_names_the_variable() {
        assert_eq!(
            eval("x + y", &[("x", 1.0)]),
            Err(EvalError::UnboundVariable {
                name: "y".to_string()
            })
        );
    }

    #[test_case("x/0", &[("x", 5.0)] ; "literal zero")]
    #[test_case("1/(x-x)", &[("x", 2.0)] ; "computed zero")]
    #[test_case("1/(0-0*1)", &[] ; "zero from constants")]
    fn division_by_zero(input: &str, bindings: &[(&str, f64)]) {
        assert_eq!(eval(input, bindings), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn zero_numerator_is_fine() {
        assert_eq!(eval("0/x", &[("x", 2.0)]), Ok(0.0));
    }
}
