use std::collections::HashMap;

use cas::{Cas, Error, EvalError, ParseError};
use test_case::test_case;

fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn evaluates_with_precedence() {
    let cas = Cas::new("2+3*4").unwrap();
    assert_eq!(cas.evaluate(&HashMap::new()).unwrap(), "14.0");
}

#[test]
fn differentiates_linear_expression() {
    let cas = Cas::new("(2*x)+5").unwrap();
    assert_eq!(cas.differentiate("x"), "2.0");
}

#[test]
fn rejects_unknown_character() {
    match Cas::new("3 + @") {
        Err(Error::Lex(e)) => {
            assert_eq!(e.token, '@');
            assert_eq!(e.offset(), 4);
        }
        other => panic!("expected a lex error, got {other:?}"),
    }
}

#[test]
fn rejects_operator_without_operand() {
    assert!(matches!(
        Cas::new("2 + *"),
        Err(Error::Parse(ParseError::UnexpectedToken { .. }))
    ));
}

#[test]
fn simplifies_added_zero() {
    assert_eq!(Cas::new("x+0").unwrap().simplify(), "x");
}

#[test]
fn reports_division_by_zero() {
    let cas = Cas::new("x/0").unwrap();
    assert!(matches!(
        cas.evaluate(&bindings(&[("x", 5.0)])),
        Err(Error::Eval(EvalError::DivisionByZero))
    ));
}

#[test]
fn folds_constant_quotient() {
    assert_eq!(Cas::new("2/4").unwrap().simplify(), "0.5");
}

#[test]
fn reports_unbound_variable() {
    let cas = Cas::new("x * y").unwrap();
    match cas.evaluate(&bindings(&[("x", 1.0)])) {
        Err(Error::Eval(EvalError::UnboundVariable { name })) => assert_eq!(name, "y"),
        other => panic!("expected an unbound variable, got {other:?}"),
    }
}

#[test_case("x*x", "x" => "(x + x)" ; "square")]
#[test_case("3*x*x", "x" => "((3.0 * x) + (3.0 * x))" ; "coefficient")]
#[test_case("1/x", "x" => "(-1.0 / (x * x))" ; "reciprocal")]
#[test_case("x/2", "x" => "0.5" ; "constant divisor folds")]
#[test_case("y*x + y", "x" => "y" ; "other variables are constants")]
#[test_case("y*x + y", "z" => "0.0" ; "unrelated variable")]
#[test_case("5", "x" => "0.0" ; "constant")]
fn differentiates(input: &str, var: &str) -> String {
    Cas::new(input).unwrap().differentiate(var)
}

#[test]
fn derivative_evaluates_numerically() {
    let cas = Cas::new("(x*x - 1) / (x + 1)").unwrap();
    let derivative = Cas::new(&cas.differentiate("x")).unwrap();
    for x in [0.5, 2.0, 10.0] {
        let value: f64 = derivative
            .evaluate(&bindings(&[("x", x)]))
            .unwrap()
            .parse()
            .unwrap();
        assert!((value - 1.0).abs() < 1e-12, "d/dx at {x} was {value}");
    }
}

#[test]
fn simplified_output_parses_back() {
    let simplified = Cas::new("(2+3)*x - y/1").unwrap().simplify();
    assert_eq!(simplified, "((5.0 * x) - y)");
    assert_eq!(Cas::new(&simplified).unwrap().simplify(), simplified);
}

#[test]
fn errors_render_as_diagnostics() {
    let Err(e) = Cas::new("(1 + 2") else {
        panic!("expected an error");
    };
    assert_eq!(e.to_string(), "expected closing parenthesis");
    let report = format!("{:?}", miette::Report::new(e));
    assert!(report.contains("(1 + 2"));
}

#[test]
fn long_sums_are_not_nesting() {
    let sum = vec!["1"; 300].join(" + ");
    let cas = Cas::new(&sum).unwrap();
    assert_eq!(cas.evaluate(&HashMap::new()).unwrap(), "300.0");
    assert_eq!(cas.simplify(), "300.0");

    let terms = vec!["x"; 500].join(" + ");
    assert_eq!(Cas::new(&terms).unwrap().differentiate("x"), "500.0");
}
