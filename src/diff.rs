use crate::tree::Node;

impl Node {
    /// Builds the raw derivative with respect to `var`. The result is not
    /// simplified; run [`Node::simplify`] on it for a readable form.
    ///
    /// Subtrees reused by the product and quotient rules are deep copies,
    /// so the derivative shares nothing with `self`.
    pub fn differentiate(&self, var: &str) -> Node {
        match self {
            Node::Constant(_) => Node::Constant(0.0),
            Node::Variable(name) => Node::Constant(if name == var { 1.0 } else { 0.0 }),
            Node::Add(f, g) => Node::add(f.differentiate(var), g.differentiate(var)),
            Node::Subtract(f, g) => Node::sub(f.differentiate(var), g.differentiate(var)),
            // f * g' + f' * g
            Node::Multiply(f, g) => Node::add(
                Node::mul((**f).clone(), g.differentiate(var)),
                Node::mul(f.differentiate(var), (**g).clone()),
            ),
            // (f' * g - f * g') / (g * g)
            Node::Divide(f, g) => Node::div(
                Node::sub(
                    Node::mul(f.differentiate(var), (**g).clone()),
                    Node::mul((**f).clone(), g.differentiate(var)),
                ),
                Node::mul((**g).clone(), (**g).clone()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Node {
        Node::constant(n)
    }

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    #[test]
    fn leaves() {
        assert_eq!(num(7.0).differentiate("x"), num(0.0));
        assert_eq!(var("x").differentiate("x"), num(1.0));
        assert_eq!(var("y").differentiate("x"), num(0.0));
    }

    #[test]
    fn linearity() {
        assert_eq!(
            Node::add(var("x"), var("y")).differentiate("x"),
            Node::add(num(1.0), num(0.0))
        );
        assert_eq!(
            Node::sub(var("x"), num(3.0)).differentiate("x"),
            Node::sub(num(1.0), num(0.0))
        );
    }

    #[test]
    fn product_rule() {
        let tree = Node::mul(num(2.0), var("x"));
        assert_eq!(
            tree.differentiate("x"),
            Node::add(
                Node::mul(num(2.0), num(1.0)),
                Node::mul(num(0.0), var("x"))
            )
        );
    }

    #[test]
    fn quotient_rule() {
        let tree = Node::div(num(1.0), var("x"));
        assert_eq!(
            tree.differentiate("x"),
            Node::div(
                Node::sub(
                    Node::mul(num(0.0), var("x")),
                    Node::mul(num(1.0), num(1.0))
                ),
                Node::mul(var("x"), var("x"))
            )
        );
    }

    #[test]
    fn leaves_the_input_untouched() {
        let tree = Node::mul(var("x"), Node::add(var("x"), num(1.0)));
        let before = tree.clone();
        let _ = tree.differentiate("x");
        assert_eq!(tree, before);
    }

    #[test]
    fn renders_raw_derivative() {
        let tree = Node::mul(var("x"), var("x"));
        assert_eq!(
            tree.differentiate("x").to_string(),
            "((x * 1.0) + (1.0 * x))"
        );
    }
}
