//___________________________________TESTS____________________________________
// end-to-end: text -> tree -> derivative / series -> simplified tree -> LaTeX

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::ExprTree;
    use crate::symbolic::symbolic_errors::{DiffError, ParseError, SymbolicError};
    use crate::symbolic::utils::{linspace, numerical_derivative};
    use approx::assert_relative_eq;

    fn parse(text: &str) -> ExprTree {
        ExprTree::parse_expression(text).unwrap()
    }

    fn simplified_latex(text: &str) -> String {
        parse(text).simplified().to_latex().unwrap()
    }

    #[test]
    fn test_derivative_of_polynomial() {
        let mut derivative = parse("x^2 + 2 \\cdot x - 1").diff("x").unwrap();
        assert!(derivative.simplify().is_empty());
        assert_eq!(derivative.to_latex().unwrap(), "2 \\cdot x + 2");
    }

    #[test]
    fn test_quotient_rule() {
        let mut derivative = parse("\\frac{1}{x+1}").diff("x").unwrap();
        derivative.simplify();
        assert_eq!(
            derivative.to_latex().unwrap(),
            "-\\frac{1}{\\left(x + 1\\right)^{2}}"
        );
        let expected = |x: f64| -1.0 / ((x + 1.0) * (x + 1.0));
        for x in linspace(0.0, 3.0, 7) {
            assert_relative_eq!(
                derivative.eval_expression(&["x"], &[x]).unwrap(),
                expected(x),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_maclaurin_of_sine() {
        let series = parse("\\sin x").maclaurin_series("x", 3).unwrap();
        assert_eq!(series.to_latex().unwrap(), "x - \\frac{x^{3}}{6}");
    }

    #[test]
    fn test_error_scenarios() {
        match parse("x+1").diff("y") {
            Err(DiffError::UnknownVariable(name)) => assert_eq!(name, "y"),
            other => panic!("expected UnknownVariable, got {:?}", other),
        }
        assert!(matches!(
            ExprTree::parse_expression("(x+1"),
            Err(SymbolicError::Parse(ParseError::UnclosedGroup { open: '(', .. }))
        ));
    }

    #[test]
    fn test_identity_elimination_renders_like_the_variable() {
        let plain = simplified_latex("x");
        assert_eq!(simplified_latex("x + 0"), plain);
        assert_eq!(simplified_latex("x \\cdot 1"), plain);
        assert_eq!(simplified_latex("x - x"), "0");
        assert_eq!(simplified_latex("x + x"), "2 \\cdot x");
        assert_eq!(simplified_latex("\\frac{x}{x}"), "1");
    }

    #[test]
    fn test_derivatives_match_central_difference() {
        let cases = [
            "x^3 - 4 \\cdot x^2 + x",
            "\\sin x",
            "\\cos{3 \\cdot x}",
            "\\ln{x}",
            "\\sqrt{x}",
            "x^{2.5}",
            "3^x",
            "\\sin{x^2} \\cdot \\ln{x + 1}",
            "\\frac{\\sqrt{x}}{\\cos x + 2}",
            "x^{\\sin x}",
        ];
        let points = linspace(0.3, 1.4, 12);
        for case in cases {
            let tree = parse(case);
            let derivative = tree.diff("x").unwrap().simplified();
            let f = tree.lambdify1D().unwrap();
            let numeric = numerical_derivative(&f, &points, 1e-6);
            for (x, expected) in points.iter().zip(numeric) {
                let got = derivative.eval_expression(&["x"], &[*x]).unwrap();
                assert_relative_eq!(got, expected, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_simplify_after_diff_is_idempotent() {
        for case in ["\\frac{x^2}{\\sin x}", "\\arctan{-x} \\cdot x^x", "\\sqrt{1 - x^2}"] {
            let once = parse(case).diff("x").unwrap().simplified();
            assert_eq!(once.simplified(), once, "{}", case);
        }
    }

    #[test]
    fn test_partial_derivative_keeps_variable_table() {
        let tree = parse("x \\cdot y^2 + y");
        let dy = tree.diff("y").unwrap().simplified();
        assert_eq!(dy.vars, tree.vars);
        assert_relative_eq!(dy.eval_expression(&["x", "y"], &[2.0, 3.0]).unwrap(), 13.0);
    }

    #[test]
    fn test_rendered_derivative_round_trips() {
        let derivative = parse("\\frac{x^3}{x - 2} - \\cos{x \\cdot x}")
            .diff("x")
            .unwrap()
            .simplified();
        let text = derivative.to_latex().unwrap();
        let reparsed = parse(&text);
        for x in [0.5, 1.0, 3.0] {
            assert_relative_eq!(
                reparsed.eval_expression(&["x"], &[x]).unwrap(),
                derivative.eval_expression(&["x"], &[x]).unwrap(),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_in_order_walk_matches_rendering_order() {
        let tree = parse("a + b \\cdot c - d");
        let names: Vec<&str> = tree
            .iter()
            .filter_map(|node| match node {
                crate::symbolic::symbolic_engine::Expr::Var(id) => Some(tree.vars.name(*id)),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        let reversed: Vec<_> = tree.iter().rev().collect();
        assert_eq!(reversed.len(), tree.size());
    }
}
