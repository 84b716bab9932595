#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// closed table of operators and elementary functions: keywords, derivatives, spellings
pub mod symbolic_ops;
/// error types of every stage, plus the umbrella `SymbolicError`
pub mod symbolic_errors;
/// turns a LaTeX-like string into tokens
pub mod lexer;
/// a module turns a token sequence into an expression tree
///
///# Example
/// ```
/// use RustedDiff::symbolic::symbolic_engine::ExprTree;
/// let tree = ExprTree::parse_expression("x^2 + 2 \\cdot x - 1").unwrap();
/// let value = tree.eval_expression(&["x"], &[3.0]).unwrap();
/// assert_eq!(value, 14.0);
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree and its variable table
/// 2) iterates over the tree in order, in both directions
/// 3) substitutes variables and evaluates the tree numerically
///# Example
/// ```
/// use RustedDiff::symbolic::symbolic_engine::ExprTree;
/// let tree = ExprTree::parse_expression("\\frac{1}{x + 1}").unwrap();
/// let f = tree.lambdify1D().unwrap();
/// assert_eq!(f(1.0), 0.5);
/// assert_eq!(tree.iter().count(), tree.size());
/// ```
pub mod symbolic_engine;
/// differentiation, higher derivatives, Taylor/Maclaurin series, tangent line
///# Example
/// ```
/// use RustedDiff::symbolic::symbolic_engine::ExprTree;
/// let tree = ExprTree::parse_expression("x^2 + 2 \\cdot x - 1").unwrap();
/// let mut derivative = tree.diff("x").unwrap();
/// derivative.simplify();
/// assert_eq!(derivative.to_latex().unwrap(), "2 \\cdot x + 2");
/// ```
pub mod symbolic_engine_derivatives;
/// bottom-up algebraic simplification
pub mod symbolic_simplify;
/// LaTeX and gnuplot rendering
///# Example
/// ```
/// use RustedDiff::symbolic::symbolic_engine::ExprTree;
/// let series = ExprTree::parse_expression("\\sin x").unwrap().maclaurin_series("x", 3).unwrap();
/// assert_eq!(series.to_latex().unwrap(), "x - \\frac{x^{3}}{6}");
/// assert_eq!(series.to_plottable(), "(x - ((x**3)/6))");
/// ```
pub mod symbolic_render;
/// numeric helpers: central difference, linspace, norm, factorial
pub mod utils;

mod symbolic_engine_tests;
