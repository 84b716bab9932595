//! # Operator Table
//!
//! The closed set of operators known to the engine. Every per-operator fact lives here:
//! - the lexer keyword of each elementary function (`\sin`, `\arctan`, ...)
//! - the derivative of each elementary function with respect to its argument
//! - the LaTeX and plottable (gnuplot-style) spelling
//! - the numeric form used for evaluation
//!
//! Adding an elementary function means adding one `UnaryOp` variant and one arm in each
//! `match` below; the lexer, differentiator and renderers pick it up from here.

use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Binary operators. Both children of the node are used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// native floating point semantics, no special casing of zero divisors
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }

    /// infix spelling in LaTeX; `Div` and `Pow` are rendered structurally (`\frac`, `^{}`)
    pub fn latex(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => " \\cdot ",
            BinaryOp::Div => " / ",
            BinaryOp::Pow => "^",
        }
    }

    /// infix spelling understood by gnuplot
    pub fn plot(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }
}

/// Unary operators: negation and the elementary functions. Only the right child is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryOp {
    Neg,
    Sin,
    Cos,
    Tan,
    Cot,
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
    Sqrt,
    Ln,
}

impl UnaryOp {
    /// Lexer keyword of a named function, `None` for negation (spelled `-`).
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            UnaryOp::Neg => None,
            UnaryOp::Sin => Some("\\sin"),
            UnaryOp::Cos => Some("\\cos"),
            UnaryOp::Tan => Some("\\tan"),
            UnaryOp::Cot => Some("\\cot"),
            UnaryOp::Arcsin => Some("\\arcsin"),
            UnaryOp::Arccos => Some("\\arccos"),
            UnaryOp::Arctan => Some("\\arctan"),
            UnaryOp::Arccot => Some("\\arccot"),
            UnaryOp::Sqrt => Some("\\sqrt"),
            UnaryOp::Ln => Some("\\ln"),
        }
    }

    /// All named elementary functions, i.e. every operator with a keyword.
    pub fn functions() -> impl Iterator<Item = UnaryOp> {
        UnaryOp::iter().filter(|op| op.keyword().is_some())
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Neg => -x,
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Cot => 1.0 / x.tan(),
            UnaryOp::Arcsin => x.asin(),
            UnaryOp::Arccos => x.acos(),
            UnaryOp::Arctan => x.atan(),
            UnaryOp::Arccot => PI / 2.0 - x.atan(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Ln => x.ln(),
        }
    }

    /// Derivative of the function with respect to its own argument, built from a copy of
    /// the argument `u`. The caller multiplies by `D(u)` (chain rule).
    pub fn known_derivative(self, u: &Expr) -> Expr {
        let one = || Expr::Const(1.0);
        let two = || Expr::Const(2.0);
        match self {
            UnaryOp::Neg => -one(),
            // sin' = cos
            UnaryOp::Sin => u.clone().cos(),
            // cos' = -sin
            UnaryOp::Cos => -u.clone().sin(),
            // tan' = 1/cos^2
            UnaryOp::Tan => one() / u.clone().cos().pow(two()),
            // cot' = -1/sin^2
            UnaryOp::Cot => -(one() / u.clone().sin().pow(two())),
            UnaryOp::Arcsin => one() / (one() - u.clone().pow(two())).sqrt(),
            UnaryOp::Arccos => -(one() / (one() - u.clone().pow(two())).sqrt()),
            UnaryOp::Arctan => one() / (one() + u.clone().pow(two())),
            UnaryOp::Arccot => -(one() / (one() + u.clone().pow(two()))),
            UnaryOp::Sqrt => one() / (two() * u.clone().sqrt()),
            UnaryOp::Ln => one() / u.clone(),
        }
    }

    /// LaTeX command; `Sqrt` takes its argument in braces, see the renderer.
    pub fn latex(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            op => op.keyword().unwrap_or_default(),
        }
    }

    /// gnuplot spelling of `f(arg)`
    pub fn plot(self, arg: &str) -> String {
        match self {
            UnaryOp::Neg => format!("-({})", arg),
            UnaryOp::Sin => format!("sin({})", arg),
            UnaryOp::Cos => format!("cos({})", arg),
            UnaryOp::Tan => format!("tan({})", arg),
            UnaryOp::Cot => format!("(1/tan({}))", arg),
            UnaryOp::Arcsin => format!("asin({})", arg),
            UnaryOp::Arccos => format!("(pi/2 - asin({}))", arg),
            UnaryOp::Arctan => format!("atan({})", arg),
            UnaryOp::Arccot => format!("(pi/2 - atan({}))", arg),
            UnaryOp::Sqrt => format!("sqrt({})", arg),
            UnaryOp::Ln => format!("log({})", arg),
        }
    }

    /// `f(-x) = -f(x)` holds for the numeric form above
    pub fn is_odd(self) -> bool {
        matches!(
            self,
            UnaryOp::Sin | UnaryOp::Tan | UnaryOp::Cot | UnaryOp::Arcsin | UnaryOp::Arctan
        )
    }

    /// `f(0) = 0` holds for the numeric form above
    pub fn vanishes_at_zero(self) -> bool {
        matches!(
            self,
            UnaryOp::Sin | UnaryOp::Tan | UnaryOp::Arcsin | UnaryOp::Arctan | UnaryOp::Sqrt
        )
    }
}
