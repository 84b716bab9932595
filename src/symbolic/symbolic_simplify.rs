//! # Symbolic Expression Simplification Module
//!
//! Bottom-up rewrite system. Children are simplified first; then the node is rebuilt
//! through the smart constructors [`Simplifier::rewrite_binary`] and
//! [`Simplifier::rewrite_unary`], which apply the first matching rule of:
//!
//! 1. **Constant folding**: both operands are literals -> one literal
//! 2. **Negation extraction**: negative literals are kept as `-(c)`, and negations are
//!    pulled out of `+ - · /` (`a + (-b)` -> `a - b`, `(-a)·b` -> `-(a·b)`, ...)
//! 3. **Identity elimination**: `x + 0`, `x·1`, `x·0`, `x/1`, `x^0`, `x^1`, `1^x`, `0^x`
//! 4. **Same-variable collapse**: `v + v`, `v - v`, `v·v`, `v/v`
//! 5. **Function closed forms**: `ln(1)`, `sqrt(0|1)`, `cos(0)`, odd/even symmetries,
//!    `(-x)^n` for integer `n`
//!
//! Every node a rule builds from already simplified parts goes through the same
//! constructors, so one pass reaches a fixed point: simplifying twice changes nothing.
//!
//! ## Degenerate algebra
//!
//! Division by a literal zero and the logarithm of a literal zero are never folded. The
//! node is kept as it was and a [`SimplifyError`] diagnostic is logged and collected.
//! Constant folds whose result is not finite (e.g. `(-8)^{0.5}`) are skipped the same way,
//! without a diagnostic.

use crate::symbolic::symbolic_engine::{EPSILON, Expr, ExprTree};
use crate::symbolic::symbolic_errors::SimplifyError;
use crate::symbolic::symbolic_ops::{BinaryOp, UnaryOp};
use crate::symbolic::utils::is_integer;
use log::warn;

/// Literal node for `value`, negative values normalised to `-(|value|)`.
fn literal(value: f64) -> Expr {
    if value < 0.0 {
        Expr::unary(UnaryOp::Neg, Expr::Const(-value))
    } else if value == 0.0 {
        Expr::Const(0.0)
    } else {
        Expr::Const(value)
    }
}

/// (is negated, operand without the negation)
fn split_neg(expr: Expr) -> (bool, Expr) {
    match expr {
        Expr::Unary(UnaryOp::Neg, arg) => (true, *arg),
        other => (false, other),
    }
}

fn is_neg(expr: &Expr) -> bool {
    matches!(expr, Expr::Unary(UnaryOp::Neg, _))
}

/// Collects the diagnostics met while rewriting.
#[derive(Debug, Default)]
pub struct Simplifier {
    pub diagnostics: Vec<SimplifyError>,
}

impl Simplifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, diagnostic: SimplifyError) {
        warn!("simplifier: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// post-order rewrite of the whole subtree
    pub fn simplify(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Const(val) => literal(val),
            Expr::Var(_) => expr,
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.simplify(*lhs);
                let rhs = self.simplify(*rhs);
                self.rewrite_binary(op, lhs, rhs)
            }
            Expr::Unary(op, arg) => {
                let arg = self.simplify(*arg);
                self.rewrite_unary(op, arg)
            }
        }
    }

    /// Builds `lhs op rhs` from simplified operands.
    pub fn rewrite_binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        // division by a literal zero is reported before any other rule sees it
        if op == BinaryOp::Div && rhs.is_zero() {
            self.report(SimplifyError::DivisionByZero {
                numerator: lhs.clone(),
            });
            return Expr::binary(op, lhs, rhs);
        }

        // 1. constant folding
        if let (Some(a), Some(b)) = (lhs.as_literal(), rhs.as_literal()) {
            let folded = op.apply(a, b);
            if folded.is_finite() {
                return literal(folded);
            }
            return Expr::binary(op, lhs, rhs);
        }

        // 2. negation extraction
        if is_neg(&lhs) || is_neg(&rhs) {
            return self.extract_negation(op, lhs, rhs);
        }

        // 3. identity elements
        if let Some(expr) = self.eliminate_identity(op, &lhs, &rhs) {
            return expr;
        }

        // 4. same variable on both sides
        let same_var = matches!((&lhs, &rhs), (Expr::Var(a), Expr::Var(b)) if a == b);
        if same_var {
            match op {
                BinaryOp::Add => return Expr::Const(2.0) * lhs,
                BinaryOp::Sub => return Expr::Const(0.0),
                BinaryOp::Mul => return lhs.pow(Expr::Const(2.0)),
                BinaryOp::Div => return Expr::Const(1.0),
                BinaryOp::Pow => {}
            }
        }

        Expr::binary(op, lhs, rhs)
    }

    fn extract_negation(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let (neg_l, l) = split_neg(lhs);
        let (neg_r, r) = split_neg(rhs);
        match (op, neg_l, neg_r) {
            // -a + -b = -(a + b)
            (BinaryOp::Add, true, true) => {
                let sum = self.rewrite_binary(BinaryOp::Add, l, r);
                self.rewrite_unary(UnaryOp::Neg, sum)
            }
            // a + -b = a - b
            (BinaryOp::Add, false, true) => self.rewrite_binary(BinaryOp::Sub, l, r),
            // -a + b = b - a
            (BinaryOp::Add, true, false) => self.rewrite_binary(BinaryOp::Sub, r, l),
            // -a - -b = -(a - b)
            (BinaryOp::Sub, true, true) => {
                let diff = self.rewrite_binary(BinaryOp::Sub, l, r);
                self.rewrite_unary(UnaryOp::Neg, diff)
            }
            // a - -b = a + b
            (BinaryOp::Sub, false, true) => self.rewrite_binary(BinaryOp::Add, l, r),
            // -a - b = -(a + b)
            (BinaryOp::Sub, true, false) => {
                let sum = self.rewrite_binary(BinaryOp::Add, l, r);
                self.rewrite_unary(UnaryOp::Neg, sum)
            }
            (BinaryOp::Mul | BinaryOp::Div, true, true) => self.rewrite_binary(op, l, r),
            (BinaryOp::Mul | BinaryOp::Div, _, _) => {
                let inner = self.rewrite_binary(op, l, r);
                self.rewrite_unary(UnaryOp::Neg, inner)
            }
            (BinaryOp::Pow, _, _) => self.rewrite_power(neg_l, l, neg_r, r),
            (_, false, false) => Expr::binary(op, l, r),
        }
    }

    /// `(-x)^n`: integer literal exponents move the sign out, anything else is kept.
    fn rewrite_power(&mut self, neg_base: bool, base: Expr, neg_exp: bool, exp: Expr) -> Expr {
        let exp = if neg_exp {
            Expr::unary(UnaryOp::Neg, exp)
        } else {
            exp
        };
        if !neg_base {
            return self.eliminate_identity(BinaryOp::Pow, &base, &exp)
                .unwrap_or_else(|| base.pow(exp));
        }
        match exp.as_literal() {
            Some(n) if is_integer(n, EPSILON) => {
                let odd = (n.round() as i64) % 2 != 0;
                let power = self.rewrite_binary(BinaryOp::Pow, base, exp);
                if odd {
                    self.rewrite_unary(UnaryOp::Neg, power)
                } else {
                    power
                }
            }
            _ => {
                let base = Expr::unary(UnaryOp::Neg, base);
                self.eliminate_identity(BinaryOp::Pow, &base, &exp)
                    .unwrap_or_else(|| base.pow(exp))
            }
        }
    }

    fn eliminate_identity(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Option<Expr> {
        match op {
            BinaryOp::Add if rhs.is_zero() => Some(lhs.clone()),
            BinaryOp::Add if lhs.is_zero() => Some(rhs.clone()),
            BinaryOp::Sub if rhs.is_zero() => Some(lhs.clone()),
            BinaryOp::Sub if lhs.is_zero() => Some(self.rewrite_unary(UnaryOp::Neg, rhs.clone())),
            BinaryOp::Mul if lhs.is_zero() || rhs.is_zero() => Some(Expr::Const(0.0)),
            BinaryOp::Mul if lhs.is_one() => Some(rhs.clone()),
            BinaryOp::Mul if rhs.is_one() => Some(lhs.clone()),
            BinaryOp::Div if lhs.is_zero() => Some(Expr::Const(0.0)),
            BinaryOp::Div if rhs.is_one() => Some(lhs.clone()),
            BinaryOp::Div if rhs.is_literal(-1.0) => {
                Some(self.rewrite_unary(UnaryOp::Neg, lhs.clone()))
            }
            BinaryOp::Pow if rhs.is_zero() => Some(Expr::Const(1.0)),
            BinaryOp::Pow if rhs.is_one() => Some(lhs.clone()),
            BinaryOp::Pow if lhs.is_one() => Some(Expr::Const(1.0)),
            // 0^x = 0 unless x is a negative literal
            BinaryOp::Pow if lhs.is_zero() && rhs.as_literal().is_none_or(|e| e > 0.0) => {
                Some(Expr::Const(0.0))
            }
            _ => None,
        }
    }

    /// Builds `op(arg)` from a simplified argument.
    pub fn rewrite_unary(&mut self, op: UnaryOp, arg: Expr) -> Expr {
        if op == UnaryOp::Neg {
            if let Some(val) = arg.as_literal() {
                return literal(-val);
            }
            return match arg {
                Expr::Unary(UnaryOp::Neg, inner) => *inner,
                other => Expr::unary(UnaryOp::Neg, other),
            };
        }

        if arg.is_zero() {
            match op {
                UnaryOp::Ln => {
                    self.report(SimplifyError::LogOfZero);
                    return Expr::unary(op, arg);
                }
                UnaryOp::Cos => return Expr::Const(1.0),
                _ if op.vanishes_at_zero() => return Expr::Const(0.0),
                _ => {}
            }
        }
        if arg.is_one() {
            match op {
                UnaryOp::Ln => return Expr::Const(0.0),
                UnaryOp::Sqrt => return Expr::Const(1.0),
                _ => {}
            }
        }

        match arg {
            // cos is even
            Expr::Unary(UnaryOp::Neg, inner) if op == UnaryOp::Cos => {
                self.rewrite_unary(UnaryOp::Cos, *inner)
            }
            Expr::Unary(UnaryOp::Neg, inner) if op.is_odd() => {
                let positive = self.rewrite_unary(op, *inner);
                self.rewrite_unary(UnaryOp::Neg, positive)
            }
            other => Expr::unary(op, other),
        }
    }
}

impl Expr {
    /// Simplified form of the expression. Diagnostics are logged and dropped; use
    /// [`ExprTree::simplify`] to inspect them.
    pub fn simplify(self) -> Expr {
        Simplifier::new().simplify(self)
    }
}

impl ExprTree {
    /// Simplifies the tree in place and returns the diagnostics met on the way.
    pub fn simplify(&mut self) -> Vec<SimplifyError> {
        let mut simplifier = Simplifier::new();
        let root = std::mem::replace(&mut self.root, Expr::Const(0.0));
        self.root = simplifier.simplify(root);
        simplifier.diagnostics
    }

    /// Like [`ExprTree::simplify`], but the first diagnostic becomes an error. The tree is
    /// simplified either way.
    pub fn simplify_strict(&mut self) -> Result<(), SimplifyError> {
        match self.simplify().into_iter().next() {
            Some(diagnostic) => Err(diagnostic),
            None => Ok(()),
        }
    }

    /// simplified copy, `self` is left untouched
    pub fn simplified(&self) -> ExprTree {
        let mut copy = self.clone();
        copy.simplify();
        copy
    }
}
