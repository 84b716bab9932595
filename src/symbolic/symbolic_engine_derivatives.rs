//! # Symbolic Engine Derivatives Module
//!
//! Differentiation and everything built on repeated differentiation:
//!
//! ### Differentiation
//! - `Expr::diff(var)` - structural derivative, no simplification
//! - `ExprTree::diff(name)` - same on a tree, checks the variable exists
//! - `n_th_derivative1D()` - higher-order derivatives, simplified between steps
//!
//! ### Series and linearisation
//! - `taylor_series()` / `maclaurin_series()` - Σ f⁽ⁱ⁾(c)/i! · (x - c)ⁱ
//! - `tangent_line()` - f(a) + f'(a)·(x - a)
//!
//! ### Numerical validation
//! - `compare_num1D()` - symbolic derivative against a central difference

use crate::symbolic::symbolic_engine::{Expr, ExprTree, VarId};
use crate::symbolic::symbolic_errors::{DiffError, EvalError, SymbolicError};
use crate::symbolic::symbolic_ops::{BinaryOp, UnaryOp};
use crate::symbolic::utils::{factorial, linspace, norm, numerical_derivative};
use log::{debug, info};

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to `var`.
    ///
    /// - Sum rule: d(f ± g) = f' ± g'
    /// - Product rule: d(f·g) = f'·g + f·g'
    /// - Quotient rule: d(f/g) = (f'·g - f·g')/g^2
    /// - Power: constant base, constant exponent and general case
    /// - Chain rule for every elementary function, see [`UnaryOp::known_derivative`]
    ///
    /// Subtrees used twice in the result are cloned, so the result owns all its nodes.
    /// The result is not simplified.
    pub fn diff(&self, var: VarId) -> Expr {
        if self.is_const(var) {
            return Expr::Const(0.0);
        }
        match self {
            Expr::Var(_) => Expr::Const(1.0),
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Binary(op, lhs, rhs) => {
                let (l, r) = (lhs.as_ref(), rhs.as_ref());
                match op {
                    BinaryOp::Add => l.diff(var) + r.diff(var),
                    BinaryOp::Sub => l.diff(var) - r.diff(var),
                    BinaryOp::Mul => l.diff(var) * r.clone() + l.clone() * r.diff(var),
                    BinaryOp::Div => {
                        (l.diff(var) * r.clone() - l.clone() * r.diff(var))
                            / r.clone().pow(Expr::Const(2.0))
                    }
                    BinaryOp::Pow => {
                        if l.is_const(var) {
                            // d(a^u) = ln(a)·a^u·u'
                            l.clone().ln() * self.clone() * r.diff(var)
                        } else if r.is_const(var) {
                            // d(u^n) = n·u^(n-1)·u'
                            r.clone() * l.clone().pow(r.clone() - Expr::Const(1.0)) * l.diff(var)
                        } else {
                            // d(u^v) = u^v·(v'·ln(u) + v·u'/u)
                            self.clone()
                                * (r.diff(var) * l.clone().ln()
                                    + r.clone() * l.diff(var) / l.clone())
                        }
                    }
                }
            }
            Expr::Unary(UnaryOp::Neg, arg) => -arg.diff(var),
            Expr::Unary(op, arg) => op.known_derivative(arg) * arg.diff(var),
        }
    } // end of diff
}

impl ExprTree {
    fn require_var(&self, var: &str) -> Result<VarId, DiffError> {
        self.var_id(var)
            .ok_or_else(|| DiffError::UnknownVariable(var.to_string()))
    }

    /// Derivative tree with respect to `var`, unsimplified. The variable table is copied,
    /// so the result names the same variables as `self`.
    pub fn diff(&self, var: &str) -> Result<ExprTree, DiffError> {
        let id = self.require_var(var)?;
        info!("differentiating {} nodes with respect to {}", self.size(), var);
        Ok(self.with_root(self.root.diff(id)))
    }

    /// n-th derivative, simplified after every step; n = 0 gives the simplified function.
    pub fn n_th_derivative1D(&self, var: &str, n: usize) -> Result<ExprTree, DiffError> {
        let id = self.require_var(var)?;
        let mut expr = self.root.clone().simplify();
        for _ in 0..n {
            expr = expr.diff(id).simplify();
        }
        Ok(self.with_root(expr))
    }

    /// Taylor polynomial of degree `order` around `center`:
    /// Σ_{i=0..order} f⁽ⁱ⁾(center)/i! · (var - center)^i, simplified once assembled.
    pub fn taylor_series(&self, var: &str, center: f64, order: usize) -> Result<ExprTree, DiffError> {
        let id = self.require_var(var)?;
        info!("taylor series of order {} at {} = {}", order, var, center);
        let shift = Expr::Var(id) - Expr::Const(center);
        let mut derivative = self.root.clone();
        let mut sum: Option<Expr> = None;
        for i in 0..=order {
            let coeff = derivative.set_variable(id, center).simplify();
            debug!("term {}: coefficient {}", i, coeff);
            let term = coeff * shift.clone().pow(Expr::Const(i as f64)) / Expr::Const(factorial(i));
            sum = Some(match sum {
                Some(acc) => acc + term,
                None => term,
            });
            if i < order {
                derivative = derivative.diff(id).simplify();
            }
        }
        let series = sum.unwrap_or(Expr::Const(0.0)).simplify();
        Ok(self.with_root(series))
    }

    pub fn maclaurin_series(&self, var: &str, order: usize) -> Result<ExprTree, DiffError> {
        self.taylor_series(var, 0.0, order)
    }

    /// Tangent line f(at) + f'(at)·(var - at), simplified.
    pub fn tangent_line(&self, var: &str, at: f64) -> Result<ExprTree, DiffError> {
        let id = self.require_var(var)?;
        let value = self.root.set_variable(id, at).simplify();
        let slope = self.root.diff(id).set_variable(id, at).simplify();
        let line = (value + slope * (Expr::Var(id) - Expr::Const(at))).simplify();
        Ok(self.with_root(line))
    }

    /// Compares the simplified symbolic derivative with a central-difference derivative on
    /// `num_values` points of [start, end]. Returns (norm of the difference, norm < max_norm).
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), SymbolicError> {
        if self.vars.len() > 1 {
            return Err(EvalError::ArityMismatch {
                expected: self.vars.len(),
                got: 1,
            }
            .into());
        }
        let derivative = self.n_th_derivative1D(var, 1)?;
        let domain = linspace(start, end, num_values);
        let analytical_function = self.lambdify1D()?;
        let analytical_derivative_fn = derivative.lambdify1D()?;
        let analytical_derivative: Vec<f64> =
            domain.iter().map(|&x| analytical_derivative_fn(x)).collect();
        let step = (1.0 / 1e4) * (end - start) / (num_values.max(2) as f64 - 1.0);
        let numerical = numerical_derivative(analytical_function, &domain, step);
        let norma_val = norm(&analytical_derivative, &numerical);
        Ok((norma_val, norma_val < max_norm))
    }
}
