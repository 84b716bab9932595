//! # Symbolic Engine Module
//!
//! Expression tree model of the engine. A parsed expression is an [`ExprTree`]: a root
//! [`Expr`] plus the table of variable names met while parsing.
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Constants**: `Const(f64)`
//! - **Variables**: `Var(VarId)` - index into the owning tree's [`VarTable`]
//! - **Binary operators**: `Binary(BinaryOp, lhs, rhs)` - `+ - · / ^`
//! - **Unary operators**: `Unary(UnaryOp, arg)` - negation and elementary functions
//!
//! Children are owned through `Box<Expr>`, so a subtree has exactly one parent and
//! replacing a child drops the old subtree in the same move. Cloning a subtree is a deep
//! copy that shares nothing with its source.
//!
//! ### `ExprTree`
//! - `diff(var)` - derivative tree with the same variable table
//! - `simplify()` - in-place algebraic simplification
//! - `to_latex()` / `to_plottable()` - rendering
//! - `iter()` - in-order traversal, double-ended
//! - `eval_expression(vars, values)` - numeric evaluation

use crate::symbolic::symbolic_errors::{EvalError, ParseError};
use crate::symbolic::symbolic_ops::{BinaryOp, UnaryOp};
use std::fmt;

/// Tolerance of every numeric comparison done on the tree.
pub const EPSILON: f64 = 1e-6;

/// Handle of a variable inside the owning tree's [`VarTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// Core symbolic expression enum representing mathematical expressions as a binary tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numerical constant value
    Const(f64),
    /// Reference to a variable of the owning tree
    Var(VarId),
    /// Binary operation: lhs op rhs
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Unary operation applied to its single (right) child
    Unary(UnaryOp, Box<Expr>),
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOp::Div, self, rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::unary(UnaryOp::Neg, self)
    }
}

impl Expr {
    /// BASIC FEATURES

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn unary(op: UnaryOp, arg: Expr) -> Expr {
        Expr::Unary(op, Box::new(arg))
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Pow, self, rhs)
    }

    pub fn ln(self) -> Expr {
        Expr::unary(UnaryOp::Ln, self)
    }

    pub fn sqrt(self) -> Expr {
        Expr::unary(UnaryOp::Sqrt, self)
    }

    pub fn sin(self) -> Expr {
        Expr::unary(UnaryOp::Sin, self)
    }

    pub fn cos(self) -> Expr {
        Expr::unary(UnaryOp::Cos, self)
    }

    /// Left child. Only binary operators have one.
    pub fn left(&self) -> Option<&Expr> {
        match self {
            Expr::Binary(_, lhs, _) => Some(lhs),
            _ => None,
        }
    }

    /// Right child: the rhs of a binary operator or the argument of a unary one.
    pub fn right(&self) -> Option<&Expr> {
        match self {
            Expr::Binary(_, _, rhs) => Some(rhs),
            Expr::Unary(_, arg) => Some(arg),
            _ => None,
        }
    }

    /// Number of nodes in the subtree.
    pub fn size(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Binary(_, lhs, rhs) => 1 + lhs.size() + rhs.size(),
            Expr::Unary(_, arg) => 1 + arg.size(),
        }
    }

    /// In-order traversal of the subtree. Unary nodes come before their argument.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self)
    }

    //__________________________________PREDICATES____________________________________

    /// Numeric value of a literal: `Const(c)` or the normalised negative literal `-(c)`.
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            Expr::Unary(UnaryOp::Neg, arg) => match arg.as_ref() {
                Expr::Const(val) => Some(-*val),
                _ => None,
            },
            _ => None,
        }
    }

    /// true if the subtree is a literal equal to `value` within [`EPSILON`]
    pub fn is_literal(&self, value: f64) -> bool {
        self.as_literal()
            .is_some_and(|val| (val - value).abs() < EPSILON)
    }

    pub fn is_zero(&self) -> bool {
        self.is_literal(0.0)
    }

    pub fn is_one(&self) -> bool {
        self.is_literal(1.0)
    }

    pub fn is_op(&self) -> bool {
        matches!(self, Expr::Binary(..) | Expr::Unary(..))
    }

    /// Constant with respect to `var`: no node of the subtree references that variable.
    pub fn is_const(&self, var: VarId) -> bool {
        match self {
            Expr::Const(_) => true,
            Expr::Var(id) => *id != var,
            Expr::Binary(_, lhs, rhs) => lhs.is_const(var) && rhs.is_const(var),
            Expr::Unary(_, arg) => arg.is_const(var),
        }
    }

    //__________________________________SUBSTITUTION____________________________________

    /// Substitutes a variable with a constant value throughout the expression.
    /// Returns a new tree; no simplification is done.
    pub fn set_variable(&self, var: VarId, value: f64) -> Expr {
        match self {
            Expr::Var(id) if *id == var => Expr::Const(value),
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Binary(op, lhs, rhs) => Expr::binary(
                *op,
                lhs.set_variable(var, value),
                rhs.set_variable(var, value),
            ),
            Expr::Unary(op, arg) => Expr::unary(*op, arg.set_variable(var, value)),
        }
    }

    //__________________________________EVALUATION____________________________________

    /// Evaluates the expression with `values[i]` bound to the variable `VarId(i)`.
    /// Variables without a value evaluate to NaN.
    pub fn eval(&self, values: &[f64]) -> f64 {
        match self {
            Expr::Const(val) => *val,
            Expr::Var(VarId(i)) => values.get(*i).copied().unwrap_or(f64::NAN),
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.eval(values), rhs.eval(values)),
            Expr::Unary(op, arg) => op.apply(arg.eval(values)),
        }
    }
}

//___________________________________ITERATION____________________________________

/// Double-ended in-order iterator over the nodes of a subtree.
///
/// Each end keeps the stack of ancestors still to be visited, which plays the role of the
/// parent links: `next` walks to the in-order successor, `next_back` to the predecessor.
pub struct InOrder<'a> {
    front: Vec<&'a Expr>,
    back: Vec<&'a Expr>,
    remaining: usize,
}

impl<'a> InOrder<'a> {
    fn new(root: &'a Expr) -> Self {
        let mut iter = InOrder {
            front: Vec::new(),
            back: Vec::new(),
            remaining: root.size(),
        };
        iter.push_left_spine(root);
        iter.push_right_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: &'a Expr) {
        loop {
            self.front.push(node);
            match node.left() {
                Some(lhs) => node = lhs,
                None => break,
            }
        }
    }

    fn push_right_spine(&mut self, mut node: &'a Expr) {
        loop {
            self.back.push(node);
            match node.right() {
                Some(rhs) => node = rhs,
                None => break,
            }
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        if let Some(rhs) = node.right() {
            self.push_left_spine(rhs);
        }
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> DoubleEndedIterator for InOrder<'a> {
    fn next_back(&mut self) -> Option<&'a Expr> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        if let Some(lhs) = node.left() {
            self.push_right_spine(lhs);
        }
        self.remaining -= 1;
        Some(node)
    }
}

impl ExactSizeIterator for InOrder<'_> {}

//___________________________________VARIABLES____________________________________

/// Distinct variable names of a tree in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarTable {
    names: Vec<String>,
}

impl VarTable {
    pub const MAX_VARS: usize = 16;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.names.iter().position(|n| n == name).map(VarId)
    }

    /// Returns the id of `name`, appending it on first use.
    pub fn intern(&mut self, name: String) -> Result<VarId, ParseError> {
        if let Some(id) = self.lookup(&name) {
            return Ok(id);
        }
        if self.names.len() >= Self::MAX_VARS {
            return Err(ParseError::TooManyVariables {
                name,
                max: Self::MAX_VARS,
            });
        }
        self.names.push(name);
        Ok(VarId(self.names.len() - 1))
    }

    pub fn name(&self, id: VarId) -> &str {
        self.names.get(id.0).map(String::as_str).unwrap_or("[UNKNOWN]")
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

//___________________________________TREE____________________________________

/// A parsed expression: the root node plus the variable table its `Var` nodes index into.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprTree {
    pub root: Expr,
    pub vars: VarTable,
}

impl ExprTree {
    pub fn new(root: Expr, vars: VarTable) -> Self {
        ExprTree { root, vars }
    }

    /// Tree over the same variables with a different root, e.g. a derivative.
    pub fn with_root(&self, root: Expr) -> ExprTree {
        ExprTree {
            root,
            vars: self.vars.clone(),
        }
    }

    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.vars.lookup(name)
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn iter(&self) -> InOrder<'_> {
        self.root.iter()
    }

    /// Substitutes `name` with a constant; unknown names leave the tree unchanged.
    pub fn set_variable(&self, name: &str, value: f64) -> ExprTree {
        match self.var_id(name) {
            Some(id) => self.with_root(self.root.set_variable(id, value)),
            None => self.clone(),
        }
    }

    /// Evaluates the tree with `values[i]` bound to `vars[i]`. Every variable of the tree
    /// must be given a value.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, EvalError> {
        if vars.len() != values.len() {
            return Err(EvalError::ArityMismatch {
                expected: vars.len(),
                got: values.len(),
            });
        }
        let mut bound = vec![f64::NAN; self.vars.len()];
        for name in self.vars.names() {
            let position = vars
                .iter()
                .position(|v| v == name)
                .ok_or_else(|| EvalError::Unbound(name.clone()))?;
            if let Some(id) = self.vars.lookup(name) {
                bound[id.0] = values[position];
            }
        }
        Ok(self.root.eval(&bound))
    }

    /// Turns a tree of at most one variable into a closure of that variable.
    pub fn lambdify1D(&self) -> Result<impl Fn(f64) -> f64 + '_, EvalError> {
        if self.vars.len() > 1 {
            return Err(EvalError::ArityMismatch {
                expected: self.vars.len(),
                got: 1,
            });
        }
        Ok(move |x: f64| self.root.eval(&[x]))
    }
}

/// Debug-oriented printing: fully parenthesised, variables shown by id.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Var(VarId(i)) => write!(f, "v{}", i),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Unary(op, arg) => write!(f, "{}({})", op, arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var(VarId(0))
    }
    fn y() -> Expr {
        Expr::Var(VarId(1))
    }

    #[test]
    fn test_operator_overloading() {
        let expr = x() + Expr::Const(2.0);
        let expected = Expr::Binary(
            BinaryOp::Add,
            Box::new(Expr::Var(VarId(0))),
            Box::new(Expr::Const(2.0)),
        );
        assert_eq!(expr, expected);
        assert_eq!(-x(), Expr::Unary(UnaryOp::Neg, Box::new(x())));
    }

    #[test]
    fn test_size_and_children() {
        let expr = (x() + Expr::Const(1.0)).sin() * y();
        assert_eq!(expr.size(), 6);
        assert_eq!(expr.right(), Some(&y()));
        assert!(expr.left().is_some());
        assert_eq!(x().left(), None);
        assert_eq!(x().right(), None);
    }

    #[test]
    fn test_in_order_iteration() {
        // (x + 1) · sin(y)
        let expr = (x() + Expr::Const(1.0)) * y().sin();
        let order: Vec<String> = expr.iter().map(|node| match node {
            Expr::Const(c) => c.to_string(),
            Expr::Var(VarId(i)) => format!("v{}", i),
            Expr::Binary(op, _, _) => op.to_string(),
            Expr::Unary(op, _) => op.to_string(),
        }).collect();
        assert_eq!(order, vec!["v0", "add", "1", "mul", "sin", "v1"]);
    }

    #[test]
    fn test_in_order_iteration_backwards_and_mixed() {
        let expr = (x() + Expr::Const(1.0)) * y().sin();
        let forward: Vec<&Expr> = expr.iter().collect();
        let mut backward: Vec<&Expr> = expr.iter().rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);

        let mut iter = expr.iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(&x()));
        assert_eq!(iter.next_back(), Some(&y()));
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.count(), 4);
    }

    #[test]
    fn test_is_const() {
        let expr = x().pow(Expr::Const(2.0)) + y();
        assert!(!expr.is_const(VarId(0)));
        assert!(!expr.is_const(VarId(1)));
        assert!(expr.is_const(VarId(2)));
        assert!(Expr::Const(3.0).is_const(VarId(0)));
        assert!(y().sin().is_const(VarId(0)));
    }

    #[test]
    fn test_literals() {
        assert_eq!((-Expr::Const(2.0)).as_literal(), Some(-2.0));
        assert!(Expr::Const(1.0 + 1e-9).is_one());
        assert!(Expr::Const(-1e-9).is_zero());
        assert!(!x().is_zero());
        assert_eq!((-x()).as_literal(), None);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = x() * (y() + Expr::Const(1.0));
        let mut copy = original.clone();
        if let Expr::Binary(_, _, rhs) = &mut copy {
            **rhs = Expr::Const(5.0);
        }
        assert_eq!(original, x() * (y() + Expr::Const(1.0)));
        assert_eq!(copy, x() * Expr::Const(5.0));
    }

    #[test]
    fn test_set_variable() {
        let expr = x() * x() + y();
        let substituted = expr.set_variable(VarId(0), 3.0);
        assert_eq!(substituted, Expr::Const(3.0) * Expr::Const(3.0) + y());
        assert_eq!(substituted.eval(&[0.0, 1.0]), 10.0);
    }

    #[test]
    fn test_var_table() {
        let mut vars = VarTable::new();
        assert_eq!(vars.intern("x".to_string()), Ok(VarId(0)));
        assert_eq!(vars.intern("y".to_string()), Ok(VarId(1)));
        assert_eq!(vars.intern("x".to_string()), Ok(VarId(0)));
        assert_eq!(vars.name(VarId(1)), "y");
        for i in 2..VarTable::MAX_VARS {
            vars.intern(format!("v_{}", i)).unwrap();
        }
        assert!(matches!(
            vars.intern("overflow".to_string()),
            Err(ParseError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn test_eval_expression() {
        let mut vars = VarTable::new();
        let x_id = vars.intern("x".to_string()).unwrap();
        let y_id = vars.intern("y".to_string()).unwrap();
        let tree = ExprTree::new(Expr::Var(x_id) / Expr::Var(y_id), vars);
        assert_eq!(tree.eval_expression(&["y", "x"], &[4.0, 2.0]), Ok(0.5));
        assert_eq!(
            tree.eval_expression(&["x"], &[1.0]),
            Err(EvalError::Unbound("y".to_string()))
        );
        assert!(tree.lambdify1D().is_err());
    }
}
