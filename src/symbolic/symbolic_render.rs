//! Rendering of expression trees back to text.
//!
//! - [`ExprTree::to_latex`] - LaTeX with the minimal grouping the parser needs to read it
//!   back; oversized subexpressions are pulled out into labels `A`..`Z` listed in a legend
//! - [`ExprTree::to_plottable`] - fully parenthesised infix for gnuplot
//!
//! Grouping (`\left( \right)`) of an operand:
//!
//! | parent      | left operand               | right operand                     |
//! |-------------|----------------------------|-----------------------------------|
//! | `+`         | never                      | negation                          |
//! | `-`         | never                      | `+`, `-`, negation                |
//! | `\cdot`     | `+`, `-`                   | `+`, `-`, negation                |
//! | `\frac`     | never                      | never                             |
//! | `^`         | any operator, negation     | never (braced)                    |
//! | negation    |                            | `+`, `-`                          |
//! | function    |                            | `+`, `-`, `\cdot`, `-(a \cdot b)`  |
use crate::symbolic::symbolic_engine::{Expr, ExprTree, VarTable};
use crate::symbolic::symbolic_errors::RenderError;
use crate::symbolic::symbolic_ops::{BinaryOp, UnaryOp};
use itertools::Itertools;
use std::fmt;

/// Subtrees larger than this are replaced by a label.
pub const LABEL_THRESHOLD: usize = 24;
pub const MAX_LABELS: usize = 26;

/// LaTeX body plus the definitions of the labels it refers to, in allocation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub body: String,
    pub legend: Vec<(char, String)>,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.body)?;
        if self.legend.is_empty() {
            return Ok(());
        }
        let legend = self
            .legend
            .iter()
            .map(|(label, definition)| format!("  {} = {}", label, definition))
            .join("\n");
        write!(f, "\nwhere:\n{}", legend)
    }
}

pub fn format_number(val: f64) -> String {
    format!("{}", val)
}

fn is_additive(expr: &Expr) -> bool {
    matches!(expr, Expr::Binary(BinaryOp::Add | BinaryOp::Sub, _, _))
}

/// Rendered text ends in a bare `\cdot` chain: a product, or negations of one.
/// A function keyword in front of it would only take the first factor.
fn is_bare_product(expr: &Expr) -> bool {
    match expr {
        Expr::Binary(BinaryOp::Mul, _, _) => true,
        Expr::Unary(UnaryOp::Neg, arg) => !is_additive(arg) && is_bare_product(arg),
        _ => false,
    }
}

/// explicit negation or a negative literal
fn is_negative(expr: &Expr) -> bool {
    match expr {
        Expr::Unary(UnaryOp::Neg, _) => true,
        Expr::Const(val) => *val < 0.0,
        _ => false,
    }
}

struct LatexWriter<'a> {
    vars: &'a VarTable,
    legend: Vec<(char, String)>,
}

impl LatexWriter<'_> {
    fn label(&mut self, definition: String) -> Result<char, RenderError> {
        if self.legend.len() >= MAX_LABELS {
            return Err(RenderError::TooManyLabels { max: MAX_LABELS });
        }
        let label = (b'A' + self.legend.len() as u8) as char;
        self.legend.push((label, definition));
        Ok(label)
    }

    /// Renders a child: oversized ones become a label, the rest are grouped on request.
    fn operand(&mut self, expr: &Expr, group: bool) -> Result<(String, usize), RenderError> {
        let (text, size) = self.node(expr)?;
        if size > LABEL_THRESHOLD {
            let label = self.label(text)?;
            return Ok((label.to_string(), 1));
        }
        if group {
            Ok((format!("\\left({}\\right)", text), size))
        } else {
            Ok((text, size))
        }
    }

    /// Returns the text and the node count of the subtree, labels counting as one node.
    fn node(&mut self, expr: &Expr) -> Result<(String, usize), RenderError> {
        match expr {
            Expr::Const(val) => Ok((format_number(*val), 1)),
            Expr::Var(id) => Ok((self.vars.name(*id).to_string(), 1)),
            Expr::Binary(BinaryOp::Div, lhs, rhs) => {
                let (num, n1) = self.operand(lhs, false)?;
                let (den, n2) = self.operand(rhs, false)?;
                Ok((format!("\\frac{{{}}}{{{}}}", num, den), n1 + n2 + 1))
            }
            Expr::Binary(BinaryOp::Pow, base, exp) => {
                let (base, n1) = self.operand(base, base.is_op() || is_negative(base))?;
                let (exp, n2) = self.operand(exp, false)?;
                Ok((format!("{}^{{{}}}", base, exp), n1 + n2 + 1))
            }
            Expr::Binary(op, lhs, rhs) => {
                let group_left = *op == BinaryOp::Mul && is_additive(lhs);
                let group_right = match op {
                    BinaryOp::Add => is_negative(rhs),
                    _ => is_additive(rhs) || is_negative(rhs),
                };
                let (l, n1) = self.operand(lhs, group_left)?;
                let (r, n2) = self.operand(rhs, group_right)?;
                Ok((format!("{}{}{}", l, op.latex(), r), n1 + n2 + 1))
            }
            Expr::Unary(UnaryOp::Neg, arg) => {
                let (a, n) = self.operand(arg, is_additive(arg))?;
                Ok((format!("-{}", a), n + 1))
            }
            Expr::Unary(UnaryOp::Sqrt, arg) => {
                let (a, n) = self.operand(arg, false)?;
                Ok((format!("\\sqrt{{{}}}", a), n + 1))
            }
            Expr::Unary(op, arg) => {
                let group = is_additive(arg) || is_bare_product(arg);
                let (a, n) = self.operand(arg, group)?;
                Ok((format!("{} {}", op.latex(), a), n + 1))
            }
        }
    }
}

fn plottable(expr: &Expr, vars: &VarTable) -> String {
    match expr {
        Expr::Const(val) => format_number(*val),
        Expr::Var(id) => vars.name(*id).trim_start_matches('\\').to_string(),
        Expr::Binary(op, lhs, rhs) => format!(
            "({}{}{})",
            plottable(lhs, vars),
            op.plot(),
            plottable(rhs, vars)
        ),
        Expr::Unary(op, arg) => op.plot(&plottable(arg, vars)),
    }
}

impl ExprTree {
    pub fn to_latex_parts(&self) -> Result<Rendered, RenderError> {
        let mut writer = LatexWriter {
            vars: &self.vars,
            legend: Vec::new(),
        };
        let (body, _) = writer.node(&self.root)?;
        Ok(Rendered {
            body,
            legend: writer.legend,
        })
    }

    /// LaTeX form; a `where:` legend follows the body when labels were extracted.
    pub fn to_latex(&self) -> Result<String, RenderError> {
        Ok(self.to_latex_parts()?.to_string())
    }

    /// gnuplot expression, fully parenthesised
    pub fn to_plottable(&self) -> String {
        plottable(&self.root, &self.vars)
    }
}
