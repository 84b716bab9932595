//! Recursive-descent parser turning the token sequence of [`crate::symbolic::lexer`] into an
//! [`ExprTree`].
//!
//! Grammar, loosest binding first:
//! ```text
//! Expression := Product (('+' | '-') Product)*
//! Product    := Unary ('\cdot' Unary)*
//! Unary      := '-' Unary | Function Unary | Fraction
//! Fraction   := '\frac' '{' Expression '}' '{' Expression '}' | Power
//! Power      := Group ('^' Power)?              right-associative
//! Group      := '(' Expression ')' | '{' Expression '}' | Atom
//! Atom       := Number | Identifier
//! ```
//!# Example
//! ```
//! use RustedDiff::symbolic::symbolic_engine::ExprTree;
//! let tree = ExprTree::parse_expression("\\frac{1}{x + 1}").unwrap();
//! assert_eq!(tree.vars.names(), &["x".to_string()]);
//! assert_eq!(tree.size(), 5);
//! ```
use crate::symbolic::lexer::{Token, TokenKind, tokenize};
use crate::symbolic::symbolic_engine::{Expr, ExprTree, VarTable};
use crate::symbolic::symbolic_errors::{ParseError, SymbolicError};
use crate::symbolic::symbolic_ops::{BinaryOp, UnaryOp};
use log::debug;
use std::iter::Peekable;
use std::vec::IntoIter;

pub struct ExprParser {
    tokens: Peekable<IntoIter<Token>>,
    vars: VarTable,
}

impl ExprParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        ExprParser {
            tokens: tokens.into_iter().peekable(),
            vars: VarTable::new(),
        }
    }

    /// Parses a whole expression; the `Eof` token must be the last thing consumed.
    pub fn parse(mut self) -> Result<ExprTree, ParseError> {
        let root = self.expression()?;
        let tok = self.advance();
        match tok.kind {
            TokenKind::Eof => {}
            TokenKind::RParen => return Err(ParseError::UnmatchedClose { close: ')', pos: tok.pos }),
            TokenKind::RBrace => return Err(ParseError::UnmatchedClose { close: '}', pos: tok.pos }),
            other => {
                return Err(ParseError::TrailingInput {
                    found: other.to_string(),
                    pos: tok.pos,
                });
            }
        }
        debug!("parsed expression with variables {:?}", self.vars.names());
        Ok(ExprTree::new(root, self.vars))
    }

    fn peek_kind(&mut self) -> &TokenKind {
        self.tokens.peek().map(|tok| &tok.kind).unwrap_or(&TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        self.tokens.next().unwrap_or(Token {
            kind: TokenKind::Eof,
            pos: usize::MAX,
        })
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let tok = self.advance();
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(ParseError::UnexpectedToken {
                found: tok.kind.to_string(),
                expected,
                pos: tok.pos,
            })
        }
    }

    fn expect_closer(&mut self, open: char, open_pos: usize) -> Result<(), ParseError> {
        let closer = if open == '(' {
            TokenKind::RParen
        } else {
            TokenKind::RBrace
        };
        let tok = self.advance();
        if tok.kind == closer {
            Ok(())
        } else {
            Err(ParseError::UnclosedGroup {
                open,
                pos: open_pos,
                found: tok.kind.to_string(),
            })
        }
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.product()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn product(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while *self.peek_kind() == TokenKind::Cdot {
            self.advance();
            let rhs = self.unary()?;
            lhs = lhs * rhs;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Func(op) => *op,
            _ => return self.fraction(),
        };
        self.advance();
        Ok(Expr::unary(op, self.unary()?))
    }

    fn fraction(&mut self) -> Result<Expr, ParseError> {
        if *self.peek_kind() != TokenKind::Frac {
            return self.power();
        }
        self.advance();
        let open = self.expect(TokenKind::LBrace, "'{' after \\frac")?;
        let numerator = self.expression()?;
        self.expect_closer('{', open.pos)?;
        let open = self.expect(TokenKind::LBrace, "'{' before the denominator")?;
        let denominator = self.expression()?;
        self.expect_closer('{', open.pos)?;
        Ok(numerator / denominator)
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.group()?;
        if *self.peek_kind() == TokenKind::Caret {
            self.advance();
            let exponent = self.power()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn group(&mut self) -> Result<Expr, ParseError> {
        let open = match self.peek_kind() {
            TokenKind::LParen => '(',
            TokenKind::LBrace => '{',
            _ => return self.atom(),
        };
        let tok = self.advance();
        let inner = self.expression()?;
        self.expect_closer(open, tok.pos)?;
        Ok(inner)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Num(val) => Ok(Expr::Const(val)),
            TokenKind::Var(name) => Ok(Expr::Var(self.vars.intern(name)?)),
            TokenKind::RParen => Err(ParseError::UnmatchedClose { close: ')', pos: tok.pos }),
            TokenKind::RBrace => Err(ParseError::UnmatchedClose { close: '}', pos: tok.pos }),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "a number, an identifier or a group",
                pos: tok.pos,
            }),
        }
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<ExprTree, ParseError> {
    ExprParser::new(tokens).parse()
}

impl ExprTree {
    /// tokenize + parse
    pub fn parse_expression(text: &str) -> Result<ExprTree, SymbolicError> {
        let tokens = tokenize(text)?;
        Ok(parse(tokens)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::VarId;

    fn x() -> Expr {
        Expr::Var(VarId(0))
    }

    fn parse_str(text: &str) -> Result<ExprTree, ParseError> {
        parse(tokenize(text).unwrap())
    }

    #[test]
    fn test_precedence() {
        let tree = parse_str("x^2 + 2 \\cdot x - 1").unwrap();
        let expected = (x().pow(Expr::Const(2.0)) + Expr::Const(2.0) * x()) - Expr::Const(1.0);
        assert_eq!(tree.root, expected);
        assert_eq!(tree.vars.names(), &["x".to_string()]);
    }

    #[test]
    fn test_power_is_right_associative() {
        let tree = parse_str("x^2^3").unwrap();
        assert_eq!(
            tree.root,
            x().pow(Expr::Const(2.0).pow(Expr::Const(3.0)))
        );
    }

    #[test]
    fn test_left_associative_sums_and_products() {
        let tree = parse_str("1 - 2 - 3").unwrap();
        assert_eq!(
            tree.root,
            (Expr::Const(1.0) - Expr::Const(2.0)) - Expr::Const(3.0)
        );
        let tree = parse_str("1 \\cdot 2 \\cdot 3").unwrap();
        assert_eq!(
            tree.root,
            (Expr::Const(1.0) * Expr::Const(2.0)) * Expr::Const(3.0)
        );
    }

    #[test]
    fn test_unary_binds_looser_than_power() {
        let tree = parse_str("-x^2").unwrap();
        assert_eq!(tree.root, -(x().pow(Expr::Const(2.0))));
        let tree = parse_str("\\sin x^2").unwrap();
        assert_eq!(tree.root, x().pow(Expr::Const(2.0)).sin());
        let tree = parse_str("\\ln \\sqrt{x}").unwrap();
        assert_eq!(tree.root, x().sqrt().ln());
    }

    #[test]
    fn test_fraction_and_groups() {
        let tree = parse_str("\\frac{1}{x + 1}").unwrap();
        assert_eq!(tree.root, Expr::Const(1.0) / (x() + Expr::Const(1.0)));
        let tree = parse_str("{x + 1} \\cdot (x - 1)").unwrap();
        assert_eq!(
            tree.root,
            (x() + Expr::Const(1.0)) * (x() - Expr::Const(1.0))
        );
    }

    #[test]
    fn test_variables_in_first_occurrence_order() {
        let tree = parse_str("y + x \\cdot y + \\alpha").unwrap();
        assert_eq!(
            tree.vars.names(),
            &["y".to_string(), "x".to_string(), "\\alpha".to_string()]
        );
        assert_eq!(tree.var_id("x"), Some(VarId(1)));
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(
            parse_str("(x+1"),
            Err(ParseError::UnclosedGroup {
                open: '(',
                pos: 0,
                found: "end of input".to_string()
            })
        );
        assert!(matches!(
            parse_str("\\frac{1}{x"),
            Err(ParseError::UnclosedGroup { open: '{', pos: 8, .. })
        ));
    }

    #[test]
    fn test_unmatched_close_and_trailing_input() {
        assert_eq!(
            parse_str("x + 1)"),
            Err(ParseError::UnmatchedClose { close: ')', pos: 5 })
        );
        assert!(matches!(
            parse_str("2 x"),
            Err(ParseError::TrailingInput { pos: 2, .. })
        ));
        assert!(matches!(
            parse_str("x +"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_str("\\frac 1 2"),
            Err(ParseError::UnexpectedToken { pos: 6, .. })
        ));
    }

    #[test]
    fn test_too_many_variables() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p"];
        let ok = names.join(" + ");
        assert_eq!(parse_str(&ok).unwrap().vars.len(), VarTable::MAX_VARS);
        let too_many = format!("{} + q", ok);
        assert!(matches!(
            parse_str(&too_many),
            Err(ParseError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn test_parse_expression_reports_lex_errors() {
        assert!(matches!(
            ExprTree::parse_expression("x ? 1"),
            Err(SymbolicError::Lex(_))
        ));
        assert!(matches!(
            ExprTree::parse_expression("(x"),
            Err(SymbolicError::Parse(ParseError::UnclosedGroup { .. }))
        ));
    }
}
