//! Tokenizer: raw LaTeX-like text -> flat token sequence terminated by `Eof`.
//!
//! Recognised input:
//! - unsigned decimal numbers with optional fraction and exponent (`2`, `0.5`, `.5`, `1e-3`);
//!   a leading sign is always lexed as a separate `-`/`+` token
//! - `+ - ^ ( ) { }`
//! - `\cdot`, `\frac`, the sizing prefixes `\left` / `\right` (dropped) and the function
//!   keywords of [`UnaryOp`], all matched case-insensitively by prefix
//! - identifiers: letters and underscores, optionally led by one backslash (`x`, `t_0`,
//!   `\alpha`), at most [`MAX_IDENT_LEN`] characters. A backslash never continues an
//!   identifier, it starts the next token: `x\cdot y` and `x\right)` split after `x`
use crate::symbolic::symbolic_errors::LexError;
use crate::symbolic::symbolic_ops::UnaryOp;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fmt;

pub const MAX_IDENT_LEN: usize = 32;

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^\\?[A-Za-z_]+").unwrap();
    /// keyword table, longest spelling first so that prefixes never shadow longer keywords
    static ref KEYWORDS: Vec<(&'static str, Keyword)> = {
        let mut table: Vec<(&'static str, Keyword)> = vec![
            ("\\cdot", Keyword::Cdot),
            ("\\frac", Keyword::Frac),
            ("\\left", Keyword::Sizing),
            ("\\right", Keyword::Sizing),
        ];
        table.extend(
            UnaryOp::functions().filter_map(|op| op.keyword().map(|kw| (kw, Keyword::Func(op)))),
        );
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Keyword {
    Cdot,
    Frac,
    Sizing,
    Func(UnaryOp),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Num(f64),
    Plus,
    Minus,
    Cdot,
    Frac,
    Caret,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Func(UnaryOp),
    Var(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Num(val) => write!(f, "number {}", val),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Cdot => write!(f, "'\\cdot'"),
            TokenKind::Frac => write!(f, "'\\frac'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Func(op) => write!(f, "function '{}'", op.latex()),
            TokenKind::Var(name) => write!(f, "identifier '{}'", name),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token and the byte offset where it starts in the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

fn match_keyword(rest: &str) -> Option<(usize, Keyword)> {
    KEYWORDS.iter().find_map(|(spelling, keyword)| {
        let len = spelling.len();
        match rest.get(..len) {
            Some(head) if head.eq_ignore_ascii_case(spelling) => Some((len, *keyword)),
            _ => None,
        }
    })
}

pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        if let Some(m) = NUMBER_RE.find(rest) {
            let value = m.as_str().parse::<f64>().map_err(|_| LexError::InvalidSymbol {
                symbol: ch,
                pos,
            })?;
            tokens.push(Token {
                kind: TokenKind::Num(value),
                pos,
            });
            pos += m.end();
            continue;
        }

        let single = match ch {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, pos });
            pos += 1;
            continue;
        }

        if let Some((len, keyword)) = match_keyword(rest) {
            let kind = match keyword {
                Keyword::Cdot => Some(TokenKind::Cdot),
                Keyword::Frac => Some(TokenKind::Frac),
                Keyword::Sizing => None,
                Keyword::Func(op) => Some(TokenKind::Func(op)),
            };
            if let Some(kind) = kind {
                tokens.push(Token { kind, pos });
            }
            pos += len;
            continue;
        }

        if let Some(m) = NAME_RE.find(rest) {
            let name = m.as_str();
            if name.len() > MAX_IDENT_LEN {
                return Err(LexError::IdentifierTooLong {
                    name: name.to_string(),
                    pos,
                    max: MAX_IDENT_LEN,
                });
            }
            tokens.push(Token {
                kind: TokenKind::Var(name.to_string()),
                pos,
            });
            pos += m.end();
            continue;
        }

        return Err(LexError::InvalidSymbol { symbol: ch, pos });
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: text.len(),
    });
    debug!("tokenized {:?} into {} tokens", text, tokens.len());
    Ok(tokens)
}
