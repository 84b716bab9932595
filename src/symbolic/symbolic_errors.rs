//! Error types of every stage of the text -> tree -> LaTeX pipeline.
use crate::symbolic::symbolic_engine::Expr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("invalid symbol '{symbol}' at position {pos}")]
    InvalidSymbol { symbol: char, pos: usize },
    #[error("identifier '{name}' at position {pos} is longer than {max} characters")]
    IdentifierTooLong { name: String, pos: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },
    #[error("'{open}' opened at position {pos} is never closed (found {found})")]
    UnclosedGroup { open: char, pos: usize, found: String },
    #[error("'{close}' at position {pos} has no matching opening bracket")]
    UnmatchedClose { close: char, pos: usize },
    #[error("trailing input: {found} at position {pos} after a complete expression")]
    TrailingInput { found: String, pos: usize },
    #[error("too many distinct variables: '{name}' would exceed the limit of {max}")]
    TooManyVariables { name: String, max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    #[error("variable '{0}' does not occur in the expression")]
    UnknownVariable(String),
}

/// Degenerate algebra met by the simplifier. The node is left as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
    #[error("division by exact zero")]
    DivisionByZero { numerator: Expr },
    #[error("logarithm of exact zero")]
    LogOfZero,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("expression needs more than {max} extracted subexpressions")]
    TooManyLabels { max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("no value given for variable '{0}'")]
    Unbound(String),
    #[error("{got} values given for {expected} variables")]
    ArityMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("cannot read task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupted task file: invalid {section} ({detail})")]
    Format {
        section: &'static str,
        detail: String,
    },
    #[error("function variable '{expected}' does not match {section} variable '{found}'")]
    VariableMismatch {
        section: &'static str,
        expected: String,
        found: String,
    },
    #[error("invalid plot range [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },
    #[error("loglevel must be debug, info, warn, error, off or none, got '{0}'")]
    UnknownLogLevel(String),
}

/// Umbrella error for callers driving the whole pipeline with `?`.
#[derive(Debug, Error)]
pub enum SymbolicError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error(transparent)]
    Simplify(#[from] SimplifyError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Task(#[from] TaskError),
}
