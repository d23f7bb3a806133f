use strum_macros::Display;
use thiserror::Error;

use crate::symbolic::variables::Variable;

/// What went wrong while parsing an expression string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ParseErrorKind {
    #[strum(to_string = "empty expression")]
    Empty,
    #[strum(to_string = "unknown token")]
    UnknownToken,
    #[strum(to_string = "unbalanced parenthesis")]
    ParenthesisMismatch,
    #[strum(to_string = "syntax error")]
    Syntax,
    #[strum(to_string = "malformed number")]
    InvalidNumber,
    #[strum(to_string = "function without parenthesised argument")]
    MissingArgument,
    #[strum(to_string = "expression nested too deeply")]
    TooDeep,
}

/// Malformed expression text. Carries the whole expression, the byte position
/// of the failure and the offending token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot parse `{expression}`: {kind} at position {position} (`{fragment}`)")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub expression: String,
    pub position: usize,
    pub fragment: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, expression: &str, position: usize) -> Self {
        let position = position.min(expression.len());
        Self {
            kind,
            expression: expression.to_string(),
            position,
            fragment: offending_token(&expression[position..]),
        }
    }
}

// identifier or number run, otherwise the single character at the failure
fn offending_token(rest: &str) -> String {
    let rest = rest.trim_start();
    let mut chars = rest.chars();
    match chars.next() {
        None => "end of input".to_string(),
        Some(c) if c.is_ascii_alphanumeric() || c == '.' => rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '.')
            .collect(),
        Some(c) => c.to_string(),
    }
}

/// Failure of symbolic differentiation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DerivativeError {
    #[error("cannot differentiate a power whose exponent depends on `{variable}`")]
    NonConstantExponent { variable: Variable },
}

/// Arithmetic fault during numeric evaluation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("square root of negative value {value}")]
    SqrtOfNegative { value: f64 },
    #[error("power {base}^{exponent} is not a real number")]
    InvalidPower { base: f64, exponent: f64 },
}
