//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use FrenetSciThe::symbolic::parse_expr::parse_expression_func;
//! let parsed = parse_expression_func("cos(t) + 2*sqr(t)").unwrap();
//! assert_eq!(parsed.to_string(), "(cos(t) + (2 * sqr(t)))");
//! ```
//!
//! grammar, lowest precedence first:
//! ```text
//!     expression := term (('+' | '-') term)*
//!     term       := unary (('*' | '/') unary)*
//!     unary      := '-' unary | power
//!     power      := atom ('^' unary)?          right associative
//!     atom       := number | '(' expression ')' | function '(' expression ')' | variable
//! ```
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{alpha1, char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{ParseError, ParseErrorKind};
use crate::symbolic::variables::Variable;

/// Wraps a parser so that it ignores surrounding whitespace
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// integer or decimal literal: `12`, `1.5`, `3.`, `.25`
fn decimal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = decimal(input)?;
    match text.parse::<f64>() {
        Ok(value) => Ok((rest, Expr::Const(value))),
        Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::Float))),
    }
}

/// letters followed by optional digits, e.g. `t`, `sqrt`, `z1`
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, digit0)).parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(ws(char('(')), expression, ws(char(')'))).parse(input)
}

/// Either a function call or a variable slot. Unknown identifiers are a hard
/// failure so that alternatives are not tried.
fn function_or_variable(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let name = name.to_ascii_lowercase();
    let function: Option<fn(Box<Expr>) -> Expr> = match name.as_str() {
        "sin" => Some(Expr::sin),
        "cos" => Some(Expr::cos),
        "sqr" => Some(Expr::Sqr),
        "sqrt" => Some(Expr::Sqrt),
        _ => None,
    };
    if let Some(function) = function {
        return match parenthesized(rest) {
            Ok((rest, argument)) => Ok((rest, function(argument.boxed()))),
            Err(nom::Err::Error(_)) => Err(nom::Err::Failure(Error::new(input, ErrorKind::Char))),
            Err(err) => Err(err),
        };
    }
    match name.parse::<Variable>() {
        Ok(variable) => Ok((rest, Expr::Var(variable))),
        Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

fn atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((number, parenthesized, function_or_variable))).parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) = opt(preceded(ws(char('^')), unary)).parse(rest)?;
    let expr = match exponent {
        Some(exponent) => Expr::Pow(base.boxed(), exponent.boxed()),
        None => base,
    };
    Ok((rest, expr))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        preceded(ws(char('-')), unary).map(|expr| Expr::Neg(expr.boxed())),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (rest, first) = unary(input)?;
    let (rest, tail) = many0(pair(ws(one_of("*/")), unary)).parse(rest)?;
    let expr = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
        _ => Expr::Div(acc.boxed(), rhs.boxed()),
    });
    Ok((rest, expr))
}

fn expression(input: &str) -> IResult<&str, Expr> {
    let (rest, first) = term(input)?;
    let (rest, tail) = many0(pair(ws(one_of("+-")), term)).parse(rest)?;
    let expr = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => Expr::Add(acc.boxed(), rhs.boxed()),
        _ => Expr::Sub(acc.boxed(), rhs.boxed()),
    });
    Ok((rest, expr))
}

/// Finds the first parenthesis without a partner: a `)` closing nothing, or
/// the innermost `(` left open at the end.
fn find_unbalanced_bracket(input: &str) -> Option<usize> {
    let mut open = Vec::new();
    for (i, c) in input.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                if open.pop().is_none() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    open.pop()
}

/// Deepest nesting the recursive descent is allowed to reach.
pub const MAX_NESTING: usize = 128;

/// Position of the first token nested deeper than [`MAX_NESTING`]. Every open
/// bracket is one level, and so is every prefix minus or `^` still pending at
/// the current bracket level. A binary operator closes the pending chain of
/// its level.
fn find_too_deep(input: &str) -> Option<usize> {
    // pending prefix minus and `^` per open bracket level
    let mut pending = vec![0usize];
    let mut depth = 0usize;
    let mut expect_operand = true;
    for (i, c) in input.char_indices() {
        match c {
            c if c.is_whitespace() => continue,
            '(' => {
                pending.push(0);
                depth += 1;
                expect_operand = true;
            }
            ')' => {
                if pending.len() > 1 {
                    if let Some(level) = pending.pop() {
                        depth -= 1 + level;
                    }
                }
                expect_operand = false;
            }
            '^' => {
                if let Some(level) = pending.last_mut() {
                    *level += 1;
                    depth += 1;
                }
                expect_operand = true;
            }
            '-' if expect_operand => {
                if let Some(level) = pending.last_mut() {
                    *level += 1;
                    depth += 1;
                }
            }
            '+' | '-' | '*' | '/' => {
                if let Some(level) = pending.last_mut() {
                    depth -= *level;
                    *level = 0;
                }
                expect_operand = true;
            }
            _ => expect_operand = false,
        }
        if depth > MAX_NESTING {
            return Some(i);
        }
    }
    None
}

// position of `rest` inside `whole`; nom hands back suffixes of the input
fn offset(whole: &str, rest: &str) -> usize {
    whole.len().saturating_sub(rest.len())
}

/// Parses the whole input into an [`Expr`], or reports the first offending
/// token.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, input, 0));
    }
    if let Some(position) = find_unbalanced_bracket(input) {
        return Err(ParseError::new(
            ParseErrorKind::ParenthesisMismatch,
            input,
            position,
        ));
    }
    if let Some(position) = find_too_deep(input) {
        return Err(ParseError::new(ParseErrorKind::TooDeep, input, position));
    }
    match ws(expression).parse(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(ParseError::new(
            ParseErrorKind::Syntax,
            input,
            offset(input, rest),
        )),
        Err(nom::Err::Failure(err)) => {
            let kind = match err.code {
                ErrorKind::Verify => ParseErrorKind::UnknownToken,
                ErrorKind::Float => ParseErrorKind::InvalidNumber,
                ErrorKind::Char => ParseErrorKind::MissingArgument,
                _ => ParseErrorKind::Syntax,
            };
            Err(ParseError::new(kind, input, offset(input, err.input)))
        }
        Err(nom::Err::Error(err)) => Err(ParseError::new(
            ParseErrorKind::Syntax,
            input,
            offset(input, err.input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(
            ParseErrorKind::Syntax,
            input,
            input.len(),
        )),
    }
}
