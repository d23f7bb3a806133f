//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, numeric evaluation and parsing entry points for [`Expr`].
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var)` - exact symbolic partial derivative
//! - `n_th_derivative(var, n)` - repeated differentiation
//!
//! ### Evaluation
//! - `eval_with(&table)` - evaluate against an explicit [`VariableTable`]
//! - `evaluate()` - evaluate against this thread's global table
//!
//! ### Parsing
//! - `parse_expression(input)` - string to symbolic expression
//!
//! Derivatives are produced by the rules alone: `d/dx(5)` yields the literal
//! `0`, but sums such as `x + 0` coming out of the rules are kept as they are.

use std::str::FromStr;

use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{DerivativeError, EvaluationError, ParseError};
use crate::symbolic::variables::{Variable, VariableTable, with_global_table};

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Power rule: d/dx(f^n) = n*f^(n-1)*f'  (`n` must not depend on `var`)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/sqr(g)
    /// - Chain rule through `sqr`, `sqrt`, `sin`, `cos`
    ///
    /// Every other slot is treated as a constant.
    ///
    /// # Examples
    /// ```
    /// use FrenetSciThe::symbolic::symbolic_engine::Expr;
    /// use FrenetSciThe::symbolic::variables::{Variable, VariableTable};
    /// let f = Expr::parse_expression("t^3").unwrap();
    /// let df = f.diff(Variable::T).unwrap();
    /// let table = VariableTable::new().with(Variable::T, 2.0);
    /// assert_eq!(df.eval_with(&table).unwrap(), 12.0);
    /// ```
    pub fn diff(&self, var: Variable) -> Result<Expr, DerivativeError> {
        let d = match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(name) => {
                if *name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Neg(expr) => Expr::Neg(Box::new(expr.diff(var)?)),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)?), Box::new(rhs.diff(var)?)),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)?), Box::new(rhs.diff(var)?)),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)?), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)?))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)?), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)?))),
                )),
                Box::new(Expr::Sqr(rhs.clone())),
            ),
            Expr::Pow(base, exp) => {
                if exp.contains_variable(var) {
                    return Err(DerivativeError::NonConstantExponent { variable: var });
                }
                // f^0 is the constant 1
                if exp.is_zero() {
                    return Ok(Expr::Const(0.0));
                }
                // literal exponents are lowered directly, anything else as (exp - 1)
                let lowered = match exp.as_ref() {
                    Expr::Const(n) => Expr::Const(n - 1.0),
                    other => Expr::Sub(Box::new(other.clone()), Box::new(Expr::Const(1.0))),
                };
                Expr::Mul(
                    Box::new(Expr::Mul(
                        exp.clone(),
                        Box::new(Expr::Pow(base.clone(), Box::new(lowered))),
                    )),
                    Box::new(base.diff(var)?),
                )
            }
            Expr::Sqr(expr) => Expr::Mul(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Mul(expr.clone(), Box::new(expr.diff(var)?))),
            ),
            Expr::Sqrt(expr) => Expr::Div(
                Box::new(expr.diff(var)?),
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(2.0)),
                    Box::new(Expr::Sqrt(expr.clone())),
                )),
            ),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)?))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Neg(Box::new(Expr::sin(expr.clone())))),
                Box::new(expr.diff(var)?),
            ),
        };
        Ok(d)
    }

    /// n-th derivative, `n == 0` returns a copy of the expression
    pub fn n_th_derivative(&self, var: Variable, n: usize) -> Result<Expr, DerivativeError> {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var)?;
        }
        Ok(expr)
    }

    /// EVALUATION

    /// Evaluates the expression against an explicit variable table.
    ///
    /// Fails on division by an exact zero, square root of a negative value
    /// and powers without a real result (`(-8)^(1/3)`, `0^-1`).
    pub fn eval_with(&self, table: &VariableTable) -> Result<f64, EvaluationError> {
        let value = match self {
            Expr::Const(val) => *val,
            Expr::Var(var) => table.get_value(*var),
            Expr::Neg(expr) => -expr.eval_with(table)?,
            Expr::Sqr(expr) => {
                let val = expr.eval_with(table)?;
                val * val
            }
            Expr::Sqrt(expr) => {
                let val = expr.eval_with(table)?;
                if val < 0.0 {
                    return Err(EvaluationError::SqrtOfNegative { value: val });
                }
                val.sqrt()
            }
            Expr::sin(expr) => expr.eval_with(table)?.sin(),
            Expr::cos(expr) => expr.eval_with(table)?.cos(),
            Expr::Add(lhs, rhs) => lhs.eval_with(table)? + rhs.eval_with(table)?,
            Expr::Sub(lhs, rhs) => lhs.eval_with(table)? - rhs.eval_with(table)?,
            Expr::Mul(lhs, rhs) => lhs.eval_with(table)? * rhs.eval_with(table)?,
            Expr::Div(lhs, rhs) => {
                let numerator = lhs.eval_with(table)?;
                let denominator = rhs.eval_with(table)?;
                if denominator == 0.0 {
                    return Err(EvaluationError::DivisionByZero);
                }
                numerator / denominator
            }
            Expr::Pow(base, exp) => {
                let base = base.eval_with(table)?;
                let exponent = exp.eval_with(table)?;
                let result = base.powf(exponent);
                let no_real_result =
                    result.is_nan() && !base.is_nan() && !exponent.is_nan();
                if no_real_result || (base == 0.0 && exponent < 0.0) {
                    return Err(EvaluationError::InvalidPower { base, exponent });
                }
                result
            }
        };
        Ok(value)
    }

    /// Evaluates the expression against this thread's global variable table
    /// (see [`crate::symbolic::variables::set_value`] and
    /// [`crate::symbolic::variables::bind`]).
    pub fn evaluate(&self) -> Result<f64, EvaluationError> {
        with_global_table(|table| self.eval_with(table))
    }

    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: single letters `a`..`z` and `z1`, case-insensitive
    /// - Constants: `3`, `2.5`, `.5`
    /// - Operators: `+`, `-`, `*`, `/`, `^` and unary minus
    /// - Functions: `sin`, `cos`, `sqrt`, `sqr`
    /// - Parentheses for grouping
    ///
    /// # Examples
    /// ```
    /// use FrenetSciThe::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("t^2 + 2*t + 1").unwrap();
    /// assert_eq!(expr.to_string(), "(((t ^ 2) + (2 * t)) + 1)");
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }

    /// Parses multiple expressions, stopping at the first failure.
    pub fn parse_vector_expression(input: &[&str]) -> Result<Vec<Expr>, ParseError> {
        input.iter().map(|s| parse_expression_func(s)).collect()
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression_func(s)
    }
}
