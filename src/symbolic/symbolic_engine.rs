//! # Symbolic Engine Module
//!
//! The expression tree every other part of the crate is built on.
//!
//! ## Purpose
//!
//! An [`Expr`] is an algebraic tree over the 27 [`Variable`] slots and scalar
//! literals. Trees are values: every transformation (derivative,
//! substitution, arithmetic combination) returns a new tree and leaves its
//! inputs untouched. Each node owns its children through `Box`, so a tree is
//! acyclic and finite by construction and is released exactly once when
//! dropped.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Leaves**: `Const(f64)`, `Var(Variable)`
//! - **Unary**: `Neg`, `Sqr`, `Sqrt`, `sin`, `cos`
//! - **Binary**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//!
//! ### Key Methods
//! - `+ - * /` and unary `-` (std::ops) plus `pow`, `sqr`, `sqrt`, `negate` -
//!   arithmetic combinators building new trees
//! - `contains_variable` - slot membership, with a wildcard matching any slot
//! - `substitute_variable` - replace every occurrence of a slot by a subtree
//! - `Display` - fully parenthesised infix text that parses back to the same tree
//!
//! Differentiation, evaluation and parsing live in
//! [`symbolic_engine_derivatives`](crate::symbolic::symbolic_engine_derivatives)
//! and [`parse_expr`](crate::symbolic::parse_expr).
//!
//! Equality (`==`) is structural: `x + 0` and `x` are different trees.

#![allow(non_camel_case_types)]

use std::collections::BTreeSet;
use std::fmt;

use crate::symbolic::variables::{Variable, VariableMatch};

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```
/// use FrenetSciThe::symbolic::symbolic_engine::Expr;
/// use FrenetSciThe::symbolic::variables::Variable;
/// let t = Expr::Var(Variable::T);
/// let expr = Expr::Add(Box::new(t), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "(t + 2)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numerical constant value
    Const(f64),
    /// Reference to a variable slot
    Var(Variable),
    /// Unary minus: -e
    Neg(Box<Expr>),
    /// Square: e^2
    Sqr(Box<Expr>),
    /// Square root
    Sqrt(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
}

/// Prints every operator inside its own parentheses, so the text parses back
/// into the same tree. Negative literals print as `(-c)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) if val.is_sign_negative() => write!(f, "(-{})", -val),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Var(var) => write!(f, "{}", var),
            Expr::Neg(expr) => write!(f, "(-{})", expr),
            Expr::Sqr(expr) => write!(f, "sqr({})", expr),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

// borrowed operands deep-copy both sides into the new tree
impl std::ops::Add for &Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Expr {
        self.clone() + rhs.clone()
    }
}

impl std::ops::Sub for &Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Expr {
        self.clone() - rhs.clone()
    }
}

impl std::ops::Mul for &Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Expr {
        self.clone() * rhs.clone()
    }
}

impl std::ops::Div for &Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Expr {
        self.clone() / rhs.clone()
    }
}

impl std::ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Expr::Var(variable)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// base ^ exponent
    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(self.boxed(), exponent.boxed())
    }

    pub fn sqr(self) -> Expr {
        Expr::Sqr(self.boxed())
    }

    pub fn sqrt(self) -> Expr {
        Expr::Sqrt(self.boxed())
    }

    /// same as unary `-`
    pub fn negate(self) -> Expr {
        Expr::Neg(self.boxed())
    }

    /// Checks whether any node references the slot. The wildcard
    /// [`VariableMatch::Any`] always matches.
    ///
    /// ```
    /// use FrenetSciThe::symbolic::symbolic_engine::Expr;
    /// use FrenetSciThe::symbolic::variables::{Variable, VariableMatch};
    /// let e = Expr::Var(Variable::T).sqr();
    /// assert!(e.contains_variable(Variable::T));
    /// assert!(!e.contains_variable(Variable::R));
    /// assert!(Expr::Const(1.0).contains_variable(VariableMatch::Any));
    /// ```
    pub fn contains_variable(&self, var: impl Into<VariableMatch>) -> bool {
        match var.into() {
            VariableMatch::Any => true,
            VariableMatch::Slot(var) => self.references(var),
        }
    }

    fn references(&self, var: Variable) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(name) => *name == var,
            Expr::Neg(expr)
            | Expr::Sqr(expr)
            | Expr::Sqrt(expr)
            | Expr::sin(expr)
            | Expr::cos(expr) => expr.references(var),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.references(var) || rhs.references(var),
        }
    }

    /// All slots referenced by the tree, in slot order.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut BTreeSet<Variable>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(var) => {
                found.insert(*var);
            }
            Expr::Neg(expr)
            | Expr::Sqr(expr)
            | Expr::Sqrt(expr)
            | Expr::sin(expr)
            | Expr::cos(expr) => expr.collect_variables(found),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(found);
                rhs.collect_variables(found);
            }
        }
    }

    /// Substitute every reference to `var` with a copy of `replacement`.
    ///
    /// This is how reparametrization is realised: `x(t)` with `t = g(r)`
    /// becomes `x(g(r))`.
    pub fn substitute_variable(&self, var: Variable, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| e.substitute_variable(var, replacement).boxed();
        match self {
            Expr::Var(name) if *name == var => replacement.clone(),
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Neg(expr) => Expr::Neg(sub(expr)),
            Expr::Sqr(expr) => Expr::Sqr(sub(expr)),
            Expr::Sqrt(expr) => Expr::Sqrt(sub(expr)),
            Expr::sin(expr) => Expr::sin(sub(expr)),
            Expr::cos(expr) => Expr::cos(sub(expr)),
            Expr::Add(lhs, rhs) => Expr::Add(sub(lhs), sub(rhs)),
            Expr::Sub(lhs, rhs) => Expr::Sub(sub(lhs), sub(rhs)),
            Expr::Mul(lhs, rhs) => Expr::Mul(sub(lhs), sub(rhs)),
            Expr::Div(lhs, rhs) => Expr::Div(sub(lhs), sub(rhs)),
            Expr::Pow(base, exp) => Expr::Pow(sub(base), sub(exp)),
        }
    }

    /// number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Neg(expr)
            | Expr::Sqr(expr)
            | Expr::Sqrt(expr)
            | Expr::sin(expr)
            | Expr::cos(expr) => 1 + expr.node_count(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
        }
    }

    /// Checks if the expression is the literal 0.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }
}
