use std::fmt;
use std::ops::Index;

use nalgebra::Vector3;

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{DerivativeError, EvaluationError};
use crate::symbolic::variables::{Variable, VariableTable};

impl Expr {
    /// sqrt(sum of sqr(tree)); the empty sum is the literal 0
    pub fn norm<'a>(trees: impl IntoIterator<Item = &'a Expr>) -> Expr {
        let sum = trees
            .into_iter()
            .map(|tree| tree.clone().sqr())
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0));
        sum.sqrt()
    }

    /// sum of a_i * b_i over pairs; the empty sum is the literal 0
    pub fn dot<'a>(
        lhs: impl IntoIterator<Item = &'a Expr>,
        rhs: impl IntoIterator<Item = &'a Expr>,
    ) -> Expr {
        lhs.into_iter()
            .zip(rhs)
            .map(|(a, b)| a * b)
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0))
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Symbolic 3-vector: one expression tree per coordinate
pub struct ExprVector3 {
    pub data: [Expr; 3],
}

impl ExprVector3 {
    pub fn new(x: Expr, y: Expr, z: Expr) -> Self {
        Self { data: [x, y, z] }
    }

    pub fn x(&self) -> &Expr {
        &self.data[0]
    }

    pub fn y(&self) -> &Expr {
        &self.data[1]
    }

    pub fn z(&self) -> &Expr {
        &self.data[2]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.data.iter()
    }

    /// Differentiate every coordinate with respect to `var`
    pub fn diff(&self, var: Variable) -> Result<ExprVector3, DerivativeError> {
        let [x, y, z] = &self.data;
        Ok(Self::new(x.diff(var)?, y.diff(var)?, z.diff(var)?))
    }

    /// Substitute `var` with `replacement` in every coordinate
    pub fn substitute(&self, var: Variable, replacement: &Expr) -> ExprVector3 {
        let [x, y, z] = &self.data;
        Self::new(
            x.substitute_variable(var, replacement),
            y.substitute_variable(var, replacement),
            z.substitute_variable(var, replacement),
        )
    }

    /// Cross product (symbolic), determinant expansion:
    /// [a.y*b.z - a.z*b.y, a.z*b.x - a.x*b.z, a.x*b.y - a.y*b.x]
    pub fn cross(&self, other: &ExprVector3) -> ExprVector3 {
        let [ax, ay, az] = &self.data;
        let [bx, by, bz] = &other.data;
        Self::new(
            ay * bz - az * by,
            az * bx - ax * bz,
            ax * by - ay * bx,
        )
    }

    /// Dot product (symbolic)
    pub fn dot(&self, other: &ExprVector3) -> Expr {
        Expr::dot(self.iter(), other.iter())
    }

    /// Euclidean length (symbolic)
    pub fn norm(&self) -> Expr {
        Expr::norm(self.iter())
    }

    /// Divide every coordinate by the same scalar tree
    pub fn div_scalar(&self, denominator: &Expr) -> ExprVector3 {
        let [x, y, z] = &self.data;
        Self::new(x / denominator, y / denominator, z / denominator)
    }

    /// Evaluate vector numerically
    pub fn eval_with(&self, table: &VariableTable) -> Result<Vector3<f64>, EvaluationError> {
        let [x, y, z] = &self.data;
        Ok(Vector3::new(
            x.eval_with(table)?,
            y.eval_with(table)?,
            z.eval_with(table)?,
        ))
    }

    pub fn contains_variable(&self, var: Variable) -> bool {
        self.iter().any(|expr| expr.contains_variable(var))
    }

    /// total number of nodes over the three trees
    pub fn node_count(&self) -> usize {
        self.iter().map(Expr::node_count).sum()
    }
}

impl fmt::Display for ExprVector3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.data[0], self.data[1], self.data[2])
    }
}

impl Index<usize> for ExprVector3 {
    type Output = Expr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl From<[Expr; 3]> for ExprVector3 {
    fn from(data: [Expr; 3]) -> Self {
        Self { data }
    }
}
