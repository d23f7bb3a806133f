//! # Frenet Curve Module
//!
//! Differential geometry of a parametric space curve built from symbolic
//! formulas.
//!
//! ## Purpose
//!
//! A curve is given by three component formulas x(t), y(t), z(t) and a
//! reparametrization t = g(r) over a domain of r. Building a [`FrenetCurve`]
//! substitutes g(r) into the components, differentiates three times with
//! respect to r and combines the results into symbolic formulas for
//!
//! - tangent T = C' / |C'|
//! - binormal B = (C' x C'') / |C' x C''|
//! - normal N = B x T
//! - curvature k = |C' x C''| / |C'|^3 and its radius 1/k
//! - torsion tau = (C' x C'') . C''' / |C' x C''|^2
//!
//! All trees are built once in [`FrenetCurve::new`] and never change. Editing
//! a formula, the domain or the reparametrization means building a new curve.
//!
//! ## Evaluation
//!
//! Every evaluation binds r in a fresh [`VariableTable`], so a curve can be
//! evaluated from several threads at once. A quantity whose denominator is
//! within `epsilon` of zero at r is undefined there: the `is_*_defined`
//! checks report it and the `evaluate_*` methods return
//! [`CurveError::Undefined`].
//!
//! # Example
//! ```
//! use FrenetSciThe::geometry::frenet_curve::{Domain, FrenetCurve};
//! let circle = FrenetCurve::from_strings(
//!     ["cos(t)", "sin(t)", "0"],
//!     "r",
//!     Domain::new(0.0, 2.0 * std::f64::consts::PI).unwrap(),
//! )
//! .unwrap();
//! assert!((circle.evaluate_curvature(1.0).unwrap() - 1.0).abs() < 1e-9);
//! ```

use log::{debug, info, warn};
use nalgebra::Vector3;
use strum_macros::Display;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{DerivativeError, EvaluationError, ParseError};
use crate::symbolic::symbolic_vectors::ExprVector3;
use crate::symbolic::variables::{Variable, VariableTable};

/// default definedness threshold
pub const DEFAULT_EPSILON: f64 = 1e-6;
/// slot of the component formulas
pub const CURVE_PARAMETER: Variable = Variable::T;
/// slot of the reparametrization formula
pub const REPARAMETRIZATION_PARAMETER: Variable = Variable::R;

/// Role of a formula inside a curve definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum CurveRole {
    #[strum(to_string = "x(t)")]
    X,
    #[strum(to_string = "y(t)")]
    Y,
    #[strum(to_string = "z(t)")]
    Z,
    #[strum(to_string = "reparametrization t(r)")]
    Reparametrization,
}

impl CurveRole {
    const COMPONENTS: [CurveRole; 3] = [CurveRole::X, CurveRole::Y, CurveRole::Z];

    /// the only slot a formula of this role may reference
    pub fn parameter(self) -> Variable {
        match self {
            CurveRole::Reparametrization => REPARAMETRIZATION_PARAMETER,
            _ => CURVE_PARAMETER,
        }
    }
}

/// Frenet quantity, used to report which one is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Quantity {
    Tangent,
    Normal,
    Binormal,
    Curvature,
    CurvatureRadius,
    Torsion,
}

#[derive(Debug, Error)]
pub enum CurveError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{role} must depend on `{}` only, found `{variable}`", .role.parameter())]
    Validation { variable: Variable, role: CurveRole },
    #[error(transparent)]
    Derivative(#[from] DerivativeError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("invalid domain [{start}, {end}]: bounds must be finite")]
    InvalidDomain { start: f64, end: f64 },
    #[error("invalid epsilon {epsilon}: must be positive and finite")]
    InvalidEpsilon { epsilon: f64 },
    #[error("{quantity} is undefined at r = {r}")]
    Undefined { quantity: Quantity, r: f64 },
}

/// Bounds of the reparametrization parameter r.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub start: f64,
    pub end: f64,
}

impl Domain {
    pub fn new(start: f64, end: f64) -> Result<Self, CurveError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CurveError::InvalidDomain { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, r: f64) -> bool {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        lo <= r && r <= hi
    }

    /// `n` evenly spaced values from start to end, both included
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

impl TryFrom<(f64, f64)> for Domain {
    type Error = CurveError;

    fn try_from((start, end): (f64, f64)) -> Result<Self, Self::Error> {
        Domain::new(start, end)
    }
}

/// All Frenet quantities at one parameter value. `None` marks a quantity
/// undefined at `r`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrenetFrame {
    pub r: f64,
    pub position: Vector3<f64>,
    pub tangent: Option<Vector3<f64>>,
    pub normal: Option<Vector3<f64>>,
    pub binormal: Option<Vector3<f64>>,
    pub curvature: Option<f64>,
    pub curvature_radius: Option<f64>,
    pub torsion: Option<f64>,
}

/// Immutable curve with its cached derived formulas.
#[derive(Clone, Debug, PartialEq)]
pub struct FrenetCurve {
    components: ExprVector3,
    reparametrization: Expr,
    domain: Domain,
    epsilon: f64,
    /// C(g(r))
    reparametrized: ExprVector3,
    first_derivative: ExprVector3,
    second_derivative: ExprVector3,
    third_derivative: ExprVector3,
    /// |C'|
    speed: Expr,
    /// C' x C''
    binormal_direction: ExprVector3,
    binormal_direction_norm: Expr,
    tangent: ExprVector3,
    binormal: ExprVector3,
    normal: ExprVector3,
    curvature: Expr,
    curvature_radius: Expr,
    torsion: Expr,
}

impl FrenetCurve {
    /// Validates the formulas and builds every derived tree.
    ///
    /// Fails with [`CurveError::Validation`] when a component references a
    /// slot other than `t` or the reparametrization references a slot other
    /// than `r`.
    pub fn new(
        components: impl Into<ExprVector3>,
        reparametrization: Expr,
        domain: Domain,
    ) -> Result<Self, CurveError> {
        let components = components.into();
        for (tree, role) in components.iter().zip(CurveRole::COMPONENTS) {
            validate(tree, role)?;
        }
        validate(&reparametrization, CurveRole::Reparametrization)?;
        info!(
            "building Frenet curve x(t) = {}, y(t) = {}, z(t) = {}, t(r) = {}, r in [{}, {}]",
            components.x(),
            components.y(),
            components.z(),
            reparametrization,
            domain.start,
            domain.end
        );

        let r = REPARAMETRIZATION_PARAMETER;
        let reparametrized = components.substitute(CURVE_PARAMETER, &reparametrization);
        let first_derivative = reparametrized.diff(r)?;
        let second_derivative = first_derivative.diff(r)?;
        let third_derivative = second_derivative.diff(r)?;

        let speed = first_derivative.norm();
        let binormal_direction = first_derivative.cross(&second_derivative);
        let binormal_direction_norm = binormal_direction.norm();

        let tangent = first_derivative.div_scalar(&speed);
        let binormal = binormal_direction.div_scalar(&binormal_direction_norm);
        let normal = binormal.cross(&tangent);

        let curvature = &binormal_direction_norm / &speed.clone().pow(Expr::Const(3.0));
        let curvature_radius = Expr::Const(1.0) / curvature.clone();
        let torsion = binormal_direction.dot(&third_derivative)
            / binormal_direction_norm.clone().pow(Expr::Const(2.0));

        let curve = Self {
            components,
            reparametrization,
            domain,
            epsilon: DEFAULT_EPSILON,
            reparametrized,
            first_derivative,
            second_derivative,
            third_derivative,
            speed,
            binormal_direction,
            binormal_direction_norm,
            tangent,
            binormal,
            normal,
            curvature,
            curvature_radius,
            torsion,
        };
        debug!("\n \n DERIVED TREES (nodes) \n \n {}", curve.node_count_table());
        Ok(curve)
    }

    /// Parses the three component formulas and the reparametrization, then
    /// builds the curve.
    pub fn from_strings(
        components: [&str; 3],
        reparametrization: &str,
        domain: Domain,
    ) -> Result<Self, CurveError> {
        let [x, y, z] = components;
        let components = ExprVector3::new(
            Expr::parse_expression(x)?,
            Expr::parse_expression(y)?,
            Expr::parse_expression(z)?,
        );
        let reparametrization = Expr::parse_expression(reparametrization)?;
        Self::new(components, reparametrization, domain)
    }

    /// Same curve with another definedness threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self, CurveError> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(CurveError::InvalidEpsilon { epsilon });
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    fn table(r: f64) -> VariableTable {
        VariableTable::new().with(REPARAMETRIZATION_PARAMETER, r)
    }

    // NaN counts as degenerate
    fn is_degenerate(&self, value: f64) -> bool {
        !(value.abs() > self.epsilon)
    }

    // a denominator that cannot be evaluated counts as degenerate
    fn is_nonzero_at(&self, tree: &Expr, r: f64) -> bool {
        tree.eval_with(&Self::table(r))
            .map(|value| !self.is_degenerate(value))
            .unwrap_or(false)
    }

    fn require(&self, defined: bool, quantity: Quantity, r: f64) -> Result<(), CurveError> {
        if defined {
            Ok(())
        } else {
            Err(CurveError::Undefined { quantity, r })
        }
    }

    /// Position C(g(r)).
    pub fn evaluate(&self, r: f64) -> Result<Vector3<f64>, CurveError> {
        Ok(self.reparametrized.eval_with(&Self::table(r))?)
    }

    pub fn is_tangent_defined(&self, r: f64) -> bool {
        self.is_nonzero_at(&self.speed, r)
    }

    pub fn is_curvature_defined(&self, r: f64) -> bool {
        self.is_nonzero_at(&self.speed, r)
    }

    /// Also undefined where the curvature vanishes (inflection, straight line).
    pub fn is_curvature_radius_defined(&self, r: f64) -> bool {
        self.is_curvature_defined(r) && self.is_nonzero_at(&self.curvature, r)
    }

    pub fn is_binormal_defined(&self, r: f64) -> bool {
        self.is_nonzero_at(&self.binormal_direction_norm, r)
    }

    pub fn is_normal_defined(&self, r: f64) -> bool {
        self.is_binormal_defined(r) && self.is_tangent_defined(r)
    }

    pub fn is_torsion_defined(&self, r: f64) -> bool {
        self.is_nonzero_at(&self.binormal_direction_norm, r)
    }

    pub fn evaluate_tangent(&self, r: f64) -> Result<Vector3<f64>, CurveError> {
        self.require(self.is_tangent_defined(r), Quantity::Tangent, r)?;
        Ok(self.tangent.eval_with(&Self::table(r))?)
    }

    pub fn evaluate_normal(&self, r: f64) -> Result<Vector3<f64>, CurveError> {
        self.require(self.is_normal_defined(r), Quantity::Normal, r)?;
        Ok(self.normal.eval_with(&Self::table(r))?)
    }

    pub fn evaluate_binormal(&self, r: f64) -> Result<Vector3<f64>, CurveError> {
        self.require(self.is_binormal_defined(r), Quantity::Binormal, r)?;
        Ok(self.binormal.eval_with(&Self::table(r))?)
    }

    pub fn evaluate_curvature(&self, r: f64) -> Result<f64, CurveError> {
        self.require(self.is_curvature_defined(r), Quantity::Curvature, r)?;
        Ok(self.curvature.eval_with(&Self::table(r))?)
    }

    pub fn evaluate_curvature_radius(&self, r: f64) -> Result<f64, CurveError> {
        self.require(
            self.is_curvature_radius_defined(r),
            Quantity::CurvatureRadius,
            r,
        )?;
        Ok(self.curvature_radius.eval_with(&Self::table(r))?)
    }

    pub fn evaluate_torsion(&self, r: f64) -> Result<f64, CurveError> {
        self.require(self.is_torsion_defined(r), Quantity::Torsion, r)?;
        Ok(self.torsion.eval_with(&Self::table(r))?)
    }

    /// Every quantity at `r`, undefined ones as `None`.
    pub fn frame_at(&self, r: f64) -> Result<FrenetFrame, CurveError> {
        if !self.domain.contains(r) {
            warn!(
                "frame requested at r = {} outside the domain [{}, {}]",
                r, self.domain.start, self.domain.end
            );
        }
        let table = Self::table(r);
        let tangent = self
            .is_tangent_defined(r)
            .then(|| self.tangent.eval_with(&table))
            .transpose()?;
        let binormal = self
            .is_binormal_defined(r)
            .then(|| self.binormal.eval_with(&table))
            .transpose()?;
        let normal = self
            .is_normal_defined(r)
            .then(|| self.normal.eval_with(&table))
            .transpose()?;
        let curvature = self
            .is_curvature_defined(r)
            .then(|| self.curvature.eval_with(&table))
            .transpose()?;
        let curvature_radius = self
            .is_curvature_radius_defined(r)
            .then(|| self.curvature_radius.eval_with(&table))
            .transpose()?;
        let torsion = self
            .is_torsion_defined(r)
            .then(|| self.torsion.eval_with(&table))
            .transpose()?;
        Ok(FrenetFrame {
            r,
            position: self.reparametrized.eval_with(&table)?,
            tangent,
            normal,
            binormal,
            curvature,
            curvature_radius,
            torsion,
        })
    }

    /// Frames at `n` evenly spaced values over the domain.
    pub fn sample(&self, n: usize) -> Result<Vec<FrenetFrame>, CurveError> {
        self.domain
            .linspace(n)
            .into_iter()
            .map(|r| self.frame_at(r))
            .collect()
    }

    pub fn components(&self) -> &ExprVector3 {
        &self.components
    }

    pub fn reparametrization(&self) -> &Expr {
        &self.reparametrization
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn reparametrized(&self) -> &ExprVector3 {
        &self.reparametrized
    }

    pub fn first_derivative(&self) -> &ExprVector3 {
        &self.first_derivative
    }

    pub fn second_derivative(&self) -> &ExprVector3 {
        &self.second_derivative
    }

    pub fn third_derivative(&self) -> &ExprVector3 {
        &self.third_derivative
    }

    pub fn speed(&self) -> &Expr {
        &self.speed
    }

    pub fn tangent(&self) -> &ExprVector3 {
        &self.tangent
    }

    pub fn normal(&self) -> &ExprVector3 {
        &self.normal
    }

    pub fn binormal(&self) -> &ExprVector3 {
        &self.binormal
    }

    pub fn curvature(&self) -> &Expr {
        &self.curvature
    }

    pub fn curvature_radius(&self) -> &Expr {
        &self.curvature_radius
    }

    pub fn torsion(&self) -> &Expr {
        &self.torsion
    }

    /// table of derived tree sizes, for debugging
    pub fn node_count_table(&self) -> String {
        let rows = [
            ("C(g(r))", self.reparametrized.node_count()),
            ("C'", self.first_derivative.node_count()),
            ("C''", self.second_derivative.node_count()),
            ("C'''", self.third_derivative.node_count()),
            ("|C'|", self.speed.node_count()),
            ("C' x C''", self.binormal_direction.node_count()),
            ("tangent", self.tangent.node_count()),
            ("normal", self.normal.node_count()),
            ("binormal", self.binormal.node_count()),
            ("curvature", self.curvature.node_count()),
            ("curvature radius", self.curvature_radius.node_count()),
            ("torsion", self.torsion.node_count()),
        ];
        let mut builder = Builder::default();
        builder.push_record(["tree".to_string(), "nodes".to_string()]);
        for (name, count) in rows {
            builder.push_record([name.to_string(), count.to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

fn validate(tree: &Expr, role: CurveRole) -> Result<(), CurveError> {
    match tree
        .variables()
        .into_iter()
        .find(|variable| *variable != role.parameter())
    {
        Some(variable) => Err(CurveError::Validation { variable, role }),
        None => Ok(()),
    }
}
