//! differential geometry of parametric space curves
/// Frenet frame, curvature and torsion of a curve given by symbolic formulas
pub mod frenet_curve;
/// curve definition files and CSV export of sampled frames
pub mod curve_io;
#[cfg(test)]
mod frenet_curve_tests;
