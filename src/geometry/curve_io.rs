//! Curve definition files and CSV export of sampled frames.
//!
//! A curve definition is plain text. Blank lines and lines starting with `#`
//! are skipped; the first three remaining lines are x(t), y(t), z(t), the
//! fourth holds the domain bounds, anything after it is ignored:
//!
//! ```text
//! # helix
//! cos(t)
//! sin(t)
//! t / 4
//! 0, 12.566
//! ```
//!
//! The comma after the first bound is optional.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::Writer;
use log::info;
use thiserror::Error;

use crate::geometry::frenet_curve::{
    CURVE_PARAMETER, CurveError, Domain, FrenetCurve, FrenetFrame, REPARAMETRIZATION_PARAMETER,
};
use crate::symbolic::symbolic_engine::Expr;

#[derive(Debug, Error)]
pub enum CurveFileError {
    #[error("cannot access curve file: {0}")]
    Io(#[from] io::Error),
    #[error("curve file ends before the {expected} line")]
    MissingLine { expected: &'static str },
    #[error("malformed domain on line {line}: `{text}`")]
    Format { line: usize, text: String },
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error("cannot write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw content of a curve definition file.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveDefinition {
    pub x: String,
    pub y: String,
    pub z: String,
    pub domain: Domain,
}

const EXPECTED_LINES: [&str; 4] = ["x(t)", "y(t)", "z(t)", "domain"];

pub fn parse_curve_definition(text: &str) -> Result<CurveDefinition, CurveFileError> {
    // (1-based line number, trimmed content) of the significant lines
    let mut significant = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let mut formulas = Vec::with_capacity(3);
    for &expected in &EXPECTED_LINES[..3] {
        let (_, line) = significant
            .next()
            .ok_or(CurveFileError::MissingLine { expected })?;
        formulas.push(line.to_string());
    }
    let (line_number, domain_line) = significant.next().ok_or(CurveFileError::MissingLine {
        expected: EXPECTED_LINES[3],
    })?;
    let domain = parse_domain(domain_line).ok_or_else(|| CurveFileError::Format {
        line: line_number,
        text: domain_line.to_string(),
    })?;

    let [x, y, z]: [String; 3] = formulas
        .try_into()
        .map_err(|_| CurveFileError::MissingLine {
            expected: EXPECTED_LINES[0],
        })?;
    Ok(CurveDefinition { x, y, z, domain })
}

fn parse_domain(line: &str) -> Option<Domain> {
    let mut fields = line.split_whitespace();
    let start = fields.next()?;
    let start = start.strip_suffix(',').unwrap_or(start);
    let start: f64 = start.parse().ok()?;
    let end: f64 = fields.next()?.parse().ok()?;
    Domain::new(start, end).ok()
}

impl CurveDefinition {
    /// Builds the curve with the given reparametrization formula.
    pub fn build(&self, reparametrization: Expr) -> Result<FrenetCurve, CurveError> {
        let components = [
            Expr::parse_expression(&self.x)?,
            Expr::parse_expression(&self.y)?,
            Expr::parse_expression(&self.z)?,
        ];
        FrenetCurve::new(components, reparametrization, self.domain)
    }
}

/// Reads a curve definition file and builds the curve with the identity
/// reparametrization t = r.
pub fn import_frenet(path: impl AsRef<Path>) -> Result<FrenetCurve, CurveFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let definition = parse_curve_definition(&text)?;
    info!("curve definition read from {}", path.display());
    Ok(definition.build(Expr::Var(REPARAMETRIZATION_PARAMETER))?)
}

/// Text of a curve definition file describing `curve`. A reparametrization
/// other than the identity is recorded in a comment only.
pub fn format_curve_definition(curve: &FrenetCurve) -> String {
    let components = curve.components();
    let domain = curve.domain();
    let mut text = String::from("# x(t), y(t), z(t) and the domain of the curve\n");
    if *curve.reparametrization() != Expr::Var(REPARAMETRIZATION_PARAMETER) {
        text.push_str(&format!(
            "# reparametrized with {} = {}\n",
            CURVE_PARAMETER,
            curve.reparametrization()
        ));
    }
    for component in components.iter() {
        text.push_str(&format!("{}\n", component));
    }
    text.push_str(&format!("{:?}, {:?}\n", domain.start, domain.end));
    text
}

pub fn export_frenet(curve: &FrenetCurve, path: impl AsRef<Path>) -> Result<(), CurveFileError> {
    let path = path.as_ref();
    fs::write(path, format_curve_definition(curve))?;
    info!("curve definition written to {}", path.display());
    Ok(())
}

const CSV_HEADERS: [&str; 16] = [
    "r",
    "x",
    "y",
    "z",
    "tx",
    "ty",
    "tz",
    "nx",
    "ny",
    "nz",
    "bx",
    "by",
    "bz",
    "curvature",
    "curvature_radius",
    "torsion",
];

fn scalar_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn vector_cells(value: Option<nalgebra::Vector3<f64>>) -> [String; 3] {
    match value {
        Some(v) => [v.x.to_string(), v.y.to_string(), v.z.to_string()],
        None => Default::default(),
    }
}

/// One row per frame; undefined quantities are written as empty cells.
pub fn save_frames_to_csv(
    frames: &[FrenetFrame],
    path: impl AsRef<Path>,
) -> Result<(), CurveFileError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(CSV_HEADERS)?;

    for frame in frames {
        let mut row = Vec::with_capacity(CSV_HEADERS.len());
        row.push(frame.r.to_string());
        row.extend(vector_cells(Some(frame.position)));
        row.extend(vector_cells(frame.tangent));
        row.extend(vector_cells(frame.normal));
        row.extend(vector_cells(frame.binormal));
        row.push(scalar_cell(frame.curvature));
        row.push(scalar_cell(frame.curvature_radius));
        row.push(scalar_cell(frame.torsion));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!("{} frames saved to {}", frames.len(), path.display());
    Ok(())
}
