//! Settings read from a TOML file.
//!
//! ```toml
//! [curve]
//! epsilon = 1e-6
//! samples = 200
//! reparametrization = "r"
//!
//! [logging]
//! level = "info"
//! file = false
//! ```
//!
//! Every key is optional; missing keys keep the defaults above.

use std::fs;
use std::io;
use std::path::Path;

use simplelog::LevelFilter;
use thiserror::Error;
use toml::{Table, Value};

use crate::Utils::logger::parse_log_level;
use crate::geometry::frenet_curve::{DEFAULT_EPSILON, REPARAMETRIZATION_PARAMETER};
use crate::symbolic::symbolic_engine::Expr;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrenetConfig {
    /// definedness threshold of the curve quantities
    pub epsilon: f64,
    /// number of frames sampled along the domain
    pub samples: usize,
    pub reparametrization: Expr,
    pub log_level: LevelFilter,
    pub log_to_file: bool,
}

impl Default for FrenetConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            samples: 200,
            reparametrization: Expr::Var(REPARAMETRIZATION_PARAMETER),
            log_level: LevelFilter::Info,
            log_to_file: false,
        }
    }
}

fn section<'a>(table: &'a Table, name: &str) -> Result<Option<&'a Table>, ConfigError> {
    match table.get(name) {
        None => Ok(None),
        Some(Value::Table(inner)) => Ok(Some(inner)),
        Some(_) => Err(invalid(name, "expected a table")),
    }
}

impl FrenetConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: Table = text.parse()?;
        let mut config = Self::default();

        if let Some(curve) = section(&table, "curve")? {
            if let Some(value) = curve.get("epsilon") {
                let epsilon = match value {
                    Value::Float(v) => *v,
                    Value::Integer(v) => *v as f64,
                    _ => return Err(invalid("curve.epsilon", "expected a number")),
                };
                if !(epsilon.is_finite() && epsilon > 0.0) {
                    return Err(invalid("curve.epsilon", "must be positive"));
                }
                config.epsilon = epsilon;
            }
            if let Some(value) = curve.get("samples") {
                let samples = value
                    .as_integer()
                    .ok_or_else(|| invalid("curve.samples", "expected an integer"))?;
                if samples <= 0 {
                    return Err(invalid("curve.samples", "must be at least 1"));
                }
                config.samples = samples as usize;
            }
            if let Some(value) = curve.get("reparametrization") {
                let text = value
                    .as_str()
                    .ok_or_else(|| invalid("curve.reparametrization", "expected a string"))?;
                config.reparametrization = Expr::parse_expression(text)
                    .map_err(|e| invalid("curve.reparametrization", e.to_string()))?;
            }
        }

        if let Some(logging) = section(&table, "logging")? {
            if let Some(value) = logging.get("level") {
                let name = value
                    .as_str()
                    .ok_or_else(|| invalid("logging.level", "expected a string"))?;
                config.log_level = parse_log_level(name).ok_or_else(|| {
                    invalid("logging.level", format!("unknown log level `{}`", name))
                })?;
            }
            if let Some(value) = logging.get("file") {
                config.log_to_file = value
                    .as_bool()
                    .ok_or_else(|| invalid("logging.file", "expected true or false"))?;
            }
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
