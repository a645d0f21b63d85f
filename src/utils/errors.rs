use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::physics::PhysicsError;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("No convergence after {iterations} iterations (residual {residual:e})")]
    NoConvergence { iterations: usize, residual: f64 },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

pub type Result<T> = std::result::Result<T, DesignError>;

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DesignError::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Fails with `InvalidParameter` unless `value` is finite and not negative.
pub fn ensure_non_negative(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DesignError::InvalidParameter(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}
