use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

use super::errors::{DesignError, Result};

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// One-dimensional piecewise-linear interpolation.
///
/// `xp` must be increasing. Queries outside the table are clamped to the end
/// values, so `interp1d(x, xp, fp)` behaves like `numpy.interp`.
pub fn interp1d(x: f64, xp: &[f64], fp: &[f64]) -> Result<f64> {
    if xp.is_empty() || xp.len() != fp.len() {
        return Err(DesignError::InvalidParameter(format!(
            "interpolation table needs matching non-empty axes, got {} and {}",
            xp.len(),
            fp.len()
        )));
    }
    if x.is_nan() {
        return Err(DesignError::InvalidParameter(
            "cannot interpolate at NaN".to_string(),
        ));
    }

    let last = xp.len() - 1;
    if x <= xp[0] {
        return Ok(fp[0]);
    }
    if x >= xp[last] {
        return Ok(fp[last]);
    }

    // First index with xp[i] > x; x lies in [xp[i - 1], xp[i])
    let upper = xp.partition_point(|&v| v <= x);
    let lower = upper - 1;
    let span = xp[upper] - xp[lower];
    if span <= 0.0 {
        return Ok(fp[lower]);
    }
    let factor = (x - xp[lower]) / span;
    Ok(fp[lower] + (fp[upper] - fp[lower]) * factor)
}

/// `n` evenly spaced samples over the closed interval `[start, stop]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Samples `start + k * step` over the half-open interval `[start, stop)`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|k| start + step * k as f64).collect()
}

/// Trapezoidal integration of `y` sampled at `x`.
pub fn trapz(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Index of the sample closest to `target`, or `None` for an empty slice.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - target)
                .abs()
                .partial_cmp(&(*b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Index of the smallest finite value.
pub fn index_of_min(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Least-squares polynomial fit.
///
/// Coefficients are returned highest power first, matching `numpy.polyfit`.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(DesignError::InvalidParameter(format!(
            "polyfit needs matching samples, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() <= degree {
        return Err(DesignError::InvalidParameter(format!(
            "polyfit of degree {degree} needs more than {degree} samples, got {}",
            x.len()
        )));
    }

    let vandermonde = DMatrix::from_fn(x.len(), degree + 1, |row, col| {
        x[row].powi((degree - col) as i32)
    });
    let rhs = DVector::from_column_slice(y);
    let coefficients = vandermonde
        .svd(true, true)
        .solve(&rhs, 1e-12)
        .map_err(|e| DesignError::Computation(format!("polyfit failed: {e}")))?;

    Ok(coefficients.iter().copied().collect())
}

/// Evaluate a polynomial with coefficients ordered highest power first.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}
