//! Airfoil section data.
//!
//! Sections either come from an XFoil polar export or from a linear lift
//! model with a quadratic drag polar.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

use crate::utils::errors::{DesignError, Result};
use crate::utils::math::{interp1d, nearest_index, rad_to_deg};

/// Number of preamble lines in an XFoil polar export.
pub const POLAR_HEADER_LINES: usize = 9;
const POLAR_COLUMNS: usize = 7;

/// Lift and drag coefficients of a blade section at an angle of attack.
pub trait SectionAerodynamics: Send + Sync {
    /// Returns `(cl, cd)` at `alpha` in radians.
    fn coefficients(&self, alpha: f64) -> (f64, f64);

    /// Lift coefficient only.
    fn lift_coefficient(&self, alpha: f64) -> f64 {
        self.coefficients(alpha).0
    }
}

/// One row of a polar table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    /// Angle of attack in degrees
    pub alpha: f64,
    pub cl: f64,
    pub cd: f64,
    pub cdp: f64,
    pub cm: f64,
    pub top_xtr: f64,
    pub bot_xtr: f64,
}

impl PolarPoint {
    fn parse(fields: &[&str]) -> std::result::Result<Self, std::num::ParseFloatError> {
        let value = |i: usize| fields[i].trim().parse::<f64>();
        Ok(Self {
            alpha: value(0)?,
            cl: value(1)?,
            cd: value(2)?,
            cdp: value(3)?,
            cm: value(4)?,
            top_xtr: value(5)?,
            bot_xtr: value(6)?,
        })
    }
}

/// Tabulated airfoil polar sorted by angle of attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilPolar {
    points: Vec<PolarPoint>,
    alpha: Vec<f64>,
    cl: Vec<f64>,
    cd: Vec<f64>,
}

impl AirfoilPolar {
    /// Build a polar from rows in any order.
    pub fn new(mut points: Vec<PolarPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(DesignError::EmptyData(
                "airfoil polar has no rows".to_string(),
            ));
        }
        if points.iter().any(|p| !p.alpha.is_finite()) {
            return Err(DesignError::InvalidParameter(
                "airfoil polar contains a non-finite angle of attack".to_string(),
            ));
        }
        points.sort_by(|a, b| a.alpha.total_cmp(&b.alpha));

        let alpha = points.iter().map(|p| p.alpha).collect();
        let cl = points.iter().map(|p| p.cl).collect();
        let cd = points.iter().map(|p| p.cd).collect();
        Ok(Self {
            points,
            alpha,
            cl,
            cd,
        })
    }

    /// Load an XFoil polar export from disk.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Loading airfoil polar from {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a polar from a reader.
    ///
    /// The first nine lines are skipped. Rows without exactly seven
    /// comma-separated fields are ignored, and rows with a non-numeric field
    /// are skipped with a warning.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut points = Vec::new();

        for (index, line) in reader.lines().enumerate().skip(POLAR_HEADER_LINES) {
            let line = line?;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != POLAR_COLUMNS {
                continue;
            }
            match PolarPoint::parse(&fields) {
                Ok(point) => points.push(point),
                Err(e) => warn!("Skipping invalid polar line {}: {:?} ({})", index + 1, line, e),
            }
        }

        if points.is_empty() {
            return Err(DesignError::EmptyData(
                "no valid rows in airfoil polar".to_string(),
            ));
        }
        Self::new(points)
    }

    pub fn points(&self) -> &[PolarPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closest tabulated `(cl, cd)` to `alpha_deg`.
    pub fn nearest(&self, alpha_deg: f64) -> (f64, f64) {
        // A polar is never empty once constructed
        let i = nearest_index(&self.alpha, alpha_deg).unwrap_or(0);
        (self.cl[i], self.cd[i])
    }

    /// Linearly interpolated `(cl, cd)` at `alpha_deg`, clamped to the table.
    pub fn interpolate(&self, alpha_deg: f64) -> Result<(f64, f64)> {
        Ok((
            interp1d(alpha_deg, &self.alpha, &self.cl)?,
            interp1d(alpha_deg, &self.alpha, &self.cd)?,
        ))
    }

    /// Angle of attack range covered by the table, in degrees.
    pub fn alpha_range(&self) -> (f64, f64) {
        (self.alpha[0], self.alpha[self.alpha.len() - 1])
    }
}

impl SectionAerodynamics for AirfoilPolar {
    fn coefficients(&self, alpha: f64) -> (f64, f64) {
        let alpha_deg = rad_to_deg(alpha);
        self.interpolate(alpha_deg)
            .unwrap_or_else(|_| self.nearest(alpha_deg))
    }
}

/// Thin-airfoil lift with a quadratic drag polar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearAirfoil {
    /// Lift-curve slope per radian
    pub lift_slope: f64,
    pub cd0: f64,
    pub cd1: f64,
    pub cd2: f64,
}

impl Default for LinearAirfoil {
    fn default() -> Self {
        Self {
            lift_slope: 6.2,
            cd0: 0.008,
            cd1: -0.003,
            cd2: 0.01,
        }
    }
}

impl LinearAirfoil {
    /// NACA 0012 in the linear range.
    pub fn naca0012() -> Self {
        Self {
            lift_slope: 5.73,
            ..Default::default()
        }
    }

    pub fn drag_coefficient(&self, cl: f64) -> f64 {
        self.cd0 + self.cd1 * cl + self.cd2 * cl * cl
    }
}

impl SectionAerodynamics for LinearAirfoil {
    fn coefficients(&self, alpha: f64) -> (f64, f64) {
        let cl = self.lift_slope * alpha;
        (cl, self.drag_coefficient(cl))
    }
}
