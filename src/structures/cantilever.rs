use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::constants::GRAVITY;
use crate::utils::errors::{ensure_non_negative, ensure_positive, DesignError, Result};
use crate::utils::math::linspace;

/// Rotor arm modelled as a cantilever fixed at x = 0.
///
/// The arm carries its own weight as a uniform load and the rotor thrust at
/// the free end, acting upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CantileverBeam {
    /// Length (m)
    pub length: f64,
    /// Material density (kg/m^3)
    pub density: f64,
    /// Cross-sectional area (m^2)
    pub area: f64,
    /// Young's modulus (GPa)
    pub youngs_modulus_gpa: f64,
    /// Second moment of area (m^4)
    pub second_moment: f64,
    /// Tip thrust (N)
    pub thrust: f64,
}

impl Default for CantileverBeam {
    fn default() -> Self {
        Self {
            length: 3.0,
            density: 2710.0,
            area: 0.1,
            youngs_modulus_gpa: 70.0,
            second_moment: 4e-5,
            thrust: 1000.0,
        }
    }
}

/// Internal loads and displacement at one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamStation {
    pub x: f64,
    pub shear: f64,
    pub moment: f64,
    pub deflection: f64,
    pub slope: f64,
}

impl CantileverBeam {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("beam length", self.length)?;
        ensure_non_negative("beam density", self.density)?;
        ensure_non_negative("beam area", self.area)?;
        ensure_positive("Young's modulus", self.youngs_modulus_gpa)?;
        ensure_positive("second moment of area", self.second_moment)?;
        Ok(())
    }

    /// Self-weight per unit length (N/m)
    pub fn distributed_load(&self) -> f64 {
        self.density * self.area * GRAVITY
    }

    /// Vertical reaction at the root.
    pub fn reaction_force(&self) -> f64 {
        self.distributed_load() * self.length - self.thrust
    }

    /// Reaction moment at the root.
    pub fn reaction_moment(&self) -> f64 {
        0.5 * self.distributed_load() * self.length.powi(2) - self.thrust * self.length
    }

    fn flexural_rigidity(&self) -> f64 {
        self.youngs_modulus_gpa * 1e9 * self.second_moment
    }

    fn check_station(&self, x: f64) -> Result<f64> {
        if !(0.0..=self.length).contains(&x) {
            return Err(DesignError::InvalidParameter(format!(
                "station {x} m is outside the beam [0, {}] m",
                self.length
            )));
        }
        Ok(x)
    }

    pub fn shear(&self, x: f64) -> Result<f64> {
        let x = self.check_station(x)?;
        Ok(-self.distributed_load() * x + self.reaction_force())
    }

    pub fn moment(&self, x: f64) -> Result<f64> {
        let x = self.check_station(x)?;
        let w = self.distributed_load();
        Ok(self.reaction_moment() - self.reaction_force() * x + 0.5 * w * x * x)
    }

    pub fn deflection(&self, x: f64) -> Result<f64> {
        let x = self.check_station(x)?;
        let (w, r, m0) = (
            self.distributed_load(),
            self.reaction_force(),
            self.reaction_moment(),
        );
        let shape = -w * x.powi(4) / 24.0 - r * x.powi(3) / 6.0 + m0 * x * x / 2.0;
        Ok(-shape / self.flexural_rigidity())
    }

    pub fn slope(&self, x: f64) -> Result<f64> {
        let x = self.check_station(x)?;
        let (w, r, m0) = (
            self.distributed_load(),
            self.reaction_force(),
            self.reaction_moment(),
        );
        let shape = -w * x.powi(3) / 6.0 - r * x * x / 2.0 + m0 * x;
        Ok(-shape / self.flexural_rigidity())
    }

    /// Loads and displacement at `n` evenly spaced stations from root to tip.
    pub fn sample(&self, n: usize) -> Result<Vec<BeamStation>> {
        self.validate()?;
        debug!(
            "Sampling cantilever: w = {:.2} N/m, R = {:.2} N, M0 = {:.2} N m",
            self.distributed_load(),
            self.reaction_force(),
            self.reaction_moment()
        );
        linspace(0.0, self.length, n)
            .into_iter()
            .map(|x| {
                // Guard the last station against rounding past the tip
                let x = x.min(self.length);
                Ok(BeamStation {
                    x,
                    shear: self.shear(x)?,
                    moment: self.moment(x)?,
                    deflection: self.deflection(x)?,
                    slope: self.slope(x)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tip_shear_is_reaction_minus_weight() {
        let beam = CantileverBeam::default();
        let w = beam.distributed_load();
        assert_relative_eq!(w, 2710.0 * 0.1 * GRAVITY);
        let tip = beam.shear(beam.length).unwrap();
        assert_relative_eq!(tip, beam.reaction_force() - w * beam.length, epsilon = 1e-9);
        assert_relative_eq!(tip, -beam.thrust, epsilon = 1e-9);
    }

    #[test]
    fn test_root_is_clamped() {
        let beam = CantileverBeam::default();
        assert_eq!(beam.deflection(0.0).unwrap(), 0.0);
        assert_eq!(beam.slope(0.0).unwrap(), 0.0);
        assert_relative_eq!(beam.moment(0.0).unwrap(), beam.reaction_moment());
    }

    #[test]
    fn test_pure_tip_load_deflection() {
        // Massless beam: v(L) = T L^3 / (3 E I) upwards
        let beam = CantileverBeam {
            density: 0.0,
            ..Default::default()
        };
        let ei = 70e9 * 4e-5;
        let expected = 1000.0 * 27.0 / (3.0 * ei);
        assert_relative_eq!(beam.deflection(3.0).unwrap().abs(), expected, max_relative = 1e-12);
        assert_relative_eq!(beam.moment(3.0).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_and_bounds() {
        let beam = CantileverBeam::default();
        let stations = beam.sample(31).unwrap();
        assert_eq!(stations.len(), 31);
        assert_relative_eq!(stations[30].x, 3.0);
        assert!(beam.shear(-0.1).is_err());
        assert!(beam.deflection(3.5).is_err());
        let broken = CantileverBeam {
            second_moment: 0.0,
            ..Default::default()
        };
        assert!(broken.sample(5).is_err());
    }
}
