//! Hover performance of an ideally twisted rotor.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use super::airfoil::SectionAerodynamics;
use crate::atmosphere::speed_of_sound;
use crate::utils::constants::{CELSIUS_TO_KELVIN, ISA_SEA_LEVEL_DENSITY};
use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::deg_to_rad;

/// Rotor and ambient conditions for a hover estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverInput {
    /// Maximum take-off mass (kg)
    pub mtow: f64,
    pub blades: usize,
    /// Rotor radius (m)
    pub radius: f64,
    /// Chord (m)
    pub chord: f64,
    /// Tip speed (m/s)
    pub tip_speed: f64,
    pub n_elements: usize,
    /// Section lift-curve slope (1/rad)
    pub lift_slope: f64,
    /// Blade pitch at the tip (deg)
    pub pitch_tip_deg: f64,
    /// Air density (kg/m^3)
    pub rho: f64,
    /// Ambient temperature (deg C)
    pub temperature_c: f64,
}

impl Default for HoverInput {
    fn default() -> Self {
        Self {
            mtow: 709.0,
            blades: 4,
            radius: 5.0,
            chord: 0.2,
            tip_speed: 167.64,
            n_elements: 10,
            lift_slope: 5.73,
            pitch_tip_deg: 8.0,
            rho: ISA_SEA_LEVEL_DENSITY,
            temperature_c: 15.0,
        }
    }
}

/// Per-element hover solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverElement {
    pub r_over_r: f64,
    pub c_over_r: f64,
    pub mach: f64,
    /// Local pitch (rad)
    pub pitch: f64,
    /// Local inflow ratio
    pub inflow: f64,
    /// Angle of attack (rad)
    pub alpha: f64,
    pub cl: f64,
    pub cd: f64,
    /// Thrust coefficient grading dC_T/d(r/R)
    pub thrust_grading: f64,
    pub profile_torque_grading: f64,
    pub induced_torque_grading: f64,
}

/// Integrated hover performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverPerformance {
    pub elements: Vec<HoverElement>,
    pub thrust_coefficient: f64,
    pub profile_torque_coefficient: f64,
    pub induced_torque_coefficient: f64,
    /// Thrust (N)
    pub thrust: f64,
    /// Shaft power (W)
    pub power: f64,
    /// Disc loading (N/m^2)
    pub disc_loading: f64,
    /// Thrust margin over the weight of `mtow` (N)
    pub thrust_margin: f64,
}

impl HoverPerformance {
    pub fn torque_coefficient(&self) -> f64 {
        self.profile_torque_coefficient + self.induced_torque_coefficient
    }

    /// Ideal power over actual power.
    pub fn figure_of_merit(&self) -> f64 {
        let ct = self.thrust_coefficient;
        let cq = self.torque_coefficient();
        if ct <= 0.0 || cq <= 0.0 {
            return 0.0;
        }
        ct.powf(1.5) / (2.0_f64.sqrt() * cq)
    }
}

impl HoverInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("rotor radius", self.radius)?;
        ensure_positive("chord", self.chord)?;
        ensure_positive("tip speed", self.tip_speed)?;
        ensure_positive("lift slope", self.lift_slope)?;
        ensure_positive("air density", self.rho)?;
        if self.blades == 0 || self.n_elements == 0 {
            return Err(DesignError::InvalidParameter(
                "hover analysis needs blades and elements".to_string(),
            ));
        }
        Ok(())
    }

    /// Blade-element hover solve with ideal twist θ = θ_tip / (r/R).
    pub fn power_hover(&self, section: &dyn SectionAerodynamics) -> Result<HoverPerformance> {
        self.validate()?;

        let sound = speed_of_sound(self.temperature_c + CELSIUS_TO_KELVIN)?;
        let pitch_tip = deg_to_rad(self.pitch_tip_deg);
        let blades = self.blades as f64;
        let c_r = self.chord / self.radius;
        let dr = 1.0 / self.n_elements as f64;

        let mut elements = Vec::with_capacity(self.n_elements);
        for i in 0..self.n_elements {
            let r_r = (i as f64 + 0.5) * dr;
            let pitch = pitch_tip / r_r;

            let k = self.lift_slope * blades * c_r;
            let root = 1.0 + 32.0 * PI * pitch * r_r / k;
            if root < 0.0 {
                return Err(DesignError::InvalidParameter(format!(
                    "negative inflow root at r/R = {r_r:.3}"
                )));
            }
            let inflow = k / (16.0 * PI) / r_r * (root.sqrt() - 1.0);
            let alpha = pitch - inflow.atan();
            let (cl, cd) = section.coefficients(alpha);

            elements.push(HoverElement {
                r_over_r: r_r,
                c_over_r: c_r,
                mach: r_r * self.tip_speed / sound,
                pitch,
                inflow,
                alpha,
                cl,
                cd,
                thrust_grading: blades * r_r.powi(2) * c_r * cl / (2.0 * PI),
                profile_torque_grading: blades * r_r.powi(3) * c_r * cd / (2.0 * PI),
                induced_torque_grading: blades * r_r.powi(3) * c_r * cl * inflow / (2.0 * PI),
            });
        }

        let thrust_coefficient: f64 = elements.iter().map(|e| e.thrust_grading).sum::<f64>() * dr;
        let profile_torque_coefficient: f64 =
            elements.iter().map(|e| e.profile_torque_grading).sum::<f64>() * dr;
        let induced_torque_coefficient: f64 =
            elements.iter().map(|e| e.induced_torque_grading).sum::<f64>() * dr;

        let area = PI * self.radius.powi(2);
        let thrust = thrust_coefficient * self.rho * area * self.tip_speed.powi(2);
        let power = (profile_torque_coefficient + induced_torque_coefficient)
            * self.rho
            * area
            * self.tip_speed.powi(3);
        let disc_loading = thrust_coefficient * self.rho * self.tip_speed.powi(2);

        debug!(
            "Hover: C_T = {:.5}, T = {:.1} N, P = {:.1} kW",
            thrust_coefficient,
            thrust,
            power / 1000.0
        );

        Ok(HoverPerformance {
            elements,
            thrust_coefficient,
            profile_torque_coefficient,
            induced_torque_coefficient,
            thrust,
            power,
            disc_loading,
            thrust_margin: thrust - self.mtow * crate::utils::constants::GRAVITY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::airfoil::LinearAirfoil;
    use approx::assert_relative_eq;

    #[test]
    fn test_elements_sit_at_midpoints() {
        let perf = HoverInput::default()
            .power_hover(&LinearAirfoil::naca0012())
            .unwrap();
        assert_eq!(perf.elements.len(), 10);
        assert_relative_eq!(perf.elements[0].r_over_r, 0.05, epsilon = 1e-12);
        assert_relative_eq!(perf.elements[9].r_over_r, 0.95, epsilon = 1e-12);
        assert_relative_eq!(perf.elements[0].c_over_r, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_ideal_twist_gives_uniform_inflow_angle_ratio() {
        let perf = HoverInput::default()
            .power_hover(&LinearAirfoil::naca0012())
            .unwrap();
        // Ideal twist gives constant λ: inflow ratio × r/R is the same everywhere
        let lambda: Vec<f64> = perf.elements.iter().map(|e| e.inflow * e.r_over_r).collect();
        for l in &lambda {
            assert_relative_eq!(*l, lambda[0], max_relative = 1e-9);
        }
    }

    #[test]
    fn test_totals_are_consistent() {
        let input = HoverInput::default();
        let perf = input.power_hover(&LinearAirfoil::naca0012()).unwrap();
        let area = PI * input.radius.powi(2);
        assert!(perf.thrust > 0.0 && perf.power > 0.0);
        assert_relative_eq!(perf.disc_loading, perf.thrust / area, max_relative = 1e-12);
        assert!(perf.figure_of_merit() > 0.0 && perf.figure_of_merit() < 1.0);
    }
}
