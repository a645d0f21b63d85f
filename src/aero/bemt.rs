//! Closed-form blade-element momentum theory for a single rotor.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::airfoil::SectionAerodynamics;
use crate::utils::constants::ISA_SEA_LEVEL_DENSITY;
use crate::utils::errors::{ensure_positive, DesignError, Result};

/// Radial strip of a blade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BladeElement {
    /// Radial station at the strip midpoint (m)
    pub r: f64,
    /// Strip width (m)
    pub dr: f64,
    /// Chord (m)
    pub chord: f64,
    /// Geometric pitch (rad)
    pub theta: f64,
}

/// Loads on one blade element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementLoads {
    pub r: f64,
    pub induced_velocity: f64,
    pub alpha: f64,
    pub lift: f64,
    pub profile_drag: f64,
    pub thrust: f64,
    pub torque: f64,
}

/// Integrated rotor loads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotorLoads {
    /// Thrust (N)
    pub thrust: f64,
    /// Shaft torque (N m)
    pub torque: f64,
    /// Shaft power (W)
    pub power: f64,
}

/// Rotor geometry and operating point for a BEMT solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeElementRotor {
    /// Air density (kg/m^3)
    pub rho: f64,
    /// Section lift-curve slope (1/rad)
    pub lift_slope: f64,
    /// Rotor radius (m)
    pub radius: f64,
    /// Number of blades
    pub blades: usize,
    /// Rotational speed (rad/s)
    pub omega: f64,
    /// Chord used by `discretise` (m)
    pub chord: f64,
    /// Pitch used by `discretise` (rad)
    pub pitch: f64,
}

impl Default for BladeElementRotor {
    fn default() -> Self {
        Self {
            rho: ISA_SEA_LEVEL_DENSITY,
            lift_slope: 5.73,
            radius: 5.0,
            blades: 1,
            omega: 40.0,
            chord: 0.2,
            pitch: 0.0,
        }
    }
}

impl BladeElementRotor {
    fn validate(&self) -> Result<()> {
        ensure_positive("air density", self.rho)?;
        ensure_positive("lift slope", self.lift_slope)?;
        ensure_positive("rotor radius", self.radius)?;
        ensure_positive("rotor speed", self.omega)?;
        if self.blades == 0 {
            return Err(DesignError::InvalidParameter(
                "rotor needs at least one blade".to_string(),
            ));
        }
        Ok(())
    }

    /// Tip speed ωR.
    pub fn tip_speed(&self) -> f64 {
        self.omega * self.radius
    }

    /// Split the blade into `n` equal strips with constant chord and pitch.
    pub fn discretise(&self, n: usize) -> Result<Vec<BladeElement>> {
        if n == 0 {
            return Err(DesignError::InvalidParameter(
                "blade needs at least one element".to_string(),
            ));
        }
        ensure_positive("rotor radius", self.radius)?;
        let dr = self.radius / n as f64;
        Ok((0..n)
            .map(|i| BladeElement {
                r: (i as f64 + 0.5) * dr,
                dr,
                chord: self.chord,
                theta: self.pitch,
            })
            .collect())
    }

    /// Loads on one element at climb velocity `v_c`.
    pub fn element_loads(
        &self,
        element: &BladeElement,
        v_c: f64,
        section: &dyn SectionAerodynamics,
    ) -> Result<ElementLoads> {
        self.validate()?;
        ensure_positive("element radius", element.r)?;

        let r_bar = element.r / self.radius;
        let v_tip = self.tip_speed();
        let lambda_1 =
            self.lift_slope * self.blades as f64 * element.chord / (16.0 * PI * self.radius);
        let climb = lambda_1 + v_c / (2.0 * v_tip);
        let discriminant = climb * climb + 2.0 * lambda_1 * (r_bar * element.theta - v_c / v_tip);
        if discriminant < 0.0 {
            return Err(DesignError::InvalidParameter(format!(
                "negative inflow discriminant {discriminant:e} at r = {:.3} m",
                element.r
            )));
        }
        let induced_velocity = v_tip * (-climb + discriminant.sqrt());

        let section_speed = self.omega * element.r;
        let phi = (v_c + induced_velocity) / section_speed;
        let alpha = element.theta - phi;
        let dynamic = 0.5 * self.rho * section_speed * section_speed * element.chord * element.dr;

        let lift = self.lift_slope * alpha * dynamic;
        let (_, cd) = section.coefficients(alpha);
        let profile_drag = cd * dynamic;

        Ok(ElementLoads {
            r: element.r,
            induced_velocity,
            alpha,
            lift,
            profile_drag,
            thrust: lift - profile_drag * phi,
            torque: (lift * phi + profile_drag) * element.r,
        })
    }

    /// Integrate thrust, torque and power over all blades.
    pub fn solve(
        &self,
        elements: &[BladeElement],
        v_c: f64,
        section: &dyn SectionAerodynamics,
    ) -> Result<RotorLoads> {
        let mut thrust = 0.0;
        let mut torque = 0.0;
        for element in elements {
            let loads = self.element_loads(element, v_c, section)?;
            thrust += loads.thrust;
            torque += loads.torque;
        }
        let blades = self.blades as f64;
        Ok(RotorLoads {
            thrust: thrust * blades,
            torque: torque * blades,
            power: torque * blades * self.omega,
        })
    }
}
