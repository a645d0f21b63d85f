//! Disc-resolved rotor loads in forward flight.
//!
//! The disc is split into annuli and azimuth sectors. In every cell the
//! induced velocity is relaxed towards the local momentum balance, which
//! gives thrust, torque and the hub moments of a tilted rotor.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

use super::airfoil::SectionAerodynamics;
use crate::utils::constants::{ISA_SEA_LEVEL_DENSITY, RPM_TO_RAD_S};
use crate::utils::errors::{ensure_non_negative, ensure_positive, DesignError, Result};
use crate::utils::math::deg_to_rad;

const HUB_CUTOUT: f64 = 0.2;
const TIP_STATION: f64 = 0.95;
const RELAXATION: f64 = 0.1;
const INITIAL_INDUCED_VELOCITY: f64 = 10.0;

/// Operating point of a rotor disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorDiscInput {
    /// Blade chord (m), constant along the span
    pub chord: f64,
    /// Collective pitch (deg)
    pub collective_deg: f64,
    /// Cyclic pitch amplitude (deg)
    pub cyclic_deg: f64,
    /// Rotor radius (m)
    pub radius: f64,
    pub rpm: f64,
    pub blades: usize,
    /// Air density (kg/m^3)
    pub rho: f64,
    /// Forward speed (m/s)
    pub forward_speed: f64,
    /// Disc tilt (deg)
    pub tilt_deg: f64,
    /// Climb speed (m/s)
    pub climb_speed: f64,
    /// Peak flapping velocity per metre of span (1/s)
    pub flap_rate: f64,
    pub n_radial: usize,
    pub n_azimuth: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RotorDiscInput {
    fn default() -> Self {
        Self {
            chord: 0.20,
            collective_deg: 8.0,
            cyclic_deg: 0.0,
            radius: 2.0,
            rpm: 400.0,
            blades: 2,
            rho: ISA_SEA_LEVEL_DENSITY,
            forward_speed: 0.0,
            tilt_deg: 0.0,
            climb_speed: 0.0,
            flap_rate: 0.0,
            n_radial: 16,
            n_azimuth: 16,
            tolerance: 1.0e-5,
            max_iterations: 500,
        }
    }
}

/// Integrated disc loads and the angle-of-attack map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorDiscLoads {
    pub thrust: f64,
    pub torque: f64,
    /// Hub rolling moment (N m)
    pub mx: f64,
    /// Hub pitching moment (N m)
    pub my: f64,
    /// Angle of attack per `[radial][azimuth]` cell (rad)
    pub alpha: Vec<Vec<f64>>,
    /// Normalized x coordinate of each cell
    pub x: Vec<Vec<f64>>,
    /// Normalized y coordinate of each cell
    pub y: Vec<Vec<f64>>,
    /// Cells that hit the iteration cap
    pub unconverged_cells: usize,
}

struct CellGrading {
    alpha: f64,
    thrust: f64,
    torque: f64,
    converged: bool,
}

impl RotorDiscInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("chord", self.chord)?;
        ensure_positive("rotor radius", self.radius)?;
        ensure_positive("rotor RPM", self.rpm)?;
        ensure_positive("air density", self.rho)?;
        ensure_positive("tolerance", self.tolerance)?;
        ensure_non_negative("forward speed", self.forward_speed)?;
        if self.blades == 0 || self.n_radial == 0 || self.n_azimuth == 0 {
            return Err(DesignError::InvalidParameter(
                "blade count and disc resolution must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn omega(&self) -> f64 {
        self.rpm * RPM_TO_RAD_S
    }

    /// Sweep every cell of the disc.
    pub fn solve(&self, section: &dyn SectionAerodynamics) -> Result<RotorDiscLoads> {
        self.validate()?;

        let step = (TIP_STATION - HUB_CUTOUT) / self.n_radial as f64;
        let r_step = step * self.radius;
        let sector = 2.0 * PI / self.n_azimuth as f64;

        let mut loads = RotorDiscLoads {
            thrust: 0.0,
            torque: 0.0,
            mx: 0.0,
            my: 0.0,
            alpha: vec![vec![0.0; self.n_azimuth]; self.n_radial],
            x: vec![vec![0.0; self.n_azimuth]; self.n_radial],
            y: vec![vec![0.0; self.n_azimuth]; self.n_radial],
            unconverged_cells: 0,
        };

        for i in 0..self.n_radial {
            let r_bar = step * (i + 1) as f64 + HUB_CUTOUT;
            let rad = r_bar * self.radius;
            for j in 0..self.n_azimuth {
                let psi = sector * (j + 1) as f64 - sector / 2.0;
                let cell = self.cell(rad, psi, section);
                if !cell.converged {
                    loads.unconverged_cells += 1;
                }

                loads.alpha[i][j] = cell.alpha;
                loads.x[i][j] = r_bar * psi.cos();
                loads.y[i][j] = r_bar * psi.sin();
                loads.thrust += cell.thrust * r_step;
                loads.torque += cell.torque * r_step;
                loads.mx += rad * psi.sin() * cell.thrust * r_step;
                loads.my += rad * psi.cos() * cell.thrust * r_step;
            }
        }

        if loads.unconverged_cells > 0 {
            warn!(
                "Induced velocity did not converge in {} of {} disc cells",
                loads.unconverged_cells,
                self.n_radial * self.n_azimuth
            );
        }
        debug!(
            "Disc loads: T = {:.2} N, Q = {:.2} N m, Mx = {:.2}, My = {:.2}",
            loads.thrust, loads.torque, loads.mx, loads.my
        );
        Ok(loads)
    }

    /// Thrust and torque gradings of one cell, per unit span.
    fn cell(&self, rad: f64, psi: f64, section: &dyn SectionAerodynamics) -> CellGrading {
        let omega = self.omega();
        let tilt = deg_to_rad(self.tilt_deg);
        let theta = deg_to_rad(self.collective_deg) + deg_to_rad(self.cyclic_deg) * psi.cos();
        let solidity_chord = self.blades as f64 * self.chord / self.n_azimuth as f64;

        let mut vi = INITIAL_INDUCED_VELOCITY;
        let mut iterations = 0;
        loop {
            let v_normal = vi
                + self.climb_speed
                + self.forward_speed * tilt.sin()
                + self.flap_rate * rad * psi.sin();
            let v_plane = omega * rad + self.forward_speed * tilt.cos() * psi.sin();
            let phi = v_normal.atan2(v_plane);
            let alpha = theta - phi;
            let (cl, cd) = section.coefficients(alpha);
            let q = 0.5 * self.rho * (v_normal * v_normal + v_plane * v_plane);

            let thrust = q * solidity_chord * (cl * phi.cos() - cd * phi.sin());
            let torque = q * solidity_chord * rad * (cd * phi.cos() + cl * phi.sin());

            let momentum = if v_normal.abs() > f64::EPSILON {
                thrust / (PI / 4.0 * rad * self.rho * v_normal)
            } else {
                0.0
            };
            let vi_new = ((1.0 - RELAXATION) * vi + RELAXATION * momentum).max(0.0);
            let converged = (vi_new - vi).abs() < self.tolerance;
            vi = vi_new;
            iterations += 1;

            if converged || iterations > self.max_iterations {
                return CellGrading {
                    alpha,
                    thrust,
                    torque,
                    converged,
                };
            }
        }
    }
}
