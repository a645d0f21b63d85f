//! Minimum-induced-loss propeller design (Adkins and Liebeck).

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::utils::constants::{ISA_SEA_LEVEL_DENSITY, ISA_SEA_LEVEL_VISCOSITY, RPM_TO_RAD_S};
use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::{deg_to_rad, linspace, rad_to_deg, trapz};

/// Quantity the propeller is designed to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignTarget {
    /// Thrust (N)
    Thrust(f64),
    /// Shaft power (W)
    ShaftPower(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropellerInput {
    pub target: DesignTarget,
    /// Diameter (m)
    pub diameter: f64,
    pub rpm: f64,
    /// Flight speed (m/s)
    pub velocity: f64,
    /// Air density (kg/m^3)
    pub rho: f64,
    pub blades: usize,
    /// Design section lift coefficient
    pub cl: f64,
    /// Design section drag coefficient
    pub cd: f64,
    /// Design angle of attack (deg)
    pub alpha_deg: f64,
    pub n_elements: usize,
    /// Hub radius over tip radius
    pub hub_ratio: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Smallest chord Reynolds number allowed on the blade
    ///
    /// Sections that would fall below it are widened and run at a lower
    /// lift coefficient, keeping their circulation.
    pub min_reynolds: Option<f64>,
    /// Dynamic viscosity of air (Pa·s)
    pub viscosity: f64,
}

impl Default for PropellerInput {
    fn default() -> Self {
        Self {
            target: DesignTarget::Thrust(500.0),
            diameter: 1.5,
            rpm: 2000.0,
            velocity: 30.0,
            rho: ISA_SEA_LEVEL_DENSITY,
            blades: 3,
            cl: 0.7,
            cd: 0.01,
            alpha_deg: 4.0,
            n_elements: 50,
            hub_ratio: 0.15,
            tolerance: 1.0e-4,
            max_iterations: 100,
            min_reynolds: None,
            viscosity: ISA_SEA_LEVEL_VISCOSITY,
        }
    }
}

/// Blade geometry and performance of the converged design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropellerDesign {
    /// Radial stations r/R
    pub r_over_r: Vec<f64>,
    /// Chord (m)
    pub chord: Vec<f64>,
    /// Blade angle β = α + φ (deg)
    pub twist_deg: Vec<f64>,
    /// Chord Reynolds number per station
    pub reynolds: Vec<f64>,
    /// Operating lift coefficient per station
    pub section_cl: Vec<f64>,
    /// Displacement velocity ratio
    pub zeta: f64,
    pub thrust: f64,
    pub power: f64,
    pub thrust_coefficient: f64,
    pub power_coefficient: f64,
    pub advance_ratio: f64,
    pub efficiency: f64,
    pub iterations: usize,
}

/// Integrals and distributions for one ζ estimate.
struct Pass {
    i1: f64,
    i2: f64,
    j1: f64,
    j2: f64,
    chord: Vec<f64>,
    twist_deg: Vec<f64>,
    /// Relative velocity at each station (m/s)
    relative_velocity: Vec<f64>,
}

impl PropellerInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("diameter", self.diameter)?;
        ensure_positive("RPM", self.rpm)?;
        ensure_positive("air density", self.rho)?;
        ensure_positive("design lift coefficient", self.cl)?;
        ensure_positive("tolerance", self.tolerance)?;
        ensure_positive("air viscosity", self.viscosity)?;
        if let Some(re) = self.min_reynolds {
            ensure_positive("minimum Reynolds number", re)?;
        }
        if !(self.velocity.is_finite() && self.velocity > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "minimum-induced-loss design needs a positive flight speed, got {}",
                self.velocity
            )));
        }
        if self.blades == 0 || self.n_elements < 2 {
            return Err(DesignError::InvalidParameter(
                "propeller needs blades and at least two elements".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.hub_ratio) {
            return Err(DesignError::InvalidParameter(format!(
                "hub ratio must be in [0, 1), got {}",
                self.hub_ratio
            )));
        }
        match self.target {
            DesignTarget::Thrust(v) => ensure_positive("design thrust", v)?,
            DesignTarget::ShaftPower(v) => ensure_positive("design shaft power", v)?,
        };
        Ok(())
    }

    fn omega(&self) -> f64 {
        self.rpm * RPM_TO_RAD_S
    }

    fn pass(&self, stations: &[f64], zeta: f64) -> Pass {
        let radius = self.diameter / 2.0;
        let lambda = self.velocity / (self.omega() * radius);
        let epsilon = self.cd / self.cl;
        let blades = self.blades as f64;
        let tan_phi_tip = lambda * (1.0 + zeta / 2.0);
        let sin_phi_tip = tan_phi_tip.atan().sin();

        let n = stations.len();
        let (mut di1, mut di2, mut dj1, mut dj2) =
            (vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]);
        let mut chord = vec![0.0; n];
        let mut twist_deg = vec![0.0; n];
        let mut relative_velocity = vec![0.0; n];

        for (k, &xi) in stations.iter().enumerate() {
            let phi = (tan_phi_tip / xi).atan();
            let (sin_phi, cos_phi) = phi.sin_cos();
            let f = blades / 2.0 * (1.0 - xi) / sin_phi_tip;
            let prandtl = 2.0 / PI * (-f).exp().acos();
            let g = prandtl * (xi / lambda) * cos_phi * sin_phi;

            let drag_axial = 1.0 - epsilon * phi.tan();
            let drag_swirl = 1.0 + epsilon / phi.tan();
            let a = 0.5 * zeta * cos_phi * cos_phi * drag_axial;
            let w = self.velocity * (1.0 + a) / sin_phi;
            let wc = 4.0 * PI * lambda * g * self.velocity * radius * zeta / (self.cl * blades);

            chord[k] = wc / w;
            relative_velocity[k] = w;
            twist_deg[k] = self.alpha_deg + rad_to_deg(phi);
            di1[k] = 4.0 * xi * g * drag_axial;
            di2[k] = lambda * di1[k] / (2.0 * xi) * drag_swirl * sin_phi * cos_phi;
            dj1[k] = 4.0 * xi * g * drag_swirl;
            dj2[k] = dj1[k] / 2.0 * drag_axial * cos_phi * cos_phi;
        }

        Pass {
            i1: trapz(&di1, stations),
            i2: trapz(&di2, stations),
            j1: trapz(&dj1, stations),
            j2: trapz(&dj2, stations),
            chord,
            twist_deg,
            relative_velocity,
        }
    }

    /// Apply the Reynolds number floor to a converged chord distribution.
    ///
    /// Returns chord, Reynolds number and operating lift coefficient per
    /// station. The product c·cl is unchanged, so the loading is too.
    fn reynolds_floor(&self, pass: &Pass) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = pass.chord.len();
        let mut chord = Vec::with_capacity(n);
        let mut reynolds = Vec::with_capacity(n);
        let mut section_cl = Vec::with_capacity(n);
        let mut widened = 0;

        for (&c, &w) in pass.chord.iter().zip(&pass.relative_velocity) {
            let per_metre = self.rho * w / self.viscosity;
            let (c_used, cl_used) = match self.min_reynolds {
                Some(re_min) if c * per_metre < re_min => {
                    widened += 1;
                    let c_min = re_min / per_metre;
                    (c_min, self.cl * c / c_min)
                }
                _ => (c, self.cl),
            };
            chord.push(c_used);
            reynolds.push(c_used * per_metre);
            section_cl.push(cl_used);
        }

        if widened > 0 {
            debug!(
                "Widened {} of {} propeller sections to the Reynolds floor",
                widened, n
            );
        }
        (chord, reynolds, section_cl)
    }

    /// Iterate ζ to convergence and size the blade.
    pub fn design(&self) -> Result<PropellerDesign> {
        self.validate()?;

        let radius = self.diameter / 2.0;
        let disc = self.rho * PI * radius * radius;
        let stations = linspace(self.hub_ratio.max(1.0e-6), 1.0, self.n_elements);

        let mut zeta = 0.0;
        let mut residual = f64::INFINITY;
        for iteration in 1..=self.max_iterations {
            let pass = self.pass(&stations, zeta);
            let zeta_new = match self.target {
                DesignTarget::Thrust(thrust) => {
                    let tc = 2.0 * thrust / (disc * self.velocity.powi(2));
                    let half = pass.i1 / (2.0 * pass.i2);
                    let d = half * half - tc / pass.i2;
                    if d < 0.0 {
                        return Err(DesignError::InvalidParameter(format!(
                            "thrust of {thrust} N is beyond what this propeller can deliver"
                        )));
                    }
                    half - d.sqrt()
                }
                DesignTarget::ShaftPower(power) => {
                    let pc = 2.0 * power / (disc * self.velocity.powi(3));
                    let half = pass.j1 / (2.0 * pass.j2);
                    let d = half * half + pc / pass.j2;
                    if d < 0.0 {
                        return Err(DesignError::Computation(
                            "negative power discriminant".to_string(),
                        ));
                    }
                    -half + d.sqrt()
                }
            };

            residual = (zeta_new - zeta).abs();
            debug!("Propeller iteration {}: zeta = {:.6}", iteration, zeta_new);
            zeta = zeta_new;
            if residual < self.tolerance {
                let pass = self.pass(&stations, zeta);
                return Ok(self.finish(stations, pass, zeta, iteration));
            }
        }

        warn!(
            "Propeller design did not converge in {} iterations",
            self.max_iterations
        );
        Err(DesignError::NoConvergence {
            iterations: self.max_iterations,
            residual,
        })
    }

    fn finish(&self, stations: Vec<f64>, pass: Pass, zeta: f64, iterations: usize) -> PropellerDesign {
        let radius = self.diameter / 2.0;
        let q_disc = 0.5 * self.rho * self.velocity.powi(2) * PI * radius * radius;
        let thrust = (pass.i1 * zeta - pass.i2 * zeta * zeta) * q_disc;
        let power = (pass.j1 * zeta + pass.j2 * zeta * zeta) * q_disc * self.velocity;

        let n = self.rpm / 60.0;
        let d = self.diameter;
        let thrust_coefficient = thrust / (self.rho * n.powi(2) * d.powi(4));
        let power_coefficient = power / (self.rho * n.powi(3) * d.powi(5));
        let advance_ratio = self.velocity / (n * d);

        let (chord, reynolds, section_cl) = self.reynolds_floor(&pass);

        PropellerDesign {
            r_over_r: stations,
            chord,
            twist_deg: pass.twist_deg,
            reynolds,
            section_cl,
            zeta,
            thrust,
            power,
            thrust_coefficient,
            power_coefficient,
            advance_ratio,
            efficiency: advance_ratio * thrust_coefficient / power_coefficient,
            iterations,
        }
    }
}

/// Twist in radians, for callers feeding a blade-element model.
pub fn twist_rad(design: &PropellerDesign) -> Vec<f64> {
    design.twist_deg.iter().map(|b| deg_to_rad(*b)).collect()
}
