//! Rotor sizing from disc loading and blade loading limits.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::atmosphere::speed_of_sound;
use crate::utils::constants::{
    CELSIUS_TO_KELVIN, FT_TO_M, GRAVITY, ISA_SEA_LEVEL_DENSITY, RPM_TO_RAD_S,
};
use crate::utils::errors::{ensure_non_negative, ensure_positive, DesignError, Result};
use crate::utils::math::deg_to_rad;

/// Sizing requirements for one rotor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorSizingInput {
    /// Maximum take-off mass (kg)
    pub mtow: f64,
    pub blades: usize,
    pub rotors: usize,
    /// Disc loading (kg/m^2)
    pub disc_loading: f64,
    /// Bank angle in a sustained turn (deg)
    pub bank_angle_deg: f64,
    /// Blade loading C_T/σ limit in forward flight
    pub ct_sigma_forward: f64,
    /// Blade loading C_T/σ limit in a turn
    pub ct_sigma_turn: f64,
    /// Blade loading C_T/σ limit in turbulence
    pub ct_sigma_turbulence: f64,
    /// 1 for a single rotor, 2 for a coaxial pair
    pub coaxial: usize,
    /// Fuselage download as a fraction of weight
    pub download_factor: f64,
    /// Design maximum speed (m/s)
    pub v_max: f64,
    /// Ambient temperature (deg C)
    pub temperature_c: f64,
    pub max_tip_mach: f64,
    /// Tip speed (m/s)
    pub tip_speed: f64,
    /// Section lift-curve slope (1/rad)
    pub lift_slope: f64,
    /// Vertical gust (m/s)
    pub gust_velocity: f64,
    /// Air density (kg/m^3)
    pub rho: f64,
}

impl Default for RotorSizingInput {
    fn default() -> Self {
        Self {
            mtow: 718.89,
            blades: 4,
            rotors: 4,
            disc_loading: 14.65,
            bank_angle_deg: 30.0,
            ct_sigma_forward: 0.12,
            ct_sigma_turn: 0.15,
            ct_sigma_turbulence: 0.17,
            coaxial: 1,
            download_factor: 0.05,
            v_max: 50.0,
            temperature_c: 15.0,
            max_tip_mach: 0.85,
            tip_speed: 550.0 * FT_TO_M,
            lift_slope: 5.73,
            gust_velocity: 30.0 * FT_TO_M,
            rho: ISA_SEA_LEVEL_DENSITY,
        }
    }
}

impl RotorSizingInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("MTOW", self.mtow)?;
        ensure_positive("disc loading", self.disc_loading)?;
        ensure_positive("tip speed", self.tip_speed)?;
        ensure_positive("air density", self.rho)?;
        ensure_positive("forward-flight blade loading", self.ct_sigma_forward)?;
        ensure_positive("turn blade loading", self.ct_sigma_turn)?;
        ensure_positive("turbulence blade loading", self.ct_sigma_turbulence)?;
        ensure_non_negative("download factor", self.download_factor)?;
        ensure_non_negative("maximum speed", self.v_max)?;
        if self.blades == 0 || self.rotors == 0 || self.coaxial == 0 {
            return Err(DesignError::InvalidParameter(
                "blade, rotor and coaxial counts must be non-zero".to_string(),
            ));
        }
        if self.bank_angle_deg.abs() >= 90.0 {
            return Err(DesignError::InvalidParameter(format!(
                "bank angle must be below 90 deg, got {}",
                self.bank_angle_deg
            )));
        }
        Ok(())
    }
}

/// Thrust, thrust coefficient and required solidity for one load case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub load_factor: f64,
    /// Total thrust over all rotors (N)
    pub thrust: f64,
    /// Per-rotor thrust coefficient
    pub thrust_coefficient: f64,
    pub solidity: f64,
}

/// Changes applied by [`RotorSizing::iterate_design`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignOverrides {
    pub mtow: Option<f64>,
    pub blades: Option<usize>,
    pub rotors: Option<usize>,
    pub disc_loading: Option<f64>,
}

/// Sized rotor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorSizing {
    pub input: RotorSizingInput,
    pub speed_of_sound: f64,
    pub radius: f64,
    pub diameter: f64,
    /// Rotational speed (rad/s)
    pub omega: f64,
    pub rpm: f64,
    pub max_forward_velocity: f64,
    pub never_exceed_velocity: f64,
    /// Advance ratio at V_ne
    pub mu_ne: f64,
    /// Download factor on thrust
    pub k_dl: f64,
    pub forward_flight: LoadCase,
    pub turn: LoadCase,
    pub turbulence: LoadCase,
    pub maximum_solidity: f64,
    pub chord: f64,
    pub aspect_ratio: f64,
}

impl RotorSizing {
    /// Size the rotor for `input`.
    pub fn compute(input: RotorSizingInput) -> Result<Self> {
        input.validate()?;

        let speed_of_sound = speed_of_sound(input.temperature_c + CELSIUS_TO_KELVIN)?;
        let rotors = input.rotors as f64;
        let radius = ((input.mtow / rotors) / (PI * input.disc_loading)).sqrt();
        let omega = input.tip_speed / radius;

        let max_forward_velocity = input.max_tip_mach * speed_of_sound - input.tip_speed;
        if max_forward_velocity <= 0.0 {
            warn!(
                "Tip speed {:.1} m/s leaves no forward speed margin below M{:.2}",
                input.tip_speed, input.max_tip_mach
            );
        }
        let never_exceed_velocity = 1.1 * max_forward_velocity;

        let k_dl = 1.0 + input.download_factor;
        let weight = input.mtow * GRAVITY;
        let disc_term = rotors * input.rho * PI * radius.powi(2) * input.tip_speed.powi(2);
        let case = |load_factor: f64, ct_sigma: f64| {
            let thrust = load_factor * k_dl * weight;
            let thrust_coefficient = thrust / disc_term;
            LoadCase {
                load_factor,
                thrust,
                thrust_coefficient,
                solidity: thrust_coefficient / ct_sigma,
            }
        };

        let forward_flight = case(1.0, input.ct_sigma_forward);
        let turn = case(
            1.0 / deg_to_rad(input.bank_angle_deg).cos(),
            input.ct_sigma_turn,
        );
        let gust_increment = 0.25 * input.lift_slope * (input.gust_velocity / input.tip_speed)
            / input.ct_sigma_turbulence;
        let turbulence = case(2.0 + gust_increment, input.ct_sigma_turbulence);

        let maximum_solidity = forward_flight
            .solidity
            .max(turn.solidity)
            .max(turbulence.solidity);
        let chord = maximum_solidity * PI * radius / (input.coaxial * input.blades) as f64;

        let sizing = Self {
            speed_of_sound,
            radius,
            diameter: 2.0 * radius,
            omega,
            rpm: omega / RPM_TO_RAD_S,
            max_forward_velocity,
            never_exceed_velocity,
            mu_ne: never_exceed_velocity / input.tip_speed,
            k_dl,
            forward_flight,
            turn,
            turbulence,
            maximum_solidity,
            chord,
            aspect_ratio: radius / chord,
            input,
        };
        debug!(
            "Rotor sized: R = {:.3} m, sigma = {:.4}, c = {:.3} m, AR = {:.2}",
            sizing.radius, sizing.maximum_solidity, sizing.chord, sizing.aspect_ratio
        );
        Ok(sizing)
    }

    /// Resize with some of the inputs replaced.
    pub fn iterate_design(&self, overrides: DesignOverrides) -> Result<Self> {
        let mut input = self.input.clone();
        if let Some(mtow) = overrides.mtow {
            input.mtow = mtow;
        }
        if let Some(blades) = overrides.blades {
            input.blades = blades;
        }
        if let Some(rotors) = overrides.rotors {
            input.rotors = rotors;
        }
        if let Some(disc_loading) = overrides.disc_loading {
            input.disc_loading = disc_loading;
        }
        Self::compute(input)
    }

    /// Disc area of one rotor (m^2).
    pub fn disc_area(&self) -> f64 {
        PI * self.radius.powi(2)
    }

    /// Thrust per rotor in forward flight (N).
    pub fn thrust_per_rotor(&self) -> f64 {
        self.forward_flight.thrust / self.input.rotors as f64
    }
}
