//! PEM fuel-cell polarization curves.
//!
//! Loss model fitted to tabulated data for a low-temperature PEM stack at
//! 80 °C, with the fitting constants interpolated on stack pressure.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::constants::{
    ATM_TO_PA, CELSIUS_TO_KELVIN, FARADAY_CONSTANT, UNIVERSAL_GAS_CONSTANT,
};
use crate::utils::errors::{DesignError, Result};
use crate::utils::math::{arange, interp1d};

const PRESSURE_ATM: [f64; 5] = [1.00, 1.25, 1.50, 2.00, 2.50];
const REVERSIBLE_VOLTAGE: [f64; 5] = [1.1713, 1.1729, 1.1743, 1.1765, 1.1782];
const CATHODE_ALPHA: [f64; 5] = [0.18, 0.19, 0.20, 0.21, 0.22];
const LIMITING_CURRENT: [f64; 5] = [1.75, 1.85, 1.95, 2.25, 2.45];
const LEAK_CURRENT: [f64; 5] = [0.15, 0.15, 0.20, 0.25, 0.30];
const CONCENTRATION_CONSTANT: [f64; 5] = [0.03, 0.035, 0.035, 0.035, 0.035];

/// Pressure of the reference high-pressure stack (atm).
pub const REFERENCE_STACK_PRESSURE: f64 = 4.0;

/// Current density step and first sample (A/cm^2).
pub const CURRENT_DENSITY_STEP: f64 = 0.01;

/// Ratio of reversible to thermoneutral voltage.
const THERMONEUTRAL_RATIO: f64 = 0.8;

/// Fitting constants of the loss model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarizationParameters {
    /// Reversible cell voltage (V)
    pub reversible_voltage: f64,
    pub cathode_alpha: f64,
    /// Cathode exchange current density (A/cm^2)
    pub cathode_exchange_current: f64,
    pub anode_alpha: f64,
    /// Anode exchange current density (A/cm^2)
    pub anode_exchange_current: f64,
    /// Area specific resistance (Ohm cm^2)
    pub area_specific_resistance: f64,
    /// Limiting current density (A/cm^2)
    pub limiting_current: f64,
    /// Leak current density (A/cm^2)
    pub leak_current: f64,
    /// Concentration loss constant (V)
    pub concentration_constant: f64,
    /// Stack temperature (K)
    pub temperature: f64,
}

impl PolarizationParameters {
    /// Constants at `stack_pressure_atm`.
    ///
    /// Pressures in [1, 2.5] atm are interpolated from the table; 4 atm
    /// selects the reference stack. Anything else is rejected.
    pub fn at_pressure(stack_pressure_atm: f64) -> Result<Self> {
        let base = Self {
            reversible_voltage: 0.0,
            cathode_alpha: 0.0,
            cathode_exchange_current: 1.0e-4,
            anode_alpha: 0.5,
            anode_exchange_current: 0.1,
            area_specific_resistance: 0.04,
            limiting_current: 0.0,
            leak_current: 0.0,
            concentration_constant: 0.0,
            temperature: CELSIUS_TO_KELVIN + 80.0,
        };

        if (PRESSURE_ATM[0]..=PRESSURE_ATM[4]).contains(&stack_pressure_atm) {
            let p = stack_pressure_atm;
            Ok(Self {
                reversible_voltage: interp1d(p, &PRESSURE_ATM, &REVERSIBLE_VOLTAGE)?,
                cathode_alpha: interp1d(p, &PRESSURE_ATM, &CATHODE_ALPHA)?,
                limiting_current: interp1d(p, &PRESSURE_ATM, &LIMITING_CURRENT)?,
                leak_current: interp1d(p, &PRESSURE_ATM, &LEAK_CURRENT)?,
                concentration_constant: interp1d(p, &PRESSURE_ATM, &CONCENTRATION_CONSTANT)?,
                ..base
            })
        } else if stack_pressure_atm == REFERENCE_STACK_PRESSURE {
            Ok(Self {
                reversible_voltage: 1.1819,
                cathode_alpha: 0.16,
                area_specific_resistance: 0.06,
                limiting_current: 1.23,
                leak_current: 0.01,
                concentration_constant: 0.12,
                ..base
            })
        } else {
            Err(DesignError::InvalidParameter(format!(
                "stack pressure must be within 1.0-2.5 atm or exactly 4.0 atm, got {stack_pressure_atm}"
            )))
        }
    }

    /// Highest current density the loss model is valid for (A/cm^2).
    pub fn max_valid_current(&self) -> f64 {
        self.limiting_current - self.leak_current
    }

    /// Thermoneutral voltage E_h (V).
    pub fn thermoneutral_voltage(&self) -> f64 {
        self.reversible_voltage / THERMONEUTRAL_RATIO
    }
}

/// One sample of a polarization curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub index: usize,
    /// Current density (A/cm^2)
    pub current_density: f64,
    /// Cell voltage (V)
    pub voltage: f64,
    /// Power density (W/cm^2)
    pub power_density: f64,
    /// Heat density (W/cm^2)
    pub heat_density: f64,
}

/// Voltage, power and heat against current density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarizationCurve {
    pub stack_pressure_atm: f64,
    pub parameters: PolarizationParameters,
    pub current_density: Vec<f64>,
    pub activation_loss: Vec<f64>,
    pub ohmic_loss: Vec<f64>,
    pub concentration_loss: Vec<f64>,
    pub voltage: Vec<f64>,
    pub power_density: Vec<f64>,
    pub heat_density: Vec<f64>,
}

impl PolarizationCurve {
    pub fn new(stack_pressure_atm: f64) -> Result<Self> {
        let parameters = PolarizationParameters::at_pressure(stack_pressure_atm)?;
        Self::from_parameters(stack_pressure_atm, parameters)
    }

    /// Sample the loss model from 0.01 A/cm^2 up to the valid limit.
    pub fn from_parameters(
        stack_pressure_atm: f64,
        parameters: PolarizationParameters,
    ) -> Result<Self> {
        let PolarizationParameters {
            reversible_voltage,
            cathode_alpha,
            cathode_exchange_current,
            anode_alpha,
            anode_exchange_current,
            area_specific_resistance,
            limiting_current,
            leak_current,
            concentration_constant,
            temperature,
        } = parameters;

        if cathode_alpha <= 0.0 || anode_alpha <= 0.0 || temperature <= 0.0 {
            return Err(DesignError::InvalidParameter(
                "activation constants and temperature must be positive".to_string(),
            ));
        }

        let rt_f = UNIVERSAL_GAS_CONSTANT * temperature / FARADAY_CONSTANT;
        // Two electrons per mole at the anode, four at the cathode
        let b_a = rt_f / (anode_alpha * 2.0);
        let a_a = -b_a * anode_exchange_current.ln();
        let b_c = rt_f / (cathode_alpha * 4.0);
        let a_c = -b_c * cathode_exchange_current.ln();
        let e_h = parameters.thermoneutral_voltage();

        let grid = arange(
            CURRENT_DENSITY_STEP,
            parameters.max_valid_current(),
            CURRENT_DENSITY_STEP,
        );

        let mut curve = Self {
            stack_pressure_atm,
            parameters,
            current_density: Vec::with_capacity(grid.len()),
            activation_loss: Vec::with_capacity(grid.len()),
            ohmic_loss: Vec::with_capacity(grid.len()),
            concentration_loss: Vec::with_capacity(grid.len()),
            voltage: Vec::with_capacity(grid.len()),
            power_density: Vec::with_capacity(grid.len()),
            heat_density: Vec::with_capacity(grid.len()),
        };

        for i in grid {
            let leak = (i + leak_current).ln();
            let activation = a_a + b_a * leak + a_c + b_c * leak;
            let ohmic = i * area_specific_resistance;
            let concentration =
                concentration_constant * (limiting_current / (limiting_current - (i - leak_current))).ln();
            let v = reversible_voltage - activation - ohmic - concentration;
            if v.is_nan() || v <= 0.0 {
                warn!(
                    "Cell voltage collapses at {:.2} A/cm^2, truncating curve",
                    i
                );
                break;
            }

            curve.current_density.push(i);
            curve.activation_loss.push(activation);
            curve.ohmic_loss.push(ohmic);
            curve.concentration_loss.push(concentration);
            curve.voltage.push(v);
            curve.power_density.push(i * v);
            curve.heat_density.push(i * (e_h - v));
        }

        if curve.current_density.is_empty() {
            return Err(DesignError::EmptyData(format!(
                "polarization curve at {stack_pressure_atm} atm has no valid samples"
            )));
        }

        debug!(
            "Polarization curve at {:.2} atm: {} samples up to {:.2} A/cm^2",
            stack_pressure_atm,
            curve.len(),
            curve.current_density[curve.len() - 1]
        );
        Ok(curve)
    }

    pub fn len(&self) -> usize {
        self.current_density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_density.is_empty()
    }

    /// Stack pressure (Pa).
    pub fn stack_pressure_pa(&self) -> f64 {
        self.stack_pressure_atm * ATM_TO_PA
    }

    pub fn thermoneutral_voltage(&self) -> f64 {
        self.parameters.thermoneutral_voltage()
    }

    pub fn point(&self, index: usize) -> Option<OperatingPoint> {
        (index < self.len()).then(|| OperatingPoint {
            index,
            current_density: self.current_density[index],
            voltage: self.voltage[index],
            power_density: self.power_density[index],
            heat_density: self.heat_density[index],
        })
    }

    /// Sample with the highest power density.
    pub fn max_power_point(&self) -> OperatingPoint {
        let index = self
            .power_density
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        OperatingPoint {
            index,
            current_density: self.current_density[index],
            voltage: self.voltage[index],
            power_density: self.power_density[index],
            heat_density: self.heat_density[index],
        }
    }
}
