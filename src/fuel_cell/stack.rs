//! Stack sizing along a polarization curve.

use serde::{Deserialize, Serialize};

use super::polarization::PolarizationCurve;
use crate::utils::errors::{ensure_non_negative, ensure_positive, Result};

/// Air mass flow per stack watt and cell volt at unit stoichiometry (kg/s).
const AIR_USAGE: f64 = 3.57e-7;
/// Oxygen removed from the air stream.
const OXYGEN_USAGE: f64 = 8.29e-8;
const HYDROGEN_USAGE: f64 = 1.05e-8;
const WATER_PRODUCTION: f64 = 9.34e-8;

/// Electrical design point of the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackInput {
    /// Gross design power (W)
    pub design_power: f64,
    /// Stack design voltage (V)
    pub design_voltage: f64,
    /// Air stoichiometric ratio
    pub stoichiometry: f64,
    /// Pressure drop across the stack (Pa)
    pub pressure_drop: f64,
}

impl Default for StackInput {
    fn default() -> Self {
        Self {
            design_power: 96_000.0,
            design_voltage: 840.0,
            stoichiometry: 2.0,
            pressure_drop: 10_000.0,
        }
    }
}

impl StackInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("design power", self.design_power)?;
        ensure_positive("design voltage", self.design_voltage)?;
        ensure_positive("stoichiometry", self.stoichiometry)?;
        ensure_non_negative("stack pressure drop", self.pressure_drop)?;
        Ok(())
    }
}

/// Cell count, active area and reactant flows at every curve sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSizing {
    pub curve: PolarizationCurve,
    pub input: StackInput,
    /// Number of cells (fractional)
    pub cell_count: Vec<f64>,
    /// Active area per cell (cm^2)
    pub active_area: Vec<f64>,
    /// Air mass flow into the stack (kg/s)
    pub air_in_flow: Vec<f64>,
    /// Air mass flow out of the stack (kg/s)
    pub air_out_flow: Vec<f64>,
    /// Hydrogen consumption (kg/s)
    pub hydrogen_flow: Vec<f64>,
    /// Product water (kg/s)
    pub water_flow: Vec<f64>,
}

impl StackSizing {
    pub fn new(curve: &PolarizationCurve, input: StackInput) -> Result<Self> {
        input.validate()?;

        let n = curve.len();
        let mut stack = Self {
            curve: curve.clone(),
            cell_count: Vec::with_capacity(n),
            active_area: Vec::with_capacity(n),
            air_in_flow: Vec::with_capacity(n),
            air_out_flow: Vec::with_capacity(n),
            hydrogen_flow: Vec::with_capacity(n),
            water_flow: Vec::with_capacity(n),
            input,
        };

        let power = stack.input.design_power;
        for (&v, &p) in curve.voltage.iter().zip(curve.power_density.iter()) {
            let cells = stack.input.design_voltage / v;
            let per_volt = power / v;
            let air_in = AIR_USAGE * stack.input.stoichiometry * per_volt;

            stack.cell_count.push(cells);
            stack.active_area.push(power / (cells * p));
            stack.air_in_flow.push(air_in);
            stack.air_out_flow.push(air_in - OXYGEN_USAGE * per_volt);
            stack.hydrogen_flow.push(HYDROGEN_USAGE * per_volt);
            stack.water_flow.push(WATER_PRODUCTION * per_volt);
        }
        Ok(stack)
    }

    pub fn len(&self) -> usize {
        self.cell_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count.is_empty()
    }

    /// Total active area of all cells at sample `index` (cm^2).
    pub fn total_active_area(&self, index: usize) -> f64 {
        self.cell_count[index] * self.active_area[index]
    }
}
