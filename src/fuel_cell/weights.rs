//! Fuel-cell system mass estimate.

use serde::{Deserialize, Serialize};

use super::balance_of_plant::BalanceOfPlant;
use super::stack::StackSizing;
use crate::utils::constants::CM2_TO_M2;
use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::index_of_min;

/// Mass model assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightInput {
    /// Stack mass per unit active area (kg/m^2)
    pub stack_areal_mass: f64,
    /// Flight time on hydrogen (s)
    pub endurance: f64,
    /// Hydrogen mass over hydrogen-plus-tank mass
    pub tank_gravimetric_index: f64,
    /// Compressor specific power (W/kg)
    pub air_system_specific_power: f64,
    /// Radiator heat rejection per kg (W/kg)
    pub radiator_specific_heat_rejection: f64,
    /// Power electronics specific power (W/kg)
    pub electrical_specific_power: f64,
}

impl Default for WeightInput {
    fn default() -> Self {
        Self {
            stack_areal_mass: 5.0,
            endurance: 3600.0,
            tank_gravimetric_index: 0.05,
            air_system_specific_power: 2000.0,
            radiator_specific_heat_rejection: 3000.0,
            electrical_specific_power: 10_000.0,
        }
    }
}

impl WeightInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("stack areal mass", self.stack_areal_mass)?;
        ensure_positive("endurance", self.endurance)?;
        ensure_positive("air system specific power", self.air_system_specific_power)?;
        ensure_positive("radiator specific heat rejection", self.radiator_specific_heat_rejection)?;
        ensure_positive("electrical specific power", self.electrical_specific_power)?;
        if !(self.tank_gravimetric_index > 0.0 && self.tank_gravimetric_index < 1.0) {
            return Err(DesignError::InvalidParameter(format!(
                "tank gravimetric index must be in (0, 1), got {}",
                self.tank_gravimetric_index
            )));
        }
        Ok(())
    }
}

/// Named mass components of one sample (kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub index: usize,
    pub stack: f64,
    pub hydrogen: f64,
    pub tank: f64,
    pub air_system: f64,
    pub heat_rejection: f64,
    pub electrical: f64,
    pub total: f64,
}

impl WeightBreakdown {
    /// Components paired with their labels.
    pub fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("stack", self.stack),
            ("hydrogen", self.hydrogen),
            ("tank", self.tank),
            ("air system", self.air_system),
            ("heat rejection", self.heat_rejection),
            ("electrical", self.electrical),
        ]
    }
}

/// Mass of every component at every stack sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWeights {
    pub input: WeightInput,
    pub stack: Vec<f64>,
    pub hydrogen: Vec<f64>,
    pub tank: Vec<f64>,
    pub air_system: Vec<f64>,
    pub heat_rejection: Vec<f64>,
    pub electrical: Vec<f64>,
    pub total: Vec<f64>,
}

impl CellWeights {
    pub fn new(stack: &StackSizing, bop: &BalanceOfPlant, input: WeightInput) -> Result<Self> {
        input.validate()?;
        if stack.len() != bop.len() {
            return Err(DesignError::InvalidParameter(format!(
                "stack has {} samples but balance of plant has {}",
                stack.len(),
                bop.len()
            )));
        }
        if stack.is_empty() {
            return Err(DesignError::EmptyData("no stack samples to weigh".to_string()));
        }

        let n = stack.len();
        let electrical = stack.input.design_power / input.electrical_specific_power;
        let tank_factor = 1.0 / input.tank_gravimetric_index - 1.0;

        let mut weights = Self {
            stack: Vec::with_capacity(n),
            hydrogen: Vec::with_capacity(n),
            tank: Vec::with_capacity(n),
            air_system: Vec::with_capacity(n),
            heat_rejection: Vec::with_capacity(n),
            electrical: vec![electrical; n],
            total: Vec::with_capacity(n),
            input,
        };

        for k in 0..n {
            let stack_mass =
                weights.input.stack_areal_mass * stack.total_active_area(k) * CM2_TO_M2;
            let hydrogen = stack.hydrogen_flow[k] * weights.input.endurance;
            let tank = hydrogen * tank_factor;
            let air = bop.compressor_power[k].max(0.0) / weights.input.air_system_specific_power;
            let radiator =
                bop.heat_rejection[k].max(0.0) / weights.input.radiator_specific_heat_rejection;

            weights.stack.push(stack_mass);
            weights.hydrogen.push(hydrogen);
            weights.tank.push(tank);
            weights.air_system.push(air);
            weights.heat_rejection.push(radiator);
            weights
                .total
                .push(stack_mass + hydrogen + tank + air + radiator + electrical);
        }
        Ok(weights)
    }

    /// Index of the lightest sample.
    pub fn design_point(&self) -> usize {
        index_of_min(&self.total).unwrap_or(0)
    }

    pub fn breakdown_at(&self, index: usize) -> Option<WeightBreakdown> {
        (index < self.total.len()).then(|| WeightBreakdown {
            index,
            stack: self.stack[index],
            hydrogen: self.hydrogen[index],
            tank: self.tank[index],
            air_system: self.air_system[index],
            heat_rejection: self.heat_rejection[index],
            electrical: self.electrical[index],
            total: self.total[index],
        })
    }

    /// Components of the lightest sample.
    pub fn breakdown(&self) -> WeightBreakdown {
        let index = self.design_point();
        WeightBreakdown {
            index,
            stack: self.stack[index],
            hydrogen: self.hydrogen[index],
            tank: self.tank[index],
            air_system: self.air_system[index],
            heat_rejection: self.heat_rejection[index],
            electrical: self.electrical[index],
            total: self.total[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_cell::balance_of_plant::BalanceOfPlantInput;
    use crate::fuel_cell::polarization::PolarizationCurve;
    use crate::fuel_cell::stack::StackInput;
    use approx::assert_relative_eq;

    fn weights(pressure: f64) -> CellWeights {
        let curve = PolarizationCurve::new(pressure).unwrap();
        let stack = StackSizing::new(&curve, StackInput::default()).unwrap();
        let bop = BalanceOfPlant::new(&stack, BalanceOfPlantInput::default()).unwrap();
        CellWeights::new(&stack, &bop, WeightInput::default()).unwrap()
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let w = weights(2.0);
        let b = w.breakdown();
        let sum: f64 = b.components().iter().map(|(_, m)| m).sum();
        assert_relative_eq!(sum, b.total, epsilon = 1e-9);
        assert_relative_eq!(b.electrical, 9.6, epsilon = 1e-12);
    }

    #[test]
    fn test_design_point_is_interior_minimum() {
        let w = weights(1.5);
        let index = w.design_point();
        assert!(index > 0 && index < w.total.len() - 1);
        assert!(w.total.iter().all(|m| *m >= w.total[index]));
    }

    #[test]
    fn test_tank_follows_gravimetric_index() {
        let w = weights(2.5);
        let b = w.breakdown();
        assert_relative_eq!(b.hydrogen / (b.hydrogen + b.tank), 0.05, epsilon = 1e-12);
    }
}
