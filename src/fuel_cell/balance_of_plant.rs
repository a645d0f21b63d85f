//! Balance-of-plant loads: air supply, heat rejection and cooling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stack::StackSizing;
use crate::atmosphere::AirProperties;
use crate::utils::constants::{
    CM2_TO_M2, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, STEFAN_BOLTZMANN,
};
use crate::utils::errors::{ensure_positive, DesignError, Result};

/// Ambient conditions and component assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceOfPlantInput {
    /// Ambient temperature (K)
    pub ambient_temperature: f64,
    /// Ambient pressure (Pa)
    pub ambient_pressure: f64,
    pub compressor_efficiency: f64,
    pub turbine_efficiency: f64,
    /// Fraction of the active area exposed to ambient
    pub exposed_fraction: f64,
    pub emissivity: f64,
    /// Overall convection coefficient (W/m^2/K)
    pub convection_coefficient: f64,
    /// Coolant specific heat (J/kg/K)
    pub coolant_cp: f64,
    /// Coolant temperature rise across the stack (K)
    pub coolant_temperature_rise: f64,
    /// Cooling fan power per watt of rejected heat
    pub fan_power_ratio: f64,
}

impl Default for BalanceOfPlantInput {
    fn default() -> Self {
        Self {
            ambient_temperature: ISA_SEA_LEVEL_TEMP,
            ambient_pressure: ISA_SEA_LEVEL_PRESSURE,
            compressor_efficiency: 0.75,
            turbine_efficiency: 0.65,
            exposed_fraction: 0.6,
            emissivity: 0.8,
            convection_coefficient: 50.0,
            coolant_cp: 3600.0,
            coolant_temperature_rise: 10.0,
            fan_power_ratio: 0.05,
        }
    }
}

impl BalanceOfPlantInput {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("ambient temperature", self.ambient_temperature)?;
        ensure_positive("ambient pressure", self.ambient_pressure)?;
        ensure_positive("compressor efficiency", self.compressor_efficiency)?;
        ensure_positive("turbine efficiency", self.turbine_efficiency)?;
        ensure_positive("coolant specific heat", self.coolant_cp)?;
        ensure_positive("coolant temperature rise", self.coolant_temperature_rise)?;
        if self.compressor_efficiency > 1.0 || self.turbine_efficiency > 1.0 {
            return Err(DesignError::InvalidParameter(
                "component efficiencies cannot exceed 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Balance-of-plant power and heat at every stack sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceOfPlant {
    pub input: BalanceOfPlantInput,
    /// Compressor power (W)
    pub compressor_power: Vec<f64>,
    /// Turbine power (W), negative when recovered
    pub turbine_power: Vec<f64>,
    /// Net air system power (W)
    pub air_power: Vec<f64>,
    /// Waste heat produced by the stack (W)
    pub stack_heat: Vec<f64>,
    /// Heat carried away by the exhaust air (W)
    pub exhaust_heat: Vec<f64>,
    /// Heat lost by convection and radiation from the stack surface (W)
    pub dissipated_heat: Vec<f64>,
    /// Heat left for the cooling system (W)
    pub heat_rejection: Vec<f64>,
    /// Coolant mass flow (kg/s)
    pub coolant_flow: Vec<f64>,
    /// Cooling fan power (W)
    pub fan_power: Vec<f64>,
    /// Total parasitic power (W)
    pub bop_power: Vec<f64>,
    /// Design power minus parasitic power (W)
    pub net_power: Vec<f64>,
}

impl BalanceOfPlant {
    pub fn new(stack: &StackSizing, input: BalanceOfPlantInput) -> Result<Self> {
        input.validate()?;

        let curve = &stack.curve;
        let p_s = curve.stack_pressure_pa();
        let t_s = curve.parameters.temperature;
        let p_out = p_s - stack.input.pressure_drop;
        if p_out <= 0.0 {
            return Err(DesignError::InvalidParameter(format!(
                "stack pressure drop {} Pa exceeds stack pressure {p_s} Pa",
                stack.input.pressure_drop
            )));
        }

        let ambient = AirProperties::at(input.ambient_temperature)?;
        let exhaust = AirProperties::at(t_s)?;

        let compressor_rise = ((p_s / input.ambient_pressure).powf(ambient.isentropic_exponent())
            - 1.0)
            .max(0.0)
            * input.ambient_temperature
            / input.compressor_efficiency;
        // Expansion only recovers work while the exhaust is above ambient
        let turbine_drop = if p_out > input.ambient_pressure {
            ((input.ambient_pressure / p_out).powf(exhaust.isentropic_exponent()) - 1.0)
                * t_s
                * input.turbine_efficiency
        } else {
            0.0
        };

        let e_h = curve.thermoneutral_voltage();
        let design_power = stack.input.design_power;
        let surface_loss = input.convection_coefficient * (t_s - input.ambient_temperature)
            + input.emissivity * STEFAN_BOLTZMANN * (t_s.powi(4) - input.ambient_temperature.powi(4));

        let n = stack.len();
        let mut bop = Self {
            compressor_power: Vec::with_capacity(n),
            turbine_power: Vec::with_capacity(n),
            air_power: Vec::with_capacity(n),
            stack_heat: Vec::with_capacity(n),
            exhaust_heat: Vec::with_capacity(n),
            dissipated_heat: Vec::with_capacity(n),
            heat_rejection: Vec::with_capacity(n),
            coolant_flow: Vec::with_capacity(n),
            fan_power: Vec::with_capacity(n),
            bop_power: Vec::with_capacity(n),
            net_power: Vec::with_capacity(n),
            input,
        };

        for k in 0..n {
            let v = curve.voltage[k];
            let compressor = ambient.cp * stack.air_in_flow[k] * compressor_rise;
            let turbine = exhaust.cp * stack.air_out_flow[k] * turbine_drop;
            let air = compressor + turbine;

            let stack_heat = (e_h - v) * design_power / v;
            let exhaust_heat =
                exhaust.cp * stack.air_out_flow[k] * (t_s - bop.input.ambient_temperature);
            let exposed = bop.input.exposed_fraction * stack.total_active_area(k) * CM2_TO_M2;
            let dissipated = exposed * surface_loss;
            let rejection = stack_heat - dissipated - exhaust_heat;
            let cooling_load = rejection.max(0.0);

            let coolant = cooling_load / (bop.input.coolant_cp * bop.input.coolant_temperature_rise);
            let fan = bop.input.fan_power_ratio * cooling_load;
            let parasitic = air + fan;

            bop.compressor_power.push(compressor);
            bop.turbine_power.push(turbine);
            bop.air_power.push(air);
            bop.stack_heat.push(stack_heat);
            bop.exhaust_heat.push(exhaust_heat);
            bop.dissipated_heat.push(dissipated);
            bop.heat_rejection.push(rejection);
            bop.coolant_flow.push(coolant);
            bop.fan_power.push(fan);
            bop.bop_power.push(parasitic);
            bop.net_power.push(design_power - parasitic);
        }

        if let Some(peak) = bop.compressor_power.iter().copied().reduce(f64::max) {
            debug!("Peak compressor power {:.1} W at {:.2} atm", peak, curve.stack_pressure_atm);
        }
        Ok(bop)
    }

    pub fn len(&self) -> usize {
        self.bop_power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bop_power.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_cell::polarization::PolarizationCurve;
    use crate::fuel_cell::stack::StackInput;
    use approx::assert_relative_eq;

    fn plant(pressure: f64) -> (StackSizing, BalanceOfPlant) {
        let curve = PolarizationCurve::new(pressure).unwrap();
        let stack = StackSizing::new(&curve, StackInput::default()).unwrap();
        let bop = BalanceOfPlant::new(&stack, BalanceOfPlantInput::default()).unwrap();
        (stack, bop)
    }

    #[test]
    fn test_ambient_stack_needs_no_compression() {
        let (_, bop) = plant(1.0);
        assert!(bop.compressor_power.iter().all(|p| p.abs() < 1e-9));
        // Exhaust below ambient after the pressure drop, so no recovery
        assert!(bop.turbine_power.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn test_pressurised_stack_recovers_turbine_work() {
        let (_, bop) = plant(2.5);
        for k in 0..bop.len() {
            assert!(bop.compressor_power[k] > 0.0);
            assert!(bop.turbine_power[k] < 0.0);
            assert!(bop.air_power[k] > 0.0);
            assert_relative_eq!(
                bop.air_power[k],
                bop.compressor_power[k] + bop.turbine_power[k],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_heat_and_net_power_balance() {
        let (stack, bop) = plant(2.0);
        let k = stack.len() / 2;
        assert_relative_eq!(
            bop.heat_rejection[k],
            bop.stack_heat[k] - bop.dissipated_heat[k] - bop.exhaust_heat[k],
            epsilon = 1e-9
        );
        assert_relative_eq!(bop.net_power[k] + bop.bop_power[k], 96_000.0, epsilon = 1e-9);
        assert!(bop.coolant_flow[k] >= 0.0);
    }

    #[test]
    fn test_pressure_drop_larger_than_stack_pressure() {
        let curve = PolarizationCurve::new(1.0).unwrap();
        let stack = StackSizing::new(
            &curve,
            StackInput {
                pressure_drop: 2.0e5,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(BalanceOfPlant::new(&stack, BalanceOfPlantInput::default()).is_err());
    }
}
