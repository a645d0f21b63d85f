//! Stack pressure and design power search for a target net power.

use argmin::core::{CostFunction, Error as ArgminError, Executor, State};
use argmin::solver::brent::BrentRoot;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::balance_of_plant::{BalanceOfPlant, BalanceOfPlantInput};
use super::polarization::{OperatingPoint, PolarizationCurve};
use super::stack::{StackInput, StackSizing};
use super::weights::{CellWeights, WeightBreakdown, WeightInput};
use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::linspace;

/// Assumptions shared by every stage of the fuel-cell pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelCellInput {
    pub stack: StackInput,
    pub balance_of_plant: BalanceOfPlantInput,
    pub weights: WeightInput,
}

impl FuelCellInput {
    pub fn validate(&self) -> Result<()> {
        self.stack.validate()?;
        self.balance_of_plant.validate()?;
        self.weights.validate()
    }
}

/// Polarization, stack, balance of plant and weights for one pressure and
/// design power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCellSystem {
    pub curve: PolarizationCurve,
    pub stack: StackSizing,
    pub balance_of_plant: BalanceOfPlant,
    pub weights: CellWeights,
}

impl FuelCellSystem {
    pub fn new(stack_pressure_atm: f64, input: &FuelCellInput) -> Result<Self> {
        let curve = PolarizationCurve::new(stack_pressure_atm)?;
        let stack = StackSizing::new(&curve, input.stack.clone())?;
        let balance_of_plant = BalanceOfPlant::new(&stack, input.balance_of_plant.clone())?;
        let weights = CellWeights::new(&stack, &balance_of_plant, input.weights.clone())?;
        Ok(Self {
            curve,
            stack,
            balance_of_plant,
            weights,
        })
    }

    /// Summary at the minimum-weight sample.
    pub fn design_point(&self) -> FuelCellDesign {
        let breakdown = self.weights.breakdown();
        let k = breakdown.index;
        FuelCellDesign {
            stack_pressure_atm: self.curve.stack_pressure_atm,
            design_power: self.stack.input.design_power,
            net_power: self.balance_of_plant.net_power[k],
            bop_power: self.balance_of_plant.bop_power[k],
            cell_count: self.stack.cell_count[k],
            active_area: self.stack.active_area[k],
            operating_point: OperatingPoint {
                index: k,
                current_density: self.curve.current_density[k],
                voltage: self.curve.voltage[k],
                power_density: self.curve.power_density[k],
                heat_density: self.curve.heat_density[k],
            },
            weight: breakdown,
        }
    }
}

/// Minimum-weight design at one stack pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCellDesign {
    pub stack_pressure_atm: f64,
    /// Gross stack power (W)
    pub design_power: f64,
    /// Power left after the balance of plant (W)
    pub net_power: f64,
    pub bop_power: f64,
    pub cell_count: f64,
    /// Active area per cell (cm^2)
    pub active_area: f64,
    pub operating_point: OperatingPoint,
    pub weight: WeightBreakdown,
}

/// Net power shortfall as a function of gross design power.
#[derive(Clone)]
struct NetPowerResidual {
    stack_pressure_atm: f64,
    net_power: f64,
    input: FuelCellInput,
}

impl NetPowerResidual {
    fn design(&self, design_power: f64) -> Result<FuelCellDesign> {
        let mut input = self.input.clone();
        input.stack.design_power = design_power;
        Ok(FuelCellSystem::new(self.stack_pressure_atm, &input)?.design_point())
    }
}

impl CostFunction for NetPowerResidual {
    type Param = f64;
    type Output = f64;

    fn cost(&self, design_power: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        let design = self.design(*design_power)?;
        Ok(design.net_power - self.net_power)
    }
}

/// Search settings for [`optimise`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerInput {
    /// Required net power (W)
    pub net_power: f64,
    /// Lowest stack pressure searched (atm)
    pub pressure_min: f64,
    /// Highest stack pressure searched (atm)
    pub pressure_max: f64,
    pub pressure_steps: usize,
    /// Root tolerance on design power (W)
    pub tolerance: f64,
    pub max_iterations: u64,
}

impl Default for OptimizerInput {
    fn default() -> Self {
        Self {
            net_power: 100_000.0,
            pressure_min: 1.0,
            pressure_max: 2.5,
            pressure_steps: 100,
            tolerance: 1.0,
            max_iterations: 100,
        }
    }
}

/// Gross design power that leaves `net_power` after the balance of plant.
pub fn required_design_power(
    stack_pressure_atm: f64,
    net_power: f64,
    input: &FuelCellInput,
    settings: &OptimizerInput,
) -> Result<FuelCellDesign> {
    ensure_positive("net power", net_power)?;
    ensure_positive("root tolerance", settings.tolerance)?;

    let problem = NetPowerResidual {
        stack_pressure_atm,
        net_power,
        input: input.clone(),
    };
    let solver = BrentRoot::new(net_power, 3.0 * net_power, settings.tolerance);
    let result = Executor::new(problem.clone(), solver)
        .configure(|state| state.param(net_power).max_iters(settings.max_iterations))
        .run()
        .map_err(|e| {
            DesignError::Computation(format!(
                "design power search at {stack_pressure_atm:.3} atm failed: {e}"
            ))
        })?;

    let state = result.state();
    let design_power = state.get_best_param().copied().ok_or_else(|| {
        DesignError::Computation("design power search returned no solution".to_string())
    })?;
    let design = problem.design(design_power)?;

    let residual = (design.net_power - net_power).abs();
    if residual > settings.tolerance.max(1e-6 * net_power) * 10.0 {
        return Err(DesignError::NoConvergence {
            iterations: state.get_iter() as usize,
            residual,
        });
    }
    debug!(
        "{:.3} atm: P_D = {:.0} W for P_net = {:.0} W ({} iterations)",
        stack_pressure_atm,
        design_power,
        net_power,
        state.get_iter()
    );
    Ok(design)
}

/// Result of a stack pressure sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureSweep {
    pub net_power: f64,
    /// Lightest design at every pressure, in pressure order
    pub designs: Vec<FuelCellDesign>,
    /// Lightest design overall
    pub best: FuelCellDesign,
}

/// Lightest stack pressure and design power for the requested net power.
pub fn optimise(input: &FuelCellInput, settings: &OptimizerInput) -> Result<PressureSweep> {
    if settings.pressure_steps == 0 {
        return Err(DesignError::InvalidParameter(
            "pressure sweep needs at least one step".to_string(),
        ));
    }
    if settings.pressure_min > settings.pressure_max {
        return Err(DesignError::InvalidParameter(format!(
            "pressure range is reversed: {} > {}",
            settings.pressure_min, settings.pressure_max
        )));
    }

    let pressures = linspace(settings.pressure_min, settings.pressure_max, settings.pressure_steps);
    let designs = pressures
        .par_iter()
        .map(|&p| required_design_power(p, settings.net_power, input, settings))
        .collect::<Result<Vec<_>>>()?;

    let best = designs
        .iter()
        .copied()
        .min_by(|a, b| a.weight.total.total_cmp(&b.weight.total))
        .ok_or_else(|| DesignError::EmptyData("pressure sweep produced no designs".to_string()))?;

    info!(
        "Best fuel-cell system for {:.1} kW net: {:.2} atm, {:.1} kW gross, {:.1} kg",
        settings.net_power / 1000.0,
        best.stack_pressure_atm,
        best.design_power / 1000.0,
        best.weight.total
    );

    Ok(PressureSweep {
        net_power: settings.net_power,
        designs,
        best,
    })
}
