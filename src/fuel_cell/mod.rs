//! Hydrogen PEM fuel-cell sizing.
//!
//! The stages run in order: polarization curve, stack sizing, balance of
//! plant, then weights. Every stage keeps one value per current-density
//! sample so the lightest operating point can be picked at the end.

pub mod balance_of_plant;
pub mod optimizer;
pub mod polarization;
pub mod stack;
pub mod weights;

pub use balance_of_plant::{BalanceOfPlant, BalanceOfPlantInput};
pub use optimizer::{
    optimise, required_design_power, FuelCellDesign, FuelCellInput, FuelCellSystem,
    OptimizerInput, PressureSweep,
};
pub use polarization::{OperatingPoint, PolarizationCurve, PolarizationParameters};
pub use stack::{StackInput, StackSizing};
pub use weights::{CellWeights, WeightBreakdown, WeightInput};
