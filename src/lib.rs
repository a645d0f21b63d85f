//! Conceptual design calculators for electric and hydrogen fuel-cell eVTOL
//! rotorcraft: rotor sizing and noise, blade-element aerodynamics, fuel-cell
//! system sizing, arm structures and rigid-body load aggregation.

pub mod aero;
pub mod atmosphere;
pub mod config;
pub mod fuel_cell;
pub mod physics;
pub mod report;
pub mod sizing;
pub mod structures;
pub mod utils;

pub use config::DesignConfig;
pub use report::DesignReport;
pub use utils::errors::{DesignError, Result};
