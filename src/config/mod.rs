//! YAML design files.
//!
//! Every section is optional, and every field inside a section falls back to
//! the calculator's default, so a file only needs to list what it changes.

mod loader;

pub use loader::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::aero::{HoverInput, PropellerInput};
use crate::fuel_cell::{FuelCellInput, OptimizerInput};
use crate::sizing::{Observer, RotorSizingInput};
use crate::structures::{BoxSection, CantileverBeam, HSection, TubeSection};
use crate::utils::errors::{DesignError, Result as DesignResult};

/// Fuel-cell assumptions and the pressure search around them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelCellConfig {
    pub system: FuelCellInput,
    pub optimizer: OptimizerInput,
}

/// Arm cross-section, dimensions in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionConfig {
    /// Flanges as `[width, thickness]`, web as `[thickness, height]`
    H {
        top: (f64, f64),
        web: (f64, f64),
        bottom: (f64, f64),
    },
    Tube {
        outer_radius: f64,
        wall_thickness: f64,
    },
    Box {
        height: f64,
        wall_thickness: f64,
    },
}

/// Built form of a [`SectionConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section {
    H(HSection),
    Tube(TubeSection),
    Box(BoxSection),
}

impl SectionConfig {
    pub fn build(&self) -> DesignResult<Section> {
        Ok(match *self {
            Self::H { top, web, bottom } => Section::H(HSection::new(top, web, bottom)?),
            Self::Tube {
                outer_radius,
                wall_thickness,
            } => Section::Tube(TubeSection::new(outer_radius, wall_thickness)?),
            Self::Box {
                height,
                wall_thickness,
            } => Section::Box(BoxSection::new(height, wall_thickness)?),
        })
    }
}

/// Cantilever rotor arm and how finely to sample it.
///
/// With a `section`, the beam's area and second moment are taken from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    #[serde(flatten)]
    pub beam: CantileverBeam,
    pub stations: usize,
    pub section: Option<SectionConfig>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam: CantileverBeam::default(),
            stations: 21,
            section: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub name: String,
    pub rotor: Option<RotorSizingInput>,
    /// Observer for the rotor noise estimate; needs `rotor`
    pub noise: Option<Observer>,
    pub fuel_cell: Option<FuelCellConfig>,
    pub hover: Option<HoverInput>,
    pub beam: Option<BeamConfig>,
    pub propeller: Option<PropellerInput>,
    /// Section polar CSV for the hover analysis. A NACA 0012 lift slope is
    /// used when absent.
    pub airfoil_polar: Option<PathBuf>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            name: "evtol".to_string(),
            rotor: None,
            noise: None,
            fuel_cell: None,
            hover: None,
            beam: None,
            propeller: None,
            airfoil_polar: None,
        }
    }
}

fn invalid(section: &str, err: DesignError) -> ConfigError {
    ConfigError::ValidationError(format!("{section}: {err}"))
}

impl DesignConfig {
    /// Check every present section without running it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rotor) = &self.rotor {
            rotor.validate().map_err(|e| invalid("rotor", e))?;
        }
        if let Some(observer) = &self.noise {
            if self.rotor.is_none() {
                return Err(ConfigError::ValidationError(
                    "noise needs a rotor section to size the rotor".to_string(),
                ));
            }
            if observer.distance() <= 0.0 {
                return Err(ConfigError::ValidationError(
                    "noise observer cannot sit at the rotor hub".to_string(),
                ));
            }
        }
        if let Some(fuel_cell) = &self.fuel_cell {
            fuel_cell
                .system
                .validate()
                .map_err(|e| invalid("fuel_cell", e))?;
            if fuel_cell.optimizer.pressure_min > fuel_cell.optimizer.pressure_max {
                return Err(ConfigError::ValidationError(format!(
                    "fuel_cell: pressure range {} to {} atm is reversed",
                    fuel_cell.optimizer.pressure_min, fuel_cell.optimizer.pressure_max
                )));
            }
        }
        if let Some(hover) = &self.hover {
            hover.validate().map_err(|e| invalid("hover", e))?;
        }
        if let Some(beam) = &self.beam {
            beam.beam.validate().map_err(|e| invalid("beam", e))?;
            if let Some(section) = &beam.section {
                section.build().map_err(|e| invalid("beam section", e))?;
            }
            if beam.stations < 2 {
                return Err(ConfigError::ValidationError(
                    "beam: at least two stations are needed".to_string(),
                ));
            }
        }
        if let Some(propeller) = &self.propeller {
            propeller.validate().map_err(|e| invalid("propeller", e))?;
        }
        Ok(())
    }
}
