//! Structural checks for rotor arms and booms.

pub mod cantilever;
pub mod section;
pub mod stress;

pub use cantilever::{BeamStation, CantileverBeam};
pub use section::{BoxSection, CrossSection, HSection, Plate, TubeSection};
pub use stress::{BendingStress, StressSample};
