pub mod airfoil;
pub mod bemt;
pub mod hover;
pub mod propeller;
pub mod rotor_loads;

pub use airfoil::{AirfoilPolar, LinearAirfoil, PolarPoint, SectionAerodynamics};
pub use bemt::{BladeElement, BladeElementRotor, ElementLoads, RotorLoads};
pub use hover::{HoverElement, HoverInput, HoverPerformance};
pub use propeller::{DesignTarget, PropellerDesign, PropellerInput};
pub use rotor_loads::{RotorDiscInput, RotorDiscLoads};
