//! Rigid-body aggregation of point loads and masses, and its time integration.

pub mod assembly;
pub mod dynamics;
pub mod error;
pub mod force_point;
pub mod forces;
pub mod rotation;
pub mod value_source;

pub use assembly::AircraftAssembly;
pub use dynamics::{RigidBodyIntegrator, RigidBodyState};
pub use error::PhysicsError;
pub use force_point::{ForcePoint, PointInputs};
pub use forces::{ForceCategory, ReferenceFrame};
pub use rotation::EulerRotation;
pub use value_source::ValueSource;
