use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical origin of a load, used to break totals down by source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceCategory {
    Aerodynamic,
    Propulsive,
    Gravitational,
    Structural,
    Custom(String),
}

impl fmt::Display for ForceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aerodynamic => write!(f, "aerodynamic"),
            Self::Propulsive => write!(f, "propulsive"),
            Self::Gravitational => write!(f, "gravitational"),
            Self::Structural => write!(f, "structural"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Frames a load can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Axes of the component itself, before its mounting rotation
    Local,
    /// Axes of the parent the component is mounted in
    Body,
    /// Earth-fixed frame
    Inertial,
}
