use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Assembly has no mass: {0}")]
    MasslessAssembly(String),

    #[error("Inertia tensor is singular: {0}")]
    SingularInertia(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
