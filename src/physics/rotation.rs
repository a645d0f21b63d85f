use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::math::deg_to_rad;

/// Orientation of a child frame in its parent, as Euler angles in degrees.
///
/// The rotation is applied in ZYX order, so the matrix is `Rz(yaw) Ry(pitch) Rx(roll)`
/// and maps child-frame vectors into the parent frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EulerRotation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl EulerRotation {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        let (sr, cr) = deg_to_rad(self.roll).sin_cos();
        let (sp, cp) = deg_to_rad(self.pitch).sin_cos();
        let (sy, cy) = deg_to_rad(self.yaw).sin_cos();

        let rz = Matrix3::new(cy, -sy, 0.0, sy, cy, 0.0, 0.0, 0.0, 1.0);
        let ry = Matrix3::new(cp, 0.0, sp, 0.0, 1.0, 0.0, -sp, 0.0, cp);
        let rx = Matrix3::new(1.0, 0.0, 0.0, 0.0, cr, -sr, 0.0, sr, cr);
        rz * ry * rx
    }

    /// Parent-to-child rotation. The matrix is orthonormal, so this is its transpose.
    pub fn inverse_matrix(&self) -> Matrix3<f64> {
        self.matrix().transpose()
    }

    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.matrix() * v
    }

    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            deg_to_rad(self.roll),
            deg_to_rad(self.pitch),
            deg_to_rad(self.yaw),
        )
    }
}
