use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::assembly::AircraftAssembly;
use super::error::PhysicsError;
use super::forces::ReferenceFrame;
use crate::utils::constants::GRAVITY;

/// Kinematic state of the airframe.
///
/// Position and velocity are inertial; angular velocity is in the body frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub attitude: UnitQuaternion<f64>,
    pub angular_velocity: Vector3<f64>,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl RigidBodyState {
    /// Start from the position and orientation an assembly was built with.
    pub fn from_assembly(assembly: &AircraftAssembly) -> Self {
        Self {
            position: assembly.position,
            attitude: assembly.rotation.to_quaternion(),
            ..Default::default()
        }
    }
}

struct StateDerivatives {
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    angular_acceleration: Vector3<f64>,
}

/// Loads and mass properties held fixed across one step.
struct FrozenLoads {
    mass: f64,
    force_body: Vector3<f64>,
    moment_body: Vector3<f64>,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
}

/// Fixed-step RK4 integrator for an [`AircraftAssembly`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyIntegrator {
    /// Time step (s)
    pub dt: f64,
    /// Gravitational acceleration in the inertial frame (m/s^2)
    pub gravity: Vector3<f64>,
}

impl Default for RigidBodyIntegrator {
    fn default() -> Self {
        Self {
            dt: 0.01,
            gravity: Vector3::new(0.0, 0.0, -GRAVITY),
        }
    }
}

impl RigidBodyIntegrator {
    pub fn new(dt: f64, gravity: Vector3<f64>) -> Result<Self, PhysicsError> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "time step must be positive, got {dt}"
            )));
        }
        Ok(Self { dt, gravity })
    }

    fn derivatives(
        &self,
        loads: &FrozenLoads,
        velocity: &Vector3<f64>,
        attitude: &UnitQuaternion<f64>,
        angular_velocity: &Vector3<f64>,
    ) -> StateDerivatives {
        let acceleration = attitude * (loads.force_body / loads.mass) + self.gravity;

        let omega = *angular_velocity;
        let gyro_term = omega.cross(&(loads.inertia * omega));
        let angular_acceleration = loads.inertia_inv * (loads.moment_body - gyro_term);

        StateDerivatives {
            velocity: *velocity,
            acceleration,
            angular_acceleration,
        }
    }

    /// Advance `state` by one time step under the assembly's current loads.
    pub fn step(
        &self,
        assembly: &AircraftAssembly,
        state: &RigidBodyState,
    ) -> Result<RigidBodyState, PhysicsError> {
        let loads = FrozenLoads {
            mass: assembly.mass(),
            force_body: assembly.net_force_in(ReferenceFrame::Local, &state.attitude),
            moment_body: assembly.net_moment_in(ReferenceFrame::Local, &state.attitude),
            inertia: assembly.inertia(),
            inertia_inv: assembly.inverse_inertia()?,
        };
        Ok(self.integrate(&loads, state))
    }

    fn integrate(&self, loads: &FrozenLoads, state: &RigidBodyState) -> RigidBodyState {
        let dt = self.dt;
        // Body rates compose on the right of the body-to-inertial attitude
        let rotate = |omega: Vector3<f64>, h: f64| {
            if omega.norm() > 0.0 {
                state.attitude * UnitQuaternion::from_scaled_axis(omega * h)
            } else {
                state.attitude
            }
        };

        let k1 = self.derivatives(loads, &state.velocity, &state.attitude, &state.angular_velocity);

        let k2_velocity = state.velocity + k1.acceleration * (dt / 2.0);
        let k2_angular_vel = state.angular_velocity + k1.angular_acceleration * (dt / 2.0);
        let k2 = self.derivatives(
            loads,
            &k2_velocity,
            &rotate(k2_angular_vel, dt / 2.0),
            &k2_angular_vel,
        );

        let k3_velocity = state.velocity + k2.acceleration * (dt / 2.0);
        let k3_angular_vel = state.angular_velocity + k2.angular_acceleration * (dt / 2.0);
        let k3 = self.derivatives(
            loads,
            &k3_velocity,
            &rotate(k3_angular_vel, dt / 2.0),
            &k3_angular_vel,
        );

        let k4_velocity = state.velocity + k3.acceleration * dt;
        let k4_angular_vel = state.angular_velocity + k3.angular_acceleration * dt;
        let k4 = self.derivatives(loads, &k4_velocity, &rotate(k4_angular_vel, dt), &k4_angular_vel);

        let position = state.position
            + (dt / 6.0) * (k1.velocity + 2.0 * k2.velocity + 2.0 * k3.velocity + k4.velocity);
        let velocity = state.velocity
            + (dt / 6.0)
                * (k1.acceleration + 2.0 * k2.acceleration + 2.0 * k3.acceleration + k4.acceleration);
        let angular_velocity = state.angular_velocity
            + (dt / 6.0)
                * (k1.angular_acceleration
                    + 2.0 * k2.angular_acceleration
                    + 2.0 * k3.angular_acceleration
                    + k4.angular_acceleration);

        let omega_avg = (1.0 / 6.0)
            * (state.angular_velocity + 2.0 * k2_angular_vel + 2.0 * k3_angular_vel + k4_angular_vel);
        let attitude = UnitQuaternion::new_normalize(rotate(omega_avg, dt).into_inner());

        RigidBodyState {
            position,
            velocity,
            attitude,
            angular_velocity,
        }
    }

    /// Integrate `steps` steps with the loads held constant in the body frame.
    ///
    /// The returned trajectory starts with `initial`.
    pub fn simulate(
        &self,
        assembly: &AircraftAssembly,
        initial: RigidBodyState,
        steps: usize,
    ) -> Result<Vec<RigidBodyState>, PhysicsError> {
        let mut trajectory = Vec::with_capacity(steps + 1);
        trajectory.push(initial);
        let mut state = initial;
        for _ in 0..steps {
            state = self.step(assembly, &state)?;
            trajectory.push(state);
        }
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::force_point::ForcePoint;
    use crate::physics::forces::ForceCategory;
    use crate::physics::rotation::EulerRotation;
    use approx::assert_relative_eq;

    fn quad(thrust_per_rotor: f64) -> AircraftAssembly {
        let points = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
            .iter()
            .map(|(x, y)| {
                ForcePoint::new("rotor", ForceCategory::Propulsive, Vector3::new(*x, *y, 0.0))
                    .with_mass(2.5, Matrix3::from_diagonal_element(0.1))
                    .with_constant_load(Vector3::new(0.0, 0.0, thrust_per_rotor), Vector3::zeros())
            })
            .collect();
        AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity()).unwrap()
    }

    #[test]
    fn test_free_fall() {
        let assembly = quad(0.0);
        let integrator = RigidBodyIntegrator::default();
        let trajectory = integrator
            .simulate(&assembly, RigidBodyState::default(), 100)
            .unwrap();
        let last = trajectory.last().unwrap();
        assert_eq!(trajectory.len(), 101);
        assert_relative_eq!(last.position.z, -0.5 * GRAVITY, epsilon = 1e-9);
        assert_relative_eq!(last.velocity.z, -GRAVITY, epsilon = 1e-9);
    }

    #[test]
    fn test_hover_holds_position() {
        let assembly = quad(10.0 * GRAVITY / 4.0);
        let integrator = RigidBodyIntegrator::default();
        let state = integrator
            .simulate(&assembly, RigidBodyState::default(), 50)
            .unwrap()
            .pop()
            .unwrap();
        assert_relative_eq!(state.position, Vector3::zeros(), epsilon = 1e-10);
    }

    #[test]
    fn test_torque_free_spin_keeps_rate() {
        // Axisymmetric body: Ixx = Iyy != Izz
        let assembly = quad(0.0);
        let inertia = assembly.inertia();
        assert_relative_eq!(inertia[(0, 0)], inertia[(1, 1)], epsilon = 1e-12);

        let integrator = RigidBodyIntegrator::new(0.001, Vector3::zeros()).unwrap();
        let initial = RigidBodyState {
            angular_velocity: Vector3::new(0.3, -0.2, 1.5),
            ..Default::default()
        };
        let trajectory = integrator.simulate(&assembly, initial, 2000).unwrap();
        let rate = initial.angular_velocity.norm();
        for state in &trajectory {
            assert_relative_eq!(state.angular_velocity.norm(), rate, max_relative = 1e-8);
        }
        // The spin axis component is fixed for an axisymmetric body
        let last = trajectory.last().unwrap();
        assert_relative_eq!(last.angular_velocity.z, 1.5, epsilon = 1e-10);
    }

    #[test]
    fn test_pitch_rate_uses_body_axes() {
        // Rolled 90 degrees, a body pitch rate turns about inertial z
        let rolled = UnitQuaternion::from_euler_angles(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let initial = RigidBodyState {
            attitude: rolled,
            angular_velocity: Vector3::new(0.0, 0.5, 0.0),
            ..Default::default()
        };
        let integrator = RigidBodyIntegrator::new(0.01, Vector3::zeros()).unwrap();
        let last = integrator
            .simulate(&quad(0.0), initial, 100)
            .unwrap()
            .pop()
            .unwrap();
        let expected = rolled * UnitQuaternion::from_euler_angles(0.0, 0.5, 0.0);
        assert!(last.attitude.angle_to(&expected) < 1e-9);
        assert_relative_eq!(last.attitude * Vector3::x(), Vector3::new(0.5_f64.cos(), 0.5_f64.sin(), 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_step() {
        assert!(RigidBodyIntegrator::new(0.0, Vector3::zeros()).is_err());
    }
}
