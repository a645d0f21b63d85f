mod common;

use approx::assert_relative_eq;
use common::{assert_rigid_state_valid, quad_assembly, quad_points};
use evtol::physics::{
    AircraftAssembly, EulerRotation, ForceCategory, ForcePoint, PointInputs, ReferenceFrame,
    RigidBodyIntegrator, RigidBodyState, ValueSource,
};
use evtol::utils::constants::GRAVITY;
use nalgebra::{UnitQuaternion, Vector3};

#[test]
fn test_symmetric_quad_hovers_level() {
    let mass = 180.0;
    let assembly = quad_assembly(2.0, mass, mass * GRAVITY);
    assert_relative_eq!(assembly.cog(), Vector3::zeros(), epsilon = 1e-12);

    let integrator = RigidBodyIntegrator::default();
    let trajectory = integrator
        .simulate(&assembly, RigidBodyState::from_assembly(&assembly), 200)
        .unwrap();
    for state in &trajectory {
        assert_rigid_state_valid(state);
    }
    let last = trajectory.last().unwrap();
    assert_relative_eq!(last.position, Vector3::zeros(), epsilon = 1e-9);
    assert_relative_eq!(last.angular_velocity, Vector3::zeros(), epsilon = 1e-12);
}

#[test]
fn test_differential_thrust_rolls_the_aircraft() {
    let mut points = quad_points(1.0, 5.0, 0.0);
    // Rotors 2 and 3 sit at negative x; give them a thrust controlled by input
    for point in points.iter_mut().skip(1).take(2) {
        *point = point.clone().with_sources(
            [
                ValueSource::zero(),
                ValueSource::zero(),
                ValueSource::Scaled { gain: 1.0 },
            ],
            Default::default(),
        );
    }
    let mut assembly =
        AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity()).unwrap();
    let push = PointInputs {
        force: [0.0, 0.0, 20.0],
        moment: [0.0; 3],
    };
    assembly
        .update(&[PointInputs::default(), push, push, PointInputs::default()])
        .unwrap();

    assert_relative_eq!(
        assembly.force_by_category(&ForceCategory::Propulsive),
        Vector3::new(0.0, 0.0, 40.0),
        epsilon = 1e-12
    );
    // Lift at x = -1 pitches about +y
    let moment = assembly.net_moment();
    assert_relative_eq!(moment.y, 40.0, epsilon = 1e-10);
    assert_relative_eq!(moment.x, 0.0, epsilon = 1e-10);

    let integrator = RigidBodyIntegrator::new(0.01, Vector3::zeros()).unwrap();
    let state = integrator
        .step(&assembly, &RigidBodyState::default())
        .unwrap();
    assert!(state.angular_velocity.y > 0.0);
}

#[test]
fn test_inertial_force_follows_attitude() {
    let assembly = quad_assembly(1.0, 1.0, 10.0);
    let pitched = UnitQuaternion::from_euler_angles(0.0, std::f64::consts::FRAC_PI_2, 0.0);
    let force = assembly.net_force_in(ReferenceFrame::Inertial, &pitched);
    // Body z thrust points along inertial +x after a quarter pitch
    assert_relative_eq!(force, Vector3::new(40.0, 0.0, 0.0), epsilon = 1e-10);
}

#[test]
fn test_payload_shifts_cog() {
    let mut points = quad_points(1.0, 10.0, 0.0);
    points.push(ForcePoint::point_mass(
        "payload",
        40.0,
        Vector3::new(0.5, 0.0, -0.2),
    ));
    let assembly =
        AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity()).unwrap();
    assert_relative_eq!(assembly.mass(), 80.0);
    assert_relative_eq!(assembly.cog(), Vector3::new(0.25, 0.0, -0.1), epsilon = 1e-12);
    // Inertia about the cog stays symmetric
    let inertia = assembly.inertia();
    assert_relative_eq!(inertia, inertia.transpose(), epsilon = 1e-12);
}

#[test]
fn test_body_roll_turns_about_body_axis() {
    let assembly = quad_assembly(1.0, 1.0, 0.0);
    let yawed = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
    let initial = RigidBodyState {
        attitude: yawed,
        angular_velocity: Vector3::new(1.0, 0.0, 0.0),
        ..Default::default()
    };
    let integrator = RigidBodyIntegrator::new(0.01, Vector3::zeros()).unwrap();
    let last = integrator
        .simulate(&assembly, initial, 100)
        .unwrap()
        .pop()
        .unwrap();
    assert_rigid_state_valid(&last);

    // Rolling about body x leaves body x on inertial +y after the yaw
    let body_x = last.attitude * Vector3::x();
    assert_relative_eq!(body_x, Vector3::y(), epsilon = 1e-9);
    let expected = yawed * UnitQuaternion::from_euler_angles(1.0, 0.0, 0.0);
    assert!(last.attitude.angle_to(&expected) < 1e-9);
}
