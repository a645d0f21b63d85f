use evtol::physics::RigidBodyState;

/// Assert that every sample of a series is finite
#[track_caller]
pub fn assert_all_finite(name: &str, values: &[f64]) {
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        panic!("{name}[{i}] is not finite: {v}");
    }
}

/// Assert that `actual` lies within `tolerance` of `expected`
#[track_caller]
pub fn assert_within(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

/// Assert that a rigid-body state is finite with a unit attitude
#[track_caller]
pub fn assert_rigid_state_valid(state: &RigidBodyState) {
    assert!(
        state.position.iter().all(|x| x.is_finite()),
        "Position is not finite"
    );
    assert!(
        state.velocity.iter().all(|x| x.is_finite()),
        "Velocity is not finite"
    );
    assert!(
        state.angular_velocity.iter().all(|x| x.is_finite()),
        "Angular velocity is not finite"
    );
    assert!(
        (state.attitude.into_inner().norm() - 1.0).abs() < 1e-10,
        "Attitude quaternion is not normalized"
    );
}
