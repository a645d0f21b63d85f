mod common;

use approx::assert_relative_eq;
use common::{assert_all_finite, assert_within};
use evtol::sizing::noise::add_equal_sources;
use evtol::sizing::sweep::{mtow_vs_radius, rotors_vs_radius};
use evtol::sizing::{DesignOverrides, Observer, RotorSizing, RotorSizingInput, SoundAnalysis};

#[test]
fn test_radius_scales_with_root_mtow() {
    let base = RotorSizing::compute(RotorSizingInput::default()).unwrap();
    let heavier = base
        .iterate_design(DesignOverrides {
            mtow: Some(4.0 * base.input.mtow),
            ..Default::default()
        })
        .unwrap();
    assert_relative_eq!(heavier.radius, 2.0 * base.radius, max_relative = 1e-12);

    let points = mtow_vs_radius(&base).unwrap();
    let radii: Vec<f64> = points.iter().map(|p| p.y).collect();
    assert_all_finite("radius", &radii);
    assert!(radii.windows(2).all(|w| w[1] > w[0]));
    for p in &points {
        assert_relative_eq!(p.y / p.x.sqrt(), base.radius / base.input.mtow.sqrt(), max_relative = 1e-12);
    }
}

#[test]
fn test_more_rotors_means_smaller_rotors() {
    let base = RotorSizing::compute(RotorSizingInput::default()).unwrap();
    let points = rotors_vs_radius(&base).unwrap();
    assert!(points.windows(2).all(|w| w[1].y < w[0].y));
}

#[test]
fn test_noise_grows_with_rotor_count() {
    let four = RotorSizing::compute(RotorSizingInput::default()).unwrap();
    let eight = four
        .iterate_design(DesignOverrides {
            rotors: Some(8),
            ..Default::default()
        })
        .unwrap();

    let observer = Observer::default();
    let a = SoundAnalysis::new(&four, observer).unwrap();
    let b = SoundAnalysis::new(&eight, observer).unwrap();
    for analysis in [&a, &b] {
        let n = analysis.rotor_count as f64;
        assert_within(
            analysis.rotational.total - analysis.rotational.single_rotor,
            10.0 * n.log10(),
            1e-9,
        );
    }
    assert_relative_eq!(add_equal_sources(60.0, 2), 60.0 + 10.0 * 2f64.log10(), epsilon = 1e-9);
}

#[test]
fn test_observer_distance_reduces_vortex_noise() {
    let rotor = RotorSizing::compute(RotorSizingInput::default()).unwrap();
    let near = SoundAnalysis::new(&rotor, Observer { z: 300.0, ..Default::default() }).unwrap();
    let far = SoundAnalysis::new(&rotor, Observer { z: 1000.0, ..Default::default() }).unwrap();
    assert!(far.vortex.single_rotor < near.vortex.single_rotor);
}
