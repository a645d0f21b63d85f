mod common;

use common::{assert_all_finite, write_linear_polar, DESIGN_YAML};
use evtol::config::{ConfigError, DesignConfig};
use evtol::report::DesignReport;
use evtol::DesignError;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_full_design_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.yaml");
    std::fs::write(&path, DESIGN_YAML).unwrap();

    let config = DesignConfig::from_file(&path).unwrap();
    assert_eq!(config.name, "test quad");

    let report = DesignReport::evaluate(&config).unwrap();
    let rotor = report.rotor.as_ref().unwrap();
    assert!(rotor.radius > 1.0 && rotor.radius < 3.0);

    let sweep = report.fuel_cell.as_ref().unwrap();
    assert_eq!(sweep.designs.len(), 4);
    assert!((sweep.best.net_power - 100_000.0).abs() < 10.0);

    let beam = report.beam.as_ref().unwrap();
    assert_eq!(beam.stations.len(), 11);
    assert!(beam.peak_root_stress.unwrap() > 0.0);
    let moments: Vec<f64> = beam.stations.iter().map(|s| s.moment).collect();
    assert_all_finite("beam moment", &moments);

    let propeller = report.propeller.as_ref().unwrap();
    assert!((propeller.thrust - 500.0).abs() < 1.0);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    for key in ["rotor", "noise", "fuel_cell", "hover", "beam", "propeller"] {
        assert!(!json[key].is_null(), "{key} missing from JSON report");
    }
}

#[test]
fn test_hover_uses_polar_next_to_design_file() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_polar(dir.path(), "linear.csv");
    let path = dir.path().join("design.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "hover: {{}}").unwrap();
    writeln!(file, "airfoil_polar: linear.csv").unwrap();

    let config = DesignConfig::from_file(&path).unwrap();
    let report = DesignReport::evaluate(&config).unwrap();
    assert!(report.hover.unwrap().thrust > 0.0);
}

#[test]
fn test_missing_polar_is_an_io_error() {
    let config = DesignConfig::from_yaml_str("hover: {}\nairfoil_polar: /no/such/polar.csv\n")
        .unwrap();
    let err = DesignReport::evaluate(&config).unwrap_err();
    assert!(matches!(err, DesignError::Io(_)));
}

#[test]
fn test_validation_error_converts() {
    let err: DesignError = DesignConfig::from_yaml_str("propeller:\n  blades: 0\n")
        .map(|_| ())
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        DesignError::Config(ConfigError::ValidationError(_))
    ));
}
