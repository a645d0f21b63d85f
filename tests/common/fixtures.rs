use evtol::physics::{AircraftAssembly, EulerRotation, ForceCategory, ForcePoint};
use nalgebra::{Matrix3, Vector3};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lift slope of the linear test polar, per degree
pub const POLAR_SLOPE_PER_DEG: f64 = 0.1;
pub const POLAR_CD: f64 = 0.008;

/// Write an XFoil-style polar with a 9-line header and a linear lift curve
/// over the full circle, one row per degree.
pub fn write_linear_polar(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create polar file");
    writeln!(file, "XFOIL polar export").unwrap();
    writeln!(file, "Calculated polar for: TEST").unwrap();
    for _ in 0..5 {
        writeln!(file).unwrap();
    }
    writeln!(file, "Re = 1.000e6 Ncrit = 9.000").unwrap();
    writeln!(file, "alpha,CL,CD,CDp,CM,Top_Xtr,Bot_Xtr").unwrap();
    for alpha in -180..=180 {
        let alpha = alpha as f64;
        writeln!(
            file,
            "{alpha:.3},{:.6},{POLAR_CD:.5},0.00400,0.0000,1.0000,1.0000",
            POLAR_SLOPE_PER_DEG * alpha
        )
        .unwrap();
    }
    // Garbage rows are ignored or skipped
    writeln!(file, "not,a,number,row,at,all,here").unwrap();
    writeln!(file, "short,row").unwrap();
    path
}

/// Four rotors on a square, each carrying `mass` kg and `thrust` N upwards.
pub fn quad_points(arm: f64, mass: f64, thrust: f64) -> Vec<ForcePoint> {
    [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            ForcePoint::new(
                format!("rotor {}", i + 1),
                ForceCategory::Propulsive,
                Vector3::new(x * arm, y * arm, 0.0),
            )
            .with_mass(mass, Matrix3::from_diagonal_element(0.05))
            .with_constant_load(Vector3::new(0.0, 0.0, thrust), Vector3::zeros())
        })
        .collect()
}

pub fn quad_assembly(arm: f64, mass: f64, thrust: f64) -> AircraftAssembly {
    AircraftAssembly::new(
        quad_points(arm, mass, thrust),
        Vector3::zeros(),
        EulerRotation::identity(),
    )
    .expect("quad assembly has mass")
}

pub const DESIGN_YAML: &str = r#"
name: test quad
rotor:
  mtow: 718.89
  rotors: 4
  blades: 4
noise:
  x: 0.0
  y: 0.0
  z: 500.0
fuel_cell:
  optimizer:
    net_power: 100000.0
    pressure_min: 1.0
    pressure_max: 2.5
    pressure_steps: 4
hover:
  mtow: 709.0
beam:
  length: 3.0
  thrust: 1800.0
  stations: 11
  section:
    type: tube
    outer_radius: 0.06
    wall_thickness: 0.004
propeller:
  target:
    thrust: 500.0
"#;
