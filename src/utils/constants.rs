pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const AIR_GAS_CONSTANT: f64 = 287.05287; // J/(kg·K)
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const ISA_SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3
pub const ISA_SEA_LEVEL_VISCOSITY: f64 = 1.789e-5; // Pa·s
pub const CELSIUS_TO_KELVIN: f64 = 273.15; // K offset

pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.3144621; // J/(mol·K)
pub const FARADAY_CONSTANT: f64 = 96485.0; // C/mol
pub const STEFAN_BOLTZMANN: f64 = 5.670367e-8; // W/(m^2·K^4)

// Unit conversions (multiply)
pub const FT_TO_M: f64 = 0.3048;
pub const M_TO_FT: f64 = 1.0 / FT_TO_M;
pub const INCH_TO_M: f64 = 0.0254;
pub const KG_TO_LB: f64 = 2.20462;
pub const N_TO_LBF: f64 = KG_TO_LB / GRAVITY;
pub const ATM_TO_PA: f64 = ISA_SEA_LEVEL_PRESSURE;
pub const RPM_TO_RAD_S: f64 = std::f64::consts::PI / 30.0;
pub const CM2_TO_M2: f64 = 1.0e-4;
pub const LB_FT2_TO_KG_M2: f64 = 4.88243;

// Acoustics
pub const REFERENCE_INTENSITY: f64 = 1.0e-12; // W/m^2
