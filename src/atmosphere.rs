//! Thermodynamic properties of dry air.

use serde::{Deserialize, Serialize};

use crate::utils::constants::AIR_GAS_CONSTANT;
use crate::utils::errors::{DesignError, Result};
use crate::utils::math::interp1d;

const TABLE_TEMPERATURE_K: [f64; 12] = [
    175.0, 200.0, 225.0, 250.0, 275.0, 300.0, 325.0, 350.0, 375.0, 400.0, 450.0, 500.0,
];

/// Specific heat at constant pressure, kJ/kg/K.
const TABLE_CP_KJ: [f64; 12] = [
    1.0023, 1.0025, 1.0027, 1.0031, 1.0038, 1.0049, 1.0063, 1.0082, 1.0106, 1.0135, 1.0206,
    1.0295,
];

const TABLE_GAMMA: [f64; 12] = [
    1.401, 1.401, 1.401, 1.401, 1.401, 1.400, 1.400, 1.398, 1.397, 1.395, 1.391, 1.387,
];

/// Cp and ratio of specific heats of air at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    /// Temperature in K
    pub temperature: f64,
    /// Specific heat at constant pressure in J/kg/K
    pub cp: f64,
    /// Ratio of specific heats
    pub gamma: f64,
}

impl AirProperties {
    /// Interpolate the property table at `temperature_k`.
    ///
    /// Temperatures outside 175-500 K take the nearest table end.
    pub fn at(temperature_k: f64) -> Result<Self> {
        if !(temperature_k.is_finite() && temperature_k > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "air temperature must be a positive number of kelvin, got {temperature_k}"
            )));
        }

        Ok(Self {
            temperature: temperature_k,
            cp: interp1d(temperature_k, &TABLE_TEMPERATURE_K, &TABLE_CP_KJ)? * 1000.0,
            gamma: interp1d(temperature_k, &TABLE_TEMPERATURE_K, &TABLE_GAMMA)?,
        })
    }

    /// Exponent (γ - 1) / γ used by isentropic pressure ratios.
    pub fn isentropic_exponent(&self) -> f64 {
        (self.gamma - 1.0) / self.gamma
    }

    /// Speed of sound at this temperature.
    pub fn speed_of_sound(&self) -> f64 {
        (self.gamma * AIR_GAS_CONSTANT * self.temperature).sqrt()
    }
}

/// Speed of sound in air, √(γ R T).
pub fn speed_of_sound(temperature_k: f64) -> Result<f64> {
    Ok(AirProperties::at(temperature_k)?.speed_of_sound())
}

/// Ideal-gas density of air.
pub fn density(pressure_pa: f64, temperature_k: f64) -> Result<f64> {
    if pressure_pa <= 0.0 || temperature_k <= 0.0 {
        return Err(DesignError::InvalidParameter(format!(
            "density needs positive pressure and temperature, got {pressure_pa} Pa and {temperature_k} K"
        )));
    }
    Ok(pressure_pa / (AIR_GAS_CONSTANT * temperature_k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_points_are_exact() {
        let air = AirProperties::at(300.0).unwrap();
        assert_relative_eq!(air.cp, 1004.9, epsilon = 1e-9);
        assert_relative_eq!(air.gamma, 1.400, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolates_between_rows() {
        let air = AirProperties::at(393.15).unwrap();
        // 375 K -> 1.0106, 400 K -> 1.0135
        let expected_cp = (1.0106 + (1.0135 - 1.0106) * (18.15 / 25.0)) * 1000.0;
        assert_relative_eq!(air.cp, expected_cp, epsilon = 1e-9);
        assert!(air.gamma < 1.397 && air.gamma > 1.395);
    }

    #[test]
    fn test_speed_of_sound_at_sea_level() {
        let a = speed_of_sound(288.15).unwrap();
        assert!((a - 340.3).abs() < 0.5, "a = {a}");
        assert!(speed_of_sound(-1.0).is_err());
    }

    #[test]
    fn test_isa_density() {
        let rho = density(101_325.0, 288.15).unwrap();
        assert_relative_eq!(rho, 1.225, epsilon = 1e-3);
    }
}
