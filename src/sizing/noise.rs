//! Rotational and vortex noise of a sized rotor.
//!
//! Empirical helicopter noise estimates, evaluated in imperial units.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::rotor::RotorSizing;
use crate::utils::constants::{M_TO_FT, N_TO_LBF, REFERENCE_INTENSITY};
use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::{linspace, polyfit, polyval};

/// First-harmonic SPL against effective rotational Mach number.
const HARMONIC_SPL: [f64; 9] = [77.0, 82.0, 85.0, 88.0, 91.0, 93.0, 95.0, 96.0, 97.0];
const THICKNESS_RATIO: f64 = 0.12;

/// Observer position relative to the rotor hub, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observer {
    /// Along the flight direction
    pub x: f64,
    /// Lateral, in the disc plane
    pub y: f64,
    /// Flyover height
    pub z: f64,
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 500.0,
        }
    }
}

impl Observer {
    pub fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A sound level for one rotor and for the whole aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseLevel {
    /// Single-rotor SPL (dB)
    pub single_rotor: f64,
    /// SPL of all rotors together (dB)
    pub total: f64,
    /// Characteristic frequency (Hz)
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundAnalysis {
    pub observer: Observer,
    /// Rotational tip Mach number at 0.8 R
    pub rotational_mach: f64,
    pub flight_mach: f64,
    /// Effective rotational Mach number
    pub effective_mach: f64,
    /// Rotational noise before the distance and thrust correction (dB)
    pub rotational_uncorrected: f64,
    pub rotational: NoiseLevel,
    /// Vortex noise at 300 ft (dB)
    pub vortex_uncorrected: f64,
    pub vortex: NoiseLevel,
    /// Rotors contributing to the total
    pub rotor_count: usize,
}

/// Add `count` equal incoherent sources of level `spl`.
pub fn add_equal_sources(spl: f64, count: usize) -> f64 {
    let intensity = REFERENCE_INTENSITY * 10f64.powf(spl / 10.0) * count as f64;
    10.0 * (intensity / REFERENCE_INTENSITY).log10()
}

impl SoundAnalysis {
    /// Estimate rotor noise heard at `observer`.
    pub fn new(rotor: &RotorSizing, observer: Observer) -> Result<Self> {
        let r = ensure_positive("observer distance", observer.distance())?;
        let height = ensure_positive("flyover height", observer.z)?;

        let radius = rotor.radius * M_TO_FT;
        let area = PI * radius * radius;
        let omega = rotor.omega;
        let velocity = rotor.input.v_max * M_TO_FT;
        let sound = rotor.speed_of_sound * M_TO_FT;
        let blades = rotor.input.blades as f64;
        let thrust = rotor.thrust_per_rotor() * N_TO_LBF;
        let chord = rotor.chord * M_TO_FT;
        let blade_area = blades * radius * chord;
        let rotor_count = rotor.input.rotors * rotor.input.coaxial;

        // Rotational noise
        let rotational_mach = 0.8 * omega * radius / sound;
        let flight_mach = velocity / sound;
        let theta = (observer.x / r).acos();
        let doppler = 1.0 - flight_mach * theta.cos();
        if doppler <= 0.0 {
            return Err(DesignError::InvalidParameter(format!(
                "flight Mach {flight_mach:.3} is supersonic towards the observer"
            )));
        }
        let effective_mach = rotational_mach / doppler;

        let fit = polyfit(&linspace(0.2, 1.0, 9), &HARMONIC_SPL, 3)?;
        let rotational_uncorrected = polyval(&fit, effective_mach);
        let rotational_spl =
            rotational_uncorrected + 11.0 + 10.0 * ((thrust / (r * r)) * (thrust / area)).log10();
        let rotational = NoiseLevel {
            single_rotor: rotational_spl,
            total: add_equal_sources(rotational_spl, rotor_count),
            frequency: omega * blades / (2.0 * PI * doppler),
        };

        // Vortex noise
        let v_07 = 0.7 * omega * radius;
        let vortex_uncorrected =
            10.0 * (2.0 * v_07.log10() + 2.0 * thrust.log10() - blade_area.log10() - 3.57);
        // Vortex levels are referenced to a 300 ft flyover height
        let vortex_spl = vortex_uncorrected - 20.0 * (height / 300.0).log10();
        let vortex = NoiseLevel {
            single_rotor: vortex_spl,
            total: add_equal_sources(vortex_spl, rotor_count),
            frequency: 0.28 * v_07 / (THICKNESS_RATIO * chord),
        };

        Ok(Self {
            observer,
            rotational_mach,
            flight_mach,
            effective_mach,
            rotational_uncorrected,
            rotational,
            vortex_uncorrected,
            vortex,
            rotor_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::rotor::{DesignOverrides, RotorSizingInput};
    use approx::assert_relative_eq;

    fn rotor() -> RotorSizing {
        RotorSizing::compute(RotorSizingInput::default()).unwrap()
    }

    #[test]
    fn test_adding_rotors_adds_ten_log_n() {
        let analysis = SoundAnalysis::new(&rotor(), Observer::default()).unwrap();
        assert_eq!(analysis.rotor_count, 4);
        let gain = 10.0 * 4.0_f64.log10();
        assert_relative_eq!(analysis.rotational.total - analysis.rotational.single_rotor, gain, epsilon = 1e-9);
        assert_relative_eq!(analysis.vortex.total - analysis.vortex.single_rotor, gain, epsilon = 1e-9);
    }

    #[test]
    fn test_overhead_observer_has_no_doppler() {
        let sizing = rotor();
        let analysis = SoundAnalysis::new(&sizing, Observer::default()).unwrap();
        assert_relative_eq!(analysis.effective_mach, analysis.rotational_mach, epsilon = 1e-12);
        assert_relative_eq!(
            analysis.rotational.frequency,
            sizing.omega * 4.0 / (2.0 * PI),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_vortex_noise_falls_with_distance() {
        let near = SoundAnalysis::new(&rotor(), Observer { z: 300.0, ..Default::default() }).unwrap();
        let far = SoundAnalysis::new(&rotor(), Observer { z: 600.0, ..Default::default() }).unwrap();
        assert_relative_eq!(near.vortex.single_rotor, near.vortex_uncorrected, epsilon = 1e-9);
        assert_relative_eq!(
            near.vortex.single_rotor - far.vortex.single_rotor,
            20.0 * 2.0_f64.log10(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_vortex_correction_uses_flyover_height() {
        let overhead = SoundAnalysis::new(&rotor(), Observer { z: 300.0, ..Default::default() }).unwrap();
        let offset = Observer { x: 400.0, y: 0.0, z: 300.0 };
        let ahead = SoundAnalysis::new(&rotor(), offset).unwrap();
        assert_relative_eq!(ahead.vortex.single_rotor, ahead.vortex_uncorrected, epsilon = 1e-9);
        assert_relative_eq!(ahead.vortex.single_rotor, overhead.vortex.single_rotor, epsilon = 1e-9);
        // Rotational noise still spreads with the slant distance of 500 ft
        assert!(ahead.rotational.single_rotor < overhead.rotational.single_rotor);
    }

    #[test]
    fn test_observer_ahead_raises_effective_mach() {
        let sizing = rotor();
        let analysis = SoundAnalysis::new(&sizing, Observer { x: 400.0, y: 0.0, z: 300.0 }).unwrap();
        // cos(theta) = 400 / 500
        let doppler = 1.0 - analysis.flight_mach * 0.8;
        assert_relative_eq!(analysis.effective_mach, analysis.rotational_mach / doppler, epsilon = 1e-12);
        assert!(analysis.rotational.frequency > sizing.omega * 4.0 / (2.0 * PI));
    }

    #[test]
    fn test_heavier_rotor_is_louder() {
        let base = rotor();
        let heavy = base
            .iterate_design(DesignOverrides {
                mtow: Some(1200.0),
                ..Default::default()
            })
            .unwrap();
        let a = SoundAnalysis::new(&base, Observer::default()).unwrap();
        let b = SoundAnalysis::new(&heavy, Observer::default()).unwrap();
        assert!(b.vortex.single_rotor > a.vortex.single_rotor);
    }

    #[test]
    fn test_observer_at_hub_rejected() {
        let observer = Observer { x: 0.0, y: 0.0, z: 0.0 };
        assert!(SoundAnalysis::new(&rotor(), observer).is_err());
    }
}
