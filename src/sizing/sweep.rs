//! Rotor sizing trade studies.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::rotor::{DesignOverrides, RotorSizing};
use crate::utils::constants::LB_FT2_TO_KG_M2;
use crate::utils::errors::{ensure_positive, Result};
use crate::utils::math::arange;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub x: f64,
    pub y: f64,
}

/// Input varied along a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    Blades,
    Rotors,
    DiscLoading,
    Mtow,
}

/// Sized quantity recorded along a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepOutput {
    Radius,
    AspectRatio,
    Chord,
    Solidity,
}

impl SweepParameter {
    fn overrides(self, value: f64) -> DesignOverrides {
        let mut overrides = DesignOverrides::default();
        match self {
            SweepParameter::Blades => overrides.blades = Some(value.round() as usize),
            SweepParameter::Rotors => overrides.rotors = Some(value.round() as usize),
            SweepParameter::DiscLoading => overrides.disc_loading = Some(value),
            SweepParameter::Mtow => overrides.mtow = Some(value),
        }
        overrides
    }
}

impl SweepOutput {
    fn read(self, sizing: &RotorSizing) -> f64 {
        match self {
            SweepOutput::Radius => sizing.radius,
            SweepOutput::AspectRatio => sizing.aspect_ratio,
            SweepOutput::Chord => sizing.chord,
            SweepOutput::Solidity => sizing.maximum_solidity,
        }
    }
}

/// Resize `base` at every value of `parameter` and record `output`.
pub fn sweep(
    base: &RotorSizing,
    parameter: SweepParameter,
    values: &[f64],
    output: SweepOutput,
) -> Result<Vec<SweepPoint>> {
    values
        .par_iter()
        .map(|&x| {
            let sizing = base.iterate_design(parameter.overrides(x))?;
            Ok(SweepPoint {
                x,
                y: output.read(&sizing),
            })
        })
        .collect()
}

pub fn blades_vs_aspect_ratio(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    sweep(base, SweepParameter::Blades, &blade_counts(), SweepOutput::AspectRatio)
}

pub fn blades_vs_radius(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    sweep(base, SweepParameter::Blades, &blade_counts(), SweepOutput::Radius)
}

pub fn rotors_vs_radius(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    let rotors = [4.0, 6.0, 8.0, 10.0, 12.0];
    sweep(base, SweepParameter::Rotors, &rotors, SweepOutput::Radius)
}

pub fn disc_loading_vs_radius(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    sweep(
        base,
        SweepParameter::DiscLoading,
        &arange(1.0, 50.0, 1.0),
        SweepOutput::Radius,
    )
}

pub fn disc_loading_vs_aspect_ratio(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    sweep(
        base,
        SweepParameter::DiscLoading,
        &arange(1.0, 50.0, 1.0),
        SweepOutput::AspectRatio,
    )
}

pub fn mtow_vs_radius(base: &RotorSizing) -> Result<Vec<SweepPoint>> {
    sweep(
        base,
        SweepParameter::Mtow,
        &arange(500.0, 1500.0, 50.0),
        SweepOutput::Radius,
    )
}

fn blade_counts() -> Vec<f64> {
    (2..=8).map(f64::from).collect()
}

/// Chord and aspect ratio of one blade-count option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BladeOption {
    pub blades: usize,
    pub chord: f64,
    pub aspect_ratio: f64,
}

/// Chord and aspect ratio for each blade count at fixed solidity.
pub fn blade_table(
    solidity: f64,
    radius: f64,
    blades: impl IntoIterator<Item = usize>,
) -> Result<Vec<BladeOption>> {
    ensure_positive("solidity", solidity)?;
    ensure_positive("rotor radius", radius)?;
    Ok(blades
        .into_iter()
        .filter(|&b| b > 0)
        .map(|b| {
            let chord = solidity * PI * radius / b as f64;
            BladeOption {
                blades: b,
                chord,
                aspect_ratio: radius / chord,
            }
        })
        .collect())
}

/// Convert a disc loading in lb/ft^2 to kg/m^2.
pub fn disc_loading_si(lb_per_ft2: f64) -> f64 {
    lb_per_ft2 * LB_FT2_TO_KG_M2
}
