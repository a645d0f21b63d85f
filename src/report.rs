//! Runs every section of a design file and collects the results.

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::aero::{
    AirfoilPolar, HoverPerformance, LinearAirfoil, PropellerDesign, SectionAerodynamics,
};
use crate::config::{BeamConfig, DesignConfig, Section};
use crate::fuel_cell::{optimise, PressureSweep};
use crate::sizing::{RotorSizing, SoundAnalysis};
use crate::structures::{BeamStation, BendingStress, CantileverBeam, CrossSection};
use crate::utils::errors::Result;

#[derive(Debug, Clone, Serialize)]
pub struct BeamReport {
    pub beam: CantileverBeam,
    pub stations: Vec<BeamStation>,
    pub tip_deflection: f64,
    pub root_moment: f64,
    /// Peak bending stress at the root, when a section is given (Pa)
    pub peak_root_stress: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub name: String,
    pub rotor: Option<RotorSizing>,
    pub noise: Option<SoundAnalysis>,
    pub fuel_cell: Option<PressureSweep>,
    pub hover: Option<HoverPerformance>,
    pub beam: Option<BeamReport>,
    pub propeller: Option<PropellerDesign>,
}

fn peak_stress<S: CrossSection>(section: S, moment: f64) -> Option<f64> {
    BendingStress::new(section, moment, 0.0)
        .peak()
        .map(|s| s.sigma.abs())
}

fn evaluate_beam(config: &BeamConfig) -> Result<BeamReport> {
    let mut beam = config.beam;
    let section = config.section.map(|s| s.build()).transpose()?;
    if let Some(section) = &section {
        let (area, ixx) = match section {
            Section::H(s) => (s.area(), s.ixx()),
            Section::Tube(s) => (s.area(), s.ixx()),
            Section::Box(s) => (s.area(), s.ixx()),
        };
        beam.area = area;
        beam.second_moment = ixx;
    }

    let stations = beam.sample(config.stations)?;
    let root_moment = beam.reaction_moment();
    let peak_root_stress = section.and_then(|section| match section {
        Section::H(s) => peak_stress(s, root_moment),
        Section::Tube(s) => peak_stress(s, root_moment),
        Section::Box(s) => peak_stress(s, root_moment),
    });

    Ok(BeamReport {
        beam,
        tip_deflection: beam.deflection(beam.length)?,
        root_moment,
        peak_root_stress,
        stations,
    })
}

impl DesignReport {
    pub fn evaluate(config: &DesignConfig) -> Result<Self> {
        config.validate()?;
        info!("Evaluating design '{}'", config.name);

        let rotor = config
            .rotor
            .clone()
            .map(RotorSizing::compute)
            .transpose()?;

        let noise = match (&rotor, config.noise) {
            (Some(rotor), Some(observer)) => Some(SoundAnalysis::new(rotor, observer)?),
            _ => None,
        };

        let fuel_cell = config
            .fuel_cell
            .as_ref()
            .map(|fc| optimise(&fc.system, &fc.optimizer))
            .transpose()?;

        let hover = match &config.hover {
            Some(input) => {
                let section: Box<dyn SectionAerodynamics> = match &config.airfoil_polar {
                    Some(path) => Box::new(AirfoilPolar::from_csv(path)?),
                    None => Box::new(LinearAirfoil::naca0012()),
                };
                Some(input.power_hover(section.as_ref())?)
            }
            None => None,
        };

        let beam = config.beam.as_ref().map(evaluate_beam).transpose()?;

        let propeller = config
            .propeller
            .as_ref()
            .map(|p| p.design())
            .transpose()?;

        Ok(Self {
            name: config.name.clone(),
            rotor,
            noise,
            fuel_cell,
            hover,
            beam,
            propeller,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DesignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Design: {}", self.name)?;

        if let Some(rotor) = &self.rotor {
            writeln!(f, "\nRotor sizing")?;
            writeln!(f, "  radius            {:>10.3} m", rotor.radius)?;
            writeln!(f, "  rotational speed  {:>10.1} rpm", rotor.rpm)?;
            writeln!(f, "  solidity          {:>10.4}", rotor.maximum_solidity)?;
            writeln!(f, "  chord             {:>10.3} m", rotor.chord)?;
            writeln!(f, "  aspect ratio      {:>10.2}", rotor.aspect_ratio)?;
            writeln!(f, "  V_NE              {:>10.1} m/s", rotor.never_exceed_velocity)?;
        }

        if let Some(noise) = &self.noise {
            writeln!(f, "\nNoise ({} rotors)", noise.rotor_count)?;
            writeln!(
                f,
                "  rotational        {:>10.1} dB at {:.1} Hz",
                noise.rotational.total, noise.rotational.frequency
            )?;
            writeln!(
                f,
                "  vortex            {:>10.1} dB at {:.1} Hz",
                noise.vortex.total, noise.vortex.frequency
            )?;
        }

        if let Some(sweep) = &self.fuel_cell {
            let best = &sweep.best;
            writeln!(f, "\nFuel cell ({:.1} kW net)", sweep.net_power / 1000.0)?;
            writeln!(f, "  stack pressure    {:>10.2} atm", best.stack_pressure_atm)?;
            writeln!(f, "  design power      {:>10.1} kW", best.design_power / 1000.0)?;
            writeln!(f, "  cells             {:>10.0}", best.cell_count)?;
            writeln!(
                f,
                "  operating point   {:>10.3} A/cm^2 at {:.3} V",
                best.operating_point.current_density, best.operating_point.voltage
            )?;
            for (label, mass) in best.weight.components() {
                writeln!(f, "  {:<18}{:>10.1} kg", label, mass)?;
            }
            writeln!(f, "  total             {:>10.1} kg", best.weight.total)?;
        }

        if let Some(hover) = &self.hover {
            writeln!(f, "\nHover")?;
            writeln!(f, "  thrust            {:>10.1} N", hover.thrust)?;
            writeln!(f, "  power             {:>10.1} kW", hover.power / 1000.0)?;
            writeln!(f, "  figure of merit   {:>10.3}", hover.figure_of_merit())?;
            writeln!(f, "  thrust margin     {:>10.1} N", hover.thrust_margin)?;
        }

        if let Some(beam) = &self.beam {
            writeln!(f, "\nRotor arm")?;
            writeln!(f, "  root moment       {:>10.1} N m", beam.root_moment)?;
            writeln!(f, "  tip deflection    {:>10.2} mm", beam.tip_deflection * 1000.0)?;
            if let Some(stress) = beam.peak_root_stress {
                writeln!(f, "  peak root stress  {:>10.2} MPa", stress / 1e6)?;
            }
        }

        if let Some(propeller) = &self.propeller {
            writeln!(f, "\nPropeller")?;
            writeln!(f, "  thrust            {:>10.1} N", propeller.thrust)?;
            writeln!(f, "  power             {:>10.1} kW", propeller.power / 1000.0)?;
            writeln!(f, "  efficiency        {:>10.3}", propeller.efficiency)?;
            writeln!(f, "  advance ratio     {:>10.3}", propeller.advance_ratio)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SectionConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_config_gives_empty_report() {
        let report = DesignReport::evaluate(&DesignConfig::default()).unwrap();
        assert!(report.rotor.is_none());
        assert_eq!(report.to_string().trim(), "Design: evtol");
    }

    #[test]
    fn test_beam_section_sets_properties() {
        let config = BeamConfig {
            section: Some(SectionConfig::Box {
                height: 0.1,
                wall_thickness: 0.005,
            }),
            ..Default::default()
        };
        let report = evaluate_beam(&config).unwrap();
        let section = crate::structures::BoxSection::new(0.1, 0.005).unwrap();
        assert_relative_eq!(report.beam.second_moment, section.ixx());
        let expected = report.root_moment.abs() * 0.05 / section.ixx();
        assert_relative_eq!(report.peak_root_stress.unwrap(), expected, max_relative = 1e-9);
        assert_eq!(report.stations.len(), 21);
    }

    #[test]
    fn test_rotor_and_noise_sections() {
        let config = DesignConfig::from_yaml_str(
            "rotor:\n  rotors: 4\nnoise:\n  z: 500.0\npropeller: {}\n",
        )
        .unwrap();
        let report = DesignReport::evaluate(&config).unwrap();
        assert!(report.rotor.is_some());
        assert_eq!(report.noise.as_ref().unwrap().rotor_count, 4);
        let text = report.to_string();
        assert!(text.contains("Rotor sizing"));
        assert!(text.contains("Propeller"));
        assert!(report.to_json().unwrap().contains("\"never_exceed_velocity\""));
    }
}
