use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::section::CrossSection;

/// Axial stress sampled at one point of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressSample {
    pub x: f64,
    pub y: f64,
    /// Axial stress in Pa, tension positive
    pub sigma: f64,
}

/// Biaxial bending of a section by moments about its centroidal axes.
#[derive(Debug, Clone, Copy)]
pub struct BendingStress<S: CrossSection> {
    pub section: S,
    /// Moment about the x axis (N m)
    pub mx: f64,
    /// Moment about the y axis (N m)
    pub my: f64,
}

impl<S: CrossSection> BendingStress<S> {
    pub fn new(section: S, mx: f64, my: f64) -> Self {
        Self { section, mx, my }
    }

    /// σ = Mx y / Ixx - My x / Iyy at centroidal coordinates.
    pub fn at(&self, point: Point2<f64>) -> f64 {
        self.mx * point.y / self.section.ixx() - self.my * point.x / self.section.iyy()
    }

    /// Slope dy/dx of the zero-stress line through the centroid.
    pub fn neutral_axis_slope(&self) -> f64 {
        if self.mx == 0.0 || self.my == 0.0 {
            return 0.0;
        }
        (self.my * self.section.ixx()) / (self.mx * self.section.iyy())
    }

    fn sample(&self, points: Vec<Point2<f64>>) -> Vec<StressSample> {
        points
            .into_iter()
            .map(|p| StressSample {
                x: p.x,
                y: p.y,
                sigma: self.at(p),
            })
            .collect()
    }

    pub fn edge_distribution(&self, n: usize) -> Vec<StressSample> {
        self.sample(self.section.edge_points(n))
    }

    pub fn area_distribution(&self, resolution: usize) -> Vec<StressSample> {
        self.sample(self.section.interior_points(resolution))
    }

    /// Edge sample with the largest absolute stress.
    pub fn peak(&self) -> Option<StressSample> {
        self.edge_distribution(64)
            .into_iter()
            .max_by(|a, b| a.sigma.abs().total_cmp(&b.sigma.abs()))
    }
}
