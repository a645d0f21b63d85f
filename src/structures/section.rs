//! Thin-walled beam cross-sections.
//!
//! Coordinates returned by a section are centroidal, with x horizontal and
//! y vertical. All dimensions are in metres.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::utils::errors::{ensure_positive, DesignError, Result};
use crate::utils::math::linspace;

/// Geometric properties of a beam cross-section.
pub trait CrossSection: Send + Sync {
    /// Second moment of area about the centroidal x axis (m^4)
    fn ixx(&self) -> f64;
    /// Second moment of area about the centroidal y axis (m^4)
    fn iyy(&self) -> f64;
    /// Cross-sectional area (m^2)
    fn area(&self) -> f64;
    /// Centroid in the section's construction frame.
    fn centroid(&self) -> Point2<f64>;
    /// Points on the outer boundary, `n` per straight edge or around a circle.
    fn edge_points(&self, n: usize) -> Vec<Point2<f64>>;
    /// Grid of points covering the material.
    fn interior_points(&self, resolution: usize) -> Vec<Point2<f64>>;
    /// Overall (width, height).
    fn extent(&self) -> (f64, f64);
}

/// Axis-aligned rectangle, used as a building block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub width: f64,
    pub thickness: f64,
}

impl Plate {
    pub fn new(width: f64, thickness: f64) -> Result<Self> {
        Ok(Self {
            width: ensure_positive("plate width", width)?,
            thickness: ensure_positive("plate thickness", thickness)?,
        })
    }

    fn area(&self) -> f64 {
        self.width * self.thickness
    }
}

fn rectangle_perimeter(cx: f64, cy: f64, w: f64, h: f64, n: usize) -> Vec<Point2<f64>> {
    let n = n.max(2);
    let (x0, x1, y0, y1) = (cx - w / 2.0, cx + w / 2.0, cy - h / 2.0, cy + h / 2.0);
    let mut points = Vec::with_capacity(4 * n);
    for x in linspace(x0, x1, n) {
        points.push(Point2::new(x, y0));
        points.push(Point2::new(x, y1));
    }
    for y in linspace(y0, y1, n) {
        points.push(Point2::new(x0, y));
        points.push(Point2::new(x1, y));
    }
    points
}

fn rectangle_grid(cx: f64, cy: f64, w: f64, h: f64, resolution: usize) -> Vec<Point2<f64>> {
    let resolution = resolution.max(2);
    let xs = linspace(cx - w / 2.0, cx + w / 2.0, resolution);
    let ys = linspace(cy - h / 2.0, cy + h / 2.0, resolution);
    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| Point2::new(x, y)))
        .collect()
}

/// I-beam built from a top flange, a web and a bottom flange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HSection {
    pub top: Plate,
    /// Web, with `width` as its thickness and `thickness` as its height
    pub web: Plate,
    pub bottom: Plate,
}

impl HSection {
    /// Build from (width, thickness) of each flange and (thickness, height)
    /// of the web.
    pub fn new(top: (f64, f64), web: (f64, f64), bottom: (f64, f64)) -> Result<Self> {
        Ok(Self {
            top: Plate::new(top.0, top.1)?,
            web: Plate::new(web.0, web.1)?,
            bottom: Plate::new(bottom.0, bottom.1)?,
        })
    }

    /// Plate centres in the construction frame, web centred on the origin.
    fn parts(&self) -> [(Plate, f64); 3] {
        let half_web = self.web.thickness / 2.0;
        [
            (self.top, half_web + self.top.thickness / 2.0),
            (self.web, 0.0),
            (self.bottom, -half_web - self.bottom.thickness / 2.0),
        ]
    }
}

impl CrossSection for HSection {
    fn ixx(&self) -> f64 {
        let yc = self.centroid().y;
        self.parts()
            .iter()
            .map(|(p, y)| p.width * p.thickness.powi(3) / 12.0 + p.area() * (y - yc).powi(2))
            .sum()
    }

    fn iyy(&self) -> f64 {
        self.parts()
            .iter()
            .map(|(p, _)| p.thickness * p.width.powi(3) / 12.0)
            .sum()
    }

    fn area(&self) -> f64 {
        self.parts().iter().map(|(p, _)| p.area()).sum()
    }

    fn centroid(&self) -> Point2<f64> {
        let first_moment: f64 = self.parts().iter().map(|(p, y)| p.area() * y).sum();
        Point2::new(0.0, first_moment / self.area())
    }

    fn edge_points(&self, n: usize) -> Vec<Point2<f64>> {
        let yc = self.centroid().y;
        self.parts()
            .iter()
            .flat_map(|(p, y)| rectangle_perimeter(0.0, y - yc, p.width, p.thickness, n))
            .collect()
    }

    fn interior_points(&self, resolution: usize) -> Vec<Point2<f64>> {
        let yc = self.centroid().y;
        self.parts()
            .iter()
            .flat_map(|(p, y)| rectangle_grid(0.0, y - yc, p.width, p.thickness, resolution))
            .collect()
    }

    fn extent(&self) -> (f64, f64) {
        let width = self.top.width.max(self.web.width).max(self.bottom.width);
        let height = self.top.thickness + self.web.thickness + self.bottom.thickness;
        (width, height)
    }
}

/// Circular tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeSection {
    pub outer_radius: f64,
    pub wall_thickness: f64,
}

impl TubeSection {
    pub fn new(outer_radius: f64, wall_thickness: f64) -> Result<Self> {
        ensure_positive("tube radius", outer_radius)?;
        ensure_positive("tube wall thickness", wall_thickness)?;
        if wall_thickness > outer_radius {
            return Err(DesignError::InvalidParameter(format!(
                "tube wall {wall_thickness} m is thicker than its radius {outer_radius} m"
            )));
        }
        Ok(Self {
            outer_radius,
            wall_thickness,
        })
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius - self.wall_thickness
    }
}

impl CrossSection for TubeSection {
    fn ixx(&self) -> f64 {
        PI / 4.0 * (self.outer_radius.powi(4) - self.inner_radius().powi(4))
    }

    fn iyy(&self) -> f64 {
        self.ixx()
    }

    fn area(&self) -> f64 {
        PI * (self.outer_radius.powi(2) - self.inner_radius().powi(2))
    }

    fn centroid(&self) -> Point2<f64> {
        Point2::origin()
    }

    fn edge_points(&self, n: usize) -> Vec<Point2<f64>> {
        let n = n.max(4);
        (0..n)
            .map(|k| {
                let angle = 2.0 * PI * k as f64 / n as f64;
                Point2::new(self.outer_radius * angle.cos(), self.outer_radius * angle.sin())
            })
            .collect()
    }

    fn interior_points(&self, resolution: usize) -> Vec<Point2<f64>> {
        let resolution = resolution.max(2);
        let radii = linspace(self.inner_radius(), self.outer_radius, resolution);
        let angles = 4 * resolution;
        radii
            .iter()
            .flat_map(|&r| {
                (0..angles).map(move |k| {
                    let angle = 2.0 * PI * k as f64 / angles as f64;
                    Point2::new(r * angle.cos(), r * angle.sin())
                })
            })
            .collect()
    }

    fn extent(&self) -> (f64, f64) {
        (2.0 * self.outer_radius, 2.0 * self.outer_radius)
    }
}

/// Square hollow section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSection {
    /// Outer side length (m)
    pub height: f64,
    pub wall_thickness: f64,
}

impl BoxSection {
    pub fn new(height: f64, wall_thickness: f64) -> Result<Self> {
        ensure_positive("box height", height)?;
        ensure_positive("box wall thickness", wall_thickness)?;
        if 2.0 * wall_thickness > height {
            return Err(DesignError::InvalidParameter(format!(
                "box walls of {wall_thickness} m do not fit in {height} m"
            )));
        }
        Ok(Self {
            height,
            wall_thickness,
        })
    }

    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.wall_thickness
    }
}

impl CrossSection for BoxSection {
    fn ixx(&self) -> f64 {
        (self.height.powi(4) - self.inner_height().powi(4)) / 12.0
    }

    fn iyy(&self) -> f64 {
        self.ixx()
    }

    fn area(&self) -> f64 {
        self.height.powi(2) - self.inner_height().powi(2)
    }

    fn centroid(&self) -> Point2<f64> {
        Point2::origin()
    }

    fn edge_points(&self, n: usize) -> Vec<Point2<f64>> {
        rectangle_perimeter(0.0, 0.0, self.height, self.height, n)
    }

    fn interior_points(&self, resolution: usize) -> Vec<Point2<f64>> {
        let half_inner = self.inner_height() / 2.0;
        rectangle_grid(0.0, 0.0, self.height, self.height, resolution)
            .into_iter()
            .filter(|p| p.x.abs() >= half_inner || p.y.abs() >= half_inner)
            .collect()
    }

    fn extent(&self) -> (f64, f64) {
        (self.height, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_h_section() {
        let h = HSection::new((0.17, 0.01), (0.01, 0.18), (0.17, 0.01)).unwrap();
        assert_relative_eq!(h.centroid().y, 0.0, epsilon = 1e-15);
        let flange = 0.17 * 0.01_f64.powi(3) / 12.0 + 0.17 * 0.01 * 0.095_f64.powi(2);
        let web = 0.01 * 0.18_f64.powi(3) / 12.0;
        assert_relative_eq!(h.ixx(), 2.0 * flange + web, epsilon = 1e-15);
        assert_relative_eq!(h.area(), 2.0 * 0.0017 + 0.0018, epsilon = 1e-15);
        let (width, height) = h.extent();
        assert_relative_eq!(width, 0.17);
        assert_relative_eq!(height, 0.2, epsilon = 1e-15);
    }

    #[test]
    fn test_asymmetric_h_section_uses_true_centroid() {
        let h = HSection::new((0.2, 0.02), (0.01, 0.1), (0.05, 0.01)).unwrap();
        let yc = h.centroid().y;
        assert!(yc > 0.0);
        // Parallel-axis theorem: Ixx about the centroid is the minimum
        let about_origin: f64 = h
            .parts()
            .iter()
            .map(|(p, y)| p.width * p.thickness.powi(3) / 12.0 + p.area() * y * y)
            .sum();
        assert_relative_eq!(about_origin - h.ixx(), h.area() * yc * yc, epsilon = 1e-15);
    }

    #[test]
    fn test_tube_and_box() {
        let tube = TubeSection::new(0.05, 0.005).unwrap();
        assert_relative_eq!(tube.ixx(), PI / 4.0 * (0.05_f64.powi(4) - 0.045_f64.powi(4)));
        let square = BoxSection::new(0.1, 0.01).unwrap();
        assert_relative_eq!(square.ixx(), (0.1_f64.powi(4) - 0.08_f64.powi(4)) / 12.0);
        assert_relative_eq!(square.area(), 0.01 - 0.0064, epsilon = 1e-15);
        assert!(square
            .interior_points(11)
            .iter()
            .all(|p| p.x.abs() >= 0.04 || p.y.abs() >= 0.04));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(TubeSection::new(0.01, 0.02).is_err());
        assert!(BoxSection::new(0.1, 0.06).is_err());
        assert!(HSection::new((0.1, 0.0), (0.01, 0.1), (0.1, 0.01)).is_err());
    }
}
