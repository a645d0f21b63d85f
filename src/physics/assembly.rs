use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use tracing::debug;

use super::error::PhysicsError;
use super::force_point::{ForcePoint, PointInputs};
use super::forces::{ForceCategory, ReferenceFrame};
use super::rotation::EulerRotation;

/// Inertia tensor of a point mass at `offset` about the origin.
fn point_mass_inertia(mass: f64, offset: &Vector3<f64>) -> Matrix3<f64> {
    mass * (Matrix3::identity() * offset.dot(offset) - offset * offset.transpose())
}

/// Rigid collection of force points making up an aircraft.
///
/// Mass properties are held about the centre of gravity in the assembly
/// frame. Force and moment totals are rotated by the assembly orientation.
#[derive(Debug, Clone)]
pub struct AircraftAssembly {
    points: Vec<ForcePoint>,
    /// Position in the global frame (m)
    pub position: Vector3<f64>,
    pub rotation: EulerRotation,
    mass: f64,
    cog: Vector3<f64>,
    inertia: Matrix3<f64>,
    force: Vector3<f64>,
    moment: Vector3<f64>,
}

impl AircraftAssembly {
    pub fn new(
        points: Vec<ForcePoint>,
        position: Vector3<f64>,
        rotation: EulerRotation,
    ) -> Result<Self, PhysicsError> {
        let mut assembly = Self {
            points,
            position,
            rotation,
            mass: 0.0,
            cog: Vector3::zeros(),
            inertia: Matrix3::zeros(),
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        };
        assembly.recompute()?;
        Ok(assembly)
    }

    fn recompute(&mut self) -> Result<(), PhysicsError> {
        let mass: f64 = self.points.iter().map(|p| p.mass).sum();
        if mass <= 0.0 || !mass.is_finite() {
            return Err(PhysicsError::MasslessAssembly(format!(
                "{} points carry a total mass of {mass} kg",
                self.points.len()
            )));
        }
        let cog = self
            .points
            .iter()
            .map(|p| p.position * p.mass)
            .sum::<Vector3<f64>>()
            / mass;

        let about_origin = self
            .points
            .iter()
            .map(|p| p.inertia() + point_mass_inertia(p.mass, &p.position))
            .sum::<Matrix3<f64>>();
        let inertia = about_origin - point_mass_inertia(mass, &cog);

        let r = self.rotation.matrix();
        let force = r * self.points.iter().map(|p| p.force()).sum::<Vector3<f64>>();
        let moment = r * self
            .points
            .iter()
            .map(|p| p.moment() + (p.position - cog).cross(&p.force()))
            .sum::<Vector3<f64>>();

        debug!(
            "Assembly of {} points: mass {:.3} kg, cog [{:.3}, {:.3}, {:.3}] m",
            self.points.len(),
            mass,
            cog.x,
            cog.y,
            cog.z
        );

        self.mass = mass;
        self.cog = cog;
        self.inertia = inertia;
        self.force = force;
        self.moment = moment;
        Ok(())
    }

    /// Update each point with its inputs, in order, then recompute totals.
    pub fn update(&mut self, inputs: &[PointInputs]) -> Result<(), PhysicsError> {
        if inputs.len() != self.points.len() {
            return Err(PhysicsError::InvalidParameter(format!(
                "expected inputs for {} points, got {}",
                self.points.len(),
                inputs.len()
            )));
        }
        for (point, input) in self.points.iter_mut().zip(inputs) {
            point.update(input);
        }
        self.recompute()
    }

    pub fn points(&self) -> &[ForcePoint] {
        &self.points
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Centre of gravity in the assembly frame.
    pub fn cog(&self) -> Vector3<f64> {
        self.cog
    }

    /// Inertia tensor about the centre of gravity.
    pub fn inertia(&self) -> Matrix3<f64> {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> Result<Matrix3<f64>, PhysicsError> {
        self.inertia.try_inverse().ok_or_else(|| {
            PhysicsError::SingularInertia(format!(
                "inertia tensor of a {:.3} kg assembly cannot be inverted",
                self.mass
            ))
        })
    }

    pub fn net_force(&self) -> Vector3<f64> {
        self.force
    }

    /// Net moment about the centre of gravity.
    pub fn net_moment(&self) -> Vector3<f64> {
        self.moment
    }

    /// Net force in airframe axes (`Local`), after the assembly rotation
    /// (`Body`) or rotated by a flight attitude (`Inertial`).
    pub fn net_force_in(
        &self,
        frame: ReferenceFrame,
        attitude: &UnitQuaternion<f64>,
    ) -> Vector3<f64> {
        self.express(self.force, frame, attitude)
    }

    pub fn net_moment_in(
        &self,
        frame: ReferenceFrame,
        attitude: &UnitQuaternion<f64>,
    ) -> Vector3<f64> {
        self.express(self.moment, frame, attitude)
    }

    fn express(
        &self,
        rotated: Vector3<f64>,
        frame: ReferenceFrame,
        attitude: &UnitQuaternion<f64>,
    ) -> Vector3<f64> {
        match frame {
            ReferenceFrame::Local => self.rotation.inverse_matrix() * rotated,
            ReferenceFrame::Body => rotated,
            ReferenceFrame::Inertial => attitude * (self.rotation.inverse_matrix() * rotated),
        }
    }

    pub fn force_by_category(&self, category: &ForceCategory) -> Vector3<f64> {
        self.rotation.matrix()
            * self
                .points
                .iter()
                .filter(|p| &p.category == category)
                .map(|p| p.force())
                .sum::<Vector3<f64>>()
    }

    pub fn moment_by_category(&self, category: &ForceCategory) -> Vector3<f64> {
        self.rotation.matrix()
            * self
                .points
                .iter()
                .filter(|p| &p.category == category)
                .map(|p| p.moment() + (p.position - self.cog).cross(&p.force()))
                .sum::<Vector3<f64>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::value_source::ValueSource;
    use approx::assert_relative_eq;

    fn quad(arm: f64) -> Vec<ForcePoint> {
        [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                ForcePoint::new(
                    format!("rotor {i}"),
                    ForceCategory::Propulsive,
                    Vector3::new(x * arm, y * arm, 0.0),
                )
                .with_mass(5.0, Matrix3::zeros())
                .with_constant_load(Vector3::new(0.0, 0.0, 50.0), Vector3::zeros())
            })
            .collect()
    }

    #[test]
    fn test_symmetric_cog_at_origin() {
        let assembly =
            AircraftAssembly::new(quad(1.5), Vector3::zeros(), EulerRotation::identity()).unwrap();
        assert_relative_eq!(assembly.mass(), 20.0);
        assert_relative_eq!(assembly.cog(), Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(assembly.net_force(), Vector3::new(0.0, 0.0, 200.0));
        assert_relative_eq!(assembly.net_moment(), Vector3::zeros(), epsilon = 1e-10);
        // Four 5 kg masses at radius 1.5 * sqrt(2)
        assert_relative_eq!(assembly.inertia()[(2, 2)], 4.0 * 5.0 * 4.5, epsilon = 1e-10);
        assert_relative_eq!(assembly.inertia()[(0, 0)], 4.0 * 5.0 * 2.25, epsilon = 1e-10);
    }

    #[test]
    fn test_inertia_is_about_cog() {
        // Two equal masses offset from the origin: inertia about their midpoint
        let points = vec![
            ForcePoint::point_mass("a", 2.0, Vector3::new(3.0, 0.0, 0.0)),
            ForcePoint::point_mass("b", 2.0, Vector3::new(5.0, 0.0, 0.0)),
        ];
        let assembly =
            AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity()).unwrap();
        assert_relative_eq!(assembly.cog(), Vector3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(assembly.inertia()[(2, 2)], 4.0, epsilon = 1e-10);
        assert_relative_eq!(assembly.inertia()[(0, 0)], 0.0, epsilon = 1e-10);
        assert!(assembly.inverse_inertia().is_err());
    }

    #[test]
    fn test_moment_arm_from_cog() {
        let mut points = quad(1.0);
        points[0] = points[0]
            .clone()
            .with_constant_load(Vector3::new(0.0, 0.0, 80.0), Vector3::zeros());
        let assembly =
            AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity()).unwrap();
        // Extra 30 N up at (1, 1, 0) gives r x F = (30, -30, 0)
        let m = assembly.net_moment();
        assert_relative_eq!(m.x, 30.0, epsilon = 1e-10);
        assert_relative_eq!(m.y, -30.0, epsilon = 1e-10);
        assert_relative_eq!(
            assembly.moment_by_category(&ForceCategory::Propulsive),
            m,
            epsilon = 1e-10
        );
        assert_eq!(
            assembly.force_by_category(&ForceCategory::Aerodynamic),
            Vector3::zeros()
        );
    }

    #[test]
    fn test_massless_assembly_is_rejected() {
        let points = vec![ForcePoint::new(
            "drag",
            ForceCategory::Aerodynamic,
            Vector3::zeros(),
        )];
        let err = AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::identity())
            .unwrap_err();
        assert!(matches!(err, PhysicsError::MasslessAssembly(_)));
    }

    #[test]
    fn test_update_and_rotation() {
        let points = vec![ForcePoint::new("thrust", ForceCategory::Propulsive, Vector3::zeros())
            .with_mass(1.0, Matrix3::identity())
            .with_sources(
                [
                    ValueSource::Scaled { gain: 1.0 },
                    ValueSource::zero(),
                    ValueSource::zero(),
                ],
                Default::default(),
            )];
        let mut assembly =
            AircraftAssembly::new(points, Vector3::zeros(), EulerRotation::new(0.0, 0.0, 90.0))
                .unwrap();
        assembly
            .update(&[PointInputs {
                force: [10.0, 0.0, 0.0],
                moment: [0.0; 3],
            }])
            .unwrap();
        let f = assembly.net_force();
        assert!(f.x.abs() < 1e-10);
        assert!((f.y - 10.0).abs() < 1e-10);
        let local = assembly.net_force_in(ReferenceFrame::Local, &UnitQuaternion::identity());
        assert_relative_eq!(local, Vector3::new(10.0, 0.0, 0.0), epsilon = 1e-10);
        assert!(assembly.update(&[]).is_err());
    }
}
