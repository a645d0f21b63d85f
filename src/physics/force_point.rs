use nalgebra::{Matrix3, Vector3};

use super::forces::{ForceCategory, ReferenceFrame};
use super::rotation::EulerRotation;
use super::value_source::{evaluate_components, ValueSource};

/// Inputs fed to the value sources of one point on update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointInputs {
    pub force: [f64; 3],
    pub moment: [f64; 3],
}

/// A mass and load carrier attached to the airframe.
///
/// `force`, `moment` and `inertia` are held in the parent frame: the point's
/// own rotation is applied but its position offset is not.
#[derive(Debug, Clone)]
pub struct ForcePoint {
    pub name: String,
    pub category: ForceCategory,
    force_sources: [ValueSource; 3],
    moment_sources: [ValueSource; 3],
    pub mass: f64,
    local_inertia: Matrix3<f64>,
    /// Position in the body frame (m)
    pub position: Vector3<f64>,
    pub rotation: EulerRotation,
    local_force: Vector3<f64>,
    local_moment: Vector3<f64>,
    force: Vector3<f64>,
    moment: Vector3<f64>,
    inertia: Matrix3<f64>,
}

impl ForcePoint {
    pub fn new(name: impl Into<String>, category: ForceCategory, position: Vector3<f64>) -> Self {
        let mut point = Self {
            name: name.into(),
            category,
            force_sources: Default::default(),
            moment_sources: Default::default(),
            mass: 0.0,
            local_inertia: Matrix3::zeros(),
            position,
            rotation: EulerRotation::identity(),
            local_force: Vector3::zeros(),
            local_moment: Vector3::zeros(),
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
            inertia: Matrix3::zeros(),
        };
        point.update(&PointInputs::default());
        point
    }

    /// Point mass with no load.
    pub fn point_mass(name: impl Into<String>, mass: f64, position: Vector3<f64>) -> Self {
        Self::new(name, ForceCategory::Structural, position).with_mass(mass, Matrix3::zeros())
    }

    pub fn with_mass(mut self, mass: f64, local_inertia: Matrix3<f64>) -> Self {
        self.mass = mass;
        self.local_inertia = local_inertia;
        self.refresh();
        self
    }

    pub fn with_rotation(mut self, rotation: EulerRotation) -> Self {
        self.rotation = rotation;
        self.refresh();
        self
    }

    /// Constant force and moment in the point's local frame.
    pub fn with_constant_load(self, force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        self.with_sources(
            [force.x.into(), force.y.into(), force.z.into()],
            [moment.x.into(), moment.y.into(), moment.z.into()],
        )
    }

    pub fn with_sources(
        mut self,
        force_sources: [ValueSource; 3],
        moment_sources: [ValueSource; 3],
    ) -> Self {
        self.force_sources = force_sources;
        self.moment_sources = moment_sources;
        self.update(&PointInputs::default());
        self
    }

    /// Re-evaluate the sources and rotate the results into the parent frame.
    pub fn update(&mut self, inputs: &PointInputs) {
        self.local_force = Vector3::from(evaluate_components(&self.force_sources, inputs.force));
        self.local_moment =
            Vector3::from(evaluate_components(&self.moment_sources, inputs.moment));
        self.refresh();
    }

    fn refresh(&mut self) {
        let r = self.rotation.matrix();
        self.force = r * self.local_force;
        self.moment = r * self.local_moment;
        self.inertia = r * self.local_inertia * r.transpose();
    }

    pub fn force(&self) -> Vector3<f64> {
        self.force
    }

    pub fn moment(&self) -> Vector3<f64> {
        self.moment
    }

    pub fn inertia(&self) -> Matrix3<f64> {
        self.inertia
    }

    /// Force in the point's own frame or the body frame.
    ///
    /// A point has no attitude information, so `Inertial` is reported in the
    /// body frame; use the assembly for inertial totals.
    pub fn force_in(&self, frame: ReferenceFrame) -> Vector3<f64> {
        match frame {
            ReferenceFrame::Local => self.local_force,
            ReferenceFrame::Body | ReferenceFrame::Inertial => self.force,
        }
    }
}
