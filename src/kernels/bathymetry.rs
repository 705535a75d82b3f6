//! Bathymetry forcing g h ∂_c b of the momentum equations.
//!
//! The bottom gradient comes either from a coupled field (the engine fills
//! [`KernelQp::grad_b`]) or from an analytic [`BathymetryFunction`] evaluated
//! at the quadrature point.

use std::fmt;
use std::sync::Arc;

use glam::DVec2;

use crate::error::{ConfigResult, check_component, check_gravity};
use crate::types::{Component, CoupledFields, FieldName, MeshDimension};

use super::{Kernel, KernelQp, TrialFunction, Variable};

/// Analytic bottom topography b(t, x).
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait BathymetryFunction: Send + Sync {
    /// Bottom elevation at a point.
    fn value(&self, time: f64, position: DVec2) -> f64;

    /// Gradient ∇b at a point.
    fn gradient(&self, time: f64, position: DVec2) -> DVec2;
}

/// Sloping plane b = b0 + s·x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarBathymetry {
    /// Elevation at the origin
    pub b0: f64,
    /// Constant slope (∂b/∂x, ∂b/∂y)
    pub slope: DVec2,
}

impl PlanarBathymetry {
    /// Create a sloping plane.
    pub fn new(b0: f64, slope: DVec2) -> Self {
        Self { b0, slope }
    }

    /// Flat bottom at elevation b0.
    pub fn flat(b0: f64) -> Self {
        Self::new(b0, DVec2::ZERO)
    }
}

impl BathymetryFunction for PlanarBathymetry {
    fn value(&self, _time: f64, position: DVec2) -> f64 {
        self.b0 + self.slope.dot(position)
    }

    fn gradient(&self, _time: f64, _position: DVec2) -> DVec2 {
        self.slope
    }
}

/// Gaussian bump b = A exp(-|x - x0|² / w²), the classic lake-at-rest test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianBump {
    /// Peak height A
    pub amplitude: f64,
    /// Centre x0
    pub center: DVec2,
    /// Width w
    pub width: f64,
}

impl GaussianBump {
    /// Create a Gaussian bump.
    pub fn new(amplitude: f64, center: DVec2, width: f64) -> Self {
        Self {
            amplitude,
            center,
            width,
        }
    }
}

impl BathymetryFunction for GaussianBump {
    fn value(&self, _time: f64, position: DVec2) -> f64 {
        let r2 = (position - self.center).length_squared();
        self.amplitude * (-r2 / (self.width * self.width)).exp()
    }

    fn gradient(&self, time: f64, position: DVec2) -> DVec2 {
        let w2 = self.width * self.width;
        -2.0 / w2 * (position - self.center) * self.value(time, position)
    }
}

/// Where the bathymetry gradient comes from.
#[derive(Clone)]
pub enum BathymetrySource {
    /// Coupled field `b`; the engine supplies ∇b at each point
    Coupled,
    /// Analytic function evaluated at the point
    Function(Arc<dyn BathymetryFunction>),
}

impl BathymetrySource {
    /// Wrap an analytic bathymetry.
    pub fn function(f: impl BathymetryFunction + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    fn gradient(&self, qp: &KernelQp) -> DVec2 {
        match self {
            BathymetrySource::Coupled => qp.grad_b,
            BathymetrySource::Function(f) => f.gradient(qp.time, qp.position),
        }
    }
}

impl fmt::Debug for BathymetrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BathymetrySource::Coupled => write!(f, "Coupled"),
            BathymetrySource::Function(_) => write!(f, "Function(..)"),
        }
    }
}

/// Bathymetry forcing kernel for one momentum component.
#[derive(Clone, Debug)]
pub struct SVBathymetry {
    component: Component,
    g: f64,
    source: BathymetrySource,
}

impl SVBathymetry {
    /// Create a bathymetry kernel.
    ///
    /// A coupled source requires the field `b`.
    pub fn new(
        component: Component,
        g: f64,
        source: BathymetrySource,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        check_component("SVBathymetry", component, dimension)?;
        check_gravity("SVBathymetry", g)?;
        if matches!(source, BathymetrySource::Coupled) {
            fields.require("SVBathymetry", FieldName::B, "for a coupled bathymetry source")?;
        }
        Ok(Self {
            component,
            g,
            source,
        })
    }

    /// Bottom slope along this kernel's component.
    #[inline]
    fn slope(&self, qp: &KernelQp) -> f64 {
        self.component.of(self.source.gradient(qp))
    }
}

impl Kernel for SVBathymetry {
    fn name(&self) -> &'static str {
        "SVBathymetry"
    }

    fn variable(&self) -> Variable {
        Variable::momentum(self.component)
    }

    fn residual(&self, qp: &KernelQp) -> f64 {
        self.g * qp.state.h * self.slope(qp) * qp.test
    }

    fn off_diag_jacobian(&self, qp: &KernelQp, trial: &TrialFunction, jvar: Variable) -> f64 {
        match jvar {
            Variable::H => trial.phi * self.g * self.slope(qp) * qp.test,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConservedState;
    use approx::assert_relative_eq;

    const G: f64 = 9.80665;

    #[test]
    fn test_coupled_source() {
        let fields = CoupledFields::conserved(MeshDimension::Two).with(FieldName::B);
        let k = SVBathymetry::new(
            Component::X,
            G,
            BathymetrySource::Coupled,
            MeshDimension::Two,
            &fields,
        )
        .unwrap();
        let qp = KernelQp::new(ConservedState::new(2.0, 0.0, 0.0), 0.5, DVec2::ZERO)
            .with_grad_b(DVec2::new(0.1, 0.3));

        assert_relative_eq!(k.residual(&qp), G * 2.0 * 0.1 * 0.5, epsilon = 1e-14);
        let trial = TrialFunction::new(1.0, DVec2::ZERO);
        assert_relative_eq!(
            k.off_diag_jacobian(&qp, &trial, Variable::H),
            G * 0.1 * 0.5,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_function_source() {
        let fields = CoupledFields::conserved(MeshDimension::Two);
        let source = BathymetrySource::function(PlanarBathymetry::new(0.0, DVec2::new(0.0, -0.2)));
        let k = SVBathymetry::new(Component::Y, G, source, MeshDimension::Two, &fields).unwrap();
        let qp = KernelQp::new(ConservedState::new(1.0, 0.0, 0.0), 1.0, DVec2::ZERO)
            .at(DVec2::new(5.0, 5.0), 0.0);
        assert_relative_eq!(k.residual(&qp), -0.2 * G, epsilon = 1e-14);
    }

    #[test]
    fn test_coupled_source_requires_b() {
        let fields = CoupledFields::conserved(MeshDimension::Two);
        let result = SVBathymetry::new(
            Component::X,
            G,
            BathymetrySource::Coupled,
            MeshDimension::Two,
            &fields,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_gaussian_gradient_matches_finite_difference() {
        let bump = GaussianBump::new(0.8, DVec2::new(1.0, 0.5), 0.4);
        let p = DVec2::new(1.2, 0.3);
        let eps = 1e-6;
        let grad = bump.gradient(0.0, p);
        let fd_x = (bump.value(0.0, p + DVec2::X * eps) - bump.value(0.0, p - DVec2::X * eps))
            / (2.0 * eps);
        let fd_y = (bump.value(0.0, p + DVec2::Y * eps) - bump.value(0.0, p - DVec2::Y * eps))
            / (2.0 * eps);
        assert_relative_eq!(grad.x, fd_x, epsilon = 1e-8);
        assert_relative_eq!(grad.y, fd_y, epsilon = 1e-8);
    }
}
