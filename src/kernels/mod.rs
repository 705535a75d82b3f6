//! Volume residual/Jacobian kernels for the Saint-Venant equations.
//!
//! Each kernel is a pure function of the quadrature-point values supplied by
//! the assembly engine. It produces one residual scalar per test function and
//! one Jacobian scalar per (test, trial) pair.
//!
//! | Kernel | Variable | Residual |
//! |--------|----------|----------|
//! | [`SVContinuity`] | h | -q·∇ψ |
//! | [`SVAdvection`] | q_c | -(q_c/h) q·∇ψ |
//! | [`SVPressure`] | q_c | -½ g h² ∂_c ψ |
//! | [`SVBathymetry`] | q_c | g h ∂_c b ψ |
//! | [`SVArtificialViscosity`] | any | κ ∇u·∇ψ |
//!
//! Configuration is validated once in each constructor. On 1D meshes the
//! y-momentum is read as zero.

mod advection;
mod artificial_viscosity;
mod bathymetry;
mod continuity;
mod pressure;

pub use advection::SVAdvection;
pub use artificial_viscosity::SVArtificialViscosity;
pub use bathymetry::{
    BathymetryFunction, BathymetrySource, GaussianBump, PlanarBathymetry, SVBathymetry,
};
pub use continuity::SVContinuity;
pub use pressure::SVPressure;

use glam::DVec2;

use crate::state::ConservedState;
use crate::types::Component;

/// Unknown of the discrete system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Water height
    H,
    /// x-momentum
    QX,
    /// y-momentum
    QY,
}

impl Variable {
    /// The momentum unknown for a component.
    #[inline]
    pub fn momentum(component: Component) -> Self {
        match component {
            Component::X => Variable::QX,
            Component::Y => Variable::QY,
        }
    }

    /// Value of this unknown in a state.
    #[inline]
    pub fn value(self, state: &ConservedState) -> f64 {
        match self {
            Variable::H => state.h,
            Variable::QX => state.q_x,
            Variable::QY => state.q_y,
        }
    }
}

/// Values at one quadrature point for one test function.
///
/// The engine fills in what the kernels need; fields a kernel does not use
/// can keep their defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct KernelQp {
    /// Conserved state at the point
    pub state: ConservedState,
    /// Gradient of the kernel's own variable
    pub grad_u: DVec2,
    /// Test function value ψ_i
    pub test: f64,
    /// Test function gradient ∇ψ_i
    pub grad_test: DVec2,
    /// Physical position of the point
    pub position: DVec2,
    /// Current simulation time
    pub time: f64,
    /// Gradient of the coupled bathymetry field (zero if not coupled)
    pub grad_b: DVec2,
    /// Artificial viscosity κ from the material
    pub kappa: f64,
    /// Whether the node of test function i lies on the domain boundary
    pub test_on_boundary: bool,
}

impl KernelQp {
    /// Create a context with state and test function data.
    pub fn new(state: ConservedState, test: f64, grad_test: DVec2) -> Self {
        Self {
            state,
            test,
            grad_test,
            ..Default::default()
        }
    }

    /// Set the gradient of the kernel's variable.
    pub fn with_grad_u(mut self, grad_u: DVec2) -> Self {
        self.grad_u = grad_u;
        self
    }

    /// Set position and time.
    pub fn at(mut self, position: DVec2, time: f64) -> Self {
        self.position = position;
        self.time = time;
        self
    }

    /// Set the coupled bathymetry gradient.
    pub fn with_grad_b(mut self, grad_b: DVec2) -> Self {
        self.grad_b = grad_b;
        self
    }

    /// Set the artificial viscosity.
    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Mark the test function as belonging to a boundary node.
    pub fn on_boundary(mut self, on_boundary: bool) -> Self {
        self.test_on_boundary = on_boundary;
        self
    }
}

/// Trial (shape) function φ_j at a quadrature point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrialFunction {
    /// Value φ_j
    pub phi: f64,
    /// Gradient ∇φ_j
    pub grad_phi: DVec2,
}

impl TrialFunction {
    /// Create a trial function sample.
    pub fn new(phi: f64, grad_phi: DVec2) -> Self {
        Self { phi, grad_phi }
    }
}

/// A volume kernel of the Saint-Venant system.
///
/// Implementations must be thread-safe (`Send + Sync`): the engine evaluates
/// kernels concurrently across elements.
pub trait Kernel: Send + Sync {
    /// Name of this kernel for debugging and logging.
    fn name(&self) -> &'static str;

    /// The unknown whose test functions this kernel contributes to.
    fn variable(&self) -> Variable;

    /// Residual contribution for test function i.
    fn residual(&self, qp: &KernelQp) -> f64;

    /// Derivative of the residual w.r.t. the kernel's own variable.
    fn jacobian(&self, _qp: &KernelQp, _trial: &TrialFunction) -> f64 {
        0.0
    }

    /// Derivative of the residual w.r.t. another unknown.
    fn off_diag_jacobian(&self, _qp: &KernelQp, _trial: &TrialFunction, _jvar: Variable) -> f64 {
        0.0
    }
}
