//! Artificial viscosity diffusion κ ∇u·∇ψ.
//!
//! κ comes from [`SVMaterial`](crate::viscosity::SVMaterial). Test functions
//! attached to boundary nodes get no contribution, so the diffusion does not
//! add to the boundary flux terms.

use super::{Kernel, KernelQp, TrialFunction, Variable};

/// Diffusion kernel driven by the material viscosity.
#[derive(Clone, Debug)]
pub struct SVArtificialViscosity {
    variable: Variable,
}

impl SVArtificialViscosity {
    /// Create a diffusion kernel acting on `variable`.
    pub fn new(variable: Variable) -> Self {
        Self { variable }
    }
}

impl Kernel for SVArtificialViscosity {
    fn name(&self) -> &'static str {
        "SVArtificialViscosity"
    }

    fn variable(&self) -> Variable {
        self.variable
    }

    fn residual(&self, qp: &KernelQp) -> f64 {
        if qp.test_on_boundary {
            return 0.0;
        }
        qp.kappa * qp.grad_u.dot(qp.grad_test)
    }

    fn jacobian(&self, qp: &KernelQp, trial: &TrialFunction) -> f64 {
        if qp.test_on_boundary {
            return 0.0;
        }
        qp.kappa * trial.grad_phi.dot(qp.grad_test)
    }
}
