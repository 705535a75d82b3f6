//! Hydrostatic pressure term ∂_c(g h² / 2) of the momentum equations.

use crate::error::{ConfigResult, check_component, check_gravity};
use crate::types::{Component, MeshDimension};

use super::{Kernel, KernelQp, TrialFunction, Variable};

/// Pressure kernel for one momentum component.
#[derive(Clone, Debug)]
pub struct SVPressure {
    component: Component,
    g: f64,
}

impl SVPressure {
    /// Create a pressure kernel.
    pub fn new(component: Component, g: f64, dimension: MeshDimension) -> ConfigResult<Self> {
        check_component("SVPressure", component, dimension)?;
        check_gravity("SVPressure", g)?;
        Ok(Self { component, g })
    }
}

impl Kernel for SVPressure {
    fn name(&self) -> &'static str {
        "SVPressure"
    }

    fn variable(&self) -> Variable {
        Variable::momentum(self.component)
    }

    fn residual(&self, qp: &KernelQp) -> f64 {
        let h = qp.state.h;
        -0.5 * self.component.of(qp.grad_test) * self.g * h * h
    }

    fn off_diag_jacobian(&self, qp: &KernelQp, trial: &TrialFunction, jvar: Variable) -> f64 {
        match jvar {
            Variable::H => -trial.phi * self.component.of(qp.grad_test) * self.g * qp.state.h,
            _ => 0.0,
        }
    }
}
