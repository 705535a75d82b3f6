//! Divergence of momentum ∇·q in the continuity equation.

use crate::error::ConfigResult;
use crate::types::{CoupledFields, FieldName, MeshDimension};

use super::{Kernel, KernelQp, TrialFunction, Variable};

/// Continuity kernel, acting on the test functions of h.
#[derive(Clone, Debug)]
pub struct SVContinuity {
    has_q_y: bool,
}

impl SVContinuity {
    /// Create a continuity kernel.
    ///
    /// Requires `q_x`, requires `q_y` in 2D and rejects it in 1D.
    pub fn new(dimension: MeshDimension, fields: &CoupledFields) -> ConfigResult<Self> {
        fields.require("SVContinuity", FieldName::QX, "for the continuity equation")?;
        fields.check_q_y("SVContinuity", dimension)?;
        Ok(Self {
            has_q_y: dimension.has_y(),
        })
    }
}

impl Kernel for SVContinuity {
    fn name(&self) -> &'static str {
        "SVContinuity"
    }

    fn variable(&self) -> Variable {
        Variable::H
    }

    fn residual(&self, qp: &KernelQp) -> f64 {
        let q_y = if self.has_q_y { qp.state.q_y } else { 0.0 };
        -(qp.state.q_x * qp.grad_test.x + q_y * qp.grad_test.y)
    }

    fn off_diag_jacobian(&self, qp: &KernelQp, trial: &TrialFunction, jvar: Variable) -> f64 {
        match jvar {
            Variable::QX => -trial.phi * qp.grad_test.x,
            Variable::QY if self.has_q_y => -trial.phi * qp.grad_test.y,
            _ => 0.0,
        }
    }
}
