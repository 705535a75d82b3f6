//! Advection term ∇·(q_c q / h) of the momentum equations.

use crate::error::{ConfigResult, check_component};
use crate::types::{Component, CoupledFields, MeshDimension};

use super::{Kernel, KernelQp, TrialFunction, Variable};

/// Advection kernel for one momentum component.
///
/// Weak form: -∫ (u/h) (q·∇ψ) with u = q_c.
#[derive(Clone, Debug)]
pub struct SVAdvection {
    component: Component,
    has_q_y: bool,
}

impl SVAdvection {
    /// Create an advection kernel.
    ///
    /// Requires `q_y` in 2D and rejects it in 1D.
    pub fn new(
        component: Component,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        check_component("SVAdvection", component, dimension)?;
        fields.check_q_y("SVAdvection", dimension)?;
        Ok(Self {
            component,
            has_q_y: dimension.has_y(),
        })
    }

    /// Momentum component this kernel acts on.
    pub fn component(&self) -> Component {
        self.component
    }
}

impl Kernel for SVAdvection {
    fn name(&self) -> &'static str {
        "SVAdvection"
    }

    fn variable(&self) -> Variable {
        Variable::momentum(self.component)
    }

    fn residual(&self, qp: &KernelQp) -> f64 {
        let state = if self.has_q_y { qp.state } else { qp.state.without_y() };
        let u = self.variable().value(&state);
        -u / state.h * state.momentum().dot(qp.grad_test)
    }

    fn jacobian(&self, qp: &KernelQp, trial: &TrialFunction) -> f64 {
        let state = if self.has_q_y { qp.state } else { qp.state.without_y() };
        let mut v = state.velocity();
        // u appears both as the advected quantity and inside q
        v[self.component.index()] *= 2.0;
        -trial.phi * v.dot(qp.grad_test)
    }

    fn off_diag_jacobian(&self, qp: &KernelQp, trial: &TrialFunction, jvar: Variable) -> f64 {
        let state = if self.has_q_y { qp.state } else { qp.state.without_y() };
        let u = self.variable().value(&state);
        let h = state.h;

        match jvar {
            Variable::H => trial.phi * u / h * state.velocity().dot(qp.grad_test),
            _ if jvar == self.variable() => 0.0,
            Variable::QX => -trial.phi * qp.grad_test.x * u / h,
            Variable::QY if self.has_q_y => -trial.phi * qp.grad_test.y * u / h,
            Variable::QY => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConservedState;
    use crate::types::FieldName;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn kernel_2d(component: Component) -> SVAdvection {
        SVAdvection::new(
            component,
            MeshDimension::Two,
            &CoupledFields::conserved(MeshDimension::Two),
        )
        .unwrap()
    }

    #[test]
    fn test_residual() {
        // h=2, q=(4, 2): u/h = 2, q·∇ψ = 4*0.5 + 2*1 = 4
        let k = kernel_2d(Component::X);
        let qp = KernelQp::new(ConservedState::new(2.0, 4.0, 2.0), 1.0, DVec2::new(0.5, 1.0));
        assert_relative_eq!(k.residual(&qp), -8.0, epsilon = 1e-14);
    }

    #[test]
    fn test_jacobian_doubles_own_component() {
        let k = kernel_2d(Component::Y);
        let qp = KernelQp::new(ConservedState::new(2.0, 4.0, 2.0), 1.0, DVec2::new(0.5, 1.0));
        let trial = TrialFunction::new(1.0, DVec2::ZERO);
        // v = (2, 1) -> (2, 2); v·∇ψ = 1 + 2 = 3
        assert_relative_eq!(k.jacobian(&qp, &trial), -3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_off_diag_against_own_variable_is_zero() {
        let k = kernel_2d(Component::X);
        let qp = KernelQp::new(ConservedState::new(2.0, 4.0, 2.0), 1.0, DVec2::new(0.5, 1.0));
        let trial = TrialFunction::new(1.0, DVec2::ZERO);
        assert_eq!(k.off_diag_jacobian(&qp, &trial, Variable::QX), 0.0);
        assert!(k.off_diag_jacobian(&qp, &trial, Variable::QY) != 0.0);
    }

    #[test]
    fn test_1d_ignores_y_momentum() {
        let k = SVAdvection::new(
            Component::X,
            MeshDimension::One,
            &CoupledFields::conserved(MeshDimension::One),
        )
        .unwrap();
        let qp = KernelQp::new(ConservedState::new(1.0, 1.0, 5.0), 1.0, DVec2::new(1.0, 1.0));
        assert_relative_eq!(k.residual(&qp), -1.0, epsilon = 1e-14);
        let trial = TrialFunction::new(1.0, DVec2::ZERO);
        assert_eq!(k.off_diag_jacobian(&qp, &trial, Variable::QY), 0.0);
    }

    #[test]
    fn test_construction_errors() {
        let fields_1d = CoupledFields::conserved(MeshDimension::One);
        assert!(SVAdvection::new(Component::Y, MeshDimension::One, &fields_1d).is_err());
        assert!(SVAdvection::new(Component::X, MeshDimension::Two, &fields_1d).is_err());
        let with_y = fields_1d.with(FieldName::QY);
        assert!(SVAdvection::new(Component::X, MeshDimension::One, &with_y).is_err());
    }
}
