//! Impermeable wall: zero normal velocity.

use super::{BoundaryContext, SVBoundaryCondition, variable_for};
use crate::equations::STANDARD_GRAVITY;
use crate::error::{ConfigResult, check_component, check_gravity};
use crate::kernels::{TrialFunction, Variable};
use crate::types::{Component, CoupledFields, Equation, FieldName, MeshDimension};

const NAME: &str = "SolidWallBC";

/// Parameters of a [`SolidWallBC`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidWallConfig {
    /// Equation the condition is applied to
    pub equation: Equation,
    /// Momentum component (x when not given)
    pub component: Option<Component>,
    /// Gravitational acceleration
    pub g: f64,
}

impl SolidWallConfig {
    /// Wall on the continuity equation.
    pub fn continuity() -> Self {
        Self {
            equation: Equation::Continuity,
            component: None,
            g: STANDARD_GRAVITY,
        }
    }

    /// Wall on one momentum component.
    pub fn momentum(component: Component) -> Self {
        Self {
            equation: Equation::Momentum,
            component: Some(component),
            g: STANDARD_GRAVITY,
        }
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }
}

/// Solid wall boundary condition.
///
/// No mass crosses the wall and the momentum flux reduces to the hydrostatic
/// pressure `½ g h² n_c`.
#[derive(Clone, Debug)]
pub struct SolidWallBC {
    equation: Equation,
    component: Component,
    g: f64,
}

impl SolidWallBC {
    /// Validate the configuration against the mesh and coupled fields.
    pub fn new(
        config: SolidWallConfig,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        let component = config.component.unwrap_or_default();
        if config.equation == Equation::Momentum {
            check_component(NAME, component, dimension)?;
        }
        fields.require(NAME, FieldName::H, "for the wall pressure")?;
        check_gravity(NAME, config.g)?;

        Ok(Self {
            equation: config.equation,
            component,
            g: config.g,
        })
    }
}

impl SVBoundaryCondition for SolidWallBC {
    fn name(&self) -> &'static str {
        NAME
    }

    fn equation(&self) -> Equation {
        self.equation
    }

    fn variable(&self) -> Variable {
        variable_for(self.equation, self.component)
    }

    fn residual(&self, ctx: &BoundaryContext) -> f64 {
        match self.equation {
            Equation::Continuity => 0.0,
            Equation::Momentum => {
                let h = ctx.state.h;
                0.5 * self.g * h * h * self.component.of(ctx.normal) * ctx.test
            }
        }
    }

    fn off_diag_jacobian(&self, ctx: &BoundaryContext, trial: &TrialFunction, jvar: Variable) -> f64 {
        match (self.equation, jvar) {
            (Equation::Momentum, Variable::H) => {
                self.g * ctx.state.h * self.component.of(ctx.normal) * trial.phi * ctx.test
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::state::ConservedState;
    use approx::assert_relative_eq;
    use glam::DVec2;

    const G: f64 = 9.80665;

    fn wall(config: SolidWallConfig) -> SolidWallBC {
        SolidWallBC::new(config, MeshDimension::Two, &CoupledFields::conserved(MeshDimension::Two))
            .unwrap()
    }

    #[test]
    fn test_continuity_is_zero() {
        let bc = wall(SolidWallConfig::continuity());
        for &(h, qx, qy) in &[(2.0, 0.0, 0.0), (0.5, 3.0, -1.0), (10.0, -7.0, 4.0)] {
            let ctx = BoundaryContext::new(ConservedState::new(h, qx, qy), DVec2::new(0.6, 0.8), 0.7);
            assert_eq!(bc.residual(&ctx), 0.0);
        }
    }

    #[test]
    fn test_momentum_is_hydrostatic_pressure() {
        let n = DVec2::new(0.6, 0.8);
        let ctx = BoundaryContext::new(ConservedState::new(2.0, 1.0, -3.0), n, 0.25);

        let bc_x = wall(SolidWallConfig::momentum(Component::X));
        let bc_y = wall(SolidWallConfig::momentum(Component::Y));
        assert_relative_eq!(bc_x.residual(&ctx), 0.5 * G * 4.0 * 0.6 * 0.25, epsilon = 1e-14);
        assert_relative_eq!(bc_y.residual(&ctx), 0.5 * G * 4.0 * 0.8 * 0.25, epsilon = 1e-14);
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let bc = wall(SolidWallConfig::momentum(Component::X));
        let n = DVec2::new(0.6, 0.8);
        let h = 2.0;
        let trial = TrialFunction::new(0.4, DVec2::ZERO);
        let ctx = BoundaryContext::new(ConservedState::new(h, 0.0, 0.0), n, 0.5);

        let eps = 1e-6;
        let plus = BoundaryContext::new(ConservedState::new(h + eps * trial.phi, 0.0, 0.0), n, 0.5);
        let minus = BoundaryContext::new(ConservedState::new(h - eps * trial.phi, 0.0, 0.0), n, 0.5);
        let fd = (bc.residual(&plus) - bc.residual(&minus)) / (2.0 * eps);

        assert_relative_eq!(bc.off_diag_jacobian(&ctx, &trial, Variable::H), fd, epsilon = 1e-7);
        assert_eq!(bc.off_diag_jacobian(&ctx, &trial, Variable::QY), 0.0);
        assert_eq!(bc.jacobian(&ctx, &trial), 0.0);
    }

    #[test]
    fn test_default_component_is_x() {
        let config = SolidWallConfig {
            component: None,
            ..SolidWallConfig::momentum(Component::Y)
        };
        assert_eq!(wall(config).variable(), Variable::QX);
    }

    #[test]
    fn test_validation() {
        let fields_1d = CoupledFields::conserved(MeshDimension::One);
        assert!(matches!(
            SolidWallBC::new(SolidWallConfig::momentum(Component::Y), MeshDimension::One, &fields_1d),
            Err(ConfigError::ComponentDimensionMismatch { .. })
        ));
        assert!(matches!(
            SolidWallBC::new(SolidWallConfig::continuity(), MeshDimension::One, &CoupledFields::new()),
            Err(ConfigError::MissingField { field: FieldName::H, .. })
        ));
        assert!(
            SolidWallBC::new(
                SolidWallConfig::continuity().with_gravity(-1.0),
                MeshDimension::One,
                &fields_1d
            )
            .is_err()
        );
    }
}
