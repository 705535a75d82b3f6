//! Open boundary with an imposed inflow discharge.

use glam::DVec2;
use log::warn;

use super::{
    BoundaryContext, BoundaryState, DRY_HEIGHT, FlowRegime, NewtonConfig, SVBoundaryCondition,
    check_imposed, check_imposed_height, check_open_boundary_fields, resolve_component,
    solve_fluvial_height, variable_for,
};
use crate::equations::STANDARD_GRAVITY;
use crate::error::{ConfigResult, check_gravity};
use crate::kernels::Variable;
use crate::types::{Component, CoupledFields, Equation, MeshDimension};

const NAME: &str = "ImposedDischargeBC";

/// Parameters of an [`ImposedDischargeBC`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImposedDischargeConfig {
    /// Equation the condition is applied to
    pub equation: Equation,
    /// Momentum component (required for the momentum equation)
    pub component: Option<Component>,
    /// Imposed height (positive), used when all characteristics enter
    pub h_imposed: f64,
    /// Imposed discharge magnitude, directed against the outward normal
    pub q_imposed: f64,
    /// Gravitational acceleration
    pub g: f64,
    /// Newton controls for the fluvial boundary height
    pub newton: NewtonConfig,
}

impl ImposedDischargeConfig {
    /// Condition on the continuity equation.
    pub fn continuity(h_imposed: f64, q_imposed: f64) -> Self {
        Self {
            equation: Equation::Continuity,
            component: None,
            h_imposed,
            q_imposed,
            g: STANDARD_GRAVITY,
            newton: NewtonConfig::default(),
        }
    }

    /// Condition on one momentum component.
    pub fn momentum(component: Component, h_imposed: f64, q_imposed: f64) -> Self {
        Self {
            equation: Equation::Momentum,
            component: Some(component),
            ..Self::continuity(h_imposed, q_imposed)
        }
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    /// Set Newton iteration controls.
    pub fn with_newton(mut self, max_iterations: usize, abs_tol: f64) -> Self {
        self.newton = NewtonConfig::new(max_iterations, abs_tol);
        self
    }
}

/// Imposed-discharge boundary condition.
///
/// The continuity residual is the imposed inflow `-q_imp ψ`. The momentum
/// residual uses the boundary state of the local regime; in the fluvial case
/// the boundary height is the root of
/// `2 sqrt(g h) h - q_imp - (v_n + 2c) h`.
#[derive(Clone, Debug)]
pub struct ImposedDischargeBC {
    equation: Equation,
    component: Component,
    h_imposed: f64,
    q_imposed: f64,
    g: f64,
    newton: NewtonConfig,
}

impl ImposedDischargeBC {
    /// Validate the configuration against the mesh and coupled fields.
    pub fn new(
        config: ImposedDischargeConfig,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        let component = resolve_component(NAME, config.equation, config.component, dimension)?;
        check_open_boundary_fields(NAME, config.equation, dimension, fields)?;
        check_gravity(NAME, config.g)?;
        check_imposed_height(NAME, config.h_imposed)?;
        check_imposed(NAME, "q_imposed", config.q_imposed)?;
        config.newton.validate(NAME)?;

        Ok(Self {
            equation: config.equation,
            component,
            h_imposed: config.h_imposed,
            q_imposed: config.q_imposed,
            g: config.g,
            newton: config.newton,
        })
    }

    /// Boundary state for the interior trace in `ctx`.
    pub fn boundary_state(&self, ctx: &BoundaryContext) -> BoundaryState {
        let v_n = ctx.interior_normal_velocity();
        let c = ctx.interior_celerity(self.g);
        let regime = FlowRegime::classify(v_n, c);
        let imposed_q = -self.q_imposed * ctx.normal;

        match regime {
            FlowRegime::Fluvial => {
                let solution = solve_fluvial_height(self.q_imposed, v_n, c, self.g, &self.newton);
                if !solution.converged {
                    warn!(
                        "h not found after {} iterations (residual = {:e}) in {}",
                        solution.iterations, solution.last_step, NAME
                    );
                }
                if solution.value < DRY_HEIGHT {
                    BoundaryState {
                        h: DRY_HEIGHT,
                        q: DVec2::ZERO,
                        regime,
                    }
                } else {
                    BoundaryState {
                        h: solution.value,
                        q: imposed_q,
                        regime,
                    }
                }
            }
            FlowRegime::TorrentialOutflow => BoundaryState {
                h: ctx.state.h,
                q: ctx.state.momentum(),
                regime,
            },
            FlowRegime::TorrentialInflow => BoundaryState {
                h: self.h_imposed,
                q: imposed_q,
                regime,
            },
        }
    }
}

impl SVBoundaryCondition for ImposedDischargeBC {
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
            Equation::Continuity => -self.q_imposed * ctx.test,
            Equation::Momentum => {
                let state = self.boundary_state(ctx);
                state.momentum_flux(ctx.normal, self.component, self.g) * ctx.test
            }
        }
    }
}
