//! Open boundary with an imposed water height.

use super::{
    BoundaryContext, BoundaryState, FlowRegime, SVBoundaryCondition, check_imposed,
    check_imposed_height, check_open_boundary_fields, resolve_component, variable_for,
};
use crate::equations::STANDARD_GRAVITY;
use crate::error::{ConfigResult, check_gravity};
use crate::kernels::Variable;
use crate::types::{Component, CoupledFields, Equation, MeshDimension};

const NAME: &str = "ImposedHeightBC";

/// Parameters of an [`ImposedHeightBC`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImposedHeightConfig {
    /// Equation the condition is applied to
    pub equation: Equation,
    /// Momentum component (required for the momentum equation)
    pub component: Option<Component>,
    /// Imposed height (positive)
    pub h_imposed: f64,
    /// Imposed discharge magnitude, used when all characteristics enter
    pub q_imposed: f64,
    /// Gravitational acceleration
    pub g: f64,
}

impl ImposedHeightConfig {
    /// Condition on the continuity equation.
    pub fn continuity(h_imposed: f64) -> Self {
        Self {
            equation: Equation::Continuity,
            component: None,
            h_imposed,
            q_imposed: 0.0,
            g: STANDARD_GRAVITY,
        }
    }

    /// Condition on one momentum component.
    pub fn momentum(component: Component, h_imposed: f64) -> Self {
        Self {
            equation: Equation::Momentum,
            component: Some(component),
            ..Self::continuity(h_imposed)
        }
    }

    /// Set the discharge used for torrential inflow.
    pub fn with_discharge(mut self, q_imposed: f64) -> Self {
        self.q_imposed = q_imposed;
        self
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }
}

/// Imposed-height boundary condition.
///
/// In the fluvial regime the height is imposed and the outgoing Riemann
/// invariant `v_n + 2c` fixes the normal velocity in closed form:
///
/// ```text
/// v_n,b = v_n + 2 (c - sqrt(g h_imp))
/// ```
///
/// Tangential momentum is taken from the interior.
#[derive(Clone, Debug)]
pub struct ImposedHeightBC {
    equation: Equation,
    component: Component,
    h_imposed: f64,
    q_imposed: f64,
    g: f64,
}

impl ImposedHeightBC {
    /// Validate the configuration against the mesh and coupled fields.
    pub fn new(
        config: ImposedHeightConfig,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        let component = resolve_component(NAME, config.equation, config.component, dimension)?;
        check_open_boundary_fields(NAME, config.equation, dimension, fields)?;
        check_gravity(NAME, config.g)?;
        check_imposed_height(NAME, config.h_imposed)?;
        check_imposed(NAME, "q_imposed", config.q_imposed)?;

        Ok(Self {
            equation: config.equation,
            component,
            h_imposed: config.h_imposed,
            q_imposed: config.q_imposed,
            g: config.g,
        })
    }

    /// Boundary state for the interior trace in `ctx`.
    pub fn boundary_state(&self, ctx: &BoundaryContext) -> BoundaryState {
        let n = ctx.normal;
        let v_n = ctx.interior_normal_velocity();
        let c = ctx.interior_celerity(self.g);
        let regime = FlowRegime::classify(v_n, c);

        match regime {
            FlowRegime::Fluvial => {
                let v_n_b = v_n + 2.0 * (c - (self.g * self.h_imposed).sqrt());
                let q_n = self.h_imposed * v_n_b;
                let q_in = ctx.state.momentum();
                let tangent = n.perp();
                BoundaryState {
                    h: self.h_imposed,
                    q: q_n * n + q_in.dot(tangent) * tangent,
                    regime,
                }
            }
            FlowRegime::TorrentialOutflow => BoundaryState {
                h: ctx.state.h,
                q: ctx.state.momentum(),
                regime,
            },
            FlowRegime::TorrentialInflow => BoundaryState {
                h: self.h_imposed,
                q: -self.q_imposed * n,
                regime,
            },
        }
    }
}

impl SVBoundaryCondition for ImposedHeightBC {
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
        let state = self.boundary_state(ctx);
        match self.equation {
            Equation::Continuity => state.normal_discharge(ctx.normal) * ctx.test,
            Equation::Momentum => {
                state.momentum_flux(ctx.normal, self.component, self.g) * ctx.test
            }
        }
    }
}
