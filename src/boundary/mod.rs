//! Boundary conditions for the Saint-Venant equations.
//!
//! Boundary conditions contribute an integrated face term at every boundary
//! quadrature point. The open-boundary conditions classify the local Riemann
//! problem by the sign of the characteristic speeds and build a boundary
//! state `(h_b, q_b)` from the interior trace and the imposed data:
//!
//! | BC | Fluvial | Torrential outflow | Torrential inflow |
//! |----|---------|--------------------|-------------------|
//! | [`ImposedDischargeBC`] | h_b by Newton, q_b = -q_imp n | interior | (h_imp, -q_imp n) |
//! | [`ImposedHeightBC`] | h_imp, Riemann invariant for q_n | interior | (h_imp, -q_imp n) |
//! | [`SolidWallBC`] | - | - | - |
//!
//! The solid wall has no regime: the normal velocity is zero and only the
//! hydrostatic pressure remains.
//!
//! # Face residual
//!
//! For the momentum equation all open boundaries return
//!
//! ```text
//! ((q_b·n) q_b,c / h_b + ½ g h_b² n_c) ψ
//! ```
//!
//! The interior height must be positive: the interior velocity is `q / h`
//! without a dry-bed guard. Only the fluvial Newton branch of
//! [`ImposedDischargeBC`] clamps a vanishing boundary height.

mod imposed_discharge;
mod imposed_height;
mod newton;
mod regime;
mod solid_wall;

pub use imposed_discharge::{ImposedDischargeBC, ImposedDischargeConfig};
pub use imposed_height::{ImposedHeightBC, ImposedHeightConfig};
pub use newton::{
    NewtonConfig, NewtonSolution, fluvial_derivative, fluvial_initial_guess, fluvial_residual,
    newton_solve, solve_fluvial_height,
};
pub use regime::FlowRegime;
pub use solid_wall::{SolidWallBC, SolidWallConfig};

use glam::DVec2;

use crate::error::{ConfigError, ConfigResult, check_component};
use crate::kernels::{TrialFunction, Variable};
use crate::state::ConservedState;
use crate::types::{Component, CoupledFields, Equation, FieldName, MeshDimension};

/// Height below which the fluvial discharge boundary is treated as dry.
pub const DRY_HEIGHT: f64 = 1e-12;

/// Classify the flow regime from the interior normal velocity and celerity.
#[inline]
pub fn classify_regime(normal_velocity: f64, celerity: f64) -> FlowRegime {
    FlowRegime::classify(normal_velocity, celerity)
}

/// Values at one boundary quadrature point for one test function.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryContext {
    /// Interior trace of the conserved state
    pub state: ConservedState,
    /// Outward unit normal
    pub normal: DVec2,
    /// Test function value ψ_i
    pub test: f64,
    /// Physical position of the point
    pub position: DVec2,
    /// Current simulation time
    pub time: f64,
}

impl BoundaryContext {
    /// Create a context from the interior trace, normal and test function.
    pub fn new(state: ConservedState, normal: DVec2, test: f64) -> Self {
        Self {
            state,
            normal,
            test,
            ..Default::default()
        }
    }

    /// Set position and time.
    pub fn at(mut self, position: DVec2, time: f64) -> Self {
        self.position = position;
        self.time = time;
        self
    }

    /// Interior normal velocity v_n = (q / h)·n.
    #[inline]
    pub fn interior_normal_velocity(&self) -> f64 {
        self.state.normal_velocity(self.normal)
    }

    /// Interior celerity c = sqrt(g h).
    #[inline]
    pub fn interior_celerity(&self, g: f64) -> f64 {
        self.state.celerity(g)
    }

    /// Regime of the interior trace.
    #[inline]
    pub fn regime(&self, g: f64) -> FlowRegime {
        classify_regime(self.interior_normal_velocity(), self.interior_celerity(g))
    }
}

/// Boundary state built by an open boundary condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryState {
    /// Boundary height h_b
    pub h: f64,
    /// Boundary momentum q_b
    pub q: DVec2,
    /// Regime that produced the state
    pub regime: FlowRegime,
}

impl BoundaryState {
    /// Normal discharge q_b·n.
    #[inline]
    pub fn normal_discharge(&self, normal: DVec2) -> f64 {
        self.q.dot(normal)
    }

    /// Normal momentum flux for one component:
    /// (q_b·n) q_b,c / h_b + ½ g h_b² n_c.
    #[inline]
    pub fn momentum_flux(&self, normal: DVec2, component: Component, g: f64) -> f64 {
        self.normal_discharge(normal) * component.of(self.q) / self.h
            + 0.5 * g * self.h * self.h * component.of(normal)
    }

    /// The state as conserved variables.
    pub fn to_conserved(&self) -> ConservedState {
        ConservedState::from_momentum(self.h, self.q)
    }
}

/// A boundary condition of the Saint-Venant system.
///
/// Implementations must be thread-safe (`Send + Sync`): the engine evaluates
/// boundary faces concurrently.
pub trait SVBoundaryCondition: Send + Sync {
    /// Name of this boundary condition for debugging and logging.
    fn name(&self) -> &'static str;

    /// The equation this condition contributes to.
    fn equation(&self) -> Equation;

    /// The unknown whose test functions this condition contributes to.
    fn variable(&self) -> Variable;

    /// Face residual contribution for test function i.
    fn residual(&self, ctx: &BoundaryContext) -> f64;

    /// Derivative of the residual w.r.t. the condition's own variable.
    fn jacobian(&self, _ctx: &BoundaryContext, _trial: &TrialFunction) -> f64 {
        0.0
    }

    /// Derivative of the residual w.r.t. another unknown.
    fn off_diag_jacobian(
        &self,
        _ctx: &BoundaryContext,
        _trial: &TrialFunction,
        _jvar: Variable,
    ) -> f64 {
        0.0
    }
}

/// Resolve the component a boundary condition acts on.
///
/// Momentum needs a component that exists on the mesh. The continuity
/// equation ignores it.
fn resolve_component(
    object: &'static str,
    equation: Equation,
    component: Option<Component>,
    dimension: MeshDimension,
) -> ConfigResult<Component> {
    match (equation, component) {
        (Equation::Momentum, None) => Err(ConfigError::MissingComponent { object }),
        (Equation::Momentum, Some(component)) => {
            check_component(object, component, dimension)?;
            Ok(component)
        }
        (Equation::Continuity, component) => Ok(component.unwrap_or_default()),
    }
}

/// Coupled fields shared by the open boundary conditions.
fn check_open_boundary_fields(
    object: &'static str,
    equation: Equation,
    dimension: MeshDimension,
    fields: &CoupledFields,
) -> ConfigResult<()> {
    if equation == Equation::Momentum {
        fields.require(object, FieldName::QX, "for the momentum equation")?;
        fields.require(object, FieldName::H, "for the momentum equation")?;
    }
    fields.check_q_y(object, dimension)
}

/// Reject negative (or NaN) imposed data.
fn check_imposed(object: &'static str, name: &'static str, value: f64) -> ConfigResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid_parameter(
            object,
            name,
            value,
            "imposed values must be non-negative",
        ))
    }
}

/// Reject a non-positive (or NaN) imposed height.
fn check_imposed_height(object: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid_parameter(
            object,
            "h_imposed",
            value,
            "imposed height must be positive",
        ))
    }
}

fn variable_for(equation: Equation, component: Component) -> Variable {
    match equation {
        Equation::Continuity => Variable::H,
        Equation::Momentum => Variable::momentum(component),
    }
}
