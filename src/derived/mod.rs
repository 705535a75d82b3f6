//! Derived fields computed pointwise from the conserved state.
//!
//! These feed output and the entropy viscosity: the engine stores
//! [`EntropyAux`] and the two [`EntropyFluxAux`] components as fields so the
//! viscosity can read their history and gradients.
//!
//! | Field | Value |
//! |-------|-------|
//! | [`VelocityAux`] | q_x / h in 1D, \|q\| / h in 2D |
//! | [`PressureAux`] | ½ g h² |
//! | [`EntropyAux`] | ½ h (g h + \|v\|²) |
//! | [`EntropyFluxAux`] | q_c (g (h + b) + ½ \|v\|²) |

mod fields;

pub use fields::{EntropyAux, EntropyFluxAux, PressureAux, VelocityAux};

use crate::state::ConservedState;

/// Values at one point for a derived field.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuxPoint {
    /// Conserved state
    pub state: ConservedState,
    /// Bathymetry (zero if not coupled)
    pub bathymetry: f64,
}

impl AuxPoint {
    /// Point without bathymetry.
    pub fn new(state: ConservedState) -> Self {
        Self {
            state,
            bathymetry: 0.0,
        }
    }

    /// Set the bathymetry value.
    pub fn with_bathymetry(mut self, bathymetry: f64) -> Self {
        self.bathymetry = bathymetry;
        self
    }
}

/// A scalar field computed from pointwise values.
pub trait DerivedField: Send + Sync {
    /// Name of this field computation for debugging and logging.
    fn name(&self) -> &'static str;

    /// Value at one point.
    fn compute_value(&self, point: &AuxPoint) -> f64;

    /// Evaluate at many points.
    fn compute_into(&self, points: &[AuxPoint], out: &mut Vec<f64>) {
        out.clear();
        out.extend(points.iter().map(|p| self.compute_value(p)));
    }
}
