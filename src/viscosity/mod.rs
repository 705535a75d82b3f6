//! Shock-capturing artificial viscosity.
//!
//! The viscosity κ feeds [`SVArtificialViscosity`](crate::kernels::SVArtificialViscosity).
//! It is recomputed at every evaluation from the current state and, for the
//! entropy strategy, from the entropy history owned by the time integrator.
//!
//! | Strategy | κ |
//! |----------|---|
//! | `None` | 0 |
//! | `FirstOrder` | κ_max = C_max h_cell (\|v\| + sqrt(g h)) |
//! | `Entropy` | min(κ_max, (C_E \|R_E\| + C_J J) h_cell² / c²) |
//!
//! The entropy strategy falls back to κ_max on the first time step, when no
//! history exists yet.

mod material;
mod model;

pub use material::{MaterialConfig, MaterialElement, SVMaterial};
pub use model::{
    Bdf2Weights, ElementScratch, EntropyHistory, TimeStepInfo, ViscosityCoefficients,
    ViscosityEvaluation, ViscosityModel, ViscosityQp, ViscosityStrategy,
};
