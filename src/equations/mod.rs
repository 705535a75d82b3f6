//! Conservation law definitions.
//!
//! Provides the Saint-Venant equations: physical fluxes, wave speeds and the
//! entropy pair used by the entropy viscosity.

mod saint_venant;

pub use saint_venant::{STANDARD_GRAVITY, SaintVenant};
