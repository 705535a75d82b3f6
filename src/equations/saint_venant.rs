//! The Saint-Venant (shallow water) equations.
//!
//! ∂h/∂t + ∇·q = 0                                       (continuity)
//! ∂q/∂t + ∇·(q ⊗ q / h) + ∇(g h² / 2) = -g h ∇b          (momentum)
//!
//! where:
//! - h = water height
//! - q = (q_x, q_y) = momentum
//! - g = gravitational acceleration
//! - b = bottom elevation (bathymetry)
//!
//! # Flux formulation
//!
//! F(q) = [q_x, q_x²/h + gh²/2, q_x q_y/h]ᵀ  (x-direction flux)
//! G(q) = [q_y, q_x q_y/h, q_y²/h + gh²/2]ᵀ  (y-direction flux)
//!
//! # Entropy pair
//!
//! E = ½ h (g h + |v|²)
//! F_E = q (g (h + b) + ½ |v|²)
//!
//! The entropy residual ∂E/∂t + ∇·F_E drives the entropy viscosity.

use glam::DVec2;

use crate::error::{ConfigResult, check_gravity};
use crate::state::ConservedState;
use crate::types::Component;

/// Standard gravity (m/s²), the default for every component.
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Saint-Venant equations parameterised by gravity.
///
/// # Example
///
/// ```
/// use sv_rs::equations::SaintVenant;
/// use sv_rs::ConservedState;
///
/// let sv = SaintVenant::standard();
/// let state = ConservedState::from_primitives(2.0, 1.0, 0.5);
/// let fx = sv.flux_x(&state);
/// assert!((fx.h - 2.0).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaintVenant {
    /// Gravitational acceleration
    pub g: f64,
}

impl SaintVenant {
    /// Create with a given gravity constant, rejecting negative values.
    pub fn new(g: f64) -> ConfigResult<Self> {
        check_gravity("SaintVenant", g)?;
        Ok(Self { g })
    }

    /// Create with standard gravity.
    pub fn standard() -> Self {
        Self { g: STANDARD_GRAVITY }
    }

    /// Hydrostatic pressure term g h² / 2.
    #[inline]
    pub fn pressure(&self, h: f64) -> f64 {
        0.5 * self.g * h * h
    }

    /// Physical flux in the x-direction.
    pub fn flux_x(&self, q: &ConservedState) -> ConservedState {
        let u = q.q_x / q.h;
        ConservedState {
            h: q.q_x,
            q_x: q.q_x * u + self.pressure(q.h),
            q_y: q.q_y * u,
        }
    }

    /// Physical flux in the y-direction.
    pub fn flux_y(&self, q: &ConservedState) -> ConservedState {
        let v = q.q_y / q.h;
        ConservedState {
            h: q.q_y,
            q_x: q.q_x * v,
            q_y: q.q_y * v + self.pressure(q.h),
        }
    }

    /// Normal flux F·n through a face with unit normal n.
    pub fn normal_flux(&self, q: &ConservedState, normal: DVec2) -> ConservedState {
        self.flux_x(q) * normal.x + self.flux_y(q) * normal.y
    }

    /// Maximum local wave speed |v| + sqrt(g h).
    #[inline]
    pub fn max_wave_speed(&self, q: &ConservedState) -> f64 {
        q.max_wave_speed(self.g)
    }

    /// Entropy functional E = ½ h (g h + |v|²).
    pub fn entropy(&self, q: &ConservedState) -> f64 {
        let v = q.velocity();
        0.5 * q.h * (self.g * q.h + v.length_squared())
    }

    /// One component of the entropy flux q_comp (g (h + b) + ½ |v|²).
    pub fn entropy_flux(&self, q: &ConservedState, bathymetry: f64, component: Component) -> f64 {
        let v = q.velocity();
        component.of(q.momentum()) * (self.g * (q.h + bathymetry) + 0.5 * v.length_squared())
    }
}

impl Default for SaintVenant {
    fn default() -> Self {
        Self::standard()
    }
}
