//! Conserved state of the Saint-Venant system at a quadrature point.
//!
//! The state is (h, q_x, q_y) where:
//! - h = water height
//! - q_x = x-momentum (h * u)
//! - q_y = y-momentum (h * v), identically zero on 1D meshes
//!
//! Velocities are derived as v = q / h. This division is not guarded:
//! every formula that uses it assumes the height is bounded away from zero.
//! Only the fluvial branch of [`ImposedDischargeBC`](crate::boundary::ImposedDischargeBC)
//! clamps a near-dry boundary height.

use std::ops::{Add, Mul, Sub};

use glam::DVec2;

/// Conserved variables (h, q_x, q_y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConservedState {
    /// Water height h (positive away from a dry bed)
    pub h: f64,
    /// x-momentum q_x = h * u
    pub q_x: f64,
    /// y-momentum q_y = h * v
    pub q_y: f64,
}

impl ConservedState {
    /// Create a new state.
    #[inline(always)]
    pub fn new(h: f64, q_x: f64, q_y: f64) -> Self {
        Self { h, q_x, q_y }
    }

    /// Create a 1D state (q_y = 0).
    #[inline(always)]
    pub fn new_1d(h: f64, q_x: f64) -> Self {
        Self { h, q_x, q_y: 0.0 }
    }

    /// Create a state from primitive variables (h, u, v).
    #[inline(always)]
    pub fn from_primitives(h: f64, u: f64, v: f64) -> Self {
        Self {
            h,
            q_x: h * u,
            q_y: h * v,
        }
    }

    /// Build a state from a height and a momentum vector.
    #[inline(always)]
    pub fn from_momentum(h: f64, q: DVec2) -> Self {
        Self { h, q_x: q.x, q_y: q.y }
    }

    /// Zero state.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Momentum vector q = (q_x, q_y).
    #[inline(always)]
    pub fn momentum(&self) -> DVec2 {
        DVec2::new(self.q_x, self.q_y)
    }

    /// Velocity vector v = q / h.
    #[inline(always)]
    pub fn velocity(&self) -> DVec2 {
        self.momentum() / self.h
    }

    /// Speed |v| = |q| / h.
    #[inline(always)]
    pub fn speed(&self) -> f64 {
        self.momentum().length() / self.h
    }

    /// Normal velocity v·n for an outward unit normal.
    #[inline(always)]
    pub fn normal_velocity(&self, normal: DVec2) -> f64 {
        self.velocity().dot(normal)
    }

    /// Gravity wave celerity c = sqrt(g h).
    #[inline(always)]
    pub fn celerity(&self, g: f64) -> f64 {
        (g * self.h).sqrt()
    }

    /// Largest local eigenvalue |v| + sqrt(g h).
    #[inline(always)]
    pub fn max_wave_speed(&self, g: f64) -> f64 {
        self.speed() + self.celerity(g)
    }

    /// Froude number |v| / c.
    pub fn froude_number(&self, g: f64) -> f64 {
        let c = self.celerity(g);
        if c > 0.0 { self.speed() / c } else { 0.0 }
    }

    /// Drop the y-momentum (coupled-or-zero rule for 1D meshes).
    #[inline(always)]
    pub fn without_y(self) -> Self {
        Self { q_y: 0.0, ..self }
    }

    /// Convert to array representation [h, q_x, q_y].
    #[inline(always)]
    pub fn to_array(&self) -> [f64; 3] {
        [self.h, self.q_x, self.q_y]
    }

    /// Create from array representation [h, q_x, q_y].
    #[inline(always)]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            h: arr[0],
            q_x: arr[1],
            q_y: arr[2],
        }
    }
}

impl Add for ConservedState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            h: self.h + other.h,
            q_x: self.q_x + other.q_x,
            q_y: self.q_y + other.q_y,
        }
    }
}

impl Sub for ConservedState {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            h: self.h - other.h,
            q_x: self.q_x - other.q_x,
            q_y: self.q_y - other.q_y,
        }
    }
}

impl Mul<f64> for ConservedState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            h: self.h * scalar,
            q_x: self.q_x * scalar,
            q_y: self.q_y * scalar,
        }
    }
}

impl Mul<ConservedState> for f64 {
    type Output = ConservedState;

    fn mul(self, state: ConservedState) -> ConservedState {
        state * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const G: f64 = 9.80665;

    #[test]
    fn test_primitives() {
        let s = ConservedState::from_primitives(2.0, 3.0, -1.0);
        assert_eq!(s.q_x, 6.0);
        assert_eq!(s.q_y, -2.0);
        assert_relative_eq!(s.velocity().x, 3.0);
        assert_relative_eq!(s.velocity().y, -1.0);
    }

    #[test]
    fn test_wave_speed() {
        let s = ConservedState::new(1.0, 1.0, 0.0);
        assert_relative_eq!(s.celerity(G), G.sqrt());
        assert_relative_eq!(s.max_wave_speed(G), 1.0 + G.sqrt());
    }

    #[test]
    fn test_normal_velocity() {
        let s = ConservedState::from_primitives(1.0, 1.0, 2.0);
        let n = DVec2::new(0.6, 0.8);
        assert_relative_eq!(s.normal_velocity(n), 0.6 + 1.6, epsilon = 1e-14);
    }

    #[test]
    fn test_froude() {
        let s = ConservedState::from_primitives(1.0, 2.0 * G.sqrt(), 0.0);
        assert_relative_eq!(s.froude_number(G), 2.0, epsilon = 1e-12);
        assert_eq!(ConservedState::zero().froude_number(G), 0.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = ConservedState::new(1.0, 2.0, 3.0);
        let b = ConservedState::new(0.5, 0.5, 0.5);
        assert_eq!((a + b).to_array(), [1.5, 2.5, 3.5]);
        assert_eq!((a - b).to_array(), [0.5, 1.5, 2.5]);
        assert_eq!((2.0 * a).to_array(), [2.0, 4.0, 6.0]);
        assert_eq!(ConservedState::from_array(a.to_array()), a);
        assert_eq!(a.without_y().q_y, 0.0);
    }
}
