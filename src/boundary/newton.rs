//! Newton iteration for the fluvial boundary height.
//!
//! With a prescribed inflow discharge q and the outgoing Riemann invariant
//! v_n + 2c carried from the interior, the boundary height h solves
//!
//! f(h) = 2 sqrt(g h) h - q - (v_n + 2c) h = 0
//! f'(h) = 3 sqrt(g h) - v_n - 2c
//!
//! f is convex on h > 0 with f(0) = -q ≤ 0, so it has exactly one root to the
//! right of its minimum. Newton started right of the minimum converges to it.
//! The dry root h = 0 of the q = 0 case is never reached.

use crate::error::{ConfigError, ConfigResult};

/// Newton iteration controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonConfig {
    /// Maximum number of iterations (default 10)
    pub max_iterations: usize,
    /// Absolute tolerance on the update |Δh| (default 1e-12)
    pub abs_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            abs_tol: 1e-12,
        }
    }
}

impl NewtonConfig {
    /// Create Newton controls.
    pub fn new(max_iterations: usize, abs_tol: f64) -> Self {
        Self {
            max_iterations,
            abs_tol,
        }
    }

    pub(crate) fn validate(&self, object: &'static str) -> ConfigResult<()> {
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid_parameter(
                object,
                "newton_max",
                0.0,
                "at least one iteration is required",
            ));
        }
        if !(self.abs_tol > 0.0 && self.abs_tol.is_finite()) {
            return Err(ConfigError::invalid_parameter(
                object,
                "newton_abs_tol",
                self.abs_tol,
                "must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Outcome of a Newton solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSolution {
    /// Last iterate
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Size of the last update |Δh|
    pub last_step: f64,
    /// Whether |Δh| dropped below the tolerance
    pub converged: bool,
}

/// Scalar Newton iteration on `f`, which returns (f(x), f'(x)).
///
/// Stops when |Δx| < `abs_tol`, or after `max_iterations` with
/// `converged = false`. A zero or non-finite derivative also stops the
/// iteration at the current iterate.
pub fn newton_solve<F>(f: F, x0: f64, config: &NewtonConfig) -> NewtonSolution
where
    F: Fn(f64) -> (f64, f64),
{
    let mut x = x0;
    let mut last_step = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let (value, derivative) = f(x);
        if derivative == 0.0 || !derivative.is_finite() || !value.is_finite() {
            return NewtonSolution {
                value: x,
                iterations: iteration - 1,
                last_step,
                converged: false,
            };
        }

        let next = x - value / derivative;
        last_step = (next - x).abs();
        x = next;

        if last_step < config.abs_tol {
            return NewtonSolution {
                value: x,
                iterations: iteration,
                last_step,
                converged: true,
            };
        }
    }

    NewtonSolution {
        value: x,
        iterations: config.max_iterations,
        last_step,
        converged: false,
    }
}

/// f(h) for the fluvial imposed-discharge problem.
#[inline]
pub fn fluvial_residual(h: f64, q_imposed: f64, normal_velocity: f64, celerity: f64, g: f64) -> f64 {
    2.0 * (g * h).sqrt() * h - q_imposed - (normal_velocity + 2.0 * celerity) * h
}

/// f'(h) for the fluvial imposed-discharge problem.
#[inline]
pub fn fluvial_derivative(h: f64, normal_velocity: f64, celerity: f64, g: f64) -> f64 {
    3.0 * (g * h).sqrt() - normal_velocity - 2.0 * celerity
}

/// Initial guess 2 (q / sqrt(g))^(2/3) + 1, raised to at least the root for
/// q = 0.
///
/// The zero-discharge root ((v_n + 2c) / 2)² / g lies right of the minimum
/// of f and left of the root for any q ≥ 0, so the iteration never starts on
/// the decreasing branch.
pub fn fluvial_initial_guess(q_imposed: f64, normal_velocity: f64, celerity: f64, g: f64) -> f64 {
    let h0 = 2.0 * (q_imposed / g.sqrt()).powf(2.0 / 3.0) + 1.0;
    let invariant = 0.5 * (normal_velocity + 2.0 * celerity);
    h0.max(invariant * invariant / g)
}

/// Solve for the fluvial boundary height.
pub fn solve_fluvial_height(
    q_imposed: f64,
    normal_velocity: f64,
    celerity: f64,
    g: f64,
    config: &NewtonConfig,
) -> NewtonSolution {
    let h0 = fluvial_initial_guess(q_imposed, normal_velocity, celerity, g);
    newton_solve(
        |h| {
            (
                fluvial_residual(h, q_imposed, normal_velocity, celerity, g),
                fluvial_derivative(h, normal_velocity, celerity, g),
            )
        },
        h0,
        config,
    )
}
