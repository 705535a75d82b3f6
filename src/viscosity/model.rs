//! Per-quadrature-point artificial viscosity.
//!
//! Three strategies are available:
//!
//! - `None`: κ = 0
//! - `FirstOrder`: κ = κ_max = C_max h_cell (|v| + sqrt(g h))
//! - `Entropy`: κ = min(κ_max, (C_E |R_E| + C_J J) h_cell² / c²)
//!
//! where R_E is the entropy residual ∂E/∂t + ∇·F_E, with ∂E/∂t estimated by a
//! variable-step BDF2 difference, J is the inter-element jump of the entropy
//! flux and c² = g (|h| + b + ε).
//!
//! # References
//! - Guermond, Pasquetti & Popov (2011), "Entropy viscosity method for
//!   nonlinear conservation laws"

use glam::DVec2;

use crate::state::ConservedState;

/// Viscosity strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViscosityStrategy {
    /// No artificial viscosity
    #[default]
    None,
    /// First-order viscosity everywhere (the stability ceiling)
    FirstOrder,
    /// Entropy-residual viscosity capped by the first-order ceiling
    Entropy,
}

/// Coefficients of the viscosity model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViscosityCoefficients {
    /// First-order coefficient C_max (default 0.5)
    pub c_max: f64,
    /// Entropy residual coefficient C_E (default 1.0)
    pub c_entropy: f64,
    /// Jump coefficient C_J (default 1.0)
    pub c_jump: f64,
}

impl Default for ViscosityCoefficients {
    fn default() -> Self {
        Self {
            c_max: 0.5,
            c_entropy: 1.0,
            c_jump: 1.0,
        }
    }
}

/// Time-step bookkeeping supplied by the time integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeStepInfo {
    /// One-based index of the current time step
    pub step: usize,
    /// Current simulation time
    pub time: f64,
    /// Current step size
    pub dt: f64,
    /// Previous step size
    pub dt_old: f64,
}

impl TimeStepInfo {
    /// Create time-step information.
    pub fn new(step: usize, time: f64, dt: f64, dt_old: f64) -> Self {
        Self {
            step,
            time,
            dt,
            dt_old,
        }
    }

    /// The first step of a run has no entropy history.
    #[inline]
    pub fn is_first_step(&self) -> bool {
        self.step <= 1
    }
}

/// Variable-step BDF2 weights for a first derivative.
///
/// With dt = t_n - t_{n-1} and dt_old = t_{n-1} - t_{n-2}:
///
/// ∂E/∂t ≈ w0 E_n + w1 E_{n-1} + w2 E_{n-2}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bdf2Weights {
    pub w0: f64,
    pub w1: f64,
    pub w2: f64,
}

impl Bdf2Weights {
    /// Compute the weights for step sizes dt and dt_old.
    pub fn new(dt: f64, dt_old: f64) -> Self {
        debug_assert!(dt > 0.0 && dt_old > 0.0, "BDF2 needs positive step sizes");
        let sum = dt + dt_old;
        Self {
            w0: (2.0 * dt + dt_old) / (dt * sum),
            w1: -sum / (dt * dt_old),
            w2: dt / (dt_old * sum),
        }
    }

    /// Apply the weights to three time levels.
    #[inline]
    pub fn apply(&self, current: f64, old: f64, older: f64) -> f64 {
        self.w0 * current + self.w1 * old + self.w2 * older
    }
}

/// Entropy data at one quadrature point, owned by the time integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntropyHistory {
    /// E at the current time level
    pub current: f64,
    /// E at the previous time level
    pub old: f64,
    /// E two time levels back
    pub older: f64,
    /// Gradient of the x entropy flux F
    pub grad_flux_x: DVec2,
    /// Gradient of the y entropy flux G (zero in 1D)
    pub grad_flux_y: DVec2,
    /// Jump of the entropy flux across element faces (zero unless
    /// `jump_entropy_flux` is coupled)
    pub jump: f64,
}

impl EntropyHistory {
    /// ∇·F_E = ∂F/∂x + ∂G/∂y.
    #[inline]
    pub fn flux_divergence(&self) -> f64 {
        self.grad_flux_x.x + self.grad_flux_y.y
    }
}

/// Field values the viscosity needs at one quadrature point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViscosityQp {
    /// Conserved state
    pub state: ConservedState,
    /// Bottom elevation b (zero if not coupled)
    pub bathymetry: f64,
    /// Entropy history (only read by the entropy strategy)
    pub entropy: EntropyHistory,
}

impl ViscosityQp {
    /// Create quadrature-point input without bathymetry or entropy data.
    pub fn new(state: ConservedState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// Set the bottom elevation.
    pub fn with_bathymetry(mut self, bathymetry: f64) -> Self {
        self.bathymetry = bathymetry;
        self
    }

    /// Set the entropy history.
    pub fn with_entropy(mut self, entropy: EntropyHistory) -> Self {
        self.entropy = entropy;
        self
    }
}

/// Per-element constants, computed once per element visit.
///
/// Kept local to the evaluation of one element so concurrent element
/// evaluations never share it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementScratch {
    /// Characteristic cell length volume^(1/dim)
    pub cell_length: f64,
    /// First-order coefficient in effect for this element
    pub c_max: f64,
}

/// Viscosity at one quadrature point, exposed as "kappa", "kappa_max" and
/// "residual".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViscosityEvaluation {
    /// Artificial viscosity κ
    pub kappa: f64,
    /// First-order ceiling κ_max
    pub kappa_max: f64,
    /// |entropy residual| (zero unless the entropy strategy ran past step 1)
    pub residual: f64,
}

/// Viscosity model: strategy, gravity and coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViscosityModel {
    /// Selected strategy
    pub strategy: ViscosityStrategy,
    /// Gravitational acceleration
    pub g: f64,
    /// Model coefficients
    pub coefficients: ViscosityCoefficients,
}

impl ViscosityModel {
    /// Floor in the c² normalisation, sqrt of the smallest normal f64.
    pub const NORMALIZATION_EPS: f64 = 1.4916681462400413e-154;

    /// First-order ceiling C_max h_cell (|v| + sqrt(g h)).
    #[inline]
    pub fn kappa_max(&self, state: &ConservedState, scratch: &ElementScratch) -> f64 {
        scratch.c_max * scratch.cell_length * state.max_wave_speed(self.g)
    }

    /// Evaluate the viscosity at one quadrature point.
    pub fn evaluate(
        &self,
        qp: &ViscosityQp,
        scratch: &ElementScratch,
        time: &TimeStepInfo,
    ) -> ViscosityEvaluation {
        let kappa_max = self.kappa_max(&qp.state, scratch);

        match self.strategy {
            ViscosityStrategy::None => ViscosityEvaluation {
                kappa: 0.0,
                kappa_max,
                residual: 0.0,
            },
            ViscosityStrategy::FirstOrder => ViscosityEvaluation {
                kappa: kappa_max,
                kappa_max,
                residual: 0.0,
            },
            ViscosityStrategy::Entropy if time.is_first_step() => ViscosityEvaluation {
                kappa: kappa_max,
                kappa_max,
                residual: 0.0,
            },
            ViscosityStrategy::Entropy => {
                let e = &qp.entropy;
                let weights = Bdf2Weights::new(time.dt, time.dt_old);
                let residual =
                    (weights.apply(e.current, e.old, e.older) + e.flux_divergence()).abs();

                // c² normalisation
                let norm = self.g * (qp.state.h.abs() + qp.bathymetry + Self::NORMALIZATION_EPS);

                let c = &self.coefficients;
                let kappa_e = (c.c_entropy * residual + c.c_jump * e.jump)
                    * scratch.cell_length
                    * scratch.cell_length
                    / norm;
                debug_assert!(kappa_e >= 0.0, "entropy viscosity is negative: {kappa_e}");

                ViscosityEvaluation {
                    kappa: kappa_max.min(kappa_e),
                    kappa_max,
                    residual,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const G: f64 = 9.80665;

    fn model(strategy: ViscosityStrategy) -> ViscosityModel {
        ViscosityModel {
            strategy,
            g: G,
            coefficients: ViscosityCoefficients::default(),
        }
    }

    fn scratch() -> ElementScratch {
        ElementScratch {
            cell_length: 0.1,
            c_max: 0.5,
        }
    }

    #[test]
    fn test_eps_is_sqrt_min_positive() {
        assert_relative_eq!(
            ViscosityModel::NORMALIZATION_EPS,
            f64::MIN_POSITIVE.sqrt(),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_bdf2_weights_constant_step() {
        // Constant step: (3/2, -2, 1/2) / dt
        let w = Bdf2Weights::new(0.1, 0.1);
        assert_relative_eq!(w.w0, 15.0, epsilon = 1e-12);
        assert_relative_eq!(w.w1, -20.0, epsilon = 1e-12);
        assert_relative_eq!(w.w2, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bdf2_exact_for_quadratics() {
        // E(t) = 3 t² - t + 2, E'(t) = 6 t - 1
        let e = |t: f64| 3.0 * t * t - t + 2.0;
        let (t, dt, dt_old) = (1.0, 0.2, 0.05);
        let w = Bdf2Weights::new(dt, dt_old);
        let derivative = w.apply(e(t), e(t - dt), e(t - dt - dt_old));
        assert_relative_eq!(derivative, 6.0 * t - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_none_strategy() {
        let qp = ViscosityQp::new(ConservedState::new(1.0, 1.0, 0.0));
        let time = TimeStepInfo::new(3, 1.0, 0.1, 0.1);
        let out = model(ViscosityStrategy::None).evaluate(&qp, &scratch(), &time);
        assert_eq!(out.kappa, 0.0);
        assert!(out.kappa_max > 0.0);
    }

    #[test]
    fn test_first_order_ceiling() {
        let qp = ViscosityQp::new(ConservedState::new(1.0, 1.0, 0.0));
        let out = model(ViscosityStrategy::FirstOrder).evaluate(
            &qp,
            &scratch(),
            &TimeStepInfo::new(1, 0.0, 0.1, 0.1),
        );
        let expected = 0.5 * 0.1 * (1.0 + G.sqrt());
        assert_relative_eq!(out.kappa, expected, epsilon = 1e-14);
        assert_eq!(out.kappa, out.kappa_max);
    }

    #[test]
    fn test_first_order_monotone_in_speed_and_height() {
        let m = model(ViscosityStrategy::FirstOrder);
        let time = TimeStepInfo::new(2, 0.0, 0.1, 0.1);
        let kappa = |h: f64, speed: f64| {
            let qp = ViscosityQp::new(ConservedState::from_primitives(h, 0.6 * speed, -0.8 * speed));
            let out = m.evaluate(&qp, &scratch(), &time);
            assert_eq!(out.kappa, out.kappa_max);
            out.kappa
        };

        for h in [0.01, 0.5, 2.0, 40.0] {
            let mut previous = 0.0;
            for k in 0..=50 {
                let value = kappa(h, 0.2 * k as f64);
                assert!(value >= previous, "h = {h}, |v| = {}", 0.2 * k as f64);
                previous = value;
            }
        }

        for speed in [0.0, 1.0, 15.0] {
            let mut previous = 0.0;
            for k in 1..=50 {
                let h = 0.1 * k as f64;
                let value = kappa(h, speed);
                assert!(value >= previous, "|v| = {speed}, h = {h}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_entropy_first_step_falls_back() {
        let qp = ViscosityQp::new(ConservedState::new(1.0, 0.5, 0.5)).with_entropy(EntropyHistory {
            current: 100.0,
            ..Default::default()
        });
        let out = model(ViscosityStrategy::Entropy).evaluate(
            &qp,
            &scratch(),
            &TimeStepInfo::new(1, 0.0, 0.1, 0.0),
        );
        assert_eq!(out.kappa, out.kappa_max);
        assert_eq!(out.residual, 0.0);
    }

    #[test]
    fn test_entropy_smooth_region_is_small() {
        // Steady entropy with zero flux divergence: residual vanishes
        let entropy = EntropyHistory {
            current: 4.9,
            old: 4.9,
            older: 4.9,
            ..Default::default()
        };
        let qp = ViscosityQp::new(ConservedState::new(1.0, 0.0, 0.0)).with_entropy(entropy);
        let out = model(ViscosityStrategy::Entropy).evaluate(
            &qp,
            &scratch(),
            &TimeStepInfo::new(5, 1.0, 0.01, 0.01),
        );
        assert!(out.residual < 1e-9);
        assert!(out.kappa < 1e-9);
    }

    #[test]
    fn test_entropy_value() {
        let entropy = EntropyHistory {
            current: 2.0,
            old: 1.0,
            older: 1.0,
            grad_flux_x: DVec2::new(0.5, 7.0),
            grad_flux_y: DVec2::new(7.0, 0.25),
            jump: 0.1,
        };
        let qp = ViscosityQp::new(ConservedState::new(1.0, 0.0, 0.0))
            .with_bathymetry(0.5)
            .with_entropy(entropy);
        let time = TimeStepInfo::new(4, 1.0, 0.1, 0.1);
        let out = model(ViscosityStrategy::Entropy).evaluate(&qp, &scratch(), &time);

        // w0*2 + w1*1 + w2*1 = 30 - 20 + 5 = 15, plus divergence 0.75
        assert_relative_eq!(out.residual, 15.75, epsilon = 1e-10);
        let kappa_e = (15.75 + 0.1) * 0.01 / (G * 1.5);
        let kappa_max = 0.5 * 0.1 * G.sqrt();
        assert_relative_eq!(out.kappa, kappa_e.min(kappa_max), epsilon = 1e-12);
    }

    #[test]
    fn test_entropy_capped_by_first_order() {
        let entropy = EntropyHistory {
            current: 1e6,
            old: 0.0,
            older: 0.0,
            jump: 1e3,
            ..Default::default()
        };
        let qp = ViscosityQp::new(ConservedState::new(1.0, 2.0, 0.0)).with_entropy(entropy);
        let out = model(ViscosityStrategy::Entropy).evaluate(
            &qp,
            &scratch(),
            &TimeStepInfo::new(2, 0.2, 0.1, 0.1),
        );
        assert_eq!(out.kappa, out.kappa_max);
    }
}
