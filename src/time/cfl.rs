//! CFL time-step estimate.
//!
//! Every quadrature point of every element bounds the step by
//!
//! ```text
//! dt ≤ cfl · h_cell / (|q| / h + sqrt(g h)),   h_cell = volume^(1/dim)
//! ```
//!
//! The estimate is the minimum over all points. Partial minima from worker
//! threads are merged with [`CflAccumulator::thread_join`] and the result is
//! reduced across processes through a [`GlobalMin`] implementation.

use crate::equations::STANDARD_GRAVITY;
use crate::error::{ConfigError, ConfigResult, check_gravity};
use crate::state::ConservedState;
use crate::types::MeshDimension;

const NAME: &str = "TimeStepCfl";

/// Parameters of the CFL estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CflConfig {
    /// CFL number (default 0.8)
    pub cfl: f64,
    /// Gravitational acceleration
    pub g: f64,
}

impl Default for CflConfig {
    fn default() -> Self {
        Self {
            cfl: 0.8,
            g: STANDARD_GRAVITY,
        }
    }
}

impl CflConfig {
    /// Create a config with the given CFL number.
    pub fn new(cfl: f64) -> Self {
        Self {
            cfl,
            ..Default::default()
        }
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }
}

/// Global minimum across processes.
///
/// The engine supplies the implementation (an all-reduce over ranks, say).
/// Single-process runs use [`SerialReduce`].
pub trait GlobalMin: Send + Sync {
    /// Reduce a local minimum to the global one.
    fn global_min(&self, local: f64) -> f64;
}

/// Identity reduction for single-process runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialReduce;

impl GlobalMin for SerialReduce {
    fn global_min(&self, local: f64) -> f64 {
        local
    }
}

/// One element as seen by the estimator.
#[derive(Clone, Copy, Debug)]
pub struct CflElement<'a> {
    /// Element volume (length in 1D, area in 2D)
    pub volume: f64,
    /// Conserved state at the element's quadrature points
    pub states: &'a [ConservedState],
}

impl<'a> CflElement<'a> {
    /// Create an element view.
    pub fn new(volume: f64, states: &'a [ConservedState]) -> Self {
        Self { volume, states }
    }
}

/// Validated CFL estimator.
#[derive(Clone, Copy, Debug)]
pub struct TimeStepCfl {
    cfl: f64,
    g: f64,
    dimension: MeshDimension,
}

impl TimeStepCfl {
    /// Validate the configuration.
    pub fn new(config: CflConfig, dimension: MeshDimension) -> ConfigResult<Self> {
        check_gravity(NAME, config.g)?;
        if !(config.cfl > 0.0 && config.cfl.is_finite()) {
            return Err(ConfigError::invalid_parameter(
                NAME,
                "cfl",
                config.cfl,
                "must be finite and positive",
            ));
        }
        Ok(Self {
            cfl: config.cfl,
            g: config.g,
            dimension,
        })
    }

    /// CFL number.
    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    /// Bound from a single point.
    ///
    /// The height must be positive; a dry point gives NaN, which the
    /// running minimum ignores.
    #[inline]
    pub fn point_dt(&self, cell_length: f64, state: &ConservedState) -> f64 {
        let speed = state.momentum().length() / state.h + (self.g * state.h).sqrt();
        self.cfl * cell_length / speed
    }

    /// Fresh accumulator at `+∞`.
    pub fn accumulator(&self) -> CflAccumulator {
        CflAccumulator {
            estimator: *self,
            dt: f64::INFINITY,
        }
    }

    /// Serial scan over all elements, reduced through `reducer`.
    pub fn estimate(&self, elements: &[CflElement<'_>], reducer: &dyn GlobalMin) -> f64 {
        let mut acc = self.accumulator();
        for element in elements {
            acc.execute(element.volume, element.states);
        }
        acc.finalize(reducer)
    }

    /// Parallel scan over elements.
    ///
    /// Each rayon worker folds into its own accumulator; partial results are
    /// merged with [`CflAccumulator::thread_join`].
    #[cfg(feature = "parallel")]
    pub fn estimate_parallel(&self, elements: &[CflElement<'_>], reducer: &dyn GlobalMin) -> f64 {
        use rayon::prelude::*;

        elements
            .par_iter()
            .fold(
                || self.accumulator(),
                |mut acc, element| {
                    acc.execute(element.volume, element.states);
                    acc
                },
            )
            .reduce(
                || self.accumulator(),
                |mut a, b| {
                    a.thread_join(&b);
                    a
                },
            )
            .finalize(reducer)
    }
}

/// Running minimum of the CFL bound.
#[derive(Clone, Copy, Debug)]
pub struct CflAccumulator {
    estimator: TimeStepCfl,
    dt: f64,
}

impl CflAccumulator {
    /// Current local minimum.
    pub fn value(&self) -> f64 {
        self.dt
    }

    /// Fold one element into the running minimum.
    pub fn execute(&mut self, volume: f64, states: &[ConservedState]) {
        let cell_length = self.estimator.dimension.cell_length(volume);
        for state in states {
            self.dt = self.dt.min(self.estimator.point_dt(cell_length, state));
        }
    }

    /// Merge a partial result from another thread.
    pub fn thread_join(&mut self, other: &CflAccumulator) {
        self.dt = self.dt.min(other.dt);
    }

    /// Global minimum over all processes.
    pub fn finalize(&self, reducer: &dyn GlobalMin) -> f64 {
        reducer.global_min(self.dt)
    }
}
