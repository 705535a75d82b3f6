//! Element-level evaluation of the artificial viscosity.
//!
//! [`SVMaterial`] validates the coupled fields once, then evaluates the
//! [`ViscosityModel`] at every quadrature point of an element. The cell length
//! (and the warm-up coefficient, if enabled) is computed once per element and
//! never stored on the material, so one material can serve many threads.

use crate::equations::STANDARD_GRAVITY;
use crate::error::{ConfigError, ConfigResult, check_gravity};
use crate::types::{CoupledFields, FieldName, MeshDimension};

use super::model::{
    ElementScratch, TimeStepInfo, ViscosityCoefficients, ViscosityEvaluation, ViscosityModel,
    ViscosityQp, ViscosityStrategy,
};

const OBJECT: &str = "SVMaterial";

/// Amplification of C_max at the start of a warm-up period.
const WARM_UP_FACTOR: f64 = 10.0;

/// Configuration for [`SVMaterial`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialConfig {
    /// Viscosity strategy
    pub strategy: ViscosityStrategy,
    /// Gravitational acceleration (default 9.80665)
    pub g: f64,
    /// Viscosity coefficients
    pub coefficients: ViscosityCoefficients,
    /// Length of the start-up period with amplified C_max
    pub extra_duration: Option<f64>,
}

impl MaterialConfig {
    /// Create a configuration with default coefficients.
    pub fn new(strategy: ViscosityStrategy) -> Self {
        Self {
            strategy,
            g: STANDARD_GRAVITY,
            coefficients: ViscosityCoefficients::default(),
            extra_duration: None,
        }
    }

    /// Set the gravity constant.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    /// Set the first-order coefficient.
    pub fn with_c_max(mut self, c_max: f64) -> Self {
        self.coefficients.c_max = c_max;
        self
    }

    /// Set the entropy residual coefficient.
    pub fn with_c_entropy(mut self, c_entropy: f64) -> Self {
        self.coefficients.c_entropy = c_entropy;
        self
    }

    /// Set the jump coefficient.
    pub fn with_c_jump(mut self, c_jump: f64) -> Self {
        self.coefficients.c_jump = c_jump;
        self
    }

    /// Amplify C_max tenfold at t = 0, decaying linearly to nominal at
    /// `extra_duration`.
    pub fn with_warm_up(mut self, extra_duration: f64) -> Self {
        self.extra_duration = Some(extra_duration);
        self
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self::new(ViscosityStrategy::default())
    }
}

/// One element handed to the material by the assembly engine.
#[derive(Clone, Copy, Debug)]
pub struct MaterialElement<'a> {
    /// Element volume (length in 1D, area in 2D)
    pub volume: f64,
    /// Quadrature point inputs
    pub qps: &'a [ViscosityQp],
}

impl<'a> MaterialElement<'a> {
    /// Wrap an element's data.
    pub fn new(volume: f64, qps: &'a [ViscosityQp]) -> Self {
        Self { volume, qps }
    }
}

/// Artificial viscosity material.
///
/// # Example
///
/// ```
/// use sv_rs::types::{CoupledFields, MeshDimension};
/// use sv_rs::viscosity::{
///     MaterialConfig, MaterialElement, SVMaterial, TimeStepInfo, ViscosityQp, ViscosityStrategy,
/// };
/// use sv_rs::ConservedState;
///
/// let dim = MeshDimension::Two;
/// let material = SVMaterial::new(
///     MaterialConfig::new(ViscosityStrategy::FirstOrder),
///     dim,
///     &CoupledFields::conserved(dim),
/// )
/// .unwrap();
///
/// let qps = [ViscosityQp::new(ConservedState::new(1.0, 0.5, 0.0))];
/// let props = material.compute_properties(
///     &MaterialElement::new(0.01, &qps),
///     &TimeStepInfo::new(1, 0.0, 1e-3, 1e-3),
/// );
/// assert!(props[0].kappa > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct SVMaterial {
    model: ViscosityModel,
    dimension: MeshDimension,
    has_b: bool,
    has_jump: bool,
    extra_duration: Option<f64>,
}

impl SVMaterial {
    /// Create a material, validating the configuration and coupled fields.
    pub fn new(
        config: MaterialConfig,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        check_gravity(OBJECT, config.g)?;
        fields.require(OBJECT, FieldName::H, "for the viscosity")?;
        fields.require(OBJECT, FieldName::QX, "for the viscosity")?;
        fields.check_q_y(OBJECT, dimension)?;

        if config.strategy == ViscosityStrategy::Entropy {
            let reason = "for viscosity_type = ENTROPY";
            fields.require(OBJECT, FieldName::Entropy, reason)?;
            fields.require(OBJECT, FieldName::EntropyFluxX, reason)?;
            if dimension.has_y() {
                fields.require(OBJECT, FieldName::EntropyFluxY, "for viscosity_type = ENTROPY in 2D")?;
            } else {
                fields.forbid(OBJECT, FieldName::EntropyFluxY, "for viscosity_type = ENTROPY in 1D")?;
            }
        }

        let c = &config.coefficients;
        for (name, value) in [
            ("C_max", c.c_max),
            ("C_entropy", c.c_entropy),
            ("C_jump", c.c_jump),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid_parameter(
                    OBJECT,
                    name,
                    value,
                    "must be finite and non-negative",
                ));
            }
        }

        if let Some(duration) = config.extra_duration {
            if !(duration > 0.0) {
                return Err(ConfigError::invalid_parameter(
                    OBJECT,
                    "extra_duration",
                    duration,
                    "must be positive",
                ));
            }
        }

        Ok(Self {
            model: ViscosityModel {
                strategy: config.strategy,
                g: config.g,
                coefficients: config.coefficients,
            },
            dimension,
            has_b: fields.contains(FieldName::B),
            has_jump: fields.contains(FieldName::JumpEntropyFlux),
            extra_duration: config.extra_duration,
        })
    }

    /// The underlying viscosity model.
    pub fn model(&self) -> &ViscosityModel {
        &self.model
    }

    /// Mesh dimension the material was built for.
    pub fn dimension(&self) -> MeshDimension {
        self.dimension
    }

    /// C_max in effect at `time`, including the warm-up amplification.
    pub fn effective_c_max(&self, time: f64) -> f64 {
        let c_max = self.model.coefficients.c_max;
        match self.extra_duration {
            Some(duration) => {
                let remaining = (1.0 - time / duration).clamp(0.0, 1.0);
                c_max * (1.0 + (WARM_UP_FACTOR - 1.0) * remaining)
            }
            None => c_max,
        }
    }

    /// Per-element constants for one element visit.
    pub fn element_scratch(&self, volume: f64, time: &TimeStepInfo) -> ElementScratch {
        ElementScratch {
            cell_length: self.dimension.cell_length(volume),
            c_max: self.effective_c_max(time.time),
        }
    }

    /// Evaluate one quadrature point, applying the coupled-or-zero rules.
    pub fn compute_qp_properties(
        &self,
        qp: &ViscosityQp,
        scratch: &ElementScratch,
        time: &TimeStepInfo,
    ) -> ViscosityEvaluation {
        let mut qp = *qp;
        if !self.dimension.has_y() {
            qp.state = qp.state.without_y();
            qp.entropy.grad_flux_y = glam::DVec2::ZERO;
        }
        if !self.has_b {
            qp.bathymetry = 0.0;
        }
        if !self.has_jump {
            qp.entropy.jump = 0.0;
        }
        self.model.evaluate(&qp, scratch, time)
    }

    /// Evaluate every quadrature point of an element into `out`.
    pub fn compute_properties_into(
        &self,
        element: &MaterialElement<'_>,
        time: &TimeStepInfo,
        out: &mut [ViscosityEvaluation],
    ) {
        debug_assert_eq!(element.qps.len(), out.len());
        let scratch = self.element_scratch(element.volume, time);
        for (qp, prop) in element.qps.iter().zip(out.iter_mut()) {
            *prop = self.compute_qp_properties(qp, &scratch, time);
        }
    }

    /// Evaluate every quadrature point of an element.
    pub fn compute_properties(
        &self,
        element: &MaterialElement<'_>,
        time: &TimeStepInfo,
    ) -> Vec<ViscosityEvaluation> {
        let mut out = vec![ViscosityEvaluation::default(); element.qps.len()];
        self.compute_properties_into(element, time, &mut out);
        out
    }

    /// Evaluate many elements in parallel using Rayon.
    #[cfg(feature = "parallel")]
    pub fn compute_properties_parallel(
        &self,
        elements: &[MaterialElement<'_>],
        time: &TimeStepInfo,
    ) -> Vec<Vec<ViscosityEvaluation>> {
        use rayon::prelude::*;

        elements
            .par_iter()
            .map(|element| self.compute_properties(element, time))
            .collect()
    }
}
