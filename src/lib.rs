//! # sv-rs
//!
//! Discrete physics of the Saint-Venant (shallow water) equations for a
//! continuous finite element residual/Jacobian assembly engine.
//!
//! This crate provides the pointwise building blocks the engine calls:
//! - Flux kernels (advection, pressure, continuity, bathymetry source)
//! - Entropy-based shock-capturing viscosity with a first-order ceiling
//! - Characteristic boundary conditions (imposed discharge, imposed height,
//!   solid wall) with a Newton solve for the fluvial boundary height
//! - CFL time-step estimate with thread and process reductions
//! - Derived fields (velocity, pressure, entropy, entropy flux)
//! - Element-local assembly of residuals and Jacobian blocks
//!
//! Every component validates its configuration once, at construction, and
//! returns a [`ConfigError`] on misuse. Evaluation never fails.

pub mod assembly;
pub mod boundary;
pub mod derived;
pub mod equations;
pub mod error;
pub mod kernels;
pub mod state;
pub mod time;
pub mod types;
pub mod viscosity;

pub use assembly::{ElementData, FacePoint, LocalAssembler, QuadraturePoint};
pub use boundary::{
    BoundaryContext, BoundaryState, FlowRegime, ImposedDischargeBC, ImposedDischargeConfig,
    ImposedHeightBC, ImposedHeightConfig, NewtonConfig, NewtonSolution, SVBoundaryCondition,
    SolidWallBC, SolidWallConfig, classify_regime,
};
pub use derived::{AuxPoint, DerivedField, EntropyAux, EntropyFluxAux, PressureAux, VelocityAux};
pub use equations::{STANDARD_GRAVITY, SaintVenant};
pub use error::{ConfigError, ConfigResult};
pub use kernels::{
    BathymetryFunction, BathymetrySource, Kernel, KernelQp, SVAdvection, SVArtificialViscosity,
    SVBathymetry, SVContinuity, SVPressure, TrialFunction, Variable,
};
pub use state::ConservedState;
pub use time::{CflAccumulator, CflConfig, CflElement, GlobalMin, SerialReduce, TimeStepCfl};
pub use types::{Component, CoupledFields, Equation, FieldName, MeshDimension};
pub use viscosity::{
    MaterialConfig, MaterialElement, SVMaterial, TimeStepInfo, ViscosityCoefficients,
    ViscosityEvaluation, ViscosityModel, ViscosityStrategy,
};
