//! Configuration errors raised while constructing physics objects.
//!
//! Every component validates its parameters and coupled fields once, in its
//! constructor. Nothing in this crate fails at evaluation time; numerical
//! trouble during evaluation is reported through the `log` facade instead.

use thiserror::Error;

use crate::types::{Component, FieldName, MeshDimension};

/// Errors that can occur when building a kernel, material, boundary
/// condition or postprocessor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Gravity constant is negative.
    #[error("gravity constant g = {g} is negative in {object}")]
    NegativeGravity { object: &'static str, g: f64 },

    /// The requested momentum component does not exist on this mesh.
    #[error("component in {object} is {component} but the mesh is {dimension}")]
    ComponentDimensionMismatch {
        object: &'static str,
        component: Component,
        dimension: MeshDimension,
    },

    /// A momentum equation was requested without naming a component.
    #[error("component is required in {object} for the momentum equation")]
    MissingComponent { object: &'static str },

    /// A coupled field the object needs was not supplied.
    #[error("{object} requires the coupled field `{field}` {reason}")]
    MissingField {
        object: &'static str,
        field: FieldName,
        reason: String,
    },

    /// A coupled field was supplied that the object must not use.
    #[error("{object} does not require the coupled field `{field}` {reason} but it was provided")]
    ForbiddenField {
        object: &'static str,
        field: FieldName,
        reason: String,
    },

    /// A scalar parameter is out of range.
    #[error("invalid parameter `{name}` = {value} in {object}: {reason}")]
    InvalidParameter {
        object: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ConfigError {
    /// Create a missing-field error.
    pub fn missing_field(object: &'static str, field: FieldName, reason: impl Into<String>) -> Self {
        Self::MissingField {
            object,
            field,
            reason: reason.into(),
        }
    }

    /// Create a forbidden-field error.
    pub fn forbidden_field(
        object: &'static str,
        field: FieldName,
        reason: impl Into<String>,
    ) -> Self {
        Self::ForbiddenField {
            object,
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_parameter(
        object: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            object,
            name,
            value,
            reason,
        }
    }
}

/// Reject a negative (or NaN) gravity constant.
pub(crate) fn check_gravity(object: &'static str, g: f64) -> Result<(), ConfigError> {
    if g >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeGravity { object, g })
    }
}

/// Reject a component that does not exist on the mesh.
pub(crate) fn check_component(
    object: &'static str,
    component: Component,
    dimension: MeshDimension,
) -> Result<(), ConfigError> {
    if component.index() < dimension.n() {
        Ok(())
    } else {
        Err(ConfigError::ComponentDimensionMismatch {
            object,
            component,
            dimension,
        })
    }
}

/// Alias for results of constructors in this crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
