//! Strongly-typed selectors and field names.
//!
//! Everything here is fixed when a component is constructed and never
//! mutated afterwards:
//!
//! - [`MeshDimension`]: 1D or 2D, decides whether `q_y` exists
//! - [`Component`]: which momentum component a kernel or BC acts on
//! - [`Equation`]: continuity or momentum, for boundary conditions
//! - [`FieldName`] / [`CoupledFields`]: which engine fields are coupled
//!
//! # Example
//!
//! ```
//! use sv_rs::types::{Component, CoupledFields, FieldName, MeshDimension};
//!
//! let dim = MeshDimension::Two;
//! let fields = CoupledFields::conserved(dim).with(FieldName::B);
//!
//! assert_eq!(dim.n(), 2);
//! assert_eq!(Component::Y.index(), 1);
//! assert!(fields.contains(FieldName::QY));
//! ```

mod fields;
mod selectors;

pub use fields::{CoupledFields, FieldName};
pub use selectors::{Component, Equation, MeshDimension};
