//! Logical names of the fields the assembly engine can couple to a component.
//!
//! The engine owns the field data. Components only record, at construction,
//! which fields are available, and reject combinations that make no sense for
//! the mesh dimension or the selected equation. A field that is optional and
//! absent is read as zero.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// A named field supplied by the assembly engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldName {
    /// Water height
    H,
    /// x-momentum
    QX,
    /// y-momentum (2D only)
    QY,
    /// Bathymetry (bottom elevation)
    B,
    /// Entropy functional E with its old and older values
    Entropy,
    /// x-component of the entropy flux
    EntropyFluxX,
    /// y-component of the entropy flux (2D only)
    EntropyFluxY,
    /// Inter-element jump of the entropy flux
    JumpEntropyFlux,
}

impl FieldName {
    /// All field names, in declaration order.
    pub const ALL: [FieldName; 8] = [
        FieldName::H,
        FieldName::QX,
        FieldName::QY,
        FieldName::B,
        FieldName::Entropy,
        FieldName::EntropyFluxX,
        FieldName::EntropyFluxY,
        FieldName::JumpEntropyFlux,
    ];

    /// Name used by the engine's field registry.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::H => "h",
            FieldName::QX => "q_x",
            FieldName::QY => "q_y",
            FieldName::B => "b",
            FieldName::Entropy => "entropy",
            FieldName::EntropyFluxX => "F",
            FieldName::EntropyFluxY => "G",
            FieldName::JumpEntropyFlux => "jump_entropy_flux",
        }
    }

    /// Look up a field by its registry name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of fields coupled to one component.
///
/// ```
/// use sv_rs::types::{CoupledFields, FieldName};
///
/// let fields = CoupledFields::new().with(FieldName::H).with(FieldName::QX);
/// assert!(fields.contains(FieldName::H));
/// assert!(!fields.contains(FieldName::QY));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoupledFields {
    bits: u8,
}

impl CoupledFields {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The conserved variables of the given mesh: `h`, `q_x` and, in 2D, `q_y`.
    pub fn conserved(dimension: crate::types::MeshDimension) -> Self {
        let fields = Self::new().with(FieldName::H).with(FieldName::QX);
        if dimension.has_y() {
            fields.with(FieldName::QY)
        } else {
            fields
        }
    }

    /// Add a field to the set.
    pub fn with(mut self, field: FieldName) -> Self {
        self.bits |= field.bit();
        self
    }

    /// Remove a field from the set.
    pub fn without(mut self, field: FieldName) -> Self {
        self.bits &= !field.bit();
        self
    }

    /// Whether a field is coupled.
    #[inline]
    pub fn contains(&self, field: FieldName) -> bool {
        self.bits & field.bit() != 0
    }

    /// Iterate over the coupled fields.
    pub fn iter(&self) -> impl Iterator<Item = FieldName> + '_ {
        FieldName::ALL.into_iter().filter(|f| self.contains(*f))
    }

    /// Fail unless `field` is coupled.
    pub(crate) fn require(
        &self,
        object: &'static str,
        field: FieldName,
        reason: &str,
    ) -> ConfigResult<()> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(ConfigError::missing_field(object, field, reason))
        }
    }

    /// Fail if `field` is coupled.
    pub(crate) fn forbid(
        &self,
        object: &'static str,
        field: FieldName,
        reason: &str,
    ) -> ConfigResult<()> {
        if self.contains(field) {
            Err(ConfigError::forbidden_field(object, field, reason))
        } else {
            Ok(())
        }
    }

    /// Standard y-momentum rule: required in 2D, forbidden in 1D.
    pub(crate) fn check_q_y(
        &self,
        object: &'static str,
        dimension: crate::types::MeshDimension,
    ) -> ConfigResult<()> {
        if dimension.has_y() {
            self.require(object, FieldName::QY, "in 2D")
        } else {
            self.forbid(object, FieldName::QY, "in 1D")
        }
    }
}

impl FromIterator<FieldName> for CoupledFields {
    fn from_iter<I: IntoIterator<Item = FieldName>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |set, f| set.with(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeshDimension;

    #[test]
    fn test_names_round_trip() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::parse(field.as_str()), Some(field));
        }
        assert_eq!(FieldName::parse("velocity"), None);
    }

    #[test]
    fn test_set_operations() {
        let set: CoupledFields = [FieldName::H, FieldName::Entropy].into_iter().collect();
        assert!(set.contains(FieldName::Entropy));
        assert!(!set.contains(FieldName::B));

        let set = set.without(FieldName::Entropy);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![FieldName::H]);
    }

    #[test]
    fn test_conserved_fields() {
        assert!(!CoupledFields::conserved(MeshDimension::One).contains(FieldName::QY));
        assert!(CoupledFields::conserved(MeshDimension::Two).contains(FieldName::QY));
    }

    #[test]
    fn test_q_y_rule() {
        let fields_1d = CoupledFields::conserved(MeshDimension::One);
        let fields_2d = CoupledFields::conserved(MeshDimension::Two);

        assert!(fields_1d.check_q_y("SVAdvection", MeshDimension::One).is_ok());
        assert!(fields_2d.check_q_y("SVAdvection", MeshDimension::Two).is_ok());
        assert!(matches!(
            fields_2d.check_q_y("SVAdvection", MeshDimension::One),
            Err(ConfigError::ForbiddenField { .. })
        ));
        assert!(matches!(
            fields_1d.check_q_y("SVAdvection", MeshDimension::Two),
            Err(ConfigError::MissingField { .. })
        ));
    }
}
