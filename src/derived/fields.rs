use super::{AuxPoint, DerivedField};
use crate::equations::SaintVenant;
use crate::error::{ConfigResult, check_component, check_gravity};
use crate::types::{Component, CoupledFields, FieldName, MeshDimension};

fn check_conserved(
    object: &'static str,
    dimension: MeshDimension,
    fields: &CoupledFields,
) -> ConfigResult<()> {
    fields.require(object, FieldName::H, "for the derived field")?;
    fields.require(object, FieldName::QX, "for the derived field")?;
    fields.check_q_y(object, dimension)
}

/// Flow speed.
///
/// Signed `q_x / h` on 1D meshes; magnitude `|q| / h` on 2D meshes.
#[derive(Clone, Copy, Debug)]
pub struct VelocityAux {
    dimension: MeshDimension,
}

impl VelocityAux {
    pub fn new(dimension: MeshDimension, fields: &CoupledFields) -> ConfigResult<Self> {
        check_conserved("SVVelocityAux", dimension, fields)?;
        Ok(Self { dimension })
    }
}

impl DerivedField for VelocityAux {
    fn name(&self) -> &'static str {
        "SVVelocityAux"
    }

    fn compute_value(&self, point: &AuxPoint) -> f64 {
        let s = &point.state;
        match self.dimension {
            MeshDimension::One => s.q_x / s.h,
            MeshDimension::Two => s.speed(),
        }
    }
}

/// Hydrostatic pressure ½ g h².
#[derive(Clone, Copy, Debug)]
pub struct PressureAux {
    equation: SaintVenant,
}

impl PressureAux {
    pub fn new(g: f64, fields: &CoupledFields) -> ConfigResult<Self> {
        check_gravity("SVPressureAux", g)?;
        fields.require("SVPressureAux", FieldName::H, "for the derived field")?;
        Ok(Self {
            equation: SaintVenant { g },
        })
    }
}

impl DerivedField for PressureAux {
    fn name(&self) -> &'static str {
        "SVPressureAux"
    }

    fn compute_value(&self, point: &AuxPoint) -> f64 {
        self.equation.pressure(point.state.h)
    }
}

/// Entropy functional ½ h (g h + |v|²).
#[derive(Clone, Copy, Debug)]
pub struct EntropyAux {
    equation: SaintVenant,
    has_q_y: bool,
}

impl EntropyAux {
    pub fn new(g: f64, dimension: MeshDimension, fields: &CoupledFields) -> ConfigResult<Self> {
        check_gravity("SVEntropyAux", g)?;
        check_conserved("SVEntropyAux", dimension, fields)?;
        Ok(Self {
            equation: SaintVenant { g },
            has_q_y: dimension.has_y(),
        })
    }
}

impl DerivedField for EntropyAux {
    fn name(&self) -> &'static str {
        "SVEntropyAux"
    }

    fn compute_value(&self, point: &AuxPoint) -> f64 {
        if self.has_q_y {
            self.equation.entropy(&point.state)
        } else {
            self.equation.entropy(&point.state.without_y())
        }
    }
}

/// One component of the entropy flux q_c (g (h + b) + ½ |v|²).
///
/// Bathymetry is optional and read as zero when absent.
#[derive(Clone, Copy, Debug)]
pub struct EntropyFluxAux {
    equation: SaintVenant,
    component: Component,
    has_q_y: bool,
    has_b: bool,
}

impl EntropyFluxAux {
    pub fn new(
        g: f64,
        component: Component,
        dimension: MeshDimension,
        fields: &CoupledFields,
    ) -> ConfigResult<Self> {
        const NAME: &str = "SVEntropyFluxAux";
        check_gravity(NAME, g)?;
        check_conserved(NAME, dimension, fields)?;
        check_component(NAME, component, dimension)?;
        Ok(Self {
            equation: SaintVenant { g },
            component,
            has_q_y: dimension.has_y(),
            has_b: fields.contains(FieldName::B),
        })
    }

    /// Component of the flux this field computes.
    pub fn component(&self) -> Component {
        self.component
    }

    /// Output field name: `F` for x, `G` for y.
    pub fn field(&self) -> FieldName {
        match self.component {
            Component::X => FieldName::EntropyFluxX,
            Component::Y => FieldName::EntropyFluxY,
        }
    }
}

impl DerivedField for EntropyFluxAux {
    fn name(&self) -> &'static str {
        "SVEntropyFluxAux"
    }

    fn compute_value(&self, point: &AuxPoint) -> f64 {
        let state = if self.has_q_y {
            point.state
        } else {
            point.state.without_y()
        };
        let b = if self.has_b { point.bathymetry } else { 0.0 };
        self.equation.entropy_flux(&state, b, self.component)
    }
}
