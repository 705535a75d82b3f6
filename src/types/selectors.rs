//! Small selector enums fixed at object construction.

use std::fmt;

/// Spatial dimension of the mesh the physics runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshDimension {
    /// 1D channel: only `q_x` exists.
    One,
    /// 2D domain: both `q_x` and `q_y` exist.
    Two,
}

impl MeshDimension {
    /// Number of spatial dimensions.
    #[inline]
    pub fn n(self) -> usize {
        match self {
            MeshDimension::One => 1,
            MeshDimension::Two => 2,
        }
    }

    /// Whether the y-momentum field belongs to this mesh.
    #[inline]
    pub fn has_y(self) -> bool {
        self == MeshDimension::Two
    }

    /// Characteristic length of an element: `volume^(1/dim)`.
    ///
    /// In 1D the element "volume" is its length, in 2D its area.
    #[inline]
    pub fn cell_length(self, volume: f64) -> f64 {
        match self {
            MeshDimension::One => volume,
            MeshDimension::Two => volume.sqrt(),
        }
    }
}

impl fmt::Display for MeshDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.n())
    }
}

/// Momentum component (x or y) a kernel or boundary condition acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Component {
    #[default]
    X,
    Y,
}

impl Component {
    /// Index into a vector (0 for x, 1 for y).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Component::X => 0,
            Component::Y => 1,
        }
    }

    /// Pick this component out of a 2D vector.
    #[inline]
    pub fn of(self, v: glam::DVec2) -> f64 {
        match self {
            Component::X => v.x,
            Component::Y => v.y,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::X => write!(f, "x"),
            Component::Y => write!(f, "y"),
        }
    }
}

/// Which equation of the system a boundary condition contributes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Equation {
    /// Mass conservation (test functions of `h`).
    Continuity,
    /// Momentum balance (test functions of `q_x` or `q_y`).
    Momentum,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_cell_length() {
        assert!((MeshDimension::One.cell_length(0.25) - 0.25).abs() < 1e-15);
        assert!((MeshDimension::Two.cell_length(0.25) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_component_pick() {
        let v = DVec2::new(3.0, -4.0);
        assert_eq!(Component::X.of(v), 3.0);
        assert_eq!(Component::Y.of(v), -4.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(MeshDimension::Two.to_string(), "2D");
        assert_eq!(Component::Y.to_string(), "y");
    }
}
