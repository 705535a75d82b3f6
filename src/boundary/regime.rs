//! Characteristic classification of the flow at a boundary.
//!
//! The normal-direction eigenvalues of the Saint-Venant system are
//! v_n - c, v_n and v_n + c. Their signs decide how many pieces of boundary
//! data come from outside the domain:
//!
//! | Regime | Condition | Data from outside |
//! |--------|-----------|-------------------|
//! | Fluvial | v_n + c > 0, v_n < c | one (height or discharge) |
//! | Torrential outflow | v_n + c > 0, v_n ≥ c | none |
//! | Torrential inflow | v_n + c ≤ 0 | all |

use std::fmt;

/// Local flow regime at a boundary point. Recomputed at every evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowRegime {
    /// Subcritical: one characteristic enters the domain
    Fluvial,
    /// Supercritical leaving the domain: all characteristics leave
    TorrentialOutflow,
    /// Supercritical entering the domain: all characteristics enter
    TorrentialInflow,
}

impl FlowRegime {
    /// Classify from interior normal velocity and sound speed.
    ///
    /// Every real `v_n` maps to exactly one regime.
    #[inline]
    pub fn classify(normal_velocity: f64, celerity: f64) -> Self {
        if normal_velocity + celerity > 0.0 {
            if normal_velocity < celerity {
                FlowRegime::Fluvial
            } else {
                FlowRegime::TorrentialOutflow
            }
        } else {
            FlowRegime::TorrentialInflow
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowRegime::Fluvial => write!(f, "fluvial"),
            FlowRegime::TorrentialOutflow => write!(f, "torrential outflow"),
            FlowRegime::TorrentialInflow => write!(f, "torrential inflow"),
        }
    }
}
