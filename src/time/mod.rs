//! Time-step selection.

mod cfl;

pub use cfl::{
    CflAccumulator, CflConfig, CflElement, GlobalMin, SerialReduce, TimeStepCfl,
};
