//! Standard analysis setups
//!
//! The feed conditions, product masses and cascade configuration used for the
//! published recycling comparison.

use crate::library::{HYBRID_SPIRAL_SPHERA, SPIRAL_STEADY_STATE};
use serde::{Deserialize, Serialize};
use tpclca_core::cascade::CascadeInputs;
use tpclca_core::comparator::Condition;
use tpclca_core::errors::LcaResult;
use tpclca_core::material::MaterialId;
use tpclca_core::reference::ReferenceStore;
use tpclca_core::FloatValue;

/// Product masses evaluated for every route.
/// unit: kg
pub const ANALYSIS_MASSES_KG: [FloatValue; 2] = [1.0, 0.07];

/// Fully recycled feed, then 70 % scrap topped up with each virgin polymer.
pub fn standard_conditions() -> Vec<Condition> {
    vec![
        Condition::full_scrap(MaterialId::pa6()),
        Condition::new(70.0, MaterialId::pa6()),
        Condition::new(70.0, MaterialId::peek()),
        Condition::new(70.0, MaterialId::pps()),
    ]
}

/// Named configuration of a cascade.
///
/// Processes are referenced by name and resolved against a [`ReferenceStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeParameters {
    /// Process of the first cycle
    ///
    /// Default: "Hybrid Process (Spiral + Sphera)"
    pub initial_process: String,

    /// Scrap fraction of the first cycle (%)
    ///
    /// Default: 70
    pub initial_scrap_fraction_percent: FloatValue,

    /// Virgin polymer topping up the first cycle
    ///
    /// Default: PEEK
    pub material: MaterialId,

    /// Process of every later, fully recycled, cycle
    ///
    /// Default: "Spiral Grinding + Sphera Pelletization"
    pub steady_process: String,

    /// Number of cycles including the first
    ///
    /// Default: 10
    pub n_cycles: usize,

    /// Default: 1 kg
    pub mass_kg: FloatValue,
}

impl Default for CascadeParameters {
    fn default() -> Self {
        Self {
            initial_process: HYBRID_SPIRAL_SPHERA.to_string(),
            initial_scrap_fraction_percent: 70.0,
            material: MaterialId::peek(),
            steady_process: SPIRAL_STEADY_STATE.to_string(),
            n_cycles: 10,
            mass_kg: 1.0,
        }
    }
}

impl CascadeParameters {
    /// Looks up both processes and builds the cascade inputs.
    pub fn resolve<S: ReferenceStore + ?Sized>(&self, store: &S) -> LcaResult<CascadeInputs> {
        Ok(CascadeInputs {
            initial_process: store.get_process(&self.initial_process)?.clone(),
            initial_scrap_fraction_percent: self.initial_scrap_fraction_percent,
            material: self.material.clone(),
            steady_process: store.get_process(&self.steady_process)?.clone(),
            n_cycles: self.n_cycles,
            mass_kg: self.mass_kg,
        })
    }
}
