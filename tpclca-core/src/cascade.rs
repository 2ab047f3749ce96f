//! Cascade Accumulator
//!
//! Follows one material lineage through `n` recycling cycles. Cycle 0 is the
//! entry cycle, run with the initial process and a blended (partly virgin)
//! feed. Every later cycle is a steady-state cycle: the steady process on a
//! fully recycled feed of the same polymer.
//!
//! The running average
//!
//! $$ \bar{E}_i = \frac{1}{i + 1} \sum_{k=0}^{i} E_k $$
//!
//! amortises the entry cost over the cycles that follow and converges toward
//! the steady-state emissions as $i$ grows.

use crate::emissions::{EmissionBreakdown, EmissionModel};
use crate::errors::{LcaError, LcaResult};
use crate::material::MaterialId;
use crate::process::ProcessParameters;
use crate::FloatValue;
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Scrap fraction used for every steady-state cycle.
pub const STEADY_STATE_SCRAP_PERCENT: FloatValue = 100.0;

/// Inputs of a cascade.
///
/// The entry and steady-state processes are separate values because the split
/// between them is a policy choice of the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeInputs {
    pub initial_process: ProcessParameters,
    pub initial_scrap_fraction_percent: FloatValue,
    pub material: MaterialId,
    pub steady_process: ProcessParameters,
    pub n_cycles: usize,
    pub mass_kg: FloatValue,
}

/// One cycle of a cascade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRecord {
    pub cycle_index: usize,
    /// unit: kg CO2
    pub emissions_this_cycle: FloatValue,
    /// unit: kg CO2
    pub cumulative_emissions: FloatValue,
    /// unit: kg CO2
    pub average_emissions_per_cycle: FloatValue,
    pub breakdown: EmissionBreakdown,
}

/// Ordered cycle records, starting with cycle 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cascade {
    records: Vec<CycleRecord>,
}

impl Cascade {
    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Emissions of the entry cycle.
    pub fn initial_emissions(&self) -> FloatValue {
        self.records
            .first()
            .map(|r| r.emissions_this_cycle)
            .unwrap_or_default()
    }

    /// Emissions of one steady-state cycle, if the cascade has any.
    pub fn steady_state_emissions(&self) -> Option<FloatValue> {
        self.records.get(1).map(|r| r.emissions_this_cycle)
    }

    /// Average emissions per cycle over the whole cascade.
    pub fn final_average(&self) -> FloatValue {
        self.records
            .last()
            .map(|r| r.average_emissions_per_cycle)
            .unwrap_or_default()
    }

    pub fn per_cycle(&self) -> Array1<FloatValue> {
        self.records.iter().map(|r| r.emissions_this_cycle).collect()
    }

    pub fn cumulative(&self) -> Array1<FloatValue> {
        self.records.iter().map(|r| r.cumulative_emissions).collect()
    }

    pub fn averages(&self) -> Array1<FloatValue> {
        self.records
            .iter()
            .map(|r| r.average_emissions_per_cycle)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CascadeAccumulator<'a> {
    model: &'a EmissionModel,
}

impl<'a> CascadeAccumulator<'a> {
    pub fn new(model: &'a EmissionModel) -> Self {
        Self { model }
    }

    /// Runs the cascade described by `inputs`.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `n_cycles` is zero
    /// - `CycleFailure` wrapping the Emission Model error of the failing cycle
    pub fn cascade(&self, inputs: &CascadeInputs) -> LcaResult<Cascade> {
        if inputs.n_cycles < 1 {
            return Err(LcaError::invalid(
                "n_cycles",
                inputs.n_cycles as FloatValue,
                "a cascade needs at least one cycle",
            ));
        }
        debug!(
            "Cascade of {} cycles: entry '{}' at {}% scrap, steady state '{}', {} {} kg",
            inputs.n_cycles,
            inputs.initial_process.name(),
            inputs.initial_scrap_fraction_percent,
            inputs.steady_process.name(),
            inputs.material,
            inputs.mass_kg
        );

        let mut records: Vec<CycleRecord> = Vec::with_capacity(inputs.n_cycles);
        let mut cumulative = 0.0;

        for cycle_index in 0..inputs.n_cycles {
            let (process, scrap) = if cycle_index == 0 {
                (
                    &inputs.initial_process,
                    inputs.initial_scrap_fraction_percent,
                )
            } else {
                (&inputs.steady_process, STEADY_STATE_SCRAP_PERCENT)
            };

            let breakdown = self
                .model
                .compute(process, inputs.mass_kg, scrap, &inputs.material)
                .map_err(|e| LcaError::CycleFailure {
                    cycle_index,
                    source: Box::new(e),
                })?;

            let emissions = breakdown.total_emissions_kg_co2();
            cumulative += emissions;
            records.push(CycleRecord {
                cycle_index,
                emissions_this_cycle: emissions,
                cumulative_emissions: cumulative,
                average_emissions_per_cycle: cumulative / (cycle_index + 1) as FloatValue,
                breakdown,
            });
        }

        Ok(Cascade { records })
    }
}
