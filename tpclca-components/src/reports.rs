//! Presentation records
//!
//! Builders for the figures of the recycling comparison. Every series is a
//! list of [`LabelledValue`]s or of structs that carry their own label, so a
//! plotting layer never has to zip labels and values back together.

use serde::{Deserialize, Serialize};
use tpclca_core::cascade::{Cascade, CycleRecord};
use tpclca_core::comparator::{Comparison, Condition, LabelledValue};
use tpclca_core::emissions::EmissionModel;
use tpclca_core::errors::LcaResult;
use tpclca_core::material::MaterialId;
use tpclca_core::process::ProcessParameters;
use tpclca_core::FloatValue;

/// Emissions from incinerating 1 kg of thermoplastic scrap.
/// unit: kg CO2
pub const INCINERATION_EMISSIONS_KG_CO2: FloatValue = 2.9;

/// Emissions from producing 1 kg of virgin carbon-fibre PEEK.
/// unit: kg CO2
pub const CF_PEEK_VIRGIN_EMISSIONS_KG_CO2: FloatValue = 30.0;

/// One stacked bar of electricity use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBar {
    pub label: String,
    /// unit: MJ / kg
    pub primary_mj_per_kg: FloatValue,
    /// unit: MJ / kg
    pub secondary_mj_per_kg: FloatValue,
}

impl EnergyBar {
    pub fn total_mj_per_kg(&self) -> FloatValue {
        self.primary_mj_per_kg + self.secondary_mj_per_kg
    }
}

/// Primary (grinding) and secondary (pelletising) energy per scenario.
pub fn energy_breakdown(scenarios: &[ProcessParameters]) -> Vec<EnergyBar> {
    scenarios
        .iter()
        .map(|s| EnergyBar {
            label: s.name().to_string(),
            primary_mj_per_kg: s.primary_energy_mj_per_kg(),
            secondary_mj_per_kg: s.secondary_energy_mj_per_kg(),
        })
        .collect()
}

/// Bars of one colour in a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedSeries {
    pub condition: String,
    pub values: Vec<LabelledValue>,
}

/// Total emissions per scenario, one series per condition.
pub fn grouped_emissions(comparison: &Comparison) -> Vec<GroupedSeries> {
    comparison
        .conditions()
        .iter()
        .enumerate()
        .map(|(index, condition)| GroupedSeries {
            condition: condition.label(),
            values: comparison.series_for_condition(index),
        })
        .collect()
}

/// A recycled route next to incineration and virgin production, per kg.
///
/// `spiral` is evaluated on fully recycled feed and on 70 % scrap topped up
/// with virgin PEEK.
pub fn reference_bar_comparison(
    model: &EmissionModel,
    spiral: &ProcessParameters,
) -> LcaResult<Vec<LabelledValue>> {
    let peek = MaterialId::peek();
    let full_scrap = model.compute(spiral, 1.0, 100.0, &peek)?;
    let with_peek = model.compute(spiral, 1.0, 70.0, &peek)?;
    Ok(vec![
        LabelledValue::new(
            "Spiral Process (100% Scrap)",
            full_scrap.total_emissions_kg_co2(),
        ),
        LabelledValue::new(
            "Spiral Process (70% Scrap + 30% PEEK)",
            with_peek.total_emissions_kg_co2(),
        ),
        LabelledValue::new(
            "Incineration (1 kg TP Scrap)",
            INCINERATION_EMISSIONS_KG_CO2,
        ),
        LabelledValue::new("CF-PEEK Virgin Production", CF_PEEK_VIRGIN_EMISSIONS_KG_CO2),
    ])
}

/// Energy use and emissions of one process under a given condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileBar {
    pub condition: String,
    /// unit: MJ / kg
    pub energy_mj_per_kg: FloatValue,
    /// unit: kg CO2
    pub total_emissions_kg_co2: FloatValue,
}

/// Detailed view of a single process across feed conditions.
pub fn process_profile(
    model: &EmissionModel,
    process: &ProcessParameters,
    conditions: &[Condition],
    mass_kg: FloatValue,
) -> LcaResult<Vec<ProfileBar>> {
    conditions
        .iter()
        .map(|condition| {
            let breakdown = model.compute(
                process,
                mass_kg,
                condition.scrap_fraction_percent,
                &condition.material,
            )?;
            Ok(ProfileBar {
                condition: condition.label(),
                energy_mj_per_kg: process.energy_intensity_mj_per_kg(),
                total_emissions_kg_co2: breakdown.total_emissions_kg_co2(),
            })
        })
        .collect()
}

/// Figures and headline numbers of a cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub n_cycles: usize,
    /// unit: kg CO2
    pub initial_emissions: FloatValue,
    /// unit: kg CO2
    pub steady_state_emissions: Option<FloatValue>,
    /// unit: kg CO2
    pub final_average: FloatValue,
    pub cumulative: Vec<LabelledValue>,
    pub averages: Vec<LabelledValue>,
}

fn cycle_series(
    cascade: &Cascade,
    value: impl Fn(&CycleRecord) -> FloatValue,
) -> Vec<LabelledValue> {
    cascade
        .records()
        .iter()
        .map(|r| LabelledValue::new(format!("Cycle {}", r.cycle_index), value(r)))
        .collect()
}

pub fn cascade_summary(cascade: &Cascade) -> CascadeSummary {
    CascadeSummary {
        n_cycles: cascade.len(),
        initial_emissions: cascade.initial_emissions(),
        steady_state_emissions: cascade.steady_state_emissions(),
        final_average: cascade.final_average(),
        cumulative: cycle_series(cascade, |r| r.cumulative_emissions),
        averages: cycle_series(cascade, |r| r.average_emissions_per_cycle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{recycling_scenarios, reference_library, HYBRID_SPIRAL_SPHERA};
    use crate::scenarios::{standard_conditions, CascadeParameters};
    use approx::assert_relative_eq;
    use tpclca_core::cascade::CascadeAccumulator;
    use tpclca_core::comparator::ScenarioComparator;
    use tpclca_core::reference::ReferenceStore;

    #[test]
    fn energy_bars() {
        let library = reference_library().unwrap();
        let bars = energy_breakdown(&recycling_scenarios(&library).unwrap());
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[1].label, "Separate Processes (Sphera)");
        assert_relative_eq!(bars[1].total_mj_per_kg(), 1.43, epsilon = 1e-12);
        assert_relative_eq!(bars[3].secondary_mj_per_kg, 2.2716);
    }

    #[test]
    fn grouped_series_keep_labels_with_values() {
        let library = reference_library().unwrap();
        let model = EmissionModel::from_materials(library.material_profile());
        let scenarios = recycling_scenarios(&library).unwrap();
        let comparison = ScenarioComparator::new(&model)
            .compare(&scenarios, 1.0, &standard_conditions())
            .unwrap();

        let groups = grouped_emissions(&comparison);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[2].condition, "70% scrap + PEEK");
        for group in &groups {
            assert_eq!(group.values.len(), scenarios.len());
            for (value, scenario) in group.values.iter().zip(&scenarios) {
                assert_eq!(value.label, scenario.name());
            }
        }

        // Separate Processes at 70% scrap + PA6
        assert_relative_eq!(groups[1].values[1].value, 1.56523, epsilon = 1e-9);
        // Incineration on fully recycled feed
        assert_relative_eq!(groups[0].values[4].value, 2.9, epsilon = 1e-9);
    }

    #[test]
    fn reference_bars() {
        let library = reference_library().unwrap();
        let model = EmissionModel::default();
        let spiral = library.get_process(HYBRID_SPIRAL_SPHERA).unwrap();
        let bars = reference_bar_comparison(&model, spiral).unwrap();

        assert_eq!(bars.len(), 4);
        assert_relative_eq!(bars[0].value, 1.15 * 0.161, epsilon = 1e-12);
        assert_relative_eq!(bars[1].value, 1.15 * 0.161 + 0.3 * 13.70, epsilon = 1e-12);
        assert_eq!(bars[2].value, 2.9);
        assert_eq!(bars[3].label, "CF-PEEK Virgin Production");
        assert_eq!(bars[3].value, 30.0);
    }

    #[test]
    fn profile_of_hybrid_process() {
        let library = reference_library().unwrap();
        let model = EmissionModel::default();
        let hybrid = library.get_process(HYBRID_SPIRAL_SPHERA).unwrap();
        let profile = process_profile(&model, hybrid, &standard_conditions(), 1.0).unwrap();

        assert_eq!(profile.len(), 4);
        assert!(profile
            .iter()
            .all(|bar| (bar.energy_mj_per_kg - 1.15).abs() < 1e-12));
        assert_relative_eq!(
            profile[3].total_emissions_kg_co2,
            1.15 * 0.161 + 0.3 * 2.13,
            epsilon = 1e-12
        );
    }

    #[test]
    fn cascade_summary_labels() {
        let library = reference_library().unwrap();
        let model = EmissionModel::from_materials(library.material_profile());
        let inputs = CascadeParameters::default().resolve(&library).unwrap();
        let cascade = CascadeAccumulator::new(&model).cascade(&inputs).unwrap();

        let summary = cascade_summary(&cascade);
        assert_eq!(summary.n_cycles, 10);
        assert_eq!(summary.cumulative.len(), 10);
        assert_eq!(summary.averages[9].label, "Cycle 9");
        assert_relative_eq!(summary.initial_emissions, 4.29515, epsilon = 1e-9);
        assert_relative_eq!(
            summary.steady_state_emissions.unwrap(),
            0.18515,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            summary.cumulative[9].value,
            4.29515 + 9.0 * 0.18515,
            epsilon = 1e-9
        );
        assert_relative_eq!(summary.final_average, summary.averages[9].value);
    }
}
