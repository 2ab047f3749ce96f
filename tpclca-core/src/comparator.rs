//! Scenario Comparator
//!
//! Evaluates every scenario under every condition. Output order is
//! scenario-major and follows input order, so presentation layers can rely
//! on it, but every entry also carries its own labels.

use crate::emissions::{EmissionBreakdown, EmissionModel};
use crate::errors::{LcaError, LcaResult};
use crate::material::MaterialId;
use crate::process::ProcessParameters;
use crate::FloatValue;
use log::debug;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feed composition under which a scenario is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub scrap_fraction_percent: FloatValue,
    pub material: MaterialId,
}

impl Condition {
    pub fn new(scrap_fraction_percent: FloatValue, material: impl Into<MaterialId>) -> Self {
        Self {
            scrap_fraction_percent,
            material: material.into(),
        }
    }

    /// Fully recycled feed. The material only matters for bookkeeping.
    pub fn full_scrap(material: impl Into<MaterialId>) -> Self {
        Self::new(100.0, material)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% scrap + {}", self.scrap_fraction_percent, self.material)
    }
}

/// A label paired with the value plotted or tabulated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: FloatValue,
}

impl LabelledValue {
    pub fn new(label: impl Into<String>, value: FloatValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One evaluated (scenario, condition) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub scenario_index: usize,
    pub condition_index: usize,
    pub scenario: String,
    pub condition: Condition,
    pub mass_kg: FloatValue,
    pub breakdown: EmissionBreakdown,
}

/// Results of a comparison, scenario-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    mass_kg: FloatValue,
    scenarios: Vec<String>,
    conditions: Vec<Condition>,
    entries: Vec<ComparisonEntry>,
}

impl Comparison {
    pub fn mass_kg(&self) -> FloatValue {
        self.mass_kg
    }

    pub fn scenario_names(&self) -> &[String] {
        &self.scenarios
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparisonEntry> {
        self.entries.iter()
    }

    /// Breakdown for a pair, addressed by input position.
    pub fn get(&self, scenario_index: usize, condition_index: usize) -> Option<&EmissionBreakdown> {
        if scenario_index >= self.scenarios.len() || condition_index >= self.conditions.len() {
            return None;
        }
        self.entries
            .get(scenario_index * self.conditions.len() + condition_index)
            .map(|entry| &entry.breakdown)
    }

    /// Breakdown for the first scenario called `scenario` under `condition`.
    ///
    /// Scenario names are not required to be unique; use [`Comparison::get`] to
    /// address duplicates.
    pub fn get_by_name(&self, scenario: &str, condition: &Condition) -> Option<&EmissionBreakdown> {
        self.entries
            .iter()
            .find(|entry| entry.scenario == scenario && &entry.condition == condition)
            .map(|entry| &entry.breakdown)
    }

    /// Total emissions as a `scenarios x conditions` matrix.
    pub fn total_matrix(&self) -> Array2<FloatValue> {
        Array2::from_shape_fn((self.scenarios.len(), self.conditions.len()), |(s, c)| {
            self.get(s, c)
                .map(EmissionBreakdown::total_emissions_kg_co2)
                .unwrap_or(FloatValue::NAN)
        })
    }

    /// Total emissions per scenario under one condition, labelled by scenario.
    pub fn series_for_condition(&self, condition_index: usize) -> Vec<LabelledValue> {
        self.entries
            .iter()
            .filter(|entry| entry.condition_index == condition_index)
            .map(|entry| {
                LabelledValue::new(
                    entry.scenario.clone(),
                    entry.breakdown.total_emissions_kg_co2(),
                )
            })
            .collect()
    }
}

/// Evaluates scenario sets against a shared [`EmissionModel`].
#[derive(Debug, Clone, Copy)]
pub struct ScenarioComparator<'a> {
    model: &'a EmissionModel,
}

impl<'a> ScenarioComparator<'a> {
    pub fn new(model: &'a EmissionModel) -> Self {
        Self { model }
    }

    /// Evaluates the Cartesian product of `scenarios` and `conditions`.
    ///
    /// Stops at the first failing pair and reports it as
    /// [`LcaError::ComparisonFailure`], carrying the entries computed so far.
    pub fn compare(
        &self,
        scenarios: &[ProcessParameters],
        mass_kg: FloatValue,
        conditions: &[Condition],
    ) -> LcaResult<Comparison> {
        debug!(
            "Comparing {} scenarios under {} conditions for {} kg",
            scenarios.len(),
            conditions.len(),
            mass_kg
        );
        let mut entries = Vec::with_capacity(scenarios.len() * conditions.len());

        for (scenario_index, scenario) in scenarios.iter().enumerate() {
            for (condition_index, condition) in conditions.iter().enumerate() {
                match self.model.compute(
                    scenario,
                    mass_kg,
                    condition.scrap_fraction_percent,
                    &condition.material,
                ) {
                    Ok(breakdown) => entries.push(ComparisonEntry {
                        scenario_index,
                        condition_index,
                        scenario: scenario.name().to_string(),
                        condition: condition.clone(),
                        mass_kg,
                        breakdown,
                    }),
                    Err(e) => {
                        return Err(LcaError::ComparisonFailure {
                            scenario: scenario.name().to_string(),
                            condition: condition.label(),
                            source: Box::new(e),
                            completed: entries,
                        })
                    }
                }
            }
        }

        Ok(Comparison {
            mass_kg,
            scenarios: scenarios.iter().map(|s| s.name().to_string()).collect(),
            conditions: conditions.to_vec(),
            entries,
        })
    }

    /// Runs [`ScenarioComparator::compare`] once per mass, in order.
    pub fn compare_masses(
        &self,
        scenarios: &[ProcessParameters],
        masses_kg: &[FloatValue],
        conditions: &[Condition],
    ) -> LcaResult<Vec<Comparison>> {
        masses_kg
            .iter()
            .map(|&mass_kg| self.compare(scenarios, mass_kg, conditions))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenarios() -> Vec<ProcessParameters> {
        vec![
            ProcessParameters::new("Aggregated Process (Sphera)", 2.65, 0.0).unwrap(),
            ProcessParameters::new("Separate Processes (Sphera)", 0.33, 1.1).unwrap(),
        ]
    }

    fn conditions() -> Vec<Condition> {
        vec![
            Condition::full_scrap(MaterialId::pa6()),
            Condition::new(70.0, MaterialId::peek()),
        ]
    }

    #[test]
    fn two_by_two_in_input_order() {
        let model = EmissionModel::default();
        let comparison = ScenarioComparator::new(&model)
            .compare(&scenarios(), 1.0, &conditions())
            .unwrap();

        assert_eq!(comparison.len(), 4);
        let keys: Vec<(usize, usize)> = comparison
            .iter()
            .map(|e| (e.scenario_index, e.condition_index))
            .collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let expected = model
            .compute(&scenarios()[1], 1.0, 70.0, &MaterialId::peek())
            .unwrap();
        assert_eq!(comparison.get(1, 1), Some(&expected));
        assert_eq!(
            comparison.get_by_name("Separate Processes (Sphera)", &conditions()[1]),
            Some(&expected)
        );
        assert_eq!(comparison.get(2, 0), None);
    }

    #[test]
    fn duplicate_scenarios_stay_distinct() {
        let model = EmissionModel::default();
        let p = ProcessParameters::new("Same", 0.33, 1.1).unwrap();
        let comparison = ScenarioComparator::new(&model)
            .compare(&[p.clone(), p], 1.0, &conditions())
            .unwrap();
        assert_eq!(comparison.len(), 4);
        assert_eq!(comparison.scenario_names(), ["Same", "Same"]);
        assert_eq!(comparison.get(0, 1), comparison.get(1, 1));
    }

    #[test]
    fn total_matrix_and_series() {
        let model = EmissionModel::default();
        let comparison = ScenarioComparator::new(&model)
            .compare(&scenarios(), 1.0, &conditions())
            .unwrap();
        let matrix = comparison.total_matrix();
        assert_eq!(matrix.shape(), &[2, 2]);
        // Aggregated, 100% scrap: 2.65 MJ * 0.161
        assert_relative_eq!(matrix[[0, 0]], 2.65 * 0.161, epsilon = 1e-12);

        let series = comparison.series_for_condition(1);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Aggregated Process (Sphera)");
        assert_eq!(series[1].value, matrix[[1, 1]]);
    }

    #[test]
    fn failure_identifies_pair_and_keeps_completed() {
        let model = EmissionModel::default();
        let conditions = vec![
            Condition::new(70.0, MaterialId::pa6()),
            Condition::new(120.0, MaterialId::pa6()),
        ];
        let err = ScenarioComparator::new(&model)
            .compare(&scenarios(), 1.0, &conditions)
            .unwrap_err();

        match err {
            LcaError::ComparisonFailure {
                ref scenario,
                ref condition,
                ref source,
                ref completed,
            } => {
                assert_eq!(scenario, "Aggregated Process (Sphera)");
                assert_eq!(condition, "120% scrap + PA6");
                assert!(matches!(**source, LcaError::InvalidParameter { .. }));
                assert_eq!(completed.len(), 1);
                assert_eq!(completed[0].condition_index, 0);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_material_is_wrapped() {
        let model = EmissionModel::default();
        let err = ScenarioComparator::new(&model)
            .compare(&scenarios(), 1.0, &[Condition::new(70.0, "PET")])
            .unwrap_err();
        assert!(matches!(err.root_cause(), LcaError::UnknownMaterial(_)));
    }

    #[test]
    fn mass_sweep() {
        let model = EmissionModel::default();
        let sweep = ScenarioComparator::new(&model)
            .compare_masses(&scenarios(), &[1.0, 0.07], &conditions())
            .unwrap();
        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep[1].mass_kg(), 0.07);
        assert_relative_eq!(
            sweep[1].get(1, 1).unwrap().total_emissions_kg_co2(),
            0.07 * sweep[0].get(1, 1).unwrap().total_emissions_kg_co2(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn condition_label() {
        assert_eq!(Condition::new(70.0, "PEEK").label(), "70% scrap + PEEK");
        assert_eq!(Condition::full_scrap("PA6").label(), "100% scrap + PA6");
    }
}
