//! Manufacturing scenarios
//!
//! A manufacturing scenario produces `mass_kg` of a part from virgin material
//! with a named process on a named grid mix:
//!
//! $$ E = m \cdot c_{mat} + m \cdot e_{proc} \cdot g + m \cdot d_{proc} $$
//!
//! where $c_{mat}$ is the embodied carbon of the material, $e_{proc}$ the energy
//! intensity of the process, $g$ the carbon intensity of the grid mix and
//! $d_{proc}$ the direct (non-electric) emissions factor of the process.
//!
//! The first two terms come from the Emission Model with a scrap fraction of 0.

use log::debug;
use serde::{Deserialize, Serialize};
use tpclca_core::conversion::mj_to_kwh;
use tpclca_core::emissions::{EmissionBreakdown, EmissionModel};
use tpclca_core::errors::LcaResult;
use tpclca_core::material::{MaterialKind, MaterialProfile};
use tpclca_core::reference::{ReferenceLibrary, ReferenceStore};
use tpclca_core::FloatValue;

/// All names refer to entries of a [`ReferenceLibrary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingScenario {
    pub material_name: String,
    pub process_name: String,
    pub grid_mix_name: String,
    pub mass_kg: FloatValue,
}

impl ManufacturingScenario {
    pub fn new(
        material_name: impl Into<String>,
        process_name: impl Into<String>,
        grid_mix_name: impl Into<String>,
        mass_kg: FloatValue,
    ) -> Self {
        Self {
            material_name: material_name.into(),
            process_name: process_name.into(),
            grid_mix_name: grid_mix_name.into(),
            mass_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturingResult {
    pub scenario: ManufacturingScenario,
    pub material_kind: MaterialKind,
    /// Material and electricity terms
    pub breakdown: EmissionBreakdown,
    /// unit: kg CO2 / MJ
    pub grid_carbon_intensity_kg_co2_per_mj: FloatValue,
    /// unit: kg CO2
    pub direct_process_emissions_kg_co2: FloatValue,
}

impl ManufacturingResult {
    /// Electricity plus direct emissions of the process.
    /// unit: kg CO2
    pub fn process_emissions_kg_co2(&self) -> FloatValue {
        self.breakdown.energy_emissions_kg_co2() + self.direct_process_emissions_kg_co2
    }

    /// unit: kg CO2
    pub fn material_emissions_kg_co2(&self) -> FloatValue {
        self.breakdown.material_emissions_kg_co2()
    }

    /// unit: kg CO2
    pub fn total_emissions_kg_co2(&self) -> FloatValue {
        self.breakdown.total_emissions_kg_co2() + self.direct_process_emissions_kg_co2
    }

    /// unit: kWh
    pub fn energy_consumption_kwh(&self) -> FloatValue {
        mj_to_kwh(self.breakdown.total_energy_mj())
    }
}

/// Evaluates manufacturing scenarios against a reference library.
#[derive(Debug, Clone)]
pub struct ManufacturingCalculator<'a> {
    library: &'a ReferenceLibrary,
}

impl<'a> ManufacturingCalculator<'a> {
    pub fn new(library: &'a ReferenceLibrary) -> Self {
        Self { library }
    }

    /// # Errors
    ///
    /// - `UnknownReference` if the material, process or grid mix is not in the library
    /// - `InvalidParameter` if `mass_kg` is negative or not finite
    pub fn calculate(&self, scenario: &ManufacturingScenario) -> LcaResult<ManufacturingResult> {
        let material = self.library.get_material(&scenario.material_name)?;
        let record = self.library.process_record(&scenario.process_name)?;
        let grid = self.library.grid_intensity(&scenario.grid_mix_name)?;

        let process = record.parameters.on_grid(grid)?;
        let model =
            EmissionModel::from_materials(MaterialProfile::new().with_entry(material.clone())?);
        let breakdown = model.compute(&process, scenario.mass_kg, 0.0, &material.id)?;

        Ok(ManufacturingResult {
            scenario: scenario.clone(),
            material_kind: material.kind,
            breakdown,
            grid_carbon_intensity_kg_co2_per_mj: grid,
            direct_process_emissions_kg_co2: record.direct_emissions_kg_co2_per_kg
                * scenario.mass_kg,
        })
    }

    /// Evaluates scenarios in order, stopping at the first failure.
    pub fn compare_scenarios(
        &self,
        scenarios: &[ManufacturingScenario],
    ) -> LcaResult<Vec<ManufacturingResult>> {
        debug!("Comparing {} manufacturing scenarios", scenarios.len());
        scenarios.iter().map(|s| self.calculate(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{reference_library, DE_GRID_MIX, INJECTION_MOLDING_PP, NL_GRID_MIX};
    use approx::assert_relative_eq;
    use tpclca_core::errors::{LcaError, ReferenceKind};

    #[test]
    fn polypropylene_on_two_grids() {
        let library = reference_library().unwrap();
        let calculator = ManufacturingCalculator::new(&library);

        let results = calculator
            .compare_scenarios(&[
                ManufacturingScenario::new("PP", INJECTION_MOLDING_PP, DE_GRID_MIX, 1.0),
                ManufacturingScenario::new("PP", INJECTION_MOLDING_PP, NL_GRID_MIX, 1.0),
            ])
            .unwrap();

        // 0.5 kWh at 0.161 kg CO2 / kWh
        let de = &results[0];
        assert_relative_eq!(de.material_emissions_kg_co2(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(de.process_emissions_kg_co2(), 0.0805 + 0.2, epsilon = 1e-12);
        assert_relative_eq!(de.total_emissions_kg_co2(), 2.7805, epsilon = 1e-12);
        assert_relative_eq!(de.energy_consumption_kwh(), 0.5, epsilon = 1e-12);
        assert_eq!(de.material_kind, MaterialKind::Thermoplastic);

        // 0.5 kWh at 1.28 kg CO2 / kWh
        let nl = &results[1];
        assert_relative_eq!(nl.process_emissions_kg_co2(), 0.64 + 0.2, epsilon = 1e-12);
        assert_relative_eq!(nl.total_emissions_kg_co2(), 3.34, epsilon = 1e-12);
    }

    #[test]
    fn scales_with_mass() {
        let library = reference_library().unwrap();
        let calculator = ManufacturingCalculator::new(&library);
        let one = calculator
            .calculate(&ManufacturingScenario::new("CFRP", INJECTION_MOLDING_PP, DE_GRID_MIX, 1.0))
            .unwrap();
        let two = calculator
            .calculate(&ManufacturingScenario::new("CFRP", INJECTION_MOLDING_PP, DE_GRID_MIX, 2.0))
            .unwrap();
        assert_eq!(one.material_kind, MaterialKind::Composite);
        assert_relative_eq!(one.total_emissions_kg_co2(), 15.2805, epsilon = 1e-12);
        assert_relative_eq!(
            two.total_emissions_kg_co2(),
            2.0 * one.total_emissions_kg_co2(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn unknown_grid_mix_stops_comparison() {
        let library = reference_library().unwrap();
        let calculator = ManufacturingCalculator::new(&library);
        let err = calculator
            .compare_scenarios(&[
                ManufacturingScenario::new("PP", INJECTION_MOLDING_PP, DE_GRID_MIX, 1.0),
                ManufacturingScenario::new("PP", INJECTION_MOLDING_PP, "FR grid mix", 1.0),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            LcaError::UnknownReference {
                kind: ReferenceKind::GridMix,
                ..
            }
        ));
    }

    #[test]
    fn negative_mass() {
        let library = reference_library().unwrap();
        let err = ManufacturingCalculator::new(&library)
            .calculate(&ManufacturingScenario::new("PP", INJECTION_MOLDING_PP, DE_GRID_MIX, -1.0))
            .unwrap_err();
        assert!(matches!(err, LcaError::InvalidParameter { .. }));
    }
}
