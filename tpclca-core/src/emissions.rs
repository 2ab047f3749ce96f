//! The Emission Model
//!
//! Converts process energy, feed composition and grid carbon intensity into
//! CO2-equivalent emissions for one batch of processed material:
//!
//! $$ E_{tot} = (e_1 + e_2) \cdot m $$
//! $$ CO_2^{energy} = E_{tot} \cdot I_{grid} $$
//! $$ CO_2^{material} = \frac{100 - s}{100} \cdot c_{mat} \cdot m $$
//!
//! Where:
//! - $e_1, e_2$ are the primary and secondary energy intensities (MJ / kg)
//! - $m$ is the output mass (kg)
//! - $s$ is the scrap fraction (%)
//! - $c_{mat}$ is the embodied carbon of the virgin material (kg CO2 / kg)

use crate::errors::{LcaError, LcaResult};
use crate::material::{MaterialId, MaterialProfile};
use crate::process::ProcessParameters;
use crate::FloatValue;
use log::trace;
use serde::{Deserialize, Serialize};

/// Emissions of one evaluation.
///
/// Only the [`EmissionModel`] creates non-zero breakdowns, so
/// `total == energy + material` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EmissionBreakdown {
    /// unit: MJ
    total_energy_mj: FloatValue,
    /// unit: kg CO2
    energy_emissions_kg_co2: FloatValue,
    /// unit: kg CO2
    material_emissions_kg_co2: FloatValue,
    /// unit: kg CO2
    total_emissions_kg_co2: FloatValue,
}

impl EmissionBreakdown {
    fn from_terms(
        total_energy_mj: FloatValue,
        energy_emissions_kg_co2: FloatValue,
        material_emissions_kg_co2: FloatValue,
    ) -> Self {
        Self {
            total_energy_mj,
            energy_emissions_kg_co2,
            material_emissions_kg_co2,
            total_emissions_kg_co2: energy_emissions_kg_co2 + material_emissions_kg_co2,
        }
    }

    pub fn total_energy_mj(&self) -> FloatValue {
        self.total_energy_mj
    }

    pub fn energy_emissions_kg_co2(&self) -> FloatValue {
        self.energy_emissions_kg_co2
    }

    pub fn material_emissions_kg_co2(&self) -> FloatValue {
        self.material_emissions_kg_co2
    }

    pub fn total_emissions_kg_co2(&self) -> FloatValue {
        self.total_emissions_kg_co2
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Stateless evaluator over a fixed material lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionModel {
    materials: MaterialProfile,
}

impl Default for EmissionModel {
    fn default() -> Self {
        Self::from_materials(MaterialProfile::reference())
    }
}

impl EmissionModel {
    pub fn from_materials(materials: MaterialProfile) -> Self {
        Self { materials }
    }

    pub fn materials(&self) -> &MaterialProfile {
        &self.materials
    }

    /// Emissions for `mass_kg` of output at the given scrap fraction.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `mass_kg` is negative or not finite
    /// - `InvalidParameter` if `scrap_fraction_percent` lies outside `[0, 100]`
    /// - `UnknownMaterial` if `material` is not in the profile
    pub fn compute(
        &self,
        process: &ProcessParameters,
        mass_kg: FloatValue,
        scrap_fraction_percent: FloatValue,
        material: &MaterialId,
    ) -> LcaResult<EmissionBreakdown> {
        if !mass_kg.is_finite() || mass_kg < 0.0 {
            return Err(LcaError::invalid(
                "mass_kg",
                mass_kg,
                "must be a finite, non-negative mass",
            ));
        }
        if !(0.0..=100.0).contains(&scrap_fraction_percent) {
            return Err(LcaError::invalid(
                "scrap_fraction_percent",
                scrap_fraction_percent,
                "must lie within [0, 100]",
            ));
        }
        let material_co2_per_kg = self.materials.kg_co2_per_kg(material)?;

        let total_energy_mj = process.energy_intensity_mj_per_kg() * mass_kg;
        let energy_emissions = total_energy_mj * process.grid_carbon_intensity_kg_co2_per_mj();

        let virgin_fraction = (100.0 - scrap_fraction_percent) / 100.0;
        let material_emissions = virgin_fraction * material_co2_per_kg * mass_kg;

        let breakdown =
            EmissionBreakdown::from_terms(total_energy_mj, energy_emissions, material_emissions);
        trace!(
            "{} | {} kg | {}% scrap | {}: {:?}",
            process.name(),
            mass_kg,
            scrap_fraction_percent,
            material,
            breakdown
        );
        Ok(breakdown)
    }
}
