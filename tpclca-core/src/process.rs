//! Process parameterisations.
//!
//! A [`ProcessParameters`] is the value-level description of one recycling or
//! manufacturing route. Instances are immutable: every "variant" of a route
//! (another grid, comminution only, a renamed copy) is a new, validated value.

use crate::conversion::energy_equivalent_mj;
use crate::errors::{ensure_non_negative, LcaResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Reference grid carbon intensity (German grid mix).
/// unit: kg CO2 / MJ
pub const REFERENCE_GRID_KG_CO2_PER_MJ: FloatValue = 0.161;

/// Energy and grid parameters of a process.
///
/// Both energy terms are intensities per kg of *output* material, which is
/// what allows the Emission Model to scale them linearly by mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProcessParameters", into = "RawProcessParameters")]
pub struct ProcessParameters {
    name: String,
    primary_energy_mj_per_kg: FloatValue,
    secondary_energy_mj_per_kg: FloatValue,
    grid_carbon_intensity_kg_co2_per_mj: FloatValue,
}

impl ProcessParameters {
    /// Creates a process on the reference grid.
    pub fn new(
        name: impl Into<String>,
        primary_energy_mj_per_kg: FloatValue,
        secondary_energy_mj_per_kg: FloatValue,
    ) -> LcaResult<Self> {
        Self::with_grid(
            name,
            primary_energy_mj_per_kg,
            secondary_energy_mj_per_kg,
            REFERENCE_GRID_KG_CO2_PER_MJ,
        )
    }

    pub fn with_grid(
        name: impl Into<String>,
        primary_energy_mj_per_kg: FloatValue,
        secondary_energy_mj_per_kg: FloatValue,
        grid_carbon_intensity_kg_co2_per_mj: FloatValue,
    ) -> LcaResult<Self> {
        Ok(Self {
            name: name.into(),
            primary_energy_mj_per_kg: ensure_non_negative(
                "primary_energy_mj_per_kg",
                primary_energy_mj_per_kg,
            )?,
            secondary_energy_mj_per_kg: ensure_non_negative(
                "secondary_energy_mj_per_kg",
                secondary_energy_mj_per_kg,
            )?,
            grid_carbon_intensity_kg_co2_per_mj: ensure_non_negative(
                "grid_carbon_intensity_kg_co2_per_mj",
                grid_carbon_intensity_kg_co2_per_mj,
            )?,
        })
    }

    /// Creates a process that is characterised by its emissions rather than its energy use.
    ///
    /// The emissions are expressed as an equivalent primary energy on the given grid,
    /// and the grid is pinned to the same factor, so that evaluating the process for
    /// 1 kg reproduces `emissions_kg_co2_per_kg` as energy emissions.
    pub fn from_emissions_equivalent(
        name: impl Into<String>,
        emissions_kg_co2_per_kg: FloatValue,
        grid_carbon_intensity_kg_co2_per_mj: FloatValue,
    ) -> LcaResult<Self> {
        let primary = energy_equivalent_mj(
            emissions_kg_co2_per_kg,
            grid_carbon_intensity_kg_co2_per_mj,
        )?;
        Self::with_grid(name, primary, 0.0, grid_carbon_intensity_kg_co2_per_mj)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Energy of the first step, e.g. granulating or comminution.
    /// unit: MJ / kg
    pub fn primary_energy_mj_per_kg(&self) -> FloatValue {
        self.primary_energy_mj_per_kg
    }

    /// Energy of the second step, e.g. pelletizing or consolidation.
    /// unit: MJ / kg
    pub fn secondary_energy_mj_per_kg(&self) -> FloatValue {
        self.secondary_energy_mj_per_kg
    }

    /// unit: kg CO2 / MJ
    pub fn grid_carbon_intensity_kg_co2_per_mj(&self) -> FloatValue {
        self.grid_carbon_intensity_kg_co2_per_mj
    }

    /// Sum of both energy steps.
    /// unit: MJ / kg
    pub fn energy_intensity_mj_per_kg(&self) -> FloatValue {
        self.primary_energy_mj_per_kg + self.secondary_energy_mj_per_kg
    }

    /// Same process evaluated on another grid.
    pub fn on_grid(&self, grid_carbon_intensity_kg_co2_per_mj: FloatValue) -> LcaResult<Self> {
        Self::with_grid(
            self.name.clone(),
            self.primary_energy_mj_per_kg,
            self.secondary_energy_mj_per_kg,
            grid_carbon_intensity_kg_co2_per_mj,
        )
    }

    /// Same parameters under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy with a replaced primary step, e.g. swapping the granulator for spiral grinding.
    pub fn with_primary_energy(
        &self,
        name: impl Into<String>,
        primary_energy_mj_per_kg: FloatValue,
    ) -> LcaResult<Self> {
        Self::with_grid(
            name,
            primary_energy_mj_per_kg,
            self.secondary_energy_mj_per_kg,
            self.grid_carbon_intensity_kg_co2_per_mj,
        )
    }

    /// Copy containing only the primary (comminution) step.
    pub fn primary_only(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secondary_energy_mj_per_kg: 0.0,
            ..self.clone()
        }
    }
}

/// Serialised form of [`ProcessParameters`].
///
/// Deserialisation goes through [`ProcessParameters::with_grid`] so invalid
/// records never become values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProcessParameters {
    pub name: String,
    pub primary_energy_mj_per_kg: FloatValue,
    pub secondary_energy_mj_per_kg: FloatValue,
    pub grid_carbon_intensity_kg_co2_per_mj: FloatValue,
}

impl Default for RawProcessParameters {
    fn default() -> Self {
        Self {
            name: String::new(),
            primary_energy_mj_per_kg: 0.0,
            secondary_energy_mj_per_kg: 0.0,
            grid_carbon_intensity_kg_co2_per_mj: REFERENCE_GRID_KG_CO2_PER_MJ,
        }
    }
}

impl TryFrom<RawProcessParameters> for ProcessParameters {
    type Error = crate::errors::LcaError;

    fn try_from(raw: RawProcessParameters) -> Result<Self, Self::Error> {
        ProcessParameters::with_grid(
            raw.name,
            raw.primary_energy_mj_per_kg,
            raw.secondary_energy_mj_per_kg,
            raw.grid_carbon_intensity_kg_co2_per_mj,
        )
    }
}

impl From<ProcessParameters> for RawProcessParameters {
    fn from(p: ProcessParameters) -> Self {
        Self {
            name: p.name,
            primary_energy_mj_per_kg: p.primary_energy_mj_per_kg,
            secondary_energy_mj_per_kg: p.secondary_energy_mj_per_kg,
            grid_carbon_intensity_kg_co2_per_mj: p.grid_carbon_intensity_kg_co2_per_mj,
        }
    }
}
