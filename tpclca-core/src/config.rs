//! TOML configuration of reference data.
//!
//! ```toml
//! [[materials]]
//! id = "PA6"
//! name = "Polyamide 6"
//! kg_co2_per_kg = 4.45
//!
//! [[grid_mixes]]
//! name = "DE reference grid"
//! kg_co2_per_mj = 0.161
//! country_code = "DE"
//!
//! [[processes]]
//! name = "Separate Processes (Sphera)"
//! primary_energy_mj_per_kg = 0.33
//! secondary_energy_mj_per_kg = 1.1
//! grid_mix = "DE reference grid"
//!
//! [[processes]]
//! name = "Incineration"
//! kind = "incineration"
//! emissions_kg_co2_per_kg = 2.9
//! grid_carbon_intensity_kg_co2_per_mj = 0.0581
//! ```
//!
//! A process either gives its energy intensities or, for emissions-characterised
//! routes, `emissions_kg_co2_per_kg`. The grid is taken from `grid_mix` (a name
//! defined in the same file), else `grid_carbon_intensity_kg_co2_per_mj`, else
//! the reference grid.

use crate::conversion::intensity_per_kwh_to_per_mj;
use crate::errors::{LcaError, LcaResult};
use crate::material::MaterialEntry;
use crate::process::{ProcessParameters, REFERENCE_GRID_KG_CO2_PER_MJ};
use crate::reference::{GridMix, ProcessKind, ProcessRecord, ReferenceLibrary, ReferenceStore};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid mix as written in configuration.
///
/// Exactly one of `kg_co2_per_mj` and `kg_co2_per_kwh` must be given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMixConfig {
    pub name: String,
    pub kg_co2_per_mj: Option<FloatValue>,
    pub kg_co2_per_kwh: Option<FloatValue>,
    pub country_code: Option<String>,
}

impl GridMixConfig {
    fn build(&self) -> LcaResult<GridMix> {
        let per_mj = match (self.kg_co2_per_mj, self.kg_co2_per_kwh) {
            (Some(per_mj), None) => per_mj,
            (None, Some(per_kwh)) => intensity_per_kwh_to_per_mj(per_kwh)?,
            _ => {
                return Err(LcaError::Config(format!(
                    "grid mix '{}' needs exactly one of kg_co2_per_mj or kg_co2_per_kwh",
                    self.name
                )))
            }
        };
        let grid = GridMix::new(self.name.clone(), per_mj)?;
        Ok(match &self.country_code {
            Some(code) => grid.with_country_code(code.clone()),
            None => grid,
        })
    }
}

/// Process as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub name: String,
    pub kind: Option<ProcessKind>,
    pub primary_energy_mj_per_kg: FloatValue,
    pub secondary_energy_mj_per_kg: FloatValue,
    /// Alternative to the energy terms for emissions-characterised processes.
    /// unit: kg CO2 / kg
    pub emissions_kg_co2_per_kg: Option<FloatValue>,
    pub grid_mix: Option<String>,
    pub grid_carbon_intensity_kg_co2_per_mj: Option<FloatValue>,
    pub direct_emissions_kg_co2_per_kg: FloatValue,
}

impl ProcessConfig {
    fn build(&self, grids: &ReferenceLibrary) -> LcaResult<ProcessRecord> {
        let grid = match (&self.grid_mix, self.grid_carbon_intensity_kg_co2_per_mj) {
            (Some(_), Some(_)) => {
                return Err(LcaError::Config(format!(
                    "process '{}' sets both grid_mix and grid_carbon_intensity_kg_co2_per_mj",
                    self.name
                )))
            }
            (Some(name), None) => grids.grid_intensity(name)?,
            (None, Some(intensity)) => intensity,
            (None, None) => REFERENCE_GRID_KG_CO2_PER_MJ,
        };

        let parameters = match self.emissions_kg_co2_per_kg {
            Some(emissions) => {
                if self.primary_energy_mj_per_kg != 0.0 || self.secondary_energy_mj_per_kg != 0.0 {
                    return Err(LcaError::Config(format!(
                        "process '{}' mixes emissions_kg_co2_per_kg with energy intensities",
                        self.name
                    )));
                }
                ProcessParameters::from_emissions_equivalent(self.name.clone(), emissions, grid)?
            }
            None => ProcessParameters::with_grid(
                self.name.clone(),
                self.primary_energy_mj_per_kg,
                self.secondary_energy_mj_per_kg,
                grid,
            )?,
        };

        let record = ProcessRecord::new(parameters)
            .with_direct_emissions(self.direct_emissions_kg_co2_per_kg)?;
        Ok(match self.kind {
            Some(kind) => record.with_kind(kind),
            None => record,
        })
    }
}

/// Reference data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub materials: Vec<MaterialEntry>,
    pub grid_mixes: Vec<GridMixConfig>,
    pub processes: Vec<ProcessConfig>,
}

impl ReferenceConfig {
    pub fn from_toml_str(contents: &str) -> LcaResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> LcaResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validates every entry and builds the library.
    ///
    /// Grid mixes are resolved first so processes can refer to them by name.
    pub fn into_library(self) -> LcaResult<ReferenceLibrary> {
        self.extend(ReferenceLibrary::new())
    }

    /// Adds this configuration on top of an existing library.
    ///
    /// Entries with a name already present replace the existing entry.
    pub fn extend(self, library: ReferenceLibrary) -> LcaResult<ReferenceLibrary> {
        let mut library = library;
        for material in self.materials {
            library = library.with_material(material)?;
        }
        for grid in &self.grid_mixes {
            library = library.with_grid_mix(grid.build()?)?;
        }
        for process in &self.processes {
            let record = process.build(&library)?;
            library = library.with_process(record)?;
        }
        Ok(library)
    }
}
