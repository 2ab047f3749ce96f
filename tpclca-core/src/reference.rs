//! Read-only reference data.
//!
//! The engine never talks to a database. Materials, processes and grid mixes
//! are looked up by name through [`ReferenceStore`]; misses are reported as
//! [`LcaError::UnknownReference`], never as invalid parameters.

use crate::errors::{ensure_non_negative, LcaError, LcaResult, ReferenceKind};
use crate::material::{MaterialEntry, MaterialId, MaterialProfile};
use crate::process::ProcessParameters;
use crate::FloatValue;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Electricity supply mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMix {
    pub name: String,
    /// unit: kg CO2 / MJ
    pub kg_co2_per_mj: FloatValue,
    /// Two-letter country code
    #[serde(default)]
    pub country_code: Option<String>,
}

impl GridMix {
    pub fn new(name: impl Into<String>, kg_co2_per_mj: FloatValue) -> LcaResult<Self> {
        Ok(Self {
            name: name.into(),
            kg_co2_per_mj: ensure_non_negative("kg_co2_per_mj", kg_co2_per_mj)?,
            country_code: None,
        })
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    fn validate(&self) -> LcaResult<()> {
        ensure_non_negative("kg_co2_per_mj", self.kg_co2_per_mj).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Recycling,
    InjectionMolding,
    Extrusion,
    Thermoforming,
    BlowMolding,
    Incineration,
}

/// A process as stored in the reference library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub parameters: ProcessParameters,
    #[serde(default)]
    pub kind: Option<ProcessKind>,
    /// Emissions released by the process itself, independent of electricity use.
    /// unit: kg CO2 / kg
    #[serde(default)]
    pub direct_emissions_kg_co2_per_kg: FloatValue,
}

impl ProcessRecord {
    pub fn new(parameters: ProcessParameters) -> Self {
        Self {
            parameters,
            kind: None,
            direct_emissions_kg_co2_per_kg: 0.0,
        }
    }

    pub fn with_kind(mut self, kind: ProcessKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_direct_emissions(mut self, kg_co2_per_kg: FloatValue) -> LcaResult<Self> {
        self.direct_emissions_kg_co2_per_kg =
            ensure_non_negative("direct_emissions_kg_co2_per_kg", kg_co2_per_kg)?;
        Ok(self)
    }

    fn validate(&self) -> LcaResult<()> {
        ensure_non_negative(
            "direct_emissions_kg_co2_per_kg",
            self.direct_emissions_kg_co2_per_kg,
        )
        .map(|_| ())
    }
}

/// Name-based lookups of reference data.
pub trait ReferenceStore {
    fn get_material(&self, name: &str) -> LcaResult<&MaterialEntry>;
    fn get_process(&self, name: &str) -> LcaResult<&ProcessParameters>;
    fn get_grid_mix(&self, name: &str) -> LcaResult<&GridMix>;

    /// Carbon intensity of a named grid mix.
    /// unit: kg CO2 / MJ
    fn grid_intensity(&self, name: &str) -> LcaResult<FloatValue> {
        self.get_grid_mix(name).map(|g| g.kg_co2_per_mj)
    }
}

/// In-memory reference library.
///
/// Entries are kept in name order. Once built the library is only read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReferenceLibrary")]
pub struct ReferenceLibrary {
    materials: BTreeMap<String, MaterialEntry>,
    processes: BTreeMap<String, ProcessRecord>,
    grid_mixes: BTreeMap<String, GridMix>,
}

/// Serialised form of [`ReferenceLibrary`], keyed by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReferenceLibrary {
    pub materials: BTreeMap<String, MaterialEntry>,
    pub processes: BTreeMap<String, ProcessRecord>,
    pub grid_mixes: BTreeMap<String, GridMix>,
}

fn ensure_key_matches(kind: ReferenceKind, key: &str, name: &str) -> LcaResult<()> {
    if key != name {
        return Err(LcaError::Config(format!(
            "{kind} key '{key}' does not match its name '{name}'"
        )));
    }
    Ok(())
}

impl TryFrom<RawReferenceLibrary> for ReferenceLibrary {
    type Error = LcaError;

    fn try_from(raw: RawReferenceLibrary) -> Result<Self, Self::Error> {
        for (key, entry) in &raw.materials {
            ensure_key_matches(ReferenceKind::Material, key, entry.id.as_str())?;
            entry.validate()?;
        }
        for (key, record) in &raw.processes {
            ensure_key_matches(ReferenceKind::Process, key, record.parameters.name())?;
            record.validate()?;
        }
        for (key, grid_mix) in &raw.grid_mixes {
            ensure_key_matches(ReferenceKind::GridMix, key, &grid_mix.name)?;
            grid_mix.validate()?;
        }
        Ok(Self {
            materials: raw.materials,
            processes: raw.processes,
            grid_mixes: raw.grid_mixes,
        })
    }
}

impl ReferenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material, keyed by its id.
    pub fn with_material(mut self, entry: MaterialEntry) -> LcaResult<Self> {
        entry.validate()?;
        let key = entry.id.to_string();
        if self.materials.insert(key.clone(), entry).is_some() {
            warn!("Material '{key}' was defined more than once; keeping the last definition");
        }
        Ok(self)
    }

    pub fn with_process(mut self, record: ProcessRecord) -> LcaResult<Self> {
        record.validate()?;
        let key = record.parameters.name().to_string();
        if self.processes.insert(key.clone(), record).is_some() {
            warn!("Process '{key}' was defined more than once; keeping the last definition");
        }
        Ok(self)
    }

    pub fn with_grid_mix(mut self, grid_mix: GridMix) -> LcaResult<Self> {
        grid_mix.validate()?;
        let key = grid_mix.name.clone();
        if self.grid_mixes.insert(key.clone(), grid_mix).is_some() {
            warn!("Grid mix '{key}' was defined more than once; keeping the last definition");
        }
        Ok(self)
    }

    pub fn process_record(&self, name: &str) -> LcaResult<&ProcessRecord> {
        self.processes
            .get(name)
            .ok_or_else(|| LcaError::unknown_reference(ReferenceKind::Process, name))
    }

    /// All materials as a lookup table for the Emission Model.
    pub fn material_profile(&self) -> MaterialProfile {
        MaterialProfile::from_validated(self.materials.values().cloned())
    }

    pub fn material_ids(&self) -> impl Iterator<Item = &MaterialId> {
        self.materials.values().map(|m| &m.id)
    }

    pub fn process_names(&self) -> impl Iterator<Item = &str> {
        self.processes.keys().map(String::as_str)
    }

    pub fn grid_mix_names(&self) -> impl Iterator<Item = &str> {
        self.grid_mixes.keys().map(String::as_str)
    }

    /// Processes in name order.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessParameters> {
        self.processes.values().map(|r| &r.parameters)
    }
}

impl ReferenceStore for ReferenceLibrary {
    fn get_material(&self, name: &str) -> LcaResult<&MaterialEntry> {
        self.materials
            .get(name)
            .ok_or_else(|| LcaError::unknown_reference(ReferenceKind::Material, name))
    }

    fn get_process(&self, name: &str) -> LcaResult<&ProcessParameters> {
        self.process_record(name).map(|r| &r.parameters)
    }

    fn get_grid_mix(&self, name: &str) -> LcaResult<&GridMix> {
        self.grid_mixes
            .get(name)
            .ok_or_else(|| LcaError::unknown_reference(ReferenceKind::GridMix, name))
    }
}

/// One entry of a category catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub group: String,
    pub label: String,
    pub description: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        group: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Immutable mapping from category identifier to display label and description.
///
/// Insertion order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Builds a catalogue. Later duplicates of an id are dropped.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut unique: Vec<Category> = Vec::new();
        for category in categories {
            if unique.iter().any(|c| c.id == category.id) {
                warn!("Duplicate category id '{}' ignored", category.id);
                continue;
            }
            unique.push(category);
        }
        Self { categories: unique }
    }

    pub fn get(&self, id: &str) -> LcaResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LcaError::unknown_reference(ReferenceKind::Category, id))
    }

    /// `(label, description)` of a category.
    pub fn describe(&self, id: &str) -> LcaResult<(&str, &str)> {
        self.get(id)
            .map(|c| (c.label.as_str(), c.description.as_str()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Category> + 'a {
        self.categories.iter().filter(move |c| c.group == group)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    fn library() -> ReferenceLibrary {
        ReferenceLibrary::new()
            .with_material(
                MaterialEntry::new("PA6", "Polyamide 6", MaterialKind::Thermoplastic, 4.45)
                    .unwrap(),
            )
            .unwrap()
            .with_grid_mix(GridMix::new("DE", 0.161).unwrap().with_country_code("DE"))
            .unwrap()
            .with_process(ProcessRecord::new(
                ProcessParameters::new("Separate Processes (Sphera)", 0.33, 1.1).unwrap(),
            ))
            .unwrap()
    }

    #[test]
    fn lookups() {
        let lib = library();
        assert_eq!(lib.get_material("PA6").unwrap().kg_co2_per_kg, 4.45);
        assert_eq!(
            lib.get_process("Separate Processes (Sphera)")
                .unwrap()
                .primary_energy_mj_per_kg(),
            0.33
        );
        assert_eq!(lib.grid_intensity("DE").unwrap(), 0.161);
        assert!(lib.material_profile().contains(&MaterialId::pa6()));
    }

    #[test]
    fn misses_are_unknown_references() {
        let lib = library();
        let err = lib.get_material("PEEK").unwrap_err();
        assert!(matches!(
            err,
            LcaError::UnknownReference {
                kind: ReferenceKind::Material,
                ..
            }
        ));
        assert!(matches!(
            lib.get_process("Extrusion").unwrap_err(),
            LcaError::UnknownReference {
                kind: ReferenceKind::Process,
                ..
            }
        ));
        assert!(matches!(
            lib.get_grid_mix("FR").unwrap_err(),
            LcaError::UnknownReference {
                kind: ReferenceKind::GridMix,
                ..
            }
        ));
    }

    #[test]
    fn deserialised_library_is_validated() {
        let value = serde_json::to_value(library()).unwrap();
        let reloaded: ReferenceLibrary = serde_json::from_value(value).unwrap();
        assert_eq!(reloaded.grid_intensity("DE").unwrap(), 0.161);

        let mut value = serde_json::to_value(library()).unwrap();
        value["materials"]["PA6"]["kg_co2_per_kg"] = serde_json::json!(-40.0);
        assert!(serde_json::from_value::<ReferenceLibrary>(value).is_err());

        let mut value = serde_json::to_value(library()).unwrap();
        value["grid_mixes"]["DE"]["kg_co2_per_mj"] = serde_json::json!(-0.1);
        assert!(serde_json::from_value::<ReferenceLibrary>(value).is_err());

        let mut value = serde_json::to_value(library()).unwrap();
        value["processes"]["Separate Processes (Sphera)"]["direct_emissions_kg_co2_per_kg"] =
            serde_json::json!(-1.0);
        assert!(serde_json::from_value::<ReferenceLibrary>(value).is_err());

        let mut value = serde_json::to_value(library()).unwrap();
        value["grid_mixes"]["DE"]["name"] = serde_json::json!("NL");
        assert!(serde_json::from_value::<ReferenceLibrary>(value).is_err());
    }

    #[test]
    fn builders_reject_invalid_records() {
        let mut grid = GridMix::new("DE", 0.161).unwrap();
        grid.kg_co2_per_mj = -0.161;
        assert!(ReferenceLibrary::new().with_grid_mix(grid).is_err());

        let mut record = ProcessRecord::new(ProcessParameters::new("Extrusion", 1.0, 0.0).unwrap());
        record.direct_emissions_kg_co2_per_kg = -0.2;
        assert!(ReferenceLibrary::new().with_process(record).is_err());
    }

    #[test]
    fn catalog_lookup() {
        let catalog = CategoryCatalog::new([
            Category::new("recycler", "Logistics & Processing", "Recycler", "Recycles TPCs"),
            Category::new("other", "Other", "Other", "Catch-all"),
            Category::new("other", "Other", "Other again", "ignored"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.describe("recycler").unwrap(),
            ("Recycler", "Recycles TPCs")
        );
        assert_eq!(catalog.get("other").unwrap().label, "Other");
        assert!(catalog.get("airline").is_err());
        assert_eq!(catalog.in_group("Other").count(), 1);
    }
}
