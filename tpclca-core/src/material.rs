//! Material identifiers and the embodied-carbon lookup table.
//!
//! Material-specific behaviour is data: the Emission Model only ever asks a
//! [`MaterialProfile`] for `kg CO2 / kg`, so adding a polymer means adding an
//! entry, not a branch.

use crate::errors::{ensure_non_negative, LcaError, LcaResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a material in a [`MaterialProfile`].
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Polyamide 6
    pub fn pa6() -> Self {
        Self::new("PA6")
    }

    /// Polyether ether ketone
    pub fn peek() -> Self {
        Self::new("PEEK")
    }

    /// Polyphenylene sulfide
    pub fn pps() -> Self {
        Self::new("PPS")
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MaterialId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Thermoplastic,
    Composite,
    Fiber,
    Additive,
    Filler,
}

/// Reference data for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub id: MaterialId,
    /// Human readable name, e.g. "Polyamide 6"
    pub name: String,
    #[serde(default)]
    pub kind: MaterialKind,
    /// unit: kg / m^3
    #[serde(default)]
    pub density_kg_per_m3: Option<FloatValue>,
    /// Embodied carbon of virgin material
    /// unit: kg CO2 / kg
    pub kg_co2_per_kg: FloatValue,
}

impl MaterialEntry {
    pub fn new(
        id: impl Into<MaterialId>,
        name: impl Into<String>,
        kind: MaterialKind,
        kg_co2_per_kg: FloatValue,
    ) -> LcaResult<Self> {
        ensure_non_negative("kg_co2_per_kg", kg_co2_per_kg)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            kind,
            density_kg_per_m3: None,
            kg_co2_per_kg,
        })
    }

    pub fn with_density(mut self, density_kg_per_m3: FloatValue) -> LcaResult<Self> {
        ensure_non_negative("density_kg_per_m3", density_kg_per_m3)?;
        self.density_kg_per_m3 = Some(density_kg_per_m3);
        Ok(self)
    }

    pub(crate) fn validate(&self) -> LcaResult<()> {
        ensure_non_negative("kg_co2_per_kg", self.kg_co2_per_kg)?;
        if let Some(density) = self.density_kg_per_m3 {
            ensure_non_negative("density_kg_per_m3", density)?;
        }
        Ok(())
    }
}

/// Lookup table from material identifier to embodied carbon intensity.
///
/// Every entry is validated on the way in, including when deserialised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaterialProfile")]
pub struct MaterialProfile {
    entries: BTreeMap<MaterialId, MaterialEntry>,
}

/// Serialised form of [`MaterialProfile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMaterialProfile {
    #[serde(default)]
    pub entries: BTreeMap<MaterialId, MaterialEntry>,
}

impl TryFrom<RawMaterialProfile> for MaterialProfile {
    type Error = LcaError;

    fn try_from(raw: RawMaterialProfile) -> Result<Self, Self::Error> {
        for (key, entry) in &raw.entries {
            if key != &entry.id {
                return Err(LcaError::Config(format!(
                    "material key '{key}' does not match entry id '{}'",
                    entry.id
                )));
            }
            entry.validate()?;
        }
        Ok(Self {
            entries: raw.entries,
        })
    }
}

impl MaterialProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three reference polymers.
    ///
    /// | Material | kg CO2 / kg |
    /// |----------|-------------|
    /// | PA6      | 4.45        |
    /// | PEEK     | 13.70       |
    /// | PPS      | 2.13 (estimated) |
    pub fn reference() -> Self {
        let entries = [
            (MaterialId::pa6(), "Polyamide 6", 4.45),
            (MaterialId::peek(), "Polyether ether ketone", 13.70),
            (MaterialId::pps(), "Polyphenylene sulfide", 2.13),
        ]
        .into_iter()
        .map(|(id, name, kg_co2_per_kg)| {
            (
                id.clone(),
                MaterialEntry {
                    id,
                    name: name.to_string(),
                    kind: MaterialKind::Thermoplastic,
                    density_kg_per_m3: None,
                    kg_co2_per_kg,
                },
            )
        })
        .collect();
        Self { entries }
    }

    /// Builds a profile from validated entries. Later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = MaterialEntry>) -> LcaResult<Self> {
        entries
            .into_iter()
            .try_fold(Self::new(), |profile, entry| profile.with_entry(entry))
    }

    pub(crate) fn from_validated(entries: impl IntoIterator<Item = MaterialEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    /// Adds an entry, returning the new profile.
    ///
    /// An existing entry with the same id is replaced.
    pub fn with_entry(mut self, entry: MaterialEntry) -> LcaResult<Self> {
        entry.validate()?;
        self.entries.insert(entry.id.clone(), entry);
        Ok(self)
    }

    pub fn get(&self, id: &MaterialId) -> Option<&MaterialEntry> {
        self.entries.get(id)
    }

    /// Embodied carbon for `id`.
    pub fn kg_co2_per_kg(&self, id: &MaterialId) -> LcaResult<FloatValue> {
        self.get(id)
            .map(|entry| entry.kg_co2_per_kg)
            .ok_or_else(|| LcaError::UnknownMaterial(id.to_string()))
    }

    pub fn contains(&self, id: &MaterialId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &MaterialId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        let profile = MaterialProfile::reference();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.kg_co2_per_kg(&MaterialId::pa6()).unwrap(), 4.45);
        assert_eq!(profile.kg_co2_per_kg(&MaterialId::peek()).unwrap(), 13.70);
        assert_eq!(profile.kg_co2_per_kg(&MaterialId::pps()).unwrap(), 2.13);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let profile = MaterialProfile::reference();
        let err = profile.kg_co2_per_kg(&MaterialId::new("pa6")).unwrap_err();
        assert!(matches!(err, LcaError::UnknownMaterial(id) if id == "pa6"));
    }

    #[test]
    fn extend_with_new_material() {
        let pp = MaterialEntry::new("PP", "Polypropylene", MaterialKind::Thermoplastic, 2.5)
            .unwrap()
            .with_density(900.0)
            .unwrap();
        let profile = MaterialProfile::reference().with_entry(pp).unwrap();

        assert_eq!(profile.len(), 4);
        assert_eq!(profile.kg_co2_per_kg(&"PP".into()).unwrap(), 2.5);
        assert_eq!(
            profile.get(&"PP".into()).unwrap().density_kg_per_m3,
            Some(900.0)
        );
    }

    #[test]
    fn negative_intensity_rejected() {
        assert!(MaterialEntry::new("X", "X", MaterialKind::Filler, -0.1).is_err());
    }

    #[test]
    fn deserialised_profile_is_validated() {
        let ok: MaterialProfile = serde_json::from_str(
            r#"{"entries": {"PA6": {"id": "PA6", "name": "Polyamide 6", "kg_co2_per_kg": 4.45}}}"#,
        )
        .unwrap();
        assert_eq!(ok.kg_co2_per_kg(&MaterialId::pa6()).unwrap(), 4.45);

        let negative = serde_json::from_str::<MaterialProfile>(
            r#"{"entries": {"PA6": {"id": "PA6", "name": "Polyamide 6", "kg_co2_per_kg": -40.0}}}"#,
        );
        assert!(negative.is_err());

        let mismatched = serde_json::from_str::<MaterialProfile>(
            r#"{"entries": {"PEEK": {"id": "PA6", "name": "Polyamide 6", "kg_co2_per_kg": 4.45}}}"#,
        );
        assert!(mismatched.is_err());
    }

    #[test]
    fn from_entries_validates() {
        let mut bad = MaterialEntry::new("X", "X", MaterialKind::Filler, 1.0).unwrap();
        bad.kg_co2_per_kg = -1.0;
        assert!(MaterialProfile::from_entries([bad]).is_err());

        let profile =
            MaterialProfile::from_entries(MaterialProfile::reference().iter().cloned()).unwrap();
        assert_eq!(profile, MaterialProfile::reference());
    }

    #[test]
    fn ids_are_ordered() {
        let profile = MaterialProfile::reference();
        let ids: Vec<&str> = profile.ids().map(MaterialId::as_str).collect();
        assert_eq!(ids, vec!["PA6", "PEEK", "PPS"]);
    }
}
