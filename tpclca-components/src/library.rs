//! Bundled reference library
//!
//! Materials, grid mixes and processes ship as TOML (`data/reference_library.toml`)
//! and are loaded through [`ReferenceConfig`], so the values can be reviewed
//! and overridden without touching code.

use tpclca_core::config::ReferenceConfig;
use tpclca_core::errors::LcaResult;
use tpclca_core::process::ProcessParameters;
use tpclca_core::reference::{ReferenceLibrary, ReferenceStore};

/// Contents of the bundled reference library.
pub const REFERENCE_LIBRARY_TOML: &str = include_str!("../data/reference_library.toml");

pub const AGGREGATED_SPHERA: &str = "Aggregated Process (Sphera)";
pub const SEPARATE_SPHERA: &str = "Separate Processes (Sphera)";
pub const HYBRID_SPIRAL_SPHERA: &str = "Hybrid Process (Spiral + Sphera)";
pub const ALTERNATIVE_SPHERA_PIE: &str = "Alternative Process (Sphera + PIE)";
pub const SPIRAL_STEADY_STATE: &str = "Spiral Grinding + Sphera Pelletization";
pub const INCINERATION: &str = "Incineration";
pub const INJECTION_MOLDING_PP: &str = "Injection Molding for PP";

/// Grid of the recycling route analysis, 0.161 kg CO2 / MJ.
pub const DE_REFERENCE_GRID: &str = "DE reference grid";
pub const DE_GRID_MIX: &str = "DE grid mix";
pub const NL_GRID_MIX: &str = "NL grid mix";

/// Recycling routes in presentation order.
pub const RECYCLING_ROUTES: [&str; 4] = [
    AGGREGATED_SPHERA,
    SEPARATE_SPHERA,
    HYBRID_SPIRAL_SPHERA,
    ALTERNATIVE_SPHERA_PIE,
];

/// Loads the bundled reference library.
pub fn reference_library() -> LcaResult<ReferenceLibrary> {
    ReferenceConfig::from_toml_str(REFERENCE_LIBRARY_TOML)?.into_library()
}

/// Loads the bundled library with `overrides` (TOML) applied on top.
///
/// Entries in `overrides` replace bundled entries of the same name.
pub fn reference_library_with(overrides: &str) -> LcaResult<ReferenceLibrary> {
    ReferenceConfig::from_toml_str(overrides)?.extend(reference_library()?)
}

fn lookup<S: ReferenceStore + ?Sized>(
    store: &S,
    names: &[&str],
) -> LcaResult<Vec<ProcessParameters>> {
    names
        .iter()
        .map(|name| store.get_process(name).cloned())
        .collect()
}

/// The four recycling routes.
pub fn recycling_routes<S: ReferenceStore + ?Sized>(
    store: &S,
) -> LcaResult<Vec<ProcessParameters>> {
    lookup(store, &RECYCLING_ROUTES)
}

/// The recycling routes followed by the incineration baseline.
pub fn recycling_scenarios<S: ReferenceStore + ?Sized>(
    store: &S,
) -> LcaResult<Vec<ProcessParameters>> {
    let mut names = RECYCLING_ROUTES.to_vec();
    names.push(INCINERATION);
    lookup(store, &names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tpclca_core::errors::{LcaError, ReferenceKind};
    use tpclca_core::reference::ProcessKind;

    #[test]
    fn bundled_library_loads() {
        let library = reference_library().unwrap();

        assert_eq!(library.get_material("PA6").unwrap().kg_co2_per_kg, 4.45);
        assert_eq!(library.get_material("PEEK").unwrap().kg_co2_per_kg, 13.70);
        assert_eq!(library.get_material("PPS").unwrap().kg_co2_per_kg, 2.13);
        assert_eq!(library.grid_intensity(DE_REFERENCE_GRID).unwrap(), 0.161);
        assert_relative_eq!(
            library.grid_intensity(DE_GRID_MIX).unwrap(),
            0.161 / 3.6,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            library.grid_intensity(NL_GRID_MIX).unwrap(),
            1.28 / 3.6,
            epsilon = 1e-12
        );
        assert_eq!(library.process_names().count(), 7);
    }

    #[test]
    fn route_order() {
        let library = reference_library().unwrap();
        let names: Vec<String> = recycling_scenarios(&library)
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                AGGREGATED_SPHERA,
                SEPARATE_SPHERA,
                HYBRID_SPIRAL_SPHERA,
                ALTERNATIVE_SPHERA_PIE,
                INCINERATION
            ]
        );
    }

    #[test]
    fn routes_use_the_reference_grid() {
        let library = reference_library().unwrap();
        for process in recycling_routes(&library).unwrap() {
            assert_eq!(process.grid_carbon_intensity_kg_co2_per_mj(), 0.161);
        }
        assert_eq!(
            library
                .get_process(SPIRAL_STEADY_STATE)
                .unwrap()
                .grid_carbon_intensity_kg_co2_per_mj(),
            0.161
        );
    }

    #[test]
    fn incineration_is_pinned_to_its_own_factor() {
        let library = reference_library().unwrap();
        let record = library.process_record(INCINERATION).unwrap();
        assert_eq!(record.kind, Some(ProcessKind::Incineration));
        assert_eq!(
            record.parameters.grid_carbon_intensity_kg_co2_per_mj(),
            0.0581
        );
        assert_relative_eq!(
            record.parameters.primary_energy_mj_per_kg(),
            2.9 / 0.0581,
            epsilon = 1e-12
        );
    }

    #[test]
    fn overrides_replace_entries() {
        let library = reference_library_with(
            r#"
[[materials]]
id = "PA6"
name = "Polyamide 6 (regional)"
kg_co2_per_kg = 5.0
"#,
        )
        .unwrap();
        assert_eq!(library.get_material("PA6").unwrap().kg_co2_per_kg, 5.0);
        assert_eq!(library.get_material("PEEK").unwrap().kg_co2_per_kg, 13.70);
    }

    #[test]
    fn missing_route_is_reported() {
        let library = ReferenceConfig::from_toml_str("")
            .unwrap()
            .into_library()
            .unwrap();
        let err = recycling_routes(&library).unwrap_err();
        match err {
            LcaError::UnknownReference { kind, name } => {
                assert_eq!(kind, ReferenceKind::Process);
                assert_eq!(name, AGGREGATED_SPHERA);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
