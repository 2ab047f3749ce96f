//! Emissions accounting for thermoplastic-composite recycling and manufacturing.
//!
//! - [`emissions`]: the Emission Model, one evaluation per (process, mass, feed)
//! - [`comparator`]: scenarios x conditions comparisons
//! - [`cascade`]: multi-cycle recycling chains
//! - [`conversion`]: grid-intensity and energy unit conversions
//! - [`reference`] and [`config`]: named reference data and its TOML form

pub mod cascade;
pub mod comparator;
pub mod config;
pub mod conversion;
pub mod emissions;
pub mod material;
pub mod process;
#[cfg(feature = "python")]
pub mod python;
pub mod reference;

pub mod errors;

/// Floating point type used for all quantities.
pub type FloatValue = f64;

pub use cascade::{Cascade, CascadeAccumulator, CascadeInputs, CycleRecord};
pub use comparator::{Comparison, ComparisonEntry, Condition, LabelledValue, ScenarioComparator};
pub use emissions::{EmissionBreakdown, EmissionModel};
pub use errors::{LcaError, LcaResult};
pub use material::{MaterialEntry, MaterialId, MaterialKind, MaterialProfile};
pub use process::{ProcessParameters, REFERENCE_GRID_KG_CO2_PER_MJ};
pub use reference::{ReferenceLibrary, ReferenceStore};
