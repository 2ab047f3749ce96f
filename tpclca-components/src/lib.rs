//! Concrete data and workflows built on `tpclca-core`
//!
//! # Module Organisation
//!
//! - `library`: the bundled reference library (materials, grid mixes, processes)
//! - `scenarios`: standard conditions, masses and cascade configuration
//! - `manufacturing`: virgin-material manufacturing scenarios
//! - `reports`: label/value records for the comparison figures
//! - `survey`: stakeholder categories and survey record capture

pub mod library;
pub mod manufacturing;
#[cfg(feature = "python")]
pub mod python;
pub mod reports;
pub mod scenarios;
pub mod survey;
