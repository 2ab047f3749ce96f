//! Life-cycle emissions accounting for thermoplastic-composite recycling.
//!
//! This crate re-exports the engine ([`engine`]) and the bundled data and
//! workflows ([`components`]). With the `python` feature it also builds the
//! `_lib` extension module, with the engine exposed as `tpclca._lib.core`.

pub use tpclca_components as components;
pub use tpclca_core as engine;

#[cfg(feature = "python")]
mod python;
