//! Python bindings for the emissions engine
//!
//! Results are handed to Python as plain dicts (via `pythonize`) and numpy
//! arrays, which is what the plotting code consumes.

use crate::config::ReferenceConfig;
use crate::conversion::energy_equivalent_mj;
use crate::emissions::EmissionModel;
use crate::errors::LcaError;
use crate::process::REFERENCE_GRID_KG_CO2_PER_MJ;
use crate::reference::{ReferenceLibrary, ReferenceStore};
use crate::FloatValue;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod engine;

pub use engine::{PyCascade, PyComparison, PyEmissionModel, PyProcessParameters};

impl From<LcaError> for PyErr {
    fn from(e: LcaError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

/// Python wrapper for a [`ReferenceLibrary`]
#[pyclass(frozen, name = "ReferenceLibrary", module = "tpclca.core")]
#[derive(Debug, Clone)]
pub struct PyReferenceLibrary(pub ReferenceLibrary);

#[pymethods]
impl PyReferenceLibrary {
    /// Load a library from the contents of a TOML file
    #[staticmethod]
    fn from_toml(contents: String) -> PyResult<Self> {
        Ok(Self(ReferenceConfig::from_toml_str(&contents)?.into_library()?))
    }

    #[staticmethod]
    fn from_path(path: std::path::PathBuf) -> PyResult<Self> {
        Ok(Self(ReferenceConfig::from_path(path)?.into_library()?))
    }

    fn get_process(&self, name: String) -> PyResult<PyProcessParameters> {
        Ok(PyProcessParameters(self.0.get_process(&name)?.clone()))
    }

    fn grid_intensity(&self, name: String) -> PyResult<FloatValue> {
        Ok(self.0.grid_intensity(&name)?)
    }

    fn material_co2_per_kg(&self, name: String) -> PyResult<FloatValue> {
        Ok(self.0.get_material(&name)?.kg_co2_per_kg)
    }

    fn process_names(&self) -> Vec<String> {
        self.0.process_names().map(str::to_string).collect()
    }

    fn grid_mix_names(&self) -> Vec<String> {
        self.0.grid_mix_names().map(str::to_string).collect()
    }

    fn material_names(&self) -> Vec<String> {
        self.0.material_ids().map(|id| id.to_string()).collect()
    }

    /// An Emission Model over every material in the library
    fn emission_model(&self) -> PyEmissionModel {
        PyEmissionModel(EmissionModel::from_materials(self.0.material_profile()))
    }
}

#[pyfunction]
#[pyo3(name = "energy_equivalent_mj")]
fn py_energy_equivalent_mj(
    emissions_kg_co2: FloatValue,
    grid_carbon_intensity_kg_co2_per_mj: FloatValue,
) -> PyResult<FloatValue> {
    Ok(energy_equivalent_mj(
        emissions_kg_co2,
        grid_carbon_intensity_kg_co2_per_mj,
    )?)
}

#[pymodule]
#[pyo3(name = "core")]
pub fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyProcessParameters>()?;
    m.add_class::<PyEmissionModel>()?;
    m.add_class::<PyComparison>()?;
    m.add_class::<PyCascade>()?;
    m.add_class::<PyReferenceLibrary>()?;
    m.add_function(wrap_pyfunction!(py_energy_equivalent_mj, m)?)?;
    m.add("REFERENCE_GRID_KG_CO2_PER_MJ", REFERENCE_GRID_KG_CO2_PER_MJ)?;
    Ok(())
}
