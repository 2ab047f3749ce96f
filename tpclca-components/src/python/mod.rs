use pyo3::prelude::*;
use pyo3::{pymodule, Bound, PyResult};
use pythonize::{depythonize, pythonize};

use tpclca_core::cascade::CascadeAccumulator;
use tpclca_core::python::{
    PyCascade, PyComparison, PyEmissionModel, PyProcessParameters, PyReferenceLibrary,
};
use tpclca_core::FloatValue;

use crate::library::{reference_library, reference_library_with};
use crate::manufacturing::{ManufacturingCalculator, ManufacturingScenario};
use crate::reports::{
    cascade_summary, energy_breakdown, grouped_emissions, reference_bar_comparison,
};
use crate::scenarios::{standard_conditions, CascadeParameters, ANALYSIS_MASSES_KG};
use crate::survey::{
    collection_methods, stakeholder_categories, InterviewRecord, MaterialFlowRecord, RecordLog,
    RecordSink,
};

/// The bundled reference library, optionally with TOML overrides
#[pyfunction]
#[pyo3(signature = (overrides=None))]
fn default_library(overrides: Option<String>) -> PyResult<PyReferenceLibrary> {
    let library = match overrides {
        Some(overrides) => reference_library_with(&overrides)?,
        None => reference_library()?,
    };
    Ok(PyReferenceLibrary(library))
}

/// `[(scrap_fraction_percent, material)]` of the standard comparison
#[pyfunction]
fn conditions() -> Vec<(FloatValue, String)> {
    standard_conditions()
        .into_iter()
        .map(|c| (c.scrap_fraction_percent, c.material.to_string()))
        .collect()
}

#[pyfunction]
fn analysis_masses() -> Vec<FloatValue> {
    ANALYSIS_MASSES_KG.to_vec()
}

/// Runs a cascade configured by a dict of `CascadeParameters` fields
#[pyfunction]
#[pyo3(signature = (library, model, parameters=None))]
fn run_cascade(
    library: PyRef<'_, PyReferenceLibrary>,
    model: PyRef<'_, PyEmissionModel>,
    parameters: Option<Bound<'_, PyAny>>,
) -> PyResult<PyCascade> {
    let parameters: CascadeParameters = match parameters {
        Some(p) => depythonize(&p)?,
        None => CascadeParameters::default(),
    };
    let inputs = parameters.resolve(&library.0)?;
    Ok(PyCascade(CascadeAccumulator::new(&model.0).cascade(&inputs)?))
}

#[pyfunction]
fn manufacturing_emissions<'py>(
    py: Python<'py>,
    library: PyRef<'_, PyReferenceLibrary>,
    scenarios: Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyAny>> {
    let scenarios: Vec<ManufacturingScenario> = depythonize(&scenarios)?;
    let results = ManufacturingCalculator::new(&library.0).compare_scenarios(&scenarios)?;
    Ok(pythonize(py, &results)?)
}

#[pyfunction]
fn energy_bars<'py>(
    py: Python<'py>,
    scenarios: Vec<PyProcessParameters>,
) -> PyResult<Bound<'py, PyAny>> {
    let scenarios: Vec<_> = scenarios.into_iter().map(|s| s.0).collect();
    Ok(pythonize(py, &energy_breakdown(&scenarios))?)
}

#[pyfunction]
fn grouped_bars<'py>(
    py: Python<'py>,
    comparison: PyRef<'_, PyComparison>,
) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, &grouped_emissions(&comparison.0))?)
}

#[pyfunction]
fn reference_bars<'py>(
    py: Python<'py>,
    model: PyRef<'_, PyEmissionModel>,
    spiral: PyRef<'_, PyProcessParameters>,
) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, &reference_bar_comparison(&model.0, &spiral.0)?)?)
}

#[pyfunction]
fn cascade_report<'py>(
    py: Python<'py>,
    cascade: PyRef<'_, PyCascade>,
) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, &cascade_summary(&cascade.0))?)
}

#[pyfunction]
fn stakeholders<'py>(py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, &stakeholder_categories())?)
}

#[pyfunction]
#[pyo3(name = "collection_methods")]
fn py_collection_methods<'py>(py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, &collection_methods())?)
}

/// Python wrapper for a [`RecordLog`]
#[pyclass(name = "RecordLog", module = "tpclca.components")]
#[derive(Debug, Default)]
pub struct PyRecordLog(pub RecordLog);

#[pymethods]
impl PyRecordLog {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Validates and appends an interview given as a dict
    fn append_interview(&mut self, record: Bound<'_, PyAny>) -> PyResult<usize> {
        let record: InterviewRecord = depythonize(&record)?;
        Ok(self.0.append_interview(record)?)
    }

    /// Validates and appends a material flow given as a dict
    fn append_flow(&mut self, record: Bound<'_, PyAny>) -> PyResult<usize> {
        let record: MaterialFlowRecord = depythonize(&record)?;
        Ok(self.0.append_flow(record)?)
    }

    fn interviews<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize(py, self.0.interviews())?)
    }

    fn flows<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize(py, self.0.flows())?)
    }

    fn total_flow_volume_kg_per_month(&self) -> FloatValue {
        self.0.total_flow_volume_kg_per_month()
    }
}

#[pymodule]
pub fn components(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Reference data
    m.add_function(wrap_pyfunction!(default_library, m)?)?;
    m.add_function(wrap_pyfunction!(conditions, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_masses, m)?)?;
    // Workflows
    m.add_function(wrap_pyfunction!(run_cascade, m)?)?;
    m.add_function(wrap_pyfunction!(manufacturing_emissions, m)?)?;
    // Reports
    m.add_function(wrap_pyfunction!(energy_bars, m)?)?;
    m.add_function(wrap_pyfunction!(grouped_bars, m)?)?;
    m.add_function(wrap_pyfunction!(reference_bars, m)?)?;
    m.add_function(wrap_pyfunction!(cascade_report, m)?)?;
    // Survey
    m.add_function(wrap_pyfunction!(stakeholders, m)?)?;
    m.add_function(wrap_pyfunction!(py_collection_methods, m)?)?;
    m.add_class::<PyRecordLog>()?;
    Ok(())
}
