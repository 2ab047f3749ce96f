//! Python wrappers for processes, the Emission Model and its aggregate results

use crate::cascade::{Cascade, CascadeAccumulator, CascadeInputs};
use crate::comparator::{Comparison, Condition, ScenarioComparator};
use crate::emissions::EmissionModel;
use crate::material::{MaterialEntry, MaterialId, MaterialKind, MaterialProfile};
use crate::process::{ProcessParameters, REFERENCE_GRID_KG_CO2_PER_MJ};
use crate::FloatValue;
use numpy::{PyArray1, PyArray2, ToPyArray};
use pyo3::prelude::*;
use pythonize::pythonize;
use std::collections::BTreeMap;

/// Python wrapper for [`ProcessParameters`]
///
/// Instances are immutable; `on_grid` and `renamed` return new objects.
#[pyclass(frozen, name = "ProcessParameters", module = "tpclca.core")]
#[derive(Debug, Clone)]
pub struct PyProcessParameters(pub ProcessParameters);

#[pymethods]
impl PyProcessParameters {
    #[new]
    #[pyo3(signature = (name, primary_energy_mj_per_kg, secondary_energy_mj_per_kg=0.0, grid_carbon_intensity_kg_co2_per_mj=REFERENCE_GRID_KG_CO2_PER_MJ))]
    fn new(
        name: String,
        primary_energy_mj_per_kg: FloatValue,
        secondary_energy_mj_per_kg: FloatValue,
        grid_carbon_intensity_kg_co2_per_mj: FloatValue,
    ) -> PyResult<Self> {
        Ok(Self(ProcessParameters::with_grid(
            name,
            primary_energy_mj_per_kg,
            secondary_energy_mj_per_kg,
            grid_carbon_intensity_kg_co2_per_mj,
        )?))
    }

    /// Create a process from its emissions, e.g. an incineration baseline
    #[staticmethod]
    fn from_emissions_equivalent(
        name: String,
        emissions_kg_co2_per_kg: FloatValue,
        grid_carbon_intensity_kg_co2_per_mj: FloatValue,
    ) -> PyResult<Self> {
        Ok(Self(ProcessParameters::from_emissions_equivalent(
            name,
            emissions_kg_co2_per_kg,
            grid_carbon_intensity_kg_co2_per_mj,
        )?))
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name().to_string()
    }

    #[getter]
    fn primary_energy_mj_per_kg(&self) -> FloatValue {
        self.0.primary_energy_mj_per_kg()
    }

    #[getter]
    fn secondary_energy_mj_per_kg(&self) -> FloatValue {
        self.0.secondary_energy_mj_per_kg()
    }

    #[getter]
    fn grid_carbon_intensity_kg_co2_per_mj(&self) -> FloatValue {
        self.0.grid_carbon_intensity_kg_co2_per_mj()
    }

    #[getter]
    fn energy_intensity_mj_per_kg(&self) -> FloatValue {
        self.0.energy_intensity_mj_per_kg()
    }

    fn on_grid(&self, grid_carbon_intensity_kg_co2_per_mj: FloatValue) -> PyResult<Self> {
        Ok(Self(self.0.on_grid(grid_carbon_intensity_kg_co2_per_mj)?))
    }

    fn renamed(&self, name: String) -> Self {
        Self(self.0.renamed(name))
    }

    fn __repr__(&self) -> String {
        format!(
            "ProcessParameters(name={:?}, primary_energy_mj_per_kg={}, secondary_energy_mj_per_kg={}, grid_carbon_intensity_kg_co2_per_mj={})",
            self.0.name(),
            self.0.primary_energy_mj_per_kg(),
            self.0.secondary_energy_mj_per_kg(),
            self.0.grid_carbon_intensity_kg_co2_per_mj()
        )
    }
}

/// Python wrapper for [`EmissionModel`]
#[pyclass(frozen, name = "EmissionModel", module = "tpclca.core")]
#[derive(Debug, Clone)]
pub struct PyEmissionModel(pub EmissionModel);

#[pymethods]
impl PyEmissionModel {
    /// Create a model over the reference polymers, or over `materials`
    /// (a mapping of material id to kg CO2 / kg) when given.
    #[new]
    #[pyo3(signature = (materials=None))]
    fn new(materials: Option<BTreeMap<String, FloatValue>>) -> PyResult<Self> {
        let profile = match materials {
            None => MaterialProfile::reference(),
            Some(materials) => {
                let entries = materials
                    .into_iter()
                    .map(|(id, co2)| {
                        MaterialEntry::new(id.clone(), id, MaterialKind::Thermoplastic, co2)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                MaterialProfile::from_entries(entries)?
            }
        };
        Ok(Self(EmissionModel::from_materials(profile)))
    }

    /// Emissions breakdown as a dict
    fn compute<'py>(
        &self,
        py: Python<'py>,
        process: PyRef<'_, PyProcessParameters>,
        mass_kg: FloatValue,
        scrap_fraction_percent: FloatValue,
        material: String,
    ) -> PyResult<Bound<'py, PyAny>> {
        let breakdown = self.0.compute(
            &process.0,
            mass_kg,
            scrap_fraction_percent,
            &MaterialId::new(material),
        )?;
        Ok(pythonize(py, &breakdown)?)
    }

    /// Compare scenarios under `(scrap_fraction_percent, material)` conditions
    fn compare(
        &self,
        scenarios: Vec<PyProcessParameters>,
        mass_kg: FloatValue,
        conditions: Vec<(FloatValue, String)>,
    ) -> PyResult<PyComparison> {
        let scenarios: Vec<ProcessParameters> = scenarios.into_iter().map(|s| s.0).collect();
        let conditions: Vec<Condition> = conditions
            .into_iter()
            .map(|(scrap, material)| Condition::new(scrap, material))
            .collect();
        let comparison =
            ScenarioComparator::new(&self.0).compare(&scenarios, mass_kg, &conditions)?;
        Ok(PyComparison(comparison))
    }

    #[pyo3(signature = (initial_process, initial_scrap_fraction_percent, material, steady_process, n_cycles, mass_kg=1.0))]
    fn cascade(
        &self,
        initial_process: PyProcessParameters,
        initial_scrap_fraction_percent: FloatValue,
        material: String,
        steady_process: PyProcessParameters,
        n_cycles: usize,
        mass_kg: FloatValue,
    ) -> PyResult<PyCascade> {
        let inputs = CascadeInputs {
            initial_process: initial_process.0,
            initial_scrap_fraction_percent,
            material: MaterialId::new(material),
            steady_process: steady_process.0,
            n_cycles,
            mass_kg,
        };
        Ok(PyCascade(CascadeAccumulator::new(&self.0).cascade(&inputs)?))
    }

    fn materials(&self) -> Vec<String> {
        self.0.materials().ids().map(|id| id.to_string()).collect()
    }
}

/// Python wrapper for a [`Comparison`]
#[pyclass(frozen, name = "Comparison", module = "tpclca.core")]
#[derive(Debug, Clone)]
pub struct PyComparison(pub Comparison);

#[pymethods]
impl PyComparison {
    #[getter]
    fn scenario_names(&self) -> Vec<String> {
        self.0.scenario_names().to_vec()
    }

    #[getter]
    fn condition_labels(&self) -> Vec<String> {
        self.0.conditions().iter().map(Condition::label).collect()
    }

    /// Entries as a list of dicts, scenario-major
    fn entries<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize(py, self.0.entries())?)
    }

    /// Total emissions, shape (n_scenarios, n_conditions)
    fn total_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<FloatValue>> {
        self.0.total_matrix().to_pyarray(py)
    }

    /// `[(scenario, total)]` for one condition
    fn series_for_condition(&self, condition_index: usize) -> Vec<(String, FloatValue)> {
        self.0
            .series_for_condition(condition_index)
            .into_iter()
            .map(|v| (v.label, v.value))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }
}

/// Python wrapper for a [`Cascade`]
#[pyclass(frozen, name = "Cascade", module = "tpclca.core")]
#[derive(Debug, Clone)]
pub struct PyCascade(pub Cascade);

#[pymethods]
impl PyCascade {
    fn records<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        Ok(pythonize(py, self.0.records())?)
    }

    fn per_cycle<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.per_cycle().to_pyarray(py)
    }

    fn cumulative<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.cumulative().to_pyarray(py)
    }

    fn averages<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.averages().to_pyarray(py)
    }

    #[getter]
    fn initial_emissions(&self) -> FloatValue {
        self.0.initial_emissions()
    }

    #[getter]
    fn steady_state_emissions(&self) -> Option<FloatValue> {
        self.0.steady_state_emissions()
    }

    #[getter]
    fn final_average(&self) -> FloatValue {
        self.0.final_average()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }
}
