//! Grid-intensity and energy unit conversions.
//!
//! # Conversion Factor Convention
//!
//! Energy is carried in MJ throughout the engine and grid intensities in
//! kg CO2 / MJ. Reference data reported per kWh is converted on the way in.

use crate::errors::{ensure_non_negative, LcaError, LcaResult};
use crate::FloatValue;

/// unit: MJ / kWh
pub const MJ_PER_KWH: FloatValue = 3.6;

/// Energy that, drawn from a grid with the given intensity, would emit `emissions_kg_co2`.
///
/// $$ E = \frac{m_{CO_2}}{I_{grid}} $$
///
/// Used to place an emissions-characterised process (e.g. an incineration baseline
/// reported only as kg CO2 per kg) on the same energy basis as the other routes.
///
/// # Errors
///
/// `InvalidParameter` when the grid intensity is not strictly positive or either
/// input is not finite.
pub fn energy_equivalent_mj(
    emissions_kg_co2: FloatValue,
    grid_carbon_intensity_kg_co2_per_mj: FloatValue,
) -> LcaResult<FloatValue> {
    if !emissions_kg_co2.is_finite() {
        return Err(LcaError::invalid(
            "emissions_kg_co2",
            emissions_kg_co2,
            "must be finite",
        ));
    }
    let grid = grid_carbon_intensity_kg_co2_per_mj;
    if !grid.is_finite() || grid <= 0.0 {
        return Err(LcaError::invalid(
            "grid_carbon_intensity_kg_co2_per_mj",
            grid,
            "must be a finite, strictly positive intensity",
        ));
    }
    Ok(emissions_kg_co2 / grid)
}

pub fn kwh_to_mj(energy_kwh: FloatValue) -> FloatValue {
    energy_kwh * MJ_PER_KWH
}

pub fn mj_to_kwh(energy_mj: FloatValue) -> FloatValue {
    energy_mj / MJ_PER_KWH
}

/// Converts a grid intensity in kg CO2 / kWh to kg CO2 / MJ.
pub fn intensity_per_kwh_to_per_mj(kg_co2_per_kwh: FloatValue) -> LcaResult<FloatValue> {
    ensure_non_negative("kg_co2_per_kwh", kg_co2_per_kwh)?;
    Ok(kg_co2_per_kwh / MJ_PER_KWH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn incineration_equivalent() {
        let energy = energy_equivalent_mj(2.9, 0.0581).unwrap();
        assert_relative_eq!(energy, 49.914, epsilon = 1e-3);
        // Round trip back to emissions
        assert_relative_eq!(energy * 0.0581, 2.9, epsilon = 1e-12);
    }

    #[test]
    fn non_positive_grid_is_rejected() {
        for grid in [0.0, -0.161, f64::NAN, f64::INFINITY] {
            let err = energy_equivalent_mj(2.9, grid).unwrap_err();
            assert!(
                matches!(err, LcaError::InvalidParameter { ref name, .. } if name == "grid_carbon_intensity_kg_co2_per_mj"),
                "grid {grid} gave {err}"
            );
        }
    }

    #[test]
    fn kwh_round_trip() {
        assert_relative_eq!(kwh_to_mj(0.5), 1.8, epsilon = 1e-12);
        assert_relative_eq!(mj_to_kwh(kwh_to_mj(2.0)), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn intensity_per_kwh() {
        assert_relative_eq!(
            intensity_per_kwh_to_per_mj(1.28).unwrap(),
            0.355_555_555,
            epsilon = 1e-8
        );
        assert!(intensity_per_kwh_to_per_mj(-1.0).is_err());
    }
}
