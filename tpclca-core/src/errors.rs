use crate::comparator::ComparisonEntry;
use std::fmt;
use thiserror::Error;

/// Kind of named reference data a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Material,
    Process,
    GridMix,
    Category,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Material => write!(f, "material"),
            ReferenceKind::Process => write!(f, "process"),
            ReferenceKind::GridMix => write!(f, "grid mix"),
            ReferenceKind::Category => write!(f, "category"),
        }
    }
}

/// Error type for emissions accounting.
///
/// All variants describe deterministic input problems. None of them are
/// transient, so callers should fix the input rather than retry.
#[derive(Error, Debug)]
pub enum LcaError {
    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },
    #[error("Unknown material type: {0}")]
    UnknownMaterial(String),
    #[error("Unknown {kind} reference: {name}")]
    UnknownReference { kind: ReferenceKind, name: String },
    #[error("Comparison failed for scenario '{scenario}' under condition '{condition}': {source}")]
    ComparisonFailure {
        scenario: String,
        condition: String,
        #[source]
        source: Box<LcaError>,
        /// Results computed before the failing pair, in evaluation order.
        completed: Vec<ComparisonEntry>,
    },
    #[error("Cascade failed at cycle {cycle_index}: {source}")]
    CycleFailure {
        cycle_index: usize,
        #[source]
        source: Box<LcaError>,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LcaError {
    pub(crate) fn invalid(name: &str, value: f64, reason: &str) -> Self {
        LcaError::InvalidParameter {
            name: name.to_string(),
            value,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unknown_reference(kind: ReferenceKind, name: &str) -> Self {
        LcaError::UnknownReference {
            kind,
            name: name.to_string(),
        }
    }

    /// The innermost error, after unwrapping comparison and cascade context.
    pub fn root_cause(&self) -> &LcaError {
        match self {
            LcaError::ComparisonFailure { source, .. } | LcaError::CycleFailure { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<toml::de::Error> for LcaError {
    fn from(e: toml::de::Error) -> Self {
        LcaError::Config(e.to_string())
    }
}

/// Convenience type for `Result<T, LcaError>`.
pub type LcaResult<T> = Result<T, LcaError>;

/// Checks that `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> LcaResult<f64> {
    if !value.is_finite() {
        return Err(LcaError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(LcaError::invalid(name, value, "must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_context() {
        let err = LcaError::CycleFailure {
            cycle_index: 3,
            source: Box::new(LcaError::UnknownMaterial("PET".to_string())),
        };
        assert!(matches!(err.root_cause(), LcaError::UnknownMaterial(m) if m == "PET"));
        assert_eq!(
            err.to_string(),
            "Cascade failed at cycle 3: Unknown material type: PET"
        );
    }

    #[test]
    fn non_negative_check() {
        assert_eq!(ensure_non_negative("mass_kg", 0.0).unwrap(), 0.0);
        assert!(ensure_non_negative("mass_kg", -1e-9).is_err());
        assert!(ensure_non_negative("mass_kg", f64::NAN).is_err());
        assert!(ensure_non_negative("mass_kg", f64::INFINITY).is_err());
    }
}
