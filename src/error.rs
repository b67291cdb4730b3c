//! Error types shared by the numerical core and the calculator registry

use thiserror::Error;

/// Result alias used throughout the crate
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors raised before or instead of a computation.
///
/// "No IRR exists" and "payback not reached" are not errors; they are
/// ordinary variants of [`crate::SolveResult`] and [`crate::PaybackResult`].
#[derive(Error, Debug)]
pub enum CalcError {
    /// Input outside the mathematically valid range
    #[error("Domain error: {reason}")]
    Domain { reason: String },

    /// Cash-flow schedule violates its invariants
    #[error("Invalid cash-flow schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error("Unknown calculator: {key}")]
    UnknownCalculator { key: String },

    #[error("Missing input: {name}")]
    MissingInput { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
            reason: reason.into(),
        }
    }

    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// True for errors caused by numeric inputs outside their domain
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. } | Self::InvalidSchedule { .. })
    }
}

/// Reject a rate whose compounding base `1 + rate` is not positive
pub(crate) fn check_rate(rate: f64) -> CalcResult<()> {
    if !rate.is_finite() {
        return Err(CalcError::domain(format!("rate must be finite, got {}", rate)));
    }
    if 1.0 + rate <= 0.0 {
        return Err(CalcError::domain(format!(
            "rate must be greater than -1, got {}",
            rate
        )));
    }
    Ok(())
}

/// Reject a value outside the open unit interval
pub(crate) fn check_open_unit(name: &str, value: f64) -> CalcResult<()> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(CalcError::domain(format!(
            "{} must lie in (0, 1), got {}",
            name, value
        )));
    }
    Ok(())
}
