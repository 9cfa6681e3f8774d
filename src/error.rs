//! Error types for schedule construction

use thiserror::Error;

use crate::terms::{ACCEPTED_SCHEDULE_TYPES, MAX_TOTAL_PERIODS};

/// Result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Input-validation failures raised before the recurrence starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Schedule type name is not one of the accepted policies
    #[error(
        "Unsupported schedule type '{name}' (expected one of: {})",
        ACCEPTED_SCHEDULE_TYPES.join(", ")
    )]
    InvalidPolicy {
        /// The name that failed to resolve
        name: String,
    },

    /// Sinking fund selected without a fixed periodic payment
    #[error("Sinking fund schedule requires a predetermined payment amount")]
    MissingPayment,

    /// Total number of periods must be in `1..=MAX_TOTAL_PERIODS`
    #[error("Invalid period count: {periods} (must be between 1 and {})", MAX_TOTAL_PERIODS)]
    InvalidPeriodCount {
        periods: i64,
    },

    /// Periodic rate must be finite and above -100%
    #[error("Invalid periodic rate: {rate}")]
    InvalidRate {
        rate: f64,
    },

    /// Monetary input is NaN or infinite
    #[error("Invalid {field}: {value}")]
    InvalidAmount {
        field: &'static str,
        value: f64,
    },
}

impl ScheduleError {
    /// Creates an invalid policy error
    pub fn invalid_policy(name: impl Into<String>) -> Self {
        Self::InvalidPolicy { name: name.into() }
    }
}
