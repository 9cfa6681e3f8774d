//! Bond Schedule - payment schedules for fixed-income instruments
//!
//! This library provides:
//! - Schedule building for bullet, fully amortized and sinking fund repayment
//! - Parameter construction from command-line style terms
//! - Chart series, text and CSV presentation of a schedule
//! - Parallel batch building from a CSV of terms

pub mod error;
pub mod terms;
pub mod schedule;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{ScheduleError, ScheduleResult};
pub use terms::{RepaymentPolicy, ScheduleParameters, ScheduleTerms};
pub use schedule::{build_schedule, PeriodRecord, Schedule, ScheduleBuilder, ScheduleConfig, ScheduleSummary};
pub use batch::BatchRunner;
