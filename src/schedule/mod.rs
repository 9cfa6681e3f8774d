//! Schedule building for bullet, fully amortized and sinking fund repayment

mod annuity;
mod builder;
mod records;

pub use annuity::{level_payment, round_to, DEFAULT_PRECISION, MAX_PRECISION};
pub use builder::{build_schedule, ScheduleBuilder, ScheduleConfig, PRECISION_ENV_VAR};
pub use records::{PaymentSeries, PeriodRecord, Schedule, ScheduleSummary};
