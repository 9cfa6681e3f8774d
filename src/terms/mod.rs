//! Schedule terms, policy selection and terms loading

mod data;
pub mod loader;

pub use data::{RepaymentPolicy, ScheduleParameters, ScheduleTerms, ACCEPTED_SCHEDULE_TYPES, MAX_TOTAL_PERIODS};
pub use loader::{load_terms, load_terms_from_reader};
