//! Batch runner for building many schedules at once
//!
//! Builds are independent, so term sets are fanned out across the rayon
//! thread pool. Output order always matches input order.

use std::io;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::ScheduleResult;
use crate::schedule::{Schedule, ScheduleBuilder, ScheduleConfig, ScheduleSummary};
use crate::terms::ScheduleTerms;

/// Result of one term set in a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Term label, or `row-N` when the terms carry none
    pub label: String,
    pub result: ScheduleResult<ScheduleSummary>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builds schedules for many term sets with a shared configuration
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::new(ScheduleConfig::default());
/// let terms = load_terms("terms.csv")?;
/// for outcome in runner.run(&terms) {
///     println!("{}: {:?}", outcome.label, outcome.result);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    builder: ScheduleBuilder,
}

impl BatchRunner {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            builder: ScheduleBuilder::new(config),
        }
    }

    /// Build one schedule
    pub fn build(&self, terms: &ScheduleTerms) -> ScheduleResult<Schedule> {
        let params = terms.to_parameters()?;
        self.builder.build(&params)
    }

    /// Build full schedules for every term set, in parallel
    pub fn run_schedules(&self, terms: &[ScheduleTerms]) -> Vec<ScheduleResult<Schedule>> {
        terms.par_iter().map(|t| self.build(t)).collect()
    }

    /// Build every term set and keep only the summaries
    pub fn run(&self, terms: &[ScheduleTerms]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = terms
            .par_iter()
            .enumerate()
            .map(|(index, t)| BatchOutcome {
                label: t
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("row-{}", index + 1)),
                result: self.build(t).map(|schedule| schedule.summary()),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        log::info!("Built {} schedules ({} failed)", outcomes.len() - failed, failed);

        outcomes
    }
}

/// Summary row written per term set
#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "ScheduleType")]
    schedule_type: Option<&'static str>,
    #[serde(rename = "Periods")]
    periods: Option<u32>,
    #[serde(rename = "LevelPayment")]
    level_payment: Option<f64>,
    #[serde(rename = "TotalPayments")]
    total_payments: Option<f64>,
    #[serde(rename = "TotalInterest")]
    total_interest: Option<f64>,
    #[serde(rename = "TotalPrincipal")]
    total_principal: Option<f64>,
    #[serde(rename = "FinalBalance")]
    final_balance: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl<'a> From<&'a BatchOutcome> for OutcomeRow<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        match &outcome.result {
            Ok(summary) => OutcomeRow {
                label: &outcome.label,
                schedule_type: Some(summary.policy.as_str()),
                periods: Some(summary.total_periods),
                level_payment: summary.level_payment,
                total_payments: Some(summary.total_payments),
                total_interest: Some(summary.total_interest),
                total_principal: Some(summary.total_principal),
                final_balance: Some(summary.final_balance),
                error: None,
            },
            Err(e) => OutcomeRow {
                label: &outcome.label,
                schedule_type: None,
                periods: None,
                level_payment: None,
                total_payments: None,
                total_interest: None,
                total_principal: None,
                final_balance: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Write batch outcomes as CSV, one row per term set
pub fn write_outcomes_csv<W: io::Write>(outcomes: &[BatchOutcome], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        wtr.serialize(OutcomeRow::from(outcome))?;
    }
    wtr.flush()?;
    Ok(())
}
