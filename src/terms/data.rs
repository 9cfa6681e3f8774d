//! Schedule terms and validated builder parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Schedule type names accepted on the command line
pub const ACCEPTED_SCHEDULE_TYPES: [&str; 3] = ["sinkingFund", "fullyAmoritized", "bullet"];

/// Upper bound on periods per schedule (e.g. 100 years of daily payments fits)
pub const MAX_TOTAL_PERIODS: u32 = 100_000;

/// Repayment policy of the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepaymentPolicy {
    /// Interest only, principal repaid in full at maturity
    Bullet,
    /// Level payment retiring the balance to the future value at maturity
    FullyAmortized,
    /// Caller-fixed periodic payment
    SinkingFund,
}

impl RepaymentPolicy {
    /// Canonical schedule type name (matches the CLI spelling)
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentPolicy::Bullet => "bullet",
            RepaymentPolicy::FullyAmortized => "fullyAmoritized",
            RepaymentPolicy::SinkingFund => "sinkingFund",
        }
    }

    /// Whether the policy needs a caller-supplied payment
    pub fn requires_payment(&self) -> bool {
        matches!(self, RepaymentPolicy::SinkingFund)
    }
}

impl fmt::Display for RepaymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepaymentPolicy {
    type Err = ScheduleError;

    /// Case, `-`, `_` and whitespace are ignored; both the historical
    /// "fullyAmoritized" and the correct "fullyAmortized" spellings resolve.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized: String = name
            .chars()
            .filter(|&c| !matches!(c, '-' | '_') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "bullet" => Ok(RepaymentPolicy::Bullet),
            "fullyamoritized" | "fullyamortized" => Ok(RepaymentPolicy::FullyAmortized),
            "sinkingfund" => Ok(RepaymentPolicy::SinkingFund),
            _ => Err(ScheduleError::invalid_policy(name)),
        }
    }
}

/// Validated inputs to the schedule builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParameters {
    /// Opening principal balance
    pub present_value: f64,

    /// Target balance at maturity
    pub future_value: f64,

    /// Coupon rate per period (annual rate / periods per year)
    pub periodic_rate: f64,

    /// Number of payment periods
    pub total_periods: u32,

    /// Repayment policy
    pub policy: RepaymentPolicy,

    /// Fixed periodic payment (sinking fund only)
    #[serde(default)]
    pub payment: Option<f64>,
}

impl ScheduleParameters {
    pub fn new(
        present_value: f64,
        future_value: f64,
        periodic_rate: f64,
        total_periods: u32,
        policy: RepaymentPolicy,
    ) -> Self {
        Self {
            present_value,
            future_value,
            periodic_rate,
            total_periods,
            policy,
            payment: None,
        }
    }

    /// Attach a fixed periodic payment
    pub fn with_payment(mut self, payment: f64) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Check every precondition of the builder
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.total_periods < 1 || self.total_periods > MAX_TOTAL_PERIODS {
            return Err(ScheduleError::InvalidPeriodCount {
                periods: i64::from(self.total_periods),
            });
        }

        if !self.periodic_rate.is_finite() || self.periodic_rate <= -1.0 {
            return Err(ScheduleError::InvalidRate { rate: self.periodic_rate });
        }

        check_amount("present value", self.present_value)?;
        check_amount("future value", self.future_value)?;

        if self.policy.requires_payment() {
            let payment = self.payment.ok_or(ScheduleError::MissingPayment)?;
            check_amount("payment", payment)?;
        }

        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> ScheduleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScheduleError::InvalidAmount { field, value })
    }
}

/// Raw terms as supplied on the command line, in a CSV row or a JSON request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleTerms {
    /// Optional identifier carried through batch output
    pub label: Option<String>,

    pub present_value: f64,

    pub future_value: f64,

    /// Annualized coupon rate as a decimal
    pub annual_rate: f64,

    /// Schedule type name, resolved with `RepaymentPolicy::from_str`
    pub schedule_type: String,

    pub periods_per_year: u32,

    /// Years until maturity
    pub years: u32,

    /// Payment against the bond at the end of each period
    pub payment: Option<f64>,
}

impl Default for ScheduleTerms {
    fn default() -> Self {
        Self {
            label: None,
            present_value: 100.0,
            future_value: 0.0,
            annual_rate: 0.03,
            schedule_type: RepaymentPolicy::Bullet.as_str().to_string(),
            periods_per_year: 1,
            years: 15,
            payment: None,
        }
    }
}

impl ScheduleTerms {
    /// Total number of periods (years × periods per year)
    pub fn total_periods(&self) -> u64 {
        u64::from(self.years) * u64::from(self.periods_per_year)
    }

    /// Resolve the policy name and derive periodic rate and period count
    pub fn to_parameters(&self) -> ScheduleResult<ScheduleParameters> {
        let policy: RepaymentPolicy = self.schedule_type.parse()?;

        if self.periods_per_year == 0 {
            return Err(ScheduleError::InvalidPeriodCount { periods: 0 });
        }

        let total = self.total_periods();
        if total > u64::from(MAX_TOTAL_PERIODS) {
            return Err(ScheduleError::InvalidPeriodCount {
                periods: i64::try_from(total).unwrap_or(i64::MAX),
            });
        }
        let total_periods = total as u32;

        let params = ScheduleParameters {
            present_value: self.present_value,
            future_value: self.future_value,
            periodic_rate: self.annual_rate / f64::from(self.periods_per_year),
            total_periods,
            policy,
            payment: self.payment,
        };
        params.validate()?;

        Ok(params)
    }
}
