//! Schedule output structures

use serde::{Deserialize, Serialize};

use super::annuity::round_to;
use crate::terms::RepaymentPolicy;

/// A single period of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Period index (1-indexed)
    pub period: u32,

    /// Total payment made at the end of the period
    pub payment: f64,

    /// Interest accrued on the opening balance
    pub interest: f64,

    /// Principal repaid (payment - interest)
    pub principal: f64,

    /// Principal balance after this period's payment
    pub balance: f64,
}

/// Complete amortization schedule, one record per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    policy: RepaymentPolicy,
    opening_balance: f64,
    precision: u32,
    records: Vec<PeriodRecord>,
}

impl Schedule {
    pub(crate) fn new(
        policy: RepaymentPolicy,
        opening_balance: f64,
        precision: u32,
        records: Vec<PeriodRecord>,
    ) -> Self {
        Self {
            policy,
            opening_balance,
            precision,
            records,
        }
    }

    pub fn policy(&self) -> RepaymentPolicy {
        self.policy
    }

    /// Balance at period 0 (the present value)
    pub fn opening_balance(&self) -> f64 {
        self.opening_balance
    }

    /// Decimal digits the schedule was rounded to
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodRecord> {
        self.records.iter()
    }

    /// Record for a 1-indexed period
    pub fn period(&self, period: u32) -> Option<&PeriodRecord> {
        let index = usize::try_from(period).ok()?.checked_sub(1)?;
        self.records.get(index)
    }

    /// Balance left after the last payment
    pub fn final_balance(&self) -> f64 {
        self.records
            .last()
            .map(|r| r.balance)
            .unwrap_or(self.opening_balance)
    }

    /// The payment, if every period pays the same amount
    pub fn level_payment(&self) -> Option<f64> {
        let first = self.records.first()?.payment;
        self.records
            .iter()
            .all(|r| r.payment == first)
            .then_some(first)
    }

    pub fn into_records(self) -> Vec<PeriodRecord> {
        self.records
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_payments: f64 = self.records.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.records.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.records.iter().map(|r| r.principal).sum();

        ScheduleSummary {
            policy: self.policy,
            total_periods: self.records.len() as u32,
            opening_balance: self.opening_balance,
            final_balance: self.final_balance(),
            level_payment: self.level_payment(),
            total_payments: round_to(total_payments, self.precision),
            total_interest: round_to(total_interest, self.precision),
            total_principal: round_to(total_principal, self.precision),
        }
    }

    /// Parallel arrays indexed by period, for plotting
    pub fn series(&self) -> PaymentSeries {
        let n = self.records.len();
        let mut series = PaymentSeries {
            periods: Vec::with_capacity(n),
            total_payments: Vec::with_capacity(n),
            principal_payments: Vec::with_capacity(n),
            interest_payments: Vec::with_capacity(n),
            balances: Vec::with_capacity(n),
        };

        for record in &self.records {
            series.periods.push(record.period);
            series.total_payments.push(record.payment);
            series.principal_payments.push(record.principal);
            series.interest_payments.push(record.interest);
            series.balances.push(record.balance);
        }

        series
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub policy: RepaymentPolicy,
    pub total_periods: u32,
    pub opening_balance: f64,
    pub final_balance: f64,
    pub level_payment: Option<f64>,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_principal: f64,
}

/// Time axis plus one array per payment type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSeries {
    pub periods: Vec<u32>,
    pub total_payments: Vec<f64>,
    pub principal_payments: Vec<f64>,
    pub interest_payments: Vec<f64>,
    pub balances: Vec<f64>,
}
