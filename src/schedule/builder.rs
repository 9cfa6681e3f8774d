//! Schedule builder: the per-period interest/principal/balance recurrence

use super::annuity::{level_payment, round_to, DEFAULT_PRECISION, MAX_PRECISION};
use super::records::{PeriodRecord, Schedule};
use crate::error::{ScheduleError, ScheduleResult};
use crate::terms::{RepaymentPolicy, ScheduleParameters};

/// Environment variable overriding the rounding precision in the binaries
pub const PRECISION_ENV_VAR: &str = "SCHEDULE_PRECISION";

/// Configuration for a schedule build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Decimal digits kept after every arithmetic step
    pub precision: u32,
}

impl ScheduleConfig {
    /// Config with the given precision, capped at `MAX_PRECISION`
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    /// Read `SCHEDULE_PRECISION` from the environment, falling back to the default
    pub fn from_env() -> Self {
        std::env::var(PRECISION_ENV_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Self::with_precision)
            .unwrap_or_default()
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// How each period's payment is derived
#[derive(Debug, Clone, Copy)]
enum PaymentRule {
    /// Pay the interest; repay the whole balance with the final payment
    InterestOnly,
    /// Pay the same amount every period
    Level(f64),
}

impl PaymentRule {
    fn for_params(params: &ScheduleParameters, precision: u32) -> ScheduleResult<Self> {
        match params.policy {
            RepaymentPolicy::Bullet => Ok(PaymentRule::InterestOnly),
            RepaymentPolicy::FullyAmortized => {
                let payment = level_payment(
                    params.periodic_rate,
                    params.total_periods,
                    params.present_value,
                    params.future_value,
                );
                if !payment.is_finite() {
                    return Err(ScheduleError::InvalidAmount {
                        field: "level payment",
                        value: payment,
                    });
                }
                Ok(PaymentRule::Level(round_to(payment, precision)))
            }
            RepaymentPolicy::SinkingFund => params
                .payment
                .map(PaymentRule::Level)
                .ok_or(ScheduleError::MissingPayment),
        }
    }
}

/// Builds amortization schedules
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    config: ScheduleConfig,
}

impl ScheduleBuilder {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Build the full schedule, or fail before the first period is computed
    pub fn build(&self, params: &ScheduleParameters) -> ScheduleResult<Schedule> {
        params.validate()?;

        let precision = self.config.precision;
        let rule = PaymentRule::for_params(params, precision)?;

        let mut records = Vec::with_capacity(params.total_periods as usize);
        let mut balance = params.present_value;

        for period in 1..=params.total_periods {
            let is_final = period == params.total_periods;
            let record = self.calculate_period(period, balance, is_final, params.periodic_rate, rule);
            balance = record.balance;
            records.push(record);
        }

        Ok(Schedule::new(params.policy, params.present_value, precision, records))
    }

    /// Calculate one period from the prior period's closing balance
    fn calculate_period(
        &self,
        period: u32,
        prior_balance: f64,
        is_final: bool,
        rate: f64,
        rule: PaymentRule,
    ) -> PeriodRecord {
        let precision = self.config.precision;
        let interest = round_to(prior_balance * rate, precision);

        let (payment, principal, balance) = match rule {
            PaymentRule::InterestOnly if is_final => {
                (round_to(interest + prior_balance, precision), prior_balance, 0.0)
            }
            PaymentRule::InterestOnly => (interest, 0.0, prior_balance),
            PaymentRule::Level(payment) => {
                let principal = round_to(payment - interest, precision);
                let balance = round_to(prior_balance - principal, precision);
                (payment, principal, balance)
            }
        };

        PeriodRecord {
            period,
            payment,
            interest,
            principal,
            balance,
        }
    }
}

/// Build a schedule with the default configuration
pub fn build_schedule(params: &ScheduleParameters) -> ScheduleResult<Schedule> {
    ScheduleBuilder::default().build(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mortgage(policy: RepaymentPolicy) -> ScheduleParameters {
        // 100 at 6% annual, monthly, 15 years
        ScheduleParameters::new(100.0, 0.0, 0.06 / 12.0, 180, policy)
    }

    /// Accumulated rounding bound: half a unit per rounding, two roundings per period
    fn drift_tolerance(schedule: &Schedule) -> f64 {
        schedule.len() as f64 * 10f64.powi(-(schedule.precision() as i32))
    }

    #[test]
    fn test_fully_amortized_mortgage() {
        let schedule = build_schedule(&mortgage(RepaymentPolicy::FullyAmortized)).unwrap();
        assert_eq!(schedule.len(), 180);

        let first = schedule.period(1).unwrap();
        assert_eq!(first.payment, 0.844);
        assert_eq!(first.interest, 0.5);
        assert_eq!(first.principal, 0.344);
        assert_eq!(first.balance, 99.656);

        let second = schedule.period(2).unwrap();
        assert_eq!(second.interest, 0.498);
        assert_eq!(second.balance, 99.31);

        assert_eq!(schedule.level_payment(), Some(0.844));

        // Interest at maturity comes from the prior balance, not the prior interest
        let prior = schedule.period(179).unwrap();
        let last = schedule.period(180).unwrap();
        assert_eq!(last.interest, round_to(prior.balance * 0.005, 3));
        assert_abs_diff_eq!(last.balance, -0.055, epsilon = 1e-9);
        assert!(schedule.final_balance().abs() <= drift_tolerance(&schedule));
    }

    #[test]
    fn test_fully_amortized_default_coupon_monthly() {
        // 3% paid monthly for 15 years; period 81 accrues 61.0 * 0.0025, stored as 0.15249999...
        let params = ScheduleParameters::new(100.0, 0.0, 0.03 / 12.0, 180, RepaymentPolicy::FullyAmortized);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.level_payment(), Some(0.691));

        let record = schedule.period(81).unwrap();
        assert_eq!(record.interest, 0.152);
        assert_eq!(record.principal, 0.539);
        assert_eq!(record.balance, 60.461);
        assert_abs_diff_eq!(schedule.final_balance(), -0.097, epsilon = 1e-9);
    }

    #[test]
    fn test_fully_amortized_with_overflowing_growth() {
        let params = ScheduleParameters::new(100.0, 0.0, 0.5, 2000, RepaymentPolicy::FullyAmortized);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.level_payment(), Some(50.0));
        assert!(schedule.iter().all(|r| r.balance.is_finite()));
        assert_eq!(schedule.final_balance(), 100.0);
    }

    #[test]
    fn test_non_finite_level_payment_is_rejected() {
        let params = ScheduleParameters::new(f64::MAX, 0.0, 0.5, 1, RepaymentPolicy::FullyAmortized);
        assert!(matches!(
            build_schedule(&params),
            Err(ScheduleError::InvalidAmount { field: "level payment", .. })
        ));
    }

    #[test]
    fn test_bullet_mortgage() {
        let schedule = build_schedule(&mortgage(RepaymentPolicy::Bullet)).unwrap();
        assert_eq!(schedule.len(), 180);

        for record in schedule.records().iter().take(179) {
            assert_eq!(record.payment, 0.5);
            assert_eq!(record.interest, 0.5);
            assert_eq!(record.principal, 0.0);
            assert_eq!(record.balance, 100.0);
        }

        let last = schedule.period(180).unwrap();
        assert_eq!(last.payment, 100.5);
        assert_eq!(last.interest, 0.5);
        assert_eq!(last.principal, 100.0);
        assert_eq!(last.balance, 0.0);

        let summary = schedule.summary();
        assert_eq!(summary.total_interest, 90.0);
        assert_eq!(summary.total_principal, 100.0);
        assert_eq!(summary.total_payments, 190.0);
    }

    #[test]
    fn test_bullet_keeps_unrounded_present_value() {
        let params = ScheduleParameters::new(100.12345, 0.0, 0.01, 3, RepaymentPolicy::Bullet);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.period(1).unwrap().balance, 100.12345);
        assert_eq!(schedule.period(2).unwrap().balance, 100.12345);
        assert_eq!(schedule.period(3).unwrap().principal, 100.12345);
        assert_eq!(schedule.final_balance(), 0.0);
    }

    #[test]
    fn test_single_period_bullet() {
        let params = ScheduleParameters::new(1000.0, 0.0, 0.05, 1, RepaymentPolicy::Bullet);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.records()[0].payment, 1050.0);
        assert_eq!(schedule.final_balance(), 0.0);
    }

    #[test]
    fn test_sinking_fund() {
        let params = ScheduleParameters::new(1000.0, 0.0, 0.01, 4, RepaymentPolicy::SinkingFund)
            .with_payment(100.0);
        let schedule = build_schedule(&params).unwrap();

        let expected = [
            (10.0, 90.0, 910.0),
            (9.1, 90.9, 819.1),
            (8.191, 91.809, 727.291),
            (7.273, 92.727, 634.564),
        ];
        for (record, (interest, principal, balance)) in schedule.iter().zip(expected) {
            assert_eq!(record.payment, 100.0);
            assert_abs_diff_eq!(record.interest, interest, epsilon = 1e-9);
            assert_abs_diff_eq!(record.principal, principal, epsilon = 1e-9);
            assert_abs_diff_eq!(record.balance, balance, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_insufficient_sinking_fund_is_not_rejected() {
        // 30 per quarter never retires 1000 at 4% over 10 years
        let params = ScheduleParameters::new(1000.0, 0.0, 0.04 / 4.0, 40, RepaymentPolicy::SinkingFund)
            .with_payment(30.0);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.len(), 40);
        assert_abs_diff_eq!(schedule.final_balance(), 22.273, epsilon = 1e-9);
    }

    #[test]
    fn test_sinking_fund_without_payment() {
        let params = mortgage(RepaymentPolicy::SinkingFund);
        assert_eq!(build_schedule(&params).unwrap_err(), ScheduleError::MissingPayment);
    }

    #[test]
    fn test_zero_periods() {
        let params = ScheduleParameters::new(100.0, 0.0, 0.01, 0, RepaymentPolicy::Bullet);
        assert_eq!(
            build_schedule(&params).unwrap_err(),
            ScheduleError::InvalidPeriodCount { periods: 0 }
        );
    }

    #[test]
    fn test_zero_rate_fully_amortized() {
        let params = ScheduleParameters::new(1000.0, 200.0, 0.0, 4, RepaymentPolicy::FullyAmortized);
        let schedule = build_schedule(&params).unwrap();

        for record in &schedule {
            assert_eq!(record.payment, 200.0);
            assert_eq!(record.interest, 0.0);
            assert_eq!(record.principal, record.payment);
        }
        assert_eq!(schedule.final_balance(), 200.0);
    }

    #[test]
    fn test_fully_amortized_reaches_future_value() {
        let params = ScheduleParameters::new(1000.0, 400.0, 0.05, 10, RepaymentPolicy::FullyAmortized);
        let schedule = build_schedule(&params).unwrap();

        assert_eq!(schedule.level_payment(), Some(97.703));
        assert_abs_diff_eq!(schedule.final_balance(), 399.997, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.final_balance(), 400.0, epsilon = drift_tolerance(&schedule));
    }

    #[test]
    fn test_negative_rate_fully_amortized() {
        let params = ScheduleParameters::new(1000.0, 0.0, -0.01, 5, RepaymentPolicy::FullyAmortized);
        let schedule = build_schedule(&params).unwrap();

        let first = schedule.period(1).unwrap();
        assert_eq!(first.payment, 194.04);
        assert_eq!(first.interest, -10.0);
        assert_abs_diff_eq!(first.principal, 204.04, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.final_balance(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_additivity_across_policies() {
        let cases = [
            mortgage(RepaymentPolicy::Bullet),
            mortgage(RepaymentPolicy::FullyAmortized),
            mortgage(RepaymentPolicy::SinkingFund).with_payment(1.25),
        ];

        for params in &cases {
            let schedule = build_schedule(params).unwrap();
            let mut prior_balance = schedule.opening_balance();
            for record in &schedule {
                assert_abs_diff_eq!(record.payment, record.interest + record.principal, epsilon = 1e-9);
                assert_abs_diff_eq!(record.balance, prior_balance - record.principal, epsilon = 1e-9);
                prior_balance = record.balance;
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = mortgage(RepaymentPolicy::FullyAmortized);
        let builder = ScheduleBuilder::default();

        let first = builder.build(&params).unwrap();
        let second = builder.build(&params).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.payment.to_bits(), b.payment.to_bits());
            assert_eq!(a.interest.to_bits(), b.interest.to_bits());
            assert_eq!(a.principal.to_bits(), b.principal.to_bits());
            assert_eq!(a.balance.to_bits(), b.balance.to_bits());
        }
    }

    #[test]
    fn test_precision_override() {
        let params = mortgage(RepaymentPolicy::FullyAmortized);

        let fine = ScheduleBuilder::new(ScheduleConfig::with_precision(5)).build(&params).unwrap();
        assert_eq!(fine.precision(), 5);
        assert_eq!(fine.level_payment(), Some(0.84386));
        assert_eq!(fine.period(1).unwrap().principal, 0.34386);
        assert_abs_diff_eq!(fine.final_balance(), -0.001, epsilon = 1e-9);

        let coarse = ScheduleBuilder::new(ScheduleConfig::with_precision(2)).build(&params).unwrap();
        assert_eq!(coarse.level_payment(), Some(0.84));
        assert_abs_diff_eq!(coarse.final_balance(), 1.13, epsilon = 1e-9);
    }

    #[test]
    fn test_config_caps_precision() {
        assert_eq!(ScheduleConfig::with_precision(40).precision, MAX_PRECISION);
        assert_eq!(ScheduleConfig::default().precision, 3);
    }
}
