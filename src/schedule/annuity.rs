//! Level annuity payment and decimal rounding

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal digits kept after every arithmetic step
pub const DEFAULT_PRECISION: u32 = 3;

/// Largest precision honoured by `round_to`; beyond this f64 has no digits left to keep
pub const MAX_PRECISION: u32 = 12;

/// Round to `precision` decimal digits.
///
/// The exact binary value of `value` is rounded, ties to even, so `2.675`
/// (stored as 2.67499999...) becomes `2.67` and `12.5` becomes `12`.
/// Values outside the `Decimal` range are returned unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };

    exact
        .round_dp_with_strategy(precision.min(MAX_PRECISION), RoundingStrategy::MidpointNearestEven)
        .to_string()
        .parse()
        .unwrap_or(value)
}

/// Level payment per period that takes `present_value` to `future_value`
/// over `periods` periods at `rate`, expressed as a positive amount paid
/// by the borrower.
///
/// Solves `PV·(1+r)^n − A·((1+r)^n − 1)/r = FV` for `A`, evaluated as
/// `PV·r/(1 − (1+r)^-n) − FV·r/((1+r)^n − 1)` so that a growth factor
/// overflowing to infinity still gives a finite payment. With a zero rate
/// (or a factor that underflows to zero) this is `(PV − FV)/n`.
/// Assumes `periods >= 1` and `rate > -1`.
pub fn level_payment(rate: f64, periods: u32, present_value: f64, future_value: f64) -> f64 {
    let n = f64::from(periods);

    if rate == 0.0 {
        return (present_value - future_value) / n;
    }

    // ln_1p/exp_m1 keep precision for small rates
    let log_growth = n * rate.ln_1p();
    let growth_minus_1 = log_growth.exp_m1();
    let discount_complement = -(-log_growth).exp_m1();
    if growth_minus_1 == 0.0 || discount_complement == 0.0 {
        return (present_value - future_value) / n;
    }

    present_value * rate / discount_complement - future_value * rate / growth_minus_1
}
