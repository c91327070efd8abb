use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// monthly annuity payment that amortizes `principal` over `years`
///
/// A zero rate falls back to straight-line repayment. `years == 0` is a
/// caller error; the whole principal is returned as a single payment.
/// Rate and term combinations whose growth factor leaves the decimal range
/// are rejected as invalid configuration.
pub fn standard_payment(principal: Money, annual_rate: Rate, years: u32) -> Result<Money> {
    standard_payment_for_months(principal, annual_rate, years.saturating_mul(12))
}

/// annuity payment over an explicit number of monthly periods
pub fn standard_payment_for_months(
    principal: Money,
    annual_rate: Rate,
    months: u32,
) -> Result<Money> {
    if months == 0 {
        return Ok(principal);
    }

    if annual_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    // PMT = P * r * (1 + r)^n / ((1 + r)^n - 1)
    let r = annual_rate.monthly_rate().as_decimal();
    let overflow = || {
        ScheduleError::invalid(format!(
            "rate {annual_rate} over {months} months is out of range for the payment formula"
        ))
    };

    let compound = compound_factor(r, months).ok_or_else(overflow)?;
    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(overflow)?;
    let denominator = compound - Decimal::ONE;

    let payment = numerator.checked_div(denominator).ok_or_else(overflow)?;
    Ok(Money::from_decimal(payment))
}

/// (1 + r)^n by repeated multiplication, None on overflow
fn compound_factor(r: Decimal, n: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(r)?;
    let mut factor = Decimal::ONE;
    for _ in 0..n {
        factor = factor.checked_mul(base)?;
    }
    Some(factor)
}
