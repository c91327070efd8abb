pub mod accrual;

use rust_decimal::Decimal;

use crate::decimal::Money;

pub use accrual::{days_in_month, AccrualConvention, AccrualEngine, DAILY_PRORATION_BASIS};

/// total interest as a percentage of the original principal; a cost summary, not an APR
pub fn effective_rate(total_interest: Money, principal: Money) -> Decimal {
    if principal.is_zero() {
        return Decimal::ZERO;
    }
    total_interest.as_decimal() / principal.as_decimal() * Decimal::ONE_HUNDRED
}
