pub mod amortization;
pub mod policy;
pub mod topup;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;

pub use amortization::{standard_payment, standard_payment_for_months};
pub use policy::{rate_for_loan_year, PolicyResolver, YearTerms};
pub use topup::{effective_payment, resolve_top_up};

/// how one period's available payment is split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentApplication {
    pub to_interest: Money,
    pub to_principal: Money,
    /// available payment did not exceed the accrued interest
    pub shortfall: bool,
}

/// apply `available` against `interest` first, then principal capped at `balance`
///
/// When the payment does not exceed the interest nothing reaches principal
/// and the balance stays put; unpaid interest is not capitalized.
pub fn apply_payment(available: Money, interest: Money, balance: Money) -> PaymentApplication {
    if available <= interest {
        return PaymentApplication {
            to_interest: interest,
            to_principal: Money::ZERO,
            shortfall: true,
        };
    }

    PaymentApplication {
        to_interest: interest,
        to_principal: (available - interest).min(balance),
        shortfall: false,
    }
}
