use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a scenario in a comparison set
pub type ScenarioId = Uuid;

/// number of positional entries in a by-loan-year rate list (years 1..5, then 6+)
pub const LOAN_YEAR_RATE_SLOTS: usize = 6;

/// values keyed by 1-based loan year with a fallback for every other year
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearlySchedule<T> {
    pub by_year: BTreeMap<u32, T>,
    /// the "onwards" value; mandatory, checked by config validation
    pub onwards: Option<T>,
}

impl<T: Copy> YearlySchedule<T> {
    pub fn new(onwards: T) -> Self {
        Self {
            by_year: BTreeMap::new(),
            onwards: Some(onwards),
        }
    }

    pub fn with_year(mut self, loan_year: u32, value: T) -> Self {
        self.by_year.insert(loan_year, value);
        self
    }

    /// value for the loan year, falling back to onwards
    pub fn get(&self, loan_year: u32) -> Option<T> {
        self.by_year.get(&loan_year).copied().or(self.onwards)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.by_year.values().chain(self.onwards.iter())
    }
}

/// how the annual interest rate is chosen per loan year
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatePolicy {
    /// one rate for the whole loan
    Fixed(Rate),
    /// years 1..5 positional, year 6+ uses the sixth entry
    VariableByLoanYear(Vec<Rate>),
    /// explicit years with an onwards fallback
    VariableByMap(YearlySchedule<Rate>),
}

impl RatePolicy {
    pub fn is_fixed(&self) -> bool {
        matches!(self, RatePolicy::Fixed(_))
    }
}

/// how the base monthly payment is chosen
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentPolicy {
    /// same payment every period
    ManualFixed(Money),
    /// payment by loan year with an onwards fallback
    ManualVariableByMap(YearlySchedule<Money>),
    /// annuity payment from the standard formula
    Calculated,
}

impl PaymentPolicy {
    pub fn is_calculated(&self) -> bool {
        matches!(self, PaymentPolicy::Calculated)
    }
}

/// extra payment on top of the policy payment, directed at principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TopUpStrategy {
    #[default]
    None,
    /// pay at least this much per period
    TargetMinimum(Money),
    /// add a fixed amount per period
    Additional(Money),
    /// raise the payment by a percentage (10 for 10%)
    Percentage(Decimal),
    /// max(payment, minimum) + additional; zero means unused
    Combined { minimum: Money, additional: Money },
}

impl TopUpStrategy {
    pub fn is_none(&self) -> bool {
        matches!(self, TopUpStrategy::None)
    }
}

/// periodic payment raise, e.g. after each refinance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentStepUp {
    pub cycle_years: u32,
    pub increase: Money,
}

impl PaymentStepUp {
    /// cumulative raise in effect at the 1-based period number
    pub fn amount_at(&self, period_number: u32) -> Money {
        if self.cycle_years == 0 {
            return Money::ZERO;
        }
        let steps = period_number / self.cycle_years.saturating_mul(12);
        self.increase * Decimal::from(steps)
    }
}
