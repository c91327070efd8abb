use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{PaymentPolicy, RatePolicy, LOAN_YEAR_RATE_SLOTS};

use super::amortization::standard_payment;

/// rate and base payment in force for one loan year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTerms {
    pub loan_year: u32,
    pub rate: Rate,
    pub payment: Money,
    /// payment was recomputed from the remaining balance at this year's start
    pub recalculated: bool,
    /// years the recomputed payment was spread over
    pub remaining_years: Option<u32>,
}

/// annual rate for a 1-based loan year
pub fn rate_for_loan_year(policy: &RatePolicy, loan_year: u32) -> Result<Rate> {
    match policy {
        RatePolicy::Fixed(rate) => Ok(*rate),
        RatePolicy::VariableByLoanYear(rates) => {
            let index = (loan_year.max(1) as usize).min(LOAN_YEAR_RATE_SLOTS) - 1;
            rates.get(index).copied().ok_or_else(|| {
                ScheduleError::invalid(format!(
                    "expected {} loan-year rates, got {}",
                    LOAN_YEAR_RATE_SLOTS,
                    rates.len()
                ))
            })
        }
        RatePolicy::VariableByMap(schedule) => schedule.get(loan_year).ok_or_else(|| {
            ScheduleError::invalid(format!("no rate for loan year {loan_year} and no onwards rate"))
        }),
    }
}

/// resolves the per-loan-year terms of a config
pub struct PolicyResolver<'a> {
    config: &'a LoanConfig,
    frozen_payment: Option<Money>,
}

impl<'a> PolicyResolver<'a> {
    pub fn new(config: &'a LoanConfig) -> Result<Self> {
        let frozen_payment = match (&config.payment_policy, &config.rate_policy) {
            (PaymentPolicy::Calculated, RatePolicy::Fixed(rate)) => Some(standard_payment(
                config.principal,
                *rate,
                config.calculated_term_years()?,
            )?),
            _ => None,
        };

        Ok(Self {
            config,
            frozen_payment,
        })
    }

    /// payment fixed for the whole loan (fixed-rate calculated policy only)
    pub fn frozen_payment(&self) -> Option<Money> {
        self.frozen_payment
    }

    /// terms for `loan_year`, called at its first period with the balance at that point
    pub fn terms_for_year(&self, loan_year: u32, remaining_balance: Money) -> Result<YearTerms> {
        let rate = rate_for_loan_year(&self.config.rate_policy, loan_year)?;

        let terms = match &self.config.payment_policy {
            PaymentPolicy::ManualFixed(payment) => YearTerms {
                loan_year,
                rate,
                payment: *payment,
                recalculated: false,
                remaining_years: None,
            },
            PaymentPolicy::ManualVariableByMap(schedule) => {
                let payment = schedule.get(loan_year).ok_or_else(|| {
                    ScheduleError::invalid(format!(
                        "no payment for loan year {loan_year} and no onwards payment"
                    ))
                })?;
                YearTerms {
                    loan_year,
                    rate,
                    payment,
                    recalculated: false,
                    remaining_years: None,
                }
            }
            PaymentPolicy::Calculated => match self.frozen_payment {
                Some(payment) => YearTerms {
                    loan_year,
                    rate,
                    payment,
                    recalculated: false,
                    remaining_years: None,
                },
                None => {
                    let term = self.config.calculated_term_years()?;
                    let remaining_years = term.saturating_sub(loan_year.saturating_sub(1));
                    YearTerms {
                        loan_year,
                        rate,
                        payment: standard_payment(remaining_balance, rate, remaining_years)?,
                        recalculated: true,
                        remaining_years: Some(remaining_years),
                    }
                }
            },
        };

        Ok(terms)
    }
}
