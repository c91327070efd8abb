use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::effective_rate;

use super::{PeriodRecord, Schedule, PERIODS_PER_YEAR};

/// loan-year ranges averaged in a summary: 1-3, 4-6, 7 onwards
pub const DEFAULT_PAYMENT_BANDS: [(u32, Option<u32>); 3] = [(1, Some(3)), (4, Some(6)), (7, None)];

/// fill the cumulative columns with prefix sums
pub fn apply_running_totals(records: &mut [PeriodRecord]) {
    let mut interest = Money::ZERO;
    let mut principal = Money::ZERO;
    let mut total = Money::ZERO;

    for record in records.iter_mut() {
        interest += record.interest_accrued;
        principal += record.principal_paid;
        total += record.total_payment;
        record.cumulative_interest = interest;
        record.cumulative_principal = principal;
        record.cumulative_total = total;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDuration {
    pub years: u32,
    pub months: u32,
}

impl LoanDuration {
    pub fn from_periods(periods: u32) -> Self {
        Self {
            years: periods / PERIODS_PER_YEAR,
            months: periods % PERIODS_PER_YEAR,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * PERIODS_PER_YEAR + self.months
    }
}

impl fmt::Display for LoanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years {} months", self.years, self.months)
    }
}

/// average monthly outlay over a range of loan years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBand {
    pub first_year: u32,
    /// None means open-ended
    pub last_year: Option<u32>,
    pub average_total_payment: Option<Money>,
}

impl PaymentBand {
    pub fn contains(&self, loan_year: u32) -> bool {
        loan_year >= self.first_year && self.last_year.map_or(true, |last| loan_year <= last)
    }

    pub fn label(&self) -> String {
        match self.last_year {
            Some(last) => format!("years {}-{}", self.first_year, last),
            None => format!("years {}+", self.first_year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_periods: u32,
    pub duration: LoanDuration,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
    /// total interest as a percentage of principal
    pub effective_rate: Decimal,
    /// frozen calculated payment, else the first period's base payment
    pub first_payment: Option<Money>,
    pub payment_bands: Vec<PaymentBand>,
}

impl Schedule {
    pub fn summary(&self) -> ScheduleSummary {
        let total_periods = self.records.len() as u32;
        let total_interest = self.total_interest();

        let payment_bands = DEFAULT_PAYMENT_BANDS
            .iter()
            .map(|&(first_year, last_year)| self.payment_band(first_year, last_year))
            .collect();

        ScheduleSummary {
            total_periods,
            duration: LoanDuration::from_periods(total_periods),
            total_interest,
            total_principal: self.total_principal(),
            total_paid: self.total_paid(),
            effective_rate: effective_rate(total_interest, self.principal),
            first_payment: self
                .calculated_payment
                .or_else(|| self.records.first().map(|r| r.applied_payment)),
            payment_bands,
        }
    }

    /// average `total_payment` over the records whose loan year falls in the band
    pub fn payment_band(&self, first_year: u32, last_year: Option<u32>) -> PaymentBand {
        let mut band = PaymentBand {
            first_year,
            last_year,
            average_total_payment: None,
        };

        let (sum, count) = self
            .records
            .iter()
            .filter(|r| band.contains(r.loan_year))
            .fold((Money::ZERO, 0u32), |(sum, count), r| {
                (sum + r.total_payment, count + 1)
            });

        if count > 0 {
            band.average_total_payment = Some((sum / Decimal::from(count)).round_dp(2));
        }
        band
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanConfigBuilder;
    use crate::decimal::Rate;
    use crate::schedule::generate_schedule;
    use rust_decimal_macros::dec;

    #[test]
    fn test_duration_from_periods() {
        assert_eq!(LoanDuration::from_periods(480), LoanDuration { years: 40, months: 0 });
        assert_eq!(LoanDuration::from_periods(379), LoanDuration { years: 31, months: 7 });
        assert_eq!(LoanDuration::from_periods(379).total_months(), 379);
        assert_eq!(LoanDuration::from_periods(14).to_string(), "1 years 2 months");
    }

    #[test]
    fn test_band_bounds() {
        let band = PaymentBand {
            first_year: 4,
            last_year: Some(6),
            average_total_payment: None,
        };
        assert!(!band.contains(3));
        assert!(band.contains(4));
        assert!(band.contains(6));
        assert!(!band.contains(7));
        assert_eq!(band.label(), "years 4-6");

        let open = PaymentBand {
            first_year: 7,
            last_year: None,
            average_total_payment: None,
        };
        assert!(open.contains(40));
        assert_eq!(open.label(), "years 7+");
    }

    #[test]
    fn test_summary_of_fixed_loan() {
        let config = LoanConfigBuilder::new()
            .principal(Money::from_major(4_300_000))
            .fixed_rate(Rate::from_decimal(dec!(0.04)))
            .term_years(40)
            .calculated_payment()
            .build()
            .unwrap();
        let schedule = generate_schedule(&config).unwrap();
        let summary = schedule.summary();

        assert_eq!(summary.total_periods as usize, schedule.len());
        assert_eq!(summary.total_principal, config.principal);
        assert_eq!(summary.total_paid, summary.total_principal + summary.total_interest);
        assert_eq!(summary.first_payment, schedule.calculated_payment);
        assert!(summary.effective_rate > dec!(90) && summary.effective_rate < dec!(110));

        let last = schedule.records.last().unwrap();
        assert_eq!(summary.total_interest, last.cumulative_interest);

        assert_eq!(summary.payment_bands.len(), 3);
        let payment = schedule.calculated_payment.unwrap().round_dp(2);
        // constant payment, so every full band averages to it
        assert_eq!(summary.payment_bands[0].average_total_payment, Some(payment));
        assert_eq!(summary.payment_bands[1].average_total_payment, Some(payment));
    }

    #[test]
    fn test_short_loan_has_empty_bands() {
        let config = LoanConfigBuilder::new()
            .principal(Money::from_major(100_000))
            .fixed_rate(Rate::from_decimal(dec!(0.05)))
            .manual_payment(Money::from_major(10_000))
            .build()
            .unwrap();
        let summary = generate_schedule(&config).unwrap().summary();

        assert_eq!(summary.duration.years, 0);
        assert!(summary.payment_bands[0].average_total_payment.is_some());
        assert_eq!(summary.payment_bands[1].average_total_payment, None);
        assert_eq!(summary.payment_bands[2].average_total_payment, None);
        assert_eq!(summary.first_payment, Some(Money::from_major(10_000)));
    }
}
