pub mod cache;
pub mod summary;

use chrono::NaiveDate;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::events::{EventStore, ScheduleEvent};
use crate::interest::AccrualEngine;
use crate::payments::{apply_payment, resolve_top_up, PolicyResolver, YearTerms};

pub use cache::ScheduleCache;
pub use summary::{apply_running_totals, LoanDuration, PaymentBand, ScheduleSummary};

pub const PERIODS_PER_YEAR: u32 = 12;

/// upper bound on periods for policies without a term (100 years)
pub const SAFETY_PERIOD_CAP: u32 = 1200;

/// one month of the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 0-based position in the schedule
    pub period_index: u32,
    /// 1-based block of 12 periods
    pub loan_year: u32,
    pub year: i32,
    pub month: u32,
    pub starting_balance: Money,
    pub applied_rate: Rate,
    /// base payment from the payment policy
    pub applied_payment: Money,
    pub interest_accrued: Money,
    pub add_on: Money,
    pub top_up_amount: Money,
    pub step_up_amount: Money,
    /// base payment + top-up + step-up + add-on
    pub available_payment: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
    /// principal paid + interest accrued
    pub total_payment: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
    pub cumulative_total: Money,
}

impl PeriodRecord {
    /// first day of the period's calendar month
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn is_interest_shortfall(&self) -> bool {
        self.available_payment <= self.interest_accrued
    }

    pub fn closes_loan_year(&self) -> bool {
        (self.period_index + 1) % PERIODS_PER_YEAR == 0
    }
}

/// how a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    PaidOff,
    /// calculated policy reached term * 12 periods with debt left
    TermExhausted { remaining_balance: Money },
    /// manual policy reached the safety cap with debt left
    SafetyCapReached { remaining_balance: Money },
}

/// ordered period records plus run metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub records: Vec<PeriodRecord>,
    pub outcome: ScheduleOutcome,
    /// the frozen payment of a fixed-rate calculated loan
    pub calculated_payment: Option<Money>,
    pub events: Vec<ScheduleEvent>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_period(&self, period_index: u32) -> Option<&PeriodRecord> {
        self.records.get(period_index as usize)
    }

    pub fn final_balance(&self) -> Money {
        self.records
            .last()
            .map(|r| r.ending_balance)
            .unwrap_or(self.principal)
    }

    pub fn is_paid_off(&self) -> bool {
        matches!(self.outcome, ScheduleOutcome::PaidOff)
    }

    pub fn total_interest(&self) -> Money {
        self.records.iter().map(|r| r.interest_accrued).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.records.iter().map(|r| r.principal_paid).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.records.iter().map(|r| r.total_payment).sum()
    }

    pub fn shortfall_periods(&self) -> usize {
        self.records.iter().filter(|r| r.is_interest_shortfall()).count()
    }

    /// the schedule if the loan was paid off, otherwise a non-convergence error
    pub fn into_paid_off(self) -> Result<Self> {
        match self.outcome {
            ScheduleOutcome::PaidOff => Ok(self),
            ScheduleOutcome::TermExhausted { remaining_balance }
            | ScheduleOutcome::SafetyCapReached { remaining_balance } => {
                Err(ScheduleError::NonConvergence {
                    periods: self.records.len() as u32,
                    remaining_balance,
                })
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// runs the period recurrence for one config
pub struct ScheduleEngine<'a> {
    config: &'a LoanConfig,
    resolver: PolicyResolver<'a>,
    accrual: AccrualEngine,
}

impl<'a> ScheduleEngine<'a> {
    pub fn new(config: &'a LoanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resolver: PolicyResolver::new(config)?,
            accrual: AccrualEngine::new(config.accrual),
        })
    }

    /// maximum number of periods this run may take
    pub fn period_cap(&self) -> u32 {
        match self.config.term_years {
            Some(years) if self.config.payment_policy.is_calculated() => {
                years.saturating_mul(PERIODS_PER_YEAR)
            }
            _ => SAFETY_PERIOD_CAP,
        }
    }

    /// build the raw schedule; a loan left unpaid at the cap is reported in `outcome`
    pub fn run(&self) -> Result<Schedule> {
        let config = self.config;
        let cap = self.period_cap();
        debug!(
            "schedule run: principal {} rate {:?} payment {:?} accrual {:?} cap {}",
            config.principal, config.rate_policy, config.payment_policy, config.accrual, cap
        );

        let mut events = EventStore::new();
        let mut records = Vec::new();

        let mut balance = config.principal;
        let mut period_index: u32 = 0;
        let mut loan_year: u32 = 1;
        let (mut year, mut month) = (config.start_year, config.start_month);
        let mut terms: Option<YearTerms> = None;
        let mut step_up_level = Money::ZERO;
        let mut warned_shortfall = false;

        while balance.is_positive() && period_index < cap {
            let year_terms = match terms {
                Some(t) if t.loan_year == loan_year => t,
                _ => {
                    let t = self.begin_loan_year(loan_year, period_index, balance, &mut events)?;
                    terms = Some(t);
                    t
                }
            };

            let starting_balance = balance;
            let interest = self.accrual.accrue(balance, year_terms.rate, year, month);

            let add_on = if (period_index + 1) % PERIODS_PER_YEAR == 0 {
                config.yearly_add_on
            } else {
                Money::ZERO
            };
            let top_up = resolve_top_up(year_terms.payment, &config.top_up);
            let step_up = config
                .step_up
                .map(|s| s.amount_at(period_index + 1))
                .unwrap_or(Money::ZERO);
            if step_up != step_up_level {
                events.emit(ScheduleEvent::PaymentSteppedUp {
                    period_index,
                    step_up,
                });
                step_up_level = step_up;
            }

            let available = year_terms.payment + top_up + step_up + add_on;
            let applied = apply_payment(available, interest, balance);
            if applied.shortfall {
                if !warned_shortfall {
                    warn!(
                        "payment {} does not cover interest {} in period {}; balance held at {}",
                        available, interest, period_index, balance
                    );
                    warned_shortfall = true;
                }
                events.emit(ScheduleEvent::InterestShortfall {
                    period_index,
                    available,
                    interest,
                });
            }

            let mut principal_paid = applied.to_principal;
            let mut ending_balance = starting_balance - principal_paid;
            if ending_balance < Money::CENT {
                principal_paid = starting_balance;
                ending_balance = Money::ZERO;
            }

            if ending_balance > starting_balance {
                return Err(ScheduleError::InvariantViolation {
                    period_index,
                    previous: starting_balance,
                    current: ending_balance,
                });
            }

            trace!(
                "period {} ({}-{:02}): start {} interest {} principal {} end {}",
                period_index,
                year,
                month,
                starting_balance,
                interest,
                principal_paid,
                ending_balance
            );

            records.push(PeriodRecord {
                period_index,
                loan_year,
                year,
                month,
                starting_balance,
                applied_rate: year_terms.rate,
                applied_payment: year_terms.payment,
                interest_accrued: interest,
                add_on,
                top_up_amount: top_up,
                step_up_amount: step_up,
                available_payment: available,
                principal_paid,
                ending_balance,
                total_payment: principal_paid + interest,
                cumulative_interest: Money::ZERO,
                cumulative_principal: Money::ZERO,
                cumulative_total: Money::ZERO,
            });

            balance = ending_balance;
            if month == 12 {
                month = 1;
                year += 1;
            } else {
                month += 1;
            }
            period_index += 1;
            if period_index % PERIODS_PER_YEAR == 0 {
                loan_year += 1;
            }
        }

        let outcome = if balance.is_positive() {
            warn!(
                "loan not paid off after {} periods, {} outstanding",
                period_index, balance
            );
            events.emit(ScheduleEvent::CapReached {
                period_index,
                remaining_balance: balance,
            });
            if config.payment_policy.is_calculated() {
                ScheduleOutcome::TermExhausted {
                    remaining_balance: balance,
                }
            } else {
                ScheduleOutcome::SafetyCapReached {
                    remaining_balance: balance,
                }
            }
        } else {
            events.emit(ScheduleEvent::PaidOff {
                period_index: period_index.saturating_sub(1),
            });
            ScheduleOutcome::PaidOff
        };

        apply_running_totals(&mut records);
        debug!("schedule run finished: {} periods, {:?}", records.len(), outcome);

        Ok(Schedule {
            principal: config.principal,
            records,
            outcome,
            calculated_payment: self.resolver.frozen_payment(),
            events: events.take_events(),
        })
    }

    fn begin_loan_year(
        &self,
        loan_year: u32,
        period_index: u32,
        balance: Money,
        events: &mut EventStore,
    ) -> Result<YearTerms> {
        let terms = self.resolver.terms_for_year(loan_year, balance)?;

        if let (true, Some(remaining_years)) = (terms.recalculated, terms.remaining_years) {
            events.emit(ScheduleEvent::PaymentRecalculated {
                loan_year,
                period_index,
                remaining_balance: balance,
                remaining_years,
                payment: terms.payment,
            });
        }
        events.emit(ScheduleEvent::LoanYearStarted {
            loan_year,
            period_index,
            rate: terms.rate,
            payment: terms.payment,
        });

        Ok(terms)
    }
}

/// run a config to payoff; any debt left at the cap is a [`ScheduleError::NonConvergence`]
pub fn generate_schedule(config: &LoanConfig) -> Result<Schedule> {
    ScheduleEngine::new(config)?.run()?.into_paid_off()
}
