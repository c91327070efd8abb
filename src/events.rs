use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// audit events emitted while a schedule is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEvent {
    /// rate and base payment resolved at the first period of a loan year
    LoanYearStarted {
        loan_year: u32,
        period_index: u32,
        rate: Rate,
        payment: Money,
    },
    /// annuity payment recomputed from the balance left at a loan-year start
    PaymentRecalculated {
        loan_year: u32,
        period_index: u32,
        remaining_balance: Money,
        remaining_years: u32,
        payment: Money,
    },
    /// available payment did not cover the accrued interest
    InterestShortfall {
        period_index: u32,
        available: Money,
        interest: Money,
    },
    /// a new step-up level took effect
    PaymentSteppedUp {
        period_index: u32,
        step_up: Money,
    },
    PaidOff {
        period_index: u32,
    },
    /// the run stopped at its period cap with debt outstanding
    CapReached {
        period_index: u32,
        remaining_balance: Money,
    },
}

/// event store for collecting events during a run
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<ScheduleEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<ScheduleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
