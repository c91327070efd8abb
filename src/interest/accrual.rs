use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// days in the year used by daily proration
pub const DAILY_PRORATION_BASIS: u32 = 365;

/// how a period's interest is derived from the annual rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccrualConvention {
    /// balance * annual rate / 12, matches the annuity payment formula
    MonthlyRate,
    /// balance * annual rate * days in calendar month / 365
    DailyProration,
}

/// engine for accruing one period of interest
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub convention: AccrualConvention,
}

impl AccrualEngine {
    pub fn new(convention: AccrualConvention) -> Self {
        Self { convention }
    }

    /// interest on `balance` for the calendar month `year`/`month`
    pub fn accrue(&self, balance: Money, annual_rate: Rate, year: i32, month: u32) -> Money {
        match self.convention {
            AccrualConvention::MonthlyRate => {
                balance.apply_periodic_rate(annual_rate.monthly_rate().as_decimal())
            }
            AccrualConvention::DailyProration => {
                balance.prorate(annual_rate, days_in_month(year, month), DAILY_PRORATION_BASIS)
            }
        }
    }
}

/// number of days in a calendar month, 30 for an invalid month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}
