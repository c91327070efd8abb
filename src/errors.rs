use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("remaining balance increased in period {period_index}: {previous} -> {current}")]
    InvariantViolation {
        period_index: u32,
        previous: Money,
        current: Money,
    },

    #[error("payment too low to amortize this loan: {remaining_balance} outstanding after {periods} periods")]
    NonConvergence {
        periods: u32,
        remaining_balance: Money,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl ScheduleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ScheduleError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Serialization {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
