pub mod comparison;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod schedule;
pub mod types;

// re-export key types
pub use comparison::{SavingsComparison, Scenario, ScenarioReport, ScenarioSet, TopUpAnalysis};
pub use config::{
    parse_house_presets, parse_payment_presets, HousePreset, LoanConfig, LoanConfigBuilder,
    PaymentStrategyPreset, RateType,
};
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use events::{EventStore, ScheduleEvent};
pub use interest::{AccrualConvention, AccrualEngine};
pub use payments::{resolve_top_up, standard_payment, PolicyResolver};
pub use schedule::{
    generate_schedule, LoanDuration, PaymentBand, PeriodRecord, Schedule, ScheduleCache,
    ScheduleEngine, ScheduleOutcome, ScheduleSummary,
};
pub use types::{
    PaymentPolicy, PaymentStepUp, RatePolicy, ScenarioId, TopUpStrategy, YearlySchedule,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
