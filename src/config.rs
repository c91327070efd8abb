use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::interest::AccrualConvention;
use crate::types::{
    PaymentPolicy, PaymentStepUp, RatePolicy, TopUpStrategy, YearlySchedule, LOAN_YEAR_RATE_SLOTS,
};

pub const DEFAULT_START_YEAR: i32 = 2026;
pub const DEFAULT_START_MONTH: u32 = 1;

/// inputs to a single amortization run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanConfig {
    pub principal: Money,
    pub start_year: i32,
    pub start_month: u32,
    /// caps the run at term * 12 periods; only read by the calculated policy
    pub term_years: Option<u32>,
    pub rate_policy: RatePolicy,
    pub payment_policy: PaymentPolicy,
    /// extra principal payment at the end of every loan year
    pub yearly_add_on: Money,
    pub top_up: TopUpStrategy,
    pub accrual: AccrualConvention,
    pub step_up: Option<PaymentStepUp>,
}

impl LoanConfig {
    pub fn builder() -> LoanConfigBuilder {
        LoanConfigBuilder::new()
    }

    /// check every precondition the engine relies on
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ScheduleError::invalid(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }

        if !(1..=12).contains(&self.start_month) {
            return Err(ScheduleError::invalid(format!(
                "start month must be 1-12, got {}",
                self.start_month
            )));
        }

        if self.payment_policy.is_calculated() {
            self.calculated_term_years()?;
        }

        self.validate_rates()?;
        self.validate_payments()?;

        if self.yearly_add_on.is_negative() {
            return Err(ScheduleError::invalid(format!(
                "yearly add-on cannot be negative, got {}",
                self.yearly_add_on
            )));
        }

        let top_up_negative = match self.top_up {
            TopUpStrategy::None => false,
            TopUpStrategy::TargetMinimum(amount) | TopUpStrategy::Additional(amount) => {
                amount.is_negative()
            }
            TopUpStrategy::Percentage(pct) => pct < Decimal::ZERO,
            TopUpStrategy::Combined {
                minimum,
                additional,
            } => minimum.is_negative() || additional.is_negative(),
        };
        if top_up_negative {
            return Err(ScheduleError::invalid("top-up amounts cannot be negative"));
        }

        if let Some(step) = self.step_up {
            if step.cycle_years == 0 {
                return Err(ScheduleError::invalid("step-up cycle must be at least one year"));
            }
            if step.increase.is_negative() {
                return Err(ScheduleError::invalid("step-up increase cannot be negative"));
            }
        }

        Ok(())
    }

    fn validate_rates(&self) -> Result<()> {
        let rates: Vec<Rate> = match &self.rate_policy {
            RatePolicy::Fixed(rate) => vec![*rate],
            RatePolicy::VariableByLoanYear(rates) => {
                if rates.len() != LOAN_YEAR_RATE_SLOTS {
                    return Err(ScheduleError::invalid(format!(
                        "expected {} loan-year rates, got {}",
                        LOAN_YEAR_RATE_SLOTS,
                        rates.len()
                    )));
                }
                rates.clone()
            }
            RatePolicy::VariableByMap(schedule) => {
                if schedule.onwards.is_none() {
                    return Err(ScheduleError::invalid("rate schedule is missing the onwards rate"));
                }
                schedule.values().copied().collect()
            }
        };

        match rates.into_iter().find(Rate::is_negative) {
            Some(rate) => Err(ScheduleError::InvalidInterestRate { rate }),
            None => Ok(()),
        }
    }

    fn validate_payments(&self) -> Result<()> {
        match &self.payment_policy {
            PaymentPolicy::ManualFixed(payment) => {
                if payment.is_negative() {
                    return Err(ScheduleError::invalid(format!(
                        "monthly payment cannot be negative, got {payment}"
                    )));
                }
            }
            PaymentPolicy::ManualVariableByMap(schedule) => {
                if schedule.onwards.is_none() {
                    return Err(ScheduleError::invalid(
                        "payment schedule is missing the onwards payment",
                    ));
                }
                if schedule.values().any(Money::is_negative) {
                    return Err(ScheduleError::invalid("monthly payments cannot be negative"));
                }
            }
            PaymentPolicy::Calculated => {}
        }
        Ok(())
    }

    /// term in years, required and positive for calculated payments
    pub fn calculated_term_years(&self) -> Result<u32> {
        match self.term_years {
            Some(years) if years > 0 => Ok(years),
            Some(_) => Err(ScheduleError::invalid("loan term must be at least one year")),
            None => Err(ScheduleError::invalid(
                "calculated payments need a loan term",
            )),
        }
    }

    /// same loan with the top-up strategy switched off
    pub fn without_top_up(&self) -> LoanConfig {
        LoanConfig {
            top_up: TopUpStrategy::None,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// builder for [`LoanConfig`]
#[derive(Debug, Clone, Default)]
pub struct LoanConfigBuilder {
    principal: Option<Money>,
    start: Option<(i32, u32)>,
    term_years: Option<u32>,
    rate_policy: Option<RatePolicy>,
    payment_policy: Option<PaymentPolicy>,
    yearly_add_on: Option<Money>,
    top_up: Option<TopUpStrategy>,
    accrual: Option<AccrualConvention>,
    step_up: Option<PaymentStepUp>,
}

impl LoanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// principal as house price less down payment
    pub fn property(mut self, house_price: Money, down_payment: Money) -> Self {
        self.principal = Some(house_price - down_payment);
        self
    }

    pub fn start(mut self, year: i32, month: u32) -> Self {
        self.start = Some((year, month));
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term_years = Some(years);
        self
    }

    pub fn fixed_rate(mut self, rate: Rate) -> Self {
        self.rate_policy = Some(RatePolicy::Fixed(rate));
        self
    }

    /// six rates for loan years 1..5 and 6+
    pub fn variable_rates(mut self, rates: Vec<Rate>) -> Self {
        self.rate_policy = Some(RatePolicy::VariableByLoanYear(rates));
        self
    }

    pub fn rate_schedule(mut self, schedule: YearlySchedule<Rate>) -> Self {
        self.rate_policy = Some(RatePolicy::VariableByMap(schedule));
        self
    }

    pub fn manual_payment(mut self, payment: Money) -> Self {
        self.payment_policy = Some(PaymentPolicy::ManualFixed(payment));
        self
    }

    pub fn manual_payment_schedule(mut self, schedule: YearlySchedule<Money>) -> Self {
        self.payment_policy = Some(PaymentPolicy::ManualVariableByMap(schedule));
        self
    }

    pub fn calculated_payment(mut self) -> Self {
        self.payment_policy = Some(PaymentPolicy::Calculated);
        self
    }

    pub fn yearly_add_on(mut self, amount: Money) -> Self {
        self.yearly_add_on = Some(amount);
        self
    }

    pub fn top_up(mut self, strategy: TopUpStrategy) -> Self {
        self.top_up = Some(strategy);
        self
    }

    pub fn accrual(mut self, convention: AccrualConvention) -> Self {
        self.accrual = Some(convention);
        self
    }

    pub fn step_up(mut self, cycle_years: u32, increase: Money) -> Self {
        self.step_up = Some(PaymentStepUp {
            cycle_years,
            increase,
        });
        self
    }

    pub fn build(self) -> Result<LoanConfig> {
        let principal = self
            .principal
            .ok_or_else(|| ScheduleError::invalid("principal is required"))?;
        let rate_policy = self
            .rate_policy
            .ok_or_else(|| ScheduleError::invalid("rate policy is required"))?;
        let payment_policy = self
            .payment_policy
            .ok_or_else(|| ScheduleError::invalid("payment policy is required"))?;
        let (start_year, start_month) = self.start.unwrap_or((DEFAULT_START_YEAR, DEFAULT_START_MONTH));

        // the mortgage-formula calculators accrue monthly, the manual ones by day count
        let accrual = self.accrual.unwrap_or(if payment_policy.is_calculated() {
            AccrualConvention::MonthlyRate
        } else {
            AccrualConvention::DailyProration
        });

        let config = LoanConfig {
            principal,
            start_year,
            start_month,
            term_years: self.term_years,
            rate_policy,
            payment_policy,
            yearly_add_on: self.yearly_add_on.unwrap_or(Money::ZERO),
            top_up: self.top_up.unwrap_or_default(),
            accrual,
            step_up: self.step_up,
        };

        config.validate()?;
        Ok(config)
    }
}

/// which rate mode a house preset opens with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    #[default]
    Fixed,
    Variable,
}

/// house / rate preset; rates are percentages as typed into the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousePreset {
    pub name: String,
    pub house_price: Money,
    pub fixed_rate: Decimal,
    pub variable_rates: Vec<Decimal>,
    pub loan_term_years: u32,
    #[serde(default)]
    pub rate_type_default: RateType,
}

impl HousePreset {
    /// builder seeded with this preset's loan, calculated payment and default rate mode
    pub fn builder(&self, down_payment: Money) -> LoanConfigBuilder {
        let builder = LoanConfigBuilder::new()
            .property(self.house_price, down_payment)
            .term_years(self.loan_term_years)
            .calculated_payment();

        match self.rate_type_default {
            RateType::Fixed => builder.fixed_rate(Rate::from_percentage(self.fixed_rate)),
            RateType::Variable => builder.variable_rates(
                self.variable_rates
                    .iter()
                    .copied()
                    .map(Rate::from_percentage)
                    .collect(),
            ),
        }
    }
}

/// payment strategy preset for the combined top-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStrategyPreset {
    pub name: String,
    #[serde(default)]
    pub minimum_payment: Money,
    #[serde(default)]
    pub additional_amount: Money,
}

impl PaymentStrategyPreset {
    pub fn top_up(&self) -> TopUpStrategy {
        if self.minimum_payment.is_zero() && self.additional_amount.is_zero() {
            return TopUpStrategy::None;
        }
        TopUpStrategy::Combined {
            minimum: self.minimum_payment,
            additional: self.additional_amount,
        }
    }
}

pub fn parse_house_presets(json: &str) -> Result<Vec<HousePreset>> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_payment_presets(json: &str) -> Result<Vec<PaymentStrategyPreset>> {
    Ok(serde_json::from_str(json)?)
}

pub fn house_presets_from_reader<R: Read>(reader: R) -> Result<Vec<HousePreset>> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn payment_presets_from_reader<R: Read>(reader: R) -> Result<Vec<PaymentStrategyPreset>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn base() -> LoanConfigBuilder {
        LoanConfigBuilder::new()
            .principal(Money::from_major(4_300_000))
            .fixed_rate(Rate::from_decimal(dec!(0.04)))
            .term_years(40)
            .calculated_payment()
    }

    #[test]
    fn test_builder_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.start_year, DEFAULT_START_YEAR);
        assert_eq!(config.start_month, DEFAULT_START_MONTH);
        assert_eq!(config.yearly_add_on, Money::ZERO);
        assert_eq!(config.top_up, TopUpStrategy::None);
        assert_eq!(config.accrual, AccrualConvention::MonthlyRate);
        assert_eq!(config.step_up, None);
    }

    #[test]
    fn test_manual_policy_defaults_to_daily_proration() {
        let config = LoanConfigBuilder::new()
            .principal(Money::from_major(4_000_000))
            .fixed_rate(Rate::from_decimal(dec!(0.04)))
            .manual_payment(Money::from_major(20_000))
            .build()
            .unwrap();

        assert_eq!(config.accrual, AccrualConvention::DailyProration);
        assert_eq!(config.term_years, None);
    }

    #[test]
    fn test_property_principal() {
        let config = base()
            .property(Money::from_major(4_300_000), Money::from_major(300_000))
            .build()
            .unwrap();
        assert_eq!(config.principal, Money::from_major(4_000_000));
    }

    #[rstest]
    #[case::zero_principal(base().principal(Money::ZERO))]
    #[case::down_payment_too_large(base().property(Money::from_major(100), Money::from_major(200)))]
    #[case::zero_term(base().term_years(0))]
    #[case::bad_start_month(base().start(2026, 13))]
    #[case::five_rates(base().variable_rates(vec![Rate::from_decimal(dec!(0.03)); 5]))]
    #[case::seven_rates(base().variable_rates(vec![Rate::from_decimal(dec!(0.03)); 7]))]
    #[case::negative_add_on(base().yearly_add_on(Money::from_major(-1)))]
    #[case::negative_top_up(base().top_up(TopUpStrategy::Additional(Money::from_major(-5))))]
    #[case::zero_step_cycle(base().step_up(0, Money::from_major(500)))]
    fn test_invalid_configuration(#[case] builder: LoanConfigBuilder) {
        let result = builder.build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_calculated_requires_term() {
        let result = LoanConfigBuilder::new()
            .principal(Money::from_major(1_000_000))
            .fixed_rate(Rate::from_decimal(dec!(0.04)))
            .calculated_payment()
            .build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_missing_onwards_rejected() {
        let mut rates = YearlySchedule::new(Rate::from_decimal(dec!(0.05)))
            .with_year(1, Rate::from_decimal(dec!(0.03)));
        rates.onwards = None;
        let result = base().rate_schedule(rates).build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));

        let mut payments = YearlySchedule::new(Money::from_major(20_000));
        payments.onwards = None;
        let result = base().manual_payment_schedule(payments).build();
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = base().fixed_rate(Rate::from_decimal(dec!(-0.01))).build();
        assert!(matches!(result, Err(ScheduleError::InvalidInterestRate { .. })));
    }

    #[test]
    fn test_without_top_up_keeps_everything_else() {
        let config = base()
            .yearly_add_on(Money::from_major(50_000))
            .top_up(TopUpStrategy::Additional(Money::from_major(5_000)))
            .build()
            .unwrap();
        let baseline = config.without_top_up();

        assert_eq!(baseline.top_up, TopUpStrategy::None);
        assert_eq!(baseline.yearly_add_on, config.yearly_add_on);
        assert_eq!(baseline.rate_policy, config.rate_policy);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = base()
            .rate_schedule(
                YearlySchedule::new(Rate::from_decimal(dec!(0.055)))
                    .with_year(1, Rate::from_decimal(dec!(0.025))),
            )
            .top_up(TopUpStrategy::Combined {
                minimum: Money::from_major(20_000),
                additional: Money::from_major(1_000),
            })
            .build()
            .unwrap();

        let json = config.to_json().unwrap();
        let parsed = LoanConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_house_presets() {
        let json = r#"[
            {
                "name": "Townhouse",
                "housePrice": 4300000,
                "fixedRate": 4.0,
                "variableRates": [2.3, 2.9, 3.5, 4.495, 4.495, 5.495],
                "loanTermYears": 40,
                "rateTypeDefault": "variable"
            },
            {
                "name": "Condo",
                "housePrice": 2500000,
                "fixedRate": 3.5,
                "variableRates": [2.0, 2.5, 3.0, 3.5, 4.0, 4.5],
                "loanTermYears": 30
            }
        ]"#;

        let presets = parse_house_presets(json).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].rate_type_default, RateType::Variable);
        assert_eq!(presets[1].rate_type_default, RateType::Fixed);

        let config = presets[0]
            .builder(Money::from_major(300_000))
            .build()
            .unwrap();
        assert_eq!(config.principal, Money::from_major(4_000_000));
        assert_eq!(config.term_years, Some(40));
        match &config.rate_policy {
            RatePolicy::VariableByLoanYear(rates) => {
                assert_eq!(rates[0], Rate::from_decimal(dec!(0.023)));
                assert_eq!(rates[5], Rate::from_decimal(dec!(0.05495)));
            }
            other => panic!("expected positional rates, got {other:?}"),
        }

        let condo = presets[1].builder(Money::ZERO).build().unwrap();
        assert_eq!(condo.rate_policy, RatePolicy::Fixed(Rate::from_decimal(dec!(0.035))));
    }

    #[test]
    fn test_parse_payment_presets() {
        let json = r#"[
            {"name": "Minimum 20k", "minimumPayment": 20000, "additionalAmount": 0},
            {"name": "Extra 5k", "additionalAmount": 5000},
            {"name": "Nothing extra", "minimumPayment": 0, "additionalAmount": 0}
        ]"#;

        let presets = payment_presets_from_reader(json.as_bytes()).unwrap();
        assert_eq!(
            presets[0].top_up(),
            TopUpStrategy::Combined {
                minimum: Money::from_major(20_000),
                additional: Money::ZERO,
            }
        );
        assert_eq!(presets[1].minimum_payment, Money::ZERO);
        assert_eq!(presets[2].top_up(), TopUpStrategy::None);
    }

    #[test]
    fn test_house_presets_from_reader() {
        let json = r#"[{"name": "Studio", "housePrice": 1500000, "fixedRate": 3.25,
            "variableRates": [2.0, 2.5, 3.0, 3.5, 4.0, 4.5], "loanTermYears": 25}]"#;

        let presets = house_presets_from_reader(json.as_bytes()).unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].house_price, Money::from_major(1_500_000));
        assert_eq!(presets[0].rate_type_default, RateType::Fixed);

        let config = presets[0].builder(Money::from_major(500_000)).build().unwrap();
        assert_eq!(config.principal, Money::from_major(1_000_000));
        assert_eq!(config.rate_policy, RatePolicy::Fixed(Rate::from_decimal(dec!(0.0325))));
    }

    #[test]
    fn test_malformed_presets() {
        let result = parse_payment_presets("{not json");
        assert!(matches!(result, Err(ScheduleError::Serialization { .. })));
    }
}
