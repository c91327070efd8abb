use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LoanConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::schedule::{
    generate_schedule, Schedule, ScheduleCache, ScheduleEngine, ScheduleOutcome, ScheduleSummary,
};
use crate::types::ScenarioId;

/// what an accelerated schedule saves over its baseline
///
/// The savings are only defined when both schedules pay the loan off; when the
/// baseline stalls at its cap they are `None` and `baseline_paid_off` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsComparison {
    pub baseline_periods: u32,
    pub accelerated_periods: u32,
    pub baseline_paid_off: bool,
    pub accelerated_paid_off: bool,
    /// negative when the accelerated schedule is longer
    pub months_saved: Option<i64>,
    pub interest_saved: Option<Money>,
    pub total_paid_saved: Option<Money>,
}

impl SavingsComparison {
    pub fn between(baseline: &Schedule, accelerated: &Schedule) -> Self {
        let baseline_periods = baseline.len() as u32;
        let accelerated_periods = accelerated.len() as u32;
        let baseline_paid_off = baseline.is_paid_off();
        let accelerated_paid_off = accelerated.is_paid_off();
        let comparable = baseline_paid_off && accelerated_paid_off;

        Self {
            baseline_periods,
            accelerated_periods,
            baseline_paid_off,
            accelerated_paid_off,
            months_saved: comparable
                .then(|| i64::from(baseline_periods) - i64::from(accelerated_periods)),
            interest_saved: comparable
                .then(|| baseline.total_interest() - accelerated.total_interest()),
            total_paid_saved: comparable.then(|| baseline.total_paid() - accelerated.total_paid()),
        }
    }
}

/// a config run with and without its top-up strategy
///
/// The baseline keeps its [`ScheduleOutcome`] even when it never pays off, so a
/// top-up that rescues an under-sized payment still yields an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpAnalysis {
    pub baseline: Schedule,
    pub accelerated: Schedule,
    pub savings: SavingsComparison,
}

impl TopUpAnalysis {
    pub fn run(config: &LoanConfig) -> Result<Self> {
        let baseline_config = config.without_top_up();
        let baseline = ScheduleEngine::new(&baseline_config)?.run()?;
        let accelerated = generate_schedule(config)?;
        let savings = SavingsComparison::between(&baseline, &accelerated);

        match baseline.outcome {
            ScheduleOutcome::PaidOff => debug!(
                "top-up saves {:?} months and {:?} interest",
                savings.months_saved, savings.interest_saved
            ),
            outcome => debug!(
                "baseline never pays off ({:?}); top-up clears the loan in {} months",
                outcome, savings.accelerated_periods
            ),
        }

        Ok(Self {
            baseline,
            accelerated,
            savings,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub config: LoanConfig,
}

/// one row of a side-by-side comparison
#[derive(Debug)]
pub struct ScenarioReport {
    pub id: ScenarioId,
    pub name: String,
    pub principal: Money,
    /// calculated payment, or the first base payment of a manual schedule
    pub monthly_payment: Option<Money>,
    pub summary: Result<ScheduleSummary>,
}

impl ScenarioReport {
    fn new(scenario: &Scenario, summary: Result<ScheduleSummary>) -> Self {
        let monthly_payment = summary.as_ref().ok().and_then(|s| s.first_payment);

        Self {
            id: scenario.id,
            name: scenario.name.clone(),
            principal: scenario.config.principal,
            monthly_payment,
            summary,
        }
    }

    pub fn total_interest(&self) -> Option<Money> {
        self.summary.as_ref().ok().map(|s| s.total_interest)
    }
}

/// caller-held list of named loans to compare
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, config: LoanConfig) -> ScenarioId {
        let id = Uuid::new_v4();
        self.scenarios.push(Scenario {
            id,
            name: name.into(),
            config,
        });
        id
    }

    pub fn remove(&mut self, id: ScenarioId) -> Option<Scenario> {
        let position = self.scenarios.iter().position(|s| s.id == id)?;
        Some(self.scenarios.remove(position))
    }

    pub fn get(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn clear(&mut self) {
        self.scenarios.clear();
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// run every scenario in insertion order; a failing scenario does not stop the rest
    pub fn evaluate(&self) -> Vec<ScenarioReport> {
        self.scenarios
            .iter()
            .map(|scenario| {
                let summary = generate_schedule(&scenario.config).map(|s| s.summary());
                ScenarioReport::new(scenario, summary)
            })
            .collect()
    }

    /// same as [`evaluate`](Self::evaluate), reusing schedules already in `cache`
    pub fn evaluate_with(&self, cache: &mut ScheduleCache) -> Vec<ScenarioReport> {
        self.scenarios
            .iter()
            .map(|scenario| {
                let summary = cache.get_or_generate(&scenario.config).map(Schedule::summary);
                ScenarioReport::new(scenario, summary)
            })
            .collect()
    }

    /// the successful scenario paying the least interest
    pub fn lowest_total_interest(&self) -> Option<ScenarioReport> {
        self.evaluate()
            .into_iter()
            .filter(|report| report.summary.is_ok())
            .min_by_key(|report| report.total_interest())
    }
}
