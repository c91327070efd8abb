/// compare scenarios - side-by-side totals for several loans
use mortgage_schedule_rs::{LoanConfig, Money, Rate, ScenarioSet, ScheduleCache};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== scenario comparison example ===\n");

    let house = Money::from_major(4_300_000);
    let mut scenarios = ScenarioSet::new();

    scenarios.add(
        "manual 20k + 50k yearly",
        LoanConfig::builder()
            .property(house, Money::ZERO)
            .fixed_rate(Rate::from_percentage(dec!(4)))
            .manual_payment(Money::from_major(20_000))
            .yearly_add_on(Money::from_major(50_000))
            .build()?,
    );
    scenarios.add(
        "standard 30 years",
        LoanConfig::builder()
            .property(house, Money::ZERO)
            .fixed_rate(Rate::from_percentage(dec!(4)))
            .term_years(30)
            .calculated_payment()
            .build()?,
    );
    scenarios.add(
        "standard 40 years, 500k down",
        LoanConfig::builder()
            .property(house, Money::from_major(500_000))
            .fixed_rate(Rate::from_percentage(dec!(4)))
            .term_years(40)
            .calculated_payment()
            .build()?,
    );

    let mut cache = ScheduleCache::new();
    for report in scenarios.evaluate_with(&mut cache) {
        match &report.summary {
            Ok(summary) => println!(
                "{:<30} payment {:>12} duration {:<20} interest {:>14}",
                report.name,
                report.monthly_payment.unwrap_or(Money::ZERO).round_dp(0),
                summary.duration.to_string(),
                summary.total_interest.round_dp(0)
            ),
            Err(e) => println!("{:<30} failed: {}", report.name, e),
        }
    }

    if let Some(best) = scenarios.lowest_total_interest() {
        println!("\nlowest total interest: {}", best.name);
    }

    Ok(())
}
