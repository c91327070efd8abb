/// top-up savings - compare a minimum-payment strategy against the plain loan
use mortgage_schedule_rs::{
    parse_payment_presets, LoanConfig, Money, Rate, TopUpAnalysis,
};
use rust_decimal_macros::dec;

const STRATEGIES: &str = r#"[
    {"name": "Pay at least 25k", "minimumPayment": 25000, "additionalAmount": 0},
    {"name": "Extra 5k", "additionalAmount": 5000},
    {"name": "25k plus 2k", "minimumPayment": 25000, "additionalAmount": 2000}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== top-up savings example ===\n");

    let base = LoanConfig::builder()
        .principal(Money::from_major(4_300_000))
        .fixed_rate(Rate::from_percentage(dec!(4)))
        .term_years(40)
        .calculated_payment()
        .yearly_add_on(Money::from_major(50_000));

    for strategy in parse_payment_presets(STRATEGIES)? {
        let config = base.clone().top_up(strategy.top_up()).build()?;
        let analysis = TopUpAnalysis::run(&config)?;
        let savings = analysis.savings;

        println!("{}", strategy.name);
        if savings.baseline_paid_off {
            println!("  baseline: {} months", savings.baseline_periods);
        } else {
            println!("  baseline: never paid off");
        }
        println!("  with top-up: {} months", savings.accelerated_periods);
        if let Some(interest) = savings.interest_saved {
            println!("  interest saved: {}", interest.round_dp(2));
        }
    }

    Ok(())
}
