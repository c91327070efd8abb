/// quick start - minimal example to get started
use mortgage_schedule_rs::{generate_schedule, LoanConfig, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 4.3M house, nothing down, 4% fixed over 40 years
    let config = LoanConfig::builder()
        .property(Money::from_major(4_300_000), Money::ZERO)
        .fixed_rate(Rate::from_percentage(dec!(4)))
        .term_years(40)
        .calculated_payment()
        .build()?;

    let schedule = generate_schedule(&config)?;
    let summary = schedule.summary();

    println!("monthly payment: {:?}", summary.first_payment.map(|p| p.round_dp(2)));
    println!("duration: {}", summary.duration);
    println!("total interest: {}", summary.total_interest.round_dp(2));
    println!("effective rate: {}%", summary.effective_rate.round_dp(1));

    Ok(())
}
