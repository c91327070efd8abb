/// variable rates - six loan-year rates with the payment recomputed every year
use mortgage_schedule_rs::{parse_house_presets, Money, ScheduleEngine, ScheduleEvent};

const PRESETS: &str = r#"[
    {
        "name": "Townhouse",
        "housePrice": 4300000,
        "fixedRate": 4.0,
        "variableRates": [2.3, 2.9, 3.5, 4.495, 4.495, 5.495],
        "loanTermYears": 40,
        "rateTypeDefault": "variable"
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== variable rate example ===\n");

    let presets = parse_house_presets(PRESETS)?;
    let preset = &presets[0];
    let config = preset.builder(Money::from_major(300_000)).build()?;

    let schedule = ScheduleEngine::new(&config)?.run()?.into_paid_off()?;

    for event in &schedule.events {
        if let ScheduleEvent::LoanYearStarted {
            loan_year,
            rate,
            payment,
            ..
        } = event
        {
            if *loan_year <= 8 {
                println!("year {:>2}: rate {} payment {}", loan_year, rate, payment.round_dp(2));
            }
        }
    }

    println!("\n{} paid off after {} months", preset.name, schedule.len());
    for band in schedule.summary().payment_bands {
        println!(
            "{}: average {:?}",
            band.label(),
            band.average_total_payment
        );
    }

    Ok(())
}
