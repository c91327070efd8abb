use crate::decimal::Money;
use crate::types::TopUpStrategy;

/// extra amount paid on top of `policy_payment` under `strategy`
pub fn resolve_top_up(policy_payment: Money, strategy: &TopUpStrategy) -> Money {
    match *strategy {
        TopUpStrategy::None => Money::ZERO,
        TopUpStrategy::TargetMinimum(minimum) => (minimum - policy_payment).max(Money::ZERO),
        TopUpStrategy::Additional(amount) => amount,
        TopUpStrategy::Percentage(pct) => policy_payment.percentage(pct),
        TopUpStrategy::Combined {
            minimum,
            additional,
        } => policy_payment.max(minimum) + additional - policy_payment,
    }
}

/// policy payment plus its resolved top-up
pub fn effective_payment(policy_payment: Money, strategy: &TopUpStrategy) -> Money {
    policy_payment + resolve_top_up(policy_payment, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(TopUpStrategy::None, 15_000, 0)]
    #[case(TopUpStrategy::TargetMinimum(Money::from_major(20_000)), 15_000, 5_000)]
    #[case(TopUpStrategy::TargetMinimum(Money::from_major(20_000)), 25_000, 0)]
    #[case(TopUpStrategy::TargetMinimum(Money::from_major(20_000)), 20_000, 0)]
    #[case(TopUpStrategy::Additional(Money::from_major(5_000)), 15_000, 5_000)]
    #[case(TopUpStrategy::Percentage(dec!(10)), 15_000, 1_500)]
    #[case(TopUpStrategy::Combined { minimum: Money::from_major(20_000), additional: Money::from_major(3_000) }, 15_000, 8_000)]
    #[case(TopUpStrategy::Combined { minimum: Money::from_major(20_000), additional: Money::from_major(3_000) }, 25_000, 3_000)]
    #[case(TopUpStrategy::Combined { minimum: Money::ZERO, additional: Money::ZERO }, 25_000, 0)]
    fn test_resolve_top_up(
        #[case] strategy: TopUpStrategy,
        #[case] policy_payment: i64,
        #[case] expected: i64,
    ) {
        let extra = resolve_top_up(Money::from_major(policy_payment), &strategy);
        assert_eq!(extra, Money::from_major(expected));
    }

    #[test]
    fn test_combined_minimum_only_matches_target_minimum() {
        let combined = TopUpStrategy::Combined {
            minimum: Money::from_major(20_000),
            additional: Money::ZERO,
        };
        let target = TopUpStrategy::TargetMinimum(Money::from_major(20_000));

        for payment in [10_000, 19_999, 20_000, 30_000] {
            let payment = Money::from_major(payment);
            assert_eq!(
                resolve_top_up(payment, &combined),
                resolve_top_up(payment, &target)
            );
        }
    }

    #[test]
    fn test_effective_payment() {
        let strategy = TopUpStrategy::Percentage(dec!(25));
        assert_eq!(
            effective_payment(Money::from_major(16_000), &strategy),
            Money::from_major(20_000)
        );
    }
}
