//! Zero-sum payout calculation.
//!
//! For a fixed outcome, each player's payout is
//! `amount_in_play × (avg_others − own_score) / 2`, where `avg_others` is the
//! exact mean of every other player's score. Each score is excluded from
//! exactly one player's average and included in every other's, so
//! `Σ avg_others = Σ score` and the payouts cancel to exactly zero before
//! rounding. That identity is the correctness anchor of the whole scheme and
//! is re-checked after every computation.

use std::collections::BTreeMap;

use num_rational::BigRational;
use num_traits::Zero;

use super::error::DomainError;

/// Exact mean of all *other* players' scores, per player.
///
/// # Errors
/// `DomainError::TooFewPlayers` when fewer than two scores are present.
pub fn average_of_others(
    scores: &BTreeMap<String, BigRational>,
) -> Result<BTreeMap<String, BigRational>, DomainError> {
    if scores.len() < 2 {
        return Err(DomainError::TooFewPlayers {
            count: scores.len(),
        });
    }

    let total: BigRational = scores.values().sum();
    let others = BigRational::from_integer((scores.len() as u64 - 1).into());

    Ok(scores
        .iter()
        .map(|(player, score)| {
            let avg = (&total - score) / &others;
            (player.clone(), avg)
        })
        .collect())
}

/// Payout formula for one player.
#[must_use]
pub fn payout(
    amount_in_play: &BigRational,
    avg_others: &BigRational,
    own_score: &BigRational,
) -> BigRational {
    amount_in_play * (avg_others - own_score) / BigRational::from_integer(2.into())
}

/// Exact payouts for every player at a fixed outcome.
///
/// `averages` must be the output of [`average_of_others`] over the same
/// score map.
///
/// # Errors
/// `DomainError::ZeroSumViolation` if the payouts fail to cancel exactly.
/// Guaranteed not to fire when `averages` matches `scores`; the check guards
/// the identity against regressions.
pub fn exact_payouts(
    scores: &BTreeMap<String, BigRational>,
    averages: &BTreeMap<String, BigRational>,
    amount_in_play: &BigRational,
) -> Result<BTreeMap<String, BigRational>, DomainError> {
    let payouts: BTreeMap<String, BigRational> = scores
        .iter()
        .map(|(player, score)| {
            let avg = &averages[player];
            (player.clone(), payout(amount_in_play, avg, score))
        })
        .collect();

    let total: BigRational = payouts.values().sum();
    if !total.is_zero() {
        return Err(DomainError::ZeroSumViolation);
    }

    Ok(payouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{exact, scoring};
    use num_bigint::BigInt;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn score_map(entries: &[(&str, &[Decimal], usize)]) -> BTreeMap<String, BigRational> {
        entries
            .iter()
            .map(|(id, predictions, j)| {
                (id.to_string(), scoring::brier_score(predictions, *j).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_two_player_reference_payouts() {
        let scores = score_map(&[
            ("player1", &[dec!(0.7), dec!(0.3)], 0),
            ("player2", &[dec!(0.4), dec!(0.6)], 0),
        ]);
        let averages = average_of_others(&scores).unwrap();
        assert_eq!(averages["player1"], ratio(72, 100));
        assert_eq!(averages["player2"], ratio(18, 100));

        let amount = BigRational::from_integer(100.into());
        let payouts = exact_payouts(&scores, &averages, &amount).unwrap();
        assert_eq!(payouts["player1"], ratio(27, 1));
        assert_eq!(payouts["player2"], ratio(-27, 1));
    }

    #[test]
    fn test_two_players_are_antisymmetric() {
        let scores = score_map(&[
            ("a", &[dec!(0.55), dec!(0.45)], 1),
            ("b", &[dec!(0.2), dec!(0.8)], 1),
        ]);
        let averages = average_of_others(&scores).unwrap();
        let amount = exact::to_rational(dec!(33.33));
        let payouts = exact_payouts(&scores, &averages, &amount).unwrap();
        assert_eq!(payouts["a"], -payouts["b"].clone());
    }

    #[test]
    fn test_exact_payouts_sum_to_zero() {
        let scores = score_map(&[
            ("a", &[dec!(0.5), dec!(0.3), dec!(0.2)], 0),
            ("b", &[dec!(0.1), dec!(0.8), dec!(0.1)], 0),
            ("c", &[dec!(0.33), dec!(0.33), dec!(0.34)], 0),
        ]);
        let averages = average_of_others(&scores).unwrap();
        let amount = exact::to_rational(dec!(75.50));
        let payouts = exact_payouts(&scores, &averages, &amount).unwrap();
        let total: BigRational = payouts.values().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_identical_predictions_pay_nothing() {
        let predictions: &[Decimal] = &[dec!(0.6), dec!(0.4)];
        let scores = score_map(&[
            ("a", predictions, 0),
            ("b", predictions, 0),
            ("c", predictions, 0),
        ]);
        let averages = average_of_others(&scores).unwrap();
        let amount = BigRational::from_integer(100.into());
        let payouts = exact_payouts(&scores, &averages, &amount).unwrap();
        for p in payouts.values() {
            assert!(p.is_zero());
        }
    }

    #[test]
    fn test_single_player_rejected() {
        let scores = score_map(&[("only", &[dec!(1), dec!(0)], 0)]);
        assert_eq!(
            average_of_others(&scores),
            Err(DomainError::TooFewPlayers { count: 1 })
        );
    }
}
