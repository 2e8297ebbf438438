//! Quadratic (Brier) scoring.
//!
//! Scores a predicted probability vector against the one-hot indicator of the
//! realized outcome: `score = Σ (p[i] - 1[i=j])²`. Lower is better; the value
//! lies in [0, 2] for a valid probability distribution. All arithmetic is
//! exact rational so downstream subtraction and averaging cancel bit-for-bit.

use num_rational::BigRational;
use num_traits::{One, Zero};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::exact;

/// Score one prediction vector against the realized outcome at
/// `outcome_index`.
///
/// # Errors
/// `DomainError::OutcomeIndexOutOfRange` when the index falls outside the
/// prediction vector (a vector misaligned with the category list fails
/// scenario validation before reaching here).
pub fn brier_score(
    predictions: &[Decimal],
    outcome_index: usize,
) -> Result<BigRational, DomainError> {
    if outcome_index >= predictions.len() {
        return Err(DomainError::OutcomeIndexOutOfRange {
            index: outcome_index,
            len: predictions.len(),
        });
    }

    let mut score = BigRational::zero();
    for (i, prediction) in predictions.iter().enumerate() {
        let actual = if i == outcome_index {
            BigRational::one()
        } else {
            BigRational::zero()
        };
        let error = exact::to_rational(*prediction) - actual;
        score += &error * &error;
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Signed;
    use rust_decimal_macros::dec;

    #[test]
    fn test_perfect_prediction_scores_zero() {
        let score = brier_score(&[dec!(1), dec!(0), dec!(0)], 0).unwrap();
        assert!(score.is_zero());
    }

    #[test]
    fn test_confident_wrong_prediction_scores_two() {
        // All mass on a non-realized outcome in a binary scenario
        let score = brier_score(&[dec!(1), dec!(0)], 1).unwrap();
        assert_eq!(exact::to_decimal(&score, 4).unwrap(), dec!(2.0000));
    }

    #[test]
    fn test_reference_vector() {
        // Worked example: [0.7, 0.3] with outcome 0 → (0.3)² + (0.3)² = 0.18
        let score = brier_score(&[dec!(0.7), dec!(0.3)], 0).unwrap();
        assert_eq!(exact::to_decimal(&score, 4).unwrap(), dec!(0.1800));

        // [0.4, 0.6] with outcome 0 → (0.6)² + (0.6)² = 0.72
        let score = brier_score(&[dec!(0.4), dec!(0.6)], 0).unwrap();
        assert_eq!(exact::to_decimal(&score, 4).unwrap(), dec!(0.7200));
    }

    #[test]
    fn test_uniform_prediction_three_way() {
        // [1/3-ish, ...] stays exact: 0.3333 lifts to 3333/10000, no drift
        let p = dec!(0.3333);
        let score = brier_score(&[p, p, p], 1).unwrap();
        let expected = exact::to_rational(p) * exact::to_rational(p)
            * BigRational::from_integer(2.into())
            + (BigRational::one() - exact::to_rational(p))
                * (BigRational::one() - exact::to_rational(p));
        assert_eq!(score, expected);
    }

    #[test]
    fn test_score_within_bounds_for_distributions() {
        let vectors: &[&[Decimal]] = &[
            &[dec!(0.5), dec!(0.5)],
            &[dec!(0.25), dec!(0.25), dec!(0.5)],
            &[dec!(0.9), dec!(0.05), dec!(0.05)],
        ];
        for predictions in vectors {
            for j in 0..predictions.len() {
                let score = brier_score(predictions, j).unwrap();
                assert!(!score.is_negative());
                assert!(score <= BigRational::from_integer(2.into()));
            }
        }
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let err = brier_score(&[dec!(0.5), dec!(0.5)], 2).unwrap_err();
        assert_eq!(
            err,
            DomainError::OutcomeIndexOutOfRange { index: 2, len: 2 }
        );
    }
}
