//! Generation Use Case - Scenario Settlement Pipeline
//!
//! Drives the full pipeline for each scenario: validate, then for every
//! outcome category run scorer → payout calculator → reconciler → settlement
//! generator, and attach the results to the record. Scenarios and outcome
//! categories are fully independent; each (scenario, outcome) pair is settled
//! from isolated inputs.

use std::collections::BTreeMap;

use num_rational::BigRational;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::reconcile::Adjustment;
use crate::domain::{exact, payout, reconcile, scoring, settlement};
use crate::domain::{DomainError, OutcomeResult, Scenario};

/// Aggregated counts from processing a whole document.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    /// Scenarios processed.
    pub scenarios: usize,
    /// Outcome categories settled across all scenarios.
    pub outcomes: usize,
    /// Reconciliation adjustments that were needed.
    pub adjustments: usize,
}

/// Run the settlement pipeline over every scenario in a document.
///
/// # Errors
/// The first [`DomainError`] encountered; the document is left with whatever
/// scenarios were already filled in, but the caller only persists on success.
pub fn process_document(
    scenarios: &mut [Scenario],
    config: &EngineConfig,
) -> Result<GenerateReport, DomainError> {
    let mut report = GenerateReport {
        scenarios: scenarios.len(),
        ..GenerateReport::default()
    };

    for scenario in scenarios.iter_mut() {
        let summary = process_scenario(scenario, config)?;
        report.outcomes += summary.outcomes;
        report.adjustments += summary.adjustments;
    }

    info!(
        scenarios = report.scenarios,
        outcomes = report.outcomes,
        adjustments = report.adjustments,
        "Document processed"
    );
    Ok(report)
}

/// Per-scenario processing counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub outcomes: usize,
    pub adjustments: usize,
}

/// Settle one scenario: fill in `amount_in_play` and one [`OutcomeResult`]
/// per category.
///
/// # Errors
/// [`DomainError`] if the scenario fails validation or a computed value
/// cannot be represented.
pub fn process_scenario(
    scenario: &mut Scenario,
    config: &EngineConfig,
) -> Result<ScenarioSummary, DomainError> {
    scenario.validate()?;

    let stake = scenario.stake_in_play();
    let stake_exact = exact::to_rational(stake);

    info!(
        scenario = %scenario.description,
        players = scenario.players.len(),
        categories = scenario.categories.len(),
        amount_in_play = %stake,
        "Processing scenario"
    );

    let mut outcomes = BTreeMap::new();
    let mut summary = ScenarioSummary::default();

    for (index, category) in scenario.categories.iter().enumerate() {
        let (result, adjustment) = settle_outcome(scenario, index, &stake_exact, config)?;

        debug!(
            scenario = %scenario.description,
            outcome = %category,
            settlements = result.settlements.len(),
            "Outcome settled"
        );

        summary.outcomes += 1;
        if adjustment.is_some() {
            summary.adjustments += 1;
        }
        outcomes.insert(category.clone(), result);
    }

    scenario.amount_in_play = Some(stake);
    scenario.outcomes = Some(outcomes);
    Ok(summary)
}

/// Run the pipeline for a single realized outcome.
fn settle_outcome(
    scenario: &Scenario,
    outcome_index: usize,
    stake: &BigRational,
    config: &EngineConfig,
) -> Result<(OutcomeResult, Option<Adjustment>), DomainError> {
    let mut scores = BTreeMap::new();
    for (player, record) in &scenario.players {
        scores.insert(
            player.clone(),
            scoring::brier_score(&record.predictions, outcome_index)?,
        );
    }

    let averages = payout::average_of_others(&scores)?;
    let exact_payouts = payout::exact_payouts(&scores, &averages, stake)?;
    let reconciled = reconcile::reconcile(&exact_payouts)?;
    let settlements = settlement::generate(
        &reconciled.payouts,
        config.settlement.materiality_threshold,
    );

    let result = OutcomeResult {
        avg_brier_others: round_map(&averages)?,
        brier_scores: round_map(&scores)?,
        payouts: reconciled.payouts,
        settlements,
    };
    Ok((result, reconciled.adjustment))
}

/// Round an exact score map to storage precision (4 dp).
fn round_map(
    values: &BTreeMap<String, BigRational>,
) -> Result<BTreeMap<String, rust_decimal::Decimal>, DomainError> {
    values
        .iter()
        .map(|(player, value)| {
            Ok((player.clone(), exact::to_decimal(value, exact::SCORE_SCALE)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerRecord;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn scenario(players: &[(&str, Decimal, &[Decimal])], categories: &[&str]) -> Scenario {
        Scenario {
            amount_in_play: None,
            categories: categories.iter().map(ToString::to_string).collect(),
            description: "test".to_string(),
            outcomes: None,
            players: players
                .iter()
                .map(|(id, max_bet, predictions)| {
                    (
                        id.to_string(),
                        PlayerRecord {
                            max_bet: *max_bet,
                            predictions: predictions.to_vec(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let mut s = scenario(
            &[
                ("player1", dec!(100), &[dec!(0.7), dec!(0.3)]),
                ("player2", dec!(100), &[dec!(0.4), dec!(0.6)]),
            ],
            &["A", "B"],
        );
        let summary = process_scenario(&mut s, &EngineConfig::default()).unwrap();
        assert_eq!(summary.outcomes, 2);

        assert_eq!(s.amount_in_play, Some(dec!(100)));
        let outcomes = s.outcomes.as_ref().unwrap();
        let a = &outcomes["A"];
        assert_eq!(a.brier_scores["player1"], dec!(0.1800));
        assert_eq!(a.brier_scores["player2"], dec!(0.7200));
        assert_eq!(a.avg_brier_others["player1"], dec!(0.7200));
        assert_eq!(a.avg_brier_others["player2"], dec!(0.1800));
        assert_eq!(a.payouts["player1"], dec!(27.00));
        assert_eq!(a.payouts["player2"], dec!(-27.00));
        assert_eq!(a.settlements.len(), 1);
        assert_eq!(a.settlements[0].payer, "player2");
        assert_eq!(a.settlements[0].payee, "player1");
        assert_eq!(a.settlements[0].amount, dec!(27.00));
    }

    #[test]
    fn test_amount_in_play_is_minimum_stake() {
        let mut s = scenario(
            &[
                ("a", dec!(250), &[dec!(0.5), dec!(0.5)]),
                ("b", dec!(40), &[dec!(0.6), dec!(0.4)]),
                ("c", dec!(90), &[dec!(0.1), dec!(0.9)]),
            ],
            &["up", "down"],
        );
        process_scenario(&mut s, &EngineConfig::default()).unwrap();
        assert_eq!(s.amount_in_play, Some(dec!(40)));
    }

    #[test]
    fn test_identical_predictions_settle_to_nothing() {
        let predictions: &[Decimal] = &[dec!(0.2), dec!(0.5), dec!(0.3)];
        let mut s = scenario(
            &[
                ("a", dec!(100), predictions),
                ("b", dec!(100), predictions),
                ("c", dec!(100), predictions),
            ],
            &["x", "y", "z"],
        );
        process_scenario(&mut s, &EngineConfig::default()).unwrap();
        for outcome in s.outcomes.as_ref().unwrap().values() {
            assert!(outcome.payouts.values().all(Decimal::is_zero));
            assert!(outcome.settlements.is_empty());
        }
    }

    #[test]
    fn test_every_outcome_payout_sums_to_zero() {
        let mut s = scenario(
            &[
                ("a", dec!(33.33), &[dec!(0.17), dec!(0.43), dec!(0.4)]),
                ("b", dec!(75), &[dec!(0.6), dec!(0.25), dec!(0.15)]),
                ("c", dec!(50), &[dec!(0.34), dec!(0.33), dec!(0.33)]),
            ],
            &["red", "green", "blue"],
        );
        process_scenario(&mut s, &EngineConfig::default()).unwrap();
        for outcome in s.outcomes.as_ref().unwrap().values() {
            let total: Decimal = outcome.payouts.values().sum();
            assert!(total.is_zero(), "payouts must net to 0.00, got {total}");
        }
    }

    #[test]
    fn test_invalid_scenario_is_rejected() {
        let mut s = scenario(&[("only", dec!(100), &[dec!(1), dec!(0)])], &["A", "B"]);
        assert_eq!(
            process_scenario(&mut s, &EngineConfig::default()),
            Err(DomainError::TooFewPlayers { count: 1 })
        );
        assert!(s.outcomes.is_none());
    }
}
