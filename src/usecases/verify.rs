//! Verification Use Case - Independent Recomputation
//!
//! Re-derives every stored value of a processed document and compares within
//! tolerances: Brier scores from raw predictions, averages and payouts from
//! the stored (rounded) scores, and per-player net balances from the stored
//! settlement list. Verification of a scenario stops at the first failing
//! check (fail-fast); the document-level driver still continues to the next
//! scenario so a batch reports one failure per broken scenario.
//!
//! Payout tolerances are deliberately wider than score tolerances: the
//! recomputation here starts from already-rounded stored values, and one
//! player's payout legitimately differs by the reconciliation residual.

use std::collections::BTreeMap;

use num_rational::BigRational;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{EngineConfig, VerifyTolerances};
use crate::domain::{exact, payout, scoring, settlement};
use crate::domain::{DomainError, OutcomeResult, Scenario};

/// A verification failure, carrying enough context to locate the defect.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The record has no `outcomes`/`amount_in_play`; it was never generated.
    #[error("scenario '{scenario}': record has no outcomes to verify")]
    NotGenerated { scenario: String },

    /// A category listed in the scenario has no stored outcome result.
    #[error("scenario '{scenario}': no stored result for outcome '{outcome}'")]
    MissingOutcome { scenario: String, outcome: String },

    /// A player is missing from one of the stored result maps.
    #[error("scenario '{scenario}', outcome '{outcome}': player '{player}' missing from {field}")]
    MissingPlayer {
        scenario: String,
        outcome: String,
        player: String,
        field: &'static str,
    },

    /// Stored `amount_in_play` disagrees with the minimum stake cap.
    #[error("scenario '{scenario}': amount_in_play is {stored}, expected minimum max_bet {computed}")]
    AmountInPlay {
        scenario: String,
        stored: Decimal,
        computed: Decimal,
    },

    /// A recomputed per-player value disagrees with the stored one.
    #[error(
        "scenario '{scenario}', outcome '{outcome}', player '{player}', {field}: \
         stored {stored}, recomputed {computed}"
    )]
    Mismatch {
        scenario: String,
        outcome: String,
        player: String,
        field: &'static str,
        stored: Decimal,
        computed: Decimal,
    },

    /// A whole-outcome total fell outside its tolerance band.
    #[error(
        "scenario '{scenario}', outcome '{outcome}', {field}: \
         total {total} exceeds tolerance {tolerance}"
    )]
    SumCheck {
        scenario: String,
        outcome: String,
        field: &'static str,
        total: Decimal,
        tolerance: Decimal,
    },

    /// The scenario itself is structurally invalid.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Outcome of verifying a whole document.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Scenarios that passed every check.
    pub passed: usize,
    /// First failure per broken scenario.
    pub failures: Vec<VerifyError>,
}

impl VerifyReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Verify every scenario in a document.
///
/// Each scenario is verified fail-fast, but a failure does not stop the
/// batch; the report collects the first failure of every broken scenario.
#[must_use]
pub fn verify_document(scenarios: &[Scenario], config: &EngineConfig) -> VerifyReport {
    let mut report = VerifyReport::default();

    for scenario in scenarios {
        match verify_scenario(scenario, config) {
            Ok(()) => {
                info!(scenario = %scenario.description, "Scenario verified");
                report.passed += 1;
            }
            Err(e) => {
                error!(scenario = %scenario.description, error = %e, "Verification failed");
                report.failures.push(e);
            }
        }
    }

    info!(
        passed = report.passed,
        failed = report.failures.len(),
        "Verification complete"
    );
    report
}

/// Verify a single processed scenario, stopping at the first failed check.
///
/// # Errors
/// The first [`VerifyError`] encountered.
pub fn verify_scenario(scenario: &Scenario, config: &EngineConfig) -> Result<(), VerifyError> {
    scenario.validate().map_err(VerifyError::from)?;

    let not_generated = || VerifyError::NotGenerated {
        scenario: scenario.description.clone(),
    };
    let stored_amount = scenario.amount_in_play.ok_or_else(not_generated)?;
    let outcomes = scenario.outcomes.as_ref().ok_or_else(not_generated)?;

    let computed_amount = scenario.stake_in_play();
    if stored_amount != computed_amount {
        return Err(VerifyError::AmountInPlay {
            scenario: scenario.description.clone(),
            stored: stored_amount,
            computed: computed_amount,
        });
    }
    debug!(scenario = %scenario.description, amount_in_play = %stored_amount, "Amount in play verified");

    let amount_exact = exact::to_rational(stored_amount);
    for (index, category) in scenario.categories.iter().enumerate() {
        let outcome = outcomes.get(category).ok_or_else(|| VerifyError::MissingOutcome {
            scenario: scenario.description.clone(),
            outcome: category.clone(),
        })?;
        verify_outcome(scenario, category, index, outcome, &amount_exact, &config.verify)?;
    }

    Ok(())
}

/// Check every stored value for one realized outcome.
fn verify_outcome(
    scenario: &Scenario,
    category: &str,
    outcome_index: usize,
    outcome: &OutcomeResult,
    amount_in_play: &BigRational,
    tolerances: &VerifyTolerances,
) -> Result<(), VerifyError> {
    let missing = |player: &str, field: &'static str| VerifyError::MissingPlayer {
        scenario: scenario.description.clone(),
        outcome: category.to_string(),
        player: player.to_string(),
        field,
    };
    let mismatch = |player: &str, field: &'static str, stored: Decimal, computed: Decimal| {
        VerifyError::Mismatch {
            scenario: scenario.description.clone(),
            outcome: category.to_string(),
            player: player.to_string(),
            field,
            stored,
            computed,
        }
    };

    // 1. Brier scores, recomputed from raw predictions
    for (player, record) in &scenario.players {
        let stored = *outcome
            .brier_scores
            .get(player)
            .ok_or_else(|| missing(player, "brier_scores"))?;
        let computed = exact::to_decimal(
            &scoring::brier_score(&record.predictions, outcome_index)?,
            exact::SCORE_SCALE,
        )?;
        if (computed - stored).abs() >= tolerances.score {
            return Err(mismatch(player, "brier_score", stored, computed));
        }
        debug!(outcome = %category, player = %player, brier = %computed, "Brier score verified");
    }

    // 2. Averages of others, recomputed from the stored (rounded) scores
    let stored_scores: BTreeMap<String, BigRational> = scenario
        .players
        .keys()
        .map(|player| {
            let score = outcome
                .brier_scores
                .get(player)
                .copied()
                .ok_or_else(|| missing(player, "brier_scores"))?;
            Ok((player.clone(), exact::to_rational(score)))
        })
        .collect::<Result<_, VerifyError>>()?;

    let averages = payout::average_of_others(&stored_scores)?;
    for (player, average) in &averages {
        let stored = *outcome
            .avg_brier_others
            .get(player)
            .ok_or_else(|| missing(player, "avg_brier_others"))?;
        let computed = exact::to_decimal(average, exact::SCORE_SCALE)?;
        if (computed - stored).abs() >= tolerances.score {
            return Err(mismatch(player, "avg_brier_others", stored, computed));
        }
        debug!(outcome = %category, player = %player, avg_others = %computed, "Average of others verified");
    }

    // 3. Payouts, recomputed from the stored scores and averages. The
    // per-player band widens when the stored total already nets to zero,
    // because one stored payout then carries the reconciliation residual.
    let stored_total: Decimal = outcome.payouts.values().sum();
    let payout_tolerance = if stored_total.abs() < tolerances.stored_sum {
        tolerances.payout_adjusted
    } else {
        tolerances.payout
    };

    let mut exact_total = exact::zero();
    for player in scenario.players.keys() {
        let avg = &averages[player];
        let score = &stored_scores[player];
        let recomputed = payout::payout(amount_in_play, avg, score);

        let stored = *outcome
            .payouts
            .get(player)
            .ok_or_else(|| missing(player, "payouts"))?;
        let computed = exact::to_decimal(&recomputed, exact::CURRENCY_SCALE)?;
        exact_total += recomputed;

        if (computed - stored).abs() >= payout_tolerance {
            return Err(mismatch(player, "payout", stored, computed));
        }
        debug!(outcome = %category, player = %player, payout = %stored, "Payout verified");
    }

    // 4. Recomputed payouts must net close to zero (inputs were rounded, so
    // the band is wider than the generator's exact invariant)
    let exact_total = exact::to_decimal(&exact_total, exact::SCORE_SCALE)?;
    if exact_total.abs() >= tolerances.exact_sum {
        return Err(VerifyError::SumCheck {
            scenario: scenario.description.clone(),
            outcome: category.to_string(),
            field: "recomputed payout total",
            total: exact_total,
            tolerance: tolerances.exact_sum,
        });
    }

    // 5. Stored payouts must net to zero within half a cent
    if stored_total.abs() >= tolerances.stored_sum {
        return Err(VerifyError::SumCheck {
            scenario: scenario.description.clone(),
            outcome: category.to_string(),
            field: "stored payout total",
            total: stored_total,
            tolerance: tolerances.stored_sum,
        });
    }

    // 6. Settlements must realize the payouts
    let net = settlement::net_balances(&outcome.settlements);
    for (player, stored_payout) in &outcome.payouts {
        let balance = net.get(player).copied().unwrap_or_default();
        if (balance - stored_payout).abs() >= tolerances.settlement_net {
            return Err(mismatch(player, "settlement net", *stored_payout, balance));
        }
    }

    let net_total: Decimal = net.values().sum();
    if net_total.abs() >= tolerances.settlement_net {
        return Err(VerifyError::SumCheck {
            scenario: scenario.description.clone(),
            outcome: category.to_string(),
            field: "settlement net total",
            total: net_total,
            tolerance: tolerances.settlement_net,
        });
    }

    debug!(scenario = %scenario.description, outcome = %category, "Outcome verified");
    Ok(())
}
