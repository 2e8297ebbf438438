//! Core settlement domain types.
//!
//! Defines the value objects that flow through the pipeline: scenarios and
//! player records on the way in, outcome results and settlements on the way
//! out. Inputs are read-only for a run; results are built fresh per
//! (scenario, outcome) pair and never mutated afterwards.
//!
//! Struct fields are declared in sorted key order and keyed maps are
//! `BTreeMap`, so serialized documents are byte-stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// One player's entry in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The most this player is willing to risk.
    pub max_bet: Decimal,
    /// Predicted probabilities, positionally aligned with the scenario's
    /// categories. Expected (not enforced) to sum to 1.
    pub predictions: Vec<Decimal>,
}

/// A single prediction scenario: the claim, its possible outcomes, and the
/// players wagering on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Common stake for every settlement: the minimum `max_bet` across
    /// players. Derived; present only on processed records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_play: Option<Decimal>,
    /// Ordered, distinct outcome names. At least 2.
    pub categories: Vec<String>,
    /// Human-readable claim text.
    pub description: String,
    /// One result per category, keyed by category name. Present only on
    /// processed records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<BTreeMap<String, OutcomeResult>>,
    /// Player id → record. At least 2 entries.
    pub players: BTreeMap<String, PlayerRecord>,
}

/// Settlement results for one realized outcome category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeResult {
    /// Player → mean of all other players' Brier scores, rounded to 4 dp.
    pub avg_brier_others: BTreeMap<String, Decimal>,
    /// Player → quadratic (Brier) score, rounded to 4 dp.
    pub brier_scores: BTreeMap<String, Decimal>,
    /// Player → signed currency payout, rounded to 2 dp. Sums to exactly 0.00.
    pub payouts: BTreeMap<String, Decimal>,
    /// Pairwise transfers realizing the payouts.
    pub settlements: Vec<Settlement>,
}

/// A concrete transfer instruction: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Positive currency amount, rounded to 2 dp.
    pub amount: Decimal,
    /// Player who pays.
    #[serde(rename = "from")]
    pub payer: String,
    /// Player who receives.
    #[serde(rename = "to")]
    pub payee: String,
}

impl Scenario {
    /// Check the structural invariants the pipeline relies on.
    ///
    /// Prediction vectors must align with the category list, categories must
    /// be distinct, and there must be enough players for average-of-others
    /// to exist. Probability normalization is deliberately not enforced;
    /// unnormalized vectors flow through the scoring math unchanged.
    ///
    /// # Errors
    /// The first violated invariant, as a [`DomainError`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.categories.len() < 2 {
            return Err(DomainError::TooFewCategories {
                count: self.categories.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for category in &self.categories {
            if !seen.insert(category.as_str()) {
                return Err(DomainError::DuplicateCategory {
                    category: category.clone(),
                });
            }
        }

        if self.players.len() < 2 {
            return Err(DomainError::TooFewPlayers {
                count: self.players.len(),
            });
        }

        for (id, record) in &self.players {
            if record.max_bet <= Decimal::ZERO {
                return Err(DomainError::NonPositiveMaxBet {
                    player: id.clone(),
                    max_bet: record.max_bet,
                });
            }
            if record.predictions.len() != self.categories.len() {
                return Err(DomainError::PredictionLengthMismatch {
                    player: id.clone(),
                    expected: self.categories.len(),
                    actual: record.predictions.len(),
                });
            }
            if let Some(index) = record.predictions.iter().position(|p| p.is_sign_negative() && !p.is_zero()) {
                return Err(DomainError::NegativePrediction {
                    player: id.clone(),
                    index,
                });
            }
        }

        Ok(())
    }

    /// The common stake scale: the smallest `max_bet` among players.
    ///
    /// Recomputed from the player records on every call; the stored
    /// `amount_in_play` field is output-only and never trusted as input.
    #[must_use]
    pub fn stake_in_play(&self) -> Decimal {
        self.players
            .values()
            .map(|p| p.max_bet)
            .min()
            .unwrap_or(Decimal::ZERO)
    }
}
