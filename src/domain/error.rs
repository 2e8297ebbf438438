//! Domain error taxonomy.
//!
//! Every failure in the calculation ring is deterministic: the same input
//! always produces the same error, so nothing here is retryable. Shape
//! problems are caught during scenario validation, before any arithmetic runs.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the pure calculation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A scenario needs at least two players for average-of-others to exist.
    #[error("at least 2 players are required, found {count}")]
    TooFewPlayers { count: usize },

    /// A scenario needs at least two outcome categories.
    #[error("at least 2 categories are required, found {count}")]
    TooFewCategories { count: usize },

    /// Category names must be distinct.
    #[error("duplicate category '{category}'")]
    DuplicateCategory { category: String },

    /// A prediction vector is not aligned with the category list.
    #[error("player '{player}' has {actual} predictions, expected {expected}")]
    PredictionLengthMismatch {
        player: String,
        expected: usize,
        actual: usize,
    },

    /// Predicted probabilities must be non-negative.
    #[error("player '{player}' has a negative prediction at index {index}")]
    NegativePrediction { player: String, index: usize },

    /// Stake caps must be strictly positive.
    #[error("player '{player}' max_bet must be positive, got {max_bet}")]
    NonPositiveMaxBet { player: String, max_bet: Decimal },

    /// Realized-outcome index fell outside the prediction vector.
    #[error("outcome index {index} out of range for {len} predictions")]
    OutcomeIndexOutOfRange { index: usize, len: usize },

    /// A computed value cannot be narrowed back into a `Decimal`.
    #[error("computed value exceeds the representable currency range")]
    ValueOutOfRange,

    /// Exact pre-rounding payouts failed to cancel. This identity is
    /// guaranteed by construction, so seeing it means a code defect,
    /// never bad input data.
    #[error("exact payouts do not sum to zero")]
    ZeroSumViolation,
}
