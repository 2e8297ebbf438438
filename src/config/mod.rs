//! Configuration Module - Tolerances and Thresholds
//!
//! Every numeric knob of the engine is externalized here: the settlement
//! materiality threshold and the verifier's comparison tolerances. Defaults
//! match the reference settlement scheme; a TOML file can override any of
//! them. Nothing is hardcoded in the domain layer.

pub mod loader;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Top-level engine configuration.
///
/// Loaded from an optional TOML override file; all fields fall back to the
/// reference defaults and are validated before a run begins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Settlement generation parameters.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Verifier comparison tolerances.
    #[serde(default)]
    pub verify: VerifyTolerances,
}

/// Settlement generation parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Minimum transfer size; amounts at or below this are dropped as
    /// economically insignificant.
    #[serde(default = "default_materiality")]
    pub materiality_threshold: Decimal,
}

/// Verifier comparison tolerances.
///
/// Scores and averages are stored at 4 dp, so their tolerance is tight.
/// Payout tolerances are wider because verification recomputes from
/// already-rounded stored values, and wider still for the player whose
/// payout absorbed the reconciliation residual.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyTolerances {
    /// Per-player Brier score / average-of-others tolerance.
    #[serde(default = "default_score_tolerance")]
    pub score: Decimal,
    /// Per-player payout tolerance when the stored total is not near zero.
    #[serde(default = "default_payout_tolerance")]
    pub payout: Decimal,
    /// Per-player payout tolerance when the stored total already nets to
    /// zero (the residual-absorbing player needs the wider band).
    #[serde(default = "default_payout_adjusted_tolerance")]
    pub payout_adjusted: Decimal,
    /// Tolerance on the sum of stored payouts.
    #[serde(default = "default_stored_sum_tolerance")]
    pub stored_sum: Decimal,
    /// Tolerance on the sum of payouts recomputed from stored (rounded)
    /// scores.
    #[serde(default = "default_exact_sum_tolerance")]
    pub exact_sum: Decimal,
    /// Tolerance between settlement net balances and stored payouts.
    #[serde(default = "default_settlement_tolerance")]
    pub settlement_net: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: default_materiality(),
        }
    }
}

impl Default for VerifyTolerances {
    fn default() -> Self {
        Self {
            score: default_score_tolerance(),
            payout: default_payout_tolerance(),
            payout_adjusted: default_payout_adjusted_tolerance(),
            stored_sum: default_stored_sum_tolerance(),
            exact_sum: default_exact_sum_tolerance(),
            settlement_net: default_settlement_tolerance(),
        }
    }
}

// Default value functions for serde

fn default_materiality() -> Decimal {
    dec!(0.005)
}

fn default_score_tolerance() -> Decimal {
    dec!(0.0001)
}

fn default_payout_tolerance() -> Decimal {
    dec!(0.005)
}

fn default_payout_adjusted_tolerance() -> Decimal {
    dec!(0.02)
}

fn default_stored_sum_tolerance() -> Decimal {
    dec!(0.005)
}

fn default_exact_sum_tolerance() -> Decimal {
    dec!(0.02)
}

fn default_settlement_tolerance() -> Decimal {
    dec!(0.005)
}
