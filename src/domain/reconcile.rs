//! Currency rounding and zero-sum reconciliation.
//!
//! Exact payouts are rounded independently to 2 dp for storage, which can
//! leave a residual of a few cents. The residual is assigned in full to the
//! player with the largest absolute rounded payout (lexicographically smallest
//! id on ties), restoring an exact 0.00 total. The adjustment is an audited
//! side effect, not an error.

use std::collections::BTreeMap;

use num_rational::BigRational;
use rust_decimal::Decimal;
use tracing::info;

use super::error::DomainError;
use super::exact;

/// A residual cent-level correction applied during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    /// Player whose payout absorbed the residual.
    pub player: String,
    /// Signed residual added to that player's rounded payout.
    pub amount: Decimal,
}

/// Rounded payouts with an exact 0.00 total, plus the correction applied to
/// get there (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub payouts: BTreeMap<String, Decimal>,
    pub adjustment: Option<Adjustment>,
}

/// Round exact payouts to currency units and force the total back to zero.
///
/// # Errors
/// `DomainError::ValueOutOfRange` if a payout cannot be narrowed to
/// `Decimal`. The post-condition (rounded payouts sum to exactly 0.00) is
/// unconditional on success.
pub fn reconcile(
    exact_payouts: &BTreeMap<String, BigRational>,
) -> Result<Reconciled, DomainError> {
    let mut payouts = BTreeMap::new();
    for (player, value) in exact_payouts {
        payouts.insert(
            player.clone(),
            exact::to_decimal(value, exact::CURRENCY_SCALE)?,
        );
    }

    let residual = -payouts.values().sum::<Decimal>();
    if residual.is_zero() {
        return Ok(Reconciled {
            payouts,
            adjustment: None,
        });
    }

    // Largest absolute payout absorbs the residual; BTreeMap iteration order
    // makes the strictly-greater comparison break ties toward the
    // lexicographically smallest id.
    let target = payouts
        .iter()
        .max_by(|(a_id, a), (b_id, b)| {
            a.abs().cmp(&b.abs()).then_with(|| b_id.cmp(a_id))
        })
        .map(|(id, _)| id.clone())
        .unwrap_or_default();

    let adjusted = payouts[&target] + residual;
    payouts.insert(
        target.clone(),
        adjusted.round_dp_with_strategy(
            exact::CURRENCY_SCALE,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        ),
    );

    info!(
        player = %target,
        residual = %residual,
        "Adjusted payout to restore zero sum"
    );

    debug_assert!(payouts.values().sum::<Decimal>().is_zero());

    Ok(Reconciled {
        payouts,
        adjustment: Some(Adjustment {
            player: target,
            amount: residual,
        }),
    })
}
