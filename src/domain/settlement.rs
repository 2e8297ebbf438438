//! Pairwise transfer generation.
//!
//! Turns a reconciled (zero-sum) payout map into an ordered list of transfers
//! by greedy netting: largest debtor pays the largest remaining creditor until
//! both sides are exhausted. Greedy matching does not minimize transfer
//! count and is not meant to; the ordering is part of the output contract.
//! Balances live in an explicit mutable ledger, decremented in place.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::exact;
use super::types::Settlement;

/// Remaining balance for one side of the ledger.
#[derive(Debug, Clone)]
struct Balance {
    player: String,
    remaining: Decimal,
}

/// Generate transfers realizing the given payouts.
///
/// `payouts` must sum to exactly zero (the reconciler's post-condition).
/// Transfers at or below `materiality` are dropped silently; the
/// corresponding balances are still consumed, so at most half a cent per
/// player is lost to thresholding. A payout of exactly zero contributes
/// nothing to either side.
#[must_use]
pub fn generate(payouts: &BTreeMap<String, Decimal>, materiality: Decimal) -> Vec<Settlement> {
    let mut debtors = ledger(payouts, |p| p < Decimal::ZERO, |p| -p);
    let mut creditors = ledger(payouts, |p| p > Decimal::ZERO, |p| p);

    let mut settlements = Vec::new();
    let mut credit_idx = 0;

    for debtor in &mut debtors {
        while debtor.remaining > Decimal::ZERO && credit_idx < creditors.len() {
            let creditor = &mut creditors[credit_idx];
            let amount = debtor.remaining.min(creditor.remaining);

            if amount > materiality {
                settlements.push(Settlement {
                    amount: amount.round_dp_with_strategy(
                        exact::CURRENCY_SCALE,
                        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                    ),
                    payer: debtor.player.clone(),
                    payee: creditor.player.clone(),
                });
            }

            // Balances shrink even for dropped dust, so matching always
            // terminates with total debt exhausted.
            debtor.remaining -= amount;
            creditor.remaining -= amount;
            if creditor.remaining.is_zero() {
                credit_idx += 1;
            }
        }
    }

    settlements
}

/// Build one side of the ledger, sorted descending by amount with ascending
/// player id as the tie-break.
fn ledger(
    payouts: &BTreeMap<String, Decimal>,
    include: impl Fn(Decimal) -> bool,
    magnitude: impl Fn(Decimal) -> Decimal,
) -> Vec<Balance> {
    let mut side: Vec<Balance> = payouts
        .iter()
        .filter(|(_, p)| include(**p))
        .map(|(player, p)| Balance {
            player: player.clone(),
            remaining: magnitude(*p),
        })
        .collect();
    side.sort_by(|a, b| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.player.cmp(&b.player))
    });
    side
}

/// Net transfer balance (incoming − outgoing) per player.
///
/// Used by the verifier to check that settlements realize the payouts.
#[must_use]
pub fn net_balances(settlements: &[Settlement]) -> BTreeMap<String, Decimal> {
    let mut net: BTreeMap<String, Decimal> = BTreeMap::new();
    for s in settlements {
        *net.entry(s.payer.clone()).or_default() -= s.amount;
        *net.entry(s.payee.clone()).or_default() += s.amount;
    }
    net
}
