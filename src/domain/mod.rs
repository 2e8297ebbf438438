//! Domain layer - the pure calculation ring.
//!
//! Scorer → payout calculator → reconciler → settlement generator, all
//! operating on explicit value objects with no I/O and no shared mutable
//! state. Exact rational arithmetic everywhere upstream of the final
//! currency rounding.

pub mod error;
pub mod exact;
pub mod payout;
pub mod reconcile;
pub mod scoring;
pub mod settlement;
pub mod types;

// Re-export core types for convenience
pub use error::DomainError;
pub use reconcile::{Adjustment, Reconciled};
pub use types::{OutcomeResult, PlayerRecord, Scenario, Settlement};
