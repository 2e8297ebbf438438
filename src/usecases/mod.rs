//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the engine's core workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `generate`: Settle every scenario and fill in outcome results
//! - `verify`: Recompute a settled document and flag discrepancies

pub mod generate;
pub mod verify;
