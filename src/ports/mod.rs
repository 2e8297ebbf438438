//! Ports Layer - Interface Boundaries
//!
//! Defines the interfaces (traits) the usecases layer requires from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ScenarioStore`: scenario document load/save

pub mod store;
