//! Adapters Layer - Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. The only infrastructure this engine touches is
//! the filesystem.
//!
//! Adapter categories:
//! - `store`: atomic JSON document persistence

pub mod store;

pub use store::JsonFileStore;
