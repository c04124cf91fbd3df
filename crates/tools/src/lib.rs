//! Developer tooling: read-only views over a running registry.
//!
//! # Invariants
//! - Tools never mutate the registry.

pub mod inspector;

pub use inspector::{EntityInfo, RegistryInspector, RegistrySummary};
