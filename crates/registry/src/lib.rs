//! Entity Registry: owns every (render proxy, physics body) pair.
//!
//! # Invariants
//! - An entity with a body always has exactly one proxy; both appear and
//!   disappear together.
//! - Only the registry adds or removes bodies and scene nodes.
//! - Disposing an unknown or already disposed entity is a no-op.
//! - Impacts are only routed to live, subscribed entities.

mod registry;

pub use registry::{Entity, Registry, RegistryError, RegistryEvent, RoutedImpact, StepOutcome};
