//! Spawning policy: decides *when* and *what* to spawn, never spawns itself.
//!
//! # Invariants
//! - The periodic trigger fires at most once per period.
//! - Nothing is released while an entity is focused; pending staggered
//!   spawns are cancelled when focus begins.
//! - Drop patterns are deterministic for a given seed.

mod pattern;
mod periodic;
mod stagger;

pub use pattern::{DropPattern, DropPatternConfig};
pub use periodic::{PeriodicSpawner, SpawnerConfig};
pub use stagger::StaggerQueue;
