//! Scene runtime: one `tick` per rendered frame.
//!
//! # Invariants
//! - Frame order is fixed: step physics, play impact sounds, sync proxies,
//!   place ready props, interaction, ambient spawning.
//! - Nothing spawns from the ambient spawner while something is focused.
//! - `reset` leaves only persistent entities and no focus.

pub mod config;
pub mod runtime;

pub use config::{ConfigError, FloorConfig, SceneConfig};
pub use runtime::{FrameReport, SceneRuntime};
