//! Shared types for the propscape scene core.
//!
//! Everything here is plain data: identifiers, spatial transforms, collision
//! shapes, colors and the descriptors the registry spawns entities from.

pub mod descriptor;
pub mod rng;
pub mod types;

pub use descriptor::{BodyDesc, Category, EntityDescriptor, FocusOverlay};
pub use rng::SplitMix64;
pub use types::{Color, EntityId, NodeId, Shape, Transform};
