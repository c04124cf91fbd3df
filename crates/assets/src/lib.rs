//! Asset readiness and declarative prop placement.
//!
//! Decoding meshes and textures is the renderer's business. This crate only
//! tracks whether each asset a prop needs is ready, identifies loaded assets
//! by content hash, and spawns props through the registry once they can be
//! built.
//!
//! # Invariants
//! - A prop is spawned at most once, and never before its asset is ready.
//! - Lookups of unknown or pending assets return `None`, never an error.

pub mod prop;
pub mod store;

pub use prop::{PropDescriptor, PropLoader};
pub use store::{AssetEntry, AssetError, AssetId, AssetKind, AssetState, AssetStore};
