//! Pointer input mapped to world-space rays.
//!
//! # Invariants
//! - Pointer coordinates are normalized device coordinates, `[-1, 1]` on both
//!   axes with +y up.
//! - Ray directions are unit length.

pub mod camera;
pub mod pointer;
pub mod ray;

pub use camera::Camera;
pub use pointer::PointerState;
pub use ray::Ray;
