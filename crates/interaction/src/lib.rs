//! Picking and focus: which entity the pointer is over, and what a click does.
//!
//! # Invariants
//! - The hovered entity is recomputed every frame from the live pickable set;
//!   it never refers to a disposed entity after the frame it was disposed in.
//! - At most one pickable shows the hover color.
//! - Focus is either an enlarged proxy or a panel, never both.
//! - Any click while focused only exits focus.

pub mod controller;
pub mod surface;

pub use controller::{
    FocusTarget, InteractionConfig, InteractionController, InteractionEvent, InteractionState,
};
pub use surface::{NullSurface, PageSurface, RecordingSurface, SurfaceCall};
