//! Physics: rigid-body world wrapper and the fixed-timestep stepper.
//!
//! # Invariants
//! - The world exclusively owns body state; callers hold opaque `BodyHandle`s.
//! - One `Stepper::step` call runs at most `max_substeps` fixed steps, whatever
//!   the elapsed delta.
//! - Zero, negative or non-finite deltas never reach the solver.

pub mod stepper;
pub mod world;

pub use stepper::{StepReport, Stepper, StepperConfig};
pub use world::{BodyHandle, Impact, PhysicsSettings, PhysicsWorld};
