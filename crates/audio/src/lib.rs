//! Collision audio: turns impacts into one-shot sound effects.
//!
//! # Invariants
//! - Only impacts strictly faster than the threshold make a sound.
//! - At most one playback starts per frame; later hits in the same frame only
//!   re-randomize the gain.
//! - Sinks are fire-and-forget: nothing here waits on playback.

mod sink;
mod trigger;

pub use sink::{AudioSink, NullSink, PlaybackCall, RecordingSink};
pub use trigger::{CollisionAudio, CollisionAudioConfig};
