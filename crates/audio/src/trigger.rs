use propscape_common::SplitMix64;
use serde::{Deserialize, Serialize};

use crate::sink::AudioSink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionAudioConfig {
    pub enabled: bool,
    /// Minimum impact speed (m/s along the contact normal) that makes a sound.
    pub threshold: f32,
    pub clip: String,
    /// Seed for the gain randomization.
    pub seed: u64,
}

impl Default for CollisionAudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 1.5,
            clip: "sounds/hit.mp3".into(),
            seed: 0xa0d10,
        }
    }
}

/// Impact-speed gated hit sound.
#[derive(Debug)]
pub struct CollisionAudio {
    config: CollisionAudioConfig,
    rng: SplitMix64,
    frame: u64,
    played_in_frame: Option<u64>,
    triggers: u64,
}

impl CollisionAudio {
    pub fn new(config: CollisionAudioConfig) -> Self {
        let rng = SplitMix64::new(config.seed);
        Self {
            config,
            rng,
            frame: 0,
            played_in_frame: None,
            triggers: 0,
        }
    }

    pub fn config(&self) -> &CollisionAudioConfig {
        &self.config
    }

    /// Impacts that passed the threshold since creation.
    pub fn triggers(&self) -> u64 {
        self.triggers
    }

    /// Mark the start of a new frame.
    pub fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// Handle one impact. Returns true if it passed the threshold.
    pub fn on_impact(&mut self, speed: f32, sink: &mut dyn AudioSink) -> bool {
        if !self.config.enabled || speed.is_nan() || speed <= self.config.threshold {
            return false;
        }
        self.triggers += 1;
        let gain = self.rng.next_f32();
        if self.played_in_frame == Some(self.frame) {
            sink.set_gain(&self.config.clip, gain);
        } else {
            self.played_in_frame = Some(self.frame);
            tracing::trace!(speed, gain, "hit sound");
            sink.play_from_start(&self.config.clip, gain);
        }
        true
    }
}
