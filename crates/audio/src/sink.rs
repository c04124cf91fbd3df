/// One-shot audio playback service.
///
/// Calls must return immediately; the backend owns decoding and mixing.
pub trait AudioSink {
    /// Restart `clip` from the beginning at `gain` (0..=1).
    fn play_from_start(&mut self, clip: &str, gain: f32);

    /// Change the gain of `clip` if it is playing.
    fn set_gain(&mut self, clip: &str, gain: f32);
}

/// Sink that discards everything. Used when audio is disabled.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_from_start(&mut self, _clip: &str, _gain: f32) {}

    fn set_gain(&mut self, _clip: &str, _gain: f32) {}
}

/// A call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCall {
    Play { clip: String, gain: f32 },
    SetGain { clip: String, gain: f32 },
}

/// Sink that records every call, for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<PlaybackCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of playbacks started.
    pub fn plays(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PlaybackCall::Play { .. }))
            .count()
    }
}

impl AudioSink for RecordingSink {
    fn play_from_start(&mut self, clip: &str, gain: f32) {
        self.calls.push(PlaybackCall::Play {
            clip: clip.to_string(),
            gain,
        });
    }

    fn set_gain(&mut self, clip: &str, gain: f32) {
        self.calls.push(PlaybackCall::SetGain {
            clip: clip.to_string(),
            gain,
        });
    }
}
