use propscape_common::EntityDescriptor;
use serde::{Deserialize, Serialize};

use crate::pattern::{DropPattern, DropPatternConfig};
use crate::stagger::StaggerQueue;

/// Cadence of ambient spawning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub enabled: bool,
    /// Length of one period in seconds.
    pub period: f64,
    /// Part of each period, from its start, during which the trigger is high.
    pub window: f64,
    /// Entities requested per rising edge.
    pub batch_size: usize,
    /// Delay between consecutive entities of one batch.
    pub stagger: f64,
    pub pattern: DropPatternConfig,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 10.0,
            window: 0.5,
            batch_size: 3,
            stagger: 0.25,
            pattern: DropPatternConfig::default(),
        }
    }
}

/// Time-driven ambient spawner.
///
/// The trigger is a window function of elapsed time: high during the first
/// `window` seconds of each `period`. A rising edge schedules one staggered
/// batch, at most once per period, and only while nothing is focused.
#[derive(Debug)]
pub struct PeriodicSpawner {
    config: SpawnerConfig,
    pattern: DropPattern,
    queue: StaggerQueue,
    was_high: bool,
    last_fired_period: Option<i64>,
    batches_fired: u64,
}

impl PeriodicSpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        let pattern = DropPattern::new(config.pattern.clone());
        Self {
            config,
            pattern,
            queue: StaggerQueue::new(),
            was_high: false,
            last_fired_period: None,
            batches_fired: 0,
        }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Requests scheduled but not yet released.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn batches_fired(&self) -> u64 {
        self.batches_fired
    }

    /// Trigger level at `elapsed`.
    pub fn is_high(&self, elapsed: f64) -> bool {
        if self.config.period <= 0.0 || !elapsed.is_finite() {
            return false;
        }
        elapsed.rem_euclid(self.config.period) < self.config.window
    }

    /// Evaluate the trigger and return the spawn requests due this frame.
    ///
    /// While `focused` is true nothing is returned and pending requests are
    /// dropped; a rising edge seen while focused is consumed, not deferred.
    pub fn update(&mut self, elapsed: f64, focused: bool) -> Vec<EntityDescriptor> {
        if !self.config.enabled {
            return Vec::new();
        }
        let high = self.is_high(elapsed);
        let rising = high && !self.was_high;
        self.was_high = high;

        if focused {
            let dropped = self.queue.cancel();
            if dropped > 0 {
                tracing::debug!(dropped, "ambient spawns cancelled by focus");
            }
            if rising {
                self.last_fired_period = Some(self.period_index(elapsed));
            }
            return Vec::new();
        }

        if rising {
            let index = self.period_index(elapsed);
            if self.last_fired_period != Some(index) {
                self.last_fired_period = Some(index);
                self.batches_fired += 1;
                let batch = self.pattern.batch(self.config.batch_size);
                tracing::info!(period = index, count = batch.len(), "ambient batch scheduled");
                self.queue.schedule_batch(elapsed, self.config.stagger, batch);
            }
        }

        self.queue.release_due(elapsed)
    }

    fn period_index(&self, elapsed: f64) -> i64 {
        (elapsed / self.config.period).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn spawner() -> PeriodicSpawner {
        PeriodicSpawner::new(SpawnerConfig::default())
    }

    /// Run frames from `from` to `to` seconds, returning the total released.
    fn run(s: &mut PeriodicSpawner, from: f64, to: f64, focused: bool) -> usize {
        let mut released = 0;
        let mut t = from;
        while t <= to {
            released += s.update(t, focused).len();
            t += DT;
        }
        released
    }

    #[test]
    fn fires_one_staggered_batch_per_period() {
        let mut s = spawner();
        // First frame is a rising edge: only the first of the batch is due.
        assert_eq!(s.update(0.0, false).len(), 1);
        assert_eq!(s.pending(), 2);
        let rest = run(&mut s, DT, 9.0, false);
        assert_eq!(rest, 2);
        assert_eq!(s.batches_fired(), 1);

        let next_period = run(&mut s, 9.0 + DT, 19.0, false);
        assert_eq!(next_period, 3);
        assert_eq!(s.batches_fired(), 2);
    }

    #[test]
    fn at_most_one_trigger_per_period_with_sparse_frames() {
        let mut s = spawner();
        // Frames landing twice in the same window still fire once.
        s.update(10.1, false);
        s.update(10.2, false);
        s.update(10.45, false);
        assert_eq!(s.batches_fired(), 1);
    }

    #[test]
    fn window_gaps_between_frames_do_not_double_fire() {
        let mut s = spawner();
        s.update(10.1, false);
        // Dropping out of and back into the same period's window (clock
        // jitter) is still the same period.
        s.update(10.6, false);
        s.update(10.2, false);
        assert_eq!(s.batches_fired(), 1);
    }

    #[test]
    fn never_spawns_while_focused() {
        let mut s = spawner();
        let mut t = 0.0;
        while t < 120.0 {
            assert!(s.update(t, true).is_empty(), "spawned at t={t}");
            t += 0.05;
        }
        assert_eq!(s.batches_fired(), 0);
        for t in [0.0, 0.1, 10.0, 10.3, 55.5, 1e6, -3.0] {
            assert!(s.update(t, true).is_empty());
        }
    }

    #[test]
    fn focus_cancels_pending_batch() {
        let mut s = spawner();
        assert_eq!(s.update(0.0, false).len(), 1);
        assert_eq!(s.pending(), 2);
        assert!(s.update(DT, true).is_empty());
        assert_eq!(s.pending(), 0);
        // Unfocusing later in the same window does not refire.
        assert!(s.update(2.0 * DT, false).is_empty());
        assert_eq!(s.batches_fired(), 1);
    }

    #[test]
    fn edge_seen_while_focused_is_consumed() {
        let mut s = spawner();
        s.update(10.0, true);
        assert!(s.update(10.1, false).is_empty());
        assert_eq!(s.batches_fired(), 0);
    }

    #[test]
    fn disabled_spawner_is_silent() {
        let mut s = PeriodicSpawner::new(SpawnerConfig {
            enabled: false,
            ..SpawnerConfig::default()
        });
        assert_eq!(run(&mut s, 0.0, 30.0, false), 0);
    }
}
