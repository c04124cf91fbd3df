use propscape_common::EntityDescriptor;

/// Spawn requests waiting for their release time.
///
/// Batches are spread out by a fixed stagger so bodies dropped together do
/// not land, and sound, on the same frame.
#[derive(Debug, Default)]
pub struct StaggerQueue {
    pending: Vec<(f64, EntityDescriptor)>,
}

impl StaggerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `batch` so that item `i` is released at `now + i * stagger`.
    pub fn schedule_batch(
        &mut self,
        now: f64,
        stagger: f64,
        batch: impl IntoIterator<Item = EntityDescriptor>,
    ) {
        for (i, desc) in batch.into_iter().enumerate() {
            self.pending.push((now + i as f64 * stagger, desc));
        }
    }

    /// Remove and return every request due at `now`, earliest first.
    pub fn release_due(&mut self, now: f64) -> Vec<EntityDescriptor> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, desc)| desc).collect()
    }

    /// Drop every pending request. Returns how many were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
