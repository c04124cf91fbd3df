use glam::Vec3;
use propscape_common::{Color, EntityDescriptor, SplitMix64};
use serde::{Deserialize, Serialize};

/// Where and what the ambient spawns drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropPatternConfig {
    pub seed: u64,
    /// Half-width of the square (on XZ) drops are scattered over.
    pub spread: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Full size of dropped boxes.
    pub box_size: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Chance that a drop is a box rather than a sphere.
    pub box_ratio: f32,
    pub color: Color,
}

impl Default for DropPatternConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            spread: 1.0,
            min_height: 3.0,
            max_height: 10.0,
            box_size: Vec3::new(1.0, 1.5, 2.0),
            min_radius: 0.2,
            max_radius: 0.5,
            box_ratio: 0.5,
            color: Color::default(),
        }
    }
}

/// Deterministic generator of dynamic drop descriptors.
#[derive(Debug, Clone)]
pub struct DropPattern {
    config: DropPatternConfig,
    rng: SplitMix64,
}

impl DropPattern {
    pub fn new(config: DropPatternConfig) -> Self {
        let rng = SplitMix64::new(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &DropPatternConfig {
        &self.config
    }

    /// Next drop: a box or a sphere somewhere above the spread square.
    pub fn next_drop(&mut self) -> EntityDescriptor {
        let c = &self.config;
        let position = Vec3::new(
            self.rng.range(-c.spread, c.spread),
            self.rng.range(c.min_height, c.max_height),
            self.rng.range(-c.spread, c.spread),
        );
        let desc = if self.rng.next_f32() < c.box_ratio {
            EntityDescriptor::dynamic_box(c.box_size, position)
        } else {
            let radius = self.rng.range(c.min_radius, c.max_radius);
            EntityDescriptor::dynamic_ball(radius, position)
        };
        desc.with_color(c.color)
    }

    pub fn batch(&mut self, count: usize) -> Vec<EntityDescriptor> {
        (0..count).map(|_| self.next_drop()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_are_dynamic_and_in_bounds() {
        let mut pattern = DropPattern::new(DropPatternConfig::default());
        for desc in pattern.batch(50) {
            assert!(desc.is_dynamic());
            assert!(!desc.persistent);
            let p = desc.transform.position;
            assert!(p.x.abs() <= 1.0 && p.z.abs() <= 1.0);
            assert!((3.0..10.0).contains(&p.y));
        }
    }

    #[test]
    fn same_seed_same_drops() {
        let mut a = DropPattern::new(DropPatternConfig::default());
        let mut b = DropPattern::new(DropPatternConfig::default());
        assert_eq!(a.batch(10), b.batch(10));
    }

    #[test]
    fn box_ratio_extremes() {
        let mut boxes = DropPattern::new(DropPatternConfig {
            box_ratio: 1.0,
            ..DropPatternConfig::default()
        });
        assert!(boxes.batch(20).iter().all(|d| d.name == "box"));

        let mut balls = DropPattern::new(DropPatternConfig {
            box_ratio: 0.0,
            ..DropPatternConfig::default()
        });
        assert!(balls.batch(20).iter().all(|d| d.name == "sphere"));
    }
}
