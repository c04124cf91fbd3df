use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a registry entity.
///
/// Ids are handed out in increasing order, so sorting by id is sorting by
/// spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Identifier of a node in the scene graph (the render proxy of an entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Collision and picking shape, expressed in the entity's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

impl Shape {
    /// Box with full edge lengths `width`, `height`, `depth`.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid {
            half_extents: Vec3::new(width, height, depth) * 0.5,
        }
    }

    pub fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Radius of the smallest sphere around the local origin containing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Cuboid { half_extents } => half_extents.length(),
            Self::Ball { radius } => radius,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::Cuboid {
            half_extents: Vec3::splat(0.5),
        }
    }
}

/// Linear RGB color in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0]);

    /// Build a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self([channel(16), channel(8), channel(0)])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self([0.8, 0.8, 0.8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_order_by_value() {
        let a = EntityId(1);
        let b = EntityId(2);
        assert!(a < b);
        assert_eq!(a.to_string(), "e1");
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn cuboid_takes_full_extents() {
        let shape = Shape::cuboid(1.0, 1.5, 2.0);
        assert_eq!(
            shape,
            Shape::Cuboid {
                half_extents: Vec3::new(0.5, 0.75, 1.0)
            }
        );
    }

    #[test]
    fn bounding_radius() {
        assert_eq!(Shape::ball(2.0).bounding_radius(), 2.0);
        let r = Shape::cuboid(2.0, 2.0, 2.0).bounding_radius();
        assert!((r - 3.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex(0xffcc22);
        assert_eq!(c.0[0], 1.0);
        assert!((c.0[1] - 0.8).abs() < 1e-6);
        assert!((c.0[2] - 34.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn shape_serializes_tagged() {
        let json = serde_json::to_string(&Shape::ball(0.5)).unwrap();
        assert!(json.contains("\"kind\":\"ball\""));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Shape::ball(0.5));
    }
}
