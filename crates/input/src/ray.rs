use glam::Vec3;
use propscape_common::{Shape, Transform};

/// Half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to the first hit with `shape` placed by
    /// `transform`. Hits behind the origin are ignored; an origin inside the
    /// shape reports the exit point.
    pub fn intersect(&self, shape: &Shape, transform: &Transform) -> Option<f32> {
        // Work in the shape's local frame. Scale is folded into the direction,
        // so the local parameter equals the world distance.
        let inv_rotation = transform.rotation.inverse();
        let scale = transform.scale;
        if scale.cmpeq(Vec3::ZERO).any() {
            return None;
        }
        let origin = inv_rotation * (self.origin - transform.position) / scale;
        let direction = inv_rotation * self.direction / scale;

        match *shape {
            Shape::Cuboid { half_extents } => slab(origin, direction, half_extents),
            Shape::Ball { radius } => sphere(origin, direction, radius),
        }
    }
}

fn slab(origin: Vec3, direction: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], direction[axis], half[axis]);
        if d.abs() < f32::EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

fn sphere(origin: Vec3, direction: Vec3, radius: f32) -> Option<f32> {
    let a = direction.length_squared();
    let b = origin.dot(direction);
    let c = origin.length_squared() - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 || a == 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = (-b - root) / a;
    let far = (-b + root) / a;
    if far < 0.0 {
        return None;
    }
    Some(if near >= 0.0 { near } else { far })
}
