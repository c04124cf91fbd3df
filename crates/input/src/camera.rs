use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ray::Ray;

/// Perspective camera looking at a target point.
///
/// Orbit controls live outside the core; they only move `position` and
/// `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 10.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point on the near plane given in NDC.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        // perspective_rh maps depth to [0, 1].
        let on_near = inverse.project_point3(ndc.extend(0.0));
        let on_far = inverse.project_point3(ndc.extend(1.0));
        let direction = (on_far - on_near).normalize_or(self.forward());
        Ray::new(self.position, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_matrix_is_finite() {
        let cam = Camera::default();
        assert!(cam.view_projection().is_finite());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, cam.position);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let cam = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }
}
