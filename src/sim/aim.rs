//! Pointer aiming: cast a camera ray through the pointer onto the aim plane

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_ASPECT, CAMERA_FOV_Y_DEGREES, CAMERA_HEIGHT};

/// Ray with a unit direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Where the ray crosses the horizontal plane `y = height`, if it does
    /// so in front of the origin
    pub fn intersect_horizontal(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < f32::EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        (t >= 0.0).then(|| self.origin + self.dir * t)
    }
}

/// Perspective camera the pointer coordinates are relative to
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Screen-up direction in world space
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for Camera {
    /// Top-down view over the arena center, screen-up toward -z
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, CAMERA_HEIGHT, 0.0),
            target: Vec3::ZERO,
            up: Vec3::NEG_Z,
            fov_y: CAMERA_FOV_Y_DEGREES.to_radians(),
            aspect: CAMERA_ASPECT,
        }
    }
}

impl Camera {
    fn inverse_view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, 0.1, 1000.0);
        (proj * view).inverse()
    }

    /// Ray through a pointer in normalized device coordinates
    /// (x right, y up, both in [-1, 1])
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inv = self.inverse_view_projection();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
    }

    /// Ground-plane point under the pointer at the given aim height
    pub fn aim_point(&self, ndc: Vec2, height: f32) -> Option<Vec2> {
        self.ray_through(ndc)
            .intersect_horizontal(height)
            .map(|hit| Vec2::new(hit.x, hit.z))
    }
}
