//! World <-> model space mapping for one placement
//!
//! The inverse rotation and inverse scale are computed once per placement;
//! queries only do matrix-vector products.
//!
//! Going back to world space uses `q * inv_rot` (row vector on the left),
//! which equals `inv_rotᵀ * q`. For a rotation the transpose is the inverse,
//! so this is the forward rotation without rebuilding it from the angles.

use crate::core::error::{Result, SpawnError};
use crate::geometry::{Aabb, Ray};
use crate::vmap::spawn::ModelSpawn;
use glam::{Mat3, Vec3};

/// Rotation for spawn Euler angles given in degrees as `(x, y, z)` fields.
///
/// The stored `y` turns about Z, `x` about Y and `z` about X, composed as
/// `Rz(y) * Ry(x) * Rx(z)`.
pub fn rotation_from_degrees(rotation: Vec3) -> Mat3 {
    Mat3::from_rotation_z(rotation.y.to_radians())
        * Mat3::from_rotation_y(rotation.x.to_radians())
        * Mat3::from_rotation_x(rotation.z.to_radians())
}

/// Precomputed placement transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    position: Vec3,
    scale: f32,
    inv_rot: Mat3,
    inv_scale: f32,
}

impl InstanceTransform {
    /// Build the transform for a spawn. Fails for zero, negative or
    /// non-finite scale since every query divides by it.
    pub fn from_spawn(spawn: &ModelSpawn) -> Result<Self> {
        if !(spawn.scale.is_finite() && spawn.scale > 0.0) {
            return Err(SpawnError::InvalidScale {
                id: spawn.id,
                scale: spawn.scale,
            });
        }
        Ok(Self {
            position: spawn.position,
            scale: spawn.scale,
            inv_rot: rotation_from_degrees(spawn.rotation).transpose(),
            inv_scale: 1.0 / spawn.scale,
        })
    }

    #[inline]
    pub fn inv_rot(&self) -> &Mat3 {
        &self.inv_rot
    }

    #[inline]
    pub fn inv_scale(&self) -> f32 {
        self.inv_scale
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn world_to_model(&self, p: Vec3) -> Vec3 {
        self.inv_rot * (p - self.position) * self.inv_scale
    }

    #[inline]
    pub fn model_to_world(&self, q: Vec3) -> Vec3 {
        self.inv_rot.transpose() * q * self.scale + self.position
    }

    /// Rotate a direction into model space. Length is preserved.
    #[inline]
    pub fn direction_to_model(&self, d: Vec3) -> Vec3 {
        self.inv_rot * d
    }

    #[inline]
    pub fn ray_to_model(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.world_to_model(ray.origin),
            self.direction_to_model(ray.direction),
        )
    }

    /// World-space box enclosing `model_bound` once placed
    pub fn world_bound(&self, model_bound: &Aabb) -> Aabb {
        model_bound.transformed(&self.inv_rot.transpose(), self.scale, self.position)
    }
}
