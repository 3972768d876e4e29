//! Rays and the ray/box slab test

use super::Aabb;
use glam::Vec3;

/// A half-line starting at `origin` going along `direction`.
///
/// The direction is not normalised here; distances reported against a ray
/// are in multiples of `direction`'s length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the first point where the ray enters `bound`.
    ///
    /// Returns `0.0` when the origin is already inside and `f32::INFINITY`
    /// when the ray misses the box or the box lies behind the origin.
    pub fn intersection_time(&self, bound: &Aabb) -> f32 {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            let (lo, hi) = (bound.low[axis], bound.high[axis]);

            if d == 0.0 {
                // parallel to this slab: must already be between its planes
                if o < lo || o > hi {
                    return f32::INFINITY;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t1, t2) = ((lo - o) * inv, (hi - o) * inv);
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
        }

        if t_exit < t_enter.max(0.0) {
            return f32::INFINITY;
        }
        t_enter.max(0.0)
    }
}
