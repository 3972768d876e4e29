//! World-space axis-aligned bounding boxes

use glam::{Mat3, Vec3};

/// Axis-aligned bounding box given by its `low`/`high` corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub low: Vec3,
    pub high: Vec3,
}

impl Aabb {
    /// Create a box from two corners. Components are not reordered.
    #[inline]
    pub fn new(low: Vec3, high: Vec3) -> Self {
        Self { low, high }
    }

    /// Smallest box enclosing every point of the iterator, `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            low: acc.low.min(p),
            high: acc.high.max(p),
        }))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.low + self.high) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.high - self.low) * 0.5
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.low).all() && p.cmple(self.high).all()
    }

    /// Box enclosing this one after `rot * (v * scale) + translation`.
    ///
    /// Transforms the centre and rotates the half-extents through the absolute
    /// value of the rotation (Arvo, Graphics Gems 1990), which avoids the
    /// eight-corner loop.
    pub fn transformed(&self, rot: &Mat3, scale: f32, translation: Vec3) -> Self {
        let centre = *rot * (self.center() * scale) + translation;
        let half = self.half_extents() * scale;

        let abs = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
        let new_half = abs * half;

        Self {
            low: centre - new_half,
            high: centre + new_half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(b.contains(Vec3::splat(0.5)));
        assert!(b.contains(Vec3::ZERO));
        assert!(b.contains(Vec3::ONE));
        assert!(!b.contains(Vec3::new(1.01, 0.5, 0.5)));
        assert!(!b.contains(Vec3::new(0.5, -0.01, 0.5)));
    }

    #[test]
    fn test_from_points() {
        let b = Aabb::from_points([
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(b.low, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.high, Vec3::new(1.0, 4.0, 5.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_transformed_quarter_turn() {
        let b = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let rot = Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let t = b.transformed(&rot, 2.0, Vec3::new(10.0, 0.0, 0.0));

        // x-extent 4 becomes the y-extent after a quarter turn about z
        let size = t.high - t.low;
        assert!((size - Vec3::new(2.0, 4.0, 2.0)).length() < 1e-4);
        assert!((t.center() - Vec3::new(9.0, 2.0, 1.0)).length() < 1e-4);
    }
}
