//! Interface to the collision mesh and the query result accumulators
//!
//! The mesh (a loaded world model with its groups and BIH trees) lives
//! outside this crate. Everything it is asked here is in model space; the
//! placed instance does the conversion both ways.

use crate::geometry::Ray;
use crate::vmap::instance::ModelInstance;
use glam::Vec3;

/// A loaded world model that can answer model-space queries
pub trait WorldModel {
    /// One geometry group inside the model
    type Group: GroupModel;

    /// Intersect a model-space ray. On hit, `distance` is shortened to the
    /// hit distance in model units.
    fn intersect_ray(
        &self,
        ray: &Ray,
        distance: &mut f32,
        stop_at_first_hit: bool,
        ignore_m2_model: bool,
    ) -> bool;

    /// Probe from `p` along `down` for the first surface carrying area info
    fn intersect_point(&self, p: Vec3, down: Vec3) -> Option<AreaHit>;

    /// Probe from `p` along `down`, reporting the distance and which group
    /// was hit
    fn location_info(
        &self,
        p: Vec3,
        down: Vec3,
    ) -> Option<(f32, GroupLocationInfo<'_, Self::Group>)>;
}

/// A geometry group of a world model
pub trait GroupModel {
    /// Model-space height of the liquid surface above `p`'s x/y, if any
    fn liquid_level(&self, p: Vec3) -> Option<f32>;
}

/// What a model reports for an area probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaHit {
    /// Distance along the probe direction, model units
    pub distance: f32,
    pub flags: u32,
    pub root_id: i32,
    pub group_id: i32,
}

/// The group a location probe hit
#[derive(Debug)]
pub struct GroupLocationInfo<'g, G> {
    pub hit_model: &'g G,
    pub root_id: i32,
}

// derived impls would require G: Clone/Copy
impl<G> Clone for GroupLocationInfo<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for GroupLocationInfo<'_, G> {}

/// Highest area surface found so far below a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaInfo {
    /// Set once any placement has reported ground
    pub result: bool,
    pub ground_z: f32,
    pub flags: u32,
    pub adt_id: u16,
    pub root_id: i32,
    pub group_id: i32,
}

impl Default for AreaInfo {
    fn default() -> Self {
        Self {
            result: false,
            ground_z: f32::NEG_INFINITY,
            flags: 0,
            adt_id: 0,
            root_id: 0,
            group_id: 0,
        }
    }
}

impl AreaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `other` if it is strictly higher. Returns whether it was taken.
    pub fn merge(&mut self, other: &AreaInfo) -> bool {
        if other.result && self.ground_z < other.ground_z {
            *self = *other;
            return true;
        }
        false
    }
}

/// Highest surface found so far below a point, with the group and placement
/// that produced it
pub struct LocationInfo<'a, M: WorldModel> {
    pub root_id: i32,
    pub hit_model: Option<&'a M::Group>,
    pub hit_instance: Option<&'a ModelInstance<'a, M>>,
    pub ground_z: f32,
}

impl<'a, M: WorldModel> LocationInfo<'a, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a placement has reported a surface
    pub fn has_hit(&self) -> bool {
        self.hit_instance.is_some()
    }

    /// Keep `other` if it is strictly higher. Returns whether it was taken.
    pub fn merge(&mut self, other: &LocationInfo<'a, M>) -> bool {
        if other.has_hit() && self.ground_z < other.ground_z {
            *self = *other;
            return true;
        }
        false
    }
}

impl<M: WorldModel> Default for LocationInfo<'_, M> {
    fn default() -> Self {
        Self {
            root_id: 0,
            hit_model: None,
            hit_instance: None,
            ground_z: f32::NEG_INFINITY,
        }
    }
}

// only references and plain values inside, whatever M is
impl<M: WorldModel> Clone for LocationInfo<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: WorldModel> Copy for LocationInfo<'_, M> {}

impl<M: WorldModel> std::fmt::Debug for LocationInfo<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationInfo")
            .field("root_id", &self.root_id)
            .field("has_hit_model", &self.hit_model.is_some())
            .field("hit_instance", &self.hit_instance.map(|i| i.spawn().id))
            .field("ground_z", &self.ground_z)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_info_starts_below_everything() {
        let info = AreaInfo::new();
        assert!(!info.result);
        assert!(info.ground_z < f32::MIN);
    }

    #[test]
    fn test_area_info_merge_keeps_higher() {
        let mut best = AreaInfo::new();
        let low = AreaInfo {
            result: true,
            ground_z: 10.0,
            adt_id: 1,
            ..AreaInfo::default()
        };
        let high = AreaInfo {
            result: true,
            ground_z: 12.0,
            adt_id: 2,
            ..AreaInfo::default()
        };

        assert!(best.merge(&high));
        assert!(!best.merge(&low));
        assert_eq!(best.adt_id, 2);
        assert_eq!(best.ground_z, 12.0);
    }

    #[test]
    fn test_area_info_merge_tie_keeps_first() {
        let mut best = AreaInfo {
            result: true,
            ground_z: 5.0,
            adt_id: 1,
            ..AreaInfo::default()
        };
        let tie = AreaInfo { adt_id: 2, ..best };
        assert!(!best.merge(&tie));
        assert_eq!(best.adt_id, 1);
    }

    #[test]
    fn test_area_info_merge_ignores_empty() {
        let mut best = AreaInfo::new();
        assert!(!best.merge(&AreaInfo::new()));
        assert!(!best.result);
    }
}
