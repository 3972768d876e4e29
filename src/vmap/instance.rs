//! A spawn bound to its loaded collision model

use crate::core::error::Result;
use crate::geometry::Ray;
use crate::vmap::model::{AreaInfo, GroupModel, LocationInfo, WorldModel};
use crate::vmap::spawn::ModelSpawn;
use crate::vmap::transform::InstanceTransform;
use glam::Vec3;

/// A placed world model.
///
/// Holds the spawn, a borrowed model, and the precomputed inverse transform.
/// The model is `None` while it has not been loaded; every query then reports
/// no hit. Queries take `&self` and may run from many threads at once.
#[derive(Debug)]
pub struct ModelInstance<'m, M> {
    spawn: ModelSpawn,
    model: Option<&'m M>,
    transform: InstanceTransform,
    /// World straight-down, in model space
    down_model: Vec3,
}

impl<'m, M: WorldModel> ModelInstance<'m, M> {
    pub fn new(spawn: ModelSpawn, model: Option<&'m M>) -> Result<Self> {
        let transform = InstanceTransform::from_spawn(&spawn)?;
        let down_model = transform.direction_to_model(Vec3::NEG_Z);
        Ok(Self {
            spawn,
            model,
            transform,
            down_model,
        })
    }

    #[inline]
    pub fn spawn(&self) -> &ModelSpawn {
        &self.spawn
    }

    #[inline]
    pub fn transform(&self) -> &InstanceTransform {
        &self.transform
    }

    #[inline]
    pub fn world_model(&self) -> Option<&'m M> {
        self.model
    }

    /// Intersect a world-space ray with the placed model.
    ///
    /// `max_dist` bounds the search and is shortened to the hit distance, in
    /// world units, when the model is hit.
    pub fn intersect_ray(
        &self,
        ray: &Ray,
        max_dist: &mut f32,
        stop_at_first_hit: bool,
        ignore_m2_model: bool,
    ) -> bool {
        let Some(model) = self.model else {
            tracing::trace!("Spawn {} not loaded", self.spawn.id);
            return false;
        };
        let Some(bound) = self.spawn.bound() else {
            tracing::debug!(
                "Spawn {} ({}) has no bound, skipping ray",
                self.spawn.id,
                self.spawn.display_name()
            );
            return false;
        };
        if ray.intersection_time(bound).is_infinite() {
            tracing::trace!("Ray does not hit '{}'", self.spawn.display_name());
            return false;
        }

        let model_ray = self.transform.ray_to_model(ray);
        let mut distance = *max_dist * self.transform.inv_scale();
        let hit = model.intersect_ray(
            &model_ray,
            &mut distance,
            stop_at_first_hit,
            ignore_m2_model,
        );
        if hit {
            *max_dist = distance * self.transform.scale();
        }
        hit
    }

    /// Record this placement's ground below `p` in `info` if it is higher
    /// than what is already there.
    pub fn intersect_point(&self, p: Vec3, info: &mut AreaInfo) {
        let Some((model, p_model)) = self.probe_start(p) else {
            return;
        };
        let Some(hit) = model.intersect_point(p_model, self.down_model) else {
            return;
        };

        let world_z = self.ground_z(p_model, hit.distance);
        if info.ground_z < world_z {
            info.result = true;
            info.ground_z = world_z;
            info.adt_id = self.spawn.adt_id;
            info.flags = hit.flags;
            info.root_id = hit.root_id;
            info.group_id = hit.group_id;
        }
    }

    /// Like [`intersect_point`](Self::intersect_point) but also records the
    /// group that was hit and this instance. Returns whether `info` changed.
    pub fn get_location_info<'s>(&'s self, p: Vec3, info: &mut LocationInfo<'s, M>) -> bool {
        let Some((model, p_model)) = self.probe_start(p) else {
            return false;
        };
        let Some((distance, group)) = model.location_info(p_model, self.down_model) else {
            return false;
        };

        let world_z = self.ground_z(p_model, distance);
        if info.ground_z < world_z {
            info.root_id = group.root_id;
            info.hit_model = Some(group.hit_model);
            info.ground_z = world_z;
            info.hit_instance = Some(self);
            return true;
        }
        false
    }

    /// World height of the liquid surface at `p` in the group `info` hit.
    ///
    /// `info` should come from this instance's
    /// [`get_location_info`](Self::get_location_info).
    pub fn get_liquid_level(&self, p: Vec3, info: &LocationInfo<'_, M>) -> Option<f32> {
        let group = info.hit_model?;
        let p_model = self.transform.world_to_model(p);
        let level = group.liquid_level(p_model)?;
        Some(
            self.transform
                .model_to_world(Vec3::new(p_model.x, p_model.y, level))
                .z,
        )
    }

    /// Common gate for the downward probes: loaded, carries area info, and
    /// `p` inside the world bound.
    fn probe_start(&self, p: Vec3) -> Option<(&'m M, Vec3)> {
        let Some(model) = self.model else {
            tracing::trace!("Spawn {} not loaded", self.spawn.id);
            return None;
        };
        // doodads carry no area info
        if self.spawn.is_m2() {
            return None;
        }
        if !self.spawn.bound().is_some_and(|b| b.contains(p)) {
            return None;
        }
        Some((model, self.transform.world_to_model(p)))
    }

    #[inline]
    fn ground_z(&self, p_model: Vec3, distance: f32) -> f32 {
        self.transform
            .model_to_world(p_model + self.down_model * distance)
            .z
    }
}
