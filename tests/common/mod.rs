//! Shared stub model for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec3;
use vmap_instance::geometry::{Aabb, Ray};
use vmap_instance::vmap::{AreaHit, GroupLocationInfo, GroupModel, ModelSpawn, WorldModel};

/// Group with a flat liquid surface, or none
#[derive(Debug)]
pub struct StubGroup {
    pub liquid: Option<f32>,
}

impl GroupModel for StubGroup {
    fn liquid_level(&self, _p: Vec3) -> Option<f32> {
        self.liquid
    }
}

/// A model whose only geometry is the plane z = `floor_z` (model space).
/// Counts how often each query reaches it.
#[derive(Debug)]
pub struct StubModel {
    pub floor_z: f32,
    pub root_id: i32,
    pub group: StubGroup,
    pub ray_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl StubModel {
    pub fn new(floor_z: f32) -> Self {
        Self::with_liquid(floor_z, None)
    }

    pub fn with_liquid(floor_z: f32, liquid: Option<f32>) -> Self {
        Self {
            floor_z,
            root_id: 17,
            group: StubGroup { liquid },
            ray_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn ray_calls(&self) -> usize {
        self.ray_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    fn distance_to_floor(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        if direction.z == 0.0 {
            return None;
        }
        let t = (self.floor_z - origin.z) / direction.z;
        (t >= 0.0).then_some(t)
    }
}

impl WorldModel for StubModel {
    type Group = StubGroup;

    fn intersect_ray(
        &self,
        ray: &Ray,
        distance: &mut f32,
        _stop_at_first_hit: bool,
        _ignore_m2_model: bool,
    ) -> bool {
        self.ray_calls.fetch_add(1, Ordering::SeqCst);
        match self.distance_to_floor(ray.origin, ray.direction) {
            Some(t) if t < *distance => {
                *distance = t;
                true
            }
            _ => false,
        }
    }

    fn intersect_point(&self, p: Vec3, down: Vec3) -> Option<AreaHit> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.distance_to_floor(p, down).map(|distance| AreaHit {
            distance,
            flags: 0x4,
            root_id: self.root_id,
            group_id: 1,
        })
    }

    fn location_info(&self, p: Vec3, down: Vec3) -> Option<(f32, GroupLocationInfo<'_, StubGroup>)> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.distance_to_floor(p, down).map(|distance| {
            (
                distance,
                GroupLocationInfo {
                    hit_model: &self.group,
                    root_id: self.root_id,
                },
            )
        })
    }
}

/// Spawn at `position` with a generous bound around it
pub fn bounded_spawn(id: u32, adt_id: u16, position: Vec3, rotation: Vec3, scale: f32) -> ModelSpawn {
    let half = Vec3::new(50.0, 50.0, 50.0) * scale;
    ModelSpawn::new(id, adt_id, format!("model_{id}.wmo"), position, rotation, scale)
        .with_bound(Aabb::new(position - half, position + half))
}
