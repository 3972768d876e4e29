//! Queries over a caller-chosen set of placed models
//!
//! Which instances to pass is the caller's decision (usually a spatial index
//! lookup). Large sets are split across rayon workers, each with its own
//! accumulator; the partial results are merged in slice order so ties resolve
//! the same way as a sequential pass (first instance wins).

use crate::core::config::QueryConfig;
use crate::geometry::Ray;
use crate::vmap::instance::ModelInstance;
use crate::vmap::model::{AreaInfo, LocationInfo, WorldModel};
use glam::Vec3;
use rayon::prelude::*;

/// Nearest ray hit among a set of instances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index into the queried slice
    pub index: usize,
    /// World-space distance along the ray
    pub distance: f32,
}

/// Intersect `ray` with every instance, starting from
/// `config.max_ray_distance`, and return the nearest hit.
pub fn intersect_ray_all<M>(
    instances: &[ModelInstance<'_, M>],
    ray: &Ray,
    config: &QueryConfig,
) -> Option<RayHit>
where
    M: WorldModel + Sync,
{
    if instances.len() < config.parallel_threshold {
        let mut distance = config.max_ray_distance;
        let mut nearest = None;
        for (index, instance) in instances.iter().enumerate() {
            // distance only shrinks on a hit, so each hit is nearer than the last
            if instance.intersect_ray(
                ray,
                &mut distance,
                config.stop_at_first_hit,
                config.ignore_m2_models,
            ) {
                nearest = Some(RayHit { index, distance });
                if config.stop_at_first_hit {
                    break;
                }
            }
        }
        return nearest;
    }

    let candidates = instances.par_iter().enumerate().filter_map(|(index, instance)| {
        let mut distance = config.max_ray_distance;
        instance
            .intersect_ray(
                ray,
                &mut distance,
                config.stop_at_first_hit,
                config.ignore_m2_models,
            )
            .then_some(RayHit { index, distance })
    });

    if config.stop_at_first_hit {
        return candidates.find_any(|_| true);
    }
    candidates.reduce_with(|a, b| {
        if b.distance < a.distance || (b.distance == a.distance && b.index < a.index) {
            b
        } else {
            a
        }
    })
}

/// Highest area surface below `p` among the instances
pub fn area_info_all<M>(instances: &[ModelInstance<'_, M>], p: Vec3, config: &QueryConfig) -> AreaInfo
where
    M: WorldModel + Sync,
{
    if instances.len() < config.parallel_threshold {
        let mut info = AreaInfo::new();
        for instance in instances {
            instance.intersect_point(p, &mut info);
        }
        return info;
    }

    instances
        .par_iter()
        .fold(AreaInfo::new, |mut info, instance| {
            instance.intersect_point(p, &mut info);
            info
        })
        .reduce(AreaInfo::new, |mut left, right| {
            left.merge(&right);
            left
        })
}

/// Highest located surface below `p` among the instances
pub fn location_info_all<'a, M>(
    instances: &'a [ModelInstance<'a, M>],
    p: Vec3,
    config: &QueryConfig,
) -> LocationInfo<'a, M>
where
    M: WorldModel + Sync,
    M::Group: Sync,
{
    if instances.len() < config.parallel_threshold {
        let mut info = LocationInfo::new();
        for instance in instances {
            instance.get_location_info(p, &mut info);
        }
        return info;
    }

    instances
        .par_iter()
        .fold(LocationInfo::new, |mut info, instance| {
            instance.get_location_info(p, &mut info);
            info
        })
        .reduce(LocationInfo::new, |mut left, right| {
            left.merge(&right);
            left
        })
}
