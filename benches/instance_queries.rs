//! Hot-path benchmarks: one query against one placed model, and spawn decode

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use vmap_instance::geometry::{Aabb, Ray};
use vmap_instance::vmap::{
    write_spawns, AreaHit, AreaInfo, GroupLocationInfo, GroupModel, ModelInstance, ModelSpawn,
    SpawnReader, WorldModel,
};

struct Plane;

impl GroupModel for Plane {
    fn liquid_level(&self, _p: Vec3) -> Option<f32> {
        None
    }
}

impl WorldModel for Plane {
    type Group = Plane;

    fn intersect_ray(&self, ray: &Ray, distance: &mut f32, _: bool, _: bool) -> bool {
        let t = -ray.origin.z / ray.direction.z;
        if t >= 0.0 && t < *distance {
            *distance = t;
            return true;
        }
        false
    }

    fn intersect_point(&self, p: Vec3, down: Vec3) -> Option<AreaHit> {
        let distance = -p.z / down.z;
        (distance >= 0.0).then_some(AreaHit {
            distance,
            flags: 0,
            root_id: 0,
            group_id: 0,
        })
    }

    fn location_info(&self, p: Vec3, down: Vec3) -> Option<(f32, GroupLocationInfo<'_, Plane>)> {
        let distance = -p.z / down.z;
        (distance >= 0.0).then_some((
            distance,
            GroupLocationInfo {
                hit_model: self,
                root_id: 0,
            },
        ))
    }
}

fn spawn(id: u32) -> ModelSpawn {
    let position = Vec3::new(id as f32, 2.0 * id as f32, 10.0);
    ModelSpawn::new(
        id,
        (id % 4096) as u16,
        format!("World/wmo/Azeroth/Buildings/model_{id}.wmo"),
        position,
        Vec3::new(3.0, 47.0, -2.0),
        1.3,
    )
    .with_bound(Aabb::new(position - Vec3::splat(60.0), position + Vec3::splat(60.0)))
}

fn bench_queries(c: &mut Criterion) {
    let model = Plane;
    let inst = ModelInstance::new(spawn(1), Some(&model)).unwrap();
    let ray = Ray::new(Vec3::new(1.0, 2.0, 50.0), Vec3::NEG_Z);

    c.bench_function("intersect_ray", |b| {
        b.iter(|| {
            let mut dist = 1000.0;
            black_box(inst.intersect_ray(black_box(&ray), &mut dist, false, false));
            dist
        })
    });

    c.bench_function("intersect_point", |b| {
        b.iter(|| {
            let mut info = AreaInfo::new();
            inst.intersect_point(black_box(Vec3::new(1.0, 2.0, 50.0)), &mut info);
            info
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let spawns: Vec<ModelSpawn> = (0..10_000).map(spawn).collect();
    let mut bytes = Vec::new();
    write_spawns(&mut bytes, &spawns).unwrap();

    c.bench_function("decode_10k_spawns", |b| {
        b.iter(|| {
            SpawnReader::new(Cursor::new(black_box(&bytes)))
                .filter_map(Result::ok)
                .count()
        })
    });
}

criterion_group!(benches, bench_queries, bench_decode);
criterion_main!(benches);
