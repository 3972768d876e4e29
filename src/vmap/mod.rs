//! Placed collision models: spawn records, their transforms, and queries

pub mod batch;
pub mod instance;
pub mod model;
pub mod spawn;
pub mod transform;

pub use batch::{area_info_all, intersect_ray_all, location_info_all, RayHit};
pub use instance::ModelInstance;
pub use model::{AreaHit, AreaInfo, GroupLocationInfo, GroupModel, LocationInfo, WorldModel};
pub use spawn::{
    write_spawns, ModelSpawn, SpawnReader, MOD_HAS_BOUND, MOD_M2, MOD_WORLDSPAWN,
};
pub use transform::{rotation_from_degrees, InstanceTransform};
