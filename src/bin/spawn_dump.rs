//! Spawn file inspector
//!
//! Lists the records of a spawn file, optionally checking that each one
//! re-encodes to the same bytes, and which bounds a ray or point reaches.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use vmap_instance::core::QueryConfig;
use vmap_instance::geometry::Ray;
use vmap_instance::vmap::ModelSpawn;

/// Inspect a file of model spawn records
#[derive(Parser, Debug)]
#[command(name = "spawn_dump")]
#[command(about = "List model spawn records and test rays/points against their bounds")]
struct Args {
    /// Spawn file to read
    file: PathBuf,

    /// Query config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Re-encode every record and compare with the bytes on disk
    #[arg(long)]
    verify: bool,

    /// List spawns whose bound a ray reaches: "ox,oy,oz,dx,dy,dz"
    #[arg(long, value_parser = parse_floats::<6>)]
    ray: Option<[f32; 6]>,

    /// List area-carrying spawns whose bound contains a point: "x,y,z"
    #[arg(long, value_parser = parse_floats::<3>)]
    point: Option<[f32; 3]>,

    /// Only print the summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>().map_err(|e| format!("'{}': {}", v, e)))
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected {} comma-separated numbers, got {}", N, v.len()))
}

fn describe(spawn: &ModelSpawn) -> String {
    let bound = match spawn.bound() {
        Some(b) => format!(
            "[{:.1} {:.1} {:.1}]..[{:.1} {:.1} {:.1}]",
            b.low.x, b.low.y, b.low.z, b.high.x, b.high.y, b.high.z
        ),
        None => "-".to_string(),
    };
    format!(
        "{:>8} adt={:<5} flags={:#x} pos=({:.2}, {:.2}, {:.2}) rot=({:.1}, {:.1}, {:.1}) scale={:.3} bound={} {}",
        spawn.id,
        spawn.adt_id,
        spawn.flags(),
        spawn.position.x,
        spawn.position.y,
        spawn.position.z,
        spawn.rotation.x,
        spawn.rotation.y,
        spawn.rotation.z,
        spawn.scale,
        bound,
        spawn.display_name()
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => QueryConfig::load(path)?,
        None => QueryConfig::default(),
    };

    let ray = args
        .ray
        .map(|[ox, oy, oz, dx, dy, dz]| Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz)));
    let point = args.point.map(Vec3::from_array);

    let mut reader = BufReader::new(File::open(&args.file)?);
    let mut total = 0usize;
    let mut m2 = 0usize;
    let mut unbounded = 0usize;
    let mut mismatched = 0usize;

    while let Some((spawn, raw)) = ModelSpawn::read_with_bytes(&mut reader)? {
        total += 1;
        if spawn.is_m2() {
            m2 += 1;
        }
        if !spawn.has_bound() {
            unbounded += 1;
        }

        if !args.quiet {
            println!("{}", describe(&spawn));
        }

        if args.verify {
            if !spawn.encodes_to(&raw)? {
                mismatched += 1;
                tracing::warn!("Spawn {} re-encodes to different bytes", spawn.id);
            }
        }

        if let (Some(ray), Some(bound)) = (&ray, spawn.bound()) {
            let t = ray.intersection_time(bound);
            if t <= config.max_ray_distance {
                println!("  ray reaches spawn {} at {:.3}", spawn.id, t);
            }
        }

        if let (Some(p), Some(bound)) = (point, spawn.bound()) {
            if !spawn.is_m2() && bound.contains(p) {
                println!("  point inside spawn {}", spawn.id);
            }
        }
    }

    tracing::info!(
        "Read {} spawns from {} ({} doodads, {} without bound)",
        total,
        args.file.display(),
        m2,
        unbounded
    );
    if args.verify {
        tracing::info!("Re-encode check: {} of {} records differ", mismatched, total);
    }

    Ok(())
}
