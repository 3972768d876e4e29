//! VMap Instance - placed collision models and their spawn records
//!
//! Places a loaded collision model into the world and answers ray, ground,
//! location and liquid queries against it, plus reading and writing the
//! binary spawn records that describe each placement.

pub mod core;
pub mod geometry;
pub mod vmap;
