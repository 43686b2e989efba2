//! Developer tooling: read-only inspection of a collision world.
//!
//! # Invariants
//! - Tools never mutate the world or register observers.

mod inspector;

pub use inspector::{ObjectInfo, ShapeInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "collision-tools v0.1.0"
}
