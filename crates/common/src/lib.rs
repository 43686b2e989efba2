//! Shared types for the collision world: rigid transforms and shape primitives.
//!
//! # Invariants
//! - `Transform` is always rigid (unit rotation + translation, no scale).
//! - Shapes are immutable once wrapped in a `ShapeRef`.

mod shape;
mod types;

pub use shape::{Shape, ShapeRef, same_shape};
pub use types::{Transform, TransformError};
