//! Collision world: the registry of named objects that collision checking reads.
//!
//! # Invariants
//! - Committed object snapshots are never mutated; every change swaps in a new `Arc<Object>`.
//! - Shapes are shared by reference count and compared by identity.
//! - Observers run synchronously, in registration order, once per committed change.
//! - An object whose last shape is removed ceases to exist.

mod action;
mod change_log;
mod object;
mod observer;
mod world;

pub use action::Action;
pub use change_log::{ChangeLog, WorldChange};
pub use collision_common::{Shape, ShapeRef, Transform, same_shape};
pub use object::{Object, ObjectPtr, SubframeMap, split_path};
pub use observer::{ObserverCallback, ObserverHandle, ObserverRegistry};
pub use world::{World, WorldError};
