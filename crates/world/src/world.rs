use crate::action::Action;
use crate::object::{Object, ObjectPtr, SubframeMap, split_path};
use crate::observer::{ObserverHandle, ObserverRegistry};
use collision_common::{ShapeRef, Transform, same_shape};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Invalid input to a world operation. Nothing is committed when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("got {shapes} shapes but {poses} poses")]
    LengthMismatch { shapes: usize, poses: usize },
    #[error("unknown object '{0}'")]
    UnknownObject(String),
    #[error("shape index {index} out of range for object '{id}' with {len} shapes")]
    ShapeIndexOutOfRange { id: String, index: usize, len: usize },
}

/// The set of objects collision checking runs against.
///
/// Each id maps to the current immutable snapshot of that object. Every
/// mutation builds a new [`Object`], swaps it into the map, then notifies the
/// observers synchronously before returning. Snapshots handed out by
/// [`World::get_object`] are never modified afterwards.
///
/// Uses BTreeMap so iteration (and `clear_objects` notification) order is
/// deterministic.
#[derive(Default)]
pub struct World {
    objects: BTreeMap<String, ObjectPtr>,
    observers: ObserverRegistry,
}

impl World {
    /// Create an empty world with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    pub fn has_object(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Current snapshot of an object. Safe to keep; later changes never touch it.
    pub fn get_object(&self, id: &str) -> Option<ObjectPtr> {
        self.objects.get(id).cloned()
    }

    /// Number of objects in the world.
    pub fn size(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Sorted ids of all objects.
    pub fn object_ids(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectPtr)> {
        self.objects.iter().map(|(id, obj)| (id.as_str(), obj))
    }

    /// Resolve `"<id>"` or `"<id>/<subframe>"` to a world-frame transform.
    ///
    /// An exact object id match wins over splitting on `/`.
    pub fn get_transform(&self, path: &str) -> Option<Transform> {
        if let Some(obj) = self.objects.get(path) {
            return obj.transform(None);
        }
        match split_path(path) {
            (id, Some(subframe)) => self.objects.get(id)?.transform(Some(subframe)),
            (_, None) => None,
        }
    }

    /// Like [`World::get_transform`], but returns identity with `false` when
    /// the frame is unknown.
    pub fn transform_or_identity(&self, path: &str) -> (Transform, bool) {
        match self.get_transform(path) {
            Some(t) => (t, true),
            None => (Transform::IDENTITY, false),
        }
    }

    pub fn knows_transform(&self, path: &str) -> bool {
        self.get_transform(path).is_some()
    }

    /// World-frame pose of one shape: `object.pose * shape_poses[index]`.
    pub fn global_shape_transform(&self, id: &str, index: usize) -> Result<Transform, WorldError> {
        let obj = self
            .objects
            .get(id)
            .ok_or_else(|| WorldError::UnknownObject(id.to_string()))?;
        obj.global_shape_transform(index)
            .ok_or_else(|| WorldError::ShapeIndexOutOfRange {
                id: id.to_string(),
                index,
                len: obj.shape_count(),
            })
    }

    pub fn global_shape_transforms(&self, id: &str) -> Option<Vec<Transform>> {
        self.objects.get(id).map(|obj| obj.global_shape_transforms())
    }

    // --- Observers ---

    /// Register a callback run after every committed change. Returns the handle
    /// needed to remove it.
    pub fn add_observer<F>(&mut self, callback: F) -> ObserverHandle
    where
        F: FnMut(&ObjectPtr, Action) + Send + 'static,
    {
        self.observers.add(callback)
    }

    pub fn remove_observer(&mut self, handle: ObserverHandle) -> bool {
        self.observers.remove(handle)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Send every current object to one observer with the given action.
    ///
    /// Lets a late subscriber catch up, e.g. with `Action::CREATE`.
    pub fn notify_observer_all_objects(&mut self, handle: ObserverHandle, action: Action) -> bool {
        self.observers
            .notify_one(handle, self.objects.values(), action)
    }

    // --- Shape mutations ---

    /// Append one shape, creating the object if needed.
    pub fn add_to_object(&mut self, id: &str, shape: ShapeRef, pose: Transform) {
        let (mut object, created) = self.checkout(id);
        object.shapes.push(shape);
        object.shape_poses.push(pose);
        self.commit(object, created | Action::ADD_SHAPE);
    }

    /// Append several shapes with their local poses, creating the object if
    /// needed. Empty input creates a missing object and is otherwise a no-op.
    pub fn add_shapes_to_object(
        &mut self,
        id: &str,
        shapes: &[ShapeRef],
        poses: &[Transform],
    ) -> Result<(), WorldError> {
        self.add_internal(id, None, shapes, poses)
    }

    /// Append shapes and set the object pose in a single commit.
    pub fn add_to_object_with_pose(
        &mut self,
        id: &str,
        pose: Transform,
        shapes: &[ShapeRef],
        poses: &[Transform],
    ) -> Result<(), WorldError> {
        self.add_internal(id, Some(pose), shapes, poses)
    }

    /// Replace the local pose of the first slot holding `shape`.
    pub fn move_shape_in_object(&mut self, id: &str, shape: &ShapeRef, pose: Transform) -> bool {
        let Some(current) = self.objects.get(id) else {
            tracing::trace!(id, "move_shape: unknown object");
            return false;
        };
        let Some(index) = current.shape_index(shape) else {
            tracing::trace!(id, "move_shape: shape not in object");
            return false;
        };
        let mut object = Object::clone(current);
        object.shape_poses[index] = pose;
        self.commit(object, Action::MOVE_SHAPE);
        true
    }

    /// Replace every shape-local pose at once. `Ok(false)` if the object is
    /// unknown or has no shapes, since nothing would change.
    pub fn move_shapes_in_object(&mut self, id: &str, poses: &[Transform]) -> Result<bool, WorldError> {
        let Some(current) = self.objects.get(id) else {
            return Ok(false);
        };
        if poses.len() != current.shape_count() {
            return Err(WorldError::LengthMismatch {
                shapes: current.shape_count(),
                poses: poses.len(),
            });
        }
        if poses.is_empty() {
            tracing::trace!(id, "move_shapes: object has no shapes");
            return Ok(false);
        }
        let mut object = Object::clone(current);
        object.shape_poses.copy_from_slice(poses);
        self.commit(object, Action::MOVE_SHAPE);
        Ok(true)
    }

    /// Remove every slot holding `shape`. Removing the last shape destroys the
    /// object.
    pub fn remove_shape_from_object(&mut self, id: &str, shape: &ShapeRef) -> bool {
        let Some(current) = self.objects.get(id) else {
            tracing::trace!(id, "remove_shape: unknown object");
            return false;
        };
        if !current.contains_shape(shape) {
            tracing::trace!(id, "remove_shape: shape not in object");
            return false;
        }

        let (shapes, shape_poses): (Vec<ShapeRef>, Vec<Transform>) = current
            .shapes
            .iter()
            .zip(&current.shape_poses)
            .filter(|(s, _)| !same_shape(s, shape))
            .map(|(s, p)| (Arc::clone(s), *p))
            .unzip();

        if shapes.is_empty() {
            return self.remove_object(id);
        }
        let object = Object {
            id: current.id.clone(),
            pose: current.pose,
            shapes,
            shape_poses,
            subframes: current.subframes.clone(),
        };
        self.commit(object, Action::REMOVE_SHAPE);
        true
    }

    // --- Object mutations ---

    /// Remove an object. Observers get the last committed snapshot.
    pub fn remove_object(&mut self, id: &str) -> bool {
        match self.objects.remove(id) {
            Some(object) => {
                tracing::debug!(id, shapes = object.shape_count(), "object destroyed");
                self.observers.notify(&object, Action::DESTROY);
                true
            }
            None => false,
        }
    }

    /// Remove all objects, reporting each one as destroyed.
    pub fn clear_objects(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        let _span = tracing::info_span!("clear_objects", count = self.objects.len()).entered();
        let objects = std::mem::take(&mut self.objects);
        for object in objects.values() {
            tracing::debug!(id = %object.id, "object destroyed");
            self.observers.notify(object, Action::DESTROY);
        }
    }

    /// Set the object pose absolutely. Creates a shape-less object if needed.
    pub fn set_object_pose(&mut self, id: &str, pose: Transform) {
        let (mut object, created) = self.checkout(id);
        object.pose = pose;
        let action = if created.is_empty() {
            Action::MOVE_OBJECT
        } else {
            created
        };
        self.commit(object, action);
    }

    /// Apply `relative` on top of the current pose: `new = relative * old`.
    pub fn move_object(&mut self, id: &str, relative: Transform) -> bool {
        let Some(current) = self.objects.get(id) else {
            tracing::trace!(id, "move_object: unknown object");
            return false;
        };
        let mut object = Object::clone(current);
        object.pose = relative * object.pose;
        self.commit(object, Action::MOVE_OBJECT);
        true
    }

    /// Replace the whole subframe map. Ignored (returns false) for unknown ids.
    pub fn set_subframes_of_object(&mut self, id: &str, subframes: SubframeMap) -> bool {
        let Some(current) = self.objects.get(id) else {
            tracing::trace!(id, "set_subframes: unknown object");
            return false;
        };
        let object = Object {
            id: current.id.clone(),
            pose: current.pose,
            shapes: current.shapes.clone(),
            shape_poses: current.shape_poses.clone(),
            subframes,
        };
        self.commit(object, Action::SUBFRAMES);
        true
    }

    // --- Internals ---

    /// Working copy of the current snapshot, or a new object. The returned
    /// action is `CREATE` for a new object and empty otherwise.
    fn checkout(&self, id: &str) -> (Object, Action) {
        match self.objects.get(id) {
            Some(current) => (Object::clone(current), Action::empty()),
            None => (Object::new(id), Action::CREATE),
        }
    }

    /// Swap in a new snapshot and notify observers.
    fn commit(&mut self, object: Object, action: Action) {
        let object = Arc::new(object);
        self.objects.insert(object.id.clone(), Arc::clone(&object));
        tracing::debug!(
            id = %object.id,
            %action,
            shapes = object.shape_count(),
            "object committed"
        );
        self.observers.notify(&object, action);
    }

    fn add_internal(
        &mut self,
        id: &str,
        pose: Option<Transform>,
        shapes: &[ShapeRef],
        poses: &[Transform],
    ) -> Result<(), WorldError> {
        if shapes.len() != poses.len() {
            return Err(WorldError::LengthMismatch {
                shapes: shapes.len(),
                poses: poses.len(),
            });
        }
        let (mut object, created) = self.checkout(id);
        let mut action = created;
        if !shapes.is_empty() || !created.is_empty() {
            action |= Action::ADD_SHAPE;
        }
        if let Some(pose) = pose {
            if created.is_empty() && pose != object.pose {
                action |= Action::MOVE_OBJECT;
            }
            object.pose = pose;
        }
        if action.is_empty() {
            return Ok(());
        }
        object.shapes.extend(shapes.iter().cloned());
        object.shape_poses.extend_from_slice(poses);
        self.commit(object, action);
        Ok(())
    }
}

impl Clone for World {
    /// Copies the objects (sharing their snapshots) but not the observers.
    fn clone(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            observers: ObserverRegistry::new(),
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("observers", &self.observers)
            .finish()
    }
}
