use collision_common::{ShapeRef, Transform, same_shape};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named fixed frames inside an object, expressed in the object-local frame.
pub type SubframeMap = BTreeMap<String, Transform>;

/// Shared handle to a committed object snapshot.
pub type ObjectPtr = Arc<Object>;

/// One object of the world at one point in time.
///
/// Committed snapshots live behind an [`ObjectPtr`] and are never edited.
/// The world builds a fresh `Object` for every change, so a snapshot held by a
/// reader keeps describing the state at the moment it was fetched. Cloning an
/// `Object` copies the shape and pose lists but shares the shapes themselves.
#[derive(Debug, Clone)]
pub struct Object {
    /// Unique id within one world.
    pub id: String,
    /// Placement of the object-local frame in the world frame.
    pub pose: Transform,
    /// Shapes of the object, parallel to `shape_poses`.
    pub shapes: Vec<ShapeRef>,
    /// Pose of each shape in the object-local frame.
    pub shape_poses: Vec<Transform>,
    pub subframes: SubframeMap,
}

impl Object {
    /// An object with no shapes, no subframes and an identity pose.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pose: Transform::IDENTITY,
            shapes: Vec::new(),
            shape_poses: Vec::new(),
            subframes: SubframeMap::new(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// True for pose-only objects (no shapes).
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Index of the first slot holding `shape`, compared by identity.
    pub fn shape_index(&self, shape: &ShapeRef) -> Option<usize> {
        self.shapes.iter().position(|s| same_shape(s, shape))
    }

    pub fn contains_shape(&self, shape: &ShapeRef) -> bool {
        self.shape_index(shape).is_some()
    }

    /// Resolve the object frame (`None`) or a named subframe to the world frame.
    ///
    /// Returns `pose * identity` or `pose * subframes[name]`; `None` if the
    /// subframe is unknown.
    pub fn transform(&self, subframe: Option<&str>) -> Option<Transform> {
        match subframe {
            None => Some(self.pose),
            Some(name) => self.subframes.get(name).map(|offset| self.pose * *offset),
        }
    }

    /// World-frame pose of the shape at `index`, or `None` if out of range.
    pub fn global_shape_transform(&self, index: usize) -> Option<Transform> {
        self.shape_poses.get(index).map(|local| self.pose * *local)
    }

    pub fn global_shape_transforms(&self) -> Vec<Transform> {
        self.shape_poses.iter().map(|local| self.pose * *local).collect()
    }

    pub fn subframe_names(&self) -> impl Iterator<Item = &str> {
        self.subframes.keys().map(String::as_str)
    }
}

/// Split a frame path into object id and optional subframe name.
///
/// Splits once, on the first `/`: `"table/corner/a"` is subframe `"corner/a"`
/// of object `"table"`.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((id, subframe)) => (id, Some(subframe)),
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collision_common::Shape;
    use glam::{DQuat, DVec3};
    use std::f64::consts::FRAC_PI_2;

    fn mixed() -> Object {
        let mut obj = Object::new("mix1");
        obj.shapes.push(Shape::cuboid(1.0, 1.0, 1.0));
        obj.shape_poses.push(Transform::IDENTITY);
        obj.shapes.push(Shape::cylinder(0.5, 3.0));
        obj.shape_poses.push(Transform::from_xyz(0.0, 0.0, 2.0));
        obj.subframes
            .insert("frame1".into(), Transform::from_xyz(0.0, 0.0, 2.0));
        obj
    }

    #[test]
    fn new_object_is_pose_only() {
        let obj = Object::new("empty");
        assert!(obj.is_empty());
        assert_eq!(obj.pose, Transform::IDENTITY);
        assert!(obj.subframes.is_empty());
    }

    #[test]
    fn transform_of_object_and_subframe() {
        let mut obj = mixed();
        assert_eq!(obj.transform(None), Some(Transform::IDENTITY));
        assert_eq!(obj.transform(Some("frame1")).unwrap().translation.z, 2.0);
        assert!(obj.transform(Some("missing")).is_none());

        obj.pose = Transform::from_xyz(0.0, 0.0, 1.0);
        assert_eq!(obj.transform(Some("frame1")).unwrap().translation.z, 3.0);
    }

    #[test]
    fn subframe_follows_object_rotation() {
        let mut obj = Object::new("arm");
        obj.subframes
            .insert("tip".into(), Transform::from_xyz(1.0, 0.0, 0.0));
        obj.pose = Transform::new(DVec3::new(0.0, 0.0, 1.0), DQuat::from_rotation_z(FRAC_PI_2));
        let tip = obj.transform(Some("tip")).unwrap();
        assert!(tip.translation.abs_diff_eq(DVec3::new(0.0, 1.0, 1.0), 1e-12));
    }

    #[test]
    fn global_shape_transforms_leave_local_poses() {
        let mut obj = mixed();
        obj.pose = Transform::from_xyz(0.0, 0.0, 1.0);
        let global = obj.global_shape_transforms();
        assert_eq!(global[0].translation.z, 1.0);
        assert_eq!(global[1].translation.z, 3.0);
        assert_eq!(obj.shape_poses[1].translation.z, 2.0);
        assert!(obj.global_shape_transform(2).is_none());
    }

    #[test]
    fn shape_index_uses_identity() {
        let obj = mixed();
        let lookalike = Shape::cuboid(1.0, 1.0, 1.0);
        assert_eq!(obj.shape_index(&obj.shapes[1]), Some(1));
        assert!(!obj.contains_shape(&lookalike));
    }

    #[test]
    fn clone_shares_shapes() {
        let obj = mixed();
        let copy = obj.clone();
        assert!(same_shape(&obj.shapes[0], &copy.shapes[0]));
        assert_eq!(Arc::strong_count(&obj.shapes[0]), 2);
    }

    #[test]
    fn split_path_once() {
        assert_eq!(split_path("mix1"), ("mix1", None));
        assert_eq!(split_path("mix1/frame1"), ("mix1", Some("frame1")));
        assert_eq!(split_path("a/b/c"), ("a", Some("b/c")));
        assert_eq!(split_path("a/"), ("a", Some("")));
    }
}
