use collision_common::Transform;
use collision_world::World;
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// command-line output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let mut summary = WorldSummary {
            object_count: world.size(),
            observer_count: world.observer_count(),
            ..WorldSummary::default()
        };
        for (_, obj) in world.iter() {
            summary.shape_count += obj.shape_count();
            summary.subframe_count += obj.subframes.len();
            if obj.is_empty() {
                summary.pose_only_count += 1;
            }
        }
        summary
    }

    /// Describe one object: pose, shapes in both frames, subframe names.
    pub fn inspect_object(world: &World, id: &str) -> Option<ObjectInfo> {
        let obj = world.get_object(id)?;
        let shapes = obj
            .shapes
            .iter()
            .zip(&obj.shape_poses)
            .map(|(shape, local)| ShapeInfo {
                kind: shape.kind(),
                local: translation_of(local),
                global: translation_of(&(obj.pose * *local)),
            })
            .collect();
        Some(ObjectInfo {
            id: obj.id.clone(),
            position: translation_of(&obj.pose),
            rotation: obj.pose.rotation.to_array(),
            shapes,
            subframes: obj.subframe_names().map(str::to_string).collect(),
        })
    }

    /// List all object ids in sorted order.
    pub fn list_objects(world: &World) -> Vec<String> {
        world.object_ids()
    }
}

fn translation_of(t: &Transform) -> [f64; 3] {
    t.translation.to_array()
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorldSummary {
    pub object_count: usize,
    pub shape_count: usize,
    pub pose_only_count: usize,
    pub subframe_count: usize,
    pub observer_count: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: objects={} shapes={} pose_only={} subframes={} observers={}",
            self.object_count,
            self.shape_count,
            self.pose_only_count,
            self.subframe_count,
            self.observer_count
        )
    }
}

/// One shape slot of an inspected object.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeInfo {
    pub kind: &'static str,
    /// Translation in the object-local frame.
    pub local: [f64; 3],
    /// Translation in the world frame.
    pub global: [f64; 3],
}

/// Detailed info about a single object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub id: String,
    pub position: [f64; 3],
    pub rotation: [f64; 4],
    pub shapes: Vec<ShapeInfo>,
    pub subframes: Vec<String>,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Object [{}] pos=({:.2}, {:.2}, {:.2}) shapes={}",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.shapes.len(),
        )?;
        if !self.subframes.is_empty() {
            write!(f, " subframes=[{}]", self.subframes.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collision_common::Shape;
    use collision_world::SubframeMap;

    #[test]
    fn summary_empty_world() {
        let world = World::new();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.object_count, 0);
        assert_eq!(summary.shape_count, 0);
    }

    #[test]
    fn summary_with_objects() {
        let mut world = World::new();
        world.add_to_object("a", Shape::sphere(1.0), Transform::IDENTITY);
        world.add_to_object("a", Shape::sphere(2.0), Transform::IDENTITY);
        world.set_object_pose("marker", Transform::IDENTITY);
        world.add_observer(|_, _| {});

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.object_count, 2);
        assert_eq!(summary.shape_count, 2);
        assert_eq!(summary.pose_only_count, 1);
        assert_eq!(summary.observer_count, 1);
    }

    #[test]
    fn inspect_object_found() {
        let mut world = World::new();
        world.set_object_pose("table", Transform::from_xyz(1.0, 2.0, 3.0));
        world.add_to_object(
            "table",
            Shape::cuboid(1.0, 1.0, 0.1),
            Transform::from_xyz(0.0, 0.0, 0.5),
        );
        let mut subframes = SubframeMap::new();
        subframes.insert("corner".into(), Transform::IDENTITY);
        world.set_subframes_of_object("table", subframes);

        let info = WorldInspector::inspect_object(&world, "table").unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.shapes[0].kind, "box");
        assert_eq!(info.shapes[0].local, [0.0, 0.0, 0.5]);
        assert_eq!(info.shapes[0].global, [1.0, 2.0, 3.5]);
        assert_eq!(info.subframes, vec!["corner"]);
        assert!(info.to_string().contains("subframes=[corner]"));
    }

    #[test]
    fn inspect_object_not_found() {
        let world = World::new();
        assert!(WorldInspector::inspect_object(&world, "ghost").is_none());
    }

    #[test]
    fn list_objects_sorted() {
        let mut world = World::new();
        world.set_object_pose("b", Transform::IDENTITY);
        world.set_object_pose("a", Transform::IDENTITY);
        assert_eq!(WorldInspector::list_objects(&world), vec!["a", "b"]);
    }

    #[test]
    fn summary_serializes() {
        let world = World::new();
        let json = serde_json::to_string(&WorldInspector::summary(&world)).unwrap();
        assert!(json.contains("\"object_count\":0"));
        assert!(WorldInspector::summary(&world).to_string().contains("objects=0"));
    }
}
