//! Scene description files (YAML or JSON) loaded into a `World`.
//!
//! ```yaml
//! shapes:
//!   crate: { type: box, size: [1.0, 1.0, 1.0] }
//! objects:
//!   - id: table
//!     pose: { translation: [0.0, 0.0, 1.0] }
//!     shapes:
//!       - shape: { type: box, size: [1.0, 1.0, 0.1] }
//!         pose: { translation: [0.0, 0.0, 0.5] }
//!       - shape: crate
//!     subframes:
//!       corner: { translation: [0.5, 0.5, 0.05] }
//! ```
//!
//! Named shapes are created once and shared by every object that references them.

use collision_common::{Shape, ShapeRef, Transform};
use collision_world::{SubframeMap, World, WorldError};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// Errors from loading a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object '{object}' references unknown shape '{name}'")]
    UnknownShape { object: String, name: String },
    #[error("duplicate object id '{0}'")]
    DuplicateObject(String),
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub shapes: BTreeMap<String, Shape>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneObject {
    pub id: String,
    #[serde(default)]
    pub pose: Transform,
    #[serde(default)]
    pub shapes: Vec<SceneShape>,
    #[serde(default)]
    pub subframes: SubframeMap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneShape {
    pub shape: ShapeSource,
    #[serde(default)]
    pub pose: Transform,
}

/// Either a reference to a named shape or an inline definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapeSource {
    Named(String),
    Inline(Shape),
}

impl SceneFile {
    /// Read a scene; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&text)?)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, SceneError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply every object to `world`, in file order.
    ///
    /// Shape references and ids are checked before anything is written, so
    /// on error `world` is left untouched.
    pub fn populate(&self, world: &mut World) -> Result<(), SceneError> {
        let library: BTreeMap<&str, ShapeRef> = self
            .shapes
            .iter()
            .map(|(name, shape)| (name.as_str(), Arc::new(*shape)))
            .collect();

        let mut seen = BTreeSet::new();
        let mut resolved = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            if world.has_object(&object.id) || !seen.insert(object.id.as_str()) {
                return Err(SceneError::DuplicateObject(object.id.clone()));
            }
            let mut shapes = Vec::with_capacity(object.shapes.len());
            let mut poses = Vec::with_capacity(object.shapes.len());
            for entry in &object.shapes {
                let shape = match &entry.shape {
                    ShapeSource::Named(name) => library.get(name.as_str()).cloned().ok_or_else(|| {
                        SceneError::UnknownShape {
                            object: object.id.clone(),
                            name: name.clone(),
                        }
                    })?,
                    ShapeSource::Inline(shape) => Arc::new(*shape),
                };
                shapes.push(shape);
                poses.push(entry.pose);
            }
            resolved.push((object, shapes, poses));
        }

        for (object, shapes, poses) in resolved {
            if shapes.is_empty() {
                world.set_object_pose(&object.id, object.pose);
            } else {
                world.add_to_object_with_pose(&object.id, object.pose, &shapes, &poses)?;
            }
            if !object.subframes.is_empty() {
                world.set_subframes_of_object(&object.id, object.subframes.clone());
            }
            tracing::debug!(id = %object.id, shapes = shapes.len(), "scene object loaded");
        }
        Ok(())
    }

    /// Load and populate a fresh world.
    pub fn build_world(&self) -> Result<World, SceneError> {
        let mut world = World::new();
        self.populate(&mut world)?;
        Ok(world)
    }
}
