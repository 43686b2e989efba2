use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape geometry, expressed in the shape's own frame.
///
/// The world never inspects or validates these values; it only shares them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere { radius: f64 },
    Box { size: [f64; 3] },
    Cylinder { radius: f64, length: f64 },
    Cone { radius: f64, length: f64 },
    /// Plane `a*x + b*y + c*z + d = 0`.
    Plane { a: f64, b: f64, c: f64, d: f64 },
}

impl Shape {
    pub fn sphere(radius: f64) -> ShapeRef {
        Arc::new(Self::Sphere { radius })
    }

    pub fn cuboid(x: f64, y: f64, z: f64) -> ShapeRef {
        Arc::new(Self::Box { size: [x, y, z] })
    }

    pub fn cylinder(radius: f64, length: f64) -> ShapeRef {
        Arc::new(Self::Cylinder { radius, length })
    }

    /// Short lowercase name of the primitive, for logs and tooling.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Cone { .. } => "cone",
            Self::Plane { .. } => "plane",
        }
    }
}

/// Shared, immutable handle to shape geometry.
pub type ShapeRef = Arc<Shape>;

/// Identity comparison: true only if both handles point at the same allocation.
///
/// Two shapes with equal geometry are still different shapes.
pub fn same_shape(a: &ShapeRef, b: &ShapeRef) -> bool {
    Arc::ptr_eq(a, b)
}
