use glam::{DQuat, DVec3, DVec4};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Rejected transform input.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("rotation quaternion must be finite and non-zero, got {0:?}")]
    DegenerateRotation(DQuat),
}

/// Rigid transform: rotation followed by translation.
///
/// `a * b` applies `b` first, then `a`, so a pose expressed in frame `a`
/// composes as `parent * child`.
///
/// `rotation` is kept unit length: the constructors and deserialization
/// normalize it, and deserialization rejects a zero or non-finite quaternion.
/// Code writing the public fields directly must keep it unit length too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransform")]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
}

/// Wire form of [`Transform`] before the rotation is checked.
#[derive(Deserialize)]
#[serde(default)]
struct RawTransform {
    translation: DVec3,
    rotation: DQuat,
}

impl Default for RawTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }
}

impl TryFrom<RawTransform> for Transform {
    type Error = TransformError;

    fn try_from(raw: RawTransform) -> Result<Self, Self::Error> {
        Self::try_new(raw.translation, raw.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn normalize_rotation(rotation: DQuat) -> Result<DQuat, TransformError> {
    // Already unit within rounding: keep the exact bits.
    if (rotation.length_squared() - 1.0).abs() <= 1e-12 {
        return Ok(rotation);
    }
    DVec4::from(rotation)
        .try_normalize()
        .map(DQuat::from_vec4)
        .ok_or(TransformError::DegenerateRotation(rotation))
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Build a transform, normalizing `rotation`. A zero or non-finite
    /// rotation falls back to identity; use [`Transform::try_new`] to reject it.
    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation: normalize_rotation(rotation).unwrap_or(DQuat::IDENTITY),
        }
    }

    pub fn try_new(translation: DVec3, rotation: DQuat) -> Result<Self, TransformError> {
        Ok(Self {
            translation,
            rotation: normalize_rotation(rotation)?,
        })
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Shorthand for a pure translation.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::from_translation(DVec3::new(x, y, z))
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self::new(DVec3::ZERO, rotation)
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * other.translation,
            rotation: self.rotation * other.rotation,
        }
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: rotation * -self.translation,
            rotation,
        }
    }

    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.translation + self.rotation * point
    }

    /// Approximate equality, tolerant to float drift from repeated composition.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.translation.abs_diff_eq(other.translation, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        self.compose(rhs)
    }
}
