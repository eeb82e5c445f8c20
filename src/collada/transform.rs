//! Node transform operations.
//!
//! A source node carries an ordered list of transform operations. Each
//! operation converts to a 4x4 matrix on its own; a list composes by
//! left-to-right multiplication, so the first operation is outermost.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use super::UniqueId;
use crate::util::dmat4_from_row_major;

/// A single transform operation.
///
/// Angles are in degrees, matrices are row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformOp {
    /// Rotation by `angle` degrees around `axis`.
    Rotate { axis: DVec3, angle: f64 },
    Translate { translation: DVec3 },
    Scale { scale: DVec3 },
    /// Full matrix, 16 row-major values.
    Matrix { rows: [f64; 16] },
    /// Camera-style placement at `eye` looking toward `center`.
    Lookat { eye: DVec3, center: DVec3, up: DVec3 },
}

impl TransformOp {
    /// Create a rotation (angle in degrees).
    pub fn rotate(axis: DVec3, angle: f64) -> Self {
        Self::Rotate { axis, angle }
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self::Translate { translation: DVec3::new(x, y, z) }
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::Scale { scale: DVec3::new(x, y, z) }
    }

    /// Create a matrix operation from row-major values.
    pub fn matrix(rows: [f64; 16]) -> Self {
        Self::Matrix { rows }
    }

    pub fn lookat(eye: DVec3, center: DVec3, up: DVec3) -> Self {
        Self::Lookat { eye, center, up }
    }

    /// Convert this operation into a column-major matrix.
    pub fn to_matrix(&self) -> DMat4 {
        match self {
            Self::Rotate { axis, angle } => {
                let axis = axis.normalize_or_zero();
                if axis == DVec3::ZERO {
                    return DMat4::IDENTITY;
                }
                DMat4::from_quat(DQuat::from_axis_angle(axis, angle.to_radians()))
            }
            Self::Translate { translation } => DMat4::from_translation(*translation),
            Self::Scale { scale } => DMat4::from_scale(*scale),
            Self::Matrix { rows } => dmat4_from_row_major(rows),
            Self::Lookat { eye, center, up } => {
                if eye == center {
                    return DMat4::IDENTITY;
                }
                // The view matrix maps world to eye space; the node transform
                // places the object in the world, so it is the inverse.
                DMat4::look_at_rh(*eye, *center, *up).inverse()
            }
        }
    }

    /// Rotation axis, for operations that rotate about a single axis.
    pub fn rotation_axis(&self) -> Option<DVec3> {
        match self {
            Self::Rotate { axis, .. } => {
                let axis = axis.normalize_or_zero();
                (axis != DVec3::ZERO).then_some(axis)
            }
            _ => None,
        }
    }
}

/// A transform operation as it appears on a node, optionally animated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(flatten)]
    pub op: TransformOp,
    /// Animation list driving this operation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_list: Option<UniqueId>,
}

impl Transformation {
    pub fn new(op: TransformOp) -> Self {
        Self { op, animation_list: None }
    }

    pub fn animated(op: TransformOp, animation_list: UniqueId) -> Self {
        Self { op, animation_list: Some(animation_list) }
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.animation_list.is_some()
    }

    #[inline]
    pub fn to_matrix(&self) -> DMat4 {
        self.op.to_matrix()
    }
}

impl From<TransformOp> for Transformation {
    fn from(op: TransformOp) -> Self {
        Self::new(op)
    }
}

/// Compose operations into one matrix (left-to-right multiplication).
pub fn flatten<'a, I>(ops: I) -> DMat4
where
    I: IntoIterator<Item = &'a TransformOp>,
{
    ops.into_iter().fold(DMat4::IDENTITY, |acc, op| acc * op.to_matrix())
}
