//! Source animations and animation lists.
//!
//! An animation curve holds raw keyframe data without knowing what it
//! drives. An animation list binds curves to one animated transform
//! operation and tells which part of it each curve drives.

use serde::{Deserialize, Serialize};

use super::{FloatOrDoubleArray, UniqueId};

/// Keyframe interpolation of a curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationType {
    #[default]
    Linear,
    Step,
    Bezier,
    Hermite,
    Cardinal,
    Bspline,
    Mixed,
    Unknown,
}

/// Keyframed values over time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    /// Key times in seconds.
    pub input_values: FloatOrDoubleArray,
    /// Key values, packed per key.
    pub output_values: FloatOrDoubleArray,
    #[serde(default)]
    pub interpolation: InterpolationType,
}

/// Animation delivered by the parser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Animation {
    Curve(AnimationCurve),
    Formula {
        unique_id: UniqueId,
        #[serde(default)]
        original_id: String,
    },
}

impl Animation {
    pub fn unique_id(&self) -> UniqueId {
        match self {
            Self::Curve(curve) => curve.unique_id,
            Self::Formula { unique_id, .. } => *unique_id,
        }
    }
}

/// What part of the animated operation a curve drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationClass {
    #[serde(rename = "UNKNOWN_CLASS")]
    UnknownClass,
    #[serde(rename = "TIME")]
    Time,
    #[serde(rename = "POSITION_XYZ")]
    PositionXyz,
    #[serde(rename = "POSITION_X")]
    PositionX,
    #[serde(rename = "POSITION_Y")]
    PositionY,
    #[serde(rename = "POSITION_Z")]
    PositionZ,
    #[serde(rename = "COLOR_RGB")]
    ColorRgb,
    #[serde(rename = "COLOR_RGBA")]
    ColorRgba,
    #[serde(rename = "COLOR_R")]
    ColorR,
    #[serde(rename = "COLOR_G")]
    ColorG,
    #[serde(rename = "COLOR_B")]
    ColorB,
    #[serde(rename = "COLOR_A")]
    ColorA,
    #[serde(rename = "AXISANGLE")]
    AxisAngle,
    #[serde(rename = "ANGLE")]
    Angle,
    #[serde(rename = "MATRIX4X4")]
    Matrix4x4,
    #[serde(rename = "ARRAY_ELEMENT_1D")]
    ArrayElement1D,
    #[serde(rename = "ARRAY_ELEMENT_2D")]
    ArrayElement2D,
    #[serde(rename = "FLOAT")]
    Float,
}

/// One curve bound to the animated operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationBinding {
    pub animation: UniqueId,
    pub animation_class: AnimationClass,
}

/// Bindings of curves to one animated transform operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationList {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub bindings: Vec<AnimationBinding>,
}

impl AnimationList {
    pub fn new(unique_id: UniqueId) -> Self {
        Self { unique_id, bindings: Vec::new() }
    }

    pub fn with_binding(mut self, animation: UniqueId, animation_class: AnimationClass) -> Self {
        self.bindings.push(AnimationBinding { animation, animation_class });
        self
    }
}
