//! Unique identifiers for source objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a source object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    Node,
    VisualScene,
    Mesh,
    Material,
    Effect,
    Image,
    Animation,
    AnimationList,
    Camera,
    Light,
    Controller,
    Formula,
    KinematicsScene,
}

impl ClassId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::VisualScene => "visual_scene",
            Self::Mesh => "mesh",
            Self::Material => "material",
            Self::Effect => "effect",
            Self::Image => "image",
            Self::Animation => "animation",
            Self::AnimationList => "animation_list",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::Controller => "controller",
            Self::Formula => "formula",
            Self::KinematicsScene => "kinematics_scene",
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier assigned by the parser to every source object.
///
/// Ids are unique within one document. Objects reference each other
/// exclusively through these ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueId {
    pub class: ClassId,
    pub object_id: u64,
}

impl UniqueId {
    #[inline]
    pub const fn new(class: ClassId, object_id: u64) -> Self {
        Self { class, object_id }
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.class, self.object_id)
    }
}
