//! Target animations: channels driving node paths through samplers.

use super::{AccessorIndex, NodeIndex};

/// Node property a channel animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Path {
    Translation,
    Rotation,
    Scale,
}

impl Path {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

impl Interpolation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "LINEAR",
            Self::Step => "STEP",
        }
    }
}

/// Keyframe times and values.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    pub id: String,
    /// Key times, SCALAR.
    pub input: AccessorIndex,
    /// Key values, shaped by the animated path.
    pub output: AccessorIndex,
    pub interpolation: Interpolation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub node: NodeIndex,
    pub path: Path,
}

/// One animated node property with its own sampler.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub target: Target,
    pub sampler: Sampler,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    pub name: String,
    pub channels: Vec<Channel>,
}
