//! Source objects the writer accepts without producing output.

use serde::{Deserialize, Serialize};

use super::UniqueId;

/// Document-level metadata from `<asset>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub authoring_tool: Option<String>,
    #[serde(default)]
    pub unit_meter: Option<f64>,
    #[serde(default)]
    pub up_axis: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    #[default]
    Skin,
    Morph,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub controller_type: ControllerType,
    /// Geometry the controller deforms.
    #[serde(default)]
    pub source: Option<UniqueId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinControllerData {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub joint_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Formulas {
    #[serde(default)]
    pub formulas: Vec<UniqueId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicsScene {
    #[serde(default)]
    pub kinematics_models: Vec<UniqueId>,
}
