//! Source materials, effects and images.

use serde::{Deserialize, Serialize};

use super::UniqueId;

/// A material, which only instantiates an effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    #[serde(default)]
    pub name: String,
    pub instantiated_effect: UniqueId,
}

/// RGBA color in double precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "Color::opaque")]
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn opaque() -> f64 {
        1.0
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }
}

/// Texture reference inside an effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    /// Index into [`EffectCommon::samplers`].
    pub sampler_id: usize,
    #[serde(default)]
    pub texcoord: String,
}

/// Either a flat color or a texture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColorOrTexture {
    #[default]
    Unspecified,
    Color(Color),
    Texture(Texture),
}

impl ColorOrTexture {
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn texture(&self) -> Option<&Texture> {
        match self {
            Self::Texture(t) => Some(t),
            _ => None,
        }
    }
}

/// A float literal or a parameter reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FloatOrParam {
    #[default]
    Unspecified,
    Float(f64),
    Param(String),
}

/// Fixed-function shading model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShaderType {
    Blinn,
    Constant,
    Phong,
    Lambert,
    #[default]
    Undefined,
}

/// Texture sampler declared by an effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sampler {
    pub source_image: UniqueId,
}

/// Profile-common effect parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectCommon {
    #[serde(default)]
    pub shader_type: ShaderType,
    #[serde(default)]
    pub ambient: ColorOrTexture,
    #[serde(default)]
    pub diffuse: ColorOrTexture,
    #[serde(default)]
    pub emission: ColorOrTexture,
    #[serde(default)]
    pub specular: ColorOrTexture,
    #[serde(default)]
    pub shininess: FloatOrParam,
    #[serde(default)]
    pub samplers: Vec<Sampler>,
}

/// An effect with its common profiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    #[serde(default)]
    pub common_effects: Vec<EffectCommon>,
}

/// An image referenced by URI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    /// URI as written in the document, possibly relative and percent-encoded.
    pub uri: String,
}
