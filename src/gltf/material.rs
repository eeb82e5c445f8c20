//! Target materials, textures and images.

use super::{ImageIndex, TextureIndex};

/// Shading model of a common-profile material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Technique {
    Blinn,
    Constant,
    Phong,
    Lambert,
    #[default]
    Unknown,
}

impl Technique {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blinn => "BLINN",
            Self::Constant => "CONSTANT",
            Self::Phong => "PHONG",
            Self::Lambert => "LAMBERT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Material with the common fixed-function inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub technique: Technique,
    pub ambient: Option<[f32; 4]>,
    pub diffuse: Option<[f32; 4]>,
    pub diffuse_texture: Option<TextureIndex>,
    pub emission: Option<[f32; 4]>,
    pub specular: Option<[f32; 4]>,
    pub shininess: Option<f32>,
}

impl Material {
    /// Roughness equivalent to the specular exponent.
    pub fn roughness(&self) -> f32 {
        match self.shininess {
            Some(s) if s > 0.0 => (2.0 / (s + 2.0)).sqrt(),
            _ => 1.0,
        }
    }
}

/// An image used by a texture, with a file or data URI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub id: String,
    pub uri: String,
    pub mime_type: Option<String>,
}

/// A sampled image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    pub source: ImageIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roughness() {
        let m = Material { shininess: Some(0.0), ..Default::default() };
        assert_eq!(m.roughness(), 1.0);
        let m = Material { shininess: Some(98.0), ..Default::default() };
        assert!((m.roughness() - 0.141_421_36).abs() < 1e-6);
    }
}
