//! Effects to materials, images to image references.

use std::fs;
use std::path::{Path, PathBuf};

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use tracing::{debug, warn};
use url::Url;

use crate::collada::{self, ColorOrTexture, FloatOrParam, ShaderType};
use crate::gltf::{Asset, Image, Material, Technique, Texture, TextureIndex};
use crate::util::{Error, Result};

use super::context::ConversionContext;
use super::Options;

fn map_technique(ty: ShaderType) -> Technique {
    match ty {
        ShaderType::Blinn => Technique::Blinn,
        ShaderType::Constant => Technique::Constant,
        ShaderType::Phong => Technique::Phong,
        ShaderType::Lambert => Technique::Lambert,
        ShaderType::Undefined => Technique::Unknown,
    }
}

/// Build a material from the first common profile of an effect.
///
/// Returns `None` for effects without a common profile.
pub fn build_material(
    asset: &mut Asset,
    ctx: &ConversionContext,
    effect: &collada::Effect,
) -> Option<Material> {
    let Some(common) = effect.common_effects.first() else {
        debug!(effect = %effect.unique_id, "effect has no common profile");
        return None;
    };
    if effect.common_effects.len() > 1 {
        debug!(effect = %effect.unique_id, "only the first common profile is used");
    }

    let mut material = Material {
        id: effect.original_id.clone(),
        name: effect.original_id.clone(),
        technique: map_technique(common.shader_type),
        ambient: common.ambient.color().map(|c| c.to_array()),
        emission: common.emission.color().map(|c| c.to_array()),
        specular: common.specular.color().map(|c| c.to_array()),
        ..Default::default()
    };

    match &common.diffuse {
        ColorOrTexture::Color(c) => material.diffuse = Some(c.to_array()),
        ColorOrTexture::Texture(texture) => {
            material.diffuse_texture = diffuse_texture(asset, ctx, common, texture.sampler_id);
        }
        ColorOrTexture::Unspecified => {}
    }

    if let FloatOrParam::Float(shininess) = common.shininess {
        material.shininess = Some(shininess as f32);
    }
    Some(material)
}

fn diffuse_texture(
    asset: &mut Asset,
    ctx: &ConversionContext,
    common: &collada::EffectCommon,
    sampler_id: usize,
) -> Option<TextureIndex> {
    let Some(sampler) = common.samplers.get(sampler_id) else {
        warn!(sampler = sampler_id, "texture sampler not declared, texture dropped");
        return None;
    };
    let Some(&image) = ctx.images.get(&sampler.source_image) else {
        warn!(image = %sampler.source_image, "texture image not converted, texture dropped");
        return None;
    };
    Some(asset.add_texture(Texture { source: image }))
}

/// MIME type from a path's extension.
fn mime_type(path: &str) -> Option<String> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    let ext = match ext.as_str() {
        "jpg" => "jpeg",
        other => other,
    };
    Some(format!("image/{ext}"))
}

/// Resolve an image URI to a file path.
///
/// Relative URIs resolve against the base path, or the current directory
/// without one. Percent-encoding is decoded.
pub fn resolve_image_path(uri: &str, base_path: Option<&Path>) -> Result<PathBuf> {
    let url = match Url::parse(uri) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = match base_path {
                Some(base) if base.is_absolute() => base.to_path_buf(),
                Some(base) => std::env::current_dir()?.join(base),
                None => std::env::current_dir()?,
            };
            let base = Url::from_directory_path(&base)
                .map_err(|_| Error::InvalidUri(format!("base path {}", base.display())))?;
            base.join(uri).map_err(|e| Error::InvalidUri(format!("{uri}: {e}")))?
        }
        Err(e) => return Err(Error::InvalidUri(format!("{uri}: {e}"))),
    };
    if url.scheme() != "file" {
        return Err(Error::InvalidUri(format!("{uri}: not a file URI")));
    }
    url.to_file_path().map_err(|_| Error::InvalidUri(uri.to_string()))
}

/// Convert a source image, embedding its bytes when configured to.
pub fn build_image(options: &Options, image: &collada::Image) -> Result<Image> {
    let mime_type = mime_type(&image.uri);
    if !options.embedded {
        return Ok(Image { id: image.original_id.clone(), uri: image.uri.clone(), mime_type });
    }

    let path = resolve_image_path(&image.uri, options.base_path())?;
    let bytes = fs::read(&path).map_err(|source| Error::ImageRead { path: path.clone(), source })?;
    let mime = mime_type.clone().unwrap_or_else(|| "application/octet-stream".to_string());
    debug!(path = %path.display(), bytes = bytes.len(), "image embedded");
    Ok(Image {
        id: image.original_id.clone(),
        uri: format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&bytes)),
        mime_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collada::{ClassId, Color, EffectCommon, Sampler, UniqueId};
    use crate::gltf::ImageIndex;

    fn image(uri: &str) -> collada::Image {
        collada::Image {
            unique_id: UniqueId::new(ClassId::Image, 1),
            original_id: "img".to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("a/b.JPG").as_deref(), Some("image/jpeg"));
        assert_eq!(mime_type("b.png").as_deref(), Some("image/png"));
        assert_eq!(mime_type("noext"), None);
    }

    #[test]
    fn test_reference_keeps_uri() {
        let out = build_image(&Options::default(), &image("textures/wood.png")).unwrap();
        assert_eq!(out.uri, "textures/wood.png");
        assert_eq!(out.id, "img");
        assert_eq!(out.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_embed_resolves_percent_encoded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("wood grain.jpg"), b"abc").unwrap();
        let options = Options::default().with_embedded(true).with_base_path(dir.path());

        let out = build_image(&options, &image("wood%20grain.jpg")).unwrap();
        assert_eq!(out.uri, "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_embed_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options::default().with_embedded(true).with_base_path(dir.path());
        let err = build_image(&options, &image("missing.png")).unwrap_err();
        assert!(matches!(err, Error::ImageRead { .. }));
    }

    #[test]
    fn test_material_from_effect() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let image_id = UniqueId::new(ClassId::Image, 3);
        ctx.images.insert(image_id, ImageIndex(0));

        let common = EffectCommon {
            shader_type: ShaderType::Phong,
            diffuse: ColorOrTexture::Texture(collada::Texture { sampler_id: 0, texcoord: "UV0".into() }),
            emission: ColorOrTexture::Color(Color::new(0.5, 0.5, 0.5, 1.0)),
            shininess: FloatOrParam::Float(20.0),
            samplers: vec![Sampler { source_image: image_id }],
            ..Default::default()
        };
        let effect = collada::Effect {
            unique_id: UniqueId::new(ClassId::Effect, 1),
            original_id: "fx".to_string(),
            common_effects: vec![common],
        };

        let material = build_material(&mut asset, &ctx, &effect).unwrap();
        assert_eq!(material.id, "fx");
        assert_eq!(material.technique, Technique::Phong);
        assert_eq!(material.diffuse, None);
        assert_eq!(material.diffuse_texture, Some(TextureIndex(0)));
        assert_eq!(asset.textures[0].source, ImageIndex(0));
        assert_eq!(material.emission, Some([0.5, 0.5, 0.5, 1.0]));
        assert_eq!(material.shininess, Some(20.0));
    }

    #[test]
    fn test_effect_without_profile() {
        let mut asset = Asset::new();
        let effect = collada::Effect {
            unique_id: UniqueId::new(ClassId::Effect, 1),
            original_id: "fx".to_string(),
            common_effects: Vec::new(),
        };
        assert!(build_material(&mut asset, &ConversionContext::new(), &effect).is_none());
    }
}
