//! glTF 2.0 JSON serialization of an [`Asset`].
//!
//! All buffer views go into one buffer, each start aligned to 4 bytes.
//! Only accessors packed into a view are written; provisional accessors
//! that were never bound are left out and the remaining ones renumbered.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, warn};

use super::*;
use crate::util::Result;

/// How the binary buffer is referenced from the JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// URI of an external `.bin` file. `None` embeds the buffer as a
    /// base64 data URI.
    pub buffer_uri: Option<String>,
    pub pretty: bool,
}

/// Serialized document plus its external buffer, if any.
#[derive(Clone, Debug)]
pub struct Serialized {
    pub json: String,
    /// Buffer bytes, present when `buffer_uri` was set.
    pub bin: Option<Vec<u8>>,
}

// ============================================================================
// JSON schema
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Root {
    asset: JsonAsset,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scenes: Vec<JsonScene>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nodes: Vec<JsonNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    meshes: Vec<JsonMesh>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    materials: Vec<JsonMaterial>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    textures: Vec<JsonTexture>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    samplers: Vec<JsonSampler>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<JsonImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    animations: Vec<JsonAnimation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    accessors: Vec<JsonAccessor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buffer_views: Vec<JsonBufferView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buffers: Vec<JsonBuffer>,
}

#[derive(Serialize)]
struct JsonAsset {
    version: String,
    generator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extras: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct JsonScene {
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct JsonNode {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matrix: Option<[f32; 16]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<[f32; 3]>,
}

#[derive(Serialize)]
struct JsonMesh {
    name: String,
    primitives: Vec<JsonPrimitive>,
}

#[derive(Serialize)]
struct JsonPrimitive {
    attributes: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indices: Option<usize>,
    mode: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMaterial {
    name: String,
    pbr_metallic_roughness: JsonPbr,
    #[serde(skip_serializing_if = "Option::is_none")]
    emissive_factor: Option<[f32; 3]>,
    extras: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPbr {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_color_factor: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_color_texture: Option<JsonTextureInfo>,
    metallic_factor: f32,
    roughness_factor: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTextureInfo {
    index: usize,
    tex_coord: u32,
}

#[derive(Serialize)]
struct JsonTexture {
    sampler: usize,
    source: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSampler {
    mag_filter: u32,
    min_filter: u32,
    wrap_s: u32,
    wrap_t: u32,
}

impl Default for JsonSampler {
    fn default() -> Self {
        // LINEAR, LINEAR_MIPMAP_LINEAR, REPEAT, REPEAT
        Self { mag_filter: 9729, min_filter: 9987, wrap_s: 10497, wrap_t: 10497 }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonImage {
    uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

#[derive(Serialize)]
struct JsonAnimation {
    name: String,
    channels: Vec<JsonChannel>,
    samplers: Vec<JsonAnimationSampler>,
}

#[derive(Serialize)]
struct JsonChannel {
    sampler: usize,
    target: JsonTarget,
}

#[derive(Serialize)]
struct JsonTarget {
    node: usize,
    path: &'static str,
}

#[derive(Serialize)]
struct JsonAnimationSampler {
    input: usize,
    output: usize,
    interpolation: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonAccessor {
    buffer_view: usize,
    byte_offset: usize,
    component_type: u16,
    count: usize,
    #[serde(rename = "type")]
    ty: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Vec<f32>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBuffer {
    byte_length: usize,
    uri: String,
}

// ============================================================================
// Conversion
// ============================================================================

/// Serialize `asset` as glTF 2.0 JSON.
pub fn to_json(asset: &Asset, options: &SerializeOptions) -> Result<Serialized> {
    let (buffer, buffer_views, view_map) = pack_buffer(asset);
    let (accessors, accessor_map) = map_accessors(asset, &view_map);
    let nodes = map_nodes(asset);

    let meshes = asset
        .meshes
        .iter()
        .map(|mesh| JsonMesh {
            name: mesh.id.clone(),
            primitives: mesh
                .primitives
                .iter()
                .map(|p| JsonPrimitive {
                    attributes: p
                        .attributes
                        .iter()
                        .filter_map(|(semantic, a)| {
                            accessor_map[a.0].map(|i| (semantic.to_string(), i))
                        })
                        .collect(),
                    indices: accessor_map[p.indices.0],
                    mode: p.mode.gl_enum(),
                    material: p.material.map(|m| m.0),
                })
                .collect(),
        })
        .collect();

    let materials = asset.materials.iter().map(map_material).collect();
    let textures: Vec<JsonTexture> = asset
        .textures
        .iter()
        .map(|t| JsonTexture { sampler: 0, source: t.source.0 })
        .collect();
    let samplers = if textures.is_empty() { Vec::new() } else { vec![JsonSampler::default()] };
    let images = asset
        .images
        .iter()
        .map(|image| JsonImage { uri: image.uri.clone(), mime_type: image.mime_type.clone() })
        .collect();

    let animations = asset
        .animations
        .iter()
        .map(|animation| map_animation(animation, &accessor_map))
        .collect();

    let (buffers, bin) = if buffer.is_empty() {
        (Vec::new(), None)
    } else {
        match &options.buffer_uri {
            Some(uri) => (vec![JsonBuffer { byte_length: buffer.len(), uri: uri.clone() }], Some(buffer)),
            None => {
                let uri = format!(
                    "data:application/octet-stream;base64,{}",
                    BASE64_STANDARD.encode(&buffer)
                );
                (vec![JsonBuffer { byte_length: buffer.len(), uri }], None)
            }
        }
    };

    let extras = asset
        .info
        .authoring_tool
        .as_ref()
        .map(|tool| serde_json::json!({ "authoringTool": tool }));

    let root = Root {
        asset: JsonAsset {
            version: asset.info.version.clone(),
            generator: asset.info.generator.clone(),
            copyright: asset.info.copyright.clone(),
            extras,
        },
        scene: asset.default_scene,
        scenes: asset
            .scenes
            .iter()
            .map(|s| JsonScene { name: s.name.clone(), nodes: s.nodes.iter().map(|n| n.0).collect() })
            .collect(),
        nodes,
        meshes,
        materials,
        textures,
        samplers,
        images,
        animations,
        accessors,
        buffer_views,
        buffers,
    };

    let json = if options.pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };
    Ok(Serialized { json, bin })
}

/// Write `asset` to `path`, with the buffer in a sibling `.bin` file
/// unless `embed_buffer` is set.
pub fn write_file<P: AsRef<Path>>(asset: &Asset, path: P, embed_buffer: bool) -> Result<()> {
    let path = path.as_ref();
    let bin_path = path.with_extension("bin");
    let buffer_uri = if embed_buffer {
        None
    } else {
        bin_path.file_name().map(|name| name.to_string_lossy().into_owned())
    };
    let options = SerializeOptions { buffer_uri, pretty: true };
    let serialized = to_json(asset, &options)?;

    fs::write(path, serialized.json)?;
    if let Some(bin) = serialized.bin {
        fs::write(&bin_path, bin)?;
    }
    debug!(path = %path.display(), "glTF written");
    Ok(())
}

fn pack_buffer(asset: &Asset) -> (Vec<u8>, Vec<JsonBufferView>, Vec<Option<usize>>) {
    let mut buffer = Vec::new();
    let mut views = Vec::new();
    let mut view_map = Vec::with_capacity(asset.buffer_views.len());

    for view in &asset.buffer_views {
        if view.is_empty() {
            view_map.push(None);
            continue;
        }
        let offset = buffer.len().next_multiple_of(ACCESSOR_ALIGNMENT);
        buffer.resize(offset, 0);
        buffer.extend_from_slice(&view.data);
        view_map.push(Some(views.len()));
        views.push(JsonBufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: view.byte_length(),
            target: view.target.map(BufferViewTarget::gl_enum),
        });
    }
    (buffer, views, view_map)
}

fn map_accessors(asset: &Asset, view_map: &[Option<usize>]) -> (Vec<JsonAccessor>, Vec<Option<usize>>) {
    let mut accessors = Vec::new();
    let mut accessor_map = Vec::with_capacity(asset.accessors.len());

    for accessor in &asset.accessors {
        let AccessorStorage::View { buffer_view, byte_offset } = accessor.storage else {
            accessor_map.push(None);
            continue;
        };
        let Some(view) = view_map.get(buffer_view.0).copied().flatten() else {
            accessor_map.push(None);
            continue;
        };
        accessor_map.push(Some(accessors.len()));
        accessors.push(JsonAccessor {
            buffer_view: view,
            byte_offset,
            component_type: accessor.component_type.gl_enum(),
            count: accessor.count,
            ty: accessor.ty.name(),
            min: accessor.min.clone(),
            max: accessor.max.clone(),
        });
    }
    (accessors, accessor_map)
}

fn map_nodes(asset: &Asset) -> Vec<JsonNode> {
    let mut nodes: Vec<JsonNode> = asset.nodes.iter().map(map_node).collect();

    // A glTF node draws one mesh; further meshes hang off extra children.
    for (i, node) in asset.nodes.iter().enumerate() {
        for (k, mesh) in node.meshes.iter().enumerate().skip(1) {
            let child = nodes.len();
            nodes.push(JsonNode {
                name: format!("{}_mesh{}", node.id, k),
                children: Vec::new(),
                mesh: Some(mesh.0),
                matrix: None,
                translation: None,
                rotation: None,
                scale: None,
            });
            nodes[i].children.push(child);
        }
    }
    nodes
}

fn map_node(node: &Node) -> JsonNode {
    let mut json = JsonNode {
        name: node.id.clone(),
        children: node.children.iter().map(|c| c.0).collect(),
        mesh: node.meshes.first().map(|m| m.0),
        matrix: None,
        translation: None,
        rotation: None,
        scale: None,
    };
    match node.transform {
        Transform::Matrix(m) => {
            if m != glam::Mat4::IDENTITY {
                json.matrix = Some(m.to_cols_array());
            }
        }
        Transform::Trs { translation, rotation, scale } => {
            json.translation = Some(translation.to_array());
            json.rotation = Some(rotation.to_array());
            json.scale = Some(scale.to_array());
        }
    }
    json
}

fn map_material(material: &Material) -> JsonMaterial {
    JsonMaterial {
        name: material.id.clone(),
        pbr_metallic_roughness: JsonPbr {
            base_color_factor: material.diffuse,
            base_color_texture: material
                .diffuse_texture
                .map(|t| JsonTextureInfo { index: t.0, tex_coord: 0 }),
            metallic_factor: 0.0,
            roughness_factor: material.roughness(),
        },
        emissive_factor: material.emission.map(|[r, g, b, _]| [r, g, b]),
        extras: material_extras(material),
    }
}

/// Common-profile inputs with no PBR counterpart.
fn material_extras(material: &Material) -> serde_json::Value {
    let mut extras = serde_json::Map::new();
    extras.insert("technique".into(), material.technique.name().into());
    if let Some(ambient) = material.ambient {
        extras.insert("ambient".into(), serde_json::json!(ambient));
    }
    if let Some(specular) = material.specular {
        extras.insert("specular".into(), serde_json::json!(specular));
    }
    if let Some(shininess) = material.shininess {
        extras.insert("shininess".into(), serde_json::json!(shininess));
    }
    serde_json::Value::Object(extras)
}

fn map_animation(animation: &Animation, accessor_map: &[Option<usize>]) -> JsonAnimation {
    let mut channels = Vec::with_capacity(animation.channels.len());
    let mut samplers = Vec::with_capacity(animation.channels.len());

    for channel in &animation.channels {
        let sampler = &channel.sampler;
        let (Some(input), Some(output)) = (accessor_map[sampler.input.0], accessor_map[sampler.output.0]) else {
            warn!(sampler = %sampler.id, "sampler data not packed, channel dropped");
            continue;
        };
        channels.push(JsonChannel {
            sampler: samplers.len(),
            target: JsonTarget { node: channel.target.node.0, path: channel.target.path.name() },
        });
        samplers.push(JsonAnimationSampler {
            input,
            output,
            interpolation: sampler.interpolation.name(),
        });
    }

    JsonAnimation { name: animation.name.clone(), channels, samplers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::AccessorType;
    use std::collections::BTreeMap as Map;

    fn triangle_asset() -> Asset {
        let mut asset = Asset::new();
        let indices = asset.pack(asset.indices_view(), AccessorType::Scalar, &[0u16, 1, 2]);
        let positions = asset.pack(
            asset.attributes_view(),
            AccessorType::Vec3,
            &[0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        );
        let mut attributes = Map::new();
        attributes.insert(Semantic::Position, positions);
        let mut mesh = Mesh::new("tri", "tri");
        mesh.primitives.push(Primitive {
            mode: Mode::Triangles,
            indices,
            attributes,
            material: None,
            material_symbol: 0,
        });
        let mesh = asset.add_mesh(mesh);
        let mut node = Node::new("root");
        node.meshes.push(mesh);
        node.meshes.push(mesh);
        let root = asset.add_node(node);
        asset.default_scene_mut().nodes.push(root);
        asset
    }

    #[test]
    fn test_embedded_buffer() {
        let asset = triangle_asset();
        let out = to_json(&asset, &SerializeOptions::default()).unwrap();
        assert!(out.bin.is_none());
        let value: serde_json::Value = serde_json::from_str(&out.json).unwrap();
        assert_eq!(value["asset"]["version"], "2.0");
        assert_eq!(value["scene"], 0);
        let uri = value["buffers"][0]["uri"].as_str().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
        // 6 index bytes padded to 8, then 36 position bytes
        assert_eq!(value["buffers"][0]["byteLength"], 44);
        assert_eq!(value["bufferViews"][1]["byteOffset"], 8);
        assert_eq!(value["accessors"][1]["type"], "VEC3");
        assert_eq!(value["accessors"][1]["max"], serde_json::json!([1.0, 1.0, 0.0]));
        assert_eq!(value["meshes"][0]["primitives"][0]["attributes"]["POSITION"], 1);
    }

    #[test]
    fn test_extra_meshes_become_children() {
        let asset = triangle_asset();
        let out = to_json(&asset, &SerializeOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.json).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["mesh"], 0);
        assert_eq!(nodes[0]["children"], serde_json::json!([1]));
        assert_eq!(nodes[1]["name"], "root_mesh1");
        // identity matrix is omitted
        assert!(nodes[0].get("matrix").is_none());
    }

    #[test]
    fn test_owned_accessors_are_skipped() {
        let mut asset = triangle_asset();
        asset.add_accessor(Accessor::owned(AccessorType::Scalar, &[1.0f32, 2.0]));
        let out = to_json(&asset, &SerializeOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.json).unwrap();
        assert_eq!(value["accessors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_external_buffer() {
        let asset = triangle_asset();
        let options = SerializeOptions { buffer_uri: Some("out.bin".into()), pretty: false };
        let out = to_json(&asset, &options).unwrap();
        assert_eq!(out.bin.as_ref().map(Vec::len), Some(44));
        assert!(out.json.contains(r#""uri":"out.bin""#));
    }

    #[test]
    fn test_material_extras() {
        let mut asset = triangle_asset();
        asset.add_material(Material {
            id: "shiny".into(),
            technique: Technique::Phong,
            ambient: Some([0.25, 0.25, 0.25, 1.0]),
            specular: Some([1.0, 1.0, 1.0, 1.0]),
            shininess: Some(30.0),
            ..Default::default()
        });
        asset.add_material(Material { id: "flat".into(), ..Default::default() });
        let out = to_json(&asset, &SerializeOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.json).unwrap();

        let extras = &value["materials"][0]["extras"];
        assert_eq!(extras["technique"], "PHONG");
        assert_eq!(extras["ambient"], serde_json::json!([0.25, 0.25, 0.25, 1.0]));
        assert_eq!(extras["specular"], serde_json::json!([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(extras["shininess"], 30.0);
        assert_eq!(value["materials"][0]["pbrMetallicRoughness"]["roughnessFactor"], 0.25);

        let flat = value["materials"][1]["extras"].as_object().unwrap();
        assert_eq!(flat.len(), 1);
    }
}
