//! Mesh builder: per-attribute index streams to shared-index primitives.
//!
//! A source primitive indexes every attribute separately. The target needs
//! one index per vertex, so each corner's attribute values are combined
//! into a key and equal keys share one output vertex.

use std::collections::{BTreeMap, HashMap};

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::collada::{self, MeshPrimitive, MeshVertexData, PrimitiveType};
use crate::gltf::{Asset, Mesh, Mode, Primitive, Semantic};
use crate::util::{AccessorType, Error, Result};

/// Target draw mode for a source primitive type.
pub fn map_mode(ty: PrimitiveType) -> Option<Mode> {
    match ty {
        PrimitiveType::Lines => Some(Mode::Lines),
        PrimitiveType::LineStrips => Some(Mode::LineStrip),
        PrimitiveType::Polylist | PrimitiveType::Polygons | PrimitiveType::Triangles => {
            Some(Mode::Triangles)
        }
        PrimitiveType::TriangleStrips => Some(Mode::TriangleStrip),
        PrimitiveType::TriangleFans => Some(Mode::TriangleFan),
        PrimitiveType::Points => Some(Mode::Points),
        PrimitiveType::Undefined => None,
    }
}

/// Convert a source mesh. Primitives that cannot be converted are
/// skipped with a warning.
pub fn build_mesh(asset: &mut Asset, source: &collada::Mesh) -> Mesh {
    let mut mesh = Mesh::new(source.original_id.as_str(), source.name.as_str());
    for (i, primitive) in source.primitives.iter().enumerate() {
        match build_primitive(asset, source, primitive) {
            Ok(p) => mesh.primitives.push(p),
            Err(e) => warn!(mesh = %source.original_id, primitive = i, "primitive skipped: {e}"),
        }
    }
    debug!(mesh = %mesh.id, primitives = mesh.primitives.len(), "mesh built");
    mesh
}

/// One attribute input of a primitive.
struct Stream<'a> {
    semantic: Semantic,
    data: &'a MeshVertexData,
    indices: &'a [u32],
}

/// Deduplicated vertices of one primitive, before packing.
#[derive(Debug, Default)]
struct VertexBuild {
    indices: Vec<u32>,
    attributes: BTreeMap<Semantic, Vec<f32>>,
    vertex_count: usize,
}

fn build_primitive(
    asset: &mut Asset,
    mesh: &collada::Mesh,
    primitive: &MeshPrimitive,
) -> Result<Primitive> {
    let mode = map_mode(primitive.primitive_type).ok_or_else(|| {
        Error::unsupported(format!("primitive type {:?}", primitive.primitive_type))
    })?;

    let streams = collect_streams(mesh, primitive)?;
    let corners = corner_order(primitive)?;
    let build = deduplicate(&streams, &corners)?;

    // Index value 65535 is the primitive restart value for u16 indices.
    let indices = if build.vertex_count > u16::MAX as usize {
        asset.pack(asset.indices_view(), AccessorType::Scalar, &build.indices)
    } else {
        let narrow: Vec<u16> = build.indices.iter().map(|&i| i as u16).collect();
        asset.pack(asset.indices_view(), AccessorType::Scalar, &narrow)
    };

    let attributes = build
        .attributes
        .into_iter()
        .map(|(semantic, values)| {
            let ty = match semantic.num_components() {
                2 => AccessorType::Vec2,
                _ => AccessorType::Vec3,
            };
            (semantic, asset.pack(asset.attributes_view(), ty, &values))
        })
        .collect();

    Ok(Primitive {
        mode,
        indices,
        attributes,
        material: None,
        material_symbol: primitive.material_id,
    })
}

fn collect_streams<'a>(mesh: &'a collada::Mesh, primitive: &'a MeshPrimitive) -> Result<Vec<Stream<'a>>> {
    let mut streams = vec![Stream {
        semantic: Semantic::Position,
        data: &mesh.positions,
        indices: &primitive.position_indices,
    }];
    let optional = [
        (Semantic::Normal, &mesh.normals, &primitive.normal_indices),
        (Semantic::Binormal, &mesh.binormals, &primitive.binormal_indices),
        (Semantic::Tangent, &mesh.tangents, &primitive.tangent_indices),
    ];
    for (semantic, data, indices) in optional {
        if let Some(indices) = indices {
            streams.push(Stream { semantic, data, indices });
        }
    }
    for (set, indices) in primitive.uv_coord_indices.iter().enumerate() {
        streams.push(Stream { semantic: Semantic::TexCoord(set as u32), data: &mesh.uv_coords, indices });
    }
    for (set, indices) in primitive.color_indices.iter().enumerate() {
        streams.push(Stream { semantic: Semantic::Color(set as u32), data: &mesh.colors, indices });
    }

    let corners = primitive.num_corners();
    for stream in &streams {
        if !stream.data.values.is_supported() {
            return Err(Error::unsupported(format!("{} data encoding", stream.semantic)));
        }
        if stream.indices.len() < corners {
            return Err(Error::unsupported(format!(
                "{} index stream has {} entries for {} corners",
                stream.semantic,
                stream.indices.len(),
                corners
            )));
        }
    }
    Ok(streams)
}

/// Corners to emit, in order. Polygons with per-face vertex counts are
/// fan-triangulated.
fn corner_order(primitive: &MeshPrimitive) -> Result<Vec<usize>> {
    let corners = primitive.num_corners();
    let counts = match (&primitive.primitive_type, &primitive.face_vertex_counts) {
        (PrimitiveType::Polylist | PrimitiveType::Polygons, Some(counts))
            if counts.iter().any(|&n| n != 3) =>
        {
            counts
        }
        _ => return Ok((0..corners).collect()),
    };

    let total: usize = counts.iter().map(|&n| n as usize).sum();
    if total > corners {
        return Err(Error::unsupported(format!(
            "face vertex counts reference {total} corners, primitive has {corners}"
        )));
    }

    let mut order = Vec::with_capacity(corners * 2);
    let mut start = 0usize;
    for &n in counts {
        let n = n as usize;
        for k in 1..n.saturating_sub(1) {
            order.extend_from_slice(&[start, start + k, start + k + 1]);
        }
        start += n;
    }
    Ok(order)
}

fn deduplicate(streams: &[Stream<'_>], corners: &[usize]) -> Result<VertexBuild> {
    let mut build = VertexBuild::default();
    for stream in streams {
        build.attributes.insert(stream.semantic, Vec::new());
    }
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut key = String::new();
    let mut values: SmallVec<[f32; 16]> = SmallVec::new();

    for &corner in corners {
        key.clear();
        values.clear();
        for stream in streams {
            let n = stream.semantic.num_components();
            let index = stream.indices[corner] as usize;
            let count = stream.data.num_elements(n);
            if index >= count {
                return Err(Error::IndexOutOfBounds {
                    semantic: stream.semantic.to_string(),
                    index,
                    count,
                });
            }
            for k in 0..n {
                let value = stream.data.component(index, k, n).unwrap_or_default();
                key.push_str(&format!("{value}:"));
                values.push(value);
            }
        }

        if let Some(&index) = seen.get(&key) {
            build.indices.push(index);
            continue;
        }

        let index = build.vertex_count as u32;
        seen.insert(key.clone(), index);
        build.indices.push(index);
        build.vertex_count += 1;

        let mut offset = 0;
        for stream in streams {
            let n = stream.semantic.num_components();
            let target = build.attributes.entry(stream.semantic).or_default();
            for k in 0..n {
                let value = values[offset + k];
                // Texture space has V pointing down.
                if matches!(stream.semantic, Semantic::TexCoord(_)) && k == 1 {
                    target.push(1.0 - value);
                } else {
                    target.push(value);
                }
            }
            offset += n;
        }
    }
    Ok(build)
}
