//! Source geometry: meshes with per-attribute index streams.
//!
//! Every vertex attribute has its own data pool on the mesh and its own
//! index stream on each primitive. A primitive corner `i` uses
//! `position_indices[i]`, `normal_indices[i]`, and so on.

use serde::{Deserialize, Serialize};

use super::{MaterialSymbol, UniqueId};

/// Value array stored either in single or double precision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum FloatOrDoubleArray {
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Data the parser could not type.
    #[default]
    Unknown,
}

impl FloatOrDoubleArray {
    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Unknown => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the numeric encoding is known.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Value at `index`, narrowed to single precision.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        match self {
            Self::Float(v) => v.get(index).copied(),
            Self::Double(v) => v.get(index).map(|&x| x as f32),
            Self::Unknown => None,
        }
    }

    /// All values narrowed to single precision, `None` for unknown data.
    pub fn to_f32_vec(&self) -> Option<Vec<f32>> {
        match self {
            Self::Float(v) => Some(v.clone()),
            Self::Double(v) => Some(v.iter().map(|&x| x as f32).collect()),
            Self::Unknown => None,
        }
    }
}

/// A per-mesh vertex data pool for one attribute kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshVertexData {
    #[serde(default)]
    pub values: FloatOrDoubleArray,
    /// Values per element. Defaults to the number of components the
    /// attribute uses (3, or 2 for texture coordinates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride: Option<usize>,
}

impl MeshVertexData {
    pub fn floats(values: Vec<f32>) -> Self {
        Self { values: FloatOrDoubleArray::Float(values), stride: None }
    }

    pub fn doubles(values: Vec<f64>) -> Self {
        Self { values: FloatOrDoubleArray::Double(values), stride: None }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Number of elements, given the components the attribute reads.
    pub fn num_elements(&self, components: usize) -> usize {
        let stride = self.stride.unwrap_or(components).max(1);
        self.values.len() / stride
    }

    /// Component `k` of element `index`.
    #[inline]
    pub fn component(&self, index: usize, k: usize, components: usize) -> Option<f32> {
        let stride = self.stride.unwrap_or(components);
        self.values.get(index * stride + k)
    }
}

/// Source primitive topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimitiveType {
    Lines,
    LineStrips,
    Polygons,
    Polylist,
    Triangles,
    TriangleStrips,
    TriangleFans,
    Points,
    Undefined,
}

/// One primitive of a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPrimitive {
    pub primitive_type: PrimitiveType,
    /// Material symbol the instance bindings refer to.
    #[serde(default)]
    pub material_id: MaterialSymbol,
    pub position_indices: Vec<u32>,
    #[serde(default)]
    pub normal_indices: Option<Vec<u32>>,
    #[serde(default)]
    pub binormal_indices: Option<Vec<u32>>,
    #[serde(default)]
    pub tangent_indices: Option<Vec<u32>>,
    /// One index stream per UV set.
    #[serde(default)]
    pub uv_coord_indices: Vec<Vec<u32>>,
    /// One index stream per color set.
    #[serde(default)]
    pub color_indices: Vec<Vec<u32>>,
    /// Vertices per face, for polygon primitives.
    #[serde(default)]
    pub face_vertex_counts: Option<Vec<u32>>,
}

impl MeshPrimitive {
    pub fn new(primitive_type: PrimitiveType, position_indices: Vec<u32>) -> Self {
        Self {
            primitive_type,
            material_id: 0,
            position_indices,
            normal_indices: None,
            binormal_indices: None,
            tangent_indices: None,
            uv_coord_indices: Vec::new(),
            color_indices: Vec::new(),
            face_vertex_counts: None,
        }
    }

    /// Number of corners (position index entries).
    pub fn num_corners(&self) -> usize {
        self.position_indices.len()
    }
}

/// A polygon mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    #[serde(default)]
    pub name: String,
    pub positions: MeshVertexData,
    #[serde(default)]
    pub normals: MeshVertexData,
    #[serde(default)]
    pub binormals: MeshVertexData,
    #[serde(default)]
    pub tangents: MeshVertexData,
    #[serde(default)]
    pub uv_coords: MeshVertexData,
    #[serde(default)]
    pub colors: MeshVertexData,
    #[serde(default)]
    pub primitives: Vec<MeshPrimitive>,
}

impl Mesh {
    pub fn new(unique_id: UniqueId, original_id: impl Into<String>, positions: MeshVertexData) -> Self {
        let original_id = original_id.into();
        Self {
            unique_id,
            name: original_id.clone(),
            original_id,
            positions,
            normals: MeshVertexData::default(),
            binormals: MeshVertexData::default(),
            tangents: MeshVertexData::default(),
            uv_coords: MeshVertexData::default(),
            colors: MeshVertexData::default(),
            primitives: Vec::new(),
        }
    }
}

/// Geometry delivered by the parser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Mesh(Mesh),
    Spline { unique_id: UniqueId },
    ConvexMesh { unique_id: UniqueId },
}

impl Geometry {
    pub fn unique_id(&self) -> UniqueId {
        match self {
            Self::Mesh(mesh) => mesh.unique_id,
            Self::Spline { unique_id } | Self::ConvexMesh { unique_id } => *unique_id,
        }
    }
}
