//! Target meshes and primitives.

use std::collections::BTreeMap;
use std::fmt;

use super::{AccessorIndex, MaterialIndex};

/// Draw mode of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Mode {
    /// The glTF `mode` code.
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Points => 0,
            Self::Lines => 1,
            Self::LineStrip => 3,
            Self::Triangles => 4,
            Self::TriangleStrip => 5,
            Self::TriangleFan => 6,
        }
    }
}

/// Vertex attribute semantic.
///
/// The declaration order is the order attribute values are combined in
/// when vertices are deduplicated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Semantic {
    Position,
    Normal,
    Binormal,
    Tangent,
    TexCoord(u32),
    Color(u32),
}

impl Semantic {
    /// Number of float components stored per vertex.
    pub const fn num_components(self) -> usize {
        match self {
            Self::TexCoord(_) => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("POSITION"),
            Self::Normal => f.write_str("NORMAL"),
            // Not a core glTF semantic, so application specific.
            Self::Binormal => f.write_str("_BINORMAL"),
            Self::Tangent => f.write_str("TANGENT"),
            Self::TexCoord(n) => write!(f, "TEXCOORD_{n}"),
            Self::Color(n) => write!(f, "COLOR_{n}"),
        }
    }
}

/// One draw call of a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub mode: Mode,
    pub indices: AccessorIndex,
    pub attributes: BTreeMap<Semantic, AccessorIndex>,
    pub material: Option<MaterialIndex>,
    /// Source material symbol, matched by instance bindings.
    pub material_symbol: u32,
}

/// A mesh: an ordered list of primitives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub id: String,
    pub name: String,
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), primitives: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_names() {
        assert_eq!(Semantic::Position.to_string(), "POSITION");
        assert_eq!(Semantic::TexCoord(1).to_string(), "TEXCOORD_1");
        assert_eq!(Semantic::Color(0).to_string(), "COLOR_0");
        assert_eq!(Semantic::TexCoord(0).num_components(), 2);
        assert_eq!(Semantic::Normal.num_components(), 3);
    }

    #[test]
    fn test_semantic_order() {
        let mut semantics = vec![Semantic::Color(0), Semantic::TexCoord(1), Semantic::Position, Semantic::TexCoord(0)];
        semantics.sort();
        assert_eq!(
            semantics,
            [Semantic::Position, Semantic::TexCoord(0), Semantic::TexCoord(1), Semantic::Color(0)]
        );
    }
}
