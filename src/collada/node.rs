//! Source scene graph: nodes, instances and scenes.

use serde::{Deserialize, Serialize};

use super::{Transformation, UniqueId};

/// Material symbol id used to match instance bindings to mesh primitives.
pub type MaterialSymbol = u32;

/// Binds a material to the primitives of an instanced mesh that use `material_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialBinding {
    /// Symbol matched against [`MeshPrimitive::material_id`](super::MeshPrimitive).
    pub material_id: MaterialSymbol,
    /// Material object bound to the symbol.
    pub referenced_material: UniqueId,
    /// Symbol name as written in the document.
    #[serde(default)]
    pub name: String,
}

/// Instantiation of a geometry on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceGeometry {
    pub instantiated_object: UniqueId,
    #[serde(default)]
    pub material_bindings: Vec<MaterialBinding>,
}

impl InstanceGeometry {
    pub fn new(instantiated_object: UniqueId) -> Self {
        Self { instantiated_object, material_bindings: Vec::new() }
    }
}

/// A node in the source hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub unique_id: UniqueId,
    /// Id attribute from the document, used to name target nodes.
    #[serde(default)]
    pub original_id: String,
    #[serde(default)]
    pub name: String,
    /// Ordered transform operations.
    #[serde(default)]
    pub transformations: Vec<Transformation>,
    #[serde(default)]
    pub instance_geometries: Vec<InstanceGeometry>,
    #[serde(default)]
    pub child_nodes: Vec<Node>,
}

impl Node {
    pub fn new(unique_id: UniqueId, original_id: impl Into<String>) -> Self {
        let original_id = original_id.into();
        Self {
            unique_id,
            name: original_id.clone(),
            original_id,
            transformations: Vec::new(),
            instance_geometries: Vec::new(),
            child_nodes: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transformation: impl Into<Transformation>) -> Self {
        self.transformations.push(transformation.into());
        self
    }

    pub fn with_geometry(mut self, instance: InstanceGeometry) -> Self {
        self.instance_geometries.push(instance);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.child_nodes.push(child);
        self
    }

    /// Whether any transform operation is animated.
    pub fn is_animated(&self) -> bool {
        self.transformations.iter().any(Transformation::is_animated)
    }
}

/// A visual scene with its root nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualScene {
    pub unique_id: UniqueId,
    #[serde(default)]
    pub original_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root_nodes: Vec<Node>,
}

/// Library of node templates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryNodes {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// The document's scene instantiation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub instance_visual_scene: Option<UniqueId>,
}
