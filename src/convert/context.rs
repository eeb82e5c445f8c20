//! Cross-reference tables of one conversion run.

use std::collections::HashMap;

use glam::DVec3;

use crate::collada::UniqueId;
use crate::gltf::{ImageIndex, MaterialIndex, MeshIndex, NodeIndex, Sampler};

/// Node an animation list drives, recorded while building the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedTarget {
    pub node: NodeIndex,
    /// Axis of the animated rotate operation, if it was one.
    pub rotation_axis: Option<DVec3>,
}

/// Lookup tables consulted across callbacks.
///
/// Source objects reference each other by id, and the objects referenced
/// may have been delivered by any earlier callback.
#[derive(Clone, Debug, Default)]
pub struct ConversionContext {
    /// mesh id -> built mesh
    pub meshes: HashMap<UniqueId, MeshIndex>,
    /// material id -> effect id
    pub material_effects: HashMap<UniqueId, UniqueId>,
    /// effect id -> built material
    pub effect_materials: HashMap<UniqueId, MaterialIndex>,
    /// animation id -> provisional sampler
    pub samplers: HashMap<UniqueId, Sampler>,
    /// animation list id -> bound node
    pub animated_nodes: HashMap<UniqueId, AnimatedTarget>,
    /// image id -> image
    pub images: HashMap<UniqueId, ImageIndex>,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.material_effects.clear();
        self.effect_materials.clear();
        self.samplers.clear();
        self.animated_nodes.clear();
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
            && self.material_effects.is_empty()
            && self.effect_materials.is_empty()
            && self.samplers.is_empty()
            && self.animated_nodes.is_empty()
            && self.images.is_empty()
    }

    /// Resolve material id -> effect id -> built material.
    pub fn resolve_material(&self, material_id: UniqueId) -> Option<MaterialIndex> {
        let effect_id = self.material_effects.get(&material_id)?;
        self.effect_materials.get(effect_id).copied()
    }
}
