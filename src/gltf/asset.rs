//! The target document: arenas of nodes, meshes and binary data.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::util::{AccessorType, Component};

use super::*;

macro_rules! arena_index {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    )*};
}

arena_index! {
    /// Handle of a node in [`Asset::nodes`].
    NodeIndex,
    /// Handle of a mesh in [`Asset::meshes`].
    MeshIndex,
    /// Handle of an accessor in [`Asset::accessors`].
    AccessorIndex,
    /// Handle of a buffer view in [`Asset::buffer_views`].
    BufferViewIndex,
    /// Handle of a material in [`Asset::materials`].
    MaterialIndex,
    /// Handle of a texture in [`Asset::textures`].
    TextureIndex,
    /// Handle of an image in [`Asset::images`].
    ImageIndex,
}

macro_rules! arena_access {
    ($($index:ident => $field:ident: $item:ty),* $(,)?) => {$(
        impl Index<$index> for Asset {
            type Output = $item;
            fn index(&self, index: $index) -> &$item {
                &self.$field[index.0]
            }
        }

        impl IndexMut<$index> for Asset {
            fn index_mut(&mut self, index: $index) -> &mut $item {
                &mut self.$field[index.0]
            }
        }
    )*};
}

arena_access! {
    NodeIndex => nodes: Node,
    MeshIndex => meshes: Mesh,
    AccessorIndex => accessors: Accessor,
    BufferViewIndex => buffer_views: BufferView,
    MaterialIndex => materials: Material,
    TextureIndex => textures: Texture,
    ImageIndex => images: Image,
}

/// Document metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetInfo {
    pub version: String,
    pub generator: String,
    pub copyright: Option<String>,
    /// Tool that authored the source document.
    pub authoring_tool: Option<String>,
}

impl Default for AssetInfo {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: crate::GENERATOR.to_string(),
            copyright: None,
            authoring_tool: None,
        }
    }
}

/// A set of root nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub name: String,
    pub nodes: Vec<NodeIndex>,
}

/// The target document model.
///
/// Every object lives in an arena on the asset and is referred to by a
/// typed index. Accessors share three buffer views by usage: primitive
/// indices, vertex attributes and animation data.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    pub info: AssetInfo,
    pub scenes: Vec<Scene>,
    pub default_scene: Option<usize>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub animations: Vec<Animation>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    indices_view: BufferViewIndex,
    attributes_view: BufferViewIndex,
    animations_view: BufferViewIndex,
}

impl Default for Asset {
    fn default() -> Self {
        Self::new()
    }
}

impl Asset {
    /// Empty asset with the three shared buffer views.
    pub fn new() -> Self {
        let buffer_views = vec![
            BufferView::new("indices", Some(BufferViewTarget::ElementArray)),
            BufferView::new("attributes", Some(BufferViewTarget::Array)),
            BufferView::new("animations", None),
        ];
        Self {
            info: AssetInfo::default(),
            scenes: Vec::new(),
            default_scene: None,
            nodes: Vec::new(),
            meshes: Vec::new(),
            accessors: Vec::new(),
            buffer_views,
            animations: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            images: Vec::new(),
            indices_view: BufferViewIndex(0),
            attributes_view: BufferViewIndex(1),
            animations_view: BufferViewIndex(2),
        }
    }

    #[inline]
    pub fn indices_view(&self) -> BufferViewIndex {
        self.indices_view
    }

    #[inline]
    pub fn attributes_view(&self) -> BufferViewIndex {
        self.attributes_view
    }

    #[inline]
    pub fn animations_view(&self) -> BufferViewIndex {
        self.animations_view
    }

    // ========================================================================
    // Arenas
    // ========================================================================

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex(self.nodes.len() - 1)
    }

    /// Add `child` under `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, child: Node) -> NodeIndex {
        let index = self.add_node(child);
        self.nodes[parent.0].children.push(index);
        index
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshIndex {
        self.meshes.push(mesh);
        MeshIndex(self.meshes.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialIndex {
        self.materials.push(material);
        MaterialIndex(self.materials.len() - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureIndex {
        self.textures.push(texture);
        TextureIndex(self.textures.len() - 1)
    }

    pub fn add_image(&mut self, image: Image) -> ImageIndex {
        self.images.push(image);
        ImageIndex(self.images.len() - 1)
    }

    pub fn add_accessor(&mut self, accessor: Accessor) -> AccessorIndex {
        self.accessors.push(accessor);
        AccessorIndex(self.accessors.len() - 1)
    }

    /// Pack `values` into `view` as a new accessor.
    pub fn pack<T: Component>(
        &mut self,
        view: BufferViewIndex,
        ty: AccessorType,
        values: &[T],
    ) -> AccessorIndex {
        let accessor = Accessor::packed(ty, values, &mut self.buffer_views[view.0], view);
        self.add_accessor(accessor)
    }

    /// Bytes backing an accessor.
    pub fn accessor_bytes(&self, index: AccessorIndex) -> &[u8] {
        let accessor = &self[index];
        match &accessor.storage {
            AccessorStorage::Owned(bytes) => bytes,
            AccessorStorage::View { buffer_view, byte_offset } => {
                let data = &self[*buffer_view].data;
                let end = (byte_offset + accessor.byte_length()).min(data.len());
                &data[(*byte_offset).min(end)..end]
            }
        }
    }

    /// Decode every component of an accessor as f32.
    pub fn read_accessor(&self, index: AccessorIndex) -> Vec<f32> {
        self[index].decode(self.accessor_bytes(index))
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    pub fn add_scene(&mut self, scene: Scene) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    /// The default scene, created on first use.
    pub fn default_scene_mut(&mut self) -> &mut Scene {
        let index = match self.default_scene {
            Some(index) => index,
            None => {
                let index = self.add_scene(Scene::default());
                self.default_scene = Some(index);
                index
            }
        };
        &mut self.scenes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_asset_views() {
        let asset = Asset::new();
        assert_eq!(asset.buffer_views.len(), 3);
        assert_eq!(asset[asset.indices_view()].target, Some(BufferViewTarget::ElementArray));
        assert_eq!(asset[asset.attributes_view()].target, Some(BufferViewTarget::Array));
        assert_eq!(asset[asset.animations_view()].target, None);
        assert_eq!(asset.info.version, "2.0");
    }

    #[test]
    fn test_pack_and_read() {
        let mut asset = Asset::new();
        let view = asset.animations_view();
        let a = asset.pack(view, AccessorType::Scalar, &[0.0f32, 0.5, 1.0]);
        let b = asset.pack(view, AccessorType::Vec3, &[1.0f32, 2.0, 3.0]);
        assert_eq!(asset.read_accessor(a), vec![0.0, 0.5, 1.0]);
        assert_eq!(asset.read_accessor(b), vec![1.0, 2.0, 3.0]);

        let c = asset.add_accessor(Accessor::owned(AccessorType::Scalar, &[7u16, 8]));
        assert_eq!(asset.read_accessor(c), vec![7.0, 8.0]);
    }

    #[test]
    fn test_default_scene_created_once() {
        let mut asset = Asset::new();
        asset.default_scene_mut().nodes.push(NodeIndex(0));
        asset.default_scene_mut().nodes.push(NodeIndex(1));
        assert_eq!(asset.scenes.len(), 1);
        assert_eq!(asset.default_scene, Some(0));
        assert_eq!(asset.scenes[0].nodes.len(), 2);
    }

}
