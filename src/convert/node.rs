//! Node builder: source nodes to target node subtrees.
//!
//! Static transform operations are flattened into one matrix. Every
//! animated operation gets a node of its own, so an animation channel
//! replaces exactly the transform it drives.

use tracing::{debug, warn};

use crate::collada::{self, flatten, InstanceGeometry, TransformOp};
use crate::gltf::{Asset, MeshIndex, Node, NodeIndex, Transform};
use crate::util::{is_identity, DMat4};

use super::context::{AnimatedTarget, ConversionContext};

fn matrix_transform(m: DMat4) -> Transform {
    Transform::Matrix(m.as_mat4())
}

/// Convert a list of source nodes, returning the new subtree roots.
pub fn build_nodes(
    asset: &mut Asset,
    ctx: &mut ConversionContext,
    sources: &[collada::Node],
) -> Vec<NodeIndex> {
    sources.iter().map(|source| build_node(asset, ctx, source)).collect()
}

/// Convert one source node and its children.
///
/// The returned node carries the transform operations before the first
/// animated one. Each animated operation becomes a child node with the
/// source id; a buffer node (`<id>_<n>`) is inserted wherever static
/// operations would otherwise land on an animated node. Meshes and
/// children attach to the innermost node.
pub fn build_node(
    asset: &mut Asset,
    ctx: &mut ConversionContext,
    source: &collada::Node,
) -> NodeIndex {
    let id = source.original_id.as_str();
    let root = asset.add_node(Node::new(id).with_name(source.name.as_str()));

    let mut current = root;
    let mut has_transform = false;
    let mut animated = false;
    let mut buffer_nodes = 0usize;
    let mut pending: Vec<&TransformOp> = Vec::new();

    for transformation in &source.transformations {
        let Some(list_id) = transformation.animation_list else {
            pending.push(&transformation.op);
            continue;
        };

        if animated {
            current = add_buffer_node(asset, current, id, &mut buffer_nodes);
        }
        let animated_node = Node::new(id)
            .with_name(source.name.as_str())
            .with_transform(matrix_transform(transformation.to_matrix()));
        let animated_node = asset.add_child(current, animated_node);

        asset[current].transform = matrix_transform(flatten(pending.drain(..)));
        ctx.animated_nodes.insert(
            list_id,
            AnimatedTarget { node: current, rotation_axis: transformation.op.rotation_axis() },
        );

        current = animated_node;
        has_transform = true;
        animated = true;
    }

    let trailing = flatten(pending.iter().copied());
    if animated && !is_identity(&trailing) {
        current = add_buffer_node(asset, current, id, &mut buffer_nodes);
        has_transform = false;
    }
    if !has_transform {
        asset[current].transform = matrix_transform(trailing);
    }

    for instance in &source.instance_geometries {
        if let Some(mesh) = instance_mesh(asset, ctx, instance) {
            asset[current].meshes.push(mesh);
        }
    }

    for child in &source.child_nodes {
        let child = build_node(asset, ctx, child);
        asset[current].children.push(child);
    }
    root
}

fn add_buffer_node(asset: &mut Asset, parent: NodeIndex, id: &str, count: &mut usize) -> NodeIndex {
    let buffer_id = format!("{id}_{count}");
    *count += 1;
    asset.add_child(parent, Node::new(buffer_id.as_str()).with_name(buffer_id))
}

/// Resolve an instance to a mesh with its bound materials applied.
///
/// A primitive that already carries a different material (from an
/// earlier instance) makes the instance use a copy of the mesh.
fn instance_mesh(
    asset: &mut Asset,
    ctx: &ConversionContext,
    instance: &InstanceGeometry,
) -> Option<MeshIndex> {
    let Some(&shared) = ctx.meshes.get(&instance.instantiated_object) else {
        debug!(mesh = %instance.instantiated_object, "instanced mesh not built, instance dropped");
        return None;
    };

    let mut mesh = shared;
    for binding in &instance.material_bindings {
        let Some(material) = ctx.resolve_material(binding.referenced_material) else {
            warn!(
                material = %binding.referenced_material,
                "bound material has no effect, binding skipped"
            );
            continue;
        };
        if !binding.name.is_empty() {
            asset[material].id = binding.name.clone();
        }

        let conflict = asset[mesh].primitives.iter().any(|p| {
            p.material_symbol == binding.material_id && p.material.is_some_and(|m| m != material)
        });
        if conflict && mesh == shared {
            let copy = asset[shared].clone();
            mesh = asset.add_mesh(copy);
            debug!(mesh = %asset[mesh].id, "material conflict, mesh cloned");
        }

        for primitive in asset[mesh].primitives.iter_mut() {
            if primitive.material_symbol == binding.material_id {
                primitive.material = Some(material);
            }
        }
    }
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collada::{ClassId, MaterialBinding, Transformation, UniqueId};
    use crate::gltf::{Material, Mesh, Mode, Primitive};
    use crate::util::{AccessorType, DVec3, Mat4, Vec3};
    use std::collections::BTreeMap;

    fn list(n: u64) -> UniqueId {
        UniqueId::new(ClassId::AnimationList, n)
    }

    fn node_id(n: u64) -> UniqueId {
        UniqueId::new(ClassId::Node, n)
    }

    #[test]
    fn test_static_chain_flattened() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "box")
            .with_transform(TransformOp::translate(1.0, 2.0, 3.0))
            .with_transform(TransformOp::scale(2.0, 2.0, 2.0));
        let root = build_node(&mut asset, &mut ctx, &source);

        assert_eq!(asset.nodes.len(), 1);
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::from_scale(Vec3::splat(2.0));
        assert_eq!(asset[root].transform, Transform::Matrix(expected));
        assert!(ctx.animated_nodes.is_empty());
    }

    #[test]
    fn test_empty_chain_identity() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let root = build_node(&mut asset, &mut ctx, &collada::Node::new(node_id(1), "empty"));
        assert_eq!(asset[root].transform, Transform::IDENTITY);
    }

    #[test]
    fn test_animated_op_isolated() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "arm")
            .with_transform(TransformOp::translate(0.0, 1.0, 0.0))
            .with_transform(Transformation::animated(TransformOp::rotate(DVec3::Y, 0.0), list(7)));
        let root = build_node(&mut asset, &mut ctx, &source);

        assert_eq!(asset[root].id, "arm");
        assert_eq!(
            asset[root].transform,
            Transform::Matrix(Mat4::from_translation(Vec3::Y))
        );
        assert_eq!(asset[root].children.len(), 1);
        let animated = asset[root].children[0];
        assert_eq!(asset[animated].id, "arm");
        assert_eq!(asset[animated].transform, Transform::IDENTITY);

        let target = ctx.animated_nodes[&list(7)];
        assert_eq!(target.node, root);
        assert_eq!(target.rotation_axis, Some(DVec3::Y));
    }

    #[test]
    fn test_chained_animated_ops_get_buffer_node() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "joint")
            .with_transform(Transformation::animated(TransformOp::translate(1.0, 0.0, 0.0), list(1)))
            .with_transform(Transformation::animated(TransformOp::rotate(DVec3::Z, 45.0), list(2)));
        let root = build_node(&mut asset, &mut ctx, &source);

        // joint -> joint (translate) -> joint_0 -> joint (rotate)
        let first = asset[root].children[0];
        assert_eq!(asset[first].id, "joint");
        assert_eq!(asset[first].children.len(), 1);
        let buffer = asset[first].children[0];
        assert_eq!(asset[buffer].id, "joint_0");
        assert_eq!(asset[buffer].transform, Transform::IDENTITY);
        let second = asset[buffer].children[0];
        assert_eq!(asset[second].id, "joint");
        assert!(asset[second].children.is_empty());

        assert_eq!(ctx.animated_nodes[&list(1)].node, root);
        assert_eq!(ctx.animated_nodes[&list(2)].node, buffer);
        assert_eq!(asset.nodes.len(), 4);
    }

    #[test]
    fn test_trailing_ops_after_animation() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "n")
            .with_transform(Transformation::animated(TransformOp::translate(1.0, 0.0, 0.0), list(1)))
            .with_transform(TransformOp::scale(3.0, 3.0, 3.0));
        let root = build_node(&mut asset, &mut ctx, &source);

        let animated = asset[root].children[0];
        let buffer = asset[animated].children[0];
        assert_eq!(asset[buffer].id, "n_0");
        assert_eq!(asset[buffer].transform, Transform::Matrix(Mat4::from_scale(Vec3::splat(3.0))));

        // An identity tail needs no buffer node.
        let mut asset = Asset::new();
        let source = collada::Node::new(node_id(2), "m")
            .with_transform(Transformation::animated(TransformOp::translate(1.0, 0.0, 0.0), list(2)))
            .with_transform(TransformOp::scale(1.0, 1.0, 1.0));
        build_node(&mut asset, &mut ctx, &source);
        assert_eq!(asset.nodes.len(), 2);
    }

    #[test]
    fn test_children_attach_to_innermost() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "parent")
            .with_transform(Transformation::animated(TransformOp::translate(1.0, 0.0, 0.0), list(1)))
            .with_child(collada::Node::new(node_id(2), "child"));
        let root = build_node(&mut asset, &mut ctx, &source);
        let animated = asset[root].children[0];
        let child = asset[animated].children[0];
        assert_eq!(asset[child].id, "child");
    }

    #[test]
    fn test_missing_mesh_dropped() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let source = collada::Node::new(node_id(1), "n")
            .with_geometry(InstanceGeometry::new(UniqueId::new(ClassId::Mesh, 9)));
        let root = build_node(&mut asset, &mut ctx, &source);
        assert!(asset[root].meshes.is_empty());
    }

    fn mesh_with_primitive(asset: &mut Asset) -> MeshIndex {
        let indices = asset.pack(asset.indices_view(), AccessorType::Scalar, &[0u16, 0, 0]);
        let mut mesh = Mesh::new("tri", "tri");
        mesh.primitives.push(Primitive {
            mode: Mode::Triangles,
            indices,
            attributes: BTreeMap::new(),
            material: None,
            material_symbol: 1,
        });
        asset.add_mesh(mesh)
    }

    fn bind(ctx: &mut ConversionContext, asset: &mut Asset, n: u64) -> UniqueId {
        let material = UniqueId::new(ClassId::Material, n);
        let effect = UniqueId::new(ClassId::Effect, n);
        let index = asset.add_material(Material::default());
        ctx.material_effects.insert(material, effect);
        ctx.effect_materials.insert(effect, index);
        material
    }

    #[test]
    fn test_material_conflict_clones_mesh() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let mesh_id = UniqueId::new(ClassId::Mesh, 1);
        let mesh = mesh_with_primitive(&mut asset);
        ctx.meshes.insert(mesh_id, mesh);
        let red = bind(&mut ctx, &mut asset, 1);
        let blue = bind(&mut ctx, &mut asset, 2);

        let instance = |material: UniqueId, name: &str| {
            let mut instance = InstanceGeometry::new(mesh_id);
            instance.material_bindings.push(MaterialBinding {
                material_id: 1,
                referenced_material: material,
                name: name.to_string(),
            });
            instance
        };

        let a = build_node(&mut asset, &mut ctx, &collada::Node::new(node_id(1), "a").with_geometry(instance(red, "red")));
        let b = build_node(&mut asset, &mut ctx, &collada::Node::new(node_id(2), "b").with_geometry(instance(red, "red")));
        let c = build_node(&mut asset, &mut ctx, &collada::Node::new(node_id(3), "c").with_geometry(instance(blue, "blue")));

        // Same material shares the mesh, a different one forces a copy.
        assert_eq!(asset[a].meshes, vec![mesh]);
        assert_eq!(asset[b].meshes, vec![mesh]);
        assert_eq!(asset.meshes.len(), 2);
        let copy = asset[c].meshes[0];
        assert_ne!(copy, mesh);
        assert_eq!(asset[mesh].primitives[0].material, ctx.resolve_material(red));
        assert_eq!(asset[copy].primitives[0].material, ctx.resolve_material(blue));
        assert_eq!(asset.materials[1].id, "blue");
    }

    #[test]
    fn test_unresolved_binding_skipped() {
        let mut asset = Asset::new();
        let mut ctx = ConversionContext::new();
        let mesh_id = UniqueId::new(ClassId::Mesh, 1);
        let mesh = mesh_with_primitive(&mut asset);
        ctx.meshes.insert(mesh_id, mesh);

        let mut instance = InstanceGeometry::new(mesh_id);
        instance.material_bindings.push(MaterialBinding {
            material_id: 1,
            referenced_material: UniqueId::new(ClassId::Material, 42),
            name: "missing".to_string(),
        });
        let root = build_node(&mut asset, &mut ctx, &collada::Node::new(node_id(1), "n").with_geometry(instance));
        assert_eq!(asset[root].meshes, vec![mesh]);
        assert_eq!(asset[mesh].primitives[0].material, None);
    }
}
