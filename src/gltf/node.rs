//! Target nodes and their transforms.

use glam::{Mat4, Quat, Vec3};

use super::{MeshIndex, NodeIndex};

/// Local transform of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// Column-major matrix.
    Matrix(Mat4),
    /// Decomposed translation, rotation and scale.
    Trs {
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
}

impl Default for Transform {
    fn default() -> Self {
        Self::Matrix(Mat4::IDENTITY)
    }
}

impl Transform {
    pub const IDENTITY: Self = Self::Matrix(Mat4::IDENTITY);

    /// Decompose a matrix into translation, rotation and scale.
    pub fn trs_from_matrix(m: &Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self::Trs { translation, rotation, scale }
    }

    #[inline]
    pub fn is_trs(&self) -> bool {
        matches!(self, Self::Trs { .. })
    }

    /// Convert to TRS in place. A TRS transform is left untouched.
    pub fn ensure_trs(&mut self) {
        if let Self::Matrix(m) = self {
            *self = Self::trs_from_matrix(m);
        }
    }

    /// The transform as a matrix.
    pub fn matrix(&self) -> Mat4 {
        match self {
            Self::Matrix(m) => *m,
            Self::Trs { translation, rotation, scale } => {
                Mat4::from_scale_rotation_translation(*scale, *rotation, *translation)
            }
        }
    }

    /// Rotation of a TRS transform.
    pub fn rotation(&self) -> Option<Quat> {
        match self {
            Self::Trs { rotation, .. } => Some(*rotation),
            Self::Matrix(_) => None,
        }
    }
}

/// A node of the target hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub transform: Transform,
    /// Owned children, in order.
    pub children: Vec<NodeIndex>,
    /// Shared meshes drawn at this node.
    pub meshes: Vec<MeshIndex>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Rename the node by appending `suffix` to its id.
    ///
    /// A node whose id already ends with `suffix` keeps its id, so binding
    /// several curves of the same kind names the node once.
    pub fn append_id_suffix(&mut self, suffix: &str) {
        if !self.id.ends_with(suffix) {
            self.id.push_str(suffix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trs_idempotent() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 2.0, 2.0),
            Quat::from_rotation_z(0.5),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let mut t = Transform::Matrix(m);
        t.ensure_trs();
        assert!(t.is_trs());
        let first = t;
        t.ensure_trs();
        assert_eq!(t, first);
        assert!(t.matrix().abs_diff_eq(m, 1e-5));
    }

    #[test]
    fn test_identity_trs() {
        let mut t = Transform::IDENTITY;
        t.ensure_trs();
        assert_eq!(
            t,
            Transform::Trs { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
        );
    }

    #[test]
    fn test_append_id_suffix() {
        let mut node = Node::new("box");
        node.append_id_suffix("_translate");
        assert_eq!(node.id, "box_translate");
        node.append_id_suffix("_translate");
        assert_eq!(node.id, "box_translate");
        node.append_id_suffix("_rotate");
        assert_eq!(node.id, "box_translate_rotate");
    }
}
