//! Accessors and buffer views - typed binary data.
//!
//! An [`Accessor`] describes `count` elements of one [`DataType`]. Its bytes
//! either live in the accessor itself (provisional data that is still being
//! reshaped) or in a byte range of a [`BufferView`].

use crate::util::{
    component_bounds, read_component, AccessorType, Component, ComponentType, DataType,
};

use super::BufferViewIndex;

/// Start offsets of accessors inside a view are aligned to this.
pub const ACCESSOR_ALIGNMENT: usize = 4;

/// GPU binding hint of a buffer view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferViewTarget {
    /// Vertex attributes.
    Array,
    /// Primitive indices.
    ElementArray,
}

impl BufferViewTarget {
    /// The glTF `target` code.
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Array => 34962,
            Self::ElementArray => 34963,
        }
    }
}

/// A usage bucket owning the concatenated bytes of its accessors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BufferView {
    pub name: String,
    pub target: Option<BufferViewTarget>,
    pub data: Vec<u8>,
}

impl BufferView {
    pub fn new(name: impl Into<String>, target: Option<BufferViewTarget>) -> Self {
        Self { name: name.into(), target, data: Vec::new() }
    }

    /// Append bytes at the next aligned offset, returning that offset.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.data.len().next_multiple_of(ACCESSOR_ALIGNMENT);
        self.data.resize(offset, 0);
        self.data.extend_from_slice(bytes);
        offset
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where an accessor's bytes live.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessorStorage {
    /// Bytes owned by the accessor, not yet packed into a view.
    Owned(Vec<u8>),
    /// A byte range inside a buffer view.
    View {
        buffer_view: BufferViewIndex,
        byte_offset: usize,
    },
}

/// Typed view over binary element data.
#[derive(Clone, Debug, PartialEq)]
pub struct Accessor {
    pub ty: AccessorType,
    pub component_type: ComponentType,
    /// Number of elements.
    pub count: usize,
    pub storage: AccessorStorage,
    /// Per-component minimum, for float data packed into a view.
    pub min: Option<Vec<f32>>,
    /// Per-component maximum, for float data packed into a view.
    pub max: Option<Vec<f32>>,
}

impl Accessor {
    /// Create an accessor owning a copy of `values`.
    ///
    /// Trailing values that do not fill a whole element are dropped.
    pub fn owned<T: Component>(ty: AccessorType, values: &[T]) -> Self {
        let n = ty.num_components();
        let count = values.len() / n;
        let bytes = bytemuck::cast_slice(&values[..count * n]).to_vec();
        Self {
            ty,
            component_type: T::TYPE,
            count,
            storage: AccessorStorage::Owned(bytes),
            min: None,
            max: None,
        }
    }

    /// Pack `values` into `view` and describe them.
    pub fn packed<T: Component>(
        ty: AccessorType,
        values: &[T],
        view: &mut BufferView,
        view_index: BufferViewIndex,
    ) -> Self {
        let n = ty.num_components();
        let count = values.len() / n;
        let values = &values[..count * n];
        let byte_offset = view.append(bytemuck::cast_slice(values));

        let (min, max) = if T::TYPE.is_float() {
            let floats: Vec<f32> = values.iter().map(|v| v.to_f32()).collect();
            match component_bounds(&floats, n) {
                Some((min, max)) => (Some(min), Some(max)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        Self {
            ty,
            component_type: T::TYPE,
            count,
            storage: AccessorStorage::View { buffer_view: view_index, byte_offset },
            min,
            max,
        }
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        DataType::new(self.component_type, self.ty)
    }

    /// Size of the element data in bytes.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.count * self.data_type().num_bytes()
    }

    #[inline]
    pub fn is_packed(&self) -> bool {
        matches!(self.storage, AccessorStorage::View { .. })
    }

    /// Decode every component as f32, given the bytes of its storage.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Vec<f32> {
        let size = self.component_type.num_bytes();
        bytes
            .chunks_exact(size)
            .take(self.count * self.ty.num_components())
            .map(|chunk| read_component(chunk, self.component_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_accessor() {
        let acc = Accessor::owned(AccessorType::Vec3, &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(acc.count, 2);
        assert_eq!(acc.byte_length(), 24);
        assert!(!acc.is_packed());
        let AccessorStorage::Owned(bytes) = &acc.storage else { panic!("expected owned") };
        assert_eq!(acc.decode(bytes), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_packed_alignment() {
        let mut view = BufferView::new("indices", Some(BufferViewTarget::ElementArray));
        let a = Accessor::packed(AccessorType::Scalar, &[0u16, 1, 2], &mut view, BufferViewIndex(0));
        let b = Accessor::packed(AccessorType::Scalar, &[3u16], &mut view, BufferViewIndex(0));
        assert_eq!(a.storage, AccessorStorage::View { buffer_view: BufferViewIndex(0), byte_offset: 0 });
        // 6 bytes used, next accessor starts at 8
        assert_eq!(b.storage, AccessorStorage::View { buffer_view: BufferViewIndex(0), byte_offset: 8 });
        assert_eq!(view.byte_length(), 10);
        assert!(a.min.is_none());
    }

    #[test]
    fn test_packed_bounds() {
        let mut view = BufferView::new("attributes", Some(BufferViewTarget::Array));
        let acc = Accessor::packed(
            AccessorType::Vec2,
            &[0.0f32, 1.0, -2.0, 0.5],
            &mut view,
            BufferViewIndex(1),
        );
        assert_eq!(acc.min, Some(vec![-2.0, 0.5]));
        assert_eq!(acc.max, Some(vec![0.0, 1.0]));
        assert_eq!(acc.data_type(), DataType::new(ComponentType::Float32, AccessorType::Vec2));
    }
}
