//! Component types - the numeric storage types of accessor elements.

use bytemuck::Pod;
use std::fmt;

/// Numeric type of a single accessor component.
///
/// Discriminants are the WebGL enum values used by glTF's `componentType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ComponentType {
    /// Signed 8-bit integer
    Int8 = 5120,
    /// Unsigned 8-bit integer
    Uint8 = 5121,
    /// Signed 16-bit integer
    Int16 = 5122,
    /// Unsigned 16-bit integer
    Uint16 = 5123,
    /// Unsigned 32-bit integer
    Uint32 = 5125,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 5126,
}

impl ComponentType {
    /// Returns the size in bytes of a single component.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Uint32 | Self::Float32 => 4,
        }
    }

    /// The glTF `componentType` code.
    #[inline]
    pub const fn gl_enum(self) -> u16 {
        self as u16
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32)
    }

    /// Returns the name of this type as a string.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// === Component trait for type-safe packing ===

/// Rust types that can be packed into an accessor as components.
pub trait Component: Pod + Copy + Default {
    /// The corresponding ComponentType value.
    const TYPE: ComponentType;

    /// Widen to f32 for bounds and inspection.
    fn to_f32(self) -> f32;
}

impl Component for i8 {
    const TYPE: ComponentType = ComponentType::Int8;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Component for u8 {
    const TYPE: ComponentType = ComponentType::Uint8;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Component for i16 {
    const TYPE: ComponentType = ComponentType::Int16;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Component for u16 {
    const TYPE: ComponentType = ComponentType::Uint16;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Component for u32 {
    const TYPE: ComponentType = ComponentType::Uint32;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Component for f32 {
    const TYPE: ComponentType = ComponentType::Float32;
    fn to_f32(self) -> f32 {
        self
    }
}

/// Decode one component from native-endian bytes.
pub(crate) fn read_component(bytes: &[u8], ty: ComponentType) -> f32 {
    match ty {
        ComponentType::Int8 => bytes[0] as i8 as f32,
        ComponentType::Uint8 => bytes[0] as f32,
        ComponentType::Int16 => bytemuck::pod_read_unaligned::<i16>(&bytes[..2]) as f32,
        ComponentType::Uint16 => bytemuck::pod_read_unaligned::<u16>(&bytes[..2]) as f32,
        ComponentType::Uint32 => bytemuck::pod_read_unaligned::<u32>(&bytes[..4]) as f32,
        ComponentType::Float32 => bytemuck::pod_read_unaligned::<f32>(&bytes[..4]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sizes() {
        assert_eq!(ComponentType::Uint8.num_bytes(), 1);
        assert_eq!(ComponentType::Uint16.num_bytes(), 2);
        assert_eq!(ComponentType::Uint32.num_bytes(), 4);
        assert_eq!(ComponentType::Float32.num_bytes(), 4);
        assert_eq!(<u16 as Component>::TYPE.num_bytes(), std::mem::size_of::<u16>());
    }

    #[test]
    fn test_read_component() {
        let bytes = bytemuck::bytes_of(&1.5f32);
        assert_eq!(read_component(bytes, ComponentType::Float32), 1.5);
        let bytes = bytemuck::bytes_of(&513u16);
        assert_eq!(read_component(bytes, ComponentType::Uint16), 513.0);
    }
}
