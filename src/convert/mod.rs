//! Source to target conversion.
//!
//! [`GltfWriter`] receives source objects through
//! [`DocumentHandler`](crate::collada::DocumentHandler) and builds a
//! [`gltf::Asset`](crate::gltf::Asset). The builders it delegates to are
//! plain functions over the asset and a [`ConversionContext`]:
//! - [`node`] - transform flattening and animated node isolation
//! - [`mesh`] - vertex deduplication and accessor packing
//! - [`animation`] - curve samplers and animation list binding
//! - [`material`] - effects, textures and images

mod context;
mod options;
mod writer;

pub mod animation;
pub mod material;
pub mod mesh;
pub mod node;

pub use context::{AnimatedTarget, ConversionContext};
pub use options::Options;
pub use writer::{GltfWriter, WriterState};

use crate::collada::{Document, ReplayReport};
use crate::gltf::Asset;
use crate::util::Result;

/// Convert a whole document.
///
/// Objects that fail to convert are reported and left out; the rest of
/// the document still converts.
pub fn convert_document(
    document: &Document,
    options: Options,
) -> Result<(Asset, ReplayReport)> {
    let mut writer = GltfWriter::new(options);
    let report = document.replay(&mut writer)?;
    Ok((writer.into_asset()?, report))
}
