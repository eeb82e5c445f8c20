//! # collada2gltf
//!
//! Converts a COLLADA scene, delivered object by object by a parser, into
//! a glTF 2.0 document model.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (component types, accessor types, errors, math)
//! - [`collada`] - Source document model and the [`collada::DocumentHandler`] callbacks
//! - [`gltf`] - Target document model and JSON output
//! - [`convert`] - The [`convert::GltfWriter`] and its node, mesh, animation
//!   and material builders
//!
//! ## Example
//!
//! ```ignore
//! use collada2gltf::prelude::*;
//!
//! let document = Document::open("scene.json")?;
//! let (asset, report) = convert_document(&document, Options::default())?;
//! json::write_file(&asset, "scene.gltf", false)?;
//! ```

pub mod util;
pub mod collada;
pub mod gltf;
pub mod convert;

// Re-export commonly used types
pub use util::{Error, Result};

/// Generator string written into every asset.
pub const GENERATOR: &str = concat!("collada2gltf ", env!("CARGO_PKG_VERSION"));

/// Build date stamped by the build script.
pub const BUILD_DATE: &str = env!("COLLADA2GLTF_BUILD_DATE");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::collada::{Document, DocumentHandler};
    pub use crate::gltf::{json, Asset};
    pub use crate::convert::{convert_document, GltfWriter, Options};
}
