//! Target document model (glTF 2.0 style).
//!
//! - [`Asset`] - Arenas of every object plus the shared buffer views
//! - [`Node`] / [`Transform`] - Node hierarchy with matrix or TRS transforms
//! - [`Mesh`] / [`Primitive`] - Indexed geometry with per-semantic accessors
//! - [`Accessor`] / [`BufferView`] - Typed binary data
//! - [`Animation`] / [`Channel`] / [`Sampler`] - Keyframed node properties
//! - [`json`] - glTF JSON output

mod asset;
mod accessor;
mod node;
mod mesh;
mod animation;
mod material;
pub mod json;

pub use asset::*;
pub use accessor::*;
pub use node::*;
pub use mesh::*;
pub use animation::*;
pub use material::*;
