//! Source document model.
//!
//! The types here mirror what a COLLADA parser reports, one object per
//! callback:
//! - [`Node`] / [`VisualScene`] - Scene graph with ordered [`TransformOp`]s
//! - [`Mesh`] - Geometry with per-attribute index streams
//! - [`Material`] / [`Effect`] / [`Image`] - Shading inputs
//! - [`AnimationCurve`] / [`AnimationList`] - Keyframes and their bindings
//!
//! Objects are delivered through a [`DocumentHandler`]. A whole
//! [`Document`] can be deserialized and replayed into any handler.

mod ids;
mod transform;
mod node;
mod mesh;
mod effect;
mod animation;
mod misc;
mod handler;
mod document;

pub use ids::*;
pub use transform::*;
pub use node::*;
pub use mesh::*;
pub use effect::*;
pub use animation::*;
pub use misc::*;
pub use handler::DocumentHandler;
pub use document::{Document, ReplayReport};
