//! Render pipelines and their uniforms.
//!
//! Bind group slots are shared by every pipeline: 0 is the camera, 1 the
//! spotlight and 2 the per-node uniform of the mesh pipeline. The overlay
//! pipeline binds nothing.

pub mod axes;
pub mod basic;
pub mod light;
pub mod mesh;
pub mod overlay;
