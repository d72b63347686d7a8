//! Scene data: node trees, shapes, materials and GPU texture helpers.
//!
//! - `scene_graph` holds the node tree and its transform propagation
//! - `transform` is the position/rotation/scale triple each node carries
//! - `geometry` describes primitive shapes and tessellates them
//! - `material` covers colours and the three shading models
//! - `model` has vertex layouts and CPU-side mesh data
//! - `texture` wraps depth and colour targets

pub mod geometry;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
