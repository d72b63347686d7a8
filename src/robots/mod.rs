//! Procedural robot models.
//!
//! Each builder is a pure function from a dimensions record to a freshly
//! allocated node tree. Parts are stacked by cumulative offsets so that legs,
//! body and head touch without gaps; flat decorations float [`GAP`] in front of
//! the surface they sit on.

pub mod cardboard;
pub mod metal;

use crate::data_structures::scene_graph::{ContainerNode, SceneNode};

pub use cardboard::{CardboardDimensions, build_cardboard_robot, make_cardboard_robot};
pub use metal::{MetalDimensions, build_metal_robot, make_metal_robot};

/// Radial and vertical subdivisions of round shapes.
pub const SEGMENTS: u32 = 12;

/// Distance decorations are lifted off a surface to avoid z-fighting.
pub const GAP: f32 = 0.01;

/// Which robot the scene shows. Chosen at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotKind {
    Metal,
    Cardboard,
}

impl RobotKind {
    pub fn build(self) -> Box<dyn SceneNode> {
        match self {
            RobotKind::Metal => Box::new(make_metal_robot()),
            RobotKind::Cardboard => Box::new(make_cardboard_robot()),
        }
    }

    pub fn build_container(self) -> ContainerNode {
        match self {
            RobotKind::Metal => make_metal_robot(),
            RobotKind::Cardboard => make_cardboard_robot(),
        }
    }
}

impl Default for RobotKind {
    #[cfg(not(feature = "cardboard-robot"))]
    fn default() -> Self {
        RobotKind::Metal
    }

    #[cfg(feature = "cardboard-robot")]
    fn default() -> Self {
        RobotKind::Cardboard
    }
}
