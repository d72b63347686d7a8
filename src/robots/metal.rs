use std::f32::consts::PI;

use crate::data_structures::{
    geometry::Geometry,
    material::Material,
    scene_graph::{ContainerNode, MeshNode, SceneNode},
    transform::Transform,
};

use super::{GAP, SEGMENTS};

/// Dimensions of the metal robot. All lengths are in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetalDimensions {
    pub leg_radius: f32,
    pub leg_length: f32,
    pub leg_separation: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub body_depth: f32,
    pub arm_radius: f32,
    pub arm_length: f32,
    pub head_radius: f32,
    pub eye_radius: f32,
    pub eye_separation: f32,
}

impl Default for MetalDimensions {
    fn default() -> Self {
        Self {
            leg_radius: 0.5,
            leg_length: 3.0,
            leg_separation: 1.2,
            body_width: 3.0,
            body_height: 3.0,
            body_depth: 2.0,
            arm_radius: 0.4,
            arm_length: 3.8,
            head_radius: 1.2,
            eye_radius: 0.2,
            eye_separation: 0.8,
        }
    }
}

/// How far the eyes are sunk below the head sphere's surface.
const EYE_INSET: f32 = 0.04;

pub fn make_metal_robot() -> ContainerNode {
    build_metal_robot(&MetalDimensions::default())
}

/// Cylinder legs and arms, a rounded torso with a chest mark and a spherical head.
pub fn build_metal_robot(dims: &MetalDimensions) -> ContainerNode {
    let metal = Material::phong(0x707777, 60.0, 0x222222);
    let red = Material::basic(0xc00000);
    let d = dims;

    let leg = Geometry::cylinder(d.leg_radius, d.leg_radius, d.leg_length, SEGMENTS, SEGMENTS);
    let leg_right = MeshNode::new("leg_right", leg.clone(), metal)
        .at(-d.leg_separation / 2.0, d.leg_length / 2.0, 0.0);
    let leg_left = MeshNode::new("leg_left", leg, metal)
        .at(d.leg_separation / 2.0, d.leg_length / 2.0, 0.0);

    // The torso is a box whose sides are capped by half cylinders.
    let core_width = d.body_width - d.body_depth;
    let shoulder_radius = d.body_depth / 2.0;
    let front = d.body_depth / 2.0 + GAP;
    let body = ContainerNode::new("body")
        .with_transform(Transform::from_xyz(0.0, d.leg_length + d.body_height / 2.0, 0.0))
        .with_child(MeshNode::new(
            "torso",
            Geometry::cuboid(core_width, d.body_height, d.body_depth),
            metal,
        ))
        .with_child(
            MeshNode::new(
                "torso_left",
                Geometry::cylinder_sector(shoulder_radius, d.body_height, SEGMENTS, 1, 0.0, PI),
                metal,
            )
            .at(core_width / 2.0, 0.0, 0.0),
        )
        .with_child(
            MeshNode::new(
                "torso_right",
                Geometry::cylinder_sector(shoulder_radius, d.body_height, SEGMENTS, 1, PI, PI),
                metal,
            )
            .at(-core_width / 2.0, 0.0, 0.0),
        )
        .with_child(MeshNode::new(
            "chest_mark",
            Geometry::triangle(
                [0.0, 0.0, front],
                [core_width / 2.0, d.body_height / 2.0, front],
                [-core_width / 2.0, d.body_height / 2.0, front],
            ),
            red,
        ));

    let arm = Geometry::cylinder(d.arm_radius, d.arm_radius, d.arm_length, SEGMENTS, 1);
    let arm_x = d.body_width / 2.0 + d.arm_radius;
    let arm_y = d.leg_length + d.body_height - d.arm_length / 2.0;
    let arm_left = MeshNode::new("arm_left", arm.clone(), metal).at(arm_x, arm_y, 0.0);
    let arm_right = MeshNode::new("arm_right", arm, metal).at(-arm_x, arm_y, 0.0);

    let eye = Geometry::circle(d.eye_radius, SEGMENTS);
    let eye_y = d.head_radius / 3.0;
    let eye_z = d.head_radius - EYE_INSET;
    let head = ContainerNode::new("head")
        .with_transform(Transform::from_xyz(
            0.0,
            d.leg_length + d.body_height + d.head_radius,
            0.0,
        ))
        .with_child(MeshNode::new(
            "skull",
            Geometry::sphere(d.head_radius, SEGMENTS, SEGMENTS),
            metal,
        ))
        .with_child(MeshNode::new("eye_left", eye.clone(), red).at(d.eye_separation / 2.0, eye_y, eye_z))
        .with_child(MeshNode::new("eye_right", eye, red).at(-d.eye_separation / 2.0, eye_y, eye_z));

    let mut robot = ContainerNode::new("metal_robot")
        .with_child(leg_right)
        .with_child(leg_left)
        .with_child(body)
        .with_child(arm_left)
        .with_child(arm_right)
        .with_child(head);
    robot.enable_shadows();
    log::debug!("built metal robot with {} nodes", robot.node_count());
    robot
}
