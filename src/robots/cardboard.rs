use crate::data_structures::{
    geometry::Geometry,
    material::Material,
    scene_graph::{ContainerNode, MeshNode, SceneNode},
    transform::Transform,
};

use super::{GAP, SEGMENTS};

/// Dimensions of the cardboard robot. Face features are measured from the
/// centre of the head's front face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardboardDimensions {
    pub leg_width: f32,
    pub leg_depth: f32,
    pub leg_length: f32,
    pub leg_separation: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub body_depth: f32,
    pub arm_width: f32,
    pub arm_depth: f32,
    pub arm_length: f32,
    pub head_width: f32,
    pub head_height: f32,
    pub head_depth: f32,
    pub eye_radius: f32,
    pub eye_separation: f32,
    pub eye_height: f32,
    pub mouth_width: f32,
    pub mouth_height: f32,
    pub mouth_top: f32,
}

impl Default for CardboardDimensions {
    fn default() -> Self {
        Self {
            leg_width: 0.8,
            leg_depth: 0.8,
            leg_length: 3.0,
            leg_separation: 1.2,
            body_width: 2.2,
            body_height: 3.0,
            body_depth: 2.0,
            arm_width: 0.8,
            arm_depth: 0.8,
            arm_length: 3.8,
            head_width: 4.0,
            head_height: 2.4,
            head_depth: 2.4,
            eye_radius: 0.2,
            eye_separation: 1.6,
            eye_height: 0.2,
            mouth_width: 0.6,
            mouth_height: 0.5,
            mouth_top: 0.2,
        }
    }
}

pub fn make_cardboard_robot() -> ContainerNode {
    build_cardboard_robot(&CardboardDimensions::default())
}

/// Boxes throughout, with a wide head carrying a triangular mouth and round eyes.
pub fn build_cardboard_robot(dims: &CardboardDimensions) -> ContainerNode {
    let cardboard = Material::lambert(0xccaa77);
    let black = Material::basic(0x000000);
    let d = dims;

    let leg = Geometry::cuboid(d.leg_width, d.leg_length, d.leg_depth);
    let leg_left = MeshNode::new("leg_left", leg.clone(), cardboard)
        .at(d.leg_separation / 2.0, d.leg_length / 2.0, 0.0);
    let leg_right = MeshNode::new("leg_right", leg, cardboard)
        .at(-d.leg_separation / 2.0, d.leg_length / 2.0, 0.0);

    let body = MeshNode::new(
        "body",
        Geometry::cuboid(d.body_width, d.body_height, d.body_depth),
        cardboard,
    )
    .at(0.0, d.leg_length + d.body_height / 2.0, 0.0);

    let arm = Geometry::cuboid(d.arm_width, d.arm_length, d.arm_depth);
    let arm_x = (d.body_width + d.arm_width) / 2.0;
    let arm_y = d.leg_length + d.body_height - d.arm_length / 2.0;
    let arm_left = MeshNode::new("arm_left", arm.clone(), cardboard).at(arm_x, arm_y, 0.0);
    let arm_right = MeshNode::new("arm_right", arm, cardboard).at(-arm_x, arm_y, 0.0);

    // The mouth's base sits one gap further out than its apex.
    let face = d.head_depth / 2.0;
    let mouth_base = -(d.mouth_top + d.mouth_height);
    let mouth = Geometry::triangle(
        [0.0, -d.mouth_top, face + GAP],
        [-d.mouth_width / 2.0, mouth_base, face + GAP * 2.0],
        [d.mouth_width / 2.0, mouth_base, face + GAP * 2.0],
    );
    let eye = Geometry::circle(d.eye_radius, SEGMENTS);
    let head = ContainerNode::new("head")
        .with_transform(Transform::from_xyz(
            0.0,
            d.leg_length + d.body_height + d.head_height / 2.0,
            0.0,
        ))
        .with_child(MeshNode::new(
            "skull",
            Geometry::cuboid(d.head_width, d.head_height, d.head_depth),
            cardboard,
        ))
        .with_child(MeshNode::new("mouth", mouth, black))
        .with_child(
            MeshNode::new("eye_left", eye.clone(), black)
                .at(d.eye_separation / 2.0, d.eye_height, face + GAP),
        )
        .with_child(
            MeshNode::new("eye_right", eye, black)
                .at(-d.eye_separation / 2.0, d.eye_height, face + GAP),
        );

    let mut robot = ContainerNode::new("cardboard_robot")
        .with_child(leg_left)
        .with_child(leg_right)
        .with_child(body)
        .with_child(arm_left)
        .with_child(arm_right)
        .with_child(head);
    robot.enable_shadows();
    log::debug!("built cardboard robot with {} nodes", robot.node_count());
    robot
}
