//! Scene graph and hierarchical scene organization.
//!
//! A scene graph is a tree of boxed [`SceneNode`]s. Each parent exclusively owns
//! its children; every node keeps a local transform relative to its parent and
//! a cached world transform refreshed by [`SceneNode::update_world_transforms`].
//!
//! Two node kinds exist:
//! - [`ContainerNode`] groups children and has no shape of its own
//! - [`MeshNode`] is a leaf with a [`Geometry`] and a [`Material`]

use std::fmt::Debug;

use cgmath::Matrix4;

use crate::data_structures::{
    geometry::Geometry,
    material::Material,
    model::Aabb,
    transform::Transform,
};

/// Whether a node casts and/or receives shadows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shadows {
    pub cast: bool,
    pub receive: bool,
}

impl Shadows {
    pub const BOTH: Shadows = Shadows {
        cast: true,
        receive: true,
    };
}

pub trait SceneNode {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> &Transform;

    fn set_local_transform(&mut self, transform: Transform);

    fn get_world_transform(&self) -> &Transform;

    /// Recompute the world transform of `self` and all descendants from the
    /// parent's world transform.
    fn update_world_transforms(&mut self, parent_world_transform: &Transform);

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn shadows(&self) -> Shadows;

    fn set_shadows(&mut self, shadows: Shadows);

    /// Geometry and material for leaves, `None` for groups.
    fn primitive(&self) -> Option<(&Geometry, &Material)>;

    fn material_mut(&mut self) -> Option<&mut Material>;

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Transform::default());
    }

    /// Mark `self` and every descendant to cast and receive shadows.
    fn enable_shadows(&mut self) {
        self.set_shadows(Shadows::BOTH);
        self.get_children_mut()
            .iter_mut()
            .for_each(|child| child.enable_shadows());
    }

    /// Number of nodes in this subtree, `self` included.
    fn node_count(&self) -> usize {
        1 + self
            .get_children()
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    fn mesh_count(&self) -> usize {
        let own = if self.primitive().is_some() { 1 } else { 0 };
        own + self
            .get_children()
            .iter()
            .map(|child| child.mesh_count())
            .sum::<usize>()
    }

    /// Depth-first search by name.
    fn find(&self, name: &str) -> Option<&dyn SceneNode> {
        if self.name() == name {
            return Some(self.as_dyn());
        }
        self.get_children()
            .iter()
            .find_map(|child| child.find(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut dyn SceneNode> {
        if self.name() == name {
            return Some(self.as_dyn_mut());
        }
        self.get_children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }

    /// World-space bounds of this subtree as of the last world transform update.
    fn world_bounds(&self) -> Option<Aabb> {
        let world = self.get_world_transform().to_matrix();
        let own = self
            .primitive()
            .and_then(|(geometry, _)| geometry.bounding_box())
            .map(|bounds| transform_bounds(&bounds, &world));
        self.get_children()
            .iter()
            .filter_map(|child| child.world_bounds())
            .chain(own)
            .reduce(|a, b| Aabb {
                min: cgmath::Vector3::new(a.min.x.min(b.min.x), a.min.y.min(b.min.y), a.min.z.min(b.min.z)),
                max: cgmath::Vector3::new(a.max.x.max(b.max.x), a.max.y.max(b.max.y), a.max.z.max(b.max.z)),
            })
    }

    fn as_dyn(&self) -> &dyn SceneNode;

    fn as_dyn_mut(&mut self) -> &mut dyn SceneNode;
}

impl Debug for dyn SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name())
            .field("local", self.get_local_transform())
            .field("children", self.get_children())
            .finish()
    }
}

fn transform_bounds(bounds: &Aabb, world: &Matrix4<f32>) -> Aabb {
    let corners = bounds.corners().map(|corner| {
        let p = world * corner.extend(1.0);
        cgmath::Vector3::new(p.x, p.y, p.z)
    });
    // Eight corners always yield a box.
    Aabb::from_points(corners).unwrap_or(*bounds)
}

/// A group: owns children, draws nothing itself.
#[derive(Debug)]
pub struct ContainerNode {
    pub name: String,
    pub children: Vec<Box<dyn SceneNode>>,
    local: Transform,
    world: Transform,
    shadows: Shadows,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: vec![],
            local: Transform::default(),
            world: Transform::default(),
            shadows: Shadows::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local = transform;
        self
    }

    pub fn with_child(mut self, child: impl SceneNode + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Transform {
        &self.local
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.local = transform;
    }

    fn get_world_transform(&self) -> &Transform {
        &self.world
    }

    fn update_world_transforms(&mut self, parent_world_transform: &Transform) {
        self.world = parent_world_transform * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn shadows(&self) -> Shadows {
        self.shadows
    }

    fn set_shadows(&mut self, shadows: Shadows) {
        self.shadows = shadows;
    }

    fn primitive(&self) -> Option<(&Geometry, &Material)> {
        None
    }

    fn material_mut(&mut self) -> Option<&mut Material> {
        None
    }

    fn as_dyn(&self) -> &dyn SceneNode {
        self
    }

    fn as_dyn_mut(&mut self) -> &mut dyn SceneNode {
        self
    }
}

/// A leaf shape. Children are allowed but the robots never use them.
#[derive(Debug)]
pub struct MeshNode {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    children: Vec<Box<dyn SceneNode>>,
    local: Transform,
    world: Transform,
    shadows: Shadows,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            children: vec![],
            local: Transform::default(),
            world: Transform::default(),
            shadows: Shadows::default(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.local = Transform::from_xyz(x, y, z);
        self
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Transform {
        &self.local
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.local = transform;
    }

    fn get_world_transform(&self) -> &Transform {
        &self.world
    }

    fn update_world_transforms(&mut self, parent_world_transform: &Transform) {
        self.world = parent_world_transform * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn shadows(&self) -> Shadows {
        self.shadows
    }

    fn set_shadows(&mut self, shadows: Shadows) {
        self.shadows = shadows;
    }

    fn primitive(&self) -> Option<(&Geometry, &Material)> {
        Some((&self.geometry, &self.material))
    }

    fn material_mut(&mut self) -> Option<&mut Material> {
        Some(&mut self.material)
    }

    fn as_dyn(&self) -> &dyn SceneNode {
        self
    }

    fn as_dyn_mut(&mut self) -> &mut dyn SceneNode {
        self
    }
}

/// Walk the tree depth-first, handing each node to `visit`.
pub fn visit<'a>(node: &'a dyn SceneNode, visit_fn: &mut dyn FnMut(&'a dyn SceneNode)) {
    visit_fn(node);
    for child in node.get_children() {
        visit(child.as_ref(), visit_fn);
    }
}
