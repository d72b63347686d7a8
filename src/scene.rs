//! The scene, its helpers and the viewer that ties scene, camera and renderer.
//!
//! [`Viewer::render`] is the single entry point for drawing: it copies the
//! live [`CameraParams`] onto the camera, re-aims it at the origin, refreshes
//! the projection and issues one draw. Nothing else triggers a draw.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::{
    camera::{CameraParams, PerspectiveCamera},
    config::{LightConfig, ViewerConfig},
    data_structures::{
        material::Color,
        model::LineVertex,
        scene_graph::SceneNode,
    },
    panel::{Getter, ParamPanel, Setter},
    render::Renderer,
};

/// Three coloured lines from the origin: x red, y green, z blue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxesHelper {
    pub size: f32,
}

impl AxesHelper {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Line-list vertices, two per axis.
    pub fn vertices(&self) -> [LineVertex; 6] {
        let s = self.size;
        let line = |to: [f32; 3], from_color: [f32; 3], to_color: [f32; 3]| {
            [
                LineVertex {
                    position: [0.0; 3],
                    color: from_color,
                },
                LineVertex {
                    position: to,
                    color: to_color,
                },
            ]
        };
        let [x0, x1] = line([s, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.6, 0.0]);
        let [y0, y1] = line([0.0, s, 0.0], [0.0, 1.0, 0.0], [0.6, 1.0, 0.0]);
        let [z0, z1] = line([0.0, 0.0, s], [0.0, 0.0, 1.0], [0.0, 0.6, 1.0]);
        [x0, x1, y0, y1, z0, z1]
    }
}

/// A cone light aimed at a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub color: Color,
    pub intensity: f32,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out, 0..1.
    pub penumbra: f32,
    pub decay: f32,
    pub distance: f32,
}

impl SpotLight {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            position: config.position,
            target: config.target,
            color: Color::from_hex(config.colour),
            intensity: config.intensity,
            angle: config.angle,
            penumbra: config.penumbra,
            decay: config.decay,
            distance: config.distance,
        }
    }

    /// Unit vector from the target towards the light.
    pub fn direction(&self) -> Vector3<f32> {
        let d = self.position - self.target;
        if d.magnitude2() == 0.0 {
            Vector3::unit_y()
        } else {
            d.normalize()
        }
    }

    pub fn cone_cos(&self) -> f32 {
        self.angle.cos()
    }

    pub fn penumbra_cos(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra)).cos()
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    pub axes: Option<AxesHelper>,
    pub children: Vec<Box<dyn SceneNode>>,
    pub lights: Vec<SpotLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Box<dyn SceneNode>) {
        self.children.push(node);
    }

    pub fn add_light(&mut self, light: SpotLight) {
        self.lights.push(light);
    }

    pub fn update_world_transforms(&mut self) {
        self.children
            .iter_mut()
            .for_each(|child| child.update_world_transform_all());
    }
}

/// Scene, camera and renderer bundled with the live camera parameters.
pub struct Viewer<R: Renderer> {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub params: CameraParams,
    pub renderer: R,
    frames: u64,
}

impl<R: Renderer> Viewer<R> {
    pub fn new(config: &ViewerConfig, mut renderer: R) -> Self {
        renderer.set_clear_colour(Color::from_hex(config.clear_colour));
        let mut scene = Scene::new();
        scene.axes = config.axes_size.map(AxesHelper::new);
        scene.add(config.robot.build());
        scene.add_light(SpotLight::from_config(&config.light));
        scene.update_world_transforms();

        let [width, height] = renderer.size();
        let camera = PerspectiveCamera::new(
            config.camera.fov,
            aspect_ratio(width, height),
            config.near,
            config.far,
        );
        log::info!(
            "scene ready: {:?} robot, {} nodes",
            config.robot,
            scene.children.iter().map(|c| c.node_count()).sum::<usize>()
        );
        Self {
            scene,
            camera,
            params: config.camera,
            renderer,
            frames: 0,
        }
    }

    /// Apply the current parameters to the camera and draw one frame.
    pub fn render(&mut self) {
        self.camera.fov = self.params.fov;
        self.camera.position = self.params.position();
        self.camera.look_at(Point3::origin());
        self.camera.update_projection_matrix();
        self.scene.update_world_transforms();

        match self.renderer.draw(&self.scene, &self.camera) {
            Ok(()) => self.frames += 1,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let [width, height] = self.renderer.size();
                self.renderer.resize(width, height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
    }

    /// Follow a viewport size change. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
        self.camera.aspect = aspect_ratio(width, height);
        self.camera.update_projection_matrix();
    }

    /// Number of frames drawn successfully.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<R: Renderer> std::fmt::Debug for Viewer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("params", &self.params)
            .field("camera", &self.camera)
            .field("frames", &self.frames)
            .finish()
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// The four camera sliders. Each change re-renders the viewer once.
pub fn camera_panel<R: Renderer + 'static>(viewer: &Viewer<R>) -> ParamPanel<Viewer<R>> {
    let sliders: [(&'static str, f32, f32, Getter<Viewer<R>>, Setter<Viewer<R>>); 4] = [
        ("fov", 10.0, 100.0, |v| v.params.fov, |v, fov| v.params.fov = fov),
        ("x", -50.0, 50.0, |v| v.params.x, |v, x| v.params.x = x),
        ("y", -50.0, 50.0, |v| v.params.y, |v, y| v.params.y = y),
        ("z", -50.0, 50.0, |v| v.params.z, |v, z| v.params.z = z),
    ];
    let mut panel = ParamPanel::new("Camera");
    for (name, min, max, get, set) in sliders {
        if let Some(controller) = panel.add(viewer, name, min, max, get, set) {
            controller.on_change(Viewer::render);
        }
    }
    panel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_run_from_the_origin() {
        let vertices = AxesHelper::new(18.0).vertices();
        assert_eq!(vertices[1].position, [18.0, 0.0, 0.0]);
        assert_eq!(vertices[3].position, [0.0, 18.0, 0.0]);
        assert_eq!(vertices[5].position, [0.0, 0.0, 18.0]);
        assert!(vertices.iter().step_by(2).all(|v| v.position == [0.0; 3]));
    }

    #[test]
    fn spotlight_points_down_at_the_origin() {
        let light = SpotLight::from_config(&LightConfig::default());
        let expected = Vector3::new(0.0, 1.0, 1.0).normalize();
        assert!((light.direction() - expected).magnitude() < 1e-6);
        assert!((light.cone_cos() - 0.5).abs() < 1e-6);
        // no penumbra: hard cone edge
        assert_eq!(light.cone_cos(), light.penumbra_cos());
        assert_eq!(light.color, Color::WHITE);
    }
}
