use cgmath::{InnerSpace, Matrix4, Point3, Vector3};
use robot_viewer::{
    camera::PerspectiveCamera,
    config::ViewerConfig,
    data_structures::{material::Color, model::LineVertex},
    render::{Renderer, collect_draw_items},
    scene::{Scene, Viewer},
};

pub const EPSILON: f32 = 1e-4;

/// What the renderer saw on one draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    pub fov: f32,
    pub aspect: f32,
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub projection: Matrix4<f32>,
    pub view_proj: Matrix4<f32>,
    pub meshes: usize,
    pub lights: usize,
}

/// A renderer without a GPU. Records every draw.
#[derive(Debug)]
pub struct RecordingRenderer {
    pub frames: Vec<RecordedFrame>,
    pub size: [u32; 2],
    pub resizes: Vec<[u32; 2]>,
    pub clear_colour: Option<Color>,
    pub overlay: Vec<LineVertex>,
    /// Error returned by the next draw instead of recording it.
    pub fail_next: Option<wgpu::SurfaceError>,
}

impl RecordingRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frames: Vec::new(),
            size: [width, height],
            resizes: Vec::new(),
            clear_colour: None,
            overlay: Vec::new(),
            fail_next: None,
        }
    }

    pub fn last(&self) -> &RecordedFrame {
        self.frames.last().expect("nothing was drawn")
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.frames.push(RecordedFrame {
            fov: camera.fov,
            aspect: camera.aspect,
            position: camera.position,
            direction: camera.direction(),
            projection: camera.projection_matrix(),
            view_proj: camera.view_proj(),
            meshes: collect_draw_items(scene).len(),
            lights: scene.lights.len(),
        });
        Ok(())
    }

    fn size(&self) -> [u32; 2] {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = [width, height];
        self.resizes.push([width, height]);
    }

    fn set_clear_colour(&mut self, colour: Color) {
        self.clear_colour = Some(colour);
    }

    fn set_overlay(&mut self, vertices: &[LineVertex]) {
        self.overlay = vertices.to_vec();
    }
}

pub fn recording_viewer() -> Viewer<RecordingRenderer> {
    Viewer::new(&ViewerConfig::default(), RecordingRenderer::default())
}

pub fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < EPSILON, "{} != {}", a, b);
}

pub fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < EPSILON, "{:?} != {:?}", a, b);
}
